//! Facade - the per-owner interception surface over a trapped host
//!
//! Each facade belongs to one (host, owner) pair. It classifies every name
//! into the event namespace (reserved prefix) or the property namespace, and
//! routes the access to the shared handler registry or the property store.

use crate::host::Host;
use crate::owner::OwnerId;
use crate::registry::HandlerRegistry;
use crate::store::PropertyStore;
use crate::value::{Handler, PropValue};
use crate::{Error, Result};
use std::sync::Arc;
use tracing::debug;

/// Per-owner view of a host object.
///
/// Event-classified names are namespaced by this facade's owner: two facades
/// over the same host read and write disjoint handler slots. Everything else
/// goes through the property store straight to the host.
///
/// The classified [`get`](Self::get)/[`set`](Self::set) surface treats the
/// facade as a generic property bag, the way the host itself is used; the
/// typed `*_handler` / `*_property` methods are the explicit namespaces for
/// callers that know which side of the split they are on.
pub struct Facade {
    host: Arc<dyn Host>,
    registry: Arc<HandlerRegistry>,
    store: Arc<dyn PropertyStore>,
    owner: OwnerId,
    prefix: String,
}

impl std::fmt::Debug for Facade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Facade")
            .field("owner", &self.owner)
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl Facade {
    pub(crate) fn new(
        host: Arc<dyn Host>,
        registry: Arc<HandlerRegistry>,
        store: Arc<dyn PropertyStore>,
        owner: OwnerId,
        prefix: String,
    ) -> Self {
        Self {
            host,
            registry,
            store,
            owner,
            prefix,
        }
    }

    /// The owner this view belongs to.
    pub fn owner(&self) -> &OwnerId {
        &self.owner
    }

    /// Whether `name` falls in the event namespace.
    pub fn is_event(&self, name: &str) -> bool {
        name.starts_with(&self.prefix)
    }

    // ========================================================================
    // Classified surface - route by name
    // ========================================================================

    /// Read `name`: this owner's handler for event names, the stored
    /// property otherwise.
    pub fn get(&self, name: &str) -> Option<PropValue> {
        if self.is_event(name) {
            self.registry.get(name, &self.owner).map(PropValue::Callable)
        } else {
            self.store.get(self.host.as_ref(), name, &self.owner)
        }
    }

    /// Existence check mirroring [`get`](Self::get); owner-scoped for
    /// event names.
    pub fn has(&self, name: &str) -> bool {
        if self.is_event(name) {
            self.registry.has(name, &self.owner)
        } else {
            self.store.has(self.host.as_ref(), name, &self.owner)
        }
    }

    /// Assign `value` to `name`.
    ///
    /// Event names accept callables (registration) and falsy data (explicit
    /// unset, never an error); any other data is rejected with
    /// [`Error::InvalidHandlerType`] and nothing changes. Other names
    /// forward to the property store.
    pub fn set(&self, name: &str, value: impl Into<PropValue>) -> Result<()> {
        let value = value.into();
        if !self.is_event(name) {
            self.store.set(self.host.as_ref(), name, value, &self.owner);
            return Ok(());
        }
        match value {
            PropValue::Callable(handler) => {
                self.registry.set(name, &self.owner, handler);
                self.install_dispatcher(name);
                Ok(())
            }
            v if v.is_falsy() => {
                self.registry.unset(name, &self.owner);
                Ok(())
            }
            v => Err(Error::invalid_handler(name, v.type_name())),
        }
    }

    /// Remove `name`: this owner's handler for event names (idempotent),
    /// the stored property otherwise.
    pub fn delete(&self, name: &str) {
        if self.is_event(name) {
            self.registry.unset(name, &self.owner);
        } else {
            self.store.unset(self.host.as_ref(), name, &self.owner);
        }
    }

    // ========================================================================
    // Event namespace - typed entry points
    // ========================================================================

    /// This owner's handler for `event`, if registered.
    pub fn handler(&self, event: &str) -> Result<Option<Handler>> {
        self.expect_event(event)?;
        Ok(self.registry.get(event, &self.owner))
    }

    /// Whether this owner has a handler for `event`.
    pub fn has_handler(&self, event: &str) -> Result<bool> {
        self.expect_event(event)?;
        Ok(self.registry.has(event, &self.owner))
    }

    /// Register (or replace in place) this owner's handler for `event`.
    ///
    /// The first registration ever for `event` on this host installs the
    /// forwarding dispatcher at the host property.
    pub fn set_handler(&self, event: &str, handler: Handler) -> Result<()> {
        self.expect_event(event)?;
        self.registry.set(event, &self.owner, handler);
        self.install_dispatcher(event);
        Ok(())
    }

    /// Remove this owner's handler for `event`. Idempotent; the dispatcher
    /// stays installed on the host.
    pub fn remove_handler(&self, event: &str) -> Result<()> {
        self.expect_event(event)?;
        self.registry.unset(event, &self.owner);
        Ok(())
    }

    // ========================================================================
    // Property namespace - typed entry points
    // ========================================================================

    /// Read the plain property `name`.
    pub fn property(&self, name: &str) -> Result<Option<PropValue>> {
        self.expect_property(name)?;
        Ok(self.store.get(self.host.as_ref(), name, &self.owner))
    }

    /// Whether the plain property `name` exists.
    pub fn has_property(&self, name: &str) -> Result<bool> {
        self.expect_property(name)?;
        Ok(self.store.has(self.host.as_ref(), name, &self.owner))
    }

    /// Assign `value` to the plain property `name`.
    pub fn set_property(&self, name: &str, value: impl Into<PropValue>) -> Result<()> {
        self.expect_property(name)?;
        self.store
            .set(self.host.as_ref(), name, value.into(), &self.owner);
        Ok(())
    }

    /// Remove the plain property `name`.
    pub fn remove_property(&self, name: &str) -> Result<()> {
        self.expect_property(name)?;
        self.store.unset(self.host.as_ref(), name, &self.owner);
        Ok(())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn expect_event(&self, name: &str) -> Result<()> {
        if self.is_event(name) {
            Ok(())
        } else {
            Err(Error::configuration(format!(
                "'{name}' is outside the event namespace (prefix '{}')",
                self.prefix
            )))
        }
    }

    fn expect_property(&self, name: &str) -> Result<()> {
        if self.is_event(name) {
            Err(Error::configuration(format!(
                "'{name}' is inside the event namespace (prefix '{}')",
                self.prefix
            )))
        } else {
            Ok(())
        }
    }

    /// Install the forwarding dispatcher at `host[event]`, unless the host
    /// already carries a non-falsy value there. A falsy host value (the
    /// typed equivalent of `host.onX = null`) does not count as installed
    /// and gets overwritten. Once installed, the dispatcher survives for
    /// the host's lifetime, even after every owner unregisters.
    ///
    /// The check-then-install pair is not atomic: two owners racing on the
    /// first registration from different threads can each build a
    /// dispatcher, last write wins. Both close over the same shared
    /// registry, so dispatch behavior is identical either way; a host that
    /// needs a single callable identity must serialize first registration.
    fn install_dispatcher(&self, event: &str) {
        if matches!(self.host.get(event), Some(v) if !v.is_falsy()) {
            return;
        }
        debug!(event, owner = %self.owner, "installing dispatcher");
        let registry = Arc::clone(&self.registry);
        let name = event.to_string();
        let dispatcher = Handler::new(move |args| {
            let outcome = registry.execute_all(&name, args)?;
            Ok(outcome.into_signal())
        });
        self.host.set(event, PropValue::Callable(dispatcher));
    }
}
