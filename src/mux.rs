//! Mux - assembles the registry and store, hands out facades

use crate::error::{Error, Result};
use crate::facade::Facade;
use crate::host::Host;
use crate::owner::OwnerId;
use crate::registry::HandlerRegistry;
use crate::store::{Passthrough, PropertyStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

// ============================================================================
// MuxConfig
// ============================================================================

/// Configuration for a [`Mux`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MuxConfig {
    /// Reserved prefix marking the event namespace. Property names starting
    /// with this prefix denote events; everything else is plain data.
    pub event_prefix: String,
}

impl Default for MuxConfig {
    fn default() -> Self {
        Self {
            event_prefix: "on".to_string(),
        }
    }
}

impl MuxConfig {
    /// Default config (`"on"` prefix).
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the event prefix.
    pub fn with_event_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.event_prefix = prefix.into();
        self
    }
}

// ============================================================================
// Mux
// ============================================================================

/// Owns one handler registry and one property store, and creates per-owner
/// [`Facade`] views over host objects.
///
/// Every facade created by the same mux shares the same registry, so owners
/// of one host cooperate on one slot table. The registry is an explicit
/// value with the mux's lifetime; nothing here is ambient or global, and a
/// test can build as many independent muxes as it likes.
pub struct Mux {
    config: MuxConfig,
    registry: Arc<HandlerRegistry>,
    store: Arc<dyn PropertyStore>,
}

impl std::fmt::Debug for Mux {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mux")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Mux {
    /// Create a mux with the default passthrough property store.
    ///
    /// Fails with [`Error::Configuration`] when the event prefix is empty
    /// (an empty prefix would classify every name as an event).
    pub fn new(config: MuxConfig) -> Result<Self> {
        Self::with_store(config, Arc::new(Passthrough))
    }

    /// Create a mux with a custom property store.
    pub fn with_store(config: MuxConfig, store: Arc<dyn PropertyStore>) -> Result<Self> {
        if config.event_prefix.is_empty() {
            return Err(Error::configuration("event prefix must not be empty"));
        }
        Ok(Self {
            config,
            registry: Arc::new(HandlerRegistry::new()),
            store,
        })
    }

    /// Create the facade view of `host` for `owner`.
    ///
    /// Fails with [`Error::Configuration`] when the owner id is empty.
    pub fn facade(&self, host: Arc<dyn Host>, owner: impl Into<OwnerId>) -> Result<Facade> {
        let owner = owner.into();
        if owner.is_empty() {
            return Err(Error::configuration("owner id must not be empty"));
        }
        debug!(%owner, "creating facade");
        Ok(Facade::new(
            host,
            Arc::clone(&self.registry),
            Arc::clone(&self.store),
            owner,
            self.config.event_prefix.clone(),
        ))
    }

    /// The shared handler registry backing every facade from this mux.
    pub fn registry(&self) -> &Arc<HandlerRegistry> {
        &self.registry
    }

    /// The configured event prefix.
    pub fn event_prefix(&self) -> &str {
        &self.config.event_prefix
    }
}

impl Default for Mux {
    fn default() -> Self {
        Self {
            config: MuxConfig::default(),
            registry: Arc::new(HandlerRegistry::new()),
            store: Arc::new(Passthrough),
        }
    }
}
