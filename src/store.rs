//! Property store - the swappable seam for non-event names

use crate::host::Host;
use crate::owner::OwnerId;
use crate::value::PropValue;

// ============================================================================
// PropertyStore - non-event access seam
// ============================================================================

/// Default behavior for names outside the event namespace.
///
/// Kept separate from the handler registry so a consumer can intercept plain
/// property access (validation, logging, computed fields) without touching
/// event dispatch. The owner id is passed through for such stores;
/// [`Passthrough`] ignores it.
pub trait PropertyStore: Send + Sync {
    /// Read `name` for `owner`.
    fn get(&self, host: &dyn Host, name: &str, owner: &OwnerId) -> Option<PropValue>;

    /// Assign `value` to `name` for `owner`.
    fn set(&self, host: &dyn Host, name: &str, value: PropValue, owner: &OwnerId);

    /// Remove `name` for `owner`. Missing properties are ignored.
    fn unset(&self, host: &dyn Host, name: &str, owner: &OwnerId);

    /// Whether `name` exists for `owner`.
    fn has(&self, host: &dyn Host, name: &str, owner: &OwnerId) -> bool;
}

// ============================================================================
// Passthrough - the default store
// ============================================================================

/// Forwards every operation verbatim to the host, no added semantics.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl PropertyStore for Passthrough {
    fn get(&self, host: &dyn Host, name: &str, _owner: &OwnerId) -> Option<PropValue> {
        host.get(name)
    }

    fn set(&self, host: &dyn Host, name: &str, value: PropValue, _owner: &OwnerId) {
        host.set(name, value);
    }

    fn unset(&self, host: &dyn Host, name: &str, _owner: &OwnerId) {
        host.remove(name);
    }

    fn has(&self, host: &dyn Host, name: &str, _owner: &OwnerId) -> bool {
        host.has(name)
    }
}
