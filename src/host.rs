//! Host object contract and the in-memory reference host

use crate::value::PropValue;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;

// ============================================================================
// Host - what a trappable host object must support
// ============================================================================

/// The host object contract.
///
/// A host is an opaque entity with arbitrary named properties. This layer
/// never interprets them; it forwards reads and writes, and stores one
/// dispatcher callable per event name on first registration. Methods take
/// `&self`; implementations supply their own interior mutability.
pub trait Host: Send + Sync {
    /// Read a property.
    fn get(&self, name: &str) -> Option<PropValue>;

    /// Write a property, overwriting any previous value.
    fn set(&self, name: &str, value: PropValue);

    /// Remove a property. Missing properties are ignored.
    fn remove(&self, name: &str);

    /// Whether the property exists.
    fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Names of all current properties, in unspecified order.
    fn property_names(&self) -> Vec<String>;
}

// ============================================================================
// MemoryHost - reference implementation
// ============================================================================

/// Plain in-memory host: a property map and nothing else.
///
/// The typed equivalent of the empty object the facade layer is usually
/// wrapped around in tests and embeddings.
#[derive(Default)]
pub struct MemoryHost {
    props: RwLock<HashMap<String, PropValue>>,
}

impl MemoryHost {
    /// Create an empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Invoke the callable stored at `name` (typically an installed
    /// dispatcher) with the given arguments.
    ///
    /// Returns the callable's verdict. `Ok(None)` when the property is
    /// missing or not callable: nothing ran.
    pub fn fire(&self, name: &str, args: &[Value]) -> anyhow::Result<Option<bool>> {
        let callable = match self.props.read().get(name) {
            Some(PropValue::Callable(h)) => h.clone(),
            _ => return Ok(None),
        };
        callable.call(args)
    }
}

impl Host for MemoryHost {
    fn get(&self, name: &str) -> Option<PropValue> {
        self.props.read().get(name).cloned()
    }

    fn set(&self, name: &str, value: PropValue) {
        self.props.write().insert(name.to_string(), value);
    }

    fn remove(&self, name: &str) {
        self.props.write().remove(name);
    }

    fn has(&self, name: &str) -> bool {
        self.props.read().contains_key(name)
    }

    fn property_names(&self) -> Vec<String> {
        self.props.read().keys().cloned().collect()
    }
}
