//! Property values - the dynamic value model for trapped host properties
//!
//! A host property holds either plain data (an opaque `serde_json::Value`)
//! or a callable. Callables cover both registered event handlers and the
//! dispatcher installed on the host itself.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Handler - event callback
// ============================================================================

/// Signature of an event callback.
///
/// Arguments arrive as an opaque slice of JSON values; this layer never
/// inspects them. The return value is a verdict: `Some(false)` vetoes the
/// event, `Some(true)` approves it, and `None` expresses no opinion
/// (counted as approval during aggregation).
pub type HandlerFn = dyn Fn(&[Value]) -> anyhow::Result<Option<bool>> + Send + Sync;

/// A registered event callback.
///
/// Cheap to clone; clones share the underlying closure. Equality is pointer
/// identity, so a handler read back out of the registry compares equal to
/// the one that was stored.
#[derive(Clone)]
pub struct Handler(Arc<HandlerFn>);

impl Handler {
    /// Wrap a closure as a handler.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> anyhow::Result<Option<bool>> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Wrap an infallible closure as a handler.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Option<bool> + Send + Sync + 'static,
    {
        Self::new(move |args| Ok(f(args)))
    }

    /// Invoke the callback.
    pub fn call(&self, args: &[Value]) -> anyhow::Result<Option<bool>> {
        (self.0)(args)
    }

    /// Whether two handlers share the same underlying closure.
    pub fn same_as(&self, other: &Handler) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({:p})", Arc::as_ptr(&self.0))
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

// ============================================================================
// PropValue - dynamic property value
// ============================================================================

/// A value held by (or assigned to) a host property.
#[derive(Debug, Clone)]
pub enum PropValue {
    /// Plain data, forwarded to the host untouched.
    Data(Value),

    /// A callable: a registered event handler, or an installed dispatcher.
    Callable(Handler),
}

impl PropValue {
    /// Whether this value is a callable.
    pub fn is_callable(&self) -> bool {
        matches!(self, PropValue::Callable(_))
    }

    /// Whether assigning this value to an event slot means "unset".
    ///
    /// Mirrors the host convention where a falsy assignment removes the
    /// handler: null, `false`, the empty string and numeric zero all count.
    /// A callable is never falsy.
    pub fn is_falsy(&self) -> bool {
        match self {
            PropValue::Callable(_) => false,
            PropValue::Data(v) => match v {
                Value::Null => true,
                Value::Bool(b) => !b,
                Value::String(s) => s.is_empty(),
                Value::Number(n) => n.as_f64() == Some(0.0),
                _ => false,
            },
        }
    }

    /// The contained data value, if this is plain data.
    pub fn as_data(&self) -> Option<&Value> {
        match self {
            PropValue::Data(v) => Some(v),
            PropValue::Callable(_) => None,
        }
    }

    /// The contained handler, if this is a callable.
    pub fn as_callable(&self) -> Option<&Handler> {
        match self {
            PropValue::Callable(h) => Some(h),
            PropValue::Data(_) => None,
        }
    }

    /// Short type tag for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            PropValue::Callable(_) => "callable",
            PropValue::Data(Value::Null) => "null",
            PropValue::Data(Value::Bool(_)) => "boolean",
            PropValue::Data(Value::Number(_)) => "number",
            PropValue::Data(Value::String(_)) => "string",
            PropValue::Data(Value::Array(_)) => "array",
            PropValue::Data(Value::Object(_)) => "object",
        }
    }
}

impl From<Value> for PropValue {
    fn from(v: Value) -> Self {
        PropValue::Data(v)
    }
}

impl From<Handler> for PropValue {
    fn from(h: Handler) -> Self {
        PropValue::Callable(h)
    }
}
