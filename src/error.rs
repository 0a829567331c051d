//! Error types for hostmux
//!
//! All errors are managed in one central enum.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// hostmux error type
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Wiring
    // ========================================================================
    /// A wiring mistake caught at construction or at a typed entry point:
    /// empty owner id, empty event prefix, or an event method called with a
    /// name outside the event namespace.
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ========================================================================
    // Registration
    // ========================================================================
    /// A non-callable, non-falsy value was assigned to an event-classified
    /// name. The assignment is rejected and prior state is unchanged.
    #[error("Invalid handler type for '{name}': expected a callable, got {found}")]
    InvalidHandlerType {
        /// The event-classified name the assignment targeted.
        name: String,
        /// Type tag of the rejected value.
        found: &'static str,
    },

    // ========================================================================
    // Dispatch
    // ========================================================================
    /// An event handler failed during dispatch. Carried as-is from the
    /// callback that raised it; the remaining handlers of that dispatch
    /// never ran.
    #[error(transparent)]
    Handler(#[from] anyhow::Error),
}

impl Error {
    /// Configuration error helper
    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }

    pub(crate) fn invalid_handler(name: impl Into<String>, found: &'static str) -> Self {
        Error::InvalidHandlerType {
            name: name.into(),
            found,
        }
    }

    /// Whether this error came out of a handler callback rather than this
    /// crate's own checks.
    pub fn is_handler_error(&self) -> bool {
        matches!(self, Error::Handler(_))
    }
}
