// Error types for crudprobe-driver

use thiserror::Error;

/// Result type alias for page-driver operations
pub type Result<T> = std::result::Result<T, DriverError>;

/// Errors a page-driver adapter can surface to the engine.
///
/// Zero matches from a `find` call is NOT an error; adapters return an
/// empty vec for that case. These variants cover genuine transport or
/// lifecycle failures. The engine's resilience layer treats any of them
/// as a transient page failure signature.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Navigation to a URL failed at the transport level
    #[error("Navigation failed for '{url}': {reason}")]
    Navigation { url: String, reason: String },

    /// An element handle no longer resolves to a live element
    ///
    /// Typically the page reloaded or re-rendered since the handle was
    /// obtained. Callers re-query instead of retrying the handle.
    #[error("Stale element handle ({0})")]
    StaleElement(u64),

    /// The referenced browsing context does not exist
    #[error("No browsing context at index {0}")]
    NoSuchContext(usize),

    /// The root browsing context cannot be closed
    #[error("Cannot close the primary browsing context")]
    PrimaryContextClose,

    /// The operation does not apply to this element kind
    ///
    /// E.g. `select_index` on something that is not a selector, or
    /// `option_labels` on a text input.
    #[error("Operation '{operation}' not supported for element ({element})")]
    UnsupportedOperation { operation: &'static str, element: u64 },

    /// Screenshot capture failed
    #[error("Screenshot failed: {0}")]
    Screenshot(String),

    /// Underlying automation-protocol failure
    #[error("Driver transport error: {0}")]
    Transport(String),

    /// Error with additional context
    #[error("{0}: {1}")]
    Context(String, #[source] Box<DriverError>),
}

impl DriverError {
    /// Adds context to the error
    pub fn context(self, msg: impl Into<String>) -> Self {
        DriverError::Context(msg.into(), Box::new(self))
    }
}
