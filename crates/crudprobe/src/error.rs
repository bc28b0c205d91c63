// Error types for the crudprobe engine

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can escape an engine operation.
///
/// Most heuristic failures never become errors: an absent button, a
/// missing marker, or a transient page wobble degrade to outcome
/// records instead. These variants are the ones that reach a caller.
#[derive(Debug, Error)]
pub enum Error {
    /// A page-driver call failed in a way no component absorbed
    ///
    /// Reaches the module-pass boundary, where the run logs it as a
    /// critical FAIL for that module and moves on.
    #[error("Driver error: {0}")]
    Driver(#[from] crudprobe_driver::DriverError),

    /// Login never succeeded within the bounded retries
    ///
    /// Fatal to the run; no module is attempted.
    #[error("Login failed after {attempts} attempts")]
    LoginFailed { attempts: u32 },

    /// Configuration could not be read or parsed
    #[error("Config error: {0}")]
    Config(String),

    /// Report export failed
    #[error("Report export failed: {0}")]
    Report(#[from] csv::Error),

    /// JSON report export failed
    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error with additional context
    #[error("{0}: {1}")]
    Context(String, #[source] Box<Error>),
}

impl Error {
    /// Adds context to the error
    pub fn context(self, msg: impl Into<String>) -> Self {
        Error::Context(msg.into(), Box::new(self))
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}
