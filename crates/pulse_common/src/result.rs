//! Common result and error types for the Pulse models.

/// The standard result type for fallible internal operations.
///
/// `Err` indicates a broken internal invariant (a bug in a model), not a
/// misuse by the driver. Driver misuse is reported through the crate-specific
/// error enums (`SimError`, `ConfigError`).
pub type PulseResult<T> = Result<T, InternalError>;

/// An internal error indicating a bug in Pulse, not a user input problem.
#[derive(Debug, thiserror::Error)]
#[error("internal model error: {message}")]
pub struct InternalError {
    /// Description of the internal error.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}
