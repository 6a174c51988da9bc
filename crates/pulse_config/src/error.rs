//! Configuration errors.

/// Failure to load `pulse.toml` or a bench file, or to resolve one against the other.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// Malformed TOML or an unknown key.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A field with no default was left out.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A parameter is out of range, e.g. `fifo.depth = 0`.
    #[error("validation error: {0}")]
    ValidationError(String),

    /// A bench step is inconsistent with the core it drives.
    #[error("bench '{bench}' step {step}: {reason}")]
    InvalidStep {
        /// Name of the bench file.
        bench: String,
        /// Zero-based index of the offending `[[step]]` entry.
        step: usize,
        /// What is wrong with the step.
        reason: String,
    },
}
