use thiserror::Error;

/// Top-level error type for the Trailwise system.
///
/// Each variant wraps a subsystem-specific error. Subsystem crates define
/// their own error types and implement `From<SubsystemError> for
/// TrailwiseError` so that the `?` operator works seamlessly across crate
/// boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TrailwiseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dialogue error: {0}")]
    Dialogue(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for TrailwiseError {
    fn from(err: toml::de::Error) -> Self {
        TrailwiseError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for TrailwiseError {
    fn from(err: toml::ser::Error) -> Self {
        TrailwiseError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for TrailwiseError {
    fn from(err: serde_json::Error) -> Self {
        TrailwiseError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Trailwise operations.
pub type Result<T> = std::result::Result<T, TrailwiseError>;
