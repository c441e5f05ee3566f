//! Error types for the dialogue engine.

use trailwise_core::error::TrailwiseError;

/// Errors from the dialogue engine.
///
/// The engine never fails on gibberish, unicode, or very long text; those
/// all degrade to the contextual or fallback paths. The only error
/// conditions are caller-contract violations.
#[derive(Debug, thiserror::Error)]
pub enum DialogueError {
    #[error("assistant is disabled")]
    Disabled,
    #[error("input is empty or whitespace-only")]
    EmptyInput,
    #[error("malformed dialogue state: {0}")]
    MalformedState(String),
}

impl From<DialogueError> for TrailwiseError {
    fn from(err: DialogueError) -> Self {
        TrailwiseError::Dialogue(err.to_string())
    }
}
