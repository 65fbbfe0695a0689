//! Message construction error types.

use thiserror::Error;

/// Errors raised while building or rendering a message.
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("unsupported field separator {0:?}, only \"|\" is supported")]
    UnsupportedFieldSeparator(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
