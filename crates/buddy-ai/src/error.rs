use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("generation endpoint unreachable: {0}")]
    Unreachable(String),
    #[error("draft {variation} generation timed out after {after:?}")]
    Timeout { variation: u8, after: Duration },
    #[error("generation endpoint returned {status}: {message}")]
    Remote { status: u16, message: String },
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid config: {0}")]
    Config(String),
}
