//! Error types for deckgen-core.

use thiserror::Error;

/// Errors from byte-signature detection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DetectError {
    #[error("empty file provided")]
    Empty,

    #[error("unrecognized file signature")]
    Unknown,
}

/// Errors from parsing a model response.
#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("response is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}
