//! Error handling and custom error types
//!
//! Provides unified error handling across the relay using thiserror.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The AI vendor could not be reached or answered with an error status.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// The AI vendor answered, but not with the shape we need.
    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),

    /// The request body could not be decoded.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Download, blob upload, or record update failed.
    #[error("Downstream error: {0}")]
    Downstream(String),

    #[error("Credentials error: {0}")]
    Credentials(String),

    #[error("Token signing error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invariant violation: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, Error>;
