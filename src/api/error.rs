use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised while talking to the classification service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure: DNS, refused connection, TLS, body read.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {status}")]
    Status { status: StatusCode },
    /// The body did not match the expected schema.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;
