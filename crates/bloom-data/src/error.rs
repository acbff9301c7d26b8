//! HTTP client error types.

use thiserror::Error;

/// Errors from talking to the storefront API or the geocoder.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The request never reached the server.
    #[error("Network error: {0}")]
    RequestError(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Non-2xx reply. `message` is the body's `message` or its plain text.
    #[error("HTTP {status}: {message}")]
    HttpError { status: u16, message: String },

    /// The reply body did not have the expected shape.
    #[error("Unexpected response body: {0}")]
    ParseError(String),

    #[error("Request timed out")]
    Timeout,

    /// A request body could not be encoded.
    #[error("Cannot encode request body: {0}")]
    JsonError(String),
}

impl FetchError {
    /// HTTP status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the request never got an answer.
    pub fn is_network(&self) -> bool {
        matches!(self, FetchError::RequestError(_) | FetchError::Timeout)
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::JsonError(e.to_string())
    }
}
