//! Error types for the HTTP automation store

use flow_designer::StoreError;
use thiserror::Error;

/// Result type alias using HttpStoreError
pub type Result<T> = std::result::Result<T, HttpStoreError>;

#[derive(Debug, Error)]
pub enum HttpStoreError {
    /// Transport failure: connect, timeout, body read
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx status
    #[error("API returned {status}: {message}")]
    Status { status: u16, message: String },

    /// 2xx with `success: false`
    #[error("API error: {0}")]
    Api(String),

    /// Body is not the expected envelope
    #[error("Could not decode API response: {0}")]
    Decode(String),

    /// `base_url` cannot be turned into a request URL
    #[error("Invalid API URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Created automation came back without an id
    #[error("API response carried no automation id")]
    MissingId,
}

impl From<HttpStoreError> for StoreError {
    fn from(err: HttpStoreError) -> Self {
        match err {
            HttpStoreError::Http(e) => StoreError::Unavailable(e.to_string()),
            err @ HttpStoreError::InvalidUrl { .. } => StoreError::Unavailable(err.to_string()),
            HttpStoreError::Status { status: 404, message } => StoreError::NotFound(message),
            err @ (HttpStoreError::Status { .. } | HttpStoreError::Api(_)) => {
                StoreError::Rejected(err.to_string())
            }
            err @ (HttpStoreError::Decode(_) | HttpStoreError::MissingId) => {
                StoreError::InvalidResponse(err.to_string())
            }
        }
    }
}
