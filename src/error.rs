//! Error types for the TalentGrid client

use std::time::Duration;
use thiserror::Error;

/// Client error types
///
/// Every failure a request can resolve to is one of these variants; the
/// client never swallows an error. Retry/backoff for anything other than the
/// single 401 renewal cycle is a caller concern.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("unauthorized: session renewal failed or was not possible")]
    Unauthorized,

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: serde_json::Value },

    #[error("request cancelled")]
    Cancelled,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ApiError {
    /// Classify a transport-level failure from the HTTP stack.
    pub(crate) fn from_transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            ApiError::Timeout(timeout)
        } else {
            ApiError::Network(err.to_string())
        }
    }

    /// HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Unauthorized => Some(401),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
