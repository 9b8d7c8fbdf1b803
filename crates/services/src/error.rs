//! Shared error types for the services crate.

use thiserror::Error;

use storage::StorageError;

/// Failures talking to the lesson server.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// The request could not be sent or the response could not be read.
    #[error("network error: {0}")]
    Network(String),
    /// The response body was not the expected JSON.
    #[error("malformed response: {0}")]
    Decode(String),
    /// A non-success status with a body that could not be decoded.
    #[error("server responded with status {0}")]
    Status(u16),
}

impl ApiError {
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Outcome of a progress synchronisation call, for callers that decide
/// their own retry or surfacing policy.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyncError {
    #[error("connection failed: {0}")]
    Network(String),
    /// The server answered with `success: false`.
    #[error("server rejected the request: {0}")]
    Application(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// The background push was cancelled or panicked.
    #[error("progress push did not finish: {0}")]
    Interrupted(String),
}

impl From<tokio::task::JoinError> for SyncError {
    fn from(err: tokio::task::JoinError) -> Self {
        SyncError::Interrupted(err.to_string())
    }
}

impl From<ApiError> for SyncError {
    fn from(err: ApiError) -> Self {
        SyncError::Network(err.to_string())
    }
}

/// Invalid client configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error(transparent)]
    InvalidCourse(#[from] lesson_core::model::ParseIdError),
}
