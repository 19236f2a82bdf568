//! Error types for the remote store and sync gateway

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    /// The store could not be reached, or rejected the request
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// A fetched document lacks required fields
    #[error("Malformed record: {reason}")]
    MalformedRecord { reason: String },
}

impl SyncError {
    pub fn transport(message: impl Into<String>) -> Self {
        SyncError::Transport {
            message: message.into(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        SyncError::MalformedRecord {
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        SyncError::transport(err.to_string())
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::transport(format!("invalid response body: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
