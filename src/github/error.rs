//! Failure taxonomy for the contents API.

use reqwest::StatusCode;
use thiserror::Error;

/// Error returned by a [`ContentsApi`](super::ContentsApi) call.
///
/// Every variant is a structured outcome so callers branch on the status,
/// never on message text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Missing, invalid or expired credential (HTTP 401).
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Resource does not exist (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Remote refused the request (hash mismatch, validation, permissions).
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// Transport failure before a response arrived.
    #[error("Network error: {0}")]
    Network(String),

    /// Response arrived but could not be understood.
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build an error from a non-success status and the remote's message, if any.
    pub fn from_status(status: StatusCode, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| generic_message(status));

        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized(message),
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            _ => ApiError::Rejected {
                status: status.as_u16(),
                message,
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    /// True when the remote rejected a write because the content hash was
    /// missing or stale.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            ApiError::Rejected {
                status: 409 | 422,
                ..
            }
        )
    }

    /// HTTP status behind this error, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized(_) => Some(401),
            ApiError::NotFound(_) => Some(404),
            ApiError::Rejected { status, .. } => Some(*status),
            ApiError::Network(_) | ApiError::Decode(_) => None,
        }
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

fn generic_message(status: StatusCode) -> String {
    format!("GitHub API error (status {})", status.as_u16())
}
