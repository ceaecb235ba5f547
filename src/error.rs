//! Custom error types and handling
//!
//! This module defines the client's error taxonomy. Every failure of an
//! external call is converted into one of these variants at the call site,
//! and each variant carries the short message shown to the participant.

use crate::constants::messages;

/// Client-wide error type
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    // Authentication errors
    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Session expired")]
    SessionExpired,

    // Transport errors
    #[error("Backend unreachable: {0}")]
    BackendUnreachable(String),

    #[error("Operation timed out: {0}")]
    Timeout(String),

    #[error("Backend error ({status}): {detail}")]
    Backend { status: u16, detail: String },

    // Execution errors
    #[error("Execution error")]
    ExecutionError,

    // Cache errors
    #[error("Sync degraded: {0}")]
    SyncDegraded(String),

    // Local rejections
    #[error("Problem {0} is already solved")]
    AlreadySolved(i64),

    #[error("Operation already in progress: {0}")]
    OperationInProgress(&'static str),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    // Local persistence errors
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // Internal errors
    #[error("Internal client error")]
    Internal(#[from] anyhow::Error),
}

impl ClientError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AuthError(_) => "AUTH_ERROR",
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::SessionExpired => "SESSION_EXPIRED",
            Self::BackendUnreachable(_) => "BACKEND_UNREACHABLE",
            Self::Timeout(_) => "TIMEOUT",
            Self::Backend { .. } => "BACKEND_ERROR",
            Self::ExecutionError => "EXECUTION_ERROR",
            Self::SyncDegraded(_) => "SYNC_DEGRADED",
            Self::AlreadySolved(_) => "ALREADY_SOLVED",
            Self::OperationInProgress(_) => "OPERATION_IN_PROGRESS",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the caller must route the participant back to login
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::NotAuthenticated | Self::SessionExpired)
    }

    /// Short message suitable for a toast line
    ///
    /// Transport and internal details are logged, never shown.
    pub fn user_message(&self) -> String {
        match self {
            Self::AuthError(detail) => detail.clone(),
            Self::NotAuthenticated => "Please log in to continue.".to_string(),
            Self::SessionExpired => messages::TIME_UP.to_string(),
            Self::BackendUnreachable(e) => {
                tracing::warn!("Backend unreachable: {}", e);
                "Failed to connect to the backend service.".to_string()
            }
            Self::Timeout(what) => {
                format!("Request timed out while {what}. Is the backend running?")
            }
            Self::Backend { status, detail } => {
                tracing::warn!(status = %status, "Backend error: {}", detail);
                detail.clone()
            }
            Self::ExecutionError => messages::EXECUTION_FAILED.to_string(),
            Self::SyncDegraded(_) => messages::SYNC_DEGRADED.to_string(),
            Self::AlreadySolved(_) => "This challenge is already solved.".to_string(),
            Self::OperationInProgress(what) => format!("Please wait, {what} is still running."),
            Self::Validation(msg) => msg.clone(),
            Self::NotFound(what) => format!("{what} not found."),
            Self::Storage(e) | Self::Serialization(e) => {
                tracing::error!("Local state error: {}", e);
                "Local progress could not be saved.".to_string()
            }
            Self::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                "Something went wrong.".to_string()
            }
        }
    }
}

// Implement From for common error types
impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout("waiting for the backend".to_string())
        } else if err.is_decode() {
            ClientError::Serialization(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::Backend {
                status: status.as_u16(),
                detail: err.to_string(),
            }
        } else {
            ClientError::BackendUnreachable(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(err: validator::ValidationErrors) -> Self {
        ClientError::Validation(err.to_string())
    }
}

/// Result type alias using ClientError
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_error_message_is_opaque() {
        let err = ClientError::ExecutionError;
        assert_eq!(err.user_message(), messages::EXECUTION_FAILED);
        assert_eq!(err.error_code(), "EXECUTION_ERROR");
    }

    #[test]
    fn test_timeout_is_distinct_from_unreachable() {
        let timeout = ClientError::Timeout("loading problems".to_string());
        let unreachable = ClientError::BackendUnreachable("connection refused".to_string());
        assert_ne!(timeout.error_code(), unreachable.error_code());
        assert!(timeout.user_message().contains("loading problems"));
        assert!(!unreachable.user_message().contains("refused"));
    }

    #[test]
    fn test_requires_login() {
        assert!(ClientError::SessionExpired.requires_login());
        assert!(ClientError::NotAuthenticated.requires_login());
        assert!(!ClientError::ExecutionError.requires_login());
    }
}
