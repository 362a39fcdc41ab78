//! Error types for the storage crate

use thiserror::Error;

/// Error codes for programmatic handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// S001: Object does not exist
    S001NotFound,
    /// S002: Storage request failed (network, permissions, throttling)
    S002RequestFailed,
    /// S003: Response body could not be read
    S003BodyRead,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::S001NotFound => "S001",
            Self::S002RequestFailed => "S002",
            Self::S003BodyRead => "S003",
        }
    }
}

/// Errors returned by [`ObjectStore`](crate::ObjectStore) implementations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("[{code}] Object not found: s3://{bucket}/{key}")]
    NotFound {
        code: &'static str,
        bucket: String,
        key: String,
    },

    #[error("[{code}] {operation} failed for s3://{bucket}/{key}: {reason}")]
    RequestFailed {
        code: &'static str,
        operation: &'static str,
        bucket: String,
        key: String,
        reason: String,
    },

    #[error("[{code}] Failed to read body of s3://{bucket}/{key}: {reason}")]
    BodyRead {
        code: &'static str,
        bucket: String,
        key: String,
        reason: String,
    },
}

impl StorageError {
    pub fn not_found(bucket: &str, key: &str) -> Self {
        Self::NotFound {
            code: ErrorCode::S001NotFound.as_str(),
            bucket: bucket.to_string(),
            key: key.to_string(),
        }
    }

    pub fn request_failed(
        operation: &'static str,
        bucket: &str,
        key: &str,
        reason: impl Into<String>,
    ) -> Self {
        Self::RequestFailed {
            code: ErrorCode::S002RequestFailed.as_str(),
            operation,
            bucket: bucket.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub fn body_read(bucket: &str, key: &str, reason: impl Into<String>) -> Self {
        Self::BodyRead {
            code: ErrorCode::S003BodyRead.as_str(),
            bucket: bucket.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } => ErrorCode::S001NotFound,
            Self::RequestFailed { .. } => ErrorCode::S002RequestFailed,
            Self::BodyRead { .. } => ErrorCode::S003BodyRead,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type alias for StorageError
pub type Result<T> = std::result::Result<T, StorageError>;
