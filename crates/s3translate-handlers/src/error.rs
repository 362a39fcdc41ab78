//! Error types for translation and object processing

use s3translate_storage::StorageError;
use thiserror::Error;

/// A single call to the translation service failed.
#[derive(Debug, Clone, Error)]
pub enum TranslateError {
    #[error("[T001] {operation} failed: {message}")]
    Service {
        operation: &'static str,
        message: String,
    },
}

impl TranslateError {
    pub fn service(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Service {
            operation,
            message: message.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Service { .. } => "T001",
        }
    }
}

/// Failure to process one uploaded object.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("[P002] Object s3://{bucket}/{key} is not valid UTF-8 text: {message}")]
    InvalidText {
        bucket: String,
        key: String,
        message: String,
    },
}

impl ProcessError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Storage(err) => err.code().as_str(),
            Self::InvalidText { .. } => "P002",
        }
    }

    /// Error type string for logs and responses
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Storage(_) => "StorageFailed",
            Self::InvalidText { .. } => "InvalidText",
        }
    }
}
