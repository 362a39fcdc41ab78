//! Error taxonomy for the round-trip client

use s3translate_storage::StorageError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoundtripError {
    /// Source file missing or unreadable; nothing was sent.
    #[error("[R001] Source file not found: {}", .path.display())]
    MissingSource { path: PathBuf },

    /// Batch pattern matched nothing.
    #[error("[R001] No files found: {}/{pattern}", .dir.display())]
    NoSourceFiles { dir: PathBuf, pattern: String },

    #[error("[R001] {0}")]
    InvalidInput(String),

    #[error("[R002] Upload failed: {0}")]
    Upload(#[source] StorageError),

    #[error(
        "[R003] Timed out after {}s waiting for s3://{bucket}/{prefix}*{extension}",
        .waited.as_secs()
    )]
    Timeout {
        bucket: String,
        prefix: String,
        extension: String,
        waited: Duration,
    },

    #[error("[R004] Download failed: {0}")]
    Download(#[source] StorageError),

    #[error("[R005] Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RoundtripError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingSource { .. } | Self::NoSourceFiles { .. } | Self::InvalidInput(_) => {
                "R001"
            }
            Self::Upload(_) => "R002",
            Self::Timeout { .. } => "R003",
            Self::Download(_) => "R004",
            Self::Io { .. } => "R005",
        }
    }

    /// Process exit code: 2 for invalid input, 1 for everything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::MissingSource { .. } | Self::NoSourceFiles { .. } | Self::InvalidInput(_) => 2,
            _ => 1,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
