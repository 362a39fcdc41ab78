// s3translate-storage - Object storage layer
//
// This crate provides the storage abstraction used by the Lambda handler and
// the round-trip client:
// - ObjectStore trait (bucket/key addressing, content type, user metadata)
// - S3Store backed by aws-sdk-s3
// - MemoryStore for tests

use async_trait::async_trait;

mod error;
mod memory;
mod object;
mod s3;

pub use error::{ErrorCode, Result, StorageError};
pub use memory::MemoryStore;
pub use object::{ObjectSummary, PutObject, StoredObject, TEXT_CONTENT_TYPE};
pub use s3::{load_sdk_config, S3Store};

/// Minimal object storage surface needed by the translation workflow.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write an object, replacing any existing object under the same key.
    async fn put_object(&self, bucket: &str, key: &str, object: PutObject) -> Result<()>;

    /// Read an object with its content type and user metadata.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject>;

    /// List every object whose key starts with `prefix`, following pagination.
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectSummary>>;
}
