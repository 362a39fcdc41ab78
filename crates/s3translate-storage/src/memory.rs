//! In-memory object store
//!
//! Keeps objects per bucket in sorted maps so listings come back in key order,
//! as S3 returns them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};

use crate::{ObjectStore, ObjectSummary, PutObject, Result, StorageError, StoredObject};

#[derive(Debug, Clone)]
struct Entry {
    object: PutObject,
    last_modified: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct State {
    buckets: HashMap<String, BTreeMap<String, Entry>>,
    failing_lists: usize,
    failing_put_prefixes: Vec<String>,
    list_calls: usize,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object with an explicit modification time.
    pub fn insert_with_modified(
        &self,
        bucket: &str,
        key: &str,
        object: PutObject,
        last_modified: DateTime<Utc>,
    ) {
        self.state
            .lock()
            .buckets
            .entry(bucket.to_string())
            .or_default()
            .insert(
                key.to_string(),
                Entry {
                    object,
                    last_modified,
                },
            );
    }

    /// Make the next `count` listings fail with a request error.
    pub fn fail_next_lists(&self, count: usize) {
        self.state.lock().failing_lists = count;
    }

    /// Reject every write whose key starts with `prefix`.
    pub fn fail_puts_under(&self, prefix: &str) {
        self.state
            .lock()
            .failing_put_prefixes
            .push(prefix.to_string());
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        let state = self.state.lock();
        let entry = state.buckets.get(bucket)?.get(key)?;
        Some(to_stored(key, entry))
    }

    pub fn keys(&self, bucket: &str) -> Vec<String> {
        self.state
            .lock()
            .buckets
            .get(bucket)
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn list_calls(&self) -> usize {
        self.state.lock().list_calls
    }
}

fn to_stored(key: &str, entry: &Entry) -> StoredObject {
    StoredObject {
        key: key.to_string(),
        body: entry.object.body.clone(),
        content_type: entry.object.content_type.clone(),
        metadata: entry.object.metadata.clone(),
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put_object(&self, bucket: &str, key: &str, object: PutObject) -> Result<()> {
        let mut state = self.state.lock();
        if state
            .failing_put_prefixes
            .iter()
            .any(|prefix| key.starts_with(prefix.as_str()))
        {
            return Err(StorageError::request_failed(
                "PutObject",
                bucket,
                key,
                "injected failure",
            ));
        }

        state.buckets.entry(bucket.to_string()).or_default().insert(
            key.to_string(),
            Entry {
                object,
                last_modified: Utc::now(),
            },
        );
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject> {
        self.object(bucket, key)
            .ok_or_else(|| StorageError::not_found(bucket, key))
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectSummary>> {
        let mut state = self.state.lock();
        state.list_calls += 1;
        if state.failing_lists > 0 {
            state.failing_lists -= 1;
            return Err(StorageError::request_failed(
                "ListObjectsV2",
                bucket,
                prefix,
                "injected failure",
            ));
        }

        let Some(objects) = state.buckets.get(bucket) else {
            return Ok(Vec::new());
        };

        Ok(objects
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, entry)| ObjectSummary {
                key: key.clone(),
                last_modified: Some(entry.last_modified),
                size: entry.object.body.len() as u64,
            })
            .collect())
    }
}
