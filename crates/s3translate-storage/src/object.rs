//! Object payloads exchanged with an [`ObjectStore`](crate::ObjectStore)

use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Content type written for translated and archived text.
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Body and attributes of an object about to be written.
#[derive(Debug, Clone, Default)]
pub struct PutObject {
    pub body: Bytes,
    pub content_type: Option<String>,
    pub metadata: BTreeMap<String, String>,
}

impl PutObject {
    pub fn new(body: impl Into<Bytes>) -> Self {
        Self {
            body: body.into(),
            ..Default::default()
        }
    }

    /// UTF-8 text stored as `text/plain; charset=utf-8`.
    pub fn text(text: impl Into<String>) -> Self {
        let text: String = text.into();
        Self::new(text).with_content_type(TEXT_CONTENT_TYPE)
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// An object read back from storage.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub body: Bytes,
    pub content_type: Option<String>,
    pub metadata: BTreeMap<String, String>,
}

/// Listing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    pub key: String,
    pub last_modified: Option<DateTime<Utc>>,
    pub size: u64,
}
