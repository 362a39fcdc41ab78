//! Dual-language archival into the reports bucket

use s3translate_core::{classify_original, passthrough_report_key, report_key, Language};
use s3translate_storage::{ObjectStore, PutObject, StorageError, StoredObject};
use std::sync::Arc;
use tracing::info;

/// Keys written for one archived job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedPair {
    pub english_key: String,
    pub japanese_key: String,
    /// Label given to the original document.
    pub original_language: Language,
}

pub struct Archiver {
    store: Arc<dyn ObjectStore>,
    reports_bucket: String,
}

impl Archiver {
    pub fn new(store: Arc<dyn ObjectStore>, reports_bucket: impl Into<String>) -> Self {
        Self {
            store,
            reports_bucket: reports_bucket.into(),
        }
    }

    /// Store the original and translated text under their language labels.
    ///
    /// The original is English when more than 80% of its characters are
    /// ASCII; the translated text always takes the other label.
    pub async fn archive(
        &self,
        original_key: &str,
        original_text: &str,
        translated_text: &str,
        timestamp: &str,
    ) -> Result<ArchivedPair, StorageError> {
        let original_language = classify_original(original_text);
        let (english_text, japanese_text) = match original_language {
            Language::English => (original_text, translated_text),
            Language::Japanese => (translated_text, original_text),
        };

        let english_key = report_key(original_key, Language::English, timestamp);
        let japanese_key = report_key(original_key, Language::Japanese, timestamp);

        for (key, language, text) in [
            (&english_key, Language::English, english_text),
            (&japanese_key, Language::Japanese, japanese_text),
        ] {
            let object = PutObject::text(text)
                .with_metadata("language", language.label())
                .with_metadata("translation-timestamp", timestamp)
                .with_metadata("original-file", original_key);
            self.store
                .put_object(&self.reports_bucket, key, object)
                .await?;
        }

        info!(
            key = original_key,
            original = %original_language,
            english = %english_key,
            japanese = %japanese_key,
            "archived report variants"
        );

        Ok(ArchivedPair {
            english_key,
            japanese_key,
            original_language,
        })
    }

    /// Copy content that cannot be translated into the reports bucket as-is.
    pub async fn copy_binary(
        &self,
        original_key: &str,
        source: StoredObject,
        timestamp: &str,
    ) -> Result<String, StorageError> {
        let key = passthrough_report_key(original_key, timestamp);
        let mut object = PutObject::new(source.body)
            .with_metadata("original-file", original_key)
            .with_metadata("copy-timestamp", timestamp)
            .with_metadata("translation", "not-applicable");
        object.content_type = source.content_type;

        self.store
            .put_object(&self.reports_bucket, &key, object)
            .await?;

        info!(key = original_key, report = %key, "copied binary object to reports");
        Ok(key)
    }
}
