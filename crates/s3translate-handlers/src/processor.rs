//! Per-object processing for S3 upload events
//!
//! Text-like objects are translated, written to the output bucket and archived
//! in both languages. Anything else is copied to the reports bucket untouched.

use chrono::{DateTime, Utc};
use s3translate_core::{format_timestamp, is_text_like, translated_key, Direction};
use s3translate_storage::{ObjectStore, PutObject};
use std::sync::Arc;
use tracing::info;

use crate::{
    ArchivedPair, Archiver, DocumentTranslator, LanguageDetector, ProcessError, TextTranslator,
};

/// `translation-type` metadata value on translated objects.
const TRANSLATION_TYPE: &str = "english-japanese";

/// Buckets the processor writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorConfig {
    pub output_bucket: String,
    pub reports_bucket: String,
}

/// What happened to one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    Translated {
        translated_key: String,
        direction: Option<Direction>,
        failed_chunks: usize,
        archived: ArchivedPair,
    },
    Passthrough {
        report_key: String,
        content_type: Option<String>,
    },
}

pub struct Processor<D, T> {
    store: Arc<dyn ObjectStore>,
    translator: DocumentTranslator<D, T>,
    archiver: Archiver,
    output_bucket: String,
}

impl<D, T> Processor<D, T>
where
    D: LanguageDetector,
    T: TextTranslator,
{
    pub fn new(
        store: Arc<dyn ObjectStore>,
        translator: DocumentTranslator<D, T>,
        config: ProcessorConfig,
    ) -> Self {
        Self {
            archiver: Archiver::new(store.clone(), config.reports_bucket),
            store,
            translator,
            output_bucket: config.output_bucket,
        }
    }

    /// Process `bucket/key`, stamping every output with `now`.
    pub async fn process_object(
        &self,
        bucket: &str,
        key: &str,
        now: DateTime<Utc>,
    ) -> Result<ProcessOutcome, ProcessError> {
        let object = self.store.get_object(bucket, key).await?;
        let timestamp = format_timestamp(now);

        if !is_text_like(object.content_type.as_deref(), key) {
            info!(
                key,
                content_type = object.content_type.as_deref().unwrap_or("unknown"),
                "unsupported content type, copying as-is"
            );
            let content_type = object.content_type.clone();
            let report_key = self.archiver.copy_binary(key, object, &timestamp).await?;
            return Ok(ProcessOutcome::Passthrough {
                report_key,
                content_type,
            });
        }

        let original_text =
            std::str::from_utf8(&object.body).map_err(|e| ProcessError::InvalidText {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: e.to_string(),
            })?;

        let translation = self.translator.translate_document(original_text, key).await;

        let translated_key = translated_key(key, &timestamp);
        let translated = PutObject::text(translation.text.as_str())
            .with_metadata("original-file", key)
            .with_metadata("translation-timestamp", timestamp.as_str())
            .with_metadata("translation-type", TRANSLATION_TYPE);
        self.store
            .put_object(&self.output_bucket, &translated_key, translated)
            .await?;

        let archived = self
            .archiver
            .archive(key, original_text, &translation.text, &timestamp)
            .await?;

        info!(
            key,
            translated = %translated_key,
            chunks = translation.chunks,
            failed_chunks = translation.failed_chunks,
            "processed translation"
        );

        Ok(ProcessOutcome::Translated {
            translated_key,
            direction: translation.direction,
            failed_chunks: translation.failed_chunks,
            archived,
        })
    }
}
