// S3 event handling
//
// Records are processed one after another. A failure on one object is logged
// and the next record still runs; a malformed record aborts the event with a
// 500 response.

use anyhow::{anyhow, Context, Result};
use aws_lambda_events::event::s3::{S3Event, S3EventRecord};
use chrono::{DateTime, Utc};
use s3translate_handlers::{LanguageDetector, ProcessOutcome, Processor, TextTranslator};
use tracing::{error, info};

use crate::HandlerResponse;

/// Object addressed by one event record, with its key decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ObjectRef {
    pub bucket: String,
    pub key: String,
}

pub(crate) async fn handle_event<D, T>(
    event: &S3Event,
    processor: &Processor<D, T>,
    now: DateTime<Utc>,
) -> HandlerResponse
where
    D: LanguageDetector,
    T: TextTranslator,
{
    match process_records(&event.records, processor, now).await {
        Ok(processed) => HandlerResponse::completed(processed, now),
        Err(e) => {
            error!(error = %format!("{:#}", e), "error in lambda handler");
            HandlerResponse::failed(&e)
        }
    }
}

async fn process_records<D, T>(
    records: &[S3EventRecord],
    processor: &Processor<D, T>,
    now: DateTime<Utc>,
) -> Result<usize>
where
    D: LanguageDetector,
    T: TextTranslator,
{
    for (index, record) in records.iter().enumerate() {
        let object = object_ref(index, record)?;
        info!(bucket = %object.bucket, key = %object.key, "processing file");

        match processor
            .process_object(&object.bucket, &object.key, now)
            .await
        {
            Ok(ProcessOutcome::Translated { translated_key, .. }) => {
                info!(key = %object.key, translated = %translated_key, "successfully processed translation");
            }
            Ok(ProcessOutcome::Passthrough { report_key, .. }) => {
                info!(key = %object.key, report = %report_key, "copied unsupported file to reports");
            }
            Err(e) => {
                error!(
                    key = %object.key,
                    code = e.code(),
                    error_type = e.error_type(),
                    error = %e,
                    "error processing file"
                );
            }
        }
    }

    Ok(records.len())
}

pub(crate) fn object_ref(index: usize, record: &S3EventRecord) -> Result<ObjectRef> {
    let bucket = record
        .s3
        .bucket
        .name
        .clone()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| anyhow!("record {} has no bucket name", index))?;
    let raw_key = record
        .s3
        .object
        .key
        .as_deref()
        .filter(|key| !key.is_empty())
        .ok_or_else(|| anyhow!("record {} has no object key", index))?;
    let key = decode_key(raw_key).with_context(|| format!("record {} has an invalid key", index))?;

    Ok(ObjectRef { bucket, key })
}

/// Decode an event object key: `+` stands for a space, the rest is
/// percent-encoded.
pub(crate) fn decode_key(raw: &str) -> Result<String> {
    let spaced = raw.replace('+', " ");
    let decoded = urlencoding::decode(&spaced).context("object key is not valid UTF-8")?;
    Ok(decoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use s3translate_core::Direction;
    use s3translate_handlers::{DocumentTranslator, ProcessorConfig, TranslateError};
    use s3translate_storage::{MemoryStore, ObjectStore, PutObject};
    use std::sync::Arc;

    #[derive(Clone)]
    struct EchoService;

    #[async_trait]
    impl LanguageDetector for EchoService {
        async fn detect(&self, _sample: &str) -> Result<Option<String>, TranslateError> {
            Ok(Some("en".to_string()))
        }
    }

    #[async_trait]
    impl TextTranslator for EchoService {
        async fn translate(
            &self,
            text: &str,
            direction: Direction,
        ) -> Result<String, TranslateError> {
            Ok(format!("[{}] {}", direction.target.code(), text))
        }
    }

    fn processor(store: Arc<MemoryStore>) -> Processor<EchoService, EchoService> {
        Processor::new(
            store,
            DocumentTranslator::new(EchoService, EchoService),
            ProcessorConfig {
                output_bucket: "lab-output".to_string(),
                reports_bucket: "lab-reports".to_string(),
            },
        )
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap()
    }

    fn record(bucket: &str, key: &str) -> serde_json::Value {
        serde_json::json!({
            "eventVersion": "2.1",
            "eventSource": "aws:s3",
            "awsRegion": "ap-northeast-1",
            "eventTime": "2026-01-02T03:04:05.000Z",
            "eventName": "ObjectCreated:Put",
            "userIdentity": { "principalId": "EXAMPLE" },
            "requestParameters": { "sourceIPAddress": "127.0.0.1" },
            "responseElements": {
                "x-amz-request-id": "EXAMPLE123456789",
                "x-amz-id-2": "EXAMPLE123/5678abcdefghijklambdaisawesome/mnopqrstuvwxyzABCDEFGH"
            },
            "s3": {
                "s3SchemaVersion": "1.0",
                "configurationId": "translate-trigger",
                "bucket": {
                    "name": bucket,
                    "ownerIdentity": { "principalId": "EXAMPLE" },
                    "arn": format!("arn:aws:s3:::{}", bucket)
                },
                "object": {
                    "key": key,
                    "size": 1024,
                    "eTag": "0123456789abcdef0123456789abcdef",
                    "sequencer": "0A1B2C3D4E5F678901"
                }
            }
        })
    }

    fn event(records: Vec<serde_json::Value>) -> S3Event {
        serde_json::from_value(serde_json::json!({ "Records": records })).unwrap()
    }

    #[test]
    fn keys_are_url_decoded() {
        assert_eq!(
            decode_key("audit/incident+report%282%29.txt").unwrap(),
            "audit/incident report(2).txt"
        );
        assert_eq!(decode_key("audit/%E9%9A%9C%E5%AE%B3.txt").unwrap(), "audit/障害.txt");
        assert_eq!(decode_key("audit/a%2Bb.txt").unwrap(), "audit/a+b.txt");
    }

    #[test]
    fn record_fields_are_extracted() {
        let event = event(vec![record("lab-input", "audit/q1+summary.txt")]);
        assert_eq!(
            object_ref(0, &event.records[0]).unwrap(),
            ObjectRef {
                bucket: "lab-input".to_string(),
                key: "audit/q1 summary.txt".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn every_record_is_processed() {
        let store = Arc::new(MemoryStore::new());
        store
            .put_object("lab-input", "audit/a.txt", PutObject::text("Alpha."))
            .await
            .unwrap();
        store
            .put_object("lab-input", "audit/b c.txt", PutObject::text("Bravo."))
            .await
            .unwrap();

        let event = event(vec![
            record("lab-input", "audit/a.txt"),
            record("lab-input", "audit/b+c.txt"),
        ]);
        let response = handle_event(&event, &processor(store.clone()), now()).await;

        assert_eq!(response.status_code, 200);
        let body: serde_json::Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body["processed_files"], 2);
        assert_eq!(
            store.keys("lab-output"),
            vec![
                "audit/a_translated_20260102_030405.txt".to_string(),
                "audit/b c_translated_20260102_030405.txt".to_string(),
            ]
        );
        assert_eq!(store.keys("lab-reports").len(), 4);
    }

    #[tokio::test]
    async fn failing_record_does_not_stop_the_rest() {
        let store = Arc::new(MemoryStore::new());
        store
            .put_object("lab-input", "audit/present.txt", PutObject::text("Present."))
            .await
            .unwrap();

        let event = event(vec![
            record("lab-input", "audit/missing.txt"),
            record("lab-input", "audit/present.txt"),
        ]);
        let response = handle_event(&event, &processor(store.clone()), now()).await;

        assert_eq!(response.status_code, 200);
        assert_eq!(
            store.keys("lab-output"),
            vec!["audit/present_translated_20260102_030405.txt".to_string()]
        );
    }

    #[tokio::test]
    async fn malformed_record_fails_the_event() {
        let store = Arc::new(MemoryStore::new());
        let event = event(vec![record("", "audit/a.txt")]);

        let response = handle_event(&event, &processor(store), now()).await;

        assert_eq!(response.status_code, 500);
        let body: serde_json::Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body["error"], "record 0 has no bucket name");
    }
}
