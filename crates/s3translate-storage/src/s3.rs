//! Amazon S3 backend
//!
//! Credentials and region come from the AWS SDK default provider chain
//! (IAM role on Lambda, environment or profile locally).

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

use crate::{ObjectStore, ObjectSummary, PutObject, Result, StorageError, StoredObject};

/// Load the shared AWS SDK configuration, optionally pinning the region.
pub async fn load_sdk_config(region: Option<&str>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(Region::new(region.to_string()));
    }
    loader.load().await
}

#[derive(Debug, Clone)]
pub struct S3Store {
    client: Client,
}

impl S3Store {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_sdk_config(config: &SdkConfig) -> Self {
        Self::new(Client::new(config))
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put_object(&self, bucket: &str, key: &str, object: PutObject) -> Result<()> {
        let bytes = object.body.len();
        let metadata: HashMap<String, String> = object.metadata.into_iter().collect();

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(object.body))
            .set_content_type(object.content_type)
            .set_metadata((!metadata.is_empty()).then_some(metadata))
            .send()
            .await
            .map_err(|e| {
                StorageError::request_failed(
                    "PutObject",
                    bucket,
                    key,
                    DisplayErrorContext(&e).to_string(),
                )
            })?;

        debug!(bucket, key, bytes, "put object");
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject> {
        let output = match self.client.get_object().bucket(bucket).key(key).send().await {
            Ok(output) => output,
            Err(err) => {
                let err = err.into_service_error();
                if err.is_no_such_key() {
                    return Err(StorageError::not_found(bucket, key));
                }
                return Err(StorageError::request_failed(
                    "GetObject",
                    bucket,
                    key,
                    DisplayErrorContext(&err).to_string(),
                ));
            }
        };

        let content_type = output.content_type().map(str::to_string);
        let metadata = output
            .metadata()
            .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::body_read(bucket, key, e.to_string()))?
            .into_bytes();

        debug!(bucket, key, bytes = body.len(), "got object");
        Ok(StoredObject {
            key: key.to_string(),
            body,
            content_type,
            metadata,
        })
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectSummary>> {
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .into_paginator()
            .send();

        let mut summaries = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| {
                StorageError::request_failed(
                    "ListObjectsV2",
                    bucket,
                    prefix,
                    DisplayErrorContext(&e).to_string(),
                )
            })?;

            for object in page.contents() {
                let Some(key) = object.key() else {
                    continue;
                };
                summaries.push(ObjectSummary {
                    key: key.to_string(),
                    last_modified: object.last_modified().and_then(|dt| {
                        DateTime::<Utc>::from_timestamp(dt.secs(), dt.subsec_nanos())
                    }),
                    size: object.size().unwrap_or_default().max(0) as u64,
                });
            }
        }

        debug!(bucket, prefix, count = summaries.len(), "listed objects");
        Ok(summaries)
    }
}
