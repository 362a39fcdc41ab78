// Configuration validation
//
// Validates that required fields are present and values are sensible

use crate::*;
use anyhow::{anyhow, bail, Result};
use tracing::warn;

/// Amazon Translate rejects TranslateText requests above this size.
const SERVICE_MAX_TEXT_BYTES: usize = 10_000;

pub fn validate_config(config: &RuntimeConfig) -> Result<()> {
    validate_translation_config(&config.translation)?;
    validate_client_config(&config.client)?;
    Ok(())
}

fn validate_translation_config(config: &TranslationConfig) -> Result<()> {
    if config.max_chunk_bytes == 0 {
        bail!("translation.max_chunk_bytes must be greater than 0");
    }

    if config.detection_sample_chars == 0 {
        bail!("translation.detection_sample_chars must be greater than 0");
    }

    if config.max_chunk_bytes > SERVICE_MAX_TEXT_BYTES {
        warn!(
            max_chunk_bytes = config.max_chunk_bytes,
            limit = SERVICE_MAX_TEXT_BYTES,
            "translation.max_chunk_bytes exceeds the service request limit; chunks will be rejected"
        );
    }

    Ok(())
}

fn validate_client_config(config: &ClientConfig) -> Result<()> {
    if config.timeout_secs == 0 {
        bail!("client.timeout_secs must be greater than 0");
    }

    if config.poll_secs == 0 {
        bail!("client.poll_secs must be greater than 0");
    }

    if config.poll_secs > config.timeout_secs {
        warn!(
            poll_secs = config.poll_secs,
            timeout_secs = config.timeout_secs,
            "client.poll_secs is larger than client.timeout_secs; only one poll will run"
        );
    }

    Ok(())
}

pub fn require_lambda_buckets(config: &BucketConfig) -> Result<LambdaBuckets> {
    let output = non_empty(&config.output)
        .ok_or_else(|| anyhow!("OUTPUT_BUCKET (buckets.output) is required for the Lambda handler"))?;
    let reports = non_empty(&config.reports).ok_or_else(|| {
        anyhow!("REPORTS_BUCKET (buckets.reports) is required for the Lambda handler")
    })?;

    Ok(LambdaBuckets {
        output: output.to_string(),
        reports: reports.to_string(),
    })
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
