// Lambda response payloads
//
// The body is a JSON document serialized into a string, the shape S3-triggered
// functions conventionally return.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    pub status_code: u16,
    pub body: String,
}

impl HandlerResponse {
    pub(crate) fn completed(processed_files: usize, now: DateTime<Utc>) -> Self {
        Self {
            status_code: 200,
            body: json!({
                "message": "Translation workflow completed successfully",
                "processed_files": processed_files,
                "timestamp": now.to_rfc3339(),
            })
            .to_string(),
        }
    }

    pub(crate) fn failed(error: &anyhow::Error) -> Self {
        Self {
            status_code: 500,
            body: json!({
                "error": format!("{:#}", error),
                "message": "Translation workflow failed",
            })
            .to_string(),
        }
    }
}
