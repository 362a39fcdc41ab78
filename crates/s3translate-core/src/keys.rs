//! Object key layout shared by the Lambda handler and the round-trip client
//!
//! Keys follow the lab's conventions:
//! - upload:      `{prefix}/{basename}`
//! - translated:  `{base}_translated_{timestamp}{ext}`
//! - reports:     `reports/{base}_{language}_{timestamp}{ext}`
//! - passthrough: `reports/{base}_{timestamp}{ext}`

use chrono::{DateTime, Utc};

use crate::language::Language;

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const REPORTS_PREFIX: &str = "reports/";
const TEXT_EXTENSIONS: [&str; 3] = [".txt", ".md", ".json"];

/// Render a job timestamp as `YYYYMMDD_HHMMSS`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Split a key into base and extension.
///
/// The extension starts at the last `.` of the final path segment and keeps
/// the dot. Leading dots of a segment never start an extension, so
/// `audit/.env` has no extension.
pub fn split_extension(key: &str) -> (&str, &str) {
    let segment_start = key.rfind('/').map(|i| i + 1).unwrap_or(0);
    let segment = &key[segment_start..];

    match segment.rfind('.') {
        Some(dot) if segment[..dot].bytes().any(|b| b != b'.') => {
            let split_at = segment_start + dot;
            (&key[..split_at], &key[split_at..])
        }
        _ => (key, ""),
    }
}

/// Key prefix that every translation of `key` starts with.
pub fn translated_prefix(key: &str) -> String {
    let (base, _) = split_extension(key);
    format!("{}_translated_", base)
}

pub fn translated_key(key: &str, timestamp: &str) -> String {
    let (_, ext) = split_extension(key);
    format!("{}{}{}", translated_prefix(key), timestamp, ext)
}

pub fn report_key(key: &str, language: Language, timestamp: &str) -> String {
    let (base, ext) = split_extension(key);
    format!(
        "{}{}_{}_{}{}",
        REPORTS_PREFIX,
        base,
        language.label(),
        timestamp,
        ext
    )
}

/// Reports key for content that is copied without translation.
pub fn passthrough_report_key(key: &str, timestamp: &str) -> String {
    let (base, ext) = split_extension(key);
    format!("{}{}_{}{}", REPORTS_PREFIX, base, timestamp, ext)
}

pub fn upload_key(prefix: &str, basename: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        basename.to_string()
    } else {
        format!("{}/{}", prefix, basename)
    }
}

/// Whether an object can be decoded and translated as text.
///
/// Objects without a content type are assumed to be `text/plain`.
pub fn is_text_like(content_type: Option<&str>, key: &str) -> bool {
    let content_type = content_type.unwrap_or("text/plain");
    if content_type.trim().to_ascii_lowercase().starts_with("text/") {
        return true;
    }
    TEXT_EXTENSIONS.iter().any(|ext| key.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamp_format() {
        let at = Utc.with_ymd_and_hms(2026, 3, 7, 9, 5, 1).unwrap();
        assert_eq!(format_timestamp(at), "20260307_090501");
    }

    #[test]
    fn split_extension_cases() {
        assert_eq!(split_extension("audit/report.txt"), ("audit/report", ".txt"));
        assert_eq!(split_extension("report.tar.gz"), ("report.tar", ".gz"));
        assert_eq!(split_extension("audit/report"), ("audit/report", ""));
        assert_eq!(split_extension("audit.d/report"), ("audit.d/report", ""));
        assert_eq!(split_extension("audit/.env"), ("audit/.env", ""));
        assert_eq!(split_extension("audit/..notes.md"), ("audit/..notes", ".md"));
    }

    #[test]
    fn translated_keys() {
        assert_eq!(
            translated_key("audit/incident.txt", "20260101_000000"),
            "audit/incident_translated_20260101_000000.txt"
        );
        assert_eq!(translated_prefix("audit/incident.txt"), "audit/incident_translated_");
        assert_eq!(
            translated_key("notes", "20260101_000000"),
            "notes_translated_20260101_000000"
        );
    }

    #[test]
    fn report_keys() {
        assert_eq!(
            report_key("audit/incident.txt", Language::Japanese, "20260101_000000"),
            "reports/audit/incident_japanese_20260101_000000.txt"
        );
        assert_eq!(
            passthrough_report_key("audit/diagram.png", "20260101_000000"),
            "reports/audit/diagram_20260101_000000.png"
        );
    }

    #[test]
    fn upload_keys() {
        assert_eq!(upload_key("audit", "a.txt"), "audit/a.txt");
        assert_eq!(upload_key("audit/", "a.txt"), "audit/a.txt");
        assert_eq!(upload_key("", "a.txt"), "a.txt");
    }

    #[test]
    fn text_detection() {
        assert!(is_text_like(Some("text/plain; charset=utf-8"), "a.bin"));
        assert!(is_text_like(None, "a.bin"));
        assert!(is_text_like(Some("application/octet-stream"), "notes.md"));
        assert!(is_text_like(Some("application/json"), "data.json"));
        assert!(!is_text_like(Some("image/png"), "diagram.png"));
        assert!(!is_text_like(Some("application/pdf"), "report.pdf"));
    }
}
