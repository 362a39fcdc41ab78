//! Core rules for the s3translate workflow
//!
//! Everything here is pure: no async, no I/O. The Lambda handler, the
//! archiver and the round-trip client all agree on chunk boundaries, language
//! labels and object key layout through this crate.

pub mod chunker;
pub mod keys;
pub mod language;

pub use chunker::{split_text, MAX_CHUNK_BYTES, PARAGRAPH_DELIMITER, SENTENCE_DELIMITER};
pub use keys::{
    format_timestamp, is_text_like, passthrough_report_key, report_key, split_extension,
    translated_key, translated_prefix, upload_key,
};
pub use language::{ascii_ratio, classify_original, Direction, Language, ENGLISH_ASCII_THRESHOLD};
