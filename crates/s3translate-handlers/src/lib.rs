//! Translation workflow for uploaded objects
//!
//! This crate composes the storage layer with the translation service:
//! language detection, chunked translation with per-chunk failure isolation,
//! dual-language archival and the per-object processing used by the Lambda.

pub mod archive;
pub mod aws;
pub mod error;
pub mod processor;
pub mod service;
pub mod translator;

pub use archive::{ArchivedPair, Archiver};
pub use aws::AwsTranslate;
pub use error::{ProcessError, TranslateError};
pub use processor::{ProcessOutcome, Processor, ProcessorConfig};
pub use service::{LanguageDetector, TextTranslator};
pub use translator::{DocumentTranslator, Translation};
