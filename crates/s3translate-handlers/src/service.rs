//! External capabilities used by the workflow
//!
//! Detection and translation are separate traits so either can be replaced
//! (or faked in tests) without touching the other.

use async_trait::async_trait;
use s3translate_core::Direction;

use crate::TranslateError;

#[async_trait]
pub trait LanguageDetector: Send + Sync {
    /// Detect the language of `sample`, returning its language code if the
    /// service reported one.
    async fn detect(&self, sample: &str) -> Result<Option<String>, TranslateError>;
}

#[async_trait]
pub trait TextTranslator: Send + Sync {
    async fn translate(&self, text: &str, direction: Direction) -> Result<String, TranslateError>;
}
