//! Amazon Translate implementation of both capabilities

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_translate::error::DisplayErrorContext;
use aws_sdk_translate::Client;
use s3translate_core::{Direction, Language};
use tracing::debug;

use crate::{LanguageDetector, TextTranslator, TranslateError};

const AUTO_DETECT: &str = "auto";

#[derive(Debug, Clone)]
pub struct AwsTranslate {
    client: Client,
}

impl AwsTranslate {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_sdk_config(config: &SdkConfig) -> Self {
        Self::new(Client::new(config))
    }

    async fn translate_text(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<aws_sdk_translate::operation::translate_text::TranslateTextOutput, TranslateError>
    {
        self.client
            .translate_text()
            .text(text)
            .source_language_code(source)
            .target_language_code(target)
            .send()
            .await
            .map_err(|e| TranslateError::service("TranslateText", DisplayErrorContext(&e).to_string()))
    }
}

#[async_trait]
impl LanguageDetector for AwsTranslate {
    /// Translates the sample toward English with an automatic source and
    /// reports the source language the service picked.
    async fn detect(&self, sample: &str) -> Result<Option<String>, TranslateError> {
        let output = self
            .translate_text(sample, AUTO_DETECT, Language::English.code())
            .await?;
        let code = output.source_language_code();
        debug!(detected = code, "language detection");
        Ok((!code.is_empty()).then(|| code.to_string()))
    }
}

#[async_trait]
impl TextTranslator for AwsTranslate {
    async fn translate(&self, text: &str, direction: Direction) -> Result<String, TranslateError> {
        let output = self
            .translate_text(text, direction.source.code(), direction.target.code())
            .await?;
        Ok(output.translated_text().to_string())
    }
}
