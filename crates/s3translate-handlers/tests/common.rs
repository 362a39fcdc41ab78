// Shared fakes for the workflow tests
#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use s3translate_core::Direction;
use s3translate_handlers::{LanguageDetector, TextTranslator, TranslateError};
use std::sync::Arc;

/// Detector that returns a fixed answer and records every sample it sees.
#[derive(Clone)]
pub struct ScriptedDetector {
    answer: Result<Option<String>, TranslateError>,
    pub samples: Arc<Mutex<Vec<String>>>,
}

impl ScriptedDetector {
    pub fn detecting(code: &str) -> Self {
        Self {
            answer: Ok(Some(code.to_string())),
            samples: Arc::default(),
        }
    }

    pub fn silent() -> Self {
        Self {
            answer: Ok(None),
            samples: Arc::default(),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            answer: Err(TranslateError::service("TranslateText", message)),
            samples: Arc::default(),
        }
    }
}

#[async_trait]
impl LanguageDetector for ScriptedDetector {
    async fn detect(&self, sample: &str) -> Result<Option<String>, TranslateError> {
        self.samples.lock().push(sample.to_string());
        self.answer.clone()
    }
}

/// Translator that tags text with the target code, failing on chosen calls.
#[derive(Clone, Default)]
pub struct TaggingTranslator {
    fail_calls: Vec<usize>,
    pub calls: Arc<Mutex<Vec<(String, Direction)>>>,
}

impl TaggingTranslator {
    pub fn failing_on(calls: &[usize]) -> Self {
        Self {
            fail_calls: calls.to_vec(),
            calls: Arc::default(),
        }
    }
}

#[async_trait]
impl TextTranslator for TaggingTranslator {
    async fn translate(&self, text: &str, direction: Direction) -> Result<String, TranslateError> {
        let index = {
            let mut calls = self.calls.lock();
            calls.push((text.to_string(), direction));
            calls.len() - 1
        };
        if self.fail_calls.contains(&index) {
            return Err(TranslateError::service("TranslateText", "throttled"));
        }
        Ok(format!("<{}>{}", direction.target.code(), text))
    }
}
