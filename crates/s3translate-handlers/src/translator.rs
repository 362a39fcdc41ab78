//! Document translation
//!
//! The direction is decided once per document from a detection probe over the
//! first characters. The body is chunked under the service's byte limit and
//! translated chunk by chunk; a failed chunk is replaced by a marked copy of
//! its source text.

use s3translate_core::{split_text, Direction, MAX_CHUNK_BYTES, PARAGRAPH_DELIMITER};
use tracing::{error, info, warn};

use crate::{LanguageDetector, TextTranslator};

/// Characters sent to the detector.
pub const DETECTION_SAMPLE_CHARS: usize = 1000;

/// Result of translating one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub text: String,
    /// `None` when detection failed and `text` is the diagnostic fallback.
    pub direction: Option<Direction>,
    pub chunks: usize,
    pub failed_chunks: usize,
}

pub struct DocumentTranslator<D, T> {
    detector: D,
    translator: T,
    max_chunk_bytes: usize,
    sample_chars: usize,
}

impl<D, T> DocumentTranslator<D, T>
where
    D: LanguageDetector,
    T: TextTranslator,
{
    pub fn new(detector: D, translator: T) -> Self {
        Self {
            detector,
            translator,
            max_chunk_bytes: MAX_CHUNK_BYTES,
            sample_chars: DETECTION_SAMPLE_CHARS,
        }
    }

    pub fn with_limits(mut self, max_chunk_bytes: usize, sample_chars: usize) -> Self {
        self.max_chunk_bytes = max_chunk_bytes;
        self.sample_chars = sample_chars;
        self
    }

    /// Translate `text`, always returning something to store.
    pub async fn translate(&self, text: &str, filename: &str) -> String {
        self.translate_document(text, filename).await.text
    }

    pub async fn translate_document(&self, text: &str, filename: &str) -> Translation {
        let detected = match self.detector.detect(leading_chars(text, self.sample_chars)).await {
            Ok(code) => code,
            Err(e) => {
                error!(file = filename, error = %e, "language detection failed");
                return Translation {
                    text: format!("Translation Error: {}\n\nOriginal Content:\n{}", e, text),
                    direction: None,
                    chunks: 0,
                    failed_chunks: 0,
                };
            }
        };

        let direction = Direction::from_detected(detected.as_deref());
        info!(
            file = filename,
            detected = detected.as_deref().unwrap_or("unknown"),
            %direction,
            "detected language"
        );

        let chunks = split_text(text, self.max_chunk_bytes);
        let mut translated = Vec::with_capacity(chunks.len());
        let mut failed_chunks = 0;

        for (index, chunk) in chunks.iter().enumerate() {
            // The service rejects blank text
            if chunk.trim().is_empty() {
                translated.push(chunk.clone());
                continue;
            }

            match self.translator.translate(chunk, direction).await {
                Ok(result) => translated.push(result),
                Err(e) => {
                    warn!(
                        file = filename,
                        chunk = index,
                        bytes = chunk.len(),
                        error = %e,
                        "chunk translation failed"
                    );
                    failed_chunks += 1;
                    translated.push(format!("[Translation Error: {}]\n{}", e, chunk));
                }
            }
        }

        Translation {
            text: translated.join(PARAGRAPH_DELIMITER),
            direction: Some(direction),
            chunks: chunks.len(),
            failed_chunks,
        }
    }
}

/// The first `count` characters of `text`.
fn leading_chars(text: &str, count: usize) -> &str {
    match text.char_indices().nth(count) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
