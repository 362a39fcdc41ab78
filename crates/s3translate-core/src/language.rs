//! Supported languages, translation direction and the ASCII-ratio heuristic

use std::fmt;

/// ASCII ratio above which a document is labeled English.
pub const ENGLISH_ASCII_THRESHOLD: f64 = 0.8;

/// Languages handled by the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    English,
    Japanese,
}

impl Language {
    /// ISO 639-1 code understood by Amazon Translate.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Japanese => "ja",
        }
    }

    /// Label used in archived object keys and metadata.
    pub fn label(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Japanese => "japanese",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        if code.eq_ignore_ascii_case("en") {
            Some(Language::English)
        } else if code.eq_ignore_ascii_case("ja") {
            Some(Language::Japanese)
        } else {
            None
        }
    }

    pub fn other(&self) -> Self {
        match self {
            Language::English => Language::Japanese,
            Language::Japanese => Language::English,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Source and target of a translation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Direction {
    pub source: Language,
    pub target: Language,
}

impl Direction {
    pub const ENGLISH_TO_JAPANESE: Direction = Direction {
        source: Language::English,
        target: Language::Japanese,
    };

    pub const JAPANESE_TO_ENGLISH: Direction = Direction {
        source: Language::Japanese,
        target: Language::English,
    };

    /// Choose the direction from a detected source-language code.
    ///
    /// Only Japanese flips the direction; any other code, or no code at all,
    /// falls back to English to Japanese.
    pub fn from_detected(code: Option<&str>) -> Self {
        match code.and_then(Language::from_code) {
            Some(Language::Japanese) => Direction::JAPANESE_TO_ENGLISH,
            _ => Direction::ENGLISH_TO_JAPANESE,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.source.code(), self.target.code())
    }
}

/// Fraction of characters (not bytes) with a code point below 128.
///
/// Empty text has no characters to judge and counts as fully ASCII.
pub fn ascii_ratio(text: &str) -> f64 {
    let mut total = 0usize;
    let mut ascii = 0usize;
    for c in text.chars() {
        total += 1;
        if c.is_ascii() {
            ascii += 1;
        }
    }

    if total == 0 {
        return 1.0;
    }
    ascii as f64 / total as f64
}

/// Label the original document of a job. The translated document always gets
/// the other label.
pub fn classify_original(text: &str) -> Language {
    if ascii_ratio(text) > ENGLISH_ASCII_THRESHOLD {
        Language::English
    } else {
        Language::Japanese
    }
}
