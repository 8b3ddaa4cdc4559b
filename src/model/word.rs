use serde::{Deserialize, Serialize};
use std::fmt;

use super::seconds;

/// A single recognised word with its timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Word text, never empty once validated
    pub text: String,

    /// Start time in ms
    #[serde(rename = "start", with = "seconds")]
    pub start_ms: u64,

    /// End time in ms, strictly after `start_ms` once validated
    #[serde(rename = "end", with = "seconds")]
    pub end_ms: u64,

    /// Recogniser confidence in 0.0..=1.0, absent when the source had none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Word {
    pub fn new(text: impl Into<String>, start_ms: u64, end_ms: u64) -> Self {
        Word {
            text: text.into(),
            start_ms,
            end_ms,
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }

    /// Display width in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} [{}ms-{}ms]", self.text, self.start_ms, self.end_ms)
    }
}
