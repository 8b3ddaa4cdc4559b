use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::Word;
use crate::errors::EditError;

// @const: ASS override block, e.g. {\b1\fad(200,0)}
pub(crate) static OVERRIDE_BLOCK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^}]*\}").expect("Invalid override block regex"));

/// Which end of a segment stays fixed when its duration changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    End,
}

/// How a segment span is shared between generated words
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimingDistribution {
    /// Every word gets the same share
    ByWordCount,
    /// Shares are proportional to word length
    #[default]
    ByCharCount,
}

/// ASS Dialogue fields that have no counterpart in other formats
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventFields {
    #[serde(default)]
    pub layer: i32,
    #[serde(default)]
    pub actor: String,
    #[serde(default)]
    pub margin_l: i32,
    #[serde(default)]
    pub margin_r: i32,
    #[serde(default)]
    pub margin_v: i32,
    #[serde(default)]
    pub effect: String,
}

/// One displayed cue: an ordered, non-empty run of words
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Words in time order
    pub words: Vec<Word>,

    /// ASS style name, falls back to the subtitle default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    /// WebVTT cue identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cue_id: Option<String>,

    /// Verbatim ASS text including override tags the model does not interpret
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,

    /// ASS event fields (layer, actor, margins, effect)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<EventFields>,

    /// Word indices that start a new display line
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub line_breaks: Vec<usize>,
}

impl Segment {
    /// Create a segment, sorting words by start time
    pub fn new(mut words: Vec<Word>) -> Result<Self, EditError> {
        if words.is_empty() {
            return Err(EditError::EmptySegment);
        }
        words.sort_by_key(|w| w.start_ms);
        Ok(Self::from_sorted(words))
    }

    /// Create a segment holding a single word
    pub fn from_word(word: Word) -> Self {
        Self::from_sorted(vec![word])
    }

    pub(crate) fn from_sorted(words: Vec<Word>) -> Self {
        Segment {
            words,
            style: None,
            cue_id: None,
            raw_text: None,
            event: None,
            line_breaks: Vec::new(),
        }
    }

    pub fn start_ms(&self) -> u64 {
        self.words.first().map_or(0, |w| w.start_ms)
    }

    pub fn end_ms(&self) -> u64 {
        self.words.last().map_or(0, |w| w.end_ms)
    }

    pub fn duration_ms(&self) -> u64 {
        self.end_ms().saturating_sub(self.start_ms())
    }

    /// Segment text: the verbatim ASS span when one was kept, otherwise the
    /// word texts joined by a single space
    pub fn text(&self) -> String {
        match &self.raw_text {
            Some(raw) => raw.clone(),
            None => self.joined_words(" "),
        }
    }

    /// Text rendered with `\n` at the recorded line breaks
    pub fn display_text(&self) -> String {
        if let Some(raw) = &self.raw_text {
            return raw.clone();
        }
        let mut out = String::new();
        for (i, word) in self.words.iter().enumerate() {
            if i > 0 {
                out.push(if self.line_breaks.contains(&i) { '\n' } else { ' ' });
            }
            out.push_str(&word.text);
        }
        out
    }

    /// Display text with ASS override blocks and hard breaks removed
    pub fn plain_text(&self) -> String {
        match &self.raw_text {
            Some(raw) => strip_override_tags(raw),
            None => self.display_text(),
        }
    }

    /// Number of display lines
    pub fn line_count(&self) -> usize {
        self.display_text().lines().count().max(1)
    }

    fn joined_words(&self, separator: &str) -> String {
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Move every word by `delta_ms`
    pub fn shift_by(&mut self, delta_ms: i64) -> Result<(), EditError> {
        let start_ms = self.start_ms();
        if delta_ms < 0 && delta_ms.unsigned_abs() > start_ms {
            return Err(EditError::NegativeTime { start_ms, delta_ms });
        }
        for word in &mut self.words {
            word.start_ms = word.start_ms.saturating_add_signed(delta_ms);
            word.end_ms = word.end_ms.saturating_add_signed(delta_ms);
        }
        Ok(())
    }

    /// Rescale word timings proportionally into `new_start..new_end`
    pub fn resize(&mut self, new_start_ms: u64, new_end_ms: u64) -> Result<(), EditError> {
        if new_end_ms <= new_start_ms {
            return Err(EditError::InvalidRange {
                start_ms: new_start_ms,
                end_ms: new_end_ms,
            });
        }

        let old_start = self.start_ms();
        let old_span = self.duration_ms() as u128;
        let new_span = (new_end_ms - new_start_ms) as u128;

        let map = |t: u64| -> u64 {
            if old_span == 0 {
                return new_start_ms;
            }
            let offset = (t - old_start) as u128;
            new_start_ms + ((offset * new_span + old_span / 2) / old_span) as u64
        };

        for word in &mut self.words {
            word.start_ms = map(word.start_ms);
            word.end_ms = map(word.end_ms);
        }
        if let Some(last) = self.words.last_mut() {
            last.end_ms = new_end_ms;
        }
        Ok(())
    }

    /// Change the duration keeping one end fixed
    pub fn set_duration(&mut self, duration_ms: u64, anchor: Anchor) -> Result<(), EditError> {
        match anchor {
            Anchor::Start => {
                let start = self.start_ms();
                self.resize(start, start + duration_ms)
            }
            Anchor::End => {
                let end = self.end_ms();
                if duration_ms > end {
                    return Err(EditError::NegativeTime {
                        start_ms: end,
                        delta_ms: -(duration_ms as i64),
                    });
                }
                self.resize(end - duration_ms, end)
            }
        }
    }

    /// Insert a word at its time-ordered position
    pub fn add_word(&mut self, word: Word) {
        let pos = self.words.partition_point(|w| w.start_ms <= word.start_ms);
        self.words.insert(pos, word);
        for b in &mut self.line_breaks {
            if *b > pos {
                *b += 1;
            }
        }
    }

    /// Remove and return the word at `index`
    pub fn remove_word(&mut self, index: usize) -> Result<Word, EditError> {
        let len = self.words.len();
        if index >= len {
            return Err(EditError::WordOutOfRange { index, len });
        }
        if len == 1 {
            return Err(EditError::EmptySegment);
        }
        let word = self.words.remove(index);
        let remaining = self.words.len();
        self.line_breaks = self
            .line_breaks
            .iter()
            .map(|&b| if b > index { b - 1 } else { b })
            .filter(|&b| b > 0 && b < remaining)
            .collect();
        self.line_breaks.dedup();
        Ok(word)
    }

    /// Split a single multi-token word into timed words
    ///
    /// Used for cue-level input (a whole phrase with one start/end). A
    /// segment that already has several words is left untouched.
    pub fn generate_word_timings(&mut self, strategy: TimingDistribution) {
        if self.words.len() != 1 {
            return;
        }
        let source = &self.words[0];
        let tokens: Vec<&str> = source.text.split_whitespace().collect();
        if tokens.len() < 2 {
            return;
        }

        let weights: Vec<u64> = tokens
            .iter()
            .map(|t| match strategy {
                TimingDistribution::ByWordCount => 1,
                TimingDistribution::ByCharCount => t.chars().count() as u64,
            })
            .collect();
        let words = distribute(&tokens, &weights, source.start_ms, source.end_ms, source.confidence);
        if self.raw_text.is_some() {
            warn!("Dropping raw text of segment at {}ms after word timing generation", self.start_ms());
            self.raw_text = None;
        }
        self.words = words;
        self.line_breaks.clear();
    }
}

/// Share `start..end` between tokens in proportion to their weights
pub(crate) fn distribute(
    tokens: &[&str],
    weights: &[u64],
    start_ms: u64,
    end_ms: u64,
    confidence: Option<f64>,
) -> Vec<Word> {
    let total: u64 = weights.iter().sum::<u64>().max(1);
    let span = end_ms.saturating_sub(start_ms) as u128;
    let mut cumulative = 0u64;
    let mut cursor = start_ms;

    tokens
        .iter()
        .zip(weights)
        .enumerate()
        .map(|(i, (token, weight))| {
            cumulative += weight;
            let end = if i + 1 == tokens.len() {
                end_ms
            } else {
                start_ms + ((span * cumulative as u128 + total as u128 / 2) / total as u128) as u64
            };
            let word = Word {
                text: token.to_string(),
                start_ms: cursor,
                end_ms: end,
                confidence,
            };
            cursor = end;
            word
        })
        .collect()
}

/// Remove `{...}` override blocks and turn ASS hard breaks into newlines
pub fn strip_override_tags(text: &str) -> String {
    OVERRIDE_BLOCK_REGEX
        .replace_all(text, "")
        .replace("\\N", "\n")
        .replace("\\n", "\n")
}
