/*!
 * Validator turning raw transcription records into model-conformant words.
 *
 * The pass runs in three steps:
 * - `raw::read_records` checks shape and types and fails with a `SchemaError`
 * - each record is converted to milliseconds, with negative values clamped
 *   and values past `MAX_TIMESTAMP_MS` rejected
 * - the local repair rules from `timecodes` fix text, ranges, order and overlaps
 *
 * Given the same input the validator always returns the same words and the
 * same warnings.
 */

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::SchemaError;
use crate::model::Word;
use crate::model::segment::distribute;

use super::raw::{self, RawRecord, RawWord};
use super::timecodes::{self, MAX_TIMESTAMP_MS, TimingIssue, TimingWarning};

/// Unit of the numeric `start`/`end` values in raw input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    #[default]
    Seconds,
    Milliseconds,
}

impl TimeUnit {
    fn to_ms(self, value: f64) -> f64 {
        match self {
            TimeUnit::Seconds => value * 1000.0,
            TimeUnit::Milliseconds => value,
        }
    }
}

/// Words that satisfy the word invariants, plus every repair applied
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Validated {
    pub words: Vec<Word>,
    pub warnings: Vec<TimingWarning>,
}

/// Boundary validator for raw word-level timing data
#[derive(Debug, Clone, Default)]
pub struct Validator {
    unit: TimeUnit,
}

impl Validator {
    /// Create a validator reading seconds
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unit(unit: TimeUnit) -> Self {
        Validator { unit }
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Validate and repair a raw transcription document
    pub fn validate(&self, value: &Value) -> Result<Validated, SchemaError> {
        let records = raw::read_records(value)?;
        let mut warnings = Vec::new();
        let mut items: Vec<(usize, Word)> = Vec::new();
        let mut index = 0;

        for record in records {
            match record {
                RawRecord::Word(raw) => {
                    items.push((index, self.convert(index, raw, &mut warnings)?));
                    index += 1;
                }
                RawRecord::Segment(words) => {
                    for raw in words {
                        items.push((index, self.convert(index, raw, &mut warnings)?));
                        index += 1;
                    }
                }
                RawRecord::Phrase(raw) => {
                    let word = self.convert(index, raw, &mut warnings)?;
                    items.extend(expand_phrase(index, word, &mut warnings));
                    index += 1;
                }
            }
        }

        let words = repair(items, &mut warnings);
        debug!(
            "Validated {} raw items into {} words with {} warnings",
            index,
            words.len(),
            warnings.len()
        );
        Ok(Validated { words, warnings })
    }

    /// Apply the repair rules to words that are already typed
    pub fn validate_words(&self, words: Vec<Word>) -> Validated {
        let mut warnings = Vec::new();
        let items = words
            .into_iter()
            .enumerate()
            .map(|(i, mut w)| {
                w.text = w.text.trim().to_string();
                (i, w)
            })
            .collect();
        let words = repair(items, &mut warnings);
        Validated { words, warnings }
    }

    fn convert(
        &self,
        index: usize,
        raw: RawWord,
        warnings: &mut Vec<TimingWarning>,
    ) -> Result<Word, SchemaError> {
        let mut clamp = |field: &str, value: f64| {
            if value < 0.0 {
                warnings.push(TimingWarning::new(index, TimingIssue::NegativeTimestamp));
                return Ok(0);
            }
            let ms = self.unit.to_ms(value).round();
            if ms > MAX_TIMESTAMP_MS as f64 {
                return Err(SchemaError::InvalidValue {
                    path: format!("{}.{}", raw.path, field),
                    message: format!("{} is past the supported time range", value),
                });
            }
            Ok(ms as u64)
        };
        let start_ms = clamp("start", raw.start)?;
        let end_ms = clamp("end", raw.end)?;
        Ok(Word {
            text: raw.text.trim().to_string(),
            start_ms,
            end_ms,
            confidence: raw.confidence,
        })
    }
}

// A segment record without nested words is split by character count
fn expand_phrase(
    index: usize,
    mut word: Word,
    warnings: &mut Vec<TimingWarning>,
) -> Vec<(usize, Word)> {
    if word.text.split_whitespace().nth(1).is_none() {
        return vec![(index, word)];
    }
    if let Some(w) = timecodes::repair_range(index, &mut word) {
        warnings.push(w);
    }
    let tokens: Vec<&str> = word.text.split_whitespace().collect();
    let weights: Vec<u64> = tokens.iter().map(|t| t.chars().count() as u64).collect();
    let words = distribute(&tokens, &weights, word.start_ms, word.end_ms, word.confidence);
    warnings.push(TimingWarning::new(
        index,
        TimingIssue::ExpandedSegment { words: words.len() },
    ));
    words.into_iter().map(|w| (index, w)).collect()
}

fn repair(items: Vec<(usize, Word)>, warnings: &mut Vec<TimingWarning>) -> Vec<Word> {
    let mut indices = Vec::with_capacity(items.len());
    let mut words = Vec::with_capacity(items.len());

    for (index, mut word) in items {
        if word.text.is_empty() {
            warnings.push(TimingWarning::new(index, TimingIssue::EmptyText));
            continue;
        }
        if let Some(w) = timecodes::repair_range(index, &mut word) {
            warnings.push(w);
        }
        indices.push(index);
        words.push(word);
    }

    if let Some(w) = timecodes::restore_order(&mut words, &mut indices) {
        warnings.push(w);
    }
    warnings.extend(timecodes::clamp_word_overlaps(&mut words, &indices));
    words
}
