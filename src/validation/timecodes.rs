/*!
 * Timing repair rules shared by the validator and the subtitle model.
 *
 * Repairs are local and deterministic:
 * - inverted ranges are swapped
 * - items out of start order are stably sorted
 * - empty ranges get a minimum duration anchored at the start
 * - an item running into its successor is clamped to the successor's start
 *
 * Every repair produces a `TimingWarning`; nothing here fails.
 */

use log::warn;

use crate::model::{Segment, Word};

/// Minimum duration assigned to a word whose range collapsed, in ms
pub const MIN_WORD_DURATION_MS: u64 = 1;

/// Largest accepted timestamp (10 000 hours), in ms
pub const MAX_TIMESTAMP_MS: u64 = 36_000_000_000;

/// Types of timing anomalies
#[derive(Debug, Clone, PartialEq)]
pub enum TimingIssue {
    /// Word text was empty after trimming; the word was dropped
    EmptyText,
    /// A timestamp was negative and was clamped to zero
    NegativeTimestamp,
    /// End preceded start; the two were swapped
    InvertedRange { start_ms: u64, end_ms: u64 },
    /// Start equalled end; the minimum duration was assigned
    ZeroDuration { at_ms: u64 },
    /// The item ran into its successor and was clamped
    Overlap { overlap_ms: u64 },
    /// Clamping left no duration; the minimum duration was assigned
    CollapsedAfterClamp { at_ms: u64 },
    /// A segment record without words was split into timed words
    ExpandedSegment { words: usize },
    /// The item started before its predecessor; items were re-sorted
    OutOfOrder { start_ms: u64 },
}

impl std::fmt::Display for TimingIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimingIssue::EmptyText => write!(f, "Empty text, word dropped"),
            TimingIssue::NegativeTimestamp => write!(f, "Negative timestamp clamped to 0"),
            TimingIssue::InvertedRange { start_ms, end_ms } => {
                write!(f, "Inverted range {}ms > {}ms, swapped", start_ms, end_ms)
            }
            TimingIssue::ZeroDuration { at_ms } => {
                write!(
                    f,
                    "Zero duration at {}ms, extended to {}ms",
                    at_ms, MIN_WORD_DURATION_MS
                )
            }
            TimingIssue::Overlap { overlap_ms } => {
                write!(f, "Overlaps next item by {}ms, end clamped", overlap_ms)
            }
            TimingIssue::CollapsedAfterClamp { at_ms } => {
                write!(
                    f,
                    "No duration left at {}ms after clamping, extended to {}ms",
                    at_ms, MIN_WORD_DURATION_MS
                )
            }
            TimingIssue::ExpandedSegment { words } => {
                write!(f, "Segment without words expanded into {} words", words)
            }
            TimingIssue::OutOfOrder { start_ms } => {
                write!(f, "Starts at {}ms before its predecessor, items sorted", start_ms)
            }
        }
    }
}

/// A repaired, non-fatal timing anomaly
#[derive(Debug, Clone, PartialEq)]
pub struct TimingWarning {
    /// Position of the affected item in its input sequence
    pub index: usize,
    pub issue: TimingIssue,
}

impl TimingWarning {
    pub fn new(index: usize, issue: TimingIssue) -> Self {
        warn!("Timing repair at item {}: {}", index, issue);
        Self { index, issue }
    }
}

impl std::fmt::Display for TimingWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "item {}: {}", self.index, self.issue)
    }
}

/// Fix an inverted or empty range in place
pub fn repair_range(index: usize, word: &mut Word) -> Option<TimingWarning> {
    if word.end_ms < word.start_ms {
        let issue = TimingIssue::InvertedRange {
            start_ms: word.start_ms,
            end_ms: word.end_ms,
        };
        std::mem::swap(&mut word.start_ms, &mut word.end_ms);
        return Some(TimingWarning::new(index, issue));
    }
    if word.end_ms == word.start_ms {
        word.end_ms = word.start_ms.saturating_add(MIN_WORD_DURATION_MS);
        return Some(TimingWarning::new(
            index,
            TimingIssue::ZeroDuration { at_ms: word.start_ms },
        ));
    }
    None
}

/// Stable-sort words by start, keeping `indices` aligned
///
/// Returns one warning naming the first item found out of order.
pub fn restore_order(words: &mut Vec<Word>, indices: &mut Vec<usize>) -> Option<TimingWarning> {
    let pos = words
        .windows(2)
        .position(|pair| pair[1].start_ms < pair[0].start_ms)?;
    let warning = TimingWarning::new(
        indices[pos + 1],
        TimingIssue::OutOfOrder {
            start_ms: words[pos + 1].start_ms,
        },
    );

    let mut paired: Vec<(usize, Word)> = indices.drain(..).zip(words.drain(..)).collect();
    paired.sort_by_key(|(_, word)| word.start_ms);
    for (index, word) in paired {
        indices.push(index);
        words.push(word);
    }
    Some(warning)
}

/// Clamp every word that runs into its successor
///
/// `indices[i]` is the input position reported for `words[i]`.
pub fn clamp_word_overlaps(words: &mut [Word], indices: &[usize]) -> Vec<TimingWarning> {
    let mut warnings = Vec::new();
    for i in 0..words.len().saturating_sub(1) {
        let next_start = words[i + 1].start_ms;
        if let Some(w) = clamp_end(&mut words[i], next_start, indices[i]) {
            warnings.extend(w);
        }
    }
    warnings
}

/// Clamp every segment whose last word runs into the next segment
pub fn resolve_segment_overlaps(segments: &mut [Segment]) -> Vec<TimingWarning> {
    let mut warnings = Vec::new();
    for i in 0..segments.len().saturating_sub(1) {
        let next_start = segments[i + 1].start_ms();
        if let Some(last) = segments[i].words.last_mut() {
            if let Some(w) = clamp_end(last, next_start, i) {
                warnings.extend(w);
            }
        }
    }
    warnings
}

fn clamp_end(word: &mut Word, next_start: u64, index: usize) -> Option<Vec<TimingWarning>> {
    if word.end_ms <= next_start {
        return None;
    }
    let mut warnings = vec![TimingWarning::new(
        index,
        TimingIssue::Overlap {
            overlap_ms: word.end_ms - next_start,
        },
    )];
    word.end_ms = next_start;
    if word.end_ms <= word.start_ms {
        word.end_ms = word.start_ms.saturating_add(MIN_WORD_DURATION_MS);
        warnings.push(TimingWarning::new(
            index,
            TimingIssue::CollapsedAfterClamp { at_ms: word.start_ms },
        ));
    }
    Some(warnings)
}
