/*!
 * Segmentation engine: groups a validated word stream into display lines
 * and lines into segments.
 *
 * Lines are filled greedily. A line accepts the next word while its joined
 * text plus one trailing separator column stays within `max_chars` and, when
 * set, its span stays within `max_duration_ms`. When a break is forced the
 * engine prefers to break after recent sentence punctuation, then clause
 * punctuation, and otherwise before the incoming word. A word wider than
 * `max_chars` gets a line of its own and is never split.
 *
 * Up to `max_lines` consecutive lines form one segment; the line starts are
 * kept in `Segment::line_breaks`. A silence longer than `max_gap_ms` always
 * opens a new segment.
 */

pub mod breaks;

use log::{debug, warn};

use crate::app_config::SegmentationConfig;
use crate::errors::ConfigurationError;
use crate::model::{Segment, Subtitle, SubtitleMeta, Word};

use breaks::{BreakStrength, break_strength};

/// Result of a segmentation run
#[derive(Debug, Clone, PartialEq)]
pub struct Segmentation {
    pub subtitle: Subtitle,
    /// Input positions of words dropped for empty text
    pub dropped: Vec<usize>,
}

// Half-open word range of one display line
#[derive(Debug, Clone, Copy, PartialEq)]
struct Line {
    start: usize,
    end: usize,
    opens_segment: bool,
}

impl Line {
    fn len(&self) -> usize {
        self.end - self.start
    }
}

// Segment under construction
struct Pending {
    words: Vec<Word>,
    line_breaks: Vec<usize>,
    lines: usize,
}

impl Pending {
    fn new(words: Vec<Word>) -> Self {
        Pending {
            words,
            line_breaks: Vec::new(),
            lines: 1,
        }
    }

    fn into_segment(self) -> Segment {
        let mut segment = Segment::from_sorted(self.words);
        segment.line_breaks = self.line_breaks;
        segment
    }
}

/// Greedy line-fill segmenter
#[derive(Debug, Clone)]
pub struct Segmenter {
    config: SegmentationConfig,
}

impl Segmenter {
    /// Create a segmenter, rejecting invalid bounds up front
    pub fn new(config: SegmentationConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Segmenter { config })
    }

    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    /// Group `words` into segments, covering every non-empty word once in order
    pub fn segment(&self, words: Vec<Word>) -> Segmentation {
        let mut dropped = Vec::new();
        let mut kept = Vec::with_capacity(words.len());
        for (i, word) in words.into_iter().enumerate() {
            if word.text.trim().is_empty() {
                warn!("Dropping word {} with empty text at {}ms", i, word.start_ms);
                dropped.push(i);
            } else {
                kept.push(word);
            }
        }

        if kept.is_empty() {
            return Segmentation {
                subtitle: Subtitle::default(),
                dropped,
            };
        }

        let layout = Layout::new(&kept, &self.config);
        let mut lines = layout.fill_lines();
        layout.balance_trailing_lines(&mut lines);
        let segments = self.group_lines(kept, &lines);

        debug!(
            "Segmented into {} lines and {} segments",
            lines.len(),
            segments.len()
        );
        Segmentation {
            subtitle: Subtitle {
                segments,
                meta: SubtitleMeta::default(),
            },
            dropped,
        }
    }

    fn group_lines(&self, words: Vec<Word>, lines: &[Line]) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut source = words.into_iter();
        let mut current: Option<Pending> = None;

        for line in lines {
            let line_words: Vec<Word> = source.by_ref().take(line.len()).collect();
            current = match current.take() {
                Some(mut pending) if self.continues(&pending, line, &line_words) => {
                    pending.line_breaks.push(pending.words.len());
                    pending.words.extend(line_words);
                    pending.lines += 1;
                    Some(pending)
                }
                previous => {
                    if let Some(pending) = previous {
                        segments.push(pending.into_segment());
                    }
                    Some(Pending::new(line_words))
                }
            };
        }
        if let Some(pending) = current {
            segments.push(pending.into_segment());
        }
        segments
    }

    // Whether `line` may be appended to the segment under construction
    fn continues(&self, pending: &Pending, line: &Line, line_words: &[Word]) -> bool {
        if line.opens_segment || pending.lines >= self.config.max_lines {
            return false;
        }
        match (self.config.max_duration_ms, pending.words.first(), line_words.last()) {
            (Some(max), Some(first), Some(last)) => {
                last.end_ms.saturating_sub(first.start_ms) <= max
            }
            _ => true,
        }
    }
}

// Width and duration arithmetic over a fixed word slice
struct Layout<'a> {
    words: &'a [Word],
    config: &'a SegmentationConfig,
    // prefix[i] is the summed char length of words[..i]
    prefix: Vec<usize>,
}

impl<'a> Layout<'a> {
    fn new(words: &'a [Word], config: &'a SegmentationConfig) -> Self {
        let mut prefix = Vec::with_capacity(words.len() + 1);
        prefix.push(0);
        for word in words {
            let last = prefix[prefix.len() - 1];
            prefix.push(last + word.char_len());
        }
        Layout {
            words,
            config,
            prefix,
        }
    }

    /// Joined width of `words[start..end]` with single spaces
    fn width(&self, start: usize, end: usize) -> usize {
        self.prefix[end] - self.prefix[start] + (end - start).saturating_sub(1)
    }

    fn span_ms(&self, start: usize, end: usize) -> u64 {
        self.words[end - 1]
            .end_ms
            .saturating_sub(self.words[start].start_ms)
    }

    fn overflows(&self, start: usize, end: usize) -> bool {
        if self.width(start, end) + 1 > self.config.max_chars {
            return true;
        }
        self.config
            .max_duration_ms
            .is_some_and(|max| self.span_ms(start, end) > max)
    }

    fn gap_before(&self, i: usize) -> bool {
        self.config.max_gap_ms.is_some_and(|max| {
            self.words[i]
                .start_ms
                .saturating_sub(self.words[i - 1].end_ms)
                > max
        })
    }

    fn fill_lines(&self) -> Vec<Line> {
        let mut lines = Vec::new();
        let mut start = 0;
        let mut opens_segment = true;

        for i in 1..self.words.len() {
            if self.gap_before(i) {
                lines.push(Line {
                    start,
                    end: i,
                    opens_segment,
                });
                start = i;
                opens_segment = true;
                continue;
            }
            while start < i && self.overflows(start, i + 1) {
                let at = self.break_point(start, i);
                lines.push(Line {
                    start,
                    end: at,
                    opens_segment,
                });
                start = at;
                opens_segment = false;
            }
        }
        lines.push(Line {
            start,
            end: self.words.len(),
            opens_segment,
        });
        lines
    }

    /// Index that starts the next line when word `i` no longer fits
    fn break_point(&self, start: usize, i: usize) -> usize {
        let window_start = i.saturating_sub(self.config.punctuation_lookback).max(start);
        let mut clause = None;
        for k in (window_start..i).rev() {
            match break_strength(&self.words[k].text) {
                BreakStrength::Sentence => return k + 1,
                BreakStrength::Clause if clause.is_none() => clause = Some(k + 1),
                _ => {}
            }
        }
        clause.unwrap_or(i)
    }

    /// Pull words into short lines that close a segment run
    fn balance_trailing_lines(&self, lines: &mut [Line]) {
        let min = self.config.min_words_per_line;
        if min == 0 {
            return;
        }
        for li in 1..lines.len() {
            let trailing = li + 1 == lines.len() || lines[li + 1].opens_segment;
            if !trailing || lines[li].opens_segment {
                continue;
            }
            while lines[li].len() < min
                && lines[li - 1].len() > min
                && !self.overflows(lines[li].start - 1, lines[li].end)
            {
                lines[li - 1].end -= 1;
                lines[li].start -= 1;
            }
        }
    }
}
