use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{AssStyle, Segment};
use crate::errors::{ConfigurationError, EditError};
use crate::validation::timecodes::{self, TimingWarning};

/// ASS karaoke tag flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KaraokeTag {
    /// `\k`: instant highlight
    K,
    /// `\kf`: sweeping fill
    Kf,
    /// `\ko`: outline highlight
    Ko,
}

impl KaraokeTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::K => "k",
            Self::Kf => "kf",
            Self::Ko => "ko",
        }
    }
}

impl fmt::Display for KaraokeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for KaraokeTag {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "k" => Ok(Self::K),
            // \K is the legacy spelling of \kf
            "kf" | "K" => Ok(Self::Kf),
            "ko" => Ok(Self::Ko),
            _ => Err(ConfigurationError::UnknownKaraokeTag(s.to_string())),
        }
    }
}

/// Global subtitle metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleMeta {
    /// Style used by segments that name no style of their own
    #[serde(default = "default_style_name")]
    pub default_style: String,

    /// ASS style table
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub styles: Vec<AssStyle>,

    /// ASS `[Script Info]` key/value pairs, in file order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub script_info: Vec<(String, String)>,

    /// Karaoke tag emitted per word by the ASS writer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub karaoke: Option<KaraokeTag>,

    /// ASS event lines kept verbatim: comments, non-dialogue events and
    /// dialogue without visible text
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_events: Vec<String>,

    /// ASS sections the parser does not model, such as `[Fonts]`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_sections: Vec<RawSection>,
}

/// A section carried through unchanged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSection {
    /// Header including the brackets, e.g. `[Graphics]`
    pub name: String,
    pub lines: Vec<String>,
}

fn default_style_name() -> String {
    "Default".to_string()
}

impl Default for SubtitleMeta {
    fn default() -> Self {
        SubtitleMeta {
            default_style: default_style_name(),
            styles: Vec::new(),
            script_info: Vec::new(),
            karaoke: None,
            extra_events: Vec::new(),
            extra_sections: Vec::new(),
        }
    }
}

impl SubtitleMeta {
    /// Look up a style by name
    pub fn style(&self, name: &str) -> Option<&AssStyle> {
        self.styles.iter().find(|s| s.name == name)
    }

    /// Value of a `[Script Info]` key
    pub fn info(&self, key: &str) -> Option<&str> {
        self.script_info
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set a `[Script Info]` key, keeping its position when present
    pub fn set_info(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.script_info.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.script_info.push((key.to_string(), value)),
        }
    }
}

/// Ordered collection of segments with style metadata
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Subtitle {
    pub segments: Vec<Segment>,

    #[serde(flatten)]
    pub meta: SubtitleMeta,
}

impl Subtitle {
    /// Create a subtitle, ordering segments by start time
    pub fn new(segments: Vec<Segment>) -> Self {
        let mut subtitle = Subtitle {
            segments,
            meta: SubtitleMeta::default(),
        };
        subtitle.sort();
        subtitle
    }

    pub fn with_meta(mut self, meta: SubtitleMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Segment texts, one per line
    pub fn text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn word_count(&self) -> usize {
        self.segments.iter().map(|s| s.words.len()).sum()
    }

    /// Stable sort by segment start
    pub fn sort(&mut self) {
        self.segments.sort_by_key(|s| s.start_ms());
    }

    /// Pairs `(i, overlap_ms)` where segment `i` runs into segment `i + 1`
    pub fn overlaps(&self) -> Vec<(usize, u64)> {
        self.segments
            .windows(2)
            .enumerate()
            .filter(|(_, pair)| pair[0].end_ms() > pair[1].start_ms())
            .map(|(i, pair)| (i, pair[0].end_ms() - pair[1].start_ms()))
            .collect()
    }

    /// Clamp overlapping segments the way the validator clamps words
    pub fn resolve_overlaps(&mut self) -> Vec<TimingWarning> {
        timecodes::resolve_segment_overlaps(&mut self.segments)
    }

    /// Shift every segment by `delta_ms`
    pub fn shift_all(&mut self, delta_ms: i64) -> Result<(), EditError> {
        if let Some(first) = self.segments.iter().map(|s| s.start_ms()).min() {
            if delta_ms < 0 && delta_ms.unsigned_abs() > first {
                return Err(EditError::NegativeTime { start_ms: first, delta_ms });
            }
        }
        for segment in &mut self.segments {
            segment.shift_by(delta_ms)?;
        }
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<(), EditError> {
        if index >= self.segments.len() {
            return Err(EditError::SegmentOutOfRange {
                index,
                len: self.segments.len(),
            });
        }
        Ok(())
    }

    /// Merge segment `second` into the directly preceding segment `first`
    pub fn merge_segments(&mut self, first: usize, second: usize) -> Result<(), EditError> {
        self.check_index(first)?;
        self.check_index(second)?;
        if second != first + 1 {
            return Err(EditError::InvalidMerge { first, second });
        }

        let tail = self.segments.remove(second);
        let head = &mut self.segments[first];
        if head.raw_text.is_some() || tail.raw_text.is_some() {
            head.raw_text = Some(format!("{} {}", head.text(), tail.text()));
        }
        let offset = head.words.len();
        head.line_breaks
            .extend(tail.line_breaks.iter().map(|b| b + offset));
        head.words.extend(tail.words);
        head.words.sort_by_key(|w| w.start_ms);
        Ok(())
    }

    /// Split segment `index` so that word `at` opens a new segment
    pub fn split_segment_at_word(&mut self, index: usize, at: usize) -> Result<(), EditError> {
        self.check_index(index)?;
        let segment = &mut self.segments[index];
        if at == 0 || at >= segment.words.len() {
            return Err(EditError::InvalidSplit(at));
        }

        if segment.raw_text.take().is_some() {
            warn!(
                "Segment {} carried raw ASS text; split halves fall back to plain word text",
                index
            );
        }
        let words = segment.words.split_off(at);
        let breaks: Vec<usize> = segment
            .line_breaks
            .iter()
            .filter(|&&b| b > at)
            .map(|b| b - at)
            .collect();
        segment.line_breaks.retain(|&b| b < at);

        let mut tail = Segment::from_sorted(words);
        tail.style = segment.style.clone();
        tail.event = segment.event.clone();
        tail.line_breaks = breaks;
        self.segments.insert(index + 1, tail);
        Ok(())
    }

    /// Remove and return segment `index`
    pub fn remove_segment(&mut self, index: usize) -> Result<Segment, EditError> {
        self.check_index(index)?;
        Ok(self.segments.remove(index))
    }
}
