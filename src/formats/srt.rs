/*!
 * SubRip reader and writer.
 *
 * Cue numbering in the input is ignored: cues are ordered by start time and
 * renumbered from 1 on write. A cue without a `-->` timing arrow or without
 * text fails the whole parse.
 */

use log::{debug, warn};

use super::timestamp::{format_srt, parse_srt};
use super::{Parser, Writer};
use crate::errors::FormatError;
use crate::model::{Segment, Subtitle, Word};

/// A block of consecutive non-blank lines with the 1-based number of its first line
pub(crate) struct Block<'a> {
    pub first_line: usize,
    pub lines: Vec<&'a str>,
}

impl Block<'_> {
    pub fn line_no(&self, offset: usize) -> usize {
        self.first_line + offset
    }
}

/// Split text into blank-line separated blocks
pub(crate) fn blocks(text: &str) -> Vec<Block<'_>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut blocks = Vec::new();
    let mut current: Option<Block> = None;

    for (i, line) in text.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            if let Some(block) = current.take() {
                blocks.push(block);
            }
            continue;
        }
        current
            .get_or_insert_with(|| Block {
                first_line: i + 1,
                lines: Vec::new(),
            })
            .lines
            .push(line);
    }
    if let Some(block) = current {
        blocks.push(block);
    }
    blocks
}

/// Split a timing line into its start and end timestamp strings
///
/// Anything after the end timestamp (cue settings) is ignored.
pub(crate) fn split_timing(line: &str) -> Option<(&str, &str)> {
    let (start, rest) = line.split_once("-->")?;
    let end = rest.split_whitespace().next().unwrap_or("");
    Some((start.trim(), end))
}

pub struct SrtFormat;

impl SrtFormat {
    fn parse_cue(cue: usize, block: &Block) -> Result<Segment, FormatError> {
        let mut offset = 0;
        let first = block.lines[0].trim();
        if !first.contains("-->") && first.parse::<usize>().is_ok() {
            offset = 1;
        }

        let timing = block.lines.get(offset).ok_or(FormatError::TruncatedCue {
            cue,
            line: block.line_no(offset.saturating_sub(1)),
        })?;
        let line = block.line_no(offset);
        let (start, end) =
            split_timing(timing).ok_or(FormatError::MissingArrow { cue, line })?;
        let parse = |value: &str| {
            parse_srt(value).ok_or_else(|| FormatError::MalformedTimestamp {
                cue,
                line,
                value: value.to_string(),
            })
        };
        let start_ms = parse(start)?;
        let end_ms = parse(end)?;
        if end_ms < start_ms {
            return Err(FormatError::InvertedCue { cue, line });
        }

        let text: Vec<&str> = block.lines[offset + 1..].iter().map(|l| l.trim()).collect();
        if text.is_empty() {
            return Err(FormatError::TruncatedCue { cue, line });
        }
        Ok(Segment::from_word(Word::new(text.join("\n"), start_ms, end_ms)))
    }
}

impl Parser for SrtFormat {
    fn parse(&self, text: &str) -> Result<Subtitle, FormatError> {
        let segments = blocks(text)
            .iter()
            .enumerate()
            .map(|(i, block)| Self::parse_cue(i + 1, block))
            .collect::<Result<Vec<_>, _>>()?;

        let subtitle = Subtitle::new(segments);
        let overlaps = subtitle.overlaps();
        if !overlaps.is_empty() {
            warn!("Found {} overlapping subtitle entries", overlaps.len());
        }
        debug!("Parsed {} SRT cues", subtitle.len());
        Ok(subtitle)
    }
}

impl Writer for SrtFormat {
    fn write(&self, subtitle: &Subtitle) -> String {
        subtitle
            .segments
            .iter()
            .enumerate()
            .map(|(i, segment)| {
                format!(
                    "{}\n{} --> {}\n{}\n",
                    i + 1,
                    format_srt(segment.start_ms()),
                    format_srt(segment.end_ms()),
                    cue_text(segment)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Cue text without override tags or blank lines
pub(crate) fn cue_text(segment: &Segment) -> String {
    segment
        .plain_text()
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
