/*!
 * WebVTT reader and writer.
 *
 * The `WEBVTT` header is mandatory. Cue identifiers are kept in
 * `Segment::cue_id`; cue settings are ignored. `NOTE`, `STYLE` and `REGION`
 * blocks are skipped.
 */

use log::{debug, warn};

use super::srt::{Block, blocks, cue_text, split_timing};
use super::timestamp::{format_vtt, parse_vtt};
use super::{Parser, Writer};
use crate::errors::FormatError;
use crate::model::{Segment, Subtitle, Word};

const HEADER: &str = "WEBVTT";

pub struct VttFormat;

fn has_header(line: &str) -> bool {
    match line.strip_prefix(HEADER) {
        Some(rest) => rest.is_empty() || rest.starts_with([' ', '\t']),
        None => false,
    }
}

impl VttFormat {
    fn parse_cue(cue: usize, block: &Block) -> Result<Segment, FormatError> {
        let (cue_id, offset) = if block.lines[0].contains("-->") {
            (None, 0)
        } else {
            (Some(block.lines[0].trim().to_string()), 1)
        };

        let timing = block.lines.get(offset).ok_or(FormatError::TruncatedCue {
            cue,
            line: block.line_no(0),
        })?;
        let line = block.line_no(offset);
        let (start, end) =
            split_timing(timing).ok_or(FormatError::MissingArrow { cue, line })?;
        let parse = |value: &str| {
            parse_vtt(value).ok_or_else(|| FormatError::MalformedTimestamp {
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
        let mut segment = Segment::from_word(Word::new(text.join("\n"), start_ms, end_ms));
        segment.cue_id = cue_id;
        Ok(segment)
    }
}

impl Parser for VttFormat {
    fn parse(&self, text: &str) -> Result<Subtitle, FormatError> {
        let blocks = blocks(text);
        let header = blocks.first().ok_or(FormatError::MissingHeader {
            expected: HEADER,
            line: 1,
        })?;
        if header.first_line != 1 || !has_header(header.lines[0].trim_end()) {
            return Err(FormatError::MissingHeader {
                expected: HEADER,
                line: 1,
            });
        }

        let mut segments = Vec::new();
        for block in &blocks[1..] {
            let first = block.lines[0].trim_start();
            if first.starts_with("NOTE") {
                debug!("Skipping NOTE block at line {}", block.first_line);
                continue;
            }
            if first.starts_with("STYLE") || first.starts_with("REGION") {
                warn!(
                    "Dropping unsupported {} block at line {}",
                    first.split_whitespace().next().unwrap_or(first),
                    block.first_line
                );
                continue;
            }
            segments.push(Self::parse_cue(segments.len() + 1, block)?);
        }

        let subtitle = Subtitle::new(segments);
        let overlaps = subtitle.overlaps();
        if !overlaps.is_empty() {
            warn!("Found {} overlapping subtitle entries", overlaps.len());
        }
        debug!("Parsed {} VTT cues", subtitle.len());
        Ok(subtitle)
    }
}

impl Writer for VttFormat {
    fn write(&self, subtitle: &Subtitle) -> String {
        let mut out = String::from(HEADER);
        out.push('\n');
        for segment in &subtitle.segments {
            out.push('\n');
            if let Some(id) = &segment.cue_id {
                out.push_str(id);
                out.push('\n');
            }
            out.push_str(&format!(
                "{} --> {}\n{}\n",
                format_vtt(segment.start_ms()),
                format_vtt(segment.end_ms()),
                cue_text(segment)
            ));
        }
        out
    }
}
