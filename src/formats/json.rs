/*!
 * Internal JSON format: a direct serde rendering of the `Subtitle` model.
 *
 * Times are written as seconds, `confidence` and empty segment fields are
 * omitted. This is the lossless reference format.
 */

use log::error;

use super::{Parser, Writer};
use crate::errors::FormatError;
use crate::model::Subtitle;

pub struct JsonFormat;

impl Parser for JsonFormat {
    fn parse(&self, text: &str) -> Result<Subtitle, FormatError> {
        let subtitle: Subtitle =
            serde_json::from_str(text).map_err(|e| FormatError::InvalidJson {
                line: e.line(),
                column: e.column(),
                message: e.to_string(),
            })?;

        check_timeline(&subtitle).map_err(|message| FormatError::InvalidJson {
            line: 0,
            column: 0,
            message,
        })?;
        Ok(subtitle)
    }
}

// Words need text and a positive span, both words and segments run in start order
fn check_timeline(subtitle: &Subtitle) -> Result<(), String> {
    let mut previous_start = 0;
    for (si, segment) in subtitle.segments.iter().enumerate() {
        let Some(first) = segment.words.first() else {
            return Err(format!("segment {} has no words", si));
        };
        if first.start_ms < previous_start {
            return Err(format!("segment {} starts before segment {}", si, si - 1));
        }
        previous_start = first.start_ms;

        let mut word_start = first.start_ms;
        for (wi, word) in segment.words.iter().enumerate() {
            if word.text.trim().is_empty() {
                return Err(format!("segment {} word {} has empty text", si, wi));
            }
            if word.end_ms <= word.start_ms {
                return Err(format!(
                    "segment {} word {} ends at {}ms, not after its start {}ms",
                    si, wi, word.end_ms, word.start_ms
                ));
            }
            if word.start_ms < word_start {
                return Err(format!("segment {} word {} is out of order", si, wi));
            }
            word_start = word.start_ms;
        }
    }
    Ok(())
}

impl Writer for JsonFormat {
    fn write(&self, subtitle: &Subtitle) -> String {
        match serde_json::to_string_pretty(subtitle) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize subtitle to JSON: {}", e);
                String::new()
            }
        }
    }
}
