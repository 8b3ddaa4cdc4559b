//! Plain text writer: one line per segment, no timing.

use super::Writer;
use crate::model::Subtitle;

pub struct TxtFormat;

impl Writer for TxtFormat {
    fn write(&self, subtitle: &Subtitle) -> String {
        let mut out = String::new();
        for segment in &subtitle.segments {
            let line = segment.plain_text().split_whitespace().collect::<Vec<_>>().join(" ");
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}
