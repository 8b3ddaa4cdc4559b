/*!
 * Advanced SubStation Alpha reader and writer.
 *
 * Dialogue text is mapped onto the model three ways:
 * - text made only of karaoke blocks is expanded into timed words, with the
 *   tagged text kept verbatim in `Segment::raw_text`
 * - text with any other override block is kept verbatim in
 *   `Segment::raw_text` next to a single word holding the stripped text
 * - plain text becomes a single word, with `\N` turned into a newline
 *
 * Lines the model has no place for are carried in `SubtitleMeta`:
 * `Comment` and other non-dialogue events, dialogue without visible text,
 * and whole sections such as `[Fonts]` or `[Graphics]`. The writer re-emits
 * all of these unchanged.
 */

use log::{debug, warn};

use super::timestamp::{format_ass, parse_ass};
use super::{Parser, Writer};
use crate::errors::FormatError;
use crate::karaoke::{self, Syllable};
use crate::model::segment::strip_override_tags;
use crate::model::style::STYLE_FORMAT_FIELDS;
use crate::model::{AssStyle, EventFields, RawSection, Segment, Subtitle, SubtitleMeta, Word};

const EVENTS: &str = "[Events]";
const STYLES: &str = "[V4+ Styles]";

const EVENT_FORMAT_FIELDS: [&str; 10] = [
    "Layer", "Start", "End", "Style", "Name", "MarginL", "MarginR", "MarginV", "Effect", "Text",
];

const DEFAULT_SCRIPT_INFO: [(&str, &str); 7] = [
    ("Title", "subweaver generated subtitles"),
    ("ScriptType", "v4.00+"),
    ("WrapStyle", "0"),
    ("ScaledBorderAndShadow", "yes"),
    ("Collisions", "Normal"),
    ("PlayResX", "1920"),
    ("PlayResY", "1080"),
];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    None,
    ScriptInfo,
    Styles,
    Events,
    Other,
}

pub struct AssFormat;

// Parser state for one document
struct AssReader {
    section: Section,
    meta: SubtitleMeta,
    style_format: Option<Vec<String>>,
    event_format: Option<Vec<String>>,
    events_line: Option<usize>,
    segments: Vec<Segment>,
    styles_seen: usize,
    dialogues_seen: usize,
}

impl AssReader {
    fn new() -> Self {
        AssReader {
            section: Section::None,
            meta: SubtitleMeta::default(),
            style_format: None,
            event_format: None,
            events_line: None,
            segments: Vec::new(),
            styles_seen: 0,
            dialogues_seen: 0,
        }
    }

    fn enter_section(&mut self, name: &str, line: usize) {
        self.section = match name.to_ascii_lowercase().as_str() {
            "[script info]" => Section::ScriptInfo,
            "[v4+ styles]" | "[v4 styles]" => Section::Styles,
            "[events]" => {
                self.events_line = Some(line);
                Section::Events
            }
            _ => {
                debug!("Keeping unknown ASS section {} at line {} verbatim", name, line);
                self.meta.extra_sections.push(RawSection {
                    name: name.to_string(),
                    lines: Vec::new(),
                });
                Section::Other
            }
        };
    }

    fn keep_line(&mut self, line: &str) {
        if let Some(section) = self.meta.extra_sections.last_mut() {
            section.lines.push(line.to_string());
        }
    }

    fn read_line(&mut self, line_no: usize, line: &str) -> Result<(), FormatError> {
        if line.starts_with(';') || line.starts_with("!:") {
            return Ok(());
        }
        let Some((key, value)) = line.split_once(':') else {
            debug!("Ignoring ASS line {} without a key: {}", line_no, line);
            return Ok(());
        };
        let key = key.trim();
        let value = value.trim_start();

        match (self.section, key) {
            (Section::ScriptInfo, _) => {
                self.meta
                    .script_info
                    .push((key.to_string(), value.trim_end().to_string()));
            }
            (Section::Styles, "Format") => self.style_format = Some(split_format(value)),
            (Section::Styles, "Style") => self.read_style(line_no, value)?,
            (Section::Events, "Format") => self.event_format = Some(split_format(value)),
            (Section::Events, "Dialogue") => self.read_dialogue(line_no, line, value)?,
            (Section::Events, _) => {
                debug!("Keeping ASS {} event at line {} verbatim", key, line_no);
                self.meta.extra_events.push(line.to_string());
            }
            _ => {}
        }
        Ok(())
    }

    fn read_style(&mut self, line: usize, value: &str) -> Result<(), FormatError> {
        self.styles_seen += 1;
        let columns = self.style_format.as_ref().ok_or(FormatError::MissingFormatLine {
            section: STYLES,
            line,
        })?;
        let fields: Vec<&str> = value.splitn(columns.len(), ',').collect();
        if fields.len() < columns.len() {
            return Err(FormatError::InsufficientFields {
                cue: self.styles_seen,
                line,
                expected: columns.len(),
                found: fields.len(),
            });
        }

        let mut style = AssStyle::default();
        for (column, field) in columns.iter().zip(&fields) {
            match style.set_field(column, field) {
                Ok(true) => {}
                Ok(false) => debug!("Ignoring unknown style column {}", column),
                Err(()) => {
                    return Err(FormatError::InvalidField {
                        line,
                        field: column.clone(),
                        value: field.trim().to_string(),
                    });
                }
            }
        }
        self.meta.styles.push(style);
        Ok(())
    }

    fn read_dialogue(&mut self, line: usize, source: &str, value: &str) -> Result<(), FormatError> {
        self.dialogues_seen += 1;
        let cue = self.dialogues_seen;
        let columns = self.event_format.as_ref().ok_or(FormatError::MissingFormatLine {
            section: EVENTS,
            line,
        })?;
        let fields: Vec<&str> = value.splitn(columns.len(), ',').collect();
        if fields.len() < columns.len() {
            return Err(FormatError::InsufficientFields {
                cue,
                line,
                expected: columns.len(),
                found: fields.len(),
            });
        }

        let field = |name: &str| {
            columns
                .iter()
                .position(|c| c.eq_ignore_ascii_case(name))
                .map(|i| fields[i])
        };
        let timestamp = |name: &'static str| -> Result<u64, FormatError> {
            let raw = field(name).ok_or_else(|| FormatError::InvalidField {
                line,
                field: "Format".to_string(),
                value: format!("missing {} column", name),
            })?;
            parse_ass(raw).ok_or_else(|| FormatError::MalformedTimestamp {
                cue,
                line,
                value: raw.trim().to_string(),
            })
        };
        let int = |name: &str| -> Result<i32, FormatError> {
            match field(name).map(str::trim) {
                None | Some("") => Ok(0),
                Some(raw) => raw.parse().map_err(|_| FormatError::InvalidField {
                    line,
                    field: name.to_string(),
                    value: raw.to_string(),
                }),
            }
        };

        let start_ms = timestamp("Start")?;
        let end_ms = timestamp("End")?;
        if end_ms < start_ms {
            return Err(FormatError::InvertedCue { cue, line });
        }
        let text = field("Text").unwrap_or("").trim_end_matches('\r');

        let event = EventFields {
            layer: int("Layer")?,
            actor: field("Name").or_else(|| field("Actor")).unwrap_or("").trim().to_string(),
            margin_l: int("MarginL")?,
            margin_r: int("MarginR")?,
            margin_v: int("MarginV")?,
            effect: field("Effect").unwrap_or("").trim().to_string(),
        };
        let style = field("Style").map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

        let Some(mut segment) = dialogue_segment(text, start_ms, end_ms) else {
            warn!("Dialogue {} at line {} has no visible text, kept verbatim", cue, line);
            self.meta.extra_events.push(source.to_string());
            return Ok(());
        };
        segment.style = style;
        if event != EventFields::default() {
            segment.event = Some(event);
        }
        self.segments.push(segment);
        Ok(())
    }

    fn finish(mut self) -> Result<Subtitle, FormatError> {
        let events_line = self.events_line.ok_or(FormatError::MissingSection { section: EVENTS })?;
        if self.event_format.is_none() {
            return Err(FormatError::MissingFormatLine {
                section: EVENTS,
                line: events_line,
            });
        }
        if !self.meta.styles.is_empty() && self.meta.style("Default").is_none() {
            self.meta.default_style = self.meta.styles[0].name.clone();
        }

        let subtitle = Subtitle::new(self.segments).with_meta(self.meta);
        debug!(
            "Parsed {} ASS events with {} styles",
            subtitle.len(),
            subtitle.meta.styles.len()
        );
        Ok(subtitle)
    }
}

fn dialogue_segment(text: &str, start_ms: u64, end_ms: u64) -> Option<Segment> {
    if let Some(syllables) = karaoke::parse_syllables(text) {
        let words = karaoke_words(&syllables, start_ms, end_ms);
        if !words.is_empty() {
            let mut segment = Segment::from_sorted(words);
            segment.raw_text = Some(text.to_string());
            return Some(segment);
        }
    }

    let plain = strip_override_tags(text);
    if plain.trim().is_empty() {
        return None;
    }
    let mut segment = Segment::from_word(Word::new(plain, start_ms, end_ms));
    if text.contains('{') {
        segment.raw_text = Some(text.to_string());
    }
    Some(segment)
}

// Syllables joined without whitespace belong to the same word
fn karaoke_words(syllables: &[Syllable], start_ms: u64, end_ms: u64) -> Vec<Word> {
    let mut words: Vec<Word> = Vec::new();
    let mut text = String::new();
    let mut word_start = start_ms;
    let mut cursor = start_ms;

    let mut close = |text: &mut String, word_start: u64, cursor: &mut u64| {
        // Zero-length syllables still give the word a duration
        *cursor = (*cursor).max(word_start + 1);
        words.push(Word::new(text.trim(), word_start, *cursor));
        text.clear();
    };

    for syllable in syllables {
        if text.trim().is_empty() {
            text.clear();
            word_start = cursor;
        }
        let piece = strip_override_tags(&syllable.text);
        cursor = (cursor + u64::from(syllable.centiseconds) * 10).min(end_ms);
        text.push_str(&piece);
        if piece.ends_with(char::is_whitespace) && !text.trim().is_empty() {
            close(&mut text, word_start, &mut cursor);
        }
    }
    if !text.trim().is_empty() {
        close(&mut text, word_start, &mut cursor);
    }

    if let Some(last) = words.last_mut() {
        last.end_ms = last.end_ms.max(end_ms);
    }
    words
}

fn split_format(value: &str) -> Vec<String> {
    value.split(',').map(|c| c.trim().to_string()).collect()
}

impl Parser for AssFormat {
    fn parse(&self, text: &str) -> Result<Subtitle, FormatError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut reader = AssReader::new();

        for (i, raw) in text.lines().enumerate() {
            let line = raw.trim_end_matches('\r');
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with('[') && trimmed.ends_with(']') {
                reader.enter_section(trimmed, i + 1);
                continue;
            }
            if reader.section == Section::Other {
                reader.keep_line(line);
                continue;
            }
            reader.read_line(i + 1, line.trim_start())?;
        }
        reader.finish()
    }
}

impl AssFormat {
    fn style_table(meta: &SubtitleMeta) -> Vec<AssStyle> {
        let mut styles = meta.styles.clone();
        if meta.style(&meta.default_style).is_none() {
            styles.push(AssStyle::named(meta.default_style.clone()));
        }
        styles
    }

    fn dialogue_text(segment: &Segment, meta: &SubtitleMeta) -> String {
        if let Some(raw) = &segment.raw_text {
            return raw.clone();
        }
        let text = match meta.karaoke {
            Some(tag) => karaoke::render(segment, tag),
            None => segment.display_text(),
        };
        text.replace('\n', "\\N")
    }
}

impl Writer for AssFormat {
    fn write(&self, subtitle: &Subtitle) -> String {
        let meta = &subtitle.meta;
        let mut lines = vec!["[Script Info]".to_string()];
        if meta.script_info.is_empty() {
            lines.extend(DEFAULT_SCRIPT_INFO.iter().map(|(k, v)| format!("{}: {}", k, v)));
        } else {
            if !meta.script_info.iter().any(|(k, _)| k == "ScriptType") {
                lines.push("ScriptType: v4.00+".to_string());
            }
            lines.extend(meta.script_info.iter().map(|(k, v)| format!("{}: {}", k, v)));
        }

        let styles = Self::style_table(meta);
        lines.push(String::new());
        lines.push(STYLES.to_string());
        lines.push(format!("Format: {}", STYLE_FORMAT_FIELDS.join(", ")));
        for style in &styles {
            let values: Vec<String> = STYLE_FORMAT_FIELDS
                .iter()
                .map(|column| style.field(column).unwrap_or_default())
                .collect();
            lines.push(format!("Style: {}", values.join(",")));
        }

        lines.push(String::new());
        lines.push(EVENTS.to_string());
        lines.push(format!("Format: {}", EVENT_FORMAT_FIELDS.join(", ")));
        let default_event = EventFields::default();
        for segment in &subtitle.segments {
            let style = segment
                .style
                .as_deref()
                .filter(|name| styles.iter().any(|s| s.name == *name))
                .unwrap_or(&meta.default_style);
            let event = segment.event.as_ref().unwrap_or(&default_event);
            lines.push(format!(
                "Dialogue: {},{},{},{},{},{},{},{},{},{}",
                event.layer,
                format_ass(segment.start_ms()),
                format_ass(segment.end_ms()),
                style,
                event.actor,
                event.margin_l,
                event.margin_r,
                event.margin_v,
                event.effect,
                Self::dialogue_text(segment, meta)
            ));
        }
        lines.extend(meta.extra_events.iter().cloned());

        for section in &meta.extra_sections {
            lines.push(String::new());
            lines.push(section.name.clone());
            lines.extend(section.lines.iter().cloned());
        }
        lines.join("\n") + "\n"
    }
}
