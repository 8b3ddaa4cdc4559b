//! Timestamp syntax of the text formats. All values are milliseconds.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::validation::MAX_TIMESTAMP_MS;

// @const: HH:MM:SS,mmm; '.' is tolerated as the millisecond separator
static SRT_TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):(\d{2}):(\d{2})[,.](\d{3})$").expect("Invalid SRT timestamp regex")
});

// @const: [HH:]MM:SS.mmm
static VTT_TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(\d+):)?(\d{2}):(\d{2})\.(\d{3})$").expect("Invalid VTT timestamp regex")
});

// @const: H:MM:SS.cc
static ASS_TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):(\d{2}):(\d{2})\.(\d{2})$").expect("Invalid ASS timestamp regex")
});

fn to_ms(hours: u64, minutes: u64, seconds: u64, millis: u64) -> Option<u64> {
    if minutes >= 60 || seconds >= 60 {
        return None;
    }
    let ms = hours
        .checked_mul(3_600_000)?
        .checked_add(minutes * 60_000 + seconds * 1_000 + millis)?;
    (ms <= MAX_TIMESTAMP_MS).then_some(ms)
}

fn capture(caps: &regex::Captures, index: usize) -> Option<u64> {
    match caps.get(index) {
        Some(m) => m.as_str().parse().ok(),
        None => Some(0),
    }
}

/// Parse `HH:MM:SS,mmm`
pub fn parse_srt(value: &str) -> Option<u64> {
    let caps = SRT_TIMESTAMP_REGEX.captures(value.trim())?;
    to_ms(
        capture(&caps, 1)?,
        capture(&caps, 2)?,
        capture(&caps, 3)?,
        capture(&caps, 4)?,
    )
}

/// Parse `HH:MM:SS.mmm` or `MM:SS.mmm`
pub fn parse_vtt(value: &str) -> Option<u64> {
    let caps = VTT_TIMESTAMP_REGEX.captures(value.trim())?;
    to_ms(
        capture(&caps, 1)?,
        capture(&caps, 2)?,
        capture(&caps, 3)?,
        capture(&caps, 4)?,
    )
}

/// Parse `H:MM:SS.cc`
pub fn parse_ass(value: &str) -> Option<u64> {
    let caps = ASS_TIMESTAMP_REGEX.captures(value.trim())?;
    to_ms(
        capture(&caps, 1)?,
        capture(&caps, 2)?,
        capture(&caps, 3)?,
        capture(&caps, 4)? * 10,
    )
}

fn split(ms: u64) -> (u64, u64, u64, u64) {
    (
        ms / 3_600_000,
        (ms % 3_600_000) / 60_000,
        (ms % 60_000) / 1_000,
        ms % 1_000,
    )
}

/// Format in SRT format (HH:MM:SS,mmm)
pub fn format_srt(ms: u64) -> String {
    let (h, m, s, millis) = split(ms);
    format!("{:02}:{:02}:{:02},{:03}", h, m, s, millis)
}

/// Format in WebVTT format (HH:MM:SS.mmm)
pub fn format_vtt(ms: u64) -> String {
    let (h, m, s, millis) = split(ms);
    format!("{:02}:{:02}:{:02}.{:03}", h, m, s, millis)
}

/// Format in ASS format (H:MM:SS.cc), rounded to the nearest centisecond
pub fn format_ass(ms: u64) -> String {
    let (h, m, s, cs) = split(ms.saturating_add(5) / 10 * 10);
    format!("{}:{:02}:{:02}.{:02}", h, m, s, cs / 10)
}
