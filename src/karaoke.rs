/*!
 * ASS karaoke timing.
 *
 * Each word is highlighted for its own duration in centiseconds. The per-word
 * values always add up to the rounded segment duration:
 * - a word rounding to 0 cs gets 1 cs, taken from the next word that has more
 *   than 1 cs to spare
 * - whatever difference remains is settled on the last word, borrowing from
 *   earlier words when the last word cannot absorb it
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::segment::OVERRIDE_BLOCK_REGEX;
use crate::model::{KaraokeTag, Segment};

// @const: one karaoke override block, e.g. {\kf45}
static KARAOKE_BLOCK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\{\\(kf|ko|k|K)(\d+)\}$").expect("Invalid karaoke block regex")
});

/// One highlighted unit read back from tagged text
#[derive(Debug, Clone, PartialEq)]
pub struct Syllable {
    pub text: String,
    pub centiseconds: u32,
    pub tag: KaraokeTag,
}

fn round_cs(ms: u64) -> i64 {
    ((ms + 5) / 10) as i64
}

/// Per-word highlight durations in centiseconds
pub fn durations(segment: &Segment) -> Vec<u32> {
    let words = &segment.words;
    if words.is_empty() {
        return Vec::new();
    }
    let target = round_cs(segment.duration_ms());
    let mut cs: Vec<i64> = words.iter().map(|w| round_cs(w.duration_ms())).collect();
    let last = cs.len() - 1;

    for i in 0..cs.len() {
        if cs[i] == 0 {
            cs[i] = 1;
            if let Some(j) = (i + 1..cs.len()).find(|&j| cs[j] > 1) {
                cs[j] -= 1;
            }
        }
    }

    let mut remainder = target - cs.iter().sum::<i64>();
    if remainder >= 0 {
        cs[last] += remainder;
    } else {
        // Keep every word at 1 cs if possible, then give up on that floor
        for floor in [1, 0] {
            for value in cs.iter_mut().rev() {
                if remainder == 0 {
                    break;
                }
                let take = (-remainder).min((*value - floor).max(0));
                *value -= take;
                remainder += take;
            }
        }
    }

    cs.into_iter().map(|v| v as u32).collect()
}

/// Dialogue text with one karaoke block per word
pub fn render(segment: &Segment, tag: KaraokeTag) -> String {
    segment
        .words
        .iter()
        .zip(durations(segment))
        .map(|(word, cs)| format!("{{\\{}{}}}{}", tag.as_str(), cs, word.text))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split text made only of karaoke blocks and plain text into syllables
///
/// Returns `None` when the text carries any other override block, has text
/// before the first karaoke block, or has no karaoke block at all.
pub fn parse_syllables(text: &str) -> Option<Vec<Syllable>> {
    let mut syllables: Vec<Syllable> = Vec::new();
    let mut cursor = 0;

    for block in OVERRIDE_BLOCK_REGEX.find_iter(text) {
        let between = &text[cursor..block.start()];
        match syllables.last_mut() {
            Some(previous) => previous.text.push_str(between),
            None if between.trim().is_empty() => {}
            None => return None,
        }

        let caps = KARAOKE_BLOCK_REGEX.captures(block.as_str())?;
        let tag = caps[1].parse::<KaraokeTag>().ok()?;
        let centiseconds = caps[2].parse::<u32>().ok()?;
        syllables.push(Syllable {
            text: String::new(),
            centiseconds,
            tag,
        });
        cursor = block.end();
    }

    let previous = syllables.last_mut()?;
    previous.text.push_str(&text[cursor..]);
    Some(syllables)
}
