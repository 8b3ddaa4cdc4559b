//! Punctuation classes used to pick natural line breaks.

/// Strength of the punctuation a word ends with
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BreakStrength {
    None,
    Clause,
    Sentence,
}

// Closing quotes and brackets do not hide the punctuation before them
const CLOSERS: &[char] = &['"', '\'', ')', ']', '»', '”', '’', '」', '』'];

const SENTENCE_END: &[char] = &['.', '!', '?', '…', '。', '！', '？'];

const CLAUSE_END: &[char] = &[',', ';', ':', '-', '–', '—', '，', '、', '；', '：'];

/// Classify the trailing punctuation of a word
pub fn break_strength(text: &str) -> BreakStrength {
    let trimmed = text.trim_end_matches(CLOSERS);
    match trimmed.chars().last() {
        Some(c) if SENTENCE_END.contains(&c) => BreakStrength::Sentence,
        Some(c) if CLAUSE_END.contains(&c) => BreakStrength::Clause,
        _ => BreakStrength::None,
    }
}
