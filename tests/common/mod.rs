/*!
 * Common test utilities for the subweaver test suite
 */

#![allow(dead_code)]

use anyhow::Result;
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use subweaver::model::{Segment, Subtitle, Word};

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Helper to get the absolute path to a test resource
pub fn test_resource_path(relative_path: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("resources");
    path.push(relative_path);
    path
}

/// Reads a test resource to a string
pub fn read_resource(relative_path: &str) -> Result<String> {
    Ok(fs::read_to_string(test_resource_path(relative_path))?)
}

/// Raw word records with fixed-width words laid out back to back
pub fn raw_words(texts: &[&str], word_ms: u64) -> Value {
    let words: Vec<Value> = texts
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let start = i as u64 * word_ms;
            json!({
                "text": text,
                "start": start as f64 / 1000.0,
                "end": (start + word_ms) as f64 / 1000.0,
            })
        })
        .collect();
    json!({ "words": words })
}

/// Words with fixed-width timing laid out back to back
pub fn words(texts: &[&str], word_ms: u64) -> Vec<Word> {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let start = i as u64 * word_ms;
            Word::new(*text, start, start + word_ms)
        })
        .collect()
}

/// A small subtitle with two multi-word segments and a gap between them
pub fn sample_subtitle() -> Subtitle {
    let first = Segment::new(vec![
        Word::new("Good", 1_000, 1_400),
        Word::new("morning,", 1_400, 2_000),
        Word::new("Vietnam!", 2_000, 3_250),
    ])
    .expect("valid segment");
    let second = Segment::new(vec![
        Word::new("Rise", 4_000, 4_300),
        Word::new("and", 4_300, 4_450),
        Word::new("shine.", 4_450, 5_000),
    ])
    .expect("valid segment");
    Subtitle::new(vec![first, second])
}

/// Pseudo-random but reproducible transcript of `count` words
pub fn long_transcript(count: usize) -> Vec<Word> {
    const VOCABULARY: [&str; 12] = [
        "the", "subtitle", "engine", "groups", "words,", "then", "writes", "lines.",
        "a", "remarkably", "long", "sentence?",
    ];
    let mut cursor = 0u64;
    (0..count)
        .map(|i| {
            let text = VOCABULARY[(i * 7 + i / 3) % VOCABULARY.len()];
            let duration = 120 + (i as u64 * 37) % 400;
            let gap = if i % 11 == 0 { 300 } else { 0 };
            let start = cursor + gap;
            cursor = start + duration;
            Word::new(text, start, cursor)
        })
        .collect()
}

/// Routes library log output through the test harness
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
