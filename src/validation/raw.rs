/*!
 * Boundary reader for loosely-typed transcription JSON.
 *
 * Accepted layouts:
 * - `{"segments": [{"words": [...]}, ...]}` (Whisper style)
 * - `{"words": [...]}`
 * - `[record, ...]` where each record is a segment with `words`, a word, or
 *   a phrase whose text holds several whitespace-separated tokens
 *
 * Every value is checked for presence and type; the first problem fails
 * with a `SchemaError` naming its JSON path.
 */

use serde_json::{Map, Value};

use crate::errors::SchemaError;

/// A word record as found in the input, before any repair
#[derive(Debug, Clone, PartialEq)]
pub struct RawWord {
    /// JSON path of the record, used in later error reports
    pub path: String,
    pub text: String,
    pub start: f64,
    pub end: f64,
    pub confidence: Option<f64>,
}

/// One top-level input record
#[derive(Debug, Clone, PartialEq)]
pub enum RawRecord {
    /// A single word
    Word(RawWord),
    /// A segment carrying nested words
    Segment(Vec<RawWord>),
    /// A segment with text and timing but no nested words
    Phrase(RawWord),
}

/// Read the records of a transcription document
pub fn read_records(value: &Value) -> Result<Vec<RawRecord>, SchemaError> {
    match value {
        Value::Object(obj) => {
            if let Some(segments) = obj.get("segments") {
                let items = as_array(segments, "segments")?;
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| read_segment(item, &format!("segments[{}]", i)))
                    .collect()
            } else if let Some(words) = obj.get("words") {
                let items = as_array(words, "words")?;
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| read_word(item, &format!("words[{}]", i)).map(RawRecord::Word))
                    .collect()
            } else {
                Err(SchemaError::UnrecognisedLayout(
                    "expected a 'segments' or 'words' array".to_string(),
                ))
            }
        }
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let path = format!("[{}]", i);
                let obj = as_object(item, &path)?;
                if obj.contains_key("words") {
                    return read_segment(item, &path);
                }
                let raw = read_word(item, &path)?;
                if raw.text.split_whitespace().nth(1).is_some() {
                    Ok(RawRecord::Phrase(raw))
                } else {
                    Ok(RawRecord::Word(raw))
                }
            })
            .collect(),
        _ => Err(SchemaError::UnrecognisedLayout(
            "expected a JSON object or array".to_string(),
        )),
    }
}

fn read_segment(value: &Value, path: &str) -> Result<RawRecord, SchemaError> {
    let obj = as_object(value, path)?;
    match obj.get("words") {
        Some(words) => {
            let words_path = format!("{}.words", path);
            let items = as_array(words, &words_path)?;
            let words = items
                .iter()
                .enumerate()
                .map(|(j, item)| read_word(item, &format!("{}[{}]", words_path, j)))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(RawRecord::Segment(words))
        }
        None => read_word(value, path).map(RawRecord::Phrase),
    }
}

fn read_word(value: &Value, path: &str) -> Result<RawWord, SchemaError> {
    let obj = as_object(value, path)?;

    // Whisper names the field "word"
    let text = match obj.get("text").or_else(|| obj.get("word")) {
        Some(Value::String(s)) => s.clone(),
        Some(_) => {
            return Err(SchemaError::WrongType {
                path: format!("{}.text", path),
                expected: "a string",
            });
        }
        None => {
            return Err(SchemaError::MissingField {
                path: path.to_string(),
                field: "text",
            });
        }
    };

    let start = required_number(obj, path, "start")?;
    let end = required_number(obj, path, "end")?;

    let confidence = match obj.get("confidence").or_else(|| obj.get("probability")) {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => {
            let c = n.as_f64().unwrap_or(f64::NAN);
            if !(0.0..=1.0).contains(&c) {
                return Err(SchemaError::InvalidValue {
                    path: format!("{}.confidence", path),
                    message: format!("confidence {} outside 0.0..=1.0", c),
                });
            }
            Some(c)
        }
        Some(_) => {
            return Err(SchemaError::WrongType {
                path: format!("{}.confidence", path),
                expected: "a number",
            });
        }
    };

    Ok(RawWord {
        path: path.to_string(),
        text,
        start,
        end,
        confidence,
    })
}

fn required_number(
    obj: &Map<String, Value>,
    path: &str,
    field: &'static str,
) -> Result<f64, SchemaError> {
    match obj.get(field) {
        Some(Value::Number(n)) => n.as_f64().ok_or_else(|| SchemaError::InvalidValue {
            path: format!("{}.{}", path, field),
            message: format!("{} is not representable as f64", n),
        }),
        Some(_) => Err(SchemaError::WrongType {
            path: format!("{}.{}", path, field),
            expected: "a number",
        }),
        None => Err(SchemaError::MissingField {
            path: path.to_string(),
            field,
        }),
    }
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, SchemaError> {
    value.as_object().ok_or_else(|| SchemaError::WrongType {
        path: path.to_string(),
        expected: "an object",
    })
}

fn as_array<'a>(value: &'a Value, path: &str) -> Result<&'a Vec<Value>, SchemaError> {
    value.as_array().ok_or_else(|| SchemaError::WrongType {
        path: path.to_string(),
        expected: "an array",
    })
}
