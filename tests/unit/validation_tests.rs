/*!
 * Tests for raw input validation and timing repair
 */

use serde_json::json;
use subweaver::errors::SchemaError;
use subweaver::model::Word;
use subweaver::validation::{TimeUnit, TimingIssue, Validator};
use crate::common;

/// Whisper output with segments, "word" keys and "probability" is accepted
#[test]
fn test_validate_withWhisperResource_shouldReadAllWords() -> anyhow::Result<()> {
    let raw: serde_json::Value = serde_json::from_str(&common::read_resource("whisper_segments.json")?)?;
    let validated = Validator::new().validate(&raw)?;

    assert_eq!(validated.words.len(), 8);
    assert!(validated.warnings.is_empty());
    assert_eq!(validated.words[0].text, "Welcome");
    assert_eq!(validated.words[0].confidence, Some(0.98));
    assert_eq!(validated.words[7], Word::new("subtitles.", 3_500, 4_900).with_confidence(0.88));
    Ok(())
}

/// An inverted word is swapped and processing continues
#[test]
fn test_validate_withInvertedWord_shouldSwapAndWarn() {
    let raw = json!([{"text": "late", "start": 1.0, "end": 0.5}]);
    let validated = Validator::new().validate(&raw).unwrap();

    assert_eq!(validated.words, vec![Word::new("late", 500, 1_000)]);
    assert_eq!(validated.warnings.len(), 1);
    assert_eq!(
        validated.warnings[0].issue,
        TimingIssue::InvertedRange {
            start_ms: 1_000,
            end_ms: 500
        }
    );
}

#[test]
fn test_validate_withZeroDuration_shouldAssignMinimum() {
    let raw = json!({"words": [{"text": "blip", "start": 2.0, "end": 2.0}]});
    let validated = Validator::new().validate(&raw).unwrap();
    assert_eq!(validated.words[0].end_ms, 2_001);
    assert!(matches!(
        validated.warnings[0].issue,
        TimingIssue::ZeroDuration { at_ms: 2_000 }
    ));
}

#[test]
fn test_validate_withNegativeStart_shouldClampToZero() {
    let raw = json!({"words": [{"text": "early", "start": -0.2, "end": 0.3}]});
    let validated = Validator::new().validate(&raw).unwrap();
    assert_eq!(validated.words[0].start_ms, 0);
    assert_eq!(validated.warnings[0].issue, TimingIssue::NegativeTimestamp);
}

#[test]
fn test_validate_withEmptyText_shouldDropWord() {
    let raw = json!({"words": [
        {"text": "  ", "start": 0.0, "end": 0.2},
        {"text": "kept", "start": 0.2, "end": 0.4}
    ]});
    let validated = Validator::new().validate(&raw).unwrap();
    assert_eq!(validated.words, vec![Word::new("kept", 200, 400)]);
    assert_eq!(validated.warnings[0].index, 0);
    assert_eq!(validated.warnings[0].issue, TimingIssue::EmptyText);
}

/// Overlaps are clamped to the next start
#[test]
fn test_validate_withOverlap_shouldClampEnd() {
    let raw = json!({"words": [
        {"text": "a", "start": 0.0, "end": 0.7},
        {"text": "b", "start": 0.5, "end": 1.0}
    ]});
    let validated = Validator::new().validate(&raw).unwrap();
    assert_eq!(validated.words[0].end_ms, 500);
    assert_eq!(
        validated.warnings[0].issue,
        TimingIssue::Overlap { overlap_ms: 200 }
    );
}

#[test]
fn test_validate_withMilliseconds_shouldNotScale() {
    let raw = json!({"words": [{"text": "ms", "start": 250, "end": 750}]});
    let validated = Validator::with_unit(TimeUnit::Milliseconds).validate(&raw).unwrap();
    assert_eq!(validated.words[0], Word::new("ms", 250, 750));
}

#[test]
fn test_validate_withPhraseRecord_shouldExpandWords() {
    let raw = json!([{"text": "ab cd", "start": 0.0, "end": 1.0}]);
    let validated = Validator::new().validate(&raw).unwrap();
    assert_eq!(validated.words.len(), 2);
    assert_eq!(validated.words[0].end_ms, 500);
    assert!(matches!(
        validated.warnings[0].issue,
        TimingIssue::ExpandedSegment { words: 2 }
    ));
}

#[test]
fn test_validate_withMissingEnd_shouldNamePath() {
    let raw = json!({"segments": [{"words": [
        {"text": "ok", "start": 0.0, "end": 0.1},
        {"text": "broken", "start": 0.1}
    ]}]});
    let err = Validator::new().validate(&raw).unwrap_err();
    assert_eq!(
        err,
        SchemaError::MissingField {
            path: "segments[0].words[1]".to_string(),
            field: "end"
        }
    );
}

#[test]
fn test_validate_withWrongTypes_shouldFail() {
    let raw = json!({"words": [{"text": 5, "start": 0.0, "end": 0.1}]});
    assert!(matches!(
        Validator::new().validate(&raw),
        Err(SchemaError::WrongType { .. })
    ));

    let raw = json!({"words": [{"text": "x", "start": "zero", "end": 0.1}]});
    assert!(matches!(
        Validator::new().validate(&raw),
        Err(SchemaError::WrongType { .. })
    ));

    assert!(matches!(
        Validator::new().validate(&json!("text")),
        Err(SchemaError::UnrecognisedLayout(_))
    ));
}

#[test]
fn test_validate_withConfidenceOutOfRange_shouldFail() {
    let raw = json!({"words": [{"text": "x", "start": 0.0, "end": 0.1, "confidence": 1.5}]});
    assert!(matches!(
        Validator::new().validate(&raw),
        Err(SchemaError::InvalidValue { .. })
    ));
}

/// Same malformed input, same repair, every time
#[test]
fn test_validate_withMalformedInput_shouldBeDeterministic() {
    let raw = json!({"words": [
        {"text": "b", "start": 0.9, "end": 0.3},
        {"text": "", "start": 1.0, "end": 1.1},
        {"text": "c", "start": 0.5, "end": 0.5},
        {"text": "d", "start": -1.0, "end": 2.0}
    ]});
    let first = Validator::new().validate(&raw).unwrap();
    for _ in 0..5 {
        assert_eq!(Validator::new().validate(&raw).unwrap(), first);
    }
}

#[test]
fn test_validateWords_withTypedWords_shouldRepair() {
    let validated = Validator::new().validate_words(common::words(&["a", " b "], 100));
    assert_eq!(validated.words[1].text, "b");
    assert!(validated.warnings.is_empty());
}
