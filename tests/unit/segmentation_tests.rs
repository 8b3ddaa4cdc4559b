/*!
 * Tests for line and segment grouping
 */

use subweaver::app_config::SegmentationConfig;
use subweaver::errors::ConfigurationError;
use subweaver::model::Word;
use subweaver::segmentation::Segmenter;
use crate::common;

fn segmenter(config: SegmentationConfig) -> Segmenter {
    Segmenter::new(config).expect("valid segmentation config")
}

fn texts(segmenter: &Segmenter, words: Vec<Word>) -> Vec<String> {
    segmenter
        .segment(words)
        .subtitle
        .segments
        .iter()
        .map(|s| s.display_text())
        .collect()
}

/// Ten 5-character words at 35 characters give two segments of five
#[test]
fn test_segment_withTenFiveCharWords_shouldSplitFiveAndFive() {
    let words = common::words(&["alpha", "bravo", "charl", "delta", "echoo", "foxtr", "golfe", "hotel", "india", "julie"], 400);
    let result = segmenter(SegmentationConfig::default()).segment(words);

    assert_eq!(result.subtitle.len(), 2);
    assert_eq!(result.subtitle.segments[0].text(), "alpha bravo charl delta echoo");
    assert_eq!(result.subtitle.segments[1].text(), "foxtr golfe hotel india julie");
    assert_eq!(result.subtitle.segments[1].start_ms(), 2_000);
}

/// A clause break in the lookback window is preferred over a hard cut
#[test]
fn test_segment_withCommaInWindow_shouldBreakAfterComma() {
    let config = SegmentationConfig {
        max_chars: 20,
        ..SegmentationConfig::default()
    };
    let words = common::words(&["Well,", "this", "is", "a", "long", "sentence", "indeed"], 300);
    assert_eq!(
        texts(&segmenter(config), words),
        vec!["Well,", "this is a long", "sentence indeed"]
    );
}

#[test]
fn test_segment_withZeroLookback_shouldIgnorePunctuation() {
    let config = SegmentationConfig {
        max_chars: 20,
        punctuation_lookback: 0,
        ..SegmentationConfig::default()
    };
    let words = common::words(&["Well,", "this", "is", "a", "long", "sentence", "indeed"], 300);
    assert_eq!(
        texts(&segmenter(config), words),
        vec!["Well, this is a", "long sentence", "indeed"]
    );
}

#[test]
fn test_segment_withTwoLines_shouldRecordLineBreak() {
    let config = SegmentationConfig {
        max_lines: 2,
        ..SegmentationConfig::default()
    };
    let words = common::words(&["aaaaa"; 10], 100);
    let result = segmenter(config).segment(words);

    assert_eq!(result.subtitle.len(), 1);
    let segment = &result.subtitle.segments[0];
    assert_eq!(segment.line_breaks, vec![5]);
    assert_eq!(segment.line_count(), 2);
}

/// Long silences start a new segment even when the line has room
#[test]
fn test_segment_withSilenceOverGap_shouldStartNewSegment() {
    let config = SegmentationConfig {
        max_gap_ms: Some(1_000),
        ..SegmentationConfig::default()
    };
    let words = vec![Word::new("before", 0, 500), Word::new("after", 2_000, 2_500)];
    assert_eq!(texts(&segmenter(config), words), vec!["before", "after"]);
}

#[test]
fn test_segment_withMaxDuration_shouldBoundSegmentSpan() {
    let config = SegmentationConfig {
        max_duration_ms: Some(1_200),
        ..SegmentationConfig::default()
    };
    let words = common::words(&["a", "b", "c", "d", "e"], 500);
    let result = segmenter(config).segment(words);

    assert_eq!(result.subtitle.len(), 3);
    assert!(result.subtitle.segments.iter().all(|s| s.duration_ms() <= 1_200));
}

#[test]
fn test_segment_withOverlongWord_shouldKeepItAlone() {
    let config = SegmentationConfig {
        max_chars: 10,
        ..SegmentationConfig::default()
    };
    let words = common::words(&["a", "extraordinarily", "b"], 200);
    assert_eq!(
        texts(&segmenter(config), words),
        vec!["a", "extraordinarily", "b"]
    );
}

#[test]
fn test_segment_withEmptyWords_shouldReportDropped() {
    let words = vec![Word::new("x", 0, 100), Word::new(" ", 100, 200), Word::new("y", 200, 300)];
    let result = segmenter(SegmentationConfig::default()).segment(words);
    assert_eq!(result.dropped, vec![1]);
    assert_eq!(result.subtitle.word_count(), 2);
}

#[test]
fn test_segmenter_new_withZeroBounds_shouldFail() {
    let config = SegmentationConfig {
        max_lines: 0,
        ..SegmentationConfig::default()
    };
    assert_eq!(
        Segmenter::new(config).unwrap_err(),
        ConfigurationError::InvalidMaxLines(0)
    );
}
