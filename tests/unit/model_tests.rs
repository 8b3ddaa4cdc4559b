/*!
 * Tests for the Word / Segment / Subtitle model and its editing operations
 */

use subweaver::errors::EditError;
use subweaver::model::{Anchor, Segment, Subtitle, TimingDistribution, Word};
use crate::common;

fn spans(segment: &Segment) -> Vec<(u64, u64)> {
    segment.words.iter().map(|w| (w.start_ms, w.end_ms)).collect()
}

/// Segment timing is derived from its words
#[test]
fn test_segment_timing_withWords_shouldSpanFirstToLast() {
    let subtitle = common::sample_subtitle();
    let first = &subtitle.segments[0];
    assert_eq!(first.start_ms(), 1_000);
    assert_eq!(first.end_ms(), 3_250);
    assert_eq!(first.duration_ms(), 2_250);
    assert_eq!(first.text(), "Good morning, Vietnam!");
}

#[test]
fn test_segment_new_withoutWords_shouldFail() {
    assert_eq!(Segment::new(Vec::new()).unwrap_err(), EditError::EmptySegment);
}

#[test]
fn test_segment_displayText_withLineBreaks_shouldInsertNewlines() {
    let mut segment = common::sample_subtitle().segments.remove(0);
    segment.line_breaks = vec![2];
    assert_eq!(segment.display_text(), "Good morning,\nVietnam!");
    assert_eq!(segment.line_count(), 2);
}

#[test]
fn test_shiftBy_withNegativeDeltaPastZero_shouldFailAndKeepTiming() {
    let mut segment = common::sample_subtitle().segments.remove(0);
    let before = segment.clone();
    assert!(matches!(
        segment.shift_by(-1_001),
        Err(EditError::NegativeTime { .. })
    ));
    assert_eq!(segment, before);

    segment.shift_by(-1_000).unwrap();
    assert_eq!(segment.start_ms(), 0);
    assert_eq!(segment.end_ms(), 2_250);
}

/// Resizing rescales every word proportionally
#[test]
fn test_resize_withDoubleSpan_shouldScaleWords() {
    let mut segment = common::sample_subtitle().segments.remove(0);
    segment.resize(0, 4_500).unwrap();
    assert_eq!(spans(&segment), vec![(0, 800), (800, 2_000), (2_000, 4_500)]);
}

#[test]
fn test_resize_withInvertedRange_shouldFail() {
    let mut segment = common::sample_subtitle().segments.remove(0);
    assert_eq!(
        segment.resize(500, 500).unwrap_err(),
        EditError::InvalidRange {
            start_ms: 500,
            end_ms: 500
        }
    );
}

#[test]
fn test_setDuration_withEndAnchor_shouldKeepEnd() {
    let mut segment = common::sample_subtitle().segments.remove(1);
    segment.set_duration(500, Anchor::End).unwrap();
    assert_eq!(segment.start_ms(), 4_500);
    assert_eq!(segment.end_ms(), 5_000);

    segment.set_duration(1_000, Anchor::Start).unwrap();
    assert_eq!(segment.start_ms(), 4_500);
    assert_eq!(segment.end_ms(), 5_500);
}

#[test]
fn test_addWord_withEarlierWord_shouldKeepTimeOrder() {
    let mut segment = Segment::new(vec![Word::new("b", 100, 200), Word::new("c", 200, 300)]).unwrap();
    segment.add_word(Word::new("a", 0, 100));
    assert_eq!(segment.text(), "a b c");
}

#[test]
fn test_removeWord_withLastRemainingWord_shouldFail() {
    let mut segment = Segment::from_word(Word::new("only", 0, 100));
    assert_eq!(segment.remove_word(0).unwrap_err(), EditError::EmptySegment);
    assert!(matches!(
        segment.remove_word(3),
        Err(EditError::WordOutOfRange { index: 3, len: 1 })
    ));
}

/// A cue-level word is split into one timed word per token
#[test]
fn test_generateWordTimings_withWordCount_shouldSplitEvenly() {
    let mut segment = Segment::from_word(Word::new("one two three", 0, 900));
    segment.generate_word_timings(TimingDistribution::ByWordCount);
    assert_eq!(segment.text(), "one two three");
    assert_eq!(spans(&segment), vec![(0, 300), (300, 600), (600, 900)]);
}

#[test]
fn test_generateWordTimings_withCharCount_shouldWeightByLength() {
    let mut segment = Segment::from_word(Word::new("a bbb", 0, 400));
    segment.generate_word_timings(TimingDistribution::ByCharCount);
    assert_eq!(spans(&segment), vec![(0, 100), (100, 400)]);
}

#[test]
fn test_shiftAll_withPositiveDelta_shouldMoveEverySegment() {
    let mut subtitle = common::sample_subtitle();
    subtitle.shift_all(500).unwrap();
    assert_eq!(subtitle.segments[0].start_ms(), 1_500);
    assert_eq!(subtitle.segments[1].end_ms(), 5_500);
    assert!(subtitle.shift_all(-2_000).is_err());
    assert_eq!(subtitle.segments[0].start_ms(), 1_500);
}

/// Merge followed by split restores the original segments
#[test]
fn test_mergeThenSplit_shouldRestoreSegments() {
    let original = common::sample_subtitle();
    let mut subtitle = original.clone();
    subtitle.merge_segments(0, 1).unwrap();
    assert_eq!(subtitle.len(), 1);
    assert_eq!(subtitle.word_count(), 6);

    subtitle.split_segment_at_word(0, 3).unwrap();
    assert_eq!(subtitle, original);
}

#[test]
fn test_mergeSegments_withNonAdjacent_shouldFail() {
    let mut subtitle = common::sample_subtitle();
    assert_eq!(
        subtitle.merge_segments(1, 0).unwrap_err(),
        EditError::InvalidMerge { first: 1, second: 0 }
    );
    assert!(matches!(
        subtitle.merge_segments(0, 5),
        Err(EditError::SegmentOutOfRange { index: 5, len: 2 })
    ));
}

#[test]
fn test_removeSegment_shouldReturnRemoved() {
    let mut subtitle = common::sample_subtitle();
    let removed = subtitle.remove_segment(0).unwrap();
    assert_eq!(removed.text(), "Good morning, Vietnam!");
    assert_eq!(subtitle.len(), 1);
}

#[test]
fn test_resolveOverlaps_withOverlappingSegments_shouldClampEarlier() {
    let mut subtitle = Subtitle::new(vec![
        Segment::from_word(Word::new("first", 0, 1_500)),
        Segment::from_word(Word::new("second", 1_000, 2_000)),
    ]);
    assert_eq!(subtitle.overlaps(), vec![(0, 500)]);

    let warnings = subtitle.resolve_overlaps();
    assert_eq!(warnings.len(), 1);
    assert!(subtitle.overlaps().is_empty());
    assert_eq!(subtitle.segments[0].end_ms(), 1_000);
}

/// Clones never share words with the original
#[test]
fn test_clone_withEdit_shouldNotAffectOriginal() {
    let original = common::sample_subtitle();
    let mut copy = original.clone();
    copy.segments[0].words[0].text = "Bad".to_string();
    assert_eq!(original.segments[0].words[0].text, "Good");
}
