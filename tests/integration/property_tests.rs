/*!
 * Properties that hold for any transcript and any valid bounds
 */

use subweaver::app_config::SegmentationConfig;
use subweaver::karaoke;
use subweaver::model::{Subtitle, Word};
use subweaver::segmentation::Segmenter;
use subweaver::validation::Validator;
use crate::common;

/// A spread of bound combinations, including tight ones
fn configs() -> Vec<SegmentationConfig> {
    let mut configs = Vec::new();
    for max_chars in [8, 20, 35, 42] {
        for max_lines in [1, 2] {
            for min_words_per_line in [0, 2] {
                for (max_duration_ms, max_gap_ms) in [(None, None), (Some(3_000), Some(250))] {
                    configs.push(SegmentationConfig {
                        max_chars,
                        max_lines,
                        min_words_per_line,
                        max_duration_ms,
                        max_gap_ms,
                        ..SegmentationConfig::default()
                    });
                }
            }
        }
    }
    configs
}

fn segment(config: &SegmentationConfig, words: Vec<Word>) -> Subtitle {
    Segmenter::new(config.clone())
        .expect("valid segmentation config")
        .segment(words)
        .subtitle
}

/// Every rendered line fits unless it is a single over-long word
#[test]
fn test_segmentation_withAnyConfig_shouldRespectWidthBound() {
    let words = common::long_transcript(400);
    for config in configs() {
        let subtitle = segment(&config, words.clone());
        for segment in &subtitle.segments {
            assert!(segment.line_count() <= config.max_lines, "{:?}", config);
            for line in segment.display_text().lines() {
                let single_word = !line.contains(' ');
                assert!(
                    single_word || line.chars().count() <= config.max_chars,
                    "line '{}' exceeds {:?}",
                    line,
                    config
                );
            }
        }
    }
}

/// Words come out exactly once and in input order
#[test]
fn test_segmentation_withAnyConfig_shouldCoverEveryWord() {
    let words = Validator::new().validate_words(common::long_transcript(400)).words;
    for config in configs() {
        let subtitle = segment(&config, words.clone());
        let flattened: Vec<Word> = subtitle
            .segments
            .into_iter()
            .flat_map(|s| s.words)
            .collect();
        assert_eq!(flattened, words, "{:?}", config);
    }
}

#[test]
fn test_segmentation_withDurationBound_shouldNotExceedIt() {
    let words = common::long_transcript(400);
    for config in configs().into_iter().filter(|c| c.max_duration_ms.is_some()) {
        let max = config.max_duration_ms.unwrap_or(u64::MAX);
        let subtitle = segment(&config, words.clone());
        for segment in &subtitle.segments {
            let single_word = segment.words.len() == 1;
            assert!(single_word || segment.duration_ms() <= max, "{:?}", config);
        }
        assert!(subtitle.overlaps().is_empty());
    }
}

/// Karaoke durations always sum to the rounded segment length
#[test]
fn test_karaoke_withAnySegment_shouldConserveDuration() {
    let words = common::long_transcript(400);
    for config in configs() {
        for segment in &segment(&config, words.clone()).segments {
            let total: u32 = karaoke::durations(segment).iter().sum();
            assert_eq!(u64::from(total), (segment.duration_ms() + 5) / 10);
        }
    }
}

#[test]
fn test_segmentation_withSameInput_shouldBeDeterministic() {
    let words = common::long_transcript(250);
    for config in configs() {
        assert_eq!(segment(&config, words.clone()), segment(&config, words.clone()));
    }
}
