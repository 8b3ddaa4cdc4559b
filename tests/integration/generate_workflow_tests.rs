/*!
 * Integration tests for the generate pipeline and the command line front end
 */

use anyhow::Result;
use serde_json::{Value, json};
use std::process::Command;

use subweaver::app_config::Config;
use subweaver::errors::SubweaverError;
use subweaver::formats::{FormatRegistry, SubtitleFormat};
use subweaver::generator::{self, SubtitleGenerator};
use subweaver::model::KaraokeTag;
use subweaver::validation::TimingIssue;
use crate::common;

fn whisper_input() -> Result<Value> {
    Ok(serde_json::from_str(&common::read_resource("whisper_segments.json")?)?)
}

/// Two contiguous words become one cue
#[test]
fn test_generate_withTwoWords_shouldWriteSingleCue() -> Result<()> {
    common::init_logging();
    let raw = json!([
        {"text": "hello", "start": 0.0, "end": 0.5},
        {"text": "world", "start": 0.5, "end": 1.0}
    ]);
    let generated = generator::generate(&raw, &Config::default())?;

    assert_eq!(generated.subtitle.len(), 1);
    assert_eq!(generated.subtitle.segments[0].text(), "hello world");
    assert_eq!(generated.output, "1\n00:00:00,000 --> 00:00:01,000\nhello world\n");
    Ok(())
}

/// An inverted word is repaired with a warning and the run completes
#[test]
fn test_generate_withInvertedWord_shouldRepairAndContinue() -> Result<()> {
    common::init_logging();
    let raw = json!({"words": [{"text": "oops", "start": 1.0, "end": 0.5}]});
    let generated = generator::generate(&raw, &Config::default())?;

    assert_eq!(generated.warnings.len(), 1);
    assert!(matches!(generated.warnings[0].issue, TimingIssue::InvertedRange { .. }));
    assert_eq!(generated.output, "1\n00:00:00,500 --> 00:00:01,000\noops\n");
    Ok(())
}

/// Ten 5-character words at 35 characters split five and five
#[test]
fn test_generate_withTenWords_shouldWriteTwoCues() -> Result<()> {
    let raw = common::raw_words(&["aaaaa"; 10], 300);
    let generated = generator::generate(&raw, &Config::default())?;

    assert_eq!(generated.subtitle.len(), 2);
    assert!(generated.subtitle.segments.iter().all(|s| s.words.len() == 5));
    assert!(generated.output.contains("\n\n2\n00:00:01,500 --> 00:00:03,000\n"));
    Ok(())
}

/// An unknown ASS override tag survives parse and write verbatim
#[test]
fn test_convert_withFadeTag_shouldReproduceDialogue() -> Result<()> {
    let text = common::read_resource("styled.ass")?;
    let registry = FormatRegistry::with_builtin();
    let subtitle = registry.parse("ass", &text)?;
    assert!(subtitle.segments[0].text().starts_with(r"{\fade(255,0,255,0,0,500,1000)}"));

    let written = registry.write("ass", &subtitle)?;
    let line = r"Dialogue: 0,0:00:01.00,0:00:03.50,Default,,0,0,0,,{\fade(255,0,255,0,0,500,1000)}Hello there";
    assert!(text.contains(line));
    assert!(written.contains(line));
    Ok(())
}

/// A broken cue fails the whole parse; no partial result is returned
#[test]
fn test_convert_withMissingArrow_shouldFailWithCueIndex() {
    let text = "1\n00:00:01,000 --> 00:00:02,000\nfine\n\n2\n00:00:03,000 -- 00:00:04,000\nbroken\n";
    let result = generator::convert(text, "srt", "vtt", &Config::default());
    match result {
        Err(SubweaverError::Format(error)) => assert_eq!(error.cue(), Some(2)),
        other => panic!("expected a format error, got {:?}", other),
    }
}

#[test]
fn test_generate_withWhisperResource_shouldBreakAtSentence() -> Result<()> {
    let generated = generator::generate(&whisper_input()?, &Config::default())?;
    assert_eq!(
        generated.output,
        "1\n00:00:00,000 --> 00:00:02,100\nWelcome back, everyone.\n\n\
         2\n00:00:02,500 --> 00:00:04,900\nToday we look at subtitles.\n"
    );
    Ok(())
}

#[test]
fn test_generate_withKaraokeAss_shouldTimeEveryWord() -> Result<()> {
    let mut config = Config::default();
    config.format = SubtitleFormat::Ass;
    config.ass.karaoke = Some(KaraokeTag::Kf);
    let generated = generator::generate(&whisper_input()?, &config)?;

    assert!(generated.output.contains(
        r"Dialogue: 0,0:00:00.00,0:00:02.10,Default,,0,0,0,,{\kf42}Welcome {\kf38}back, {\kf130}everyone."
    ));
    assert!(generated.output.contains(r"{\kf40}Today {\kf15}we {\kf35}look {\kf10}at {\kf140}subtitles."));
    Ok(())
}

/// One generator can serve many inputs
#[test]
fn test_subtitleGenerator_withReuse_shouldGiveSameOutput() -> Result<()> {
    let generator = SubtitleGenerator::new(Config::default())?;
    let raw = whisper_input()?;
    let first = generator.generate(&raw)?;
    let second = generator.generate(&raw)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_cli_generate_withVttFormat_shouldWriteNextToInput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(
        temp_dir.path(),
        "talk.json",
        &common::read_resource("whisper_segments.json")?,
    )?;

    let status = Command::new(env!("CARGO_BIN_EXE_subweaver"))
        .args(["generate", "-t", "vtt", "--log-level", "error"])
        .arg(&input)
        .status()?;
    assert!(status.success());

    let written = std::fs::read_to_string(temp_dir.path().join("talk.vtt"))?;
    assert!(written.starts_with("WEBVTT\n\n00:00:00.000 --> 00:00:02.100\nWelcome back, everyone.\n"));

    // A second run refuses to replace the file without --force
    let status = Command::new(env!("CARGO_BIN_EXE_subweaver"))
        .args(["generate", "-t", "vtt", "--log-level", "error"])
        .arg(&input)
        .status()?;
    assert!(!status.success());
    Ok(())
}

#[test]
fn test_cli_convert_withStdout_shouldPrintResult() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(
        temp_dir.path(),
        "cues.srt",
        "1\n00:00:01,000 --> 00:00:02,000\nHello\n",
    )?;

    let output = Command::new(env!("CARGO_BIN_EXE_subweaver"))
        .args(["convert", "--stdout", "-t", "txt", "--log-level", "error"])
        .arg(&input)
        .output()?;
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout)?, "Hello\n");
    Ok(())
}

#[test]
fn test_cli_convert_withResample_shouldScaleScript() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(
        temp_dir.path(),
        "styled.ass",
        &common::read_resource("styled.ass")?,
    )?;

    let output = Command::new(env!("CARGO_BIN_EXE_subweaver"))
        .args(["convert", "--stdout", "-t", "ass", "--resample", "1920x1080", "--log-level", "error"])
        .arg(&input)
        .output()?;
    assert!(output.status.success());

    let written = String::from_utf8(output.stdout)?;
    assert!(written.contains("\nPlayResX: 1920\nPlayResY: 1080\n"));
    assert!(written.contains("\nStyle: Default,Arial,72,"));
    assert!(written.contains("Dialogue: 1,0:00:04.00,0:00:05.00,Sign,Narrator,0,0,30,,"));
    assert!(written.contains("\n[Fonts]\nfontname: Subweaver.ttf\n"));
    Ok(())
}
