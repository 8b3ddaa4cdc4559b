/*!
 * Tests for configuration loading and validation
 */

use anyhow::Result;
use subweaver::app_config::{Config, LogLevel};
use subweaver::errors::{ConfigurationError, SubweaverError};
use subweaver::formats::SubtitleFormat;
use subweaver::validation::TimeUnit;
use crate::common;

/// Test loading a configuration file from disk
#[test]
fn test_config_fromFile_withValidFile_shouldLoad() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "subweaver.json",
        r#"{
            "format": "vtt",
            "time_unit": "milliseconds",
            "segmentation": {"max_chars": 42, "max_lines": 2, "max_gap_ms": 1500},
            "log_level": "debug"
        }"#,
    )?;

    let config = Config::from_file(&path)?;
    assert_eq!(config.format, SubtitleFormat::Vtt);
    assert_eq!(config.time_unit, TimeUnit::Milliseconds);
    assert_eq!(config.segmentation.max_lines, 2);
    assert_eq!(config.segmentation.max_gap_ms, Some(1_500));
    assert_eq!(config.log_level, LogLevel::Debug);
    Ok(())
}

#[test]
fn test_config_fromFile_withMissingFile_shouldReturnIoError() {
    let result = Config::from_file("/nonexistent/subweaver.json");
    assert!(matches!(result, Err(SubweaverError::Io(_))));
}

#[test]
fn test_config_fromFile_withInvalidBounds_shouldReturnConfigurationError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "bad.json",
        r#"{"segmentation": {"max_duration_ms": 0}}"#,
    )?;
    assert!(matches!(
        Config::from_file(&path),
        Err(SubweaverError::Configuration(ConfigurationError::InvalidDuration {
            field: "max_duration_ms"
        }))
    ));
    Ok(())
}

/// A serialized default configuration reads back unchanged
#[test]
fn test_config_serialize_withDefaults_shouldReadBackEqual() -> Result<()> {
    let config = Config::default();
    let json = serde_json::to_string_pretty(&config)?;
    assert_eq!(Config::from_json(&json)?, config);
    Ok(())
}

#[test]
fn test_logLevel_toLevelFilter_shouldMapEachLevel() {
    assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}
