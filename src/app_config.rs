/*!
 * Configuration consumed by the pipeline.
 *
 * Every section deserializes with defaults, so a partial JSON file is a valid
 * configuration. `Config::validate` must pass before any processing starts.
 */

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::{ConfigurationError, SubweaverError};
use crate::formats::SubtitleFormat;
use crate::model::{AssStyle, KaraokeTag, SubtitleMeta};
use crate::validation::TimeUnit;

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Output format identifier
    #[serde(default)]
    pub format: SubtitleFormat,

    /// Unit of `start`/`end` in raw transcription input
    #[serde(default)]
    pub time_unit: TimeUnit,

    /// Line and segment bounds
    #[serde(default)]
    pub segmentation: SegmentationConfig,

    /// ASS styling and karaoke options
    #[serde(default)]
    pub ass: AssConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Bounds applied by the segmentation engine
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SegmentationConfig {
    /// Maximum display characters per line
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Soft lower bound on the words of a trailing line, 0 disables it
    #[serde(default)]
    pub min_words_per_line: usize,

    /// Lines grouped into one segment
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,

    /// How many trailing words are searched for a punctuation break
    #[serde(default = "default_punctuation_lookback")]
    pub punctuation_lookback: usize,

    /// Longest span of one line or segment in ms
    #[serde(default)]
    pub max_duration_ms: Option<u64>,

    /// Silence longer than this always starts a new segment, in ms
    #[serde(default)]
    pub max_gap_ms: Option<u64>,
}

fn default_max_chars() -> usize {
    35
}

fn default_max_lines() -> usize {
    1
}

fn default_punctuation_lookback() -> usize {
    6
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
            min_words_per_line: 0,
            max_lines: default_max_lines(),
            punctuation_lookback: default_punctuation_lookback(),
            max_duration_ms: None,
            max_gap_ms: None,
        }
    }
}

impl SegmentationConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.max_chars == 0 {
            return Err(ConfigurationError::InvalidMaxChars(self.max_chars));
        }
        if self.max_lines == 0 {
            return Err(ConfigurationError::InvalidMaxLines(self.max_lines));
        }
        if self.max_duration_ms == Some(0) {
            return Err(ConfigurationError::InvalidDuration {
                field: "max_duration_ms",
            });
        }
        if self.max_gap_ms == Some(0) {
            return Err(ConfigurationError::InvalidDuration { field: "max_gap_ms" });
        }
        Ok(())
    }
}

/// ASS writer options
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AssConfig {
    /// Style referenced by generated Dialogue lines
    #[serde(default = "default_style")]
    pub style: String,

    /// Style table written to `[V4+ Styles]`; empty means a single default style
    #[serde(default)]
    pub styles: Vec<AssStyle>,

    /// Extra `[Script Info]` entries
    #[serde(default)]
    pub script_info: Vec<(String, String)>,

    /// Karaoke tag emitted per word, none disables karaoke
    #[serde(default)]
    pub karaoke: Option<KaraokeTag>,
}

fn default_style() -> String {
    "Default".to_string()
}

impl Default for AssConfig {
    fn default() -> Self {
        Self {
            style: default_style(),
            styles: Vec::new(),
            script_info: Vec::new(),
            karaoke: None,
        }
    }
}

impl AssConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.style.trim().is_empty() {
            return Err(ConfigurationError::UnknownStyle(self.style.clone()));
        }
        if !self.styles.is_empty() && !self.styles.iter().any(|s| s.name == self.style) {
            return Err(ConfigurationError::UnknownStyle(self.style.clone()));
        }
        Ok(())
    }

    /// Subtitle metadata carrying these options
    pub fn to_meta(&self) -> SubtitleMeta {
        SubtitleMeta {
            default_style: self.style.clone(),
            styles: self.styles.clone(),
            script_info: self.script_info.clone(),
            karaoke: self.karaoke,
            ..SubtitleMeta::default()
        }
    }
}

/// Log level for the command line logger
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.segmentation.validate()?;
        self.ass.validate()?;
        Ok(())
    }

    /// Decode and validate a JSON configuration document
    pub fn from_json(text: &str) -> Result<Self, ConfigurationError> {
        let config: Config = serde_json::from_str(text)
            .map_err(|e| ConfigurationError::Invalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SubweaverError> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&text)?)
    }
}
