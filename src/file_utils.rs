use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::formats::SubtitleFormat;

// @module: File and directory utilities for the command line front end

// @const: SRT cue timing line
static SRT_TIMING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*\d{1,2}:\d{2}:\d{2}[,.]\d{3}\s+-->\s+\d{1,2}:\d{2}:\d{2}[,.]\d{3}")
        .expect("Invalid SRT timing regex")
});

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Read and decode a JSON document
    pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Value> {
        let text = Self::read_to_string(&path)?;
        serde_json::from_str(&text)
            .with_context(|| format!("File is not valid JSON: {:?}", path.as_ref()))
    }

    /// Write a string to a file, creating the parent directory
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }
        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))
    }

    /// Refuse to replace an existing file unless `force` is set
    pub fn check_overwrite<P: AsRef<Path>>(path: P, force: bool) -> Result<()> {
        let path = path.as_ref();
        if path.exists() && !force {
            return Err(anyhow::anyhow!(
                "Output file already exists: {:?} (use --force to overwrite)",
                path
            ));
        }
        Ok(())
    }

    // @generates: Output path next to the input or in `output_dir`
    // @params: input_file, output_dir, format
    pub fn generate_output_path<P: AsRef<Path>>(
        input_file: P,
        output_dir: Option<&Path>,
        format: SubtitleFormat,
    ) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('.');
        output_filename.push_str(format.extension());

        let dir = output_dir
            .map(Path::to_path_buf)
            .or_else(|| input_file.parent().map(Path::to_path_buf))
            .unwrap_or_default();
        dir.join(output_filename)
    }

    /// Detect the subtitle format of a file from its extension, then its content
    pub fn detect_format<P: AsRef<Path>>(path: P) -> Result<SubtitleFormat> {
        let path = path.as_ref();
        if let Some(format) = SubtitleFormat::from_path(path) {
            return Ok(format);
        }

        let content = Self::read_to_string(path)?;
        Self::sniff_format(&content)
            .ok_or_else(|| anyhow::anyhow!("Could not detect subtitle format of {:?}", path))
    }

    /// Guess the format of subtitle text from its first lines
    pub fn sniff_format(content: &str) -> Option<SubtitleFormat> {
        let trimmed = content.trim_start_matches('\u{feff}').trim_start();
        if trimmed.starts_with("WEBVTT") {
            Some(SubtitleFormat::Vtt)
        } else if trimmed.starts_with("[Script Info]") {
            Some(SubtitleFormat::Ass)
        } else if trimmed.starts_with('{') {
            Some(SubtitleFormat::Json)
        } else if SRT_TIMING_REGEX.is_match(trimmed) {
            Some(SubtitleFormat::Srt)
        } else {
            None
        }
    }
}
