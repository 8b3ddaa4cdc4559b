/*!
 * # subweaver
 *
 * Turn word-level, timestamped speech recognition output into subtitle files,
 * and edit subtitles in memory.
 *
 * ## Features
 *
 * - Validate and repair raw word timings (Whisper-style JSON)
 * - Group words into length- and duration-bounded lines, preferring
 *   punctuation breaks
 * - Read and write SRT, WebVTT, ASS and a lossless JSON format; write plain text
 * - ASS karaoke timing with `\k`, `\kf` and `\ko` tags
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `model`: Word, Segment and Subtitle types with their editing operations
 * - `validation`: Boundary checks and timing repair for raw input
 * - `segmentation`: Line and segment grouping
 * - `formats`: Parsers, writers and the format registry
 * - `karaoke`: Per-word karaoke durations and tags
 * - `generator`: End-to-end pipeline
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations for the command line front end
 * - `errors`: Custom error types for the library
 *
 * ## Example
 *
 * ```
 * use serde_json::json;
 * use subweaver::{Config, generator};
 *
 * let raw = json!({"words": [
 *     {"text": "Hello", "start": 0.0, "end": 0.5},
 *     {"text": "world", "start": 0.5, "end": 1.0}
 * ]});
 * let generated = generator::generate(&raw, &Config::default()).unwrap();
 * assert_eq!(generated.output, "1\n00:00:00,000 --> 00:00:01,000\nHello world\n");
 * ```
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod errors;
pub mod file_utils;
pub mod formats;
pub mod generator;
pub mod karaoke;
pub mod model;
pub mod segmentation;
pub mod validation;

// Re-export main types for easier usage
pub use app_config::{AssConfig, Config, SegmentationConfig};
pub use errors::{ConfigurationError, EditError, FormatError, SchemaError, SubweaverError};
pub use formats::{FormatRegistry, SubtitleFormat};
pub use generator::{Generated, SubtitleGenerator};
pub use model::{Segment, Subtitle, SubtitleMeta, Word};
pub use segmentation::Segmenter;
pub use validation::{TimeUnit, Validator};
