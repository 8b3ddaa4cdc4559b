/*!
 * Error types for the subweaver library.
 *
 * Every failure a caller can act on has its own enum so that calling code can
 * branch on cause: malformed raw input (`SchemaError`), malformed subtitle text
 * (`FormatError`), invalid options (`ConfigurationError`) and invalid model
 * edits (`EditError`). `SubweaverError` wraps them for the pipeline and the
 * file helpers.
 */

use thiserror::Error;

/// Raw transcription input is missing a field or has the wrong shape
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// A required field is absent
    #[error("Missing required field '{field}' at {path}")]
    MissingField {
        /// JSON path of the record that lacks the field
        path: String,
        /// Name of the missing field
        field: &'static str,
    },

    /// A field is present but has the wrong JSON type
    #[error("Field at {path} must be {expected}")]
    WrongType {
        /// JSON path of the offending value
        path: String,
        /// Human readable description of the expected type
        expected: &'static str,
    },

    /// A value has the right type but is unusable (NaN, out of range)
    #[error("Invalid value at {path}: {message}")]
    InvalidValue { path: String, message: String },

    /// The top-level document matches none of the accepted layouts
    #[error("Unrecognised transcription layout: {0}")]
    UnrecognisedLayout(String),
}

/// Malformed subtitle text encountered while parsing
///
/// `cue` is the 1-based ordinal of the cue block in the file, `line` the
/// 1-based line number.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    /// A timestamp does not match the format's syntax
    #[error("Malformed timestamp '{value}' in cue {cue} (line {line})")]
    MalformedTimestamp { cue: usize, line: usize, value: String },

    /// The timing line of a cue has no `-->` separator
    #[error("Missing '-->' timing arrow in cue {cue} (line {line})")]
    MissingArrow { cue: usize, line: usize },

    /// A cue block ends before its text
    #[error("Truncated cue {cue} (line {line})")]
    TruncatedCue { cue: usize, line: usize },

    /// A cue ends before it starts
    #[error("Cue {cue} ends before it starts (line {line})")]
    InvertedCue { cue: usize, line: usize },

    /// A required header line is missing
    #[error("Missing '{expected}' header (line {line})")]
    MissingHeader { expected: &'static str, line: usize },

    /// A required section is missing
    #[error("Missing required section '{section}'")]
    MissingSection { section: &'static str },

    /// An ASS section has data lines before its `Format:` line
    #[error("Missing Format line in section '{section}' (line {line})")]
    MissingFormatLine { section: &'static str, line: usize },

    /// A Dialogue or Style line has fewer fields than its Format line
    #[error("Expected {expected} fields, found {found} in cue {cue} (line {line})")]
    InsufficientFields {
        cue: usize,
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A numeric field could not be parsed
    #[error("Invalid value for field '{field}' (line {line}): {value}")]
    InvalidField {
        line: usize,
        field: String,
        value: String,
    },

    /// The internal JSON representation failed to deserialize
    #[error("Invalid subtitle JSON at line {line}, column {column}: {message}")]
    InvalidJson {
        line: usize,
        column: usize,
        message: String,
    },

    /// The format has no parser
    #[error("Format '{0}' cannot be parsed")]
    Unsupported(String),
}

impl FormatError {
    /// Cue ordinal the error refers to, when the error is cue-scoped
    pub fn cue(&self) -> Option<usize> {
        match self {
            Self::MalformedTimestamp { cue, .. }
            | Self::MissingArrow { cue, .. }
            | Self::TruncatedCue { cue, .. }
            | Self::InvertedCue { cue, .. }
            | Self::InsufficientFields { cue, .. } => Some(*cue),
            _ => None,
        }
    }

    /// Line number the error refers to, when known
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::MalformedTimestamp { line, .. }
            | Self::MissingArrow { line, .. }
            | Self::TruncatedCue { line, .. }
            | Self::InvertedCue { line, .. }
            | Self::MissingHeader { line, .. }
            | Self::MissingFormatLine { line, .. }
            | Self::InsufficientFields { line, .. }
            | Self::InvalidField { line, .. }
            | Self::InvalidJson { line, .. } => Some(*line),
            Self::MissingSection { .. } | Self::Unsupported(_) => None,
        }
    }
}

/// Invalid option values, rejected before any processing starts
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// `max_chars` must be a positive integer
    #[error("max_chars must be positive, got {0}")]
    InvalidMaxChars(usize),

    /// `max_lines` must be a positive integer
    #[error("max_lines must be positive, got {0}")]
    InvalidMaxLines(usize),

    /// A duration bound of zero can never be satisfied
    #[error("{field} must be positive when set")]
    InvalidDuration { field: &'static str },

    /// No parser or writer is registered for the identifier
    #[error("Unknown subtitle format: {0}")]
    UnknownFormat(String),

    /// The selected ASS style is not in the style table
    #[error("ASS style '{0}' is not defined in the style table")]
    UnknownStyle(String),

    /// The karaoke tag name is not one of k, kf, ko
    #[error("Unknown karaoke tag: {0}")]
    UnknownKaraokeTag(String),

    /// The configuration file could not be read or decoded
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Invalid editing operation on the subtitle model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    /// Segment index outside the subtitle
    #[error("Segment index {index} out of range (len {len})")]
    SegmentOutOfRange { index: usize, len: usize },

    /// Word index outside the segment
    #[error("Word index {index} out of range (len {len})")]
    WordOutOfRange { index: usize, len: usize },

    /// The requested time range is empty or inverted
    #[error("Invalid time range: start {start_ms}ms, end {end_ms}ms")]
    InvalidRange { start_ms: u64, end_ms: u64 },

    /// A shift would move timing before zero
    #[error("Shift by {delta_ms}ms would move start {start_ms}ms before zero")]
    NegativeTime { start_ms: u64, delta_ms: i64 },

    /// Segments can only be merged with a later segment
    #[error("Cannot merge segment {first} into {second}")]
    InvalidMerge { first: usize, second: usize },

    /// A split point must leave words on both sides
    #[error("Cannot split segment at word {0}")]
    InvalidSplit(usize),

    /// The last word of a segment cannot be removed
    #[error("A segment must keep at least one word")]
    EmptySegment,

    /// Resampling needs a valid source resolution in `[Script Info]`
    #[error("PlayResX and PlayResY must be set to positive integers to resample: {0}")]
    MissingResolution(String),

    /// A resolution dimension is zero
    #[error("Invalid target resolution {x}x{y}")]
    InvalidResolution { x: u32, y: u32 },
}

/// Main error type that wraps all other errors
#[derive(Error, Debug)]
pub enum SubweaverError {
    /// Raw transcription input failed validation
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Subtitle text failed to parse
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// Options failed validation
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Editing operation failed
    #[error("Edit error: {0}")]
    Edit(#[from] EditError),

    /// Error from a file operation
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    /// Input file is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
