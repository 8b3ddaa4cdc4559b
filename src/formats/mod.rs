/*!
 * Subtitle format codec.
 *
 * Each format is an independent `Parser`/`Writer` pair translating between
 * text and the `Subtitle` model. `FormatRegistry` maps format identifiers to
 * boxed implementations; adding a format means registering another pair.
 *
 * # Formats
 *
 * - `srt`: SubRip
 * - `vtt`: WebVTT
 * - `ass`: Advanced SubStation Alpha, with karaoke timing
 * - `json`: the lossless internal representation
 * - `txt`: plain text, write-only
 */

pub mod ass;
pub mod json;
pub mod srt;
pub mod timestamp;
pub mod txt;
pub mod vtt;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::errors::{ConfigurationError, FormatError, SubweaverError};
use crate::model::Subtitle;

/// Text to model
pub trait Parser: Send + Sync {
    fn parse(&self, text: &str) -> Result<Subtitle, FormatError>;
}

/// Model to text
pub trait Writer: Send + Sync {
    fn write(&self, subtitle: &Subtitle) -> String;
}

/// Built-in format identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFormat {
    #[default]
    Srt,
    Vtt,
    Ass,
    Json,
    Txt,
}

impl SubtitleFormat {
    pub const ALL: [SubtitleFormat; 5] = [
        SubtitleFormat::Srt,
        SubtitleFormat::Vtt,
        SubtitleFormat::Ass,
        SubtitleFormat::Json,
        SubtitleFormat::Txt,
    ];

    /// Registry identifier
    pub fn id(&self) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::Vtt => "vtt",
            Self::Ass => "ass",
            Self::Json => "json",
            Self::Txt => "txt",
        }
    }

    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        self.id()
    }

    /// Whether a built-in parser exists
    pub fn is_parseable(&self) -> bool {
        !matches!(self, Self::Txt)
    }

    /// Detect the format from a file extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        ext.parse().ok()
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for SubtitleFormat {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "srt" => Ok(Self::Srt),
            "vtt" | "webvtt" => Ok(Self::Vtt),
            "ass" => Ok(Self::Ass),
            "json" => Ok(Self::Json),
            "txt" | "text" => Ok(Self::Txt),
            _ => Err(ConfigurationError::UnknownFormat(s.to_string())),
        }
    }
}

/// Parsers and writers keyed by format identifier
pub struct FormatRegistry {
    parsers: HashMap<String, Box<dyn Parser>>,
    writers: HashMap<String, Box<dyn Writer>>,
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl FormatRegistry {
    /// An empty registry
    pub fn new() -> Self {
        FormatRegistry {
            parsers: HashMap::new(),
            writers: HashMap::new(),
        }
    }

    /// A registry holding every built-in format
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register_parser("srt", Box::new(srt::SrtFormat));
        registry.register_writer("srt", Box::new(srt::SrtFormat));
        registry.register_parser("vtt", Box::new(vtt::VttFormat));
        registry.register_writer("vtt", Box::new(vtt::VttFormat));
        registry.register_parser("ass", Box::new(ass::AssFormat));
        registry.register_writer("ass", Box::new(ass::AssFormat));
        registry.register_parser("json", Box::new(json::JsonFormat));
        registry.register_writer("json", Box::new(json::JsonFormat));
        registry.register_writer("txt", Box::new(txt::TxtFormat));
        registry
    }

    pub fn register_parser(&mut self, id: impl Into<String>, parser: Box<dyn Parser>) {
        self.parsers.insert(id.into().to_lowercase(), parser);
    }

    pub fn register_writer(&mut self, id: impl Into<String>, writer: Box<dyn Writer>) {
        self.writers.insert(id.into().to_lowercase(), writer);
    }

    pub fn parser(&self, id: &str) -> Option<&dyn Parser> {
        self.parsers.get(&id.to_lowercase()).map(|p| p.as_ref())
    }

    pub fn writer(&self, id: &str) -> Option<&dyn Writer> {
        self.writers.get(&id.to_lowercase()).map(|w| w.as_ref())
    }

    /// Parse `text` with the parser registered under `id`
    pub fn parse(&self, id: &str, text: &str) -> Result<Subtitle, SubweaverError> {
        match self.parser(id) {
            Some(parser) => Ok(parser.parse(text)?),
            None if self.writer(id).is_some() => Err(FormatError::Unsupported(id.to_string()).into()),
            None => Err(ConfigurationError::UnknownFormat(id.to_string()).into()),
        }
    }

    /// Write `subtitle` with the writer registered under `id`
    pub fn write(&self, id: &str, subtitle: &Subtitle) -> Result<String, ConfigurationError> {
        self.writer(id)
            .map(|w| w.write(subtitle))
            .ok_or_else(|| ConfigurationError::UnknownFormat(id.to_string()))
    }

    /// Registered parser identifiers, sorted
    pub fn parser_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.parsers.keys().map(|k| k.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    /// Registered writer identifiers, sorted
    pub fn writer_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.writers.keys().map(|k| k.as_str()).collect();
        ids.sort_unstable();
        ids
    }
}
