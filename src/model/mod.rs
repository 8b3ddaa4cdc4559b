/*!
 * Subtitle data model.
 *
 * - `Word`: atomic timestamped token
 * - `Segment`: one displayed cue, an ordered non-empty list of words
 * - `Subtitle`: ordered segments plus style metadata
 * - `AssStyle`: one row of the ASS style table
 *
 * All times are integer milliseconds. The JSON representation writes them
 * as seconds (see [`seconds`]).
 */

pub mod resample;
pub mod segment;
pub mod style;
pub mod subtitle;
pub mod word;

pub use segment::{Anchor, EventFields, Segment, TimingDistribution};
pub use style::AssStyle;
pub use subtitle::{KaraokeTag, RawSection, Subtitle, SubtitleMeta};
pub use word::Word;

/// Serde adapter storing millisecond fields as floating point seconds.
pub mod seconds {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(ms: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(*ms as f64 / 1000.0)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        let ms = (secs * 1000.0).round();
        if !ms.is_finite() || ms < 0.0 || ms > crate::validation::MAX_TIMESTAMP_MS as f64 {
            return Err(D::Error::custom(format!("invalid timestamp: {}", secs)));
        }
        Ok(ms as u64)
    }
}
