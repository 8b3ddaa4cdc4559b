/*!
 * End-to-end pipeline: raw transcription to subtitle text, and subtitle text
 * from one format to another.
 *
 * `SubtitleGenerator` holds a validated configuration together with the
 * format registry, so a caller processing many inputs pays for setup once.
 */

use log::{debug, info, warn};
use serde_json::Value;

use crate::app_config::Config;
use crate::errors::{ConfigurationError, SubweaverError};
use crate::formats::FormatRegistry;
use crate::model::{Subtitle, SubtitleMeta, Word};
use crate::segmentation::Segmenter;
use crate::validation::{TimingWarning, Validator};

/// Result of a `generate` run
#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    /// Subtitle text in the configured output format
    pub output: String,
    /// The segmented subtitle the output was written from
    pub subtitle: Subtitle,
    /// Every timing repair applied on the way
    pub warnings: Vec<TimingWarning>,
    /// Indices of words the segmenter dropped for empty text
    pub dropped: Vec<usize>,
}

/// Pipeline bound to one configuration
pub struct SubtitleGenerator {
    // @field: Validated configuration
    config: Config,
    registry: FormatRegistry,
    validator: Validator,
    segmenter: Segmenter,
}

impl SubtitleGenerator {
    /// Create a generator with the built-in formats
    pub fn new(config: Config) -> Result<Self, ConfigurationError> {
        Self::with_registry(config, FormatRegistry::with_builtin())
    }

    /// Create a generator over a caller-supplied registry
    pub fn with_registry(
        config: Config,
        registry: FormatRegistry,
    ) -> Result<Self, ConfigurationError> {
        config.validate()?;
        if registry.writer(config.format.id()).is_none() {
            return Err(ConfigurationError::UnknownFormat(config.format.id().to_string()));
        }
        let validator = Validator::with_unit(config.time_unit);
        let segmenter = Segmenter::new(config.segmentation.clone())?;
        Ok(Self {
            config,
            registry,
            validator,
            segmenter,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    /// Validate, segment and write a raw transcription document
    pub fn generate(&self, raw: &Value) -> Result<Generated, SubweaverError> {
        let validated = self.validator.validate(raw)?;
        info!(
            "Validated {} words ({} repairs)",
            validated.words.len(),
            validated.warnings.len()
        );
        self.finish(validated.words, validated.warnings)
    }

    /// Segment and write words that already satisfy the word invariants
    ///
    /// The words still pass through the repair step: out-of-order input is
    /// sorted and overlaps are clamped, each with a warning.
    pub fn generate_from_words(&self, words: Vec<Word>) -> Result<Generated, SubweaverError> {
        let validated = self.validator.validate_words(words);
        self.finish(validated.words, validated.warnings)
    }

    fn finish(
        &self,
        words: Vec<Word>,
        warnings: Vec<TimingWarning>,
    ) -> Result<Generated, SubweaverError> {
        let segmentation = self.segmenter.segment(words);
        if !segmentation.dropped.is_empty() {
            warn!(
                "{} words with empty text were dropped before segmenting",
                segmentation.dropped.len()
            );
        }

        let subtitle = segmentation.subtitle.with_meta(self.config.ass.to_meta());
        info!("Produced {} segments", subtitle.len());

        let output = self.registry.write(self.config.format.id(), &subtitle)?;
        debug!(
            "Wrote {} bytes of {} output",
            output.len(),
            self.config.format
        );

        Ok(Generated {
            output,
            subtitle,
            warnings,
            dropped: segmentation.dropped,
        })
    }

    /// Parse `text` as `from` and write it as `to`
    ///
    /// A subtitle that carries no ASS metadata of its own picks up the
    /// configured styles, script info and karaoke tag.
    pub fn convert(&self, text: &str, from: &str, to: &str) -> Result<String, SubweaverError> {
        let subtitle = self.parse(text, from)?;
        info!("Converting {} segments from {} to {}", subtitle.len(), from, to);
        Ok(self.registry.write(to, &subtitle)?)
    }

    /// Parse subtitle text, applying the configured metadata when it has none
    pub fn parse(&self, text: &str, from: &str) -> Result<Subtitle, SubweaverError> {
        let mut subtitle = self.registry.parse(from, text)?;
        if subtitle.meta == SubtitleMeta::default() {
            subtitle.meta = self.config.ass.to_meta();
        }
        Ok(subtitle)
    }
}

/// Run the generate pipeline once with `config`
pub fn generate(raw: &Value, config: &Config) -> Result<Generated, SubweaverError> {
    SubtitleGenerator::new(config.clone())?.generate(raw)
}

/// Convert subtitle text between two registered formats once with `config`
pub fn convert(text: &str, from: &str, to: &str, config: &Config) -> Result<String, SubweaverError> {
    SubtitleGenerator::new(config.clone())?.convert(text, from, to)
}
