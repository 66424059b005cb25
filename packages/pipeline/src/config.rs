//! Configuration constants and runtime settings for the pipeline.

use std::path::PathBuf;

/// Maximum number of `reviewer` segments processed from one batch.
pub const MAX_SEGMENTS: usize = 4;

/// Default number of words per line in wrapped output.
pub const DEFAULT_WRAP_WORDS: usize = 24;

/// Smallest allowed wrap width (words per line).
pub const MIN_WRAP_WORDS: usize = 20;

/// Largest allowed wrap width (words per line).
pub const MAX_WRAP_WORDS: usize = 80;

/// Token on its own line that starts a new batch segment.
pub const SEGMENT_MARKER: &str = "reviewer";

/// Path rendered for violations at the document root.
pub const ROOT_PATH: &str = "<root>";

/// Runtime settings for a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewConfig {
    pub wrap_words: usize,
    pub max_segments: usize,
    pub schema_path: Option<PathBuf>,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            wrap_words: DEFAULT_WRAP_WORDS,
            max_segments: MAX_SEGMENTS,
            schema_path: None,
        }
    }
}

impl ReviewConfig {
    /// Load settings from environment variables.
    ///
    /// `REVIEWREPAIR_WRAP_WORDS`, `REVIEWREPAIR_MAX_SEGMENTS` and
    /// `REVIEWREPAIR_SCHEMA`; unset or unparsable values keep the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let wrap_words = std::env::var("REVIEWREPAIR_WRAP_WORDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map_or(defaults.wrap_words, clamp_wrap_words);

        let max_segments = std::env::var("REVIEWREPAIR_MAX_SEGMENTS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|n| (1..=MAX_SEGMENTS).contains(n))
            .unwrap_or(defaults.max_segments);

        let schema_path = std::env::var_os("REVIEWREPAIR_SCHEMA").map(PathBuf::from);

        Self {
            wrap_words,
            max_segments,
            schema_path,
        }
    }

    /// Create a config builder starting from the defaults.
    pub fn builder() -> ReviewConfigBuilder {
        ReviewConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for constructing `ReviewConfig` in tests and from CLI flags.
pub struct ReviewConfigBuilder {
    config: ReviewConfig,
}

impl ReviewConfigBuilder {
    /// Start from an existing config (e.g. one loaded from the environment).
    pub fn from_config(config: ReviewConfig) -> Self {
        Self { config }
    }

    pub fn wrap_words(mut self, words: usize) -> Self {
        self.config.wrap_words = clamp_wrap_words(words);
        self
    }

    pub fn max_segments(mut self, segments: usize) -> Self {
        self.config.max_segments = segments.clamp(1, MAX_SEGMENTS);
        self
    }

    pub fn schema_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.schema_path = Some(path.into());
        self
    }

    pub fn build(self) -> ReviewConfig {
        self.config
    }
}

/// Clamp a wrap width into the allowed range.
pub fn clamp_wrap_words(words: usize) -> usize {
    words.clamp(MIN_WRAP_WORDS, MAX_WRAP_WORDS)
}
