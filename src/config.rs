//! Pipeline configuration loaded from TOML.
//!
//! Every field has a default, so an empty file is a valid configuration:
//!
//! ```toml
//! [spans]
//! score_threshold = 0.90
//! continuation_marker = "#"
//! joiner = "_"
//!
//! [similarity]
//! threshold = 0.7
//!
//! [evaluation]
//! match_threshold = 70
//! categories = ["PER", "ORG"]
//! ```

use crate::entity::EntityCategory;
use crate::eval::{CorpusEvaluator, FuzzyMatcher, DEFAULT_CATEGORIES, DEFAULT_MATCH_THRESHOLD};
use crate::graph::{SimilarityGraphBuilder, DEFAULT_SIMILARITY_THRESHOLD};
use crate::spans::{EntitySpanBuilder, DEFAULT_CONTINUATION_MARKER, DEFAULT_JOINER, DEFAULT_SCORE_THRESHOLD};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Settings for [`EntitySpanBuilder`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpanSettings {
    /// Confidence floor for span-opening tokens.
    pub score_threshold: f64,
    /// Sub-word continuation marker; empty disables marker extension.
    pub continuation_marker: String,
    /// Replacement for whitespace runs in entity text.
    pub joiner: String,
}

impl Default for SpanSettings {
    fn default() -> Self {
        Self {
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            continuation_marker: DEFAULT_CONTINUATION_MARKER.to_string(),
            joiner: DEFAULT_JOINER.to_string(),
        }
    }
}

/// Settings for [`SimilarityGraphBuilder`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilaritySettings {
    /// Minimum cosine similarity for an edge. Not range-checked.
    pub threshold: f64,
}

impl Default for SimilaritySettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

/// Settings for [`CorpusEvaluator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationSettings {
    /// Fuzzy ratio (0-100) a prediction needs to count as a match.
    pub match_threshold: u8,
    /// Categories scored.
    pub categories: Vec<EntityCategory>,
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self {
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            categories: DEFAULT_CATEGORIES.to_vec(),
        }
    }
}

/// Complete pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Span building.
    pub spans: SpanSettings,
    /// Similarity graph.
    pub similarity: SimilaritySettings,
    /// Evaluation.
    pub evaluation: EvaluationSettings,
}

impl PipelineConfig {
    /// Parse and validate a TOML document.
    ///
    /// ```
    /// use paperlens::PipelineConfig;
    ///
    /// let config = PipelineConfig::from_toml_str("[similarity]\nthreshold = 0.85\n").unwrap();
    /// assert_eq!(config.similarity.threshold, 0.85);
    /// assert_eq!(config.spans.score_threshold, 0.90);
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::Config`] on a syntax error, unknown category or invalid value.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: PipelineConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML file.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if the file cannot be read, otherwise as [`Self::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content).map_err(|e| match e {
            Error::Config(msg) => Error::config(format!("{}: {}", path.display(), msg)),
            other => other,
        })?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Serialize to TOML.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if a value cannot be represented in TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if `score_threshold` is not finite or
    /// `match_threshold` exceeds 100.
    pub fn validate(&self) -> Result<()> {
        if !self.spans.score_threshold.is_finite() {
            return Err(Error::config(format!(
                "spans.score_threshold must be finite, got {}",
                self.spans.score_threshold
            )));
        }
        if self.evaluation.match_threshold > 100 {
            return Err(Error::config(format!(
                "evaluation.match_threshold must be at most 100, got {}",
                self.evaluation.match_threshold
            )));
        }
        Ok(())
    }

    /// Span builder for these settings.
    #[must_use]
    pub fn span_builder(&self) -> EntitySpanBuilder {
        EntitySpanBuilder::new(self.spans.score_threshold)
            .with_continuation_marker(self.spans.continuation_marker.clone())
            .with_joiner(self.spans.joiner.clone())
    }

    /// Graph builder for these settings.
    #[must_use]
    pub fn graph_builder(&self) -> SimilarityGraphBuilder {
        SimilarityGraphBuilder::new(self.similarity.threshold)
    }

    /// Corpus evaluator for these settings.
    #[must_use]
    pub fn evaluator(&self) -> CorpusEvaluator {
        CorpusEvaluator::new(
            FuzzyMatcher::new(self.evaluation.match_threshold),
            self.evaluation.categories.clone(),
        )
    }
}
