//! Entity span reconstruction from sub-token predictions.
//!
//! BERT-style token classifiers emit one prediction per WordPiece, not per
//! entity:
//!
//! ```text
//! Text:   "Funded by the Rockefeller Foundation"
//!
//! Tokens: Rock    ##ef    ##eller   Foundation
//! Labels: B-ORG   I-ORG   B-ORG     I-ORG
//!                          ^ fragment tagged B-: still part of the word
//! ```
//!
//! [`EntitySpanBuilder`] walks the predictions once, left to right, with an
//! index cursor. A span opens on a `B-` token at or above the score
//! threshold and greedily absorbs every following token that is either
//! `I-` tagged (no threshold check) or carries the sub-word continuation
//! marker. The covered source text is normalized and appended to the
//! bucket for the opening token's category.
//!
//! # Example
//!
//! ```rust
//! use paperlens::{EntityCategory, EntitySpanBuilder, TokenPrediction};
//!
//! let text = "We thank Alice Smith and MIT.";
//! let predictions = vec![
//!     TokenPrediction::new("B-PER", 0.99, 9, 14, "Alice"),
//!     TokenPrediction::new("I-PER", 0.97, 15, 20, "Smith"),
//!     TokenPrediction::new("B-ORG", 0.98, 25, 28, "MIT"),
//! ];
//!
//! let bucket = EntitySpanBuilder::default().build(&predictions, text, 1).unwrap();
//! assert_eq!(bucket.get(EntityCategory::Person), ["Alice_Smith".to_string()]);
//! assert_eq!(bucket.get(EntityCategory::Organization), ["MIT".to_string()]);
//! ```

use crate::offset::SpanConverter;
use crate::{DocumentId, EntityBucket, EntitySpan, Error, Result, TokenPrediction};

/// Default confidence floor for span-opening tokens.
pub const DEFAULT_SCORE_THRESHOLD: f64 = 0.90;

/// WordPiece continuation marker (`##` prefix); matched as a substring.
pub const DEFAULT_CONTINUATION_MARKER: &str = "#";

/// Separator that replaces whitespace runs in normalized entity text.
pub const DEFAULT_JOINER: &str = "_";

/// Rebuilds entity spans from an ordered stream of token predictions.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySpanBuilder {
    score_threshold: f64,
    continuation_marker: String,
    joiner: String,
}

impl Default for EntitySpanBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_SCORE_THRESHOLD)
    }
}

impl EntitySpanBuilder {
    /// Create a builder with the given opening-token score threshold.
    #[must_use]
    pub fn new(score_threshold: f64) -> Self {
        Self {
            score_threshold,
            continuation_marker: DEFAULT_CONTINUATION_MARKER.to_string(),
            joiner: DEFAULT_JOINER.to_string(),
        }
    }

    /// Set the sub-word continuation marker. An empty marker disables
    /// marker-based extension.
    #[must_use]
    pub fn with_continuation_marker(mut self, marker: impl Into<String>) -> Self {
        self.continuation_marker = marker.into();
        self
    }

    /// Set the separator used for whitespace runs.
    #[must_use]
    pub fn with_joiner(mut self, joiner: impl Into<String>) -> Self {
        self.joiner = joiner.into();
        self
    }

    /// Opening-token score threshold.
    #[must_use]
    pub fn score_threshold(&self) -> f64 {
        self.score_threshold
    }

    /// Reconstruct spans in discovery order.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedInput`] if any prediction has `start > end` or an
    /// offset beyond the end of `source_text`, or if a span-opening token
    /// names a category outside the fixed set.
    pub fn spans(&self, predictions: &[TokenPrediction], source_text: &str) -> Result<Vec<EntitySpan>> {
        let converter = SpanConverter::new(source_text);
        validate_offsets(predictions, &converter)?;

        let mut spans = Vec::new();
        let mut cursor = 0;

        while let Some(token) = predictions.get(cursor) {
            let tag = token.tag();
            if !(token.confidence >= self.score_threshold && tag.is_begin()) {
                cursor += 1;
                continue;
            }

            let category = tag.entity_category().map_err(|e| {
                Error::malformed_input(format!("token {} ('{}'): {}", cursor, token.label, e))
            })?;
            let token_start = cursor;
            let start = token.start;
            let mut end = token.end;
            cursor += 1;

            while let Some(next) = predictions.get(cursor) {
                if !self.continues_span(next) {
                    break;
                }
                end = next.end;
                cursor += 1;
            }

            let raw = converter.slice(start, end).ok_or_else(|| {
                Error::malformed_input(format!(
                    "span over tokens {}..{} has reversed offsets {}..{}",
                    token_start, cursor, start, end
                ))
            })?;

            spans.push(EntitySpan {
                category,
                text: normalize_entity_text(raw, &self.joiner),
                start,
                end,
                token_start,
                token_end: cursor,
            });
        }

        Ok(spans)
    }

    /// Reconstruct spans and bucket their texts by category.
    ///
    /// Empty input yields a bucket with four empty lists.
    pub fn build(
        &self,
        predictions: &[TokenPrediction],
        source_text: &str,
        document_id: impl Into<DocumentId>,
    ) -> Result<EntityBucket> {
        let mut bucket = EntityBucket::new(document_id);
        if !predictions.is_empty() && source_text.is_empty() {
            log::warn!(
                "document {}: {} predictions against empty source text",
                bucket.document_id,
                predictions.len()
            );
        }

        for span in self.spans(predictions, source_text)? {
            bucket.push(span.category, span.text);
        }

        log::debug!(
            "document {}: {} predictions -> {} entities",
            bucket.document_id,
            predictions.len(),
            bucket.len()
        );
        Ok(bucket)
    }

    fn continues_span(&self, token: &TokenPrediction) -> bool {
        token.tag().is_inside()
            || (!self.continuation_marker.is_empty()
                && token.token_text.contains(self.continuation_marker.as_str()))
    }
}

fn validate_offsets(predictions: &[TokenPrediction], converter: &SpanConverter<'_>) -> Result<()> {
    for (i, p) in predictions.iter().enumerate() {
        if p.start > p.end {
            return Err(Error::malformed_input(format!(
                "token {} ('{}'): start {} > end {}",
                i, p.token_text, p.start, p.end
            )));
        }
        if p.end > converter.char_len() {
            return Err(Error::malformed_input(format!(
                "token {} ('{}'): end {} exceeds text length {}",
                i,
                p.token_text,
                p.end,
                converter.char_len()
            )));
        }
    }
    Ok(())
}

/// Normalize raw entity text.
///
/// Drops every character that is not an ASCII letter, ASCII digit or
/// whitespace, then joins the remaining whitespace-separated words with
/// `joiner`.
///
/// ```rust
/// use paperlens::spans::normalize_entity_text;
///
/// assert_eq!(normalize_entity_text("Dr. J. Smith-Jones", "_"), "Dr_J_SmithJones");
/// assert_eq!(normalize_entity_text("  NSF  (USA) ", "_"), "NSF_USA");
/// ```
#[must_use]
pub fn normalize_entity_text(raw: &str, joiner: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(joiner)
}
