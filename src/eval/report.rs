//! Corpus-level evaluation of entity buckets against gold annotations.
//!
//! Gold and predicted buckets are paired by position. Every configured
//! category of every pair goes through the [`FuzzyMatcher`], and the
//! per-document counts are summed per category before metrics are derived.
//!
//! ```text
//! gold[0] ─┐                 ┌─ PER: TP/FP/FN ─┐
//!          ├─ compare per ──►│                  ├─ sum ─► EvaluationReport
//! pred[0] ─┘   category      └─ ORG: TP/FP/FN ─┘
//! ```

use super::matching::{EntityComparison, FuzzyMatcher};
use super::metrics::{ConfusionCounts, Metrics};
use crate::entity::{EntityBucket, EntityCategory};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Categories scored when none are configured.
pub const DEFAULT_CATEGORIES: [EntityCategory; 2] =
    [EntityCategory::Person, EntityCategory::Organization];

/// Summed counts and derived metrics for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryReport {
    /// Summed TP/FP/FN.
    #[serde(flatten)]
    pub counts: ConfusionCounts,
    /// Metrics derived from `counts`.
    #[serde(flatten)]
    pub metrics: Metrics,
}

impl From<ConfusionCounts> for CategoryReport {
    fn from(counts: ConfusionCounts) -> Self {
        Self {
            counts,
            metrics: counts.metrics(),
        }
    }
}

/// Per-category evaluation results for a corpus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvaluationReport {
    categories: BTreeMap<EntityCategory, CategoryReport>,
}

impl EvaluationReport {
    /// Report for one category, if it was scored.
    #[must_use]
    pub fn get(&self, category: EntityCategory) -> Option<&CategoryReport> {
        self.categories.get(&category)
    }

    /// Scored categories in label order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityCategory, &CategoryReport)> + '_ {
        self.categories.iter().map(|(c, r)| (*c, r))
    }

    /// Number of scored categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// True if no category was scored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Plain-text report, one block per category, metrics to four decimals.
    ///
    /// ```text
    /// PER Entity Metrics:
    ///     Precision: 0.6667
    ///     Recall: 1.0000
    ///     Accuracy: 0.6667
    ///     F1-score: 0.8000
    /// ```
    #[must_use]
    pub fn render_text(&self, order: &[EntityCategory]) -> String {
        let mut blocks = Vec::with_capacity(order.len());
        for category in order {
            let Some(report) = self.categories.get(category) else {
                continue;
            };
            let m = report.metrics;
            blocks.push(format!(
                "{} Entity Metrics:\n\
                 \tPrecision: {:.4}\n\
                 \tRecall: {:.4}\n\
                 \tAccuracy: {:.4}\n\
                 \tF1-score: {:.4}\n",
                category, m.precision, m.recall, m.accuracy, m.f1
            ));
        }
        blocks.join("\n")
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let order: Vec<EntityCategory> = self.categories.keys().copied().collect();
        write!(f, "{}", self.render_text(&order))
    }
}

/// Scores predicted buckets against gold buckets for a set of categories.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusEvaluator {
    matcher: FuzzyMatcher,
    categories: Vec<EntityCategory>,
}

impl Default for CorpusEvaluator {
    fn default() -> Self {
        Self::new(FuzzyMatcher::default(), DEFAULT_CATEGORIES.to_vec())
    }
}

impl CorpusEvaluator {
    /// Create an evaluator; repeated categories are scored once.
    #[must_use]
    pub fn new(matcher: FuzzyMatcher, categories: Vec<EntityCategory>) -> Self {
        let mut unique = Vec::with_capacity(categories.len());
        for category in categories {
            if !unique.contains(&category) {
                unique.push(category);
            }
        }
        Self {
            matcher,
            categories: unique,
        }
    }

    /// Categories scored, in configured order.
    #[must_use]
    pub fn categories(&self) -> &[EntityCategory] {
        &self.categories
    }

    /// The matcher used per category.
    #[must_use]
    pub fn matcher(&self) -> &FuzzyMatcher {
        &self.matcher
    }

    /// Compare one gold bucket against one predicted bucket.
    #[must_use]
    pub fn evaluate_document(
        &self,
        gold: &EntityBucket,
        predicted: &EntityBucket,
    ) -> BTreeMap<EntityCategory, EntityComparison> {
        self.categories
            .iter()
            .map(|&c| (c, self.matcher.compare(gold.get(c), predicted.get(c))))
            .collect()
    }

    /// Evaluate a corpus of predicted buckets against gold buckets.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedInput`] if the corpora differ in length or a
    /// position pairs two different document ids.
    pub fn evaluate(&self, gold: &[EntityBucket], predicted: &[EntityBucket]) -> Result<EvaluationReport> {
        if gold.len() != predicted.len() {
            return Err(Error::malformed_input(format!(
                "gold corpus has {} documents but predictions have {}",
                gold.len(),
                predicted.len()
            )));
        }

        let mut totals: BTreeMap<EntityCategory, ConfusionCounts> = self
            .categories
            .iter()
            .map(|&c| (c, ConfusionCounts::default()))
            .collect();

        for (position, (g, p)) in gold.iter().zip(predicted).enumerate() {
            if g.document_id != p.document_id {
                return Err(Error::malformed_input(format!(
                    "document {} pairs gold id {} with predicted id {}",
                    position, g.document_id, p.document_id
                )));
            }
            for (category, comparison) in self.evaluate_document(g, p) {
                log::debug!(
                    "doc {} {}: {} matched, FP={} FN={}",
                    g.document_id,
                    category,
                    comparison.matches.len(),
                    comparison.counts.false_positive,
                    comparison.counts.false_negative
                );
                *totals.entry(category).or_default() += comparison.counts;
            }
        }

        log::info!(
            "evaluated {} documents over {} categories",
            gold.len(),
            self.categories.len()
        );

        Ok(EvaluationReport {
            categories: totals
                .into_iter()
                .map(|(c, counts)| (c, CategoryReport::from(counts)))
                .collect(),
        })
    }
}
