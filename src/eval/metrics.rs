//! Confusion counts and the metrics derived from them.

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// True positive, false positive and false negative counts.
///
/// Accumulated per category across documents; see [`ConfusionCounts::merge`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionCounts {
    /// Gold entities matched by a prediction.
    #[serde(rename = "TP")]
    pub true_positive: usize,
    /// Predictions left unmatched.
    #[serde(rename = "FP")]
    pub false_positive: usize,
    /// False-negative counter (see `compare` for its baseline).
    #[serde(rename = "FN")]
    pub false_negative: usize,
}

impl ConfusionCounts {
    /// Create counts from explicit values.
    #[must_use]
    pub const fn new(true_positive: usize, false_positive: usize, false_negative: usize) -> Self {
        Self {
            true_positive,
            false_positive,
            false_negative,
        }
    }

    /// `TP / (TP + FP)`, 0.0 when nothing was predicted.
    #[must_use]
    pub fn precision(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    /// `TP / (TP + FN)`, 0.0 when the denominator is zero.
    #[must_use]
    pub fn recall(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }

    /// `TP / (TP + FP + FN)`, 0.0 when all counts are zero.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        ratio(
            self.true_positive,
            self.true_positive + self.false_positive + self.false_negative,
        )
    }

    /// Harmonic mean of precision and recall, 0.0 when both are zero.
    #[must_use]
    pub fn f1(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            return 0.0;
        }
        2.0 * p * r / (p + r)
    }

    /// All four metrics at once.
    #[must_use]
    pub fn metrics(&self) -> Metrics {
        Metrics {
            precision: self.precision(),
            recall: self.recall(),
            accuracy: self.accuracy(),
            f1: self.f1(),
        }
    }

    /// Merge counts from another set.
    pub fn merge(&mut self, other: &ConfusionCounts) {
        self.true_positive += other.true_positive;
        self.false_positive += other.false_positive;
        self.false_negative += other.false_negative;
    }
}

fn ratio(num: usize, denom: usize) -> f64 {
    if denom == 0 {
        0.0
    } else {
        num as f64 / denom as f64
    }
}

impl Add for ConfusionCounts {
    type Output = ConfusionCounts;

    fn add(mut self, rhs: ConfusionCounts) -> ConfusionCounts {
        self.merge(&rhs);
        self
    }
}

impl AddAssign for ConfusionCounts {
    fn add_assign(&mut self, rhs: ConfusionCounts) {
        self.merge(&rhs);
    }
}

impl Sum for ConfusionCounts {
    fn sum<I: Iterator<Item = ConfusionCounts>>(iter: I) -> Self {
        iter.fold(ConfusionCounts::default(), Add::add)
    }
}

impl<'a> Sum<&'a ConfusionCounts> for ConfusionCounts {
    fn sum<I: Iterator<Item = &'a ConfusionCounts>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Precision, recall, accuracy and F1 for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// `TP / (TP + FP)`
    #[serde(rename = "Precision")]
    pub precision: f64,
    /// `TP / (TP + FN)`
    #[serde(rename = "Recall")]
    pub recall: f64,
    /// `TP / (TP + FP + FN)`
    #[serde(rename = "Accuracy")]
    pub accuracy: f64,
    /// `2PR / (P + R)`
    #[serde(rename = "F1-score")]
    pub f1: f64,
}

/// Sum per-document counts and derive corpus-level metrics.
///
/// ```
/// use paperlens::eval::{aggregate, ConfusionCounts};
///
/// let per_doc = [ConfusionCounts::new(2, 1, 0), ConfusionCounts::new(1, 0, 1)];
/// let m = aggregate(&per_doc);
/// assert!((m.precision - 0.75).abs() < 1e-9);
/// assert!((m.recall - 0.75).abs() < 1e-9);
/// ```
#[must_use]
pub fn aggregate<'a>(counts: impl IntoIterator<Item = &'a ConfusionCounts>) -> Metrics {
    counts.into_iter().sum::<ConfusionCounts>().metrics()
}
