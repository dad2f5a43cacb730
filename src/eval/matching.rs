//! Greedy fuzzy matching of predicted entity texts against gold texts.
//!
//! Gold entities are visited in order. Each one takes the unmatched
//! prediction with the highest [`fuzz_ratio`] (first one wins on ties);
//! if that score reaches the threshold the pair is a true positive and the
//! prediction leaves the pool. Whatever remains in the pool afterwards is
//! a false positive.
//!
//! The assignment is order-dependent and not globally optimal: an early
//! gold entity can take a prediction that a later one matched better.
//!
//! The false-negative counter starts at `len(gold)` and is decremented on
//! every match, so it ends at the number of unmatched gold entities.

use super::metrics::ConfusionCounts;
use crate::similarity::fuzz_ratio;
use serde::{Deserialize, Serialize};

/// Fuzzy ratio (0-100) a prediction needs to match a gold entity.
pub const DEFAULT_MATCH_THRESHOLD: u8 = 70;

/// A gold entity paired with the prediction it consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMatch {
    /// Gold entity text.
    pub gold: String,
    /// Matched predicted text.
    pub predicted: String,
    /// Fuzzy ratio of the pair.
    pub score: u8,
}

/// Outcome of comparing one category of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityComparison {
    /// TP/FP/FN counts.
    #[serde(flatten)]
    pub counts: ConfusionCounts,
    /// Matches in gold order.
    pub matches: Vec<EntityMatch>,
}

/// Greedy fuzzy matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuzzyMatcher {
    threshold: u8,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_MATCH_THRESHOLD)
    }
}

impl FuzzyMatcher {
    /// Create a matcher with the given 0-100 threshold.
    #[must_use]
    pub const fn new(threshold: u8) -> Self {
        Self { threshold }
    }

    /// Match threshold.
    #[must_use]
    pub const fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Compare gold and predicted entity texts for one category.
    ///
    /// ```
    /// use paperlens::eval::FuzzyMatcher;
    ///
    /// let cmp = FuzzyMatcher::default().compare(
    ///     &["Alice Smith", "MIT"],
    ///     &["Alice Smith", "MIT", "Extra Corp"],
    /// );
    /// assert_eq!(cmp.counts.true_positive, 2);
    /// assert_eq!(cmp.counts.false_positive, 1);
    /// assert_eq!(cmp.counts.false_negative, 0);
    /// ```
    #[must_use]
    pub fn compare<G: AsRef<str>, P: AsRef<str>>(&self, gold: &[G], predicted: &[P]) -> EntityComparison {
        let mut pool: Vec<&str> = predicted.iter().map(|p| p.as_ref()).collect();
        let mut counts = ConfusionCounts {
            false_negative: gold.len(),
            ..ConfusionCounts::default()
        };
        let mut matches = Vec::new();

        for gold_entity in gold {
            let gold_entity: &str = gold_entity.as_ref();
            let mut best: Option<(usize, u8)> = None;
            for (idx, candidate) in pool.iter().enumerate() {
                let score = fuzz_ratio(gold_entity, candidate);
                if score > best.map_or(0, |(_, s)| s) {
                    best = Some((idx, score));
                }
            }

            match best {
                Some((idx, score)) if score >= self.threshold => {
                    let predicted_entity = pool.remove(idx);
                    counts.true_positive += 1;
                    counts.false_negative -= 1;
                    matches.push(EntityMatch {
                        gold: gold_entity.to_string(),
                        predicted: predicted_entity.to_string(),
                        score,
                    });
                }
                _ => {
                    log::trace!("no match for gold entity '{}'", gold_entity);
                }
            }
        }

        counts.false_positive = pool.len();
        EntityComparison { counts, matches }
    }
}

/// Compare with the default threshold of 70.
#[must_use]
pub fn compare_entities<G: AsRef<str>, P: AsRef<str>>(gold: &[G], predicted: &[P]) -> EntityComparison {
    FuzzyMatcher::default().compare(gold, predicted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_match_with_extra_prediction() {
        let cmp = compare_entities(&["Alice Smith", "MIT"], &["Alice Smith", "MIT", "Extra Corp"]);
        assert_eq!(cmp.counts, ConfusionCounts::new(2, 1, 0));
        assert_eq!(cmp.matches.len(), 2);
        assert_eq!(cmp.matches[1].predicted, "MIT");
        assert_eq!(cmp.matches[1].score, 100);
    }

    #[test]
    fn test_empty_gold() {
        let gold: [&str; 0] = [];
        let cmp = compare_entities(&gold, &["X"]);
        assert_eq!(cmp.counts, ConfusionCounts::new(0, 1, 0));
    }

    #[test]
    fn test_empty_predictions() {
        let predicted: [&str; 0] = [];
        let cmp = compare_entities(&["A", "B"], &predicted);
        assert_eq!(cmp.counts, ConfusionCounts::new(0, 0, 2));
        assert!(cmp.matches.is_empty());
    }

    #[test]
    fn test_fuzzy_match_above_threshold() {
        let cmp = compare_entities(&["Alice_Smith"], &["Alice_Smyth"]);
        assert_eq!(cmp.counts, ConfusionCounts::new(1, 0, 0));
        assert_eq!(cmp.matches[0].score, 91);
    }

    #[test]
    fn test_below_threshold_stays_in_pool() {
        let cmp = compare_entities(&["NSF"], &["Wellcome Trust"]);
        assert_eq!(cmp.counts, ConfusionCounts::new(0, 1, 1));
    }

    #[test]
    fn test_prediction_consumed_once() {
        // Both gold entries are closest to the single prediction; only the
        // first can take it.
        let cmp = compare_entities(&["John Smith", "John Smith"], &["John Smith"]);
        assert_eq!(cmp.counts, ConfusionCounts::new(1, 0, 1));
    }

    #[test]
    fn test_greedy_first_gold_wins() {
        // "Anna Berg" scores 94 against "Ana Berg" and 86 against
        // "Anna Bergman", so it takes "Ana Berg".
        let cmp = compare_entities(&["Anna Berg", "Anna Bergman"], &["Ana Berg", "Anna Bergman"]);
        assert_eq!(cmp.counts.true_positive, 2);
        assert_eq!(cmp.matches[0].predicted, "Ana Berg");
        assert_eq!(cmp.matches[1].predicted, "Anna Bergman");
    }

    #[test]
    fn test_order_dependence() {
        // "Smith Lab" (ratio 95) consumes the only prediction, so the exact
        // gold "Smith Labs" goes unmatched.
        let gold = ["Smith Lab", "Smith Labs"];
        let predicted = ["Smith Labs"];
        let cmp = compare_entities(&gold, &predicted);
        assert_eq!(cmp.matches[0].gold, "Smith Lab");
        assert_eq!(cmp.counts, ConfusionCounts::new(1, 0, 1));
    }

    #[test]
    fn test_tie_takes_first_candidate() {
        let cmp = compare_entities(&["abcd"], &["abcx", "abcy"]);
        assert_eq!(cmp.matches[0].predicted, "abcx");
        assert_eq!(cmp.counts.false_positive, 1);
    }

    #[test]
    fn test_custom_threshold() {
        let strict = FuzzyMatcher::new(95).compare(&["Alice_Smith"], &["Alice_Smyth"]);
        assert_eq!(strict.counts, ConfusionCounts::new(0, 1, 1));
        let lax = FuzzyMatcher::new(0).compare(&["NSF"], &["NASA"]);
        assert_eq!(lax.counts.true_positive, 1);
    }
}
