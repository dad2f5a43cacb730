//! Fuzzy entity evaluation: matching counts, metric bounds, corpus reports.

use paperlens::eval::{aggregate, compare_entities, ConfusionCounts, FuzzyMatcher};
use paperlens::similarity::fuzz_ratio;
use paperlens::{CorpusEvaluator, EntityBucket, EntityCategory, PipelineConfig};
use proptest::prelude::*;

#[test]
fn test_extra_prediction_is_false_positive() {
    let cmp = compare_entities(&["Alice Smith", "MIT"], &["Alice Smith", "MIT", "Extra Corp"]);
    assert_eq!(cmp.counts.true_positive, 2);
    assert_eq!(cmp.counts.false_positive, 1);
    assert_eq!(cmp.counts.false_negative, 0);

    let m = cmp.counts.metrics();
    assert!((m.precision - 2.0 / 3.0).abs() < 1e-12);
    assert!((m.recall - 1.0).abs() < 1e-12);
}

#[test]
fn test_empty_gold_single_prediction() {
    let gold: [&str; 0] = [];
    let cmp = compare_entities(&gold, &["X"]);
    assert_eq!(cmp.counts, ConfusionCounts::new(0, 1, 0));
}

#[test]
fn test_both_empty() {
    let empty: [&str; 0] = [];
    let cmp = compare_entities(&empty, &empty);
    assert_eq!(cmp.counts, ConfusionCounts::default());
    assert_eq!(cmp.counts.metrics().f1, 0.0);
}

#[test]
fn test_normalized_variants_still_match() {
    // Span output joins words with '_', gold files often keep spaces.
    let cmp = compare_entities(&["National Science Foundation"], &["National_Science_Foundation"]);
    assert!(fuzz_ratio("National Science Foundation", "National_Science_Foundation") >= 70);
    assert_eq!(cmp.counts.true_positive, 1);
}

#[test]
fn test_corpus_report_from_json_files() {
    let gold: Vec<EntityBucket> = serde_json::from_str(
        r#"[
            {"ID": 1, "PER": ["Alice Smith"], "ORG": ["MIT"], "LOC": [], "MISC": []},
            {"ID": 2, "PER": [], "ORG": ["NSF", "Wellcome Trust"], "LOC": [], "MISC": []}
        ]"#,
    )
    .unwrap();
    let predicted: Vec<EntityBucket> = serde_json::from_str(
        r#"[
            {"ID": 1, "PER": ["Alice_Smith"], "ORG": ["MIT", "Extra Corp"]},
            {"ID": 2, "PER": ["Bob"], "ORG": ["NSF"]}
        ]"#,
    )
    .unwrap();

    let report = CorpusEvaluator::default().evaluate(&gold, &predicted).unwrap();
    let per = report.get(EntityCategory::Person).unwrap();
    assert_eq!(per.counts, ConfusionCounts::new(1, 1, 0));
    let org = report.get(EntityCategory::Organization).unwrap();
    assert_eq!(org.counts, ConfusionCounts::new(2, 1, 1));
    assert!((org.metrics.precision - 2.0 / 3.0).abs() < 1e-12);
    assert!((org.metrics.recall - 2.0 / 3.0).abs() < 1e-12);

    let text = report.render_text(&[EntityCategory::Person, EntityCategory::Organization]);
    assert!(text.starts_with("PER Entity Metrics:\n\tPrecision: 0.5000\n"));
    assert!(text.contains("\nORG Entity Metrics:\n\tPrecision: 0.6667\n\tRecall: 0.6667\n"));
}

#[test]
fn test_config_selects_categories_and_threshold() {
    let config = PipelineConfig::from_toml_str(
        "[evaluation]\nmatch_threshold = 95\ncategories = [\"PER\"]\n",
    )
    .unwrap();
    let mut gold = EntityBucket::new(1);
    gold.push(EntityCategory::Person, "Alice_Smith");
    let mut predicted = EntityBucket::new(1);
    predicted.push(EntityCategory::Person, "Alice_Smyth");

    let report = config.evaluator().evaluate(&[gold], &[predicted]).unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(
        report.get(EntityCategory::Person).unwrap().counts,
        ConfusionCounts::new(0, 1, 1)
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn counts_are_consistent(
        gold in prop::collection::vec("[A-Za-z ]{0,12}", 0..8),
        predicted in prop::collection::vec("[A-Za-z ]{0,12}", 0..8),
        threshold in 0u8..=100,
    ) {
        let cmp = FuzzyMatcher::new(threshold).compare(&gold, &predicted);
        let c = cmp.counts;
        prop_assert_eq!(c.true_positive, cmp.matches.len());
        prop_assert_eq!(c.true_positive + c.false_negative, gold.len());
        prop_assert_eq!(c.true_positive + c.false_positive, predicted.len());
        for m in &cmp.matches {
            prop_assert!(m.score >= threshold);
        }
    }

    #[test]
    fn metrics_bounded(tp in 0usize..1000, fp in 0usize..1000, fn_count in 0usize..1000) {
        let m = ConfusionCounts::new(tp, fp, fn_count).metrics();
        for value in [m.precision, m.recall, m.accuracy, m.f1] {
            prop_assert!((0.0..=1.0).contains(&value));
        }
        prop_assert!(m.accuracy <= m.precision.min(m.recall) + 1e-12);
    }

    #[test]
    fn aggregate_equals_metrics_of_sum(
        counts in prop::collection::vec((0usize..50, 0usize..50, 0usize..50), 0..10),
    ) {
        let per_doc: Vec<ConfusionCounts> = counts
            .iter()
            .map(|&(tp, fp, fnc)| ConfusionCounts::new(tp, fp, fnc))
            .collect();
        let total: ConfusionCounts = per_doc.iter().sum();
        prop_assert_eq!(aggregate(&per_doc), total.metrics());
    }

    #[test]
    fn fuzz_ratio_is_symmetric_and_bounded(a in "\\PC{0,16}", b in "\\PC{0,16}") {
        let ab = fuzz_ratio(&a, &b);
        prop_assert_eq!(ab, fuzz_ratio(&b, &a));
        prop_assert!(ab <= 100);
        prop_assert_eq!(fuzz_ratio(&a, &a), 100);
    }
}
