//! Scoring predicted entity buckets against hand-labeled gold buckets.
//!
//! # Overview
//!
//! - [`matching`]: greedy fuzzy matching of one category of one document
//! - [`metrics`]: TP/FP/FN counts and precision, recall, accuracy, F1
//! - [`report`]: corpus-level evaluation and the printed report
//!
//! # Example
//!
//! ```rust
//! use paperlens::eval::compare_entities;
//!
//! let cmp = compare_entities(&["Alice Smith", "MIT"], &["Alice Smith", "MIT", "Extra Corp"]);
//! let m = cmp.counts.metrics();
//! assert!((m.precision - 2.0 / 3.0).abs() < 1e-9);
//! assert_eq!(m.recall, 1.0);
//! ```
//!
//! # Matching
//!
//! Matching is greedy and order-dependent. It is not a maximum-weight
//! bipartite assignment, so results depend on the order of the gold list.

pub mod matching;
pub mod metrics;
pub mod report;

pub use matching::{compare_entities, EntityComparison, EntityMatch, FuzzyMatcher, DEFAULT_MATCH_THRESHOLD};
pub use metrics::{aggregate, ConfusionCounts, Metrics};
pub use report::{CategoryReport, CorpusEvaluator, EvaluationReport, DEFAULT_CATEGORIES};
