//! # paperlens
//!
//! Post-processing stages for literature analysis pipelines.
//!
//! - **Entity spans**: rebuild acknowledgment entities (PER/ORG/LOC/MISC)
//!   from BIO token predictions
//! - **Similarity graph**: link papers whose abstract embeddings are close
//! - **Evaluation**: fuzzy-match predicted entities against gold annotations
//!
//! Model inference is out of scope: token predictions and embeddings come
//! from upstream tools, and the three stages never call each other.
//!
//! ```text
//! token predictions ──► EntitySpanBuilder ──► EntityBucket ──┐
//!                                                            ├─► CorpusEvaluator ──► EvaluationReport
//!                                     gold EntityBucket ─────┘
//!
//! embeddings ──► SimilarityGraphBuilder ──► SimilarityGraph (edges i < j)
//! ```
//!
//! ## Entity spans
//!
//! ```rust
//! use paperlens::{EntityCategory, EntitySpanBuilder, TokenPrediction};
//!
//! let text = "We thank Alice Smith and the NSF.";
//! let predictions = vec![
//!     TokenPrediction::new("B-PER", 0.99, 9, 14, "Alice"),
//!     TokenPrediction::new("I-PER", 0.98, 15, 20, "Smith"),
//!     TokenPrediction::new("B-ORG", 0.97, 29, 32, "NSF"),
//! ];
//! let bucket = EntitySpanBuilder::default().build(&predictions, text, 1).unwrap();
//! assert_eq!(bucket.get(EntityCategory::Person), ["Alice_Smith"]);
//! assert_eq!(bucket.get(EntityCategory::Organization), ["NSF"]);
//! ```
//!
//! ## Similarity graph
//!
//! ```rust
//! use paperlens::{EmbeddingVector, SimilarityGraphBuilder};
//!
//! let vectors = vec![
//!     EmbeddingVector::new(1, "A", vec![1.0, 0.0]),
//!     EmbeddingVector::new(2, "B", vec![0.0, 1.0]),
//!     EmbeddingVector::new(3, "C", vec![1.0, 0.1]),
//! ];
//! let graph = SimilarityGraphBuilder::new(0.5).build(&vectors).unwrap();
//! assert_eq!(graph.edge_count(), 1);
//! assert_eq!((graph.edges()[0].from_index, graph.edges()[0].to_index), (0, 2));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Adds |
//! |---------|---------|------|
//! | `cli` | yes | `paperlens` binary, [`cli`] module |
//! | `parallel` | no | rayon-backed similarity rows and corpus annotation |

#![warn(missing_docs)]

pub mod config;
pub mod corpus;
mod entity;
mod error;
pub mod eval;
pub mod graph;
pub mod offset;
pub mod similarity;
pub mod spans;

#[cfg(feature = "cli")]
#[allow(missing_docs)]
pub mod cli;

// Re-exports
pub use config::PipelineConfig;
pub use entity::{BioTag, DocumentId, EntityBucket, EntityCategory, EntitySpan, TagPrefix, TokenPrediction};
pub use error::{Error, Result};
pub use eval::{CorpusEvaluator, EvaluationReport};
pub use graph::{EmbeddingVector, SimilarityEdge, SimilarityGraph, SimilarityGraphBuilder};
pub use offset::SpanConverter;
pub use spans::EntitySpanBuilder;

pub mod prelude {
    //! Commonly used items, re-exported for convenience.
    //!
    //! ```rust
    //! use paperlens::prelude::*;
    //!
    //! let bucket = EntitySpanBuilder::default().build(&[], "", 1).unwrap();
    //! assert!(bucket.is_empty());
    //! ```

    pub use crate::config::PipelineConfig;
    pub use crate::entity::{DocumentId, EntityBucket, EntityCategory, EntitySpan, TokenPrediction};
    pub use crate::error::{Error, Result};
    pub use crate::eval::{compare_entities, ConfusionCounts, CorpusEvaluator, EvaluationReport, FuzzyMatcher, Metrics};
    pub use crate::graph::{cosine_similarity, EmbeddingVector, SimilarityEdge, SimilarityGraph, SimilarityGraphBuilder};
    pub use crate::spans::EntitySpanBuilder;
}
