//! Document similarity graph from embedding vectors.
//!
//! Every unordered pair of documents `(i, j)`, `i < j` in input order, is
//! scored by cosine similarity and kept as an edge when the score reaches
//! the threshold. The diagonal is never evaluated, so the graph is
//! undirected and loop-free by construction:
//!
//! ```text
//!          j →  0     1     2     3
//!     i  0      ·    s01   s02   s03
//!     ↓  1            ·    s12   s13
//!        2                  ·    s23
//!        3                        ·
//!
//!     n·(n-1)/2 scored pairs, row-major order
//! ```
//!
//! This is a quadratic batch computation over a bounded corpus; there is
//! no nearest-neighbour index.
//!
//! # Example
//!
//! ```rust
//! use paperlens::{EmbeddingVector, SimilarityGraphBuilder};
//!
//! let vectors = vec![
//!     EmbeddingVector::new(10, "Deep kernels", vec![1.0, 0.0]),
//!     EmbeddingVector::new(11, "Kernel methods", vec![0.9, 0.1]),
//!     EmbeddingVector::new(12, "Soil chemistry", vec![0.0, 1.0]),
//! ];
//!
//! let graph = SimilarityGraphBuilder::new(0.7).build(&vectors).unwrap();
//! assert_eq!(graph.edge_count(), 1);
//! assert_eq!((graph.edges()[0].from_index, graph.edges()[0].to_index), (0, 1));
//! ```

use crate::{DocumentId, Error, Result};
use serde::{Deserialize, Serialize};

/// Default similarity threshold for emitting an edge.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.7;

/// One document's embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingVector {
    /// Source document.
    #[serde(rename = "id")]
    pub document_id: DocumentId,
    /// Document title, for diagnostics only.
    #[serde(default)]
    pub title: String,
    /// Embedding components.
    #[serde(rename = "embedding", alias = "vector")]
    pub values: Vec<f64>,
}

impl EmbeddingVector {
    /// Create a new embedding record.
    #[must_use]
    pub fn new(document_id: impl Into<DocumentId>, title: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            document_id: document_id.into(),
            title: title.into(),
            values,
        }
    }

    /// Dimensionality of the vector.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.values.len()
    }

    /// Euclidean norm, scaled by the largest component so tiny and huge
    /// finite values neither underflow nor overflow.
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        let scale = max_abs(&self.values);
        if scale == 0.0 {
            return 0.0;
        }
        scale * self.values.iter().map(|v| (v / scale).powi(2)).sum::<f64>().sqrt()
    }
}

/// A scored, undirected edge between two documents.
///
/// `from_index < to_index` always holds; indices refer to the input order
/// of the vectors the graph was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityEdge {
    /// Document id of the lower-index endpoint.
    #[serde(rename = "from")]
    pub from_id: DocumentId,
    /// Document id of the higher-index endpoint.
    #[serde(rename = "to")]
    pub to_id: DocumentId,
    /// Cosine similarity.
    #[serde(rename = "similarity")]
    pub score: f64,
    /// Input index of `from_id`.
    pub from_index: usize,
    /// Input index of `to_id`.
    pub to_index: usize,
}

/// Cosine similarity of two equal-length vectors.
///
/// Computed as `dot(a, b) / (|a| · |b|)` with each side first divided by
/// its largest absolute component, so the result stays finite for any
/// finite input. If either vector has zero magnitude the similarity is
/// defined as 0.0.
///
/// # Errors
///
/// [`Error::MalformedInput`] if the lengths differ.
///
/// ```
/// use paperlens::graph::cosine_similarity;
///
/// assert!((cosine_similarity(&[1.0, 2.0], &[2.0, 4.0]).unwrap() - 1.0).abs() < 1e-9);
/// assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap(), 0.0);
/// assert_eq!(cosine_similarity(&[0.0, 0.0], &[3.0, 1.0]).unwrap(), 0.0);
/// ```
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(Error::malformed_input(format!(
            "cannot compare vectors of dimension {} and {}",
            a.len(),
            b.len()
        )));
    }
    Ok(cosine_unchecked(a, b))
}

fn cosine_unchecked(a: &[f64], b: &[f64]) -> f64 {
    let scale_a = max_abs(a);
    let scale_b = max_abs(b);
    if scale_a == 0.0 || scale_b == 0.0 {
        return 0.0;
    }
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (x / scale_a, y / scale_b);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    // both norms are >= 1 after scaling
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}

fn max_abs(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |acc: f64, v| acc.max(v.abs()))
}

/// Undirected, loop-free similarity graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityGraph {
    node_count: usize,
    threshold: f64,
    edges: Vec<SimilarityEdge>,
}

impl SimilarityGraph {
    /// Edges in canonical `(from_index, to_index)` row-major order.
    #[must_use]
    pub fn edges(&self) -> &[SimilarityEdge] {
        &self.edges
    }

    /// Consume the graph, returning its edges.
    #[must_use]
    pub fn into_edges(self) -> Vec<SimilarityEdge> {
        self.edges
    }

    /// Number of documents the graph was built from.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// True if no pair reached the threshold.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Threshold the graph was built with.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Indices adjacent to `index`, with scores, in edge order.
    #[must_use]
    pub fn neighbors(&self, index: usize) -> Vec<(usize, f64)> {
        self.edges
            .iter()
            .filter_map(|e| {
                if e.from_index == index {
                    Some((e.to_index, e.score))
                } else if e.to_index == index {
                    Some((e.from_index, e.score))
                } else {
                    None
                }
            })
            .collect()
    }

    /// Export to NetworkX node-link JSON.
    ///
    /// `vectors` must be the slice the graph was built from; node `i`
    /// carries its document id and title. Load with:
    ///
    /// ```python
    /// import json, networkx as nx
    /// G = nx.node_link_graph(json.load(open("graph.json")))
    /// ```
    pub fn to_node_link_json(&self, vectors: &[EmbeddingVector]) -> Result<serde_json::Value> {
        #[derive(Serialize)]
        struct NodeLinkGraph<'a> {
            directed: bool,
            multigraph: bool,
            graph: serde_json::Value,
            nodes: Vec<Node<'a>>,
            links: Vec<Link>,
        }

        #[derive(Serialize)]
        struct Node<'a> {
            id: usize,
            document_id: &'a DocumentId,
            title: &'a str,
        }

        #[derive(Serialize)]
        struct Link {
            source: usize,
            target: usize,
            weight: f64,
        }

        if vectors.len() != self.node_count {
            return Err(Error::malformed_input(format!(
                "graph has {} nodes but {} vectors were supplied",
                self.node_count,
                vectors.len()
            )));
        }

        let graph = NodeLinkGraph {
            directed: false,
            multigraph: false,
            graph: serde_json::json!({ "threshold": self.threshold }),
            nodes: vectors
                .iter()
                .enumerate()
                .map(|(id, v)| Node {
                    id,
                    document_id: &v.document_id,
                    title: &v.title,
                })
                .collect(),
            links: self
                .edges
                .iter()
                .map(|e| Link {
                    source: e.from_index,
                    target: e.to_index,
                    weight: e.score,
                })
                .collect(),
        };

        Ok(serde_json::to_value(&graph)?)
    }
}

/// Builds a [`SimilarityGraph`] from a set of embeddings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityGraphBuilder {
    threshold: f64,
}

impl Default for SimilarityGraphBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_THRESHOLD)
    }
}

impl SimilarityGraphBuilder {
    /// Create a builder. Any threshold is accepted; values outside
    /// [-1, 1] simply keep no pairs or every pair.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Edge threshold.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Score every unordered pair and keep those with `score >= threshold`.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedInput`] if the vectors do not share one dimension
    /// or contain a non-finite component.
    pub fn build(&self, vectors: &[EmbeddingVector]) -> Result<SimilarityGraph> {
        validate_vectors(vectors)?;

        for v in vectors.iter().filter(|v| v.magnitude() == 0.0) {
            log::warn!(
                "document {} has a zero-magnitude embedding; all its scores are 0",
                v.document_id
            );
        }

        let edges = self.score_rows(vectors);

        log::info!(
            "similarity graph: {} documents, {} edges at threshold {}",
            vectors.len(),
            edges.len(),
            self.threshold
        );
        if log::log_enabled!(log::Level::Debug) {
            for e in &edges {
                log::debug!(
                    "paper 1 (id: {:>3}): {} | paper 2 (id: {:>3}): {} | score: {:6.4}",
                    e.from_index,
                    vectors[e.from_index].title,
                    e.to_index,
                    vectors[e.to_index].title,
                    e.score
                );
            }
        }

        Ok(SimilarityGraph {
            node_count: vectors.len(),
            threshold: self.threshold,
            edges,
        })
    }

    #[cfg(not(feature = "parallel"))]
    fn score_rows(&self, vectors: &[EmbeddingVector]) -> Vec<SimilarityEdge> {
        (0..vectors.len())
            .flat_map(|i| self.score_row(vectors, i))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn score_rows(&self, vectors: &[EmbeddingVector]) -> Vec<SimilarityEdge> {
        use rayon::prelude::*;

        // Rows are collected in index order, so the edge list matches the
        // sequential build exactly.
        let rows: Vec<Vec<SimilarityEdge>> = (0..vectors.len())
            .into_par_iter()
            .map(|i| self.score_row(vectors, i))
            .collect();
        rows.into_iter().flatten().collect()
    }

    fn score_row(&self, vectors: &[EmbeddingVector], i: usize) -> Vec<SimilarityEdge> {
        let left = &vectors[i];
        vectors
            .iter()
            .enumerate()
            .skip(i + 1)
            .filter_map(|(j, right)| {
                let score = cosine_unchecked(&left.values, &right.values);
                (score >= self.threshold).then(|| SimilarityEdge {
                    from_id: left.document_id.clone(),
                    to_id: right.document_id.clone(),
                    score,
                    from_index: i,
                    to_index: j,
                })
            })
            .collect()
    }
}

fn validate_vectors(vectors: &[EmbeddingVector]) -> Result<()> {
    let Some(first) = vectors.first() else {
        return Ok(());
    };
    let dim = first.dim();
    for (i, v) in vectors.iter().enumerate() {
        if v.dim() != dim {
            return Err(Error::malformed_input(format!(
                "embedding {} (document {}) has dimension {}, expected {}",
                i,
                v.document_id,
                v.dim(),
                dim
            )));
        }
        if let Some(pos) = v.values.iter().position(|x| !x.is_finite()) {
            return Err(Error::malformed_input(format!(
                "embedding {} (document {}) has non-finite component at {}",
                i, v.document_id, pos
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vecs(values: &[&[f64]]) -> Vec<EmbeddingVector> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| EmbeddingVector::new(i as i64, format!("paper {}", i), v.to_vec()))
            .collect()
    }

    #[test]
    fn test_orthogonal_vectors_have_no_edge() {
        let graph = SimilarityGraphBuilder::new(0.5)
            .build(&vecs(&[&[1.0, 0.0], &[0.0, 1.0]]))
            .unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_duplicate_vector_scores_one() {
        let graph = SimilarityGraphBuilder::new(0.99)
            .build(&vecs(&[&[0.3, 0.4, 0.5], &[0.3, 0.4, 0.5]]))
            .unwrap();
        assert_eq!(graph.edge_count(), 1);
        assert!((graph.edges()[0].score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_no_self_loops_even_at_minimum_threshold() {
        let vectors = vecs(&[&[1.0, 0.0], &[0.0, 1.0], &[-1.0, 0.0], &[0.5, 0.5]]);
        let graph = SimilarityGraphBuilder::new(-2.0).build(&vectors).unwrap();
        // Every pair kept, none on the diagonal
        assert_eq!(graph.edge_count(), 6);
        assert!(graph.edges().iter().all(|e| e.from_index < e.to_index));
    }

    #[test]
    fn test_threshold_above_one_keeps_nothing() {
        let vectors = vecs(&[&[1.0, 1.0], &[1.0, 1.0]]);
        let graph = SimilarityGraphBuilder::new(1.5).build(&vectors).unwrap();
        assert!(graph.is_empty());
    }

    #[test]
    fn test_canonical_edge_order() {
        let vectors = vecs(&[&[1.0, 0.0], &[1.0, 0.1], &[1.0, 0.2]]);
        let graph = SimilarityGraphBuilder::new(0.0).build(&vectors).unwrap();
        let pairs: Vec<(usize, usize)> = graph.edges().iter().map(|e| (e.from_index, e.to_index)).collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn test_zero_magnitude_scores_zero() {
        let vectors = vecs(&[&[0.0, 0.0], &[1.0, 0.0]]);
        let graph = SimilarityGraphBuilder::new(0.0).build(&vectors).unwrap();
        // score 0 >= 0.0 keeps the edge with a zero score
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edges()[0].score, 0.0);

        let graph = SimilarityGraphBuilder::new(0.01).build(&vectors).unwrap();
        assert!(graph.is_empty());
    }

    #[test]
    fn test_extreme_magnitudes_stay_finite() {
        for value in [1e-170, 5e-324, 1e160, 1e300] {
            let v = [value, value];
            assert!((cosine_similarity(&v, &v).unwrap() - 1.0).abs() < 1e-9, "{}", value);
            assert!((cosine_similarity(&v, &[-value, -value]).unwrap() + 1.0).abs() < 1e-9);
            let e = EmbeddingVector::new(1, "", v.to_vec());
            assert!(e.magnitude() > 0.0 && e.magnitude().is_finite());
        }
        assert_eq!(cosine_similarity(&[1e-170, 0.0], &[0.0, 1e160]).unwrap(), 0.0);
    }

    #[test]
    fn test_ragged_vectors_are_malformed() {
        let err = SimilarityGraphBuilder::default()
            .build(&vecs(&[&[1.0, 0.0], &[1.0]]))
            .unwrap_err();
        assert!(err.is_malformed_input());
    }

    #[test]
    fn test_nan_is_malformed() {
        let err = SimilarityGraphBuilder::default()
            .build(&vecs(&[&[1.0, f64::NAN], &[1.0, 0.0]]))
            .unwrap_err();
        assert!(err.is_malformed_input());
    }

    #[test]
    fn test_empty_and_single() {
        assert!(SimilarityGraphBuilder::default().build(&[]).unwrap().is_empty());
        assert!(SimilarityGraphBuilder::default()
            .build(&vecs(&[&[1.0]]))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_neighbors() {
        let vectors = vecs(&[&[1.0, 0.0], &[1.0, 0.05], &[0.0, 1.0], &[0.98, 0.0]]);
        let graph = SimilarityGraphBuilder::new(0.9).build(&vectors).unwrap();
        let n: Vec<usize> = graph.neighbors(1).into_iter().map(|(i, _)| i).collect();
        assert_eq!(n, vec![0, 3]);
        assert!(graph.neighbors(2).is_empty());
    }

    #[test]
    fn test_edge_serialization_shape() {
        let graph = SimilarityGraphBuilder::new(0.5)
            .build(&vecs(&[&[1.0, 0.0], &[1.0, 0.0]]))
            .unwrap();
        let json = serde_json::to_value(&graph.edges()[0]).unwrap();
        assert_eq!(json["from"], 0);
        assert_eq!(json["to"], 1);
        assert!(json["similarity"].as_f64().unwrap() > 0.99);
    }

    #[test]
    fn test_node_link_export() {
        let vectors = vecs(&[&[1.0, 0.0], &[1.0, 0.0], &[0.0, 1.0]]);
        let graph = SimilarityGraphBuilder::new(0.5).build(&vectors).unwrap();
        let json = graph.to_node_link_json(&vectors).unwrap();
        assert_eq!(json["directed"], false);
        assert_eq!(json["nodes"].as_array().unwrap().len(), 3);
        assert_eq!(json["nodes"][2]["title"], "paper 2");
        assert_eq!(json["links"][0]["source"], 0);
        assert_eq!(json["links"][0]["target"], 1);

        assert!(graph.to_node_link_json(&vectors[..2]).is_err());
    }

    #[test]
    fn test_cosine_dimension_mismatch() {
        assert!(cosine_similarity(&[1.0], &[1.0, 2.0]).is_err());
    }
}
