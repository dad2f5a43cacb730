//! JSON records read and written by the pipeline driver.
//!
//! The core builders never touch files; these helpers cover the formats
//! the command-line driver exchanges with upstream inference:
//!
//! | Record | File | Shape |
//! |--------|------|-------|
//! | [`PaperRecord`] | `results.json` | `{id, title, abstract, acknowledgment}` |
//! | [`AnnotatedDocument`] | span input | `{id, text, predictions}` |
//! | [`EntityBucket`] | span output / gold | `{ID, PER, ORG, LOC, MISC}` |
//! | [`EmbeddingVector`](crate::EmbeddingVector) | similarity input | `{id, title, embedding}` |

use crate::entity::{DocumentId, EntityBucket, TokenPrediction};
use crate::spans::EntitySpanBuilder;
use crate::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

/// A paper harvested from the publication source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperRecord {
    /// Paper id.
    pub id: DocumentId,
    /// Paper title.
    #[serde(default)]
    pub title: String,
    /// Abstract text, the input to embedding inference.
    #[serde(rename = "abstract", default, skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    /// Acknowledgment section, the input to NER inference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acknowledgment: Option<String>,
}

/// Token predictions for one document, together with the text they index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedDocument {
    /// Document id copied into the output bucket.
    pub id: DocumentId,
    /// Text the prediction offsets refer to.
    #[serde(alias = "acknowledgment")]
    pub text: String,
    /// Predictions in token order.
    #[serde(default)]
    pub predictions: Vec<TokenPrediction>,
}

impl AnnotatedDocument {
    /// Pair a paper's acknowledgment with the predictions made on it.
    /// A paper without an acknowledgment yields empty text.
    #[must_use]
    pub fn from_paper(paper: &PaperRecord, predictions: Vec<TokenPrediction>) -> Self {
        Self {
            id: paper.id.clone(),
            text: paper.acknowledgment.clone().unwrap_or_default(),
            predictions,
        }
    }
}

/// Run the span builder over every document, keeping input order.
///
/// With the `parallel` feature documents are processed on the rayon pool.
///
/// # Errors
///
/// The first [`Error::MalformedInput`](crate::Error::MalformedInput)
/// raised by any document.
pub fn annotate_corpus(builder: &EntitySpanBuilder, documents: &[AnnotatedDocument]) -> Result<Vec<EntityBucket>> {
    #[cfg(feature = "parallel")]
    let buckets = {
        use rayon::prelude::*;
        documents
            .par_iter()
            .map(|doc| builder.build(&doc.predictions, &doc.text, doc.id.clone()))
            .collect::<Result<Vec<_>>>()
    };

    #[cfg(not(feature = "parallel"))]
    let buckets = documents
        .iter()
        .map(|doc| builder.build(&doc.predictions, &doc.text, doc.id.clone()))
        .collect::<Result<Vec<_>>>();

    let buckets = buckets?;
    log::info!(
        "built entity buckets for {} documents ({} entities)",
        buckets.len(),
        buckets.iter().map(EntityBucket::len).sum::<usize>()
    );
    Ok(buckets)
}

/// Read a JSON document from a file.
///
/// # Errors
///
/// [`Error::Io`](crate::Error::Io) or [`Error::Json`](crate::Error::Json).
pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let value = serde_json::from_reader(reader)?;
    log::debug!("read {}", path.display());
    Ok(value)
}

/// Write pretty-printed JSON to a file, or to stdout when `path` is `None`.
///
/// # Errors
///
/// [`Error::Io`](crate::Error::Io) or [`Error::Json`](crate::Error::Json).
pub fn write_json<T: Serialize + ?Sized>(path: Option<&Path>, value: &T) -> Result<()> {
    with_writer(path, |w| {
        serde_json::to_writer_pretty(&mut *w, value)?;
        writeln!(w)?;
        Ok(())
    })
}

/// Write one compact JSON value per line.
///
/// # Errors
///
/// [`Error::Io`](crate::Error::Io) or [`Error::Json`](crate::Error::Json).
pub fn write_jsonl<T: Serialize>(path: Option<&Path>, items: &[T]) -> Result<()> {
    with_writer(path, |w| {
        for item in items {
            serde_json::to_writer(&mut *w, item)?;
            writeln!(w)?;
        }
        Ok(())
    })
}

fn with_writer<F>(path: Option<&Path>, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    match path {
        Some(path) => {
            let mut w = BufWriter::new(File::create(path)?);
            write(&mut w)?;
            w.flush()?;
            log::debug!("wrote {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut w = stdout.lock();
            write(&mut w)?;
            w.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EntityCategory;

    #[test]
    fn test_paper_record_fields() {
        let json = r#"{"id": 7, "title": "T", "abstract": "A", "acknowledgment": "Thanks NSF", "doi": "x"}"#;
        let paper: PaperRecord = serde_json::from_str(json).unwrap();
        assert_eq!(paper.id, DocumentId::Number(7));
        assert_eq!(paper.abstract_text.as_deref(), Some("A"));

        let out = serde_json::to_value(&paper).unwrap();
        assert_eq!(out["abstract"], "A");
    }

    #[test]
    fn test_annotated_document_hf_fields() {
        let json = r#"{
            "id": "p1",
            "acknowledgment": "Thanks to NSF",
            "predictions": [
                {"entity": "B-ORG", "score": 0.99, "index": 4, "word": "NSF", "start": 10, "end": 13}
            ]
        }"#;
        let doc: AnnotatedDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.text, "Thanks to NSF");
        assert_eq!(doc.predictions[0].label, "B-ORG");

        let buckets = annotate_corpus(&EntitySpanBuilder::default(), &[doc]).unwrap();
        assert_eq!(buckets[0].get(EntityCategory::Organization), &["NSF".to_string()]);
    }

    #[test]
    fn test_from_paper_without_acknowledgment() {
        let paper = PaperRecord {
            id: DocumentId::Number(1),
            title: String::new(),
            abstract_text: None,
            acknowledgment: None,
        };
        let doc = AnnotatedDocument::from_paper(&paper, Vec::new());
        assert!(doc.text.is_empty());
    }

    #[test]
    fn test_annotate_preserves_order() {
        let docs: Vec<AnnotatedDocument> = (0..20)
            .map(|i| AnnotatedDocument {
                id: DocumentId::Number(i),
                text: String::new(),
                predictions: Vec::new(),
            })
            .collect();
        let buckets = annotate_corpus(&EntitySpanBuilder::default(), &docs).unwrap();
        let ids: Vec<_> = buckets.iter().map(|b| b.document_id.clone()).collect();
        let expected: Vec<_> = (0..20).map(DocumentId::Number).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_annotate_propagates_malformed() {
        let doc = AnnotatedDocument {
            id: DocumentId::Number(1),
            text: "short".to_string(),
            predictions: vec![TokenPrediction::new("B-PER", 0.99, 0, 40, "x")],
        };
        let err = annotate_corpus(&EntitySpanBuilder::default(), &[doc]).unwrap_err();
        assert!(err.is_malformed_input());
    }

    #[test]
    fn test_json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("buckets.json");
        let mut bucket = EntityBucket::new(3);
        bucket.push(EntityCategory::Person, "Alice_Smith");

        write_json(Some(path.as_path()), &vec![bucket.clone()]).unwrap();
        let back: Vec<EntityBucket> = read_json(&path).unwrap();
        assert_eq!(back, vec![bucket]);
    }

    #[test]
    fn test_jsonl_one_line_per_item() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        write_jsonl(Some(path.as_path()), &[EntityBucket::new(1), EntityBucket::new(2)]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with(r#"{"ID":1,"#));
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_json::<Vec<PaperRecord>>(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }
}
