//! Entity categories, token predictions and per-document entity buckets.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Identifier of a source document.
///
/// Upstream corpora use either integer ids (`results.json`) or string ids;
/// both are accepted and round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentId {
    /// Integer id.
    Number(i64),
    /// String id.
    Text(String),
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentId::Number(n) => fmt::Display::fmt(n, f),
            DocumentId::Text(s) => f.pad(s),
        }
    }
}

impl From<i64> for DocumentId {
    fn from(n: i64) -> Self {
        DocumentId::Number(n)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        DocumentId::Text(s.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        DocumentId::Text(s)
    }
}

/// The closed set of entity categories tagged in acknowledgment sections.
///
/// Serialized with the CoNLL short labels used by BERT NER models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityCategory {
    /// Person name (PER)
    #[serde(rename = "PER", alias = "PERSON")]
    Person,
    /// Organization name (ORG)
    #[serde(rename = "ORG", alias = "ORGANIZATION")]
    Organization,
    /// Location/Place (LOC)
    #[serde(rename = "LOC", alias = "LOCATION")]
    Location,
    /// Anything else the model tags (MISC)
    #[serde(rename = "MISC", alias = "MISCELLANEOUS")]
    Miscellaneous,
}

impl EntityCategory {
    /// Every category, in bucket order.
    pub const ALL: [EntityCategory; 4] = [
        EntityCategory::Person,
        EntityCategory::Organization,
        EntityCategory::Location,
        EntityCategory::Miscellaneous,
    ];

    /// Convert to standard label string (CoNLL format).
    #[must_use]
    pub const fn as_label(self) -> &'static str {
        match self {
            EntityCategory::Person => "PER",
            EntityCategory::Organization => "ORG",
            EntityCategory::Location => "LOC",
            EntityCategory::Miscellaneous => "MISC",
        }
    }

    /// Parse a category from a short or long label, ignoring case.
    ///
    /// ```rust
    /// use paperlens::EntityCategory;
    ///
    /// assert_eq!(EntityCategory::from_label("per"), Some(EntityCategory::Person));
    /// assert_eq!(EntityCategory::from_label("ORGANIZATION"), Some(EntityCategory::Organization));
    /// assert_eq!(EntityCategory::from_label("DATE"), None);
    /// ```
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "PER" | "PERSON" => Some(EntityCategory::Person),
            "ORG" | "ORGANIZATION" => Some(EntityCategory::Organization),
            "LOC" | "LOCATION" => Some(EntityCategory::Location),
            "MISC" | "MISCELLANEOUS" => Some(EntityCategory::Miscellaneous),
            _ => None,
        }
    }
}

impl fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

impl FromStr for EntityCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_label(s)
            .ok_or_else(|| Error::malformed_input(format!("unknown entity category '{}'", s)))
    }
}

/// Position of a token inside an entity under BIO tagging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagPrefix {
    /// `B-` : opens an entity
    Begin,
    /// `I-` : continues an entity
    Inside,
    /// `O` or any label without a recognised prefix
    Outside,
}

/// A parsed BIO label such as `B-PER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BioTag<'a> {
    /// Prefix of the label.
    pub prefix: TagPrefix,
    /// Raw category text after the prefix (empty for `O`).
    pub category: &'a str,
}

impl<'a> BioTag<'a> {
    /// Parse a label. Only the exact `B-` and `I-` prefixes are recognised.
    #[must_use]
    pub fn parse(label: &'a str) -> Self {
        if let Some(category) = label.strip_prefix("B-") {
            Self { prefix: TagPrefix::Begin, category }
        } else if let Some(category) = label.strip_prefix("I-") {
            Self { prefix: TagPrefix::Inside, category }
        } else {
            Self { prefix: TagPrefix::Outside, category: "" }
        }
    }

    /// Whether this label opens an entity.
    #[must_use]
    pub fn is_begin(&self) -> bool {
        self.prefix == TagPrefix::Begin
    }

    /// Whether this label continues an entity.
    #[must_use]
    pub fn is_inside(&self) -> bool {
        self.prefix == TagPrefix::Inside
    }

    /// Resolve the category into the closed set.
    pub fn entity_category(&self) -> Result<EntityCategory> {
        self.category.parse()
    }
}

/// One sub-token prediction from a token-classification model.
///
/// Field aliases accept the output of HuggingFace `pipeline("ner")`
/// (`entity`, `score`, `word`) directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPrediction {
    /// BIO label, e.g. `B-ORG`.
    #[serde(alias = "entity")]
    pub label: String,
    /// Model confidence in [0, 1].
    #[serde(alias = "score")]
    pub confidence: f64,
    /// Start character offset into the source text.
    pub start: usize,
    /// End character offset (exclusive).
    pub end: usize,
    /// Raw sub-token string (`##ford` for WordPiece fragments).
    #[serde(alias = "word", default)]
    pub token_text: String,
}

impl TokenPrediction {
    /// Create a new prediction.
    #[must_use]
    pub fn new(
        label: impl Into<String>,
        confidence: f64,
        start: usize,
        end: usize,
        token_text: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            confidence,
            start,
            end,
            token_text: token_text.into(),
        }
    }

    /// Parsed BIO tag of this prediction.
    #[must_use]
    pub fn tag(&self) -> BioTag<'_> {
        BioTag::parse(&self.label)
    }
}

/// An entity reconstructed from a contiguous run of token predictions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    /// Entity category taken from the opening `B-` token.
    pub category: EntityCategory,
    /// Normalized surface text.
    pub text: String,
    /// Start character offset (of the opening token).
    pub start: usize,
    /// End character offset (of the last absorbed token).
    pub end: usize,
    /// Index of the opening token in the prediction sequence.
    pub token_start: usize,
    /// One past the index of the last absorbed token.
    pub token_end: usize,
}

impl EntitySpan {
    /// Number of predictions absorbed into this span.
    #[must_use]
    pub fn token_count(&self) -> usize {
        self.token_end - self.token_start
    }
}

/// Per-document entity texts, one ordered list per category.
///
/// Serializes to the `{"ID", "PER", "ORG", "LOC", "MISC"}` shape used by
/// acknowledgment result files. All four lists are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityBucket {
    /// Source document.
    #[serde(rename = "ID")]
    pub document_id: DocumentId,
    /// PER entities in discovery order.
    #[serde(rename = "PER", default)]
    pub persons: Vec<String>,
    /// ORG entities in discovery order.
    #[serde(rename = "ORG", default)]
    pub organizations: Vec<String>,
    /// LOC entities in discovery order.
    #[serde(rename = "LOC", default)]
    pub locations: Vec<String>,
    /// MISC entities in discovery order.
    #[serde(rename = "MISC", default)]
    pub miscellaneous: Vec<String>,
}

impl EntityBucket {
    /// Create a bucket with four empty lists.
    #[must_use]
    pub fn new(document_id: impl Into<DocumentId>) -> Self {
        Self {
            document_id: document_id.into(),
            persons: Vec::new(),
            organizations: Vec::new(),
            locations: Vec::new(),
            miscellaneous: Vec::new(),
        }
    }

    /// Entities of one category.
    #[must_use]
    pub fn get(&self, category: EntityCategory) -> &[String] {
        match category {
            EntityCategory::Person => &self.persons,
            EntityCategory::Organization => &self.organizations,
            EntityCategory::Location => &self.locations,
            EntityCategory::Miscellaneous => &self.miscellaneous,
        }
    }

    fn list_mut(&mut self, category: EntityCategory) -> &mut Vec<String> {
        match category {
            EntityCategory::Person => &mut self.persons,
            EntityCategory::Organization => &mut self.organizations,
            EntityCategory::Location => &mut self.locations,
            EntityCategory::Miscellaneous => &mut self.miscellaneous,
        }
    }

    /// Append an entity text to its category list.
    pub fn push(&mut self, category: EntityCategory, text: impl Into<String>) {
        self.list_mut(category).push(text.into());
    }

    /// Iterate categories with their entity lists, in bucket order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityCategory, &[String])> + '_ {
        EntityCategory::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// Total number of entities across categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().map(|(_, list)| list.len()).sum()
    }

    /// True if no category holds an entity.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of this bucket with repeated texts removed per category,
    /// keeping first occurrences in order.
    #[must_use]
    pub fn deduplicated(&self) -> Self {
        let mut out = Self::new(self.document_id.clone());
        for (category, list) in self.iter() {
            let mut seen = HashSet::new();
            for text in list {
                if seen.insert(text.as_str()) {
                    out.push(category, text.clone());
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bio_tag_parse() {
        let tag = BioTag::parse("B-PER");
        assert!(tag.is_begin());
        assert_eq!(tag.category, "PER");

        let tag = BioTag::parse("I-ORG");
        assert!(tag.is_inside());
        assert_eq!(tag.entity_category().unwrap(), EntityCategory::Organization);

        assert_eq!(BioTag::parse("O").prefix, TagPrefix::Outside);
        // Underscore separators are not BIO prefixes here
        assert_eq!(BioTag::parse("B_PER").prefix, TagPrefix::Outside);
    }

    #[test]
    fn test_unknown_category_is_malformed() {
        let err = BioTag::parse("B-DATE").entity_category().unwrap_err();
        assert!(err.is_malformed_input());
    }

    #[test]
    fn test_category_labels() {
        for category in EntityCategory::ALL {
            assert_eq!(EntityCategory::from_label(category.as_label()), Some(category));
        }
        assert_eq!("miscellaneous".parse::<EntityCategory>().unwrap(), EntityCategory::Miscellaneous);
    }

    #[test]
    fn test_prediction_accepts_pipeline_fields() {
        let json = r#"{"entity": "B-ORG", "score": 0.998, "index": 4, "word": "NASA", "start": 12, "end": 16}"#;
        let p: TokenPrediction = serde_json::from_str(json).unwrap();
        assert_eq!(p.label, "B-ORG");
        assert_eq!(p.token_text, "NASA");
        assert!((p.confidence - 0.998).abs() < 1e-12);
    }

    #[test]
    fn test_bucket_shape() {
        let mut bucket = EntityBucket::new(7);
        bucket.push(EntityCategory::Person, "Alice_Smith");
        let json = serde_json::to_value(&bucket).unwrap();
        assert_eq!(json["ID"], 7);
        assert_eq!(json["PER"][0], "Alice_Smith");
        assert!(json["ORG"].as_array().unwrap().is_empty());
        assert!(json["LOC"].as_array().unwrap().is_empty());
        assert!(json["MISC"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_bucket_missing_lists_default_empty() {
        let bucket: EntityBucket = serde_json::from_str(r#"{"ID": "p1", "PER": ["Bob"]}"#).unwrap();
        assert_eq!(bucket.document_id, DocumentId::from("p1"));
        assert_eq!(bucket.get(EntityCategory::Person), ["Bob".to_string()]);
        assert!(bucket.get(EntityCategory::Miscellaneous).is_empty());
    }

    #[test]
    fn test_deduplicated_keeps_first_occurrence() {
        let mut bucket = EntityBucket::new(1);
        for name in ["NSF", "MIT", "NSF"] {
            bucket.push(EntityCategory::Organization, name);
        }
        bucket.push(EntityCategory::Person, "NSF");
        let dedup = bucket.deduplicated();
        assert_eq!(dedup.organizations, vec!["NSF", "MIT"]);
        assert_eq!(dedup.persons, vec!["NSF"]);
        assert_eq!(bucket.len(), 4);
        assert_eq!(dedup.len(), 3);
    }
}
