//! Evidence documents flowing through the retrieval pipeline.
//!
//! A [`RawDoc`] is produced by the retriever; the ranker wraps it into a
//! [`RankedDoc`]. Stages never mutate their input, they return new values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Well-known source kinds.
pub mod source_kind {
    pub const KB: &str = "kb";
    pub const CLUSTER: &str = "cluster";
    pub const LINK: &str = "link";
    pub const FALLBACK: &str = "fallback";
}

/// Metadata attached to a document.
pub type DocMetadata = BTreeMap<String, serde_json::Value>;

/// A candidate evidence document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDoc {
    pub id: String,
    pub text: String,
    /// Provenance channel (see [`source_kind`]).
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<DocMetadata>,
}

impl RawDoc {
    pub fn new(id: impl Into<String>, text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            source: source.into(),
            embedding: None,
            locator: None,
            metadata: None,
        }
    }

    pub fn with_locator(mut self, locator: impl Into<String>) -> Self {
        self.locator = Some(locator.into());
        self
    }

    pub fn with_metadata(mut self, metadata: DocMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// The synthetic document emitted when retrieval finds nothing.
    pub fn fallback(query: &str) -> Self {
        Self::new("fallback:query", query, source_kind::FALLBACK)
    }
}

/// A document with a relevance score in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedDoc {
    #[serde(flatten)]
    pub doc: RawDoc,
    pub score: f64,
}

impl RankedDoc {
    pub fn new(doc: RawDoc, score: f64) -> Self {
        Self { doc, score }
    }

    pub fn id(&self) -> &str {
        &self.doc.id
    }

    pub fn text(&self) -> &str {
        &self.doc.text
    }
}
