//! Document enrichment.
//!
//! Adds `{enriched: true, word_count, timestamp}` to a document's metadata.
//! Text and score are left untouched and every call returns a new value.

use chrono::Utc;
use rayon::prelude::*;
use serde_json::Value;

use crate::domain::models::{DocMetadata, RankedDoc, RawDoc};

/// A document that can carry enrichment metadata.
pub trait Enrichable: Clone + Send + Sync {
    fn text(&self) -> &str;
    fn metadata(&self) -> Option<&DocMetadata>;
    fn with_metadata(self, metadata: DocMetadata) -> Self;
}

impl Enrichable for RawDoc {
    fn text(&self) -> &str {
        &self.text
    }

    fn metadata(&self) -> Option<&DocMetadata> {
        self.metadata.as_ref()
    }

    fn with_metadata(self, metadata: DocMetadata) -> Self {
        RawDoc::with_metadata(self, metadata)
    }
}

impl Enrichable for RankedDoc {
    fn text(&self) -> &str {
        &self.doc.text
    }

    fn metadata(&self) -> Option<&DocMetadata> {
        self.doc.metadata.as_ref()
    }

    fn with_metadata(self, metadata: DocMetadata) -> Self {
        Self {
            doc: self.doc.with_metadata(metadata),
            score: self.score,
        }
    }
}

/// Return a copy of `doc` with enrichment metadata merged in.
pub fn enrich_document<D: Enrichable>(doc: &D) -> D {
    let mut metadata = doc.metadata().cloned().unwrap_or_default();
    metadata.insert("enriched".to_string(), Value::Bool(true));
    metadata.insert(
        "word_count".to_string(),
        Value::from(doc.text().split_whitespace().count()),
    );
    metadata.insert("timestamp".to_string(), Value::String(Utc::now().to_rfc3339()));
    doc.clone().with_metadata(metadata)
}

/// Enrich a batch in parallel; output order matches input order.
pub fn enrich_documents<D: Enrichable>(docs: &[D]) -> Vec<D> {
    docs.par_iter().map(enrich_document::<D>).collect()
}
