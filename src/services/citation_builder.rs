//! Projection of ranked documents into citations.

use crate::domain::models::{Citation, RankedDoc, SNIPPET_MAX_CHARS};

/// First [`SNIPPET_MAX_CHARS`] characters of `text`.
pub fn snippet(text: &str) -> String {
    text.chars().take(SNIPPET_MAX_CHARS).collect()
}

/// Citation for one ranked document.
pub fn build_citation(doc: &RankedDoc) -> Citation {
    Citation {
        doc_id: doc.doc.id.clone(),
        score: doc.score,
        snippet: snippet(&doc.doc.text),
        locator: doc.doc.locator.clone(),
        source: Some(doc.doc.source.clone()),
    }
}

/// Order-preserving projection of `docs` into citations.
pub fn build_citations(docs: &[RankedDoc]) -> Vec<Citation> {
    docs.iter().map(build_citation).collect()
}
