//! Document ranking.
//!
//! The default [`LexicalRanker`] scores by query-term overlap. Any
//! [`Ranker`] can replace it as long as it returns documents sorted by
//! descending score with scores in [0, 1].

use crate::domain::models::{RankedDoc, RawDoc};
use crate::services::terms::{matched_terms, unique_terms};

/// Orders candidate documents by relevance to a query.
pub trait Ranker: Send + Sync {
    fn rank(&self, docs: &[RawDoc], query: &str) -> Vec<RankedDoc>;
}

/// Explainable lexical-overlap ranker.
///
/// score = query terms found in the lowercase text / max(query terms, 1)
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalRanker;

impl LexicalRanker {
    pub fn new() -> Self {
        Self
    }
}

impl Ranker for LexicalRanker {
    fn rank(&self, docs: &[RawDoc], query: &str) -> Vec<RankedDoc> {
        rank(docs, query)
    }
}

/// Rank `docs` against `query` with the lexical-overlap score.
///
/// Ties keep their input order.
pub fn rank(docs: &[RawDoc], query: &str) -> Vec<RankedDoc> {
    let terms = unique_terms(query);
    let denominator = terms.len().max(1) as f64;

    let mut ranked: Vec<RankedDoc> = docs
        .iter()
        .map(|doc| {
            let score = matched_terms(&terms, &doc.text) as f64 / denominator;
            RankedDoc::new(doc.clone(), score)
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}
