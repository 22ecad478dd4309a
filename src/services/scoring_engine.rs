//! Answer quality scoring.
//!
//! Four independent subscores, each clamped to [0, 1]:
//! - citation: `min(1, citations / 6)`
//! - context: fraction of hints found in the text (0.5 without hints)
//! - source: mean reputation of cited sources (0.3 without citations)
//! - relevance: fraction of query terms found in the text, denominator floored at 3
//!
//! The final score is their weighted sum. Final and subscores are rounded to
//! three decimals.

use std::sync::Arc;

use crate::domain::models::{
    Citation, ScoreWeights, Subscores, ValidationScore, DEFAULT_PASS_THRESHOLD,
};
use crate::services::source_reputation::SourceReputationRegistry;
use crate::services::terms::{matched_terms, unique_terms};

/// Citation count at which the citation subscore saturates.
pub const CITATION_SATURATION: usize = 6;

/// Context subscore when no hints are supplied.
pub const NEUTRAL_CONTEXT: f64 = 0.5;

/// Source subscore when there are no citations.
pub const UNSUPPORTED_SOURCE: f64 = 0.3;

/// Floor of the relevance denominator.
pub const RELEVANCE_MIN_TERMS: usize = 3;

/// Subscores below this value produce a diagnostic.
pub const FEEDBACK_CUTOFF: f64 = 0.4;

/// Computes validation scores against the reputation registry.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    registry: Arc<SourceReputationRegistry>,
    weights: ScoreWeights,
}

impl ScoringEngine {
    pub fn new(registry: Arc<SourceReputationRegistry>) -> Self {
        Self {
            registry,
            weights: ScoreWeights::STANDARD,
        }
    }

    /// Engine with custom (already validated) weights.
    pub fn with_weights(registry: Arc<SourceReputationRegistry>, weights: ScoreWeights) -> Self {
        Self { registry, weights }
    }

    pub fn registry(&self) -> &Arc<SourceReputationRegistry> {
        &self.registry
    }

    pub fn weights(&self) -> ScoreWeights {
        self.weights
    }

    /// Score `text` as an answer to `query` backed by `citations`.
    pub fn score_validation(
        &self,
        text: &str,
        query: &str,
        citations: &[Citation],
        hints: Option<&[String]>,
    ) -> ValidationScore {
        let subscores = Subscores {
            citation: citation_score(citations.len()),
            context: context_score(text, hints),
            source: self.source_score(citations),
            relevance: relevance_score(text, query),
        };
        self.combine(subscores)
    }

    /// Weighted final score from raw subscores.
    pub fn combine(&self, subscores: Subscores) -> ValidationScore {
        let clamped = Subscores {
            citation: clamp_unit(subscores.citation),
            context: clamp_unit(subscores.context),
            source: clamp_unit(subscores.source),
            relevance: clamp_unit(subscores.relevance),
        };
        let final_score = round3(clamp_unit(self.weights.combine(&clamped)));

        ValidationScore {
            final_score,
            subscores: Subscores {
                citation: round3(clamped.citation),
                context: round3(clamped.context),
                source: round3(clamped.source),
                relevance: round3(clamped.relevance),
            },
        }
    }

    /// Mean reputation of the cited sources.
    pub fn source_score(&self, citations: &[Citation]) -> f64 {
        if citations.is_empty() {
            return UNSUPPORTED_SOURCE;
        }
        let total: f64 = citations
            .iter()
            .map(|c| self.registry.source_reputation(c.source.as_deref()))
            .sum();
        clamp_unit(total / citations.len() as f64)
    }
}

/// `min(1, count / 6)`.
pub fn citation_score(count: usize) -> f64 {
    clamp_unit(count as f64 / CITATION_SATURATION as f64)
}

/// Fraction of non-blank hints contained (case-insensitively) in `text`.
pub fn context_score(text: &str, hints: Option<&[String]>) -> f64 {
    let hints: Vec<String> = hints
        .unwrap_or_default()
        .iter()
        .map(|h| h.trim().to_lowercase())
        .filter(|h| !h.is_empty())
        .collect();
    if hints.is_empty() {
        return NEUTRAL_CONTEXT;
    }
    let haystack = text.to_lowercase();
    let covered = hints.iter().filter(|h| haystack.contains(h.as_str())).count();
    clamp_unit(covered as f64 / hints.len() as f64)
}

/// Fraction of unique query terms present in `text`, denominator at least 3.
pub fn relevance_score(text: &str, query: &str) -> f64 {
    let terms = unique_terms(query);
    let denominator = terms.len().max(RELEVANCE_MIN_TERMS);
    clamp_unit(matched_terms(&terms, text) as f64 / denominator as f64)
}

/// Whether `score` reaches `threshold`.
pub fn is_validation_passing(score: &ValidationScore, threshold: f64) -> bool {
    score.final_score >= threshold
}

/// [`is_validation_passing`] with the default threshold.
pub fn is_validation_passing_default(score: &ValidationScore) -> bool {
    is_validation_passing(score, DEFAULT_PASS_THRESHOLD)
}

/// One diagnostic per weak subscore, in fixed order, or a single pass phrase.
pub fn get_validation_feedback(score: &ValidationScore) -> String {
    let s = &score.subscores;
    let issues: Vec<&str> = [
        (s.citation, "insufficient citations"),
        (s.context, "hints not addressed"),
        (s.source, "low source reputation"),
        (s.relevance, "low relevance to query"),
    ]
    .into_iter()
    .filter(|(value, _)| *value < FEEDBACK_CUTOFF)
    .map(|(_, phrase)| phrase)
    .collect();

    if issues.is_empty() {
        "validation passed".to_string()
    } else {
        issues.join(", ")
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
