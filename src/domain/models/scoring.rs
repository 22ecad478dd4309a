//! Validation scores, subscore weights and per-strategy thresholds.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::errors::{DomainError, DomainResult};

/// Name of the mandatory threshold entry.
pub const DEFAULT_STRATEGY: &str = "default";

/// Threshold used when no strategy table is involved.
pub const DEFAULT_PASS_THRESHOLD: f64 = 0.55;

const WEIGHT_TOLERANCE: f64 = 1e-9;

/// The four quality subscores, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Subscores {
    pub citation: f64,
    pub context: f64,
    pub source: f64,
    pub relevance: f64,
}

/// Result of one validation call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationScore {
    #[serde(rename = "final")]
    pub final_score: f64,
    pub subscores: Subscores,
}

/// Weights used to combine subscores. Always sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    citation: f64,
    context: f64,
    source: f64,
    relevance: f64,
}

impl ScoreWeights {
    /// The fixed production weights.
    pub const STANDARD: Self = Self {
        citation: 0.35,
        context: 0.25,
        source: 0.20,
        relevance: 0.20,
    };

    /// Build custom weights; they must be non-negative and sum to 1.0.
    pub fn new(citation: f64, context: f64, source: f64, relevance: f64) -> DomainResult<Self> {
        let weights = Self {
            citation,
            context,
            source,
            relevance,
        };
        let sum = weights.sum();
        let any_negative = [citation, context, source, relevance]
            .iter()
            .any(|w| !w.is_finite() || *w < 0.0);
        if any_negative || (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(DomainError::InvalidWeights(sum));
        }
        Ok(weights)
    }

    pub fn sum(&self) -> f64 {
        self.citation + self.context + self.source + self.relevance
    }

    pub fn citation(&self) -> f64 {
        self.citation
    }

    pub fn context(&self) -> f64 {
        self.context
    }

    pub fn source(&self) -> f64 {
        self.source
    }

    pub fn relevance(&self) -> f64 {
        self.relevance
    }

    /// Weighted combination of the subscores.
    pub fn combine(&self, s: &Subscores) -> f64 {
        self.citation * s.citation
            + self.context * s.context
            + self.source * s.source
            + self.relevance * s.relevance
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Strategy name to pass threshold, with a mandatory `default` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct Thresholds {
    entries: BTreeMap<String, f64>,
}

impl Thresholds {
    /// Build from a map; fails without a `default` entry or on values outside [0, 1].
    pub fn new(entries: BTreeMap<String, f64>) -> DomainResult<Self> {
        if !entries.contains_key(DEFAULT_STRATEGY) {
            return Err(DomainError::MissingDefaultThreshold);
        }
        for (strategy, value) in &entries {
            if !(0.0..=1.0).contains(value) {
                return Err(DomainError::InvalidThreshold {
                    strategy: strategy.clone(),
                    value: *value,
                });
            }
        }
        Ok(Self { entries })
    }

    /// Resolve the threshold for `strategy`, falling back to `default`.
    pub fn get(&self, strategy: &str) -> f64 {
        self.entries
            .get(strategy)
            .or_else(|| self.entries.get(DEFAULT_STRATEGY))
            .copied()
            .unwrap_or(DEFAULT_PASS_THRESHOLD)
    }

    pub fn default_threshold(&self) -> f64 {
        self.get(DEFAULT_STRATEGY)
    }

    pub fn entries(&self) -> &BTreeMap<String, f64> {
        &self.entries
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        let entries = BTreeMap::from([
            (DEFAULT_STRATEGY.to_string(), DEFAULT_PASS_THRESHOLD),
            ("critic".to_string(), 0.6),
            ("majority".to_string(), 0.5),
        ]);
        Self { entries }
    }
}

impl TryFrom<BTreeMap<String, f64>> for Thresholds {
    type Error = DomainError;

    fn try_from(entries: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<Thresholds> for BTreeMap<String, f64> {
    fn from(thresholds: Thresholds) -> Self {
        thresholds.entries
    }
}

/// Resolve a threshold for a strategy; unknown and empty names use `default`.
pub fn get_threshold(thresholds: &Thresholds, strategy: &str) -> f64 {
    thresholds.get(strategy)
}
