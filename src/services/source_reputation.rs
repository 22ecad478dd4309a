//! Source reputation registry.
//!
//! Maps an evidence source kind to a trust weight in [0, 1]. Reads are
//! concurrent; registration takes the write lock and is expected to be rare.
//!
//! The registry is append-only once built: configured overrides replace
//! built-in weights at construction, later registrations may only add kinds.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::source_kind;

/// Reputation used for unknown or absent source kinds.
pub const DEFAULT_REPUTATION: f64 = 0.5;

/// Registry of source kinds and their trust weights.
#[derive(Debug)]
pub struct SourceReputationRegistry {
    scores: RwLock<BTreeMap<String, f64>>,
}

impl SourceReputationRegistry {
    /// Registry seeded with the built-in source kinds.
    pub fn new() -> Self {
        let scores = BTreeMap::from([
            (source_kind::KB.to_string(), 0.8),
            (source_kind::CLUSTER.to_string(), 0.7),
            (source_kind::LINK.to_string(), 0.6),
            (source_kind::FALLBACK.to_string(), 0.2),
        ]);
        Self {
            scores: RwLock::new(scores),
        }
    }

    /// Registry seeded with the built-ins, with `overrides` added or replacing them.
    pub fn with_overrides(overrides: &BTreeMap<String, f64>) -> DomainResult<Self> {
        let registry = Self::new();
        {
            let mut scores = registry.scores.write().unwrap_or_else(PoisonError::into_inner);
            for (source_type, score) in overrides {
                let key = validated_key(source_type, *score)?;
                scores.insert(key, *score);
            }
        }
        Ok(registry)
    }

    /// Trust weight of `source`; [`DEFAULT_REPUTATION`] when unknown or absent.
    pub fn source_reputation(&self, source: Option<&str>) -> f64 {
        let Some(source) = source else {
            return DEFAULT_REPUTATION;
        };
        let scores = self.scores.read().unwrap_or_else(PoisonError::into_inner);
        scores
            .get(&source.to_lowercase())
            .copied()
            .unwrap_or(DEFAULT_REPUTATION)
    }

    /// Register a new source kind.
    ///
    /// Rejects scores outside [0, 1] and kinds that are already registered.
    pub fn register_source_type(&self, source_type: &str, score: f64) -> DomainResult<()> {
        let key = validated_key(source_type, score)?;

        let mut scores = self.scores.write().unwrap_or_else(PoisonError::into_inner);
        if scores.contains_key(&key) {
            return Err(DomainError::DuplicateSourceType(key));
        }
        scores.insert(key.clone(), score);
        tracing::info!(source_type = %key, score, "registered source type");
        Ok(())
    }

    /// Snapshot of every registered source kind.
    pub fn snapshot(&self) -> BTreeMap<String, f64> {
        self.scores
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Normalized registry key for `source_type`, after range-checking `score`.
fn validated_key(source_type: &str, score: f64) -> DomainResult<String> {
    let key = source_type.trim().to_lowercase();
    if key.is_empty() {
        return Err(DomainError::EmptySourceType);
    }
    if !(0.0..=1.0).contains(&score) {
        return Err(DomainError::InvalidReputation {
            source_type: source_type.to_string(),
            score,
        });
    }
    Ok(key)
}

impl Default for SourceReputationRegistry {
    fn default() -> Self {
        Self::new()
    }
}
