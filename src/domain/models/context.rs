use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Resource limits for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextLimits {
    /// Token budget handed to text generation.
    pub max_tokens: u32,
    /// Wall-clock budget for the whole run, in milliseconds.
    pub max_latency_ms: u64,
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self {
            max_tokens: 1024,
            max_latency_ms: 30_000,
        }
    }
}

/// Read-only context shared by every role during one run.
///
/// Created once per request and never modified afterwards; roles only
/// receive shared references to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextHandle {
    pub user_id: String,
    pub session_id: String,
    pub goal: String,
    /// Ordered hints the answer should address.
    pub hints: Vec<String>,
    pub cluster_ids: BTreeSet<String>,
    pub limits: ContextLimits,
    /// Resolved strategy name for this run.
    pub strategy: String,
}

impl ContextHandle {
    pub fn new(
        user_id: impl Into<String>,
        session_id: impl Into<String>,
        goal: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            session_id: session_id.into(),
            goal: goal.into(),
            hints: Vec::new(),
            cluster_ids: BTreeSet::new(),
            limits: ContextLimits::default(),
            strategy: "default".to_string(),
        }
    }

    pub fn with_hints(mut self, hints: Vec<String>) -> Self {
        self.hints = hints;
        self
    }

    pub fn with_clusters<I, S>(mut self, cluster_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cluster_ids = cluster_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_limits(mut self, limits: ContextLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = strategy.into();
        self
    }
}
