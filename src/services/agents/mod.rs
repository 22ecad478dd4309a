//! Agent roles of the cognitive mesh.
//!
//! Every role implements [`AgentRole`]: consume one message plus the shared
//! read-only context, produce zero or more messages. The [`AgentSet`] maps
//! role kinds to implementations and is what the router dispatches against.
//!
//! | Role | Consumes | Produces |
//! |-------------|----------------------|-------------------------------------------|
//! | Planner | TASK | TASK to researcher |
//! | Researcher | TASK, CRITIQUE | EVIDENCE to synthesizer |
//! | Synthesizer | EVIDENCE | DRAFT to critic, or degraded RESULT |
//! | Critic | DRAFT | CRITIQUE to researcher, or VALIDATION |
//! | Validator | VALIDATION | RESULT, CRITIQUE, or degraded RESULT |

pub mod critic;
pub mod planner;
pub mod researcher;
pub mod synthesizer;
pub mod validator;

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::errors::DomainResult;
use crate::domain::models::{AgentMessage, ContextHandle, MeshConfig, RoleKind, Thresholds};
use crate::domain::ports::TextGenerator;
use crate::services::evidence_pipeline::EvidencePipeline;
use crate::services::scoring_engine::ScoringEngine;

pub use critic::Critic;
pub use planner::Planner;
pub use researcher::Researcher;
pub use synthesizer::Synthesizer;
pub use validator::Validator;

/// One role of the mesh.
#[async_trait]
pub trait AgentRole: Send + Sync {
    /// The role this implementation plays.
    fn role(&self) -> RoleKind;

    /// Handle one incoming message.
    ///
    /// An `Err` is fatal for the run; best-effort answers are returned as
    /// degraded terminal messages instead.
    async fn handle(
        &self,
        message: &AgentMessage,
        ctx: &ContextHandle,
    ) -> DomainResult<Vec<AgentMessage>>;
}

/// Registry of role implementations, keyed by role kind.
#[derive(Clone, Default)]
pub struct AgentSet {
    agents: BTreeMap<RoleKind, Arc<dyn AgentRole>>,
}

impl AgentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The five standard roles wired to shared collaborators.
    pub fn standard(
        generator: Arc<dyn TextGenerator>,
        pipeline: Arc<EvidencePipeline>,
        scoring: ScoringEngine,
        thresholds: Thresholds,
        mesh: &MeshConfig,
    ) -> Self {
        Self::new()
            .with(Planner::new(Arc::clone(&generator)))
            .with(Researcher::new(pipeline))
            .with(Synthesizer::new(generator))
            .with(Critic::new(mesh.clone()))
            .with(Validator::new(scoring, thresholds, mesh.clone()))
    }

    /// Register (or replace) the implementation for its role.
    pub fn register(&mut self, agent: Arc<dyn AgentRole>) {
        self.agents.insert(agent.role(), agent);
    }

    /// Builder form of [`AgentSet::register`].
    pub fn with<A: AgentRole + 'static>(mut self, agent: A) -> Self {
        self.register(Arc::new(agent));
        self
    }

    pub fn get(&self, role: RoleKind) -> Option<&Arc<dyn AgentRole>> {
        self.agents.get(&role)
    }

    pub fn contains(&self, role: RoleKind) -> bool {
        self.agents.contains_key(&role)
    }

    pub fn roles(&self) -> impl Iterator<Item = RoleKind> + '_ {
        self.agents.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl std::fmt::Debug for AgentSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.agents.keys()).finish()
    }
}

/// Non-blank hints absent (case-insensitively) from `text`, in hint order.
pub(crate) fn missing_hints<'a>(text: &str, hints: &'a [String]) -> Vec<&'a str> {
    let haystack = text.to_lowercase();
    hints
        .iter()
        .map(|h| h.trim())
        .filter(|h| !h.is_empty() && !haystack.contains(&h.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{MessageKind, Sender};

    struct Echo(RoleKind);

    #[async_trait]
    impl AgentRole for Echo {
        fn role(&self) -> RoleKind {
            self.0
        }

        async fn handle(
            &self,
            message: &AgentMessage,
            _ctx: &ContextHandle,
        ) -> DomainResult<Vec<AgentMessage>> {
            Ok(vec![AgentMessage::new(
                MessageKind::Result,
                Sender::Role(self.0),
                Vec::new(),
                message.content.clone(),
            )])
        }
    }

    #[test]
    fn test_register_replaces_by_role() {
        let set = AgentSet::new()
            .with(Echo(RoleKind::Critic))
            .with(Echo(RoleKind::Critic))
            .with(Echo(RoleKind::Planner));
        assert_eq!(set.len(), 2);
        assert!(set.contains(RoleKind::Critic));
        assert!(!set.contains(RoleKind::Validator));
        assert_eq!(
            set.roles().collect::<Vec<_>>(),
            vec![RoleKind::Planner, RoleKind::Critic]
        );
    }

    #[test]
    fn test_missing_hints() {
        let hints = vec![
            "Latency".to_string(),
            " ".to_string(),
            "cost".to_string(),
        ];
        assert_eq!(missing_hints("latency is low", &hints), vec!["cost"]);
        assert!(missing_hints("LATENCY and cost", &hints).is_empty());
    }
}
