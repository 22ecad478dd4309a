use async_trait::async_trait;
use tracing::debug;

use super::{missing_hints, AgentRole};
use crate::domain::errors::DomainResult;
use crate::domain::models::{
    AgentMessage, ContextHandle, MeshConfig, MessageKind, RoleKind, Sender,
};
use crate::services::terms::unique_terms;

/// Minimum fraction of goal terms a draft must mention.
pub const MIN_GOAL_COVERAGE: f64 = 0.5;

/// Reviews drafts for hint and goal coverage before validation.
///
/// A draft missing hints, or mentioning too few goal terms, is sent back to
/// the researcher while the strategy's revision budget lasts; otherwise it
/// moves on to the validator.
pub struct Critic {
    mesh: MeshConfig,
}

impl Critic {
    pub fn new(mesh: MeshConfig) -> Self {
        Self { mesh }
    }
}

#[async_trait]
impl AgentRole for Critic {
    fn role(&self) -> RoleKind {
        RoleKind::Critic
    }

    async fn handle(
        &self,
        message: &AgentMessage,
        ctx: &ContextHandle,
    ) -> DomainResult<Vec<AgentMessage>> {
        let missing = missing_hints(&message.content, &ctx.hints);
        let uncovered = uncovered_goal_terms(&message.content, &ctx.goal);
        let budget = self.mesh.revisions_for(&ctx.strategy);

        if (!missing.is_empty() || !uncovered.is_empty()) && message.revision < budget {
            debug!(
                revision = message.revision,
                budget,
                missing = missing.len(),
                uncovered = uncovered.len(),
                "critic requests another research pass"
            );
            let mut issues = Vec::new();
            if !missing.is_empty() {
                issues.push(format!("Draft does not address: {}", missing.join(", ")));
            }
            if !uncovered.is_empty() {
                issues.push(format!("Draft does not cover goal terms: {}", uncovered.join(", ")));
            }
            let critique = AgentMessage::new(
                MessageKind::Critique,
                Sender::Role(RoleKind::Critic),
                vec![RoleKind::Researcher],
                issues.join("\n"),
            )
            .with_revision(message.revision + 1);
            return Ok(vec![critique]);
        }

        let mut forward = AgentMessage::new(
            MessageKind::Validation,
            Sender::Role(RoleKind::Critic),
            vec![RoleKind::Validator],
            message.content.clone(),
        )
        .with_revision(message.revision);
        forward.evidence.clone_from(&message.evidence);
        forward.status = message.status;
        Ok(vec![forward])
    }
}

/// Goal terms absent from `draft`, or nothing when coverage reaches
/// [`MIN_GOAL_COVERAGE`].
fn uncovered_goal_terms(draft: &str, goal: &str) -> Vec<String> {
    let terms = unique_terms(goal);
    if terms.is_empty() {
        return Vec::new();
    }
    let total = terms.len() as f64;
    let haystack = draft.to_lowercase();
    let uncovered: Vec<String> = terms
        .into_iter()
        .filter(|t| !haystack.contains(t.as_str()))
        .collect();
    let coverage = (total - uncovered.len() as f64) / total;
    if coverage >= MIN_GOAL_COVERAGE {
        Vec::new()
    } else {
        uncovered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Citation;
    use std::collections::BTreeMap;

    fn draft(content: &str, revision: u32) -> AgentMessage {
        AgentMessage::new(
            MessageKind::Draft,
            Sender::Role(RoleKind::Synthesizer),
            vec![RoleKind::Critic],
            content,
        )
        .with_evidence(vec![Citation::new("kb:1", 1.0, "s")])
        .with_revision(revision)
    }

    fn ctx() -> ContextHandle {
        ContextHandle::new("u", "s", "goal")
            .with_hints(vec!["latency".to_string()])
            .with_strategy("critic")
    }

    #[tokio::test]
    async fn test_missing_hint_loops_back() {
        let critic = Critic::new(MeshConfig::default());
        let out = critic.handle(&draft("about throughput", 0), &ctx()).await.unwrap();
        assert_eq!(out[0].kind, MessageKind::Critique);
        assert_eq!(out[0].to, vec![RoleKind::Researcher]);
        assert_eq!(out[0].revision, 1);
        assert!(out[0].evidence.is_none());
        assert!(out[0].content.contains("latency"));
    }

    #[tokio::test]
    async fn test_budget_exhausted_forwards_to_validator() {
        let critic = Critic::new(MeshConfig::default());
        let out = critic.handle(&draft("about throughput", 2), &ctx()).await.unwrap();
        assert_eq!(out[0].kind, MessageKind::Validation);
        assert_eq!(out[0].to, vec![RoleKind::Validator]);
        assert_eq!(out[0].citations().len(), 1);
        assert_eq!(out[0].revision, 2);
    }

    #[tokio::test]
    async fn test_covered_draft_forwards() {
        let critic = Critic::new(MeshConfig {
            revisions: BTreeMap::from([("default".to_string(), 5)]),
            ..MeshConfig::default()
        });
        let out = critic.handle(&draft("low LATENCY goal", 0), &ctx()).await.unwrap();
        assert_eq!(out[0].kind, MessageKind::Validation);
        assert_eq!(out[0].content, "low LATENCY goal");
    }

    #[tokio::test]
    async fn test_off_goal_draft_loops_back_without_hints() {
        let critic = Critic::new(MeshConfig::default());
        let ctx = ContextHandle::new("u", "s", "tokio scheduler internals").with_strategy("critic");

        let out = critic.handle(&draft("gardening tips", 0), &ctx).await.unwrap();
        assert_eq!(out[0].kind, MessageKind::Critique);
        assert_eq!(out[0].to, vec![RoleKind::Researcher]);
        assert!(out[0].content.contains("scheduler"), "{}", out[0].content);

        let out = critic
            .handle(&draft("The Tokio scheduler steals work", 0), &ctx)
            .await
            .unwrap();
        assert_eq!(out[0].kind, MessageKind::Validation);
    }

    #[test]
    fn test_goal_coverage_threshold() {
        assert!(uncovered_goal_terms("anything", "").is_empty());
        assert!(uncovered_goal_terms("rust only", "rust ownership").is_empty());
        assert_eq!(
            uncovered_goal_terms("nothing here", "rust ownership"),
            vec!["ownership".to_string(), "rust".to_string()]
        );
    }
}
