use async_trait::async_trait;
use tracing::debug;

use super::AgentRole;
use crate::domain::errors::DomainResult;
use crate::domain::models::{
    get_threshold, AgentMessage, ContextHandle, MeshConfig, MessageKind, RoleKind, Sender,
    Thresholds,
};
use crate::services::scoring_engine::{
    get_validation_feedback, is_validation_passing, ScoringEngine,
};

/// Final quality gate before a result leaves the mesh.
pub struct Validator {
    scoring: ScoringEngine,
    thresholds: Thresholds,
    mesh: MeshConfig,
}

impl Validator {
    pub fn new(scoring: ScoringEngine, thresholds: Thresholds, mesh: MeshConfig) -> Self {
        Self {
            scoring,
            thresholds,
            mesh,
        }
    }
}

#[async_trait]
impl AgentRole for Validator {
    fn role(&self) -> RoleKind {
        RoleKind::Validator
    }

    async fn handle(
        &self,
        message: &AgentMessage,
        ctx: &ContextHandle,
    ) -> DomainResult<Vec<AgentMessage>> {
        let score = self.scoring.score_validation(
            &message.content,
            &ctx.goal,
            message.citations(),
            Some(&ctx.hints),
        );
        let threshold = get_threshold(&self.thresholds, &ctx.strategy);
        let evidence = message.evidence.clone().unwrap_or_default();

        if is_validation_passing(&score, threshold) {
            debug!(score = score.final_score, threshold, "validation passed");
            let mut result =
                AgentMessage::terminal(MessageKind::Result, RoleKind::Validator, message.content.clone())
                    .with_evidence(evidence)
                    .with_revision(message.revision);
            result.status = message.status;
            return Ok(vec![result]);
        }

        let feedback = get_validation_feedback(&score);
        let budget = self.mesh.revisions_for(&ctx.strategy);
        debug!(
            score = score.final_score,
            threshold,
            revision = message.revision,
            budget,
            %feedback,
            "validation failed"
        );

        if message.revision < budget {
            let critique = AgentMessage::new(
                MessageKind::Critique,
                Sender::Role(RoleKind::Validator),
                vec![RoleKind::Researcher],
                format!(
                    "Score {:.3} below threshold {:.3}: {}",
                    score.final_score, threshold, feedback
                ),
            )
            .with_revision(message.revision + 1);
            return Ok(vec![critique]);
        }

        let result =
            AgentMessage::terminal(MessageKind::Result, RoleKind::Validator, message.content.clone())
                .with_evidence(evidence)
                .with_revision(message.revision)
                .degraded();
        Ok(vec![result])
    }
}
