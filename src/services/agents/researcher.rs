use async_trait::async_trait;
use std::sync::Arc;

use super::AgentRole;
use crate::domain::errors::DomainResult;
use crate::domain::models::{AgentMessage, ContextHandle, MessageKind, RoleKind, Sender};
use crate::services::evidence_pipeline::EvidencePipeline;

/// Attaches retrieved evidence and hands it to the synthesizer.
pub struct Researcher {
    pipeline: Arc<EvidencePipeline>,
}

impl Researcher {
    pub fn new(pipeline: Arc<EvidencePipeline>) -> Self {
        Self { pipeline }
    }
}

#[async_trait]
impl AgentRole for Researcher {
    fn role(&self) -> RoleKind {
        RoleKind::Researcher
    }

    async fn handle(
        &self,
        message: &AgentMessage,
        ctx: &ContextHandle,
    ) -> DomainResult<Vec<AgentMessage>> {
        let query = research_query(message, ctx);
        let citations = self.pipeline.gather(&query, ctx).await;

        let content = citations
            .iter()
            .enumerate()
            .map(|(i, c)| format!("[{}] {}", i + 1, c.snippet))
            .collect::<Vec<_>>()
            .join("\n");

        let evidence = AgentMessage::new(
            MessageKind::Evidence,
            Sender::Role(RoleKind::Researcher),
            vec![RoleKind::Synthesizer],
            content,
        )
        .with_evidence(citations)
        .with_revision(message.revision);
        Ok(vec![evidence])
    }
}

/// Retrieval query for an incoming message.
///
/// Tasks widen the goal with the planner's sub-questions, one per line.
/// Critiques widen it with the hints they name, or with every hint when
/// they name none.
fn research_query(message: &AgentMessage, ctx: &ContextHandle) -> String {
    let goal = ctx.goal.trim();
    let mut parts = vec![goal];

    if message.kind == MessageKind::Critique {
        let hints: Vec<&str> = ctx
            .hints
            .iter()
            .map(|h| h.trim())
            .filter(|h| !h.is_empty())
            .collect();
        let critique = message.content.to_lowercase();
        let named: Vec<&str> = hints
            .iter()
            .copied()
            .filter(|h| critique.contains(&h.to_lowercase()))
            .collect();
        parts.extend(if named.is_empty() { hints } else { named });
    } else {
        parts.extend(
            message
                .content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.eq_ignore_ascii_case(goal)),
        );
    }

    parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
