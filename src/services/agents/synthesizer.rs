use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use super::AgentRole;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AgentMessage, ContextHandle, MessageKind, RoleKind, Sender};
use crate::domain::ports::{GenerationPurpose, GenerationRequest, TextGenerator};

/// Drafts an answer from the attached evidence.
pub struct Synthesizer {
    generator: Arc<dyn TextGenerator>,
}

impl Synthesizer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl AgentRole for Synthesizer {
    fn role(&self) -> RoleKind {
        RoleKind::Synthesizer
    }

    async fn handle(
        &self,
        message: &AgentMessage,
        ctx: &ContextHandle,
    ) -> DomainResult<Vec<AgentMessage>> {
        let citations = message.citations().to_vec();
        let snippets: Vec<String> = citations.iter().map(|c| c.snippet.clone()).collect();

        let request = GenerationRequest {
            purpose: GenerationPurpose::Draft,
            subject: ctx.goal.clone(),
            prompt: draft_prompt(ctx, &snippets),
            context: snippets.clone(),
            max_tokens: ctx.limits.max_tokens,
        };
        let draft = self
            .generator
            .generate(&request)
            .await
            .map_err(|e| DomainError::RoleFailed {
                role: RoleKind::Synthesizer,
                reason: e.to_string(),
            })?;
        let draft = draft.trim();

        if draft.is_empty() {
            if citations.is_empty() {
                warn!(session_id = %ctx.session_id, "no evidence and no draft, ending with degraded result");
                let result = AgentMessage::terminal(
                    MessageKind::Result,
                    RoleKind::Synthesizer,
                    format!("No supported answer could be drafted for: {}", ctx.goal),
                )
                .with_evidence(citations)
                .with_revision(message.revision)
                .degraded();
                return Ok(vec![result]);
            }

            warn!(session_id = %ctx.session_id, "empty draft, forwarding raw evidence");
            let fallback = AgentMessage::new(
                MessageKind::Draft,
                Sender::Role(RoleKind::Synthesizer),
                vec![RoleKind::Critic],
                snippets.join("\n"),
            )
            .with_evidence(citations)
            .with_revision(message.revision)
            .degraded();
            return Ok(vec![fallback]);
        }

        let out = AgentMessage::new(
            MessageKind::Draft,
            Sender::Role(RoleKind::Synthesizer),
            vec![RoleKind::Critic],
            draft,
        )
        .with_evidence(citations)
        .with_revision(message.revision);
        Ok(vec![out])
    }
}

fn draft_prompt(ctx: &ContextHandle, snippets: &[String]) -> String {
    let mut prompt = format!(
        "Answer the goal using only the numbered evidence. Cite evidence as [n].\n\nGoal: {}\n",
        ctx.goal
    );
    if !ctx.hints.is_empty() {
        prompt.push_str(&format!("Address: {}\n", ctx.hints.join(", ")));
    }
    prompt.push_str("\nEvidence:\n");
    for (i, snippet) in snippets.iter().enumerate() {
        prompt.push_str(&format!("[{}] {}\n", i + 1, snippet));
    }
    prompt
}
