use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::AgentRole;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AgentMessage, ContextHandle, MessageKind, RoleKind, Sender};
use crate::domain::ports::{GenerationPurpose, GenerationRequest, TextGenerator};

/// Decomposes the goal into sub-questions for the researcher.
pub struct Planner {
    generator: Arc<dyn TextGenerator>,
}

impl Planner {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl AgentRole for Planner {
    fn role(&self) -> RoleKind {
        RoleKind::Planner
    }

    async fn handle(
        &self,
        message: &AgentMessage,
        ctx: &ContextHandle,
    ) -> DomainResult<Vec<AgentMessage>> {
        let request = GenerationRequest {
            purpose: GenerationPurpose::Plan,
            subject: ctx.goal.clone(),
            prompt: plan_prompt(ctx),
            context: ctx.hints.clone(),
            max_tokens: ctx.limits.max_tokens,
        };
        let output = self
            .generator
            .generate(&request)
            .await
            .map_err(|e| DomainError::RoleFailed {
                role: RoleKind::Planner,
                reason: e.to_string(),
            })?;

        let mut questions = parse_sub_questions(&output);
        if questions.is_empty() {
            debug!("planner produced no sub-questions, using the goal");
            questions.push(ctx.goal.trim().to_string());
        }

        let task = AgentMessage::new(
            MessageKind::Task,
            Sender::Role(RoleKind::Planner),
            vec![RoleKind::Researcher],
            questions.join("\n"),
        )
        .with_revision(message.revision);
        Ok(vec![task])
    }
}

fn plan_prompt(ctx: &ContextHandle) -> String {
    let mut prompt = format!(
        "Break the following goal into short, self-contained research questions, one per line.\n\nGoal: {}",
        ctx.goal
    );
    if !ctx.hints.is_empty() {
        prompt.push_str("\nThe answer must address: ");
        prompt.push_str(&ctx.hints.join(", "));
    }
    prompt
}

/// One question per non-blank line, list markers stripped.
fn parse_sub_questions(output: &str) -> Vec<String> {
    output
        .lines()
        .map(|line| strip_list_marker(line.trim()).trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

fn strip_list_marker(line: &str) -> &str {
    if let Some(rest) = line.strip_prefix(['-', '*']) {
        return rest;
    }
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix(['.', ')']) {
            return rest;
        }
    }
    line
}
