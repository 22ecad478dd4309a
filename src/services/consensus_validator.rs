//! Cross-agent consensus over a finished trace.
//!
//! Every message carrying evidence is scored against the goal, and the final
//! message is always scored. A run is accepted when the final message passes
//! the strategy threshold and at most one intermediate scored message fails.

use tracing::debug;

use crate::domain::models::{
    get_threshold, ConsensusResult, ContextHandle, Disagreement, Thresholds, Trace,
};
use crate::services::scoring_engine::{
    get_validation_feedback, is_validation_passing, ScoringEngine,
};

/// Intermediate failures tolerated in an accepted run.
pub const MAX_INTERMEDIATE_FAILURES: usize = 1;

/// Decides acceptance of a run under a named strategy.
#[derive(Debug, Clone)]
pub struct ConsensusValidator {
    engine: ScoringEngine,
    thresholds: Thresholds,
}

impl ConsensusValidator {
    pub fn new(engine: ScoringEngine, thresholds: Thresholds) -> Self {
        Self { engine, thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn validate_consensus(
        &self,
        trace: &Trace,
        strategy: &str,
        ctx: &ContextHandle,
    ) -> ConsensusResult {
        let Some(final_index) = trace.len().checked_sub(1) else {
            return ConsensusResult::default();
        };
        let threshold = get_threshold(&self.thresholds, strategy);

        let mut disagreements = Vec::new();
        let mut intermediate_failures = 0;
        let mut final_passes = false;

        for (hop, message) in trace.iter().enumerate() {
            let is_final = hop == final_index;
            if !is_final && !message.has_evidence() {
                continue;
            }

            let score = self.engine.score_validation(
                &message.content,
                &ctx.goal,
                message.citations(),
                Some(&ctx.hints),
            );
            let passes = is_validation_passing(&score, threshold);

            if is_final {
                final_passes = passes;
            } else if !passes {
                intermediate_failures += 1;
            }

            if !passes {
                disagreements.push(Disagreement {
                    hop,
                    reason: format!(
                        "{} {} scored {:.3} below threshold {:.3}: {}",
                        message.from,
                        message.kind,
                        score.final_score,
                        threshold,
                        get_validation_feedback(&score)
                    ),
                });
            }
        }

        let accepted = final_passes && intermediate_failures <= MAX_INTERMEDIATE_FAILURES;
        debug!(
            strategy,
            threshold,
            accepted,
            intermediate_failures,
            "consensus evaluated"
        );

        ConsensusResult {
            accepted,
            disagreements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{AgentMessage, Citation, MessageKind, RoleKind, Sender};
    use crate::services::source_reputation::SourceReputationRegistry;
    use std::sync::Arc;

    const GOAL: &str = "rust ownership rules";

    fn validator() -> ConsensusValidator {
        ConsensusValidator::new(
            ScoringEngine::new(Arc::new(SourceReputationRegistry::new())),
            Thresholds::default(),
        )
    }

    fn kb(n: usize) -> Vec<Citation> {
        (0..n)
            .map(|i| Citation::new(format!("kb:{i}"), 1.0, "s").with_source("kb"))
            .collect()
    }

    fn strong(kind: MessageKind, to: Vec<RoleKind>) -> AgentMessage {
        AgentMessage::new(kind, Sender::Role(RoleKind::Researcher), to, "rust ownership rules")
            .with_evidence(kb(6))
    }

    fn weak(kind: MessageKind, to: Vec<RoleKind>) -> AgentMessage {
        AgentMessage::new(kind, Sender::Role(RoleKind::Researcher), to, "nothing")
            .with_evidence(Vec::new())
    }

    fn ctx() -> ContextHandle {
        ContextHandle::new("u", "s", GOAL)
    }

    fn trace(messages: Vec<AgentMessage>) -> Trace {
        let mut all = vec![AgentMessage::entry(GOAL, RoleKind::Planner)];
        all.extend(messages);
        Trace::from(all)
    }

    #[test]
    fn test_all_strong_is_accepted() {
        let t = trace(vec![
            strong(MessageKind::Evidence, vec![RoleKind::Synthesizer]),
            strong(MessageKind::Result, Vec::new()),
        ]);
        let result = validator().validate_consensus(&t, "critic", &ctx());
        assert!(result.accepted);
        assert!(result.disagreements.is_empty());
    }

    #[test]
    fn test_one_intermediate_failure_tolerated() {
        let t = trace(vec![
            weak(MessageKind::Evidence, vec![RoleKind::Synthesizer]),
            strong(MessageKind::Draft, vec![RoleKind::Critic]),
            strong(MessageKind::Result, Vec::new()),
        ]);
        let result = validator().validate_consensus(&t, "critic", &ctx());
        assert!(result.accepted);
        assert_eq!(result.disagreements.len(), 1);
        assert_eq!(result.disagreements[0].hop, 1);
        assert!(result.disagreements[0].reason.contains("insufficient citations"));
    }

    #[test]
    fn test_two_intermediate_failures_reject() {
        let t = trace(vec![
            weak(MessageKind::Evidence, vec![RoleKind::Synthesizer]),
            weak(MessageKind::Draft, vec![RoleKind::Critic]),
            strong(MessageKind::Result, Vec::new()),
        ]);
        let result = validator().validate_consensus(&t, "critic", &ctx());
        assert!(!result.accepted);
        assert_eq!(result.disagreements.len(), 2);
    }

    #[test]
    fn test_failing_final_rejects() {
        let t = trace(vec![
            strong(MessageKind::Evidence, vec![RoleKind::Synthesizer]),
            weak(MessageKind::Result, Vec::new()),
        ]);
        let result = validator().validate_consensus(&t, "unknown-strategy", &ctx());
        assert!(!result.accepted);
        assert_eq!(result.disagreements.len(), 1);
        assert_eq!(result.disagreements[0].hop, 2);
        assert!(result.disagreements[0].reason.contains("0.550"));
    }

    #[test]
    fn test_messages_without_evidence_are_not_scored() {
        let task = AgentMessage::new(
            MessageKind::Task,
            Sender::Role(RoleKind::Planner),
            vec![RoleKind::Researcher],
            "nothing",
        );
        let t = trace(vec![task, strong(MessageKind::Result, Vec::new())]);
        let result = validator().validate_consensus(&t, "default", &ctx());
        assert!(result.accepted);
        assert!(result.disagreements.is_empty());
    }

    #[test]
    fn test_empty_trace_not_accepted() {
        let result = validator().validate_consensus(&Trace::default(), "default", &ctx());
        assert!(!result.accepted);
    }
}
