//! Mesh router: the bounded, timeout-guarded walk across agent roles.
//!
//! ## State machine
//!
//! ```text
//!            +--> TERMINAL_SUCCESS     (last message has no recipients)
//!            +--> TERMINAL_HOP_LIMIT   (max_hops messages produced)
//! RUNNING ---+--> TERMINAL_TIMEOUT     (elapsed >= timeout_ms before a hop)
//!            +--> TERMINAL_CANCELLED   (token cancelled before a hop)
//!            +--> TERMINAL_ERROR       (role failure, unknown role, stall)
//! ```
//!
//! Each hop delivers the current message to every role in its `to` list.
//! The roles run concurrently; their messages are appended in `to` order and
//! the walk continues from the last appended message. Every role-produced
//! message consumes one unit of `max_hops`, so a trace never exceeds
//! `max_hops + 1` entries. Bounds and cancellation are checked between hops
//! only, never while a role call is in flight.

use futures::future::join_all;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::domain::errors::DomainError;
use crate::domain::models::{AgentMessage, ContextHandle, MeshRoute, MeshRun, RoleKind, RunState, Trace};
use crate::services::agents::AgentSet;

/// Drives mesh runs. Holds no state between runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeshRouter;

impl MeshRouter {
    pub fn new() -> Self {
        Self
    }

    /// Run the mesh without external cancellation.
    pub async fn run_mesh(
        &self,
        agents: &AgentSet,
        entry: AgentMessage,
        route: &MeshRoute,
        ctx: &ContextHandle,
    ) -> MeshRun {
        self.run_mesh_with_cancel(agents, entry, route, ctx, &CancellationToken::new())
            .await
    }

    /// Run the mesh, checking `cancel` between hops.
    #[instrument(
        skip_all,
        fields(
            session_id = %ctx.session_id,
            strategy = %route.policy.strategy,
            max_hops = route.policy.max_hops,
            timeout_ms = route.policy.timeout_ms,
        )
    )]
    pub async fn run_mesh_with_cancel(
        &self,
        agents: &AgentSet,
        mut entry: AgentMessage,
        route: &MeshRoute,
        ctx: &ContextHandle,
        cancel: &CancellationToken,
    ) -> MeshRun {
        let start = Instant::now();
        let timeout = Duration::from_millis(route.policy.timeout_ms);
        let max_hops = route.policy.max_hops as usize;

        if entry.to != [route.from] {
            debug!(from = %route.from, "addressing entry message to the route start");
            entry.to = vec![route.from];
        }

        let mut walk = Walk {
            trace: Trace::start(entry.clone()),
            current: entry,
            produced: 0,
            hops: 0,
        };

        loop {
            if walk.current.is_terminal() {
                return walk.finish(RunState::TerminalSuccess, None);
            }
            if walk.produced >= max_hops {
                return walk.finish(RunState::TerminalHopLimit, None);
            }
            if cancel.is_cancelled() {
                return walk.finish(RunState::TerminalCancelled, None);
            }
            if start.elapsed() >= timeout {
                return walk.finish(RunState::TerminalTimeout, None);
            }

            let targets = dedup_roles(&walk.current.to);
            let mut resolved = Vec::with_capacity(targets.len());
            for role in &targets {
                match agents.get(*role) {
                    Some(agent) => resolved.push(agent),
                    None => {
                        let err = DomainError::UnknownRole(*role);
                        return walk.finish(RunState::TerminalError, Some(err.to_string()));
                    }
                }
            }

            walk.hops += 1;
            debug!(
                hop = walk.hops,
                kind = %walk.current.kind,
                targets = ?targets,
                "dispatching hop"
            );

            let current = &walk.current;
            let results = join_all(resolved.iter().map(|agent| agent.handle(current, ctx))).await;

            let mut batch = Vec::new();
            let mut failure = None;
            for (role, result) in targets.iter().zip(results) {
                match result {
                    Ok(messages) => batch.extend(messages),
                    Err(err) => {
                        warn!(role = %role, error = %err, "role failed");
                        if failure.is_none() {
                            failure = Some(role_failure(*role, err));
                        }
                    }
                }
            }

            if walk.hops == 1 && !route.to.is_empty() {
                for message in batch.iter_mut().filter(|m| !m.is_terminal()) {
                    message.to.clone_from(&route.to);
                }
            }

            let remaining = max_hops - walk.produced;
            if batch.len() > remaining {
                warn!(
                    produced = batch.len(),
                    remaining, "fan-out exceeds hop budget, dropping surplus messages"
                );
                batch.truncate(remaining);
            }

            let appended = batch.len();
            walk.append(batch);

            if let Some(reason) = failure {
                return walk.finish(RunState::TerminalError, Some(reason));
            }
            if appended == 0 {
                let reason = format!(
                    "stalled: {} produced no message",
                    targets
                        .iter()
                        .map(RoleKind::as_str)
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                return walk.finish(RunState::TerminalError, Some(reason));
            }
        }
    }
}

/// Mutable state of one walk; consumed when the run terminates.
struct Walk {
    trace: Trace,
    current: AgentMessage,
    produced: usize,
    hops: u32,
}

impl Walk {
    fn append(&mut self, messages: Vec<AgentMessage>) {
        for message in messages {
            self.produced += 1;
            self.current = message.clone();
            self.trace.push(message);
        }
    }

    fn finish(self, state: RunState, error: Option<String>) -> MeshRun {
        info!(
            state = %state,
            hops = self.hops,
            trace_len = self.trace.len(),
            error = error.as_deref().unwrap_or(""),
            "mesh run terminated"
        );
        MeshRun {
            final_message: self.current,
            trace: self.trace,
            state,
            error,
            hops: self.hops,
        }
    }
}

/// Roles in first-occurrence order.
fn dedup_roles(roles: &[RoleKind]) -> Vec<RoleKind> {
    let mut seen = Vec::with_capacity(roles.len());
    for role in roles {
        if !seen.contains(role) {
            seen.push(*role);
        }
    }
    seen
}

fn role_failure(role: RoleKind, err: DomainError) -> String {
    match err {
        DomainError::RoleFailed { .. } => err.to_string(),
        other => DomainError::RoleFailed {
            role,
            reason: other.to_string(),
        }
        .to_string(),
    }
}
