//! Mesh run lifecycle: terminal states, traces, request and response shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::consensus::ConsensusResult;
use super::message::AgentMessage;

/// State of a mesh run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunState {
    Running,
    TerminalSuccess,
    TerminalHopLimit,
    TerminalTimeout,
    TerminalCancelled,
    TerminalError,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "RUNNING",
            Self::TerminalSuccess => "TERMINAL_SUCCESS",
            Self::TerminalHopLimit => "TERMINAL_HOP_LIMIT",
            Self::TerminalTimeout => "TERMINAL_TIMEOUT",
            Self::TerminalCancelled => "TERMINAL_CANCELLED",
            Self::TerminalError => "TERMINAL_ERROR",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only, ordered history of the messages of one run.
///
/// Only the router appends; once a run has terminated the trace is handed
/// out by value and exposes read access only.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trace {
    messages: Vec<AgentMessage>,
}

impl Trace {
    pub(crate) fn start(entry: AgentMessage) -> Self {
        Self {
            messages: vec![entry],
        }
    }

    pub(crate) fn push(&mut self, message: AgentMessage) {
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[AgentMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&AgentMessage> {
        self.messages.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AgentMessage> {
        self.messages.iter()
    }

    /// Summed content length of every message.
    pub fn content_len(&self) -> usize {
        self.messages.iter().map(|m| m.content.chars().count()).sum()
    }
}

impl From<Vec<AgentMessage>> for Trace {
    fn from(messages: Vec<AgentMessage>) -> Self {
        Self { messages }
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a AgentMessage;
    type IntoIter = std::slice::Iter<'a, AgentMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

/// Outcome of a router walk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshRun {
    /// Last message appended before termination.
    #[serde(rename = "final")]
    pub final_message: AgentMessage,
    pub trace: Trace,
    pub state: RunState,
    /// Description of the failure when `state` is `TERMINAL_ERROR`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Number of hops dispatched.
    pub hops: u32,
}

/// A request to run the mesh.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RunRequest {
    pub goal: String,
    #[serde(default)]
    pub hints: Vec<String>,
    #[serde(default)]
    pub cluster_ids: Vec<String>,
    /// Strategy name; the configured default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
}

impl RunRequest {
    pub fn new(goal: impl Into<String>) -> Self {
        Self {
            goal: goal.into(),
            ..Default::default()
        }
    }

    pub fn with_hints(mut self, hints: Vec<String>) -> Self {
        self.hints = hints;
        self
    }

    pub fn with_clusters(mut self, cluster_ids: Vec<String>) -> Self {
        self.cluster_ids = cluster_ids;
        self
    }

    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }
}

/// Run metrics reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunMetrics {
    pub total_ms: u64,
    /// Proxy: summed content length of the trace.
    pub tokens_used: u64,
    pub citations_count: usize,
}

/// Structured response for every started run, whatever its outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResponse {
    pub session_id: String,
    #[serde(rename = "final")]
    pub final_message: AgentMessage,
    pub trace: Trace,
    pub consensus: ConsensusResult,
    pub metrics: RunMetrics,
    pub state: RunState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Everything persisted for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: String,
    pub user_id: String,
    pub goal: String,
    pub strategy: String,
    pub trace: Trace,
    #[serde(rename = "final")]
    pub final_message: AgentMessage,
    pub consensus: ConsensusResult,
    pub metrics: RunMetrics,
    pub state: RunState,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}
