//! Agent message protocol.
//!
//! Every hop of a mesh run exchanges [`AgentMessage`] values. A message is
//! addressed to an ordered list of roles; an empty list marks it terminal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::citation::Citation;

/// The five agent roles of the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
    Planner,
    Researcher,
    Synthesizer,
    Critic,
    Validator,
}

impl RoleKind {
    /// All roles in pipeline order.
    pub const ALL: [RoleKind; 5] = [
        Self::Planner,
        Self::Researcher,
        Self::Synthesizer,
        Self::Critic,
        Self::Validator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planner => "planner",
            Self::Researcher => "researcher",
            Self::Synthesizer => "synthesizer",
            Self::Critic => "critic",
            Self::Validator => "validator",
        }
    }
}

impl FromStr for RoleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "planner" => Ok(Self::Planner),
            "researcher" => Ok(Self::Researcher),
            "synthesizer" => Ok(Self::Synthesizer),
            "critic" => Ok(Self::Critic),
            "validator" => Ok(Self::Validator),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who produced a message: the caller or one of the roles.
///
/// Serialized as a bare string: `"user"` or the role name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Sender {
    User,
    Role(RoleKind),
}

impl From<Sender> for String {
    fn from(sender: Sender) -> Self {
        sender.to_string()
    }
}

impl TryFrom<String> for Sender {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.eq_ignore_ascii_case("user") {
            return Ok(Self::User);
        }
        value
            .parse::<RoleKind>()
            .map(Self::Role)
            .map_err(|_| format!("unknown sender: {value}"))
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("user"),
            Self::Role(role) => write!(f, "{role}"),
        }
    }
}

/// Kind of message exchanged between roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageKind {
    /// A task or plan handed to the next role.
    Task,
    /// Retrieved evidence for the plan.
    Evidence,
    /// A drafted answer.
    Draft,
    /// A request for another research pass.
    Critique,
    /// A draft forwarded for final validation.
    Validation,
    /// The answer of the run.
    Result,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Task => "TASK",
            Self::Evidence => "EVIDENCE",
            Self::Draft => "DRAFT",
            Self::Critique => "CRITIQUE",
            Self::Validation => "VALIDATION",
            Self::Result => "RESULT",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a message carries a full or best-effort payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    #[default]
    Ok,
    Degraded,
}

/// A message routed through the mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentMessage {
    /// Unique message ID.
    pub id: Uuid,
    /// Message kind.
    pub kind: MessageKind,
    /// Producer of the message.
    pub from: Sender,
    /// Ordered recipients; empty means terminal.
    pub to: Vec<RoleKind>,
    /// Message body.
    pub content: String,
    /// Citations backing the content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Vec<Citation>>,
    /// Payload quality marker.
    #[serde(default)]
    pub status: MessageStatus,
    /// Number of critique loops this message has been through.
    #[serde(default)]
    pub revision: u32,
    /// When the message was created.
    pub created_at: DateTime<Utc>,
}

impl AgentMessage {
    /// Create a new message.
    pub fn new(
        kind: MessageKind,
        from: Sender,
        to: Vec<RoleKind>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            from,
            to,
            content: content.into(),
            evidence: None,
            status: MessageStatus::Ok,
            revision: 0,
            created_at: Utc::now(),
        }
    }

    /// The caller's entry message for a run.
    pub fn entry(goal: impl Into<String>, to: RoleKind) -> Self {
        Self::new(MessageKind::Task, Sender::User, vec![to], goal)
    }

    /// A terminal message produced by `role`.
    pub fn terminal(kind: MessageKind, role: RoleKind, content: impl Into<String>) -> Self {
        Self::new(kind, Sender::Role(role), Vec::new(), content)
    }

    /// Attach evidence.
    pub fn with_evidence(mut self, evidence: Vec<Citation>) -> Self {
        self.evidence = Some(evidence);
        self
    }

    /// Set the revision counter.
    pub fn with_revision(mut self, revision: u32) -> Self {
        self.revision = revision;
        self
    }

    /// Mark as degraded.
    pub fn degraded(mut self) -> Self {
        self.status = MessageStatus::Degraded;
        self
    }

    /// A message with no recipients ends the run.
    pub fn is_terminal(&self) -> bool {
        self.to.is_empty()
    }

    pub fn is_degraded(&self) -> bool {
        self.status == MessageStatus::Degraded
    }

    /// Evidence as a slice (empty when absent).
    pub fn citations(&self) -> &[Citation] {
        self.evidence.as_deref().unwrap_or(&[])
    }

    /// Whether the message carries any evidence list.
    pub fn has_evidence(&self) -> bool {
        self.evidence.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_names() {
        for role in RoleKind::ALL {
            assert_eq!(role.as_str().parse::<RoleKind>(), Ok(role));
        }
        assert_eq!(" Critic ".parse::<RoleKind>(), Ok(RoleKind::Critic));
        assert!("judge".parse::<RoleKind>().is_err());
    }

    #[test]
    fn test_entry_message_addresses_start_role() {
        let msg = AgentMessage::entry("why is the sky blue", RoleKind::Planner);
        assert_eq!(msg.kind, MessageKind::Task);
        assert_eq!(msg.from, Sender::User);
        assert_eq!(msg.to, vec![RoleKind::Planner]);
        assert!(!msg.is_terminal());
        assert!(msg.citations().is_empty());
    }

    #[test]
    fn test_terminal_and_degraded() {
        let msg = AgentMessage::terminal(MessageKind::Result, RoleKind::Synthesizer, "partial")
            .degraded();
        assert!(msg.is_terminal());
        assert!(msg.is_degraded());
        assert_eq!(msg.from.to_string(), "synthesizer");
    }

    #[test]
    fn test_sender_string_form() {
        assert_eq!(Sender::try_from("user".to_string()), Ok(Sender::User));
        assert_eq!(
            Sender::try_from("critic".to_string()),
            Ok(Sender::Role(RoleKind::Critic))
        );
        assert!(Sender::try_from("nobody".to_string()).is_err());
    }

    #[test]
    fn test_serialized_shape() {
        let msg = AgentMessage::entry("goal", RoleKind::Planner);
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["kind"], "TASK");
        assert_eq!(value["from"], "user");
        assert_eq!(value["to"][0], "planner");
        assert!(value.get("evidence").is_none());

        let back: AgentMessage = serde_json::from_value(value).unwrap();
        assert_eq!(back, msg);
    }
}
