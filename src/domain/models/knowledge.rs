//! Records read from the external document store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named cluster of knowledge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Cluster {
    /// Text used as evidence for this cluster.
    pub fn evidence_text(&self) -> String {
        if self.summary.trim().is_empty() {
            self.title.clone()
        } else {
            format!("{}: {}", self.title, self.summary)
        }
    }
}

/// An artifact a user linked into their workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedArtifact {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl LinkedArtifact {
    pub fn evidence_text(&self) -> String {
        if self.description.trim().is_empty() {
            self.title.clone()
        } else {
            format!("{}. {}", self.title, self.description)
        }
    }
}

/// A short memory snippet saved by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemorySnippet {
    pub id: String,
    pub owner_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}
