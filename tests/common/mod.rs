//! Common test utilities for integration tests
//!
//! Provides shared fixtures, stub roles and helpers used across multiple
//! integration test files.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cogmesh::adapters::{InMemoryDocumentStore, StaticIdentity, TemplateGenerator};
use cogmesh::domain::models::{
    AgentMessage, Cluster, Config, ContextHandle, LinkedArtifact, MemorySnippet, MessageKind,
    RoleKind, Sender,
};
use cogmesh::services::AgentRole;
use cogmesh::{DomainError, DomainResult, MeshService};

pub const USER: &str = "alice";

/// Setup test logging
///
/// Call this at the beginning of tests that need log output.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Store seeded with one cluster, two links and three snippets for [`USER`].
pub fn seeded_store() -> InMemoryDocumentStore {
    let base = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).single().unwrap_or_else(Utc::now);
    let store = InMemoryDocumentStore::new();

    store.add_cluster(Cluster {
        id: "rt".to_string(),
        title: "Async runtimes".to_string(),
        summary: "Tokio schedules futures on a work-stealing executor".to_string(),
        url: Some("https://tokio.rs".to_string()),
    });
    store.add_link(LinkedArtifact {
        id: "book".to_string(),
        owner_id: USER.to_string(),
        title: "Async book".to_string(),
        description: "Futures are polled by an executor until they complete".to_string(),
        url: Some("https://rust-lang.github.io/async-book/".to_string()),
        created_at: base,
    });
    store.add_link(LinkedArtifact {
        id: "elsewhere".to_string(),
        owner_id: "bob".to_string(),
        title: "Bob's private link".to_string(),
        description: String::new(),
        url: None,
        created_at: base,
    });
    for (i, text) in [
        "Tokio is an async runtime for Rust with a multi-threaded scheduler",
        "A waker notifies the executor that a future can make progress",
        "Tokio tasks are lightweight green threads scheduled by the runtime",
    ]
    .iter()
    .enumerate()
    {
        store.add_snippet(MemorySnippet {
            id: format!("s{i}"),
            owner_id: USER.to_string(),
            text: (*text).to_string(),
            created_at: base + Duration::minutes(i64::try_from(i).unwrap_or(0)),
        });
    }
    store
}

/// Mesh service over `store` with the template generator.
pub fn service(config: &Config, store: Arc<InMemoryDocumentStore>) -> MeshService {
    MeshService::new(
        config,
        store,
        Arc::new(TemplateGenerator::new()),
        Arc::new(StaticIdentity::new(USER)),
    )
    .unwrap()
}

pub fn ctx(goal: &str) -> ContextHandle {
    ContextHandle::new(USER, "session-test", goal)
}

/// A role that forwards every message to fixed recipients.
///
/// Empty `next` produces a terminal `RESULT`.
pub struct Relay {
    pub role: RoleKind,
    pub next: Vec<RoleKind>,
    pub calls: Arc<AtomicUsize>,
}

impl Relay {
    pub fn new(role: RoleKind, next: Vec<RoleKind>) -> Self {
        Self {
            role,
            next,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn terminal(role: RoleKind) -> Self {
        Self::new(role, Vec::new())
    }
}

#[async_trait]
impl AgentRole for Relay {
    fn role(&self) -> RoleKind {
        self.role
    }

    async fn handle(
        &self,
        message: &AgentMessage,
        _ctx: &ContextHandle,
    ) -> DomainResult<Vec<AgentMessage>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let kind = if self.next.is_empty() {
            MessageKind::Result
        } else {
            MessageKind::Task
        };
        Ok(vec![AgentMessage::new(
            kind,
            Sender::Role(self.role),
            self.next.clone(),
            format!("{} <- {}", self.role, message.content),
        )
        .with_revision(message.revision)])
    }
}

/// A role that returns `count` messages per call.
pub struct Burst {
    pub role: RoleKind,
    pub next: Vec<RoleKind>,
    pub count: usize,
}

#[async_trait]
impl AgentRole for Burst {
    fn role(&self) -> RoleKind {
        self.role
    }

    async fn handle(
        &self,
        _message: &AgentMessage,
        _ctx: &ContextHandle,
    ) -> DomainResult<Vec<AgentMessage>> {
        Ok((0..self.count)
            .map(|i| {
                AgentMessage::new(
                    MessageKind::Evidence,
                    Sender::Role(self.role),
                    self.next.clone(),
                    format!("burst {i}"),
                )
            })
            .collect())
    }
}

/// A role that always fails.
pub struct Failing(pub RoleKind);

#[async_trait]
impl AgentRole for Failing {
    fn role(&self) -> RoleKind {
        self.0
    }

    async fn handle(
        &self,
        _message: &AgentMessage,
        _ctx: &ContextHandle,
    ) -> DomainResult<Vec<AgentMessage>> {
        Err(DomainError::GenerationFailed("upstream unavailable".to_string()))
    }
}

/// A role that returns no messages.
pub struct Silent(pub RoleKind);

#[async_trait]
impl AgentRole for Silent {
    fn role(&self) -> RoleKind {
        self.0
    }

    async fn handle(
        &self,
        _message: &AgentMessage,
        _ctx: &ContextHandle,
    ) -> DomainResult<Vec<AgentMessage>> {
        Ok(Vec::new())
    }
}
