//! Cogmesh - Cognitive Mesh Orchestration & Knowledge-Validation Engine
//!
//! Cogmesh routes a reasoning goal through a small graph of agent roles
//! (planner, researcher, synthesizer, critic, validator). Roles consult a
//! retrieval pipeline for evidence, and the combined output must pass a
//! quality score and a cross-role consensus check before it is accepted.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): messages, evidence, scoring models and port traits
//! - **Service Layer** (`services`): retrieval pipeline, scoring, roles, router, consensus
//! - **Adapters** (`adapters`): document store, text generators, identity
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use cogmesh::adapters::{InMemoryDocumentStore, StaticIdentity, TemplateGenerator};
//! use cogmesh::{Config, MeshService, RunRequest};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let service = MeshService::new(
//!         &Config::default(),
//!         Arc::new(InMemoryDocumentStore::new()),
//!         Arc::new(TemplateGenerator::new()),
//!         Arc::new(StaticIdentity::new("local")),
//!     )?;
//!     let response = service.run(RunRequest::new("what is a waker")).await?;
//!     println!("{} {}", response.state, response.consensus.accepted);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    AgentMessage, Citation, Config, ConsensusResult, ContextHandle, MeshRoute, RoleKind,
    RunRequest, RunResponse, RunState, Thresholds, Trace, ValidationScore,
};
pub use domain::ports::{DocumentStore, IdentityProvider, TextGenerator};
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{ConsensusValidator, MeshRouter, MeshService, ScoringEngine};
