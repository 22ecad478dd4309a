//! CLI command implementations.

pub mod config;
pub mod run;
pub mod score;
pub mod sources;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use crate::adapters::InMemoryDocumentStore;
use crate::domain::models::Config;
use crate::services::SourceReputationRegistry;

/// In-memory store seeded from `fixtures`, or empty.
pub fn open_store(fixtures: Option<&Path>) -> Result<Arc<InMemoryDocumentStore>> {
    let store = match fixtures {
        Some(path) => InMemoryDocumentStore::from_fixtures_file(path)
            .with_context(|| format!("Failed to load fixtures from {}", path.display()))?,
        None => InMemoryDocumentStore::new(),
    };
    Ok(Arc::new(store))
}

/// Reputation registry with the configured overrides applied.
pub fn reputation_registry(config: &Config) -> Result<Arc<SourceReputationRegistry>> {
    let registry = SourceReputationRegistry::with_overrides(&config.scoring.source_reputation)
        .context("Invalid source reputation override")?;
    Ok(Arc::new(registry))
}
