//! In-memory document store, optionally seeded from YAML fixtures.
//!
//! Fixture layout:
//!
//! ```yaml
//! clusters:
//!   - id: rt
//!     title: Async runtimes
//!     summary: Executors, wakers and scheduling
//! links:
//!   - id: l1
//!     owner_id: local
//!     title: The async book
//!     url: https://rust-lang.github.io/async-book/
//!     created_at: 2025-01-10T09:00:00Z
//! snippets:
//!   - id: s1
//!     owner_id: local
//!     text: A waker tells the executor a future can make progress.
//!     created_at: 2025-01-11T09:00:00Z
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Cluster, LinkedArtifact, MemorySnippet, SessionRecord};
use crate::domain::ports::DocumentStore;

/// Serialized form of a store's knowledge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixtures {
    #[serde(default)]
    pub clusters: Vec<Cluster>,
    #[serde(default)]
    pub links: Vec<LinkedArtifact>,
    #[serde(default)]
    pub snippets: Vec<MemorySnippet>,
}

#[derive(Debug, Default)]
struct Inner {
    clusters: BTreeMap<String, Cluster>,
    links: Vec<LinkedArtifact>,
    snippets: Vec<MemorySnippet>,
    sessions: Vec<SessionRecord>,
}

/// Thread-safe in-memory [`DocumentStore`].
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    inner: RwLock<Inner>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixtures(fixtures: Fixtures) -> Self {
        let store = Self::new();
        {
            let mut inner = store.write();
            inner.clusters = fixtures
                .clusters
                .into_iter()
                .map(|c| (c.id.clone(), c))
                .collect();
            inner.links = fixtures.links;
            inner.snippets = fixtures.snippets;
        }
        store
    }

    /// Parse fixtures from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> DomainResult<Self> {
        let fixtures: Fixtures = serde_yaml::from_str(yaml)?;
        Ok(Self::from_fixtures(fixtures))
    }

    /// Load fixtures from a YAML file.
    pub fn from_fixtures_file(path: &Path) -> DomainResult<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            DomainError::StoreError(format!("failed to read fixtures {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&yaml)
    }

    pub fn add_cluster(&self, cluster: Cluster) {
        self.write().clusters.insert(cluster.id.clone(), cluster);
    }

    pub fn add_link(&self, link: LinkedArtifact) {
        self.write().links.push(link);
    }

    pub fn add_snippet(&self, snippet: MemorySnippet) {
        self.write().snippets.push(snippet);
    }

    /// Every session written so far, in write order.
    pub fn sessions(&self) -> Vec<SessionRecord> {
        self.read().sessions.clone()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get_clusters(&self, ids: &[String]) -> DomainResult<Vec<Cluster>> {
        let inner = self.read();
        Ok(ids
            .iter()
            .filter_map(|id| inner.clusters.get(id).cloned())
            .collect())
    }

    async fn recent_links(&self, owner_id: &str, limit: usize) -> DomainResult<Vec<LinkedArtifact>> {
        let inner = self.read();
        let mut links: Vec<LinkedArtifact> = inner
            .links
            .iter()
            .filter(|l| l.owner_id == owner_id)
            .cloned()
            .collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        links.truncate(limit);
        Ok(links)
    }

    async fn recent_snippets(
        &self,
        owner_id: &str,
        limit: usize,
    ) -> DomainResult<Vec<MemorySnippet>> {
        let inner = self.read();
        let mut snippets: Vec<MemorySnippet> = inner
            .snippets
            .iter()
            .filter(|s| s.owner_id == owner_id)
            .cloned()
            .collect();
        snippets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        snippets.truncate(limit);
        Ok(snippets)
    }

    async fn write_session(&self, record: &SessionRecord) -> DomainResult<()> {
        self.write().sessions.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FIXTURES: &str = r"
clusters:
  - id: rt
    title: Async runtimes
    summary: Executors and wakers
links:
  - id: old
    owner_id: alice
    title: Old link
    created_at: 2024-01-01T00:00:00Z
  - id: new
    owner_id: alice
    title: New link
    created_at: 2025-01-01T00:00:00Z
  - id: other
    owner_id: bob
    title: Bob's link
    created_at: 2025-06-01T00:00:00Z
snippets:
  - id: s1
    owner_id: alice
    text: wakers wake futures
    created_at: 2025-01-02T00:00:00Z
";

    #[tokio::test]
    async fn test_fixture_queries() {
        let store = InMemoryDocumentStore::from_yaml_str(FIXTURES).unwrap();

        let clusters = store
            .get_clusters(&["missing".to_string(), "rt".to_string()])
            .await
            .unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].title, "Async runtimes");

        let links = store.recent_links("alice", 20).await.unwrap();
        let ids: Vec<&str> = links.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);

        let page = store.recent_links("alice", 1).await.unwrap();
        assert_eq!(page[0].id, "new");

        assert_eq!(store.recent_snippets("alice", 20).await.unwrap().len(), 1);
        assert!(store.recent_snippets("carol", 20).await.unwrap().is_empty());
    }

    #[test]
    fn test_fixtures_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FIXTURES.as_bytes()).unwrap();
        let store = InMemoryDocumentStore::from_fixtures_file(file.path()).unwrap();
        assert_eq!(store.read().links.len(), 3);

        let missing = InMemoryDocumentStore::from_fixtures_file(Path::new("/nonexistent/f.yaml"));
        assert!(matches!(missing, Err(DomainError::StoreError(_))));
    }

    #[test]
    fn test_malformed_fixtures() {
        let result = InMemoryDocumentStore::from_yaml_str("links: [{id: 1}]");
        assert!(matches!(result, Err(DomainError::SerializationError(_))));
    }
}
