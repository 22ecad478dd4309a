use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Cluster, LinkedArtifact, MemorySnippet, SessionRecord};

/// Read access to a user's knowledge plus the session write.
///
/// Implementations must be safe to share across concurrent runs; the core
/// never writes anything except session records.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Batch fetch clusters by id.
    ///
    /// Unknown ids are omitted from the result rather than reported as errors.
    async fn get_clusters(&self, ids: &[String]) -> DomainResult<Vec<Cluster>>;

    /// Most recent linked artifacts of `owner_id`, newest first.
    async fn recent_links(&self, owner_id: &str, limit: usize) -> DomainResult<Vec<LinkedArtifact>>;

    /// Most recent memory snippets of `owner_id`, newest first.
    async fn recent_snippets(&self, owner_id: &str, limit: usize)
        -> DomainResult<Vec<MemorySnippet>>;

    /// Persist a finished run.
    async fn write_session(&self, record: &SessionRecord) -> DomainResult<()>;
}
