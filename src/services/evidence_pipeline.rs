//! Retrieve, rank, enrich and cite in one call.

use std::sync::Arc;
use tracing::{debug, instrument};

use crate::domain::models::{Citation, ContextHandle};
use crate::services::citation_builder::build_citations;
use crate::services::enricher::enrich_documents;
use crate::services::ranker::Ranker;
use crate::services::retriever::Retriever;

/// Evidence pipeline used by the researcher role.
pub struct EvidencePipeline {
    retriever: Retriever,
    ranker: Arc<dyn Ranker>,
    max_citations: usize,
}

impl EvidencePipeline {
    pub fn new(retriever: Retriever, ranker: Arc<dyn Ranker>, max_citations: usize) -> Self {
        Self {
            retriever,
            ranker,
            max_citations,
        }
    }

    /// Top `max_citations` citations for `query`, best first.
    #[instrument(skip(self, ctx), fields(session_id = %ctx.session_id))]
    pub async fn gather(&self, query: &str, ctx: &ContextHandle) -> Vec<Citation> {
        let docs = self.retriever.retrieve(query, ctx).await;
        let ranked = self.ranker.rank(&docs, query);
        let enriched = enrich_documents(&ranked);
        let mut citations = build_citations(&enriched);
        citations.truncate(self.max_citations);

        debug!(
            candidates = docs.len(),
            citations = citations.len(),
            "evidence gathered"
        );
        citations
    }
}
