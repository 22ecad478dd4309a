//! Evidence retrieval from the document store.
//!
//! Three provenance channels are queried concurrently:
//! 1. clusters named in the context (batch fetch, missing ones skipped)
//! 2. the user's most recent linked artifacts
//! 3. the user's most recent memory snippets (blank ones dropped)
//!
//! Channel failures are logged and treated as empty. When every channel is
//! empty a single fallback document carrying the query is returned.

use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::domain::models::{source_kind, ContextHandle, RawDoc, RetrievalConfig};
use crate::domain::ports::DocumentStore;

/// Gathers candidate evidence documents for a query.
pub struct Retriever {
    store: Arc<dyn DocumentStore>,
    config: RetrievalConfig,
}

impl Retriever {
    pub fn new(store: Arc<dyn DocumentStore>, config: RetrievalConfig) -> Self {
        Self { store, config }
    }

    /// Collect documents from every channel; never fails and never returns empty.
    #[instrument(skip(self, ctx), fields(session_id = %ctx.session_id, user_id = %ctx.user_id))]
    pub async fn retrieve(&self, query: &str, ctx: &ContextHandle) -> Vec<RawDoc> {
        let (clusters, links, snippets) = tokio::join!(
            self.cluster_docs(ctx),
            self.link_docs(ctx),
            self.snippet_docs(ctx),
        );

        debug!(
            clusters = clusters.len(),
            links = links.len(),
            snippets = snippets.len(),
            "retrieved evidence channels"
        );

        let mut docs = clusters;
        docs.extend(links);
        docs.extend(snippets);

        if docs.is_empty() {
            debug!("no evidence found, emitting fallback document");
            return vec![RawDoc::fallback(query)];
        }
        docs
    }

    async fn cluster_docs(&self, ctx: &ContextHandle) -> Vec<RawDoc> {
        if ctx.cluster_ids.is_empty() {
            return Vec::new();
        }
        let ids: Vec<String> = ctx.cluster_ids.iter().cloned().collect();
        match self.store.get_clusters(&ids).await {
            Ok(clusters) => {
                if clusters.len() < ids.len() {
                    debug!(
                        requested = ids.len(),
                        found = clusters.len(),
                        "some clusters were not found"
                    );
                }
                clusters
                    .into_iter()
                    .map(|cluster| {
                        let doc = RawDoc::new(
                            format!("cluster:{}", cluster.id),
                            cluster.evidence_text(),
                            source_kind::CLUSTER,
                        );
                        match cluster.url {
                            Some(url) => doc.with_locator(url),
                            None => doc,
                        }
                    })
                    .collect()
            }
            Err(err) => {
                warn!(error = %err, "cluster channel failed, continuing without it");
                Vec::new()
            }
        }
    }

    async fn link_docs(&self, ctx: &ContextHandle) -> Vec<RawDoc> {
        match self
            .store
            .recent_links(&ctx.user_id, self.config.link_page_size)
            .await
        {
            Ok(links) => links
                .into_iter()
                .take(self.config.link_page_size)
                .map(|link| {
                    let doc = RawDoc::new(
                        format!("link:{}", link.id),
                        link.evidence_text(),
                        source_kind::LINK,
                    );
                    match link.url {
                        Some(url) => doc.with_locator(url),
                        None => doc,
                    }
                })
                .collect(),
            Err(err) => {
                warn!(error = %err, "link channel failed, continuing without it");
                Vec::new()
            }
        }
    }

    async fn snippet_docs(&self, ctx: &ContextHandle) -> Vec<RawDoc> {
        match self
            .store
            .recent_snippets(&ctx.user_id, self.config.snippet_page_size)
            .await
        {
            Ok(snippets) => snippets
                .into_iter()
                .take(self.config.snippet_page_size)
                .filter(|snippet| !snippet.text.trim().is_empty())
                .map(|snippet| {
                    RawDoc::new(format!("kb:{}", snippet.id), snippet.text, source_kind::KB)
                })
                .collect(),
            Err(err) => {
                warn!(error = %err, "snippet channel failed, continuing without it");
                Vec::new()
            }
        }
    }
}
