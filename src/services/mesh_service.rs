//! Entry point for mesh runs.
//!
//! Validates the request, resolves the user, builds the run context and
//! route, drives the router, evaluates consensus and records the session.
//! Once a run has started the caller always gets a [`RunResponse`], whatever
//! the terminal state.

use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    AgentMessage, Config, ContextHandle, ContextLimits, MeshConfig, MeshRoute, RunMetrics,
    RunRequest, RunResponse, SessionRecord,
};
use crate::domain::ports::{DocumentStore, IdentityProvider, TextGenerator};
use crate::services::agents::AgentSet;
use crate::services::consensus_validator::ConsensusValidator;
use crate::services::evidence_pipeline::EvidencePipeline;
use crate::services::mesh_router::MeshRouter;
use crate::services::ranker::{LexicalRanker, Ranker};
use crate::services::retriever::Retriever;
use crate::services::scoring_engine::ScoringEngine;
use crate::services::session_recorder::SessionRecorder;
use crate::services::source_reputation::SourceReputationRegistry;

/// Orchestrates complete mesh runs.
pub struct MeshService {
    agents: AgentSet,
    router: MeshRouter,
    consensus: ConsensusValidator,
    recorder: SessionRecorder,
    identity: Arc<dyn IdentityProvider>,
    registry: Arc<SourceReputationRegistry>,
    mesh: MeshConfig,
}

impl MeshService {
    /// Wire the standard roles from configuration and collaborators.
    pub fn new(
        config: &Config,
        store: Arc<dyn DocumentStore>,
        generator: Arc<dyn TextGenerator>,
        identity: Arc<dyn IdentityProvider>,
    ) -> DomainResult<Self> {
        Self::with_ranker(config, store, generator, identity, Arc::new(LexicalRanker::new()))
    }

    /// Like [`MeshService::new`] with a custom ranker.
    pub fn with_ranker(
        config: &Config,
        store: Arc<dyn DocumentStore>,
        generator: Arc<dyn TextGenerator>,
        identity: Arc<dyn IdentityProvider>,
        ranker: Arc<dyn Ranker>,
    ) -> DomainResult<Self> {
        let registry = Arc::new(SourceReputationRegistry::with_overrides(
            &config.scoring.source_reputation,
        )?);
        let scoring = ScoringEngine::new(Arc::clone(&registry));

        let retriever = Retriever::new(Arc::clone(&store), config.retrieval.clone());
        let pipeline = Arc::new(EvidencePipeline::new(
            retriever,
            ranker,
            config.retrieval.max_citations,
        ));

        let agents = AgentSet::standard(
            generator,
            pipeline,
            scoring.clone(),
            config.scoring.thresholds.clone(),
            &config.mesh,
        );

        info!(
            roles = agents.len(),
            max_hops = config.mesh.max_hops,
            default_strategy = %config.mesh.default_strategy,
            "mesh service initialized"
        );

        Ok(Self {
            agents,
            router: MeshRouter::new(),
            consensus: ConsensusValidator::new(scoring, config.scoring.thresholds.clone()),
            recorder: SessionRecorder::new(store),
            identity,
            registry,
            mesh: config.mesh.clone(),
        })
    }

    /// Replace the role set (custom or stub roles).
    pub fn with_agents(mut self, agents: AgentSet) -> Self {
        self.agents = agents;
        self
    }

    pub fn registry(&self) -> &Arc<SourceReputationRegistry> {
        &self.registry
    }

    pub fn agents(&self) -> &AgentSet {
        &self.agents
    }

    /// Run the mesh for `request`.
    pub async fn run(&self, request: RunRequest) -> DomainResult<RunResponse> {
        self.run_with_cancel(request, &CancellationToken::new()).await
    }

    /// Run the mesh, honouring caller cancellation between hops.
    #[instrument(skip_all, fields(session_id, strategy))]
    pub async fn run_with_cancel(
        &self,
        request: RunRequest,
        cancel: &CancellationToken,
    ) -> DomainResult<RunResponse> {
        let goal = request.goal.trim();
        if goal.is_empty() {
            return Err(DomainError::InvalidRequest("goal must not be empty".to_string()));
        }
        let user_id = self.identity.verified_user().await?;

        let strategy = request
            .strategy
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.mesh.default_strategy)
            .to_string();
        let session_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("session_id", session_id.as_str());
        tracing::Span::current().record("strategy", strategy.as_str());

        let ctx = ContextHandle::new(user_id, session_id.clone(), goal)
            .with_hints(request.hints)
            .with_clusters(request.cluster_ids)
            .with_limits(ContextLimits {
                max_tokens: self.mesh.max_tokens,
                max_latency_ms: self.mesh.timeout_ms,
            })
            .with_strategy(strategy.clone());
        let route = MeshRoute::standard(strategy.clone(), self.mesh.max_hops, self.mesh.timeout_ms)?;
        let entry = AgentMessage::entry(goal, route.from);

        let started_at = Utc::now();
        let clock = Instant::now();

        let run = self
            .router
            .run_mesh_with_cancel(&self.agents, entry, &route, &ctx, cancel)
            .await;
        let consensus = self.consensus.validate_consensus(&run.trace, &strategy, &ctx);

        let metrics = RunMetrics {
            total_ms: u64::try_from(clock.elapsed().as_millis()).unwrap_or(u64::MAX),
            tokens_used: run.trace.content_len() as u64,
            citations_count: run.final_message.citations().len(),
        };

        info!(
            state = %run.state,
            accepted = consensus.accepted,
            total_ms = metrics.total_ms,
            citations = metrics.citations_count,
            "mesh run complete"
        );

        let record = SessionRecord {
            session_id: session_id.clone(),
            user_id: ctx.user_id.clone(),
            goal: ctx.goal.clone(),
            strategy,
            trace: run.trace.clone(),
            final_message: run.final_message.clone(),
            consensus: consensus.clone(),
            metrics,
            state: run.state,
            started_at,
            finished_at: Utc::now(),
        };
        if let Err(err) = self.recorder.record(&record).await {
            warn!(error = %err, "failed to record session");
        }

        Ok(RunResponse {
            session_id,
            final_message: run.final_message,
            trace: run.trace,
            consensus,
            metrics,
            state: run.state,
            error: run.error,
        })
    }
}
