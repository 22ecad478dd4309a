//! Service layer: evidence pipeline, scoring, agent roles, routing and
//! consensus.
//!
//! Services depend only on domain models and ports; adapters are injected at
//! construction.

pub mod agents;
pub mod citation_builder;
pub mod consensus_validator;
pub mod enricher;
pub mod evidence_pipeline;
pub mod mesh_router;
pub mod mesh_service;
pub mod ranker;
pub mod retriever;
pub mod scoring_engine;
pub mod session_recorder;
pub mod source_reputation;
pub mod terms;

pub use agents::{AgentRole, AgentSet, Critic, Planner, Researcher, Synthesizer, Validator};
pub use citation_builder::{build_citation, build_citations};
pub use consensus_validator::ConsensusValidator;
pub use enricher::{enrich_document, enrich_documents, Enrichable};
pub use evidence_pipeline::EvidencePipeline;
pub use mesh_router::MeshRouter;
pub use mesh_service::MeshService;
pub use ranker::{rank, LexicalRanker, Ranker};
pub use retriever::Retriever;
pub use scoring_engine::{
    get_validation_feedback, is_validation_passing, is_validation_passing_default, ScoringEngine,
};
pub use session_recorder::SessionRecorder;
pub use source_reputation::{SourceReputationRegistry, DEFAULT_REPUTATION};
