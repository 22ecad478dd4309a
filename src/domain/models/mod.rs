pub mod citation;
pub mod config;
pub mod consensus;
pub mod context;
pub mod document;
pub mod knowledge;
pub mod message;
pub mod route;
pub mod run;
pub mod scoring;

pub use citation::{Citation, SNIPPET_MAX_CHARS};
pub use config::{
    Config, GeneratorConfig, IdentityConfig, LoggingConfig, MeshConfig, RetrievalConfig,
    ScoringConfig, StoreConfig,
};
pub use consensus::{ConsensusResult, Disagreement};
pub use context::{ContextHandle, ContextLimits};
pub use document::{source_kind, DocMetadata, RankedDoc, RawDoc};
pub use knowledge::{Cluster, LinkedArtifact, MemorySnippet};
pub use message::{AgentMessage, MessageKind, MessageStatus, RoleKind, Sender};
pub use route::{MeshRoute, RoutePolicy};
pub use run::{MeshRun, RunMetrics, RunRequest, RunResponse, RunState, SessionRecord, Trace};
pub use scoring::{
    get_threshold, ScoreWeights, Subscores, Thresholds, ValidationScore, DEFAULT_PASS_THRESHOLD,
    DEFAULT_STRATEGY,
};
