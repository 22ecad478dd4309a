//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that adapters must implement:
//! - DocumentStore: clusters, linked artifacts, snippets and session writes
//! - TextGenerator: the opaque text-generation call made by roles
//! - IdentityProvider: the verified user identifier for a run
//!
//! The core depends on nothing else from its collaborators.

pub mod document_store;
pub mod identity;
pub mod text_generator;

pub use document_store::DocumentStore;
pub use identity::IdentityProvider;
pub use text_generator::{GenerationPurpose, GenerationRequest, GeneratorError, TextGenerator};
