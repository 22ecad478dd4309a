//! Adapters for the external collaborators of the mesh.

pub mod generators;
pub mod identity;
pub mod memory;

pub use generators::{build_generator, AnthropicGenerator, TemplateGenerator};
pub use identity::StaticIdentity;
pub use memory::{Fixtures, InMemoryDocumentStore};
