//! Domain layer for the cognitive mesh
//!
//! This module contains the message protocol, evidence and scoring models,
//! and the port traits that external collaborators implement.

pub mod errors;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{DomainError, DomainResult};
