//! Text generation port.
//!
//! Roles call a [`TextGenerator`] to decompose goals and draft answers. The
//! call is an opaque, possibly slow operation; retry policy belongs to the
//! implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What a generation call is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationPurpose {
    /// Decompose a goal into sub-questions, one per line.
    Plan,
    /// Draft an answer from evidence.
    Draft,
}

/// A single generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub purpose: GenerationPurpose,
    /// The goal the call is about.
    pub subject: String,
    /// Full prompt for model-backed generators.
    pub prompt: String,
    /// Evidence snippets in citation order.
    #[serde(default)]
    pub context: Vec<String>,
    pub max_tokens: u32,
}

/// Errors raised by text generators.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Generator not configured: {0}")]
    NotConfigured(String),

    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timed out")]
    Timeout,

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl GeneratorError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RateLimited(_) | Self::NetworkError(_) | Self::Timeout => true,
            Self::ApiError { status, .. } => matches!(status, 500 | 502 | 503 | 504 | 529),
            Self::NotConfigured(_) | Self::AuthError(_) | Self::InvalidResponse(_) => false,
        }
    }
}

/// Opaque text generation used by the planner and synthesizer.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &'static str;

    async fn generate(&self, request: &GenerationRequest) -> Result<String, GeneratorError>;
}
