//! Text generator adapters and provider selection.

pub mod anthropic;
pub mod template;

use std::sync::Arc;

use crate::domain::models::GeneratorConfig;
use crate::domain::ports::{GeneratorError, TextGenerator};

pub use anthropic::AnthropicGenerator;
pub use template::TemplateGenerator;

/// Provider names accepted in `generator.provider`.
pub const PROVIDERS: [&str; 2] = ["template", "anthropic"];

/// Create the configured generator.
pub fn build_generator(config: &GeneratorConfig) -> Result<Arc<dyn TextGenerator>, GeneratorError> {
    match config.provider.trim().to_lowercase().as_str() {
        "template" => Ok(Arc::new(TemplateGenerator::new())),
        "anthropic" => Ok(Arc::new(AnthropicGenerator::new(config)?)),
        other => Err(GeneratorError::NotConfigured(format!(
            "unknown provider '{other}', expected one of: {}",
            PROVIDERS.join(", ")
        ))),
    }
}
