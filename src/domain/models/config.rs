use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::scoring::Thresholds;

/// Main configuration structure for cogmesh
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Mesh routing configuration
    #[serde(default)]
    pub mesh: MeshConfig,

    /// Evidence retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Scoring configuration
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Text generator configuration
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Document store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Identity configuration
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Mesh routing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MeshConfig {
    /// Maximum number of role-produced messages per run
    #[serde(default = "default_max_hops")]
    pub max_hops: u32,

    /// Wall-clock budget per run in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Strategy used when a request names none
    #[serde(default = "default_strategy")]
    pub default_strategy: String,

    /// Token budget handed to text generation
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Critique loops allowed per strategy (`default` entry used as fallback)
    #[serde(default = "default_revisions")]
    pub revisions: BTreeMap<String, u32>,
}

const fn default_max_hops() -> u32 {
    12
}

const fn default_timeout_ms() -> u64 {
    30_000
}

fn default_strategy() -> String {
    "critic".to_string()
}

const fn default_max_tokens() -> u32 {
    1024
}

fn default_revisions() -> BTreeMap<String, u32> {
    BTreeMap::from([("default".to_string(), 1), ("critic".to_string(), 2)])
}

impl MeshConfig {
    /// Revision budget for a strategy, falling back to `default` (then 1).
    pub fn revisions_for(&self, strategy: &str) -> u32 {
        self.revisions
            .get(strategy)
            .or_else(|| self.revisions.get("default"))
            .copied()
            .unwrap_or(1)
    }
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            max_hops: default_max_hops(),
            timeout_ms: default_timeout_ms(),
            default_strategy: default_strategy(),
            max_tokens: default_max_tokens(),
            revisions: default_revisions(),
        }
    }
}

/// Evidence retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetrievalConfig {
    /// Page size for linked artifacts
    #[serde(default = "default_page_size")]
    pub link_page_size: usize,

    /// Page size for memory snippets
    #[serde(default = "default_page_size")]
    pub snippet_page_size: usize,

    /// Maximum number of citations attached by the researcher
    #[serde(default = "default_max_citations")]
    pub max_citations: usize,
}

const fn default_page_size() -> usize {
    20
}

const fn default_max_citations() -> usize {
    8
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            link_page_size: default_page_size(),
            snippet_page_size: default_page_size(),
            max_citations: default_max_citations(),
        }
    }
}

/// Scoring configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ScoringConfig {
    /// Pass threshold per strategy
    #[serde(default)]
    pub thresholds: Thresholds,

    /// Extra or overridden source reputations
    #[serde(default)]
    pub source_reputation: BTreeMap<String, f64>,
}

/// Text generator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GeneratorConfig {
    /// Provider: template or anthropic
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model name for remote providers
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key (falls back to ANTHROPIC_API_KEY)
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Requests per second allowed
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
}

fn default_provider() -> String {
    "template".to_string()
}

fn default_model() -> String {
    "claude-sonnet-4-5-20250929".to_string()
}

fn default_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

const fn default_timeout_secs() -> u64 {
    120
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_requests_per_second() -> u32 {
    5
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            requests_per_second: default_requests_per_second(),
        }
    }
}

/// Document store configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StoreConfig {
    /// YAML fixtures loaded into the in-memory store
    #[serde(default)]
    pub fixtures: Option<PathBuf>,
}

/// Identity configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct IdentityConfig {
    /// User identifier used for runs
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

fn default_user_id() -> String {
    "local".to_string()
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            user_id: default_user_id(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for log files (stdout only when absent)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Enable console logging (written to stderr)
    #[serde(default = "default_true")]
    pub enable_stdout: bool,

    /// Rotation policy: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

const fn default_true() -> bool {
    true
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            enable_stdout: default_true(),
            rotation: default_rotation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revisions_fallback() {
        let mesh = MeshConfig::default();
        assert_eq!(mesh.revisions_for("critic"), 2);
        assert_eq!(mesh.revisions_for("majority"), 1);

        let empty = MeshConfig {
            revisions: BTreeMap::new(),
            ..Default::default()
        };
        assert_eq!(empty.revisions_for("critic"), 1);
    }

    #[test]
    fn test_api_key_never_serialized() {
        let config = GeneratorConfig {
            api_key: Some("secret".to_string()),
            ..Default::default()
        };
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(!yaml.contains("secret"));
    }
}
