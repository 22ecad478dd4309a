use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::adapters::generators::PROVIDERS;
use crate::domain::models::config::Config;
use crate::domain::models::DEFAULT_STRATEGY;
use crate::infrastructure::logging::{LogFormat, RotationPolicy};

/// Project-local configuration directory.
pub const CONFIG_DIR: &str = ".cogmesh";

/// Prefix of environment overrides; nested keys are separated by `__`.
pub const ENV_PREFIX: &str = "COGMESH_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid max_hops: {0}. Must be at least 1")]
    InvalidMaxHops(u32),

    #[error("Invalid timeout_ms: {0}. Must be at least 1")]
    InvalidTimeout(u64),

    #[error("Scoring thresholds must contain a 'default' entry")]
    MissingDefaultThreshold,

    #[error("Invalid threshold {value} for strategy '{strategy}'. Must be within [0, 1]")]
    InvalidThreshold { strategy: String, value: f64 },

    #[error("Invalid reputation {value} for source '{source_type}'. Must be within [0, 1]")]
    InvalidReputation { source_type: String, value: f64 },

    #[error("Invalid {0}: page size must be at least 1")]
    InvalidPageSize(&'static str),

    #[error("Unknown generator provider: {0}. Must be one of: template, anthropic")]
    UnknownProvider(String),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .cogmesh/config.yaml (project config)
    /// 3. .cogmesh/local.yaml (project local overrides, optional)
    /// 4. Environment variables (COGMESH_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Self::figment()
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honouring env overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn figment() -> Figment {
        let dir = Path::new(CONFIG_DIR);
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(dir.join("config.yaml")))
            .merge(Yaml::file(dir.join("local.yaml")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.mesh.max_hops == 0 {
            return Err(ConfigError::InvalidMaxHops(config.mesh.max_hops));
        }
        if config.mesh.timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout(config.mesh.timeout_ms));
        }

        let thresholds = config.scoring.thresholds.entries();
        if !thresholds.contains_key(DEFAULT_STRATEGY) {
            return Err(ConfigError::MissingDefaultThreshold);
        }
        if let Some((strategy, value)) = thresholds.iter().find(|(_, v)| !(0.0..=1.0).contains(*v)) {
            return Err(ConfigError::InvalidThreshold {
                strategy: strategy.clone(),
                value: *value,
            });
        }
        if let Some((source_type, value)) = config
            .scoring
            .source_reputation
            .iter()
            .find(|(_, v)| !(0.0..=1.0).contains(*v))
        {
            return Err(ConfigError::InvalidReputation {
                source_type: source_type.clone(),
                value: *value,
            });
        }

        if config.retrieval.link_page_size == 0 {
            return Err(ConfigError::InvalidPageSize("link_page_size"));
        }
        if config.retrieval.snippet_page_size == 0 {
            return Err(ConfigError::InvalidPageSize("snippet_page_size"));
        }

        let provider = config.generator.provider.trim().to_lowercase();
        if !PROVIDERS.contains(&provider.as_str()) {
            return Err(ConfigError::UnknownProvider(config.generator.provider.clone()));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }
        if config.logging.format.parse::<LogFormat>().is_err() {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }
        if config.logging.rotation.parse::<RotationPolicy>().is_err() {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        Ok(())
    }
}
