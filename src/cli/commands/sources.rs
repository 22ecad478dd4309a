//! `cogmesh sources`: list the source reputation registry.

use anyhow::Result;

use super::reputation_registry;
use crate::cli::output::{list_table, output, CommandOutput};
use crate::domain::models::Config;
use crate::services::DEFAULT_REPUTATION;

#[derive(Debug, serde::Serialize)]
pub struct SourceEntry {
    pub source_type: String,
    pub reputation: f64,
}

#[derive(Debug, serde::Serialize)]
pub struct SourcesOutput {
    pub sources: Vec<SourceEntry>,
    pub default_reputation: f64,
}

impl CommandOutput for SourcesOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["source", "reputation"]);
        for entry in &self.sources {
            table.add_row(vec![entry.source_type.clone(), format!("{:.2}", entry.reputation)]);
        }
        format!(
            "{table}\n\nUnknown sources score {:.2}.",
            self.default_reputation
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn collect(config: &Config) -> Result<SourcesOutput> {
    let registry = reputation_registry(config)?;
    let sources = registry
        .snapshot()
        .into_iter()
        .map(|(source_type, reputation)| SourceEntry {
            source_type,
            reputation,
        })
        .collect();
    Ok(SourcesOutput {
        sources,
        default_reputation: DEFAULT_REPUTATION,
    })
}

pub fn execute(config: &Config, json_mode: bool) -> Result<()> {
    output(&collect(config)?, json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_overrides_are_listed() {
        let mut config = Config::default();
        config.scoring.source_reputation =
            BTreeMap::from([("wiki".to_string(), 0.4), ("kb".to_string(), 0.9)]);

        let out = collect(&config).unwrap();
        let find = |name: &str| {
            out.sources
                .iter()
                .find(|e| e.source_type == name)
                .map(|e| e.reputation)
        };
        assert_eq!(find("wiki"), Some(0.4));
        assert_eq!(find("kb"), Some(0.9));
        assert_eq!(find("fallback"), Some(0.2));
        assert!(out.to_human().contains("wiki"));
    }
}
