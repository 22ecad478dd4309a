//! `cogmesh config`: print the effective configuration.

use anyhow::Result;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;

#[derive(Debug, serde::Serialize)]
#[serde(transparent)]
pub struct ConfigOutput {
    pub config: Config,
}

impl CommandOutput for ConfigOutput {
    fn to_human(&self) -> String {
        serde_yaml::to_string(&self.config).unwrap_or_default()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn execute(config: Config, json_mode: bool) -> Result<()> {
    output(&ConfigOutput { config }, json_mode);
    Ok(())
}
