//! `cogmesh run`: run the mesh for a goal.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::open_store;
use crate::adapters::{build_generator, StaticIdentity};
use crate::cli::output::{colorize_state, list_table, output, truncate, CommandOutput};
use crate::domain::models::{Config, RunRequest, RunResponse};
use crate::infrastructure::config::ConfigLoader;
use crate::services::MeshService;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Goal to research and answer
    pub goal: String,

    /// Hint the answer should address (repeatable)
    #[arg(long = "hint")]
    pub hints: Vec<String>,

    /// Cluster id to draw evidence from (repeatable)
    #[arg(long = "cluster")]
    pub clusters: Vec<String>,

    /// Strategy (critic, majority, ...); the configured default when absent
    #[arg(short, long)]
    pub strategy: Option<String>,

    /// YAML fixtures for the document store (overrides store.fixtures)
    #[arg(long)]
    pub fixtures: Option<PathBuf>,

    /// User id (overrides identity.user_id)
    #[arg(short, long)]
    pub user: Option<String>,

    /// Hop budget (overrides mesh.max_hops)
    #[arg(long)]
    pub max_hops: Option<u32>,

    /// Timeout in milliseconds (overrides mesh.timeout_ms)
    #[arg(long)]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, serde::Serialize)]
#[serde(transparent)]
pub struct RunOutput {
    pub response: RunResponse,
}

impl CommandOutput for RunOutput {
    fn to_human(&self) -> String {
        let r = &self.response;
        let mut lines = vec![
            format!("Session:   {}", r.session_id),
            format!("State:     {}", colorize_state(r.state)),
            format!(
                "Consensus: {}",
                if r.consensus.accepted {
                    style("accepted").green().bold()
                } else {
                    style("rejected").red().bold()
                }
            ),
        ];
        if let Some(ref error) = r.error {
            lines.push(format!("Error:     {error}"));
        }
        lines.push(format!(
            "Metrics:   {} ms, {} tokens, {} citations",
            r.metrics.total_ms, r.metrics.tokens_used, r.metrics.citations_count
        ));

        for d in &r.consensus.disagreements {
            lines.push(format!("  hop {}: {}", d.hop, d.reason));
        }

        let mut table = list_table(&["#", "from", "kind", "to", "rev", "status", "content"]);
        for (i, m) in r.trace.iter().enumerate() {
            let to: Vec<&str> = m.to.iter().map(|role| role.as_str()).collect();
            table.add_row(vec![
                i.to_string(),
                m.from.to_string(),
                m.kind.to_string(),
                if to.is_empty() { "-".to_string() } else { to.join(",") },
                m.revision.to_string(),
                format!("{:?}", m.status).to_lowercase(),
                truncate(&m.content.replace('\n', " "), 60),
            ]);
        }

        lines.push(String::new());
        lines.push(table.to_string());
        lines.push(String::new());
        lines.push(style("Answer").bold().to_string());
        lines.push(r.final_message.content.clone());

        if let Some(citations) = r.final_message.evidence.as_ref().filter(|c| !c.is_empty()) {
            lines.push(String::new());
            for (i, c) in citations.iter().enumerate() {
                let locator = c.locator.as_deref().unwrap_or(&c.doc_id);
                lines.push(format!("[{}] {} ({:.2})", i + 1, locator, c.score));
            }
        }

        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Apply command-line overrides to the loaded configuration.
pub fn apply_overrides(args: &RunArgs, mut config: Config) -> Result<Config> {
    if let Some(max_hops) = args.max_hops {
        config.mesh.max_hops = max_hops;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.mesh.timeout_ms = timeout_ms;
    }
    if let Some(ref fixtures) = args.fixtures {
        config.store.fixtures = Some(fixtures.clone());
    }
    if let Some(ref user) = args.user {
        config.identity.user_id.clone_from(user);
    }
    ConfigLoader::validate(&config).context("Invalid run options")?;
    Ok(config)
}

pub async fn execute(args: RunArgs, config: Config, json_mode: bool) -> Result<()> {
    let config = apply_overrides(&args, config)?;

    let store = open_store(config.store.fixtures.as_deref())?;
    let generator =
        build_generator(&config.generator).context("Failed to configure text generator")?;
    let identity = Arc::new(StaticIdentity::new(config.identity.user_id.clone()));
    let service = MeshService::new(&config, store, generator, identity)?;

    let mut request = RunRequest::new(args.goal)
        .with_hints(args.hints)
        .with_clusters(args.clusters);
    if let Some(strategy) = args.strategy {
        request = request.with_strategy(strategy);
    }

    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupt received, cancelling run");
                cancel.cancel();
            }
        })
    };

    let result = service.run_with_cancel(request, &cancel).await;
    watcher.abort();

    let response = result.context("Run was rejected")?;
    output(&RunOutput { response }, json_mode);
    Ok(())
}
