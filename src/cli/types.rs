//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::run::RunArgs;
use super::commands::score::ScoreArgs;

#[derive(Parser, Debug)]
#[command(name = "cogmesh")]
#[command(about = "Cogmesh - cognitive mesh orchestrator with evidence scoring and consensus", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to .cogmesh/config.yaml and .cogmesh/local.yaml)
    #[arg(short, long, global = true, env = "COGMESH_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the mesh for a goal
    Run(RunArgs),

    /// Score a text against a query
    Score(ScoreArgs),

    /// List the source reputation registry
    Sources,

    /// Print the effective configuration
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_with_repeated_flags() {
        let cli = Cli::try_parse_from([
            "cogmesh",
            "--json",
            "run",
            "compare tokio and async-std",
            "--hint",
            "tokio",
            "--hint",
            "async-std",
            "--cluster",
            "rt",
            "--strategy",
            "majority",
            "--max-hops",
            "6",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.goal, "compare tokio and async-std");
                assert_eq!(args.hints, vec!["tokio", "async-std"]);
                assert_eq!(args.clusters, vec!["rt"]);
                assert_eq!(args.strategy.as_deref(), Some("majority"));
                assert_eq!(args.max_hops, Some(6));
            }
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_score_sources() {
        let cli = Cli::try_parse_from([
            "cogmesh", "score", "--text", "t", "--query", "q", "--source", "kb", "--source", "link",
        ])
        .unwrap();
        match cli.command {
            Commands::Score(args) => assert_eq!(args.sources, vec!["kb", "link"]),
            other => panic!("expected score, got {other:?}"),
        }
    }
}
