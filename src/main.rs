//! Cogmesh CLI entry point.

use anyhow::Result;
use clap::Parser;

use cogmesh::cli::commands;
use cogmesh::cli::{handle_error, Cli, Commands};
use cogmesh::infrastructure::config::ConfigLoader;
use cogmesh::infrastructure::logging::LoggerImpl;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli.command, cli.config, cli.json).await {
        handle_error(&err, cli.json);
    }
}

async fn run(command: Commands, config_path: Option<std::path::PathBuf>, json: bool) -> Result<()> {
    let config = match config_path {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    let _logger = LoggerImpl::init(&config.logging)?;

    match command {
        Commands::Run(args) => commands::run::execute(args, config, json).await,
        Commands::Score(args) => commands::score::execute(&args, &config, json),
        Commands::Sources => commands::sources::execute(&config, json),
        Commands::Config => commands::config::execute(config, json),
    }
}
