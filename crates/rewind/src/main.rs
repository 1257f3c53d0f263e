use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use rewind_history::{HistoryConfig, HistoryManager};

mod session;

/// Records key/value edits as undoable batches, then replays them.
#[derive(Parser, Debug)]
#[command(name = "rewind", version, about)]
struct Cli {
    /// Batches to commit, one per argument: `KEY=VALUE[,KEY=VALUE...]`.
    #[arg(required = true)]
    batches: Vec<String>,

    /// Max number of batches kept for undo (overrides the config file).
    #[arg(long = "max-logs")]
    max_logs: Option<usize>,

    /// JSON config file, e.g. `{"max_logs": 50}`.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut config = match &cli.config {
        Some(path) => HistoryConfig::load_or_default(path),
        None => HistoryConfig::default(),
    };
    if let Some(max_logs) = cli.max_logs {
        config.max_logs = max_logs;
        config.sanitize();
    }

    tracing::info!("Starting rewind with max_logs={}", config.max_logs);

    let mut history = HistoryManager::with_config(config);
    let mut doc = session::Document::new();

    for step in session::run(&mut history, &mut doc, &cli.batches)? {
        tracing::info!("{:<24} {}", step.action, step.snapshot);
    }

    Ok(())
}
