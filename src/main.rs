use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tictactoe_session::{term, Session, Settings};
use tracing_subscriber::EnvFilter;

/// Tic-tac-toe in the terminal, against a random AI or a friend.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// RON settings file.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Seed for the AI's choices.
    #[arg(long)]
    seed: Option<u64>,

    /// Milliseconds the AI waits before answering.
    #[arg(long)]
    ai_delay_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = match &cli.settings {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if cli.seed.is_some() {
        settings.seed = cli.seed;
    }
    if let Some(delay) = cli.ai_delay_ms {
        settings.ai_delay_ms = delay;
    }

    term::play(Session::new(settings))
        .await
        .context("terminal session failed")
}
