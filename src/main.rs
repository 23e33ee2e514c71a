//! Strictly Football - Unified CLI
//!
//! Renders boards and replays scripted matches.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use serde_json::json;
use std::path::{Path, PathBuf};
use strictly_football::football::{InstantRelocator, MatchState, PhaseController};
use strictly_football::{MatchConfig, Script, replay};
use tracing::{debug, info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Board { config } => run_board(config),
        Command::Replay {
            script,
            config,
            show_board,
        } => run_replay(script, config, show_board).await,
    }
}

/// Loads the config at `path`, or the defaults.
#[instrument]
fn load_config(path: Option<&Path>) -> Result<MatchConfig> {
    match path {
        Some(path) => MatchConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => {
            debug!("No config given, using defaults");
            Ok(MatchConfig::default())
        }
    }
}

/// Print the starting board
#[instrument]
fn run_board(config: Option<PathBuf>) -> Result<()> {
    let config = load_config(config.as_deref())?;
    let board = config.build_board()?;
    println!("{}", board.display());
    Ok(())
}

/// Replay a scripted match
#[instrument]
async fn run_replay(script: PathBuf, config: Option<PathBuf>, show_board: bool) -> Result<()> {
    let config = load_config(config.as_deref())?;
    let script = Script::from_file(&script)
        .with_context(|| format!("loading script {}", script.display()))?;

    let mut controller = PhaseController::new(
        config.build_board()?,
        config.rules().clone(),
        InstantRelocator::default(),
        MatchState::new(*config.home_direction()),
    );
    info!(steps = script.steps.len(), "Replaying script");
    let report = replay(&script, &mut controller).await?;

    if show_board {
        eprintln!("{}", controller.board().display());
    }
    let output = json!({
        "report": report,
        "board": controller.board().snapshot(),
        "context": controller.context(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
