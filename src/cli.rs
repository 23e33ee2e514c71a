//! Command-line interface for strictly_football.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strictly Football - hex-grid football phase machine
#[derive(Parser, Debug)]
#[command(name = "strictly_football")]
#[command(about = "Turn-based hex-grid football with typed match phases", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the starting board
    Board {
        /// Path to a match config (defaults are used if omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Replay a scripted match and print the final state as JSON
    Replay {
        /// Path to the script (TOML)
        script: PathBuf,

        /// Path to a match config (defaults are used if omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Also print the final board as text
        #[arg(long)]
        show_board: bool,
    },
}
