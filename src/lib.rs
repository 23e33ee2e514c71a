//! Strictly Football - turn-based hex-grid football with a typed phase machine
//!
//! This library models the interaction layer of a tabletop football game:
//! input routing, match phases and the rules that validate every move.
//!
//! # Architecture
//!
//! - **Input**: normalized pointer/key events and the router that forwards them
//! - **Phases**: `PreKickoff`, goalkeeper decisions, relocation and play
//! - **Rules**: composable move validation (same half, circle, boxes, vacancy)
//! - **Config**: pitch geometry, phase rules and lineups from TOML
//! - **Scenario**: scripted input replay for tooling and tests
//!
//! # Example
//!
//! ```no_run
//! use strictly_football::{InputEvent, InputRouter, MatchConfig};
//! use strictly_football::football::{Direction, InstantRelocator, MatchState, PhaseController};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = MatchConfig::default();
//! let mut controller = PhaseController::new(
//!     config.build_board()?,
//!     config.rules().clone(),
//!     InstantRelocator::default(),
//!     MatchState::new(Direction::LeftToRight),
//! );
//! let router = InputRouter::new();
//! router.route(InputEvent::key(crossterm::event::KeyCode::Char(' ')), &mut controller);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod football;

// Private module declarations
mod config;
mod input;
mod scenario;

// Crate-level exports - Configuration
pub use config::{ConfigError, MatchConfig, TokenSpec};

// Crate-level exports - Input routing
pub use input::{Delivery, InputEvent, InputRouter};

// Crate-level exports - Scripted replay
pub use scenario::{ReplayReport, ScenarioError, Script, Step, StepReport, replay};
