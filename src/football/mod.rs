//! Hex-grid football: board model, move rules and the match-phase machine.

mod action;
mod board;
mod context;
mod contracts;
mod controller;
mod events;
mod grid;
mod hex;
mod phases;
mod relocation;
mod types;

pub mod invariants;
pub mod rules;

pub use action::{MoveError, MoveRequest, Placement, RejectReason, Zone};
pub use board::{Board, BoardError, BoardSnapshot};
pub use context::{MatchContext, MatchState};
pub use contracts::{Contract, PlacementContract};
pub use controller::{PhaseController, PhaseError, PhaseRules};
pub use events::{Observers, PhaseEvent, Subscription, SubscriptionId};
pub use grid::{Cell, Grid, PitchLayout};
pub use hex::HexCoord;
pub use phases::{GkDecision, GkRelocation, KickoffSetup, Phase, PhaseKind};
pub use relocation::{
    Completion, CompletionSignal, DeferredRelocator, InFlight, InstantRelocator,
    RelocationError, Relocator,
};
pub use types::{Direction, PenaltyBox, Role, Team, Token, TokenId};
