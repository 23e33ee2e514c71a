//! Core domain types for hex-grid football.

use super::hex::HexCoord;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Unique identifier for a token on the pitch.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[display("#{}", _0)]
#[serde(transparent)]
pub struct TokenId(pub u32);

/// Team affiliation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    /// Home side.
    Home,
    /// Away side.
    Away,
}

impl Team {
    /// Returns the opposing team.
    pub fn opponent(self) -> Self {
        match self {
            Team::Home => Team::Away,
            Team::Away => Team::Home,
        }
    }
}

/// Tactical role of a token.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Forward; may enter the kickoff circle and take the kickoff.
    Attacker,
    /// Outfield defender.
    Defender,
    /// Goalkeeper.
    Goalkeeper,
}

/// Which way a team is attacking across the board.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Attacking towards positive x.
    LeftToRight,
    /// Attacking towards negative x.
    RightToLeft,
}

impl Direction {
    /// Returns the opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Direction::LeftToRight => Direction::RightToLeft,
            Direction::RightToLeft => Direction::LeftToRight,
        }
    }

    /// The penalty box a team attacking this way is shooting into.
    pub fn target_box(self) -> PenaltyBox {
        match self {
            Direction::LeftToRight => PenaltyBox::Right,
            Direction::RightToLeft => PenaltyBox::Left,
        }
    }
}

/// Per-cell penalty-box tag, relative to board orientation.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum PenaltyBox {
    /// Not part of either box.
    #[default]
    None,
    /// Box on the negative-x end (tag `-1`).
    Left,
    /// Box on the positive-x end (tag `1`).
    Right,
}

impl PenaltyBox {
    /// Numeric tag: `-1`, `0` or `1`.
    pub fn tag(self) -> i8 {
        match self {
            PenaltyBox::None => 0,
            PenaltyBox::Left => -1,
            PenaltyBox::Right => 1,
        }
    }

    /// Builds a box from its numeric tag; only the sign matters.
    pub fn from_tag(tag: i8) -> Self {
        match tag.signum() {
            1 => PenaltyBox::Right,
            -1 => PenaltyBox::Left,
            _ => PenaltyBox::None,
        }
    }
}

/// A token on the pitch.
///
/// The token refers to its cell by coordinate only; the grid owns cells.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, derive_new::new)]
pub struct Token {
    /// Token identity.
    id: TokenId,
    /// Team affiliation.
    team: Team,
    /// Tactical role.
    role: Role,
    /// Current cell.
    cell: HexCoord,
}

impl Token {
    /// Returns true if this token is an attacker.
    pub fn is_attacker(&self) -> bool {
        self.role == Role::Attacker
    }

    /// Returns true if this token is a goalkeeper.
    pub fn is_goalkeeper(&self) -> bool {
        self.role == Role::Goalkeeper
    }

    /// Moves the token reference; the board keeps the grid in step.
    pub(super) fn set_cell(&mut self, cell: HexCoord) {
        self.cell = cell;
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} at {}", self.id, self.team, self.role, self.cell)
    }
}
