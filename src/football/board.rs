//! The board: grid plus token roster, kept in agreement.

use super::grid::Grid;
use super::hex::HexCoord;
use super::types::{PenaltyBox, Role, Team, Token, TokenId};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// Error raised when a board mutation would break occupancy.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum BoardError {
    /// No token with this id.
    #[display("Unknown token {}", _0)]
    UnknownToken(TokenId),

    /// A token with this id is already on the board.
    #[display("Token {} is already on the board", _0)]
    DuplicateToken(TokenId),

    /// The coordinate is not on the grid.
    #[display("Cell {} is off the grid", _0)]
    OffGrid(HexCoord),

    /// Another token already stands on the cell.
    #[display("Cell {} is occupied by {}", cell, occupant)]
    Occupied {
        /// The contested cell.
        cell: HexCoord,
        /// The token standing there.
        occupant: TokenId,
    },
}

impl std::error::Error for BoardError {}

/// Grid and tokens for one match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    grid: Grid,
    tokens: BTreeMap<TokenId, Token>,
}

impl Board {
    /// Creates an empty board on the given grid.
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            tokens: BTreeMap::new(),
        }
    }

    /// Returns the grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Returns the grid mutably (highlights only; occupancy goes through the board).
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Looks up a token.
    pub fn token(&self, id: TokenId) -> Option<&Token> {
        self.tokens.get(&id)
    }

    /// All tokens in id order.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.tokens.values()
    }

    /// Token standing on a cell, if any.
    pub fn occupant(&self, coord: HexCoord) -> Option<&Token> {
        self.grid.occupant(coord).and_then(|id| self.tokens.get(&id))
    }

    /// Places a new token on the board.
    #[instrument(skip(self, token), fields(token = %token))]
    pub fn place(&mut self, token: Token) -> Result<(), BoardError> {
        let id = *token.id();
        let cell = *token.cell();
        if self.tokens.contains_key(&id) {
            return Err(BoardError::DuplicateToken(id));
        }
        self.ensure_vacant(cell, id)?;
        self.grid.set_occupant(cell, Some(id));
        self.tokens.insert(id, token);
        debug!(%id, %cell, "Token placed");
        Ok(())
    }

    /// Moves a token, updating both the token and the grid.
    #[instrument(skip(self))]
    pub fn relocate(&mut self, id: TokenId, to: HexCoord) -> Result<HexCoord, BoardError> {
        let from = self
            .tokens
            .get(&id)
            .map(|token| *token.cell())
            .ok_or(BoardError::UnknownToken(id))?;
        self.ensure_vacant(to, id)?;

        self.grid.set_occupant(from, None);
        self.grid.set_occupant(to, Some(id));
        if let Some(token) = self.tokens.get_mut(&id) {
            token.set_cell(to);
        }
        info!(%id, %from, %to, "Token relocated");
        Ok(from)
    }

    /// The goalkeeper of a team, if it has one on the board.
    pub fn goalkeeper_of(&self, team: Team) -> Option<&Token> {
        self.tokens
            .values()
            .find(|token| *token.team() == team && token.is_goalkeeper())
    }

    fn ensure_vacant(&self, cell: HexCoord, mover: TokenId) -> Result<(), BoardError> {
        let target = self.grid.cell_at(cell).ok_or(BoardError::OffGrid(cell))?;
        match target.occupant() {
            Some(occupant) if *occupant != mover => Err(BoardError::Occupied {
                cell,
                occupant: *occupant,
            }),
            _ => Ok(()),
        }
    }

    /// Serializable view of token positions.
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            tokens: self.tokens.values().cloned().collect(),
            highlighted: self.grid.highlighted().iter().copied().collect(),
        }
    }

    /// Formats the board as text, one row per line.
    ///
    /// Home tokens are upper case, away tokens lower case (`A`/`D`/`G` by
    /// role). Empty cells show `o` in the kickoff circle, `#` in a penalty
    /// box, `*` when highlighted and `.` otherwise.
    pub fn display(&self) -> String {
        let coords: Vec<HexCoord> = self.grid.cells().map(|cell| *cell.coord()).collect();
        let (Some(min_x), Some(max_x)) = (
            coords.iter().map(|c| c.x).min(),
            coords.iter().map(|c| c.x).max(),
        ) else {
            return String::new();
        };
        let min_y = coords.iter().map(|c| c.y).min().unwrap_or_default();
        let max_y = coords.iter().map(|c| c.y).max().unwrap_or_default();

        let mut rows = Vec::new();
        for y in min_y..=max_y {
            let row: String = (min_x..=max_x)
                .map(|x| self.symbol_at(HexCoord::new(x, y)))
                .collect::<Vec<_>>()
                .join(" ");
            rows.push(row);
        }
        rows.join("\n")
    }

    fn symbol_at(&self, coord: HexCoord) -> String {
        let Some(cell) = self.grid.cell_at(coord) else {
            return " ".to_string();
        };
        if let Some(token) = self.occupant(coord) {
            let letter = match token.role() {
                Role::Attacker => 'A',
                Role::Defender => 'D',
                Role::Goalkeeper => 'G',
            };
            return match token.team() {
                Team::Home => letter.to_string(),
                Team::Away => letter.to_ascii_lowercase().to_string(),
            };
        }
        let symbol = if self.grid.is_highlighted(coord) {
            "*"
        } else if *cell.in_circle() {
            "o"
        } else if *cell.penalty_box() != PenaltyBox::None {
            "#"
        } else {
            "."
        };
        symbol.to_string()
    }
}

/// Token positions and highlights, for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardSnapshot {
    /// Every token with its current cell.
    pub tokens: Vec<Token>,
    /// Highlighted cells.
    pub highlighted: Vec<HexCoord>,
}
