//! The hex pitch: cells, zone tags, occupancy and highlights.

use super::hex::HexCoord;
use super::types::{PenaltyBox, TokenId};
use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, instrument};

/// A single cell on the pitch.
///
/// Cells reference occupants by id; they never own tokens.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Cell {
    /// Cell address.
    coord: HexCoord,
    /// Which penalty box the cell belongs to, if any.
    penalty_box: PenaltyBox,
    /// Whether the cell is part of the kickoff circle.
    in_circle: bool,
    /// Token currently standing on the cell.
    occupant: Option<TokenId>,
}

impl Cell {
    /// Creates an empty, untagged cell.
    pub fn new(coord: HexCoord) -> Self {
        Self {
            coord,
            penalty_box: PenaltyBox::None,
            in_circle: false,
            occupant: None,
        }
    }

    /// Returns true if no token stands here.
    pub fn is_vacant(&self) -> bool {
        self.occupant.is_none()
    }
}

/// Dimensions and zone geometry of a standard pitch.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct PitchLayout {
    /// Columns run from `-half_width` to `half_width`.
    half_width: i32,
    /// Rows run from `-half_height` to `half_height`.
    half_height: i32,
    /// Hex radius of the kickoff circle around the kickoff spot.
    circle_radius: u32,
    /// Number of columns each penalty box extends in from its goal line.
    box_depth: i32,
    /// Rows covered by a penalty box, either side of the centre row.
    box_half_height: i32,
}

impl Default for PitchLayout {
    fn default() -> Self {
        Self {
            half_width: 8,
            half_height: 5,
            circle_radius: 1,
            box_depth: 3,
            box_half_height: 3,
        }
    }
}

/// The pitch. Owns every cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: BTreeMap<HexCoord, Cell>,
    highlighted: BTreeSet<HexCoord>,
}

impl Grid {
    /// Creates a rectangular grid of plain cells.
    #[instrument]
    pub fn new(half_width: i32, half_height: i32) -> Self {
        let cells = (-half_width..=half_width)
            .flat_map(|x| (-half_height..=half_height).map(move |y| HexCoord::new(x, y)))
            .map(|coord| (coord, Cell::new(coord)))
            .collect();
        Self {
            cells,
            highlighted: BTreeSet::new(),
        }
    }

    /// Creates a grid with penalty boxes laid out and the kickoff circle
    /// centred on `kickoff_cell`.
    #[instrument]
    pub fn from_layout(layout: &PitchLayout, kickoff_cell: HexCoord) -> Self {
        let mut grid = Self::new(layout.half_width, layout.half_height);
        let box_edge = layout.half_width - layout.box_depth + 1;
        for cell in grid.cells.values_mut() {
            let HexCoord { x, y } = cell.coord;
            if y.abs() <= layout.box_half_height {
                if x >= box_edge {
                    cell.penalty_box = PenaltyBox::Right;
                } else if x <= -box_edge {
                    cell.penalty_box = PenaltyBox::Left;
                }
            }
            cell.in_circle = cell.coord.distance(kickoff_cell) <= layout.circle_radius;
        }
        debug!(cells = grid.cells.len(), "Pitch laid out");
        grid
    }

    /// Tags a cell as part of a penalty box. No-op for off-grid cells.
    pub fn with_penalty_box(mut self, coord: HexCoord, tag: PenaltyBox) -> Self {
        if let Some(cell) = self.cells.get_mut(&coord) {
            cell.penalty_box = tag;
        }
        self
    }

    /// Tags a cell as part of the kickoff circle. No-op for off-grid cells.
    pub fn with_circle(mut self, coord: HexCoord) -> Self {
        if let Some(cell) = self.cells.get_mut(&coord) {
            cell.in_circle = true;
        }
        self
    }

    /// Looks up a cell.
    pub fn cell_at(&self, coord: HexCoord) -> Option<&Cell> {
        self.cells.get(&coord)
    }

    /// Token standing on a cell, if any.
    pub fn occupant(&self, coord: HexCoord) -> Option<TokenId> {
        self.cells.get(&coord).and_then(|cell| cell.occupant)
    }

    /// All cells in coordinate order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    /// Vacant on-grid cells within `radius` steps of `from`, excluding `from`.
    #[instrument(skip(self))]
    pub fn legal_steps_from(&self, from: HexCoord, radius: u32) -> BTreeSet<HexCoord> {
        self.cells
            .values()
            .filter(|cell| {
                let distance = cell.coord.distance(from);
                distance >= 1 && distance <= radius && cell.is_vacant()
            })
            .map(|cell| cell.coord)
            .collect()
    }

    /// Marks cells as highlighted, replacing any prior highlights.
    #[instrument(skip(self, cells))]
    pub fn highlight(&mut self, cells: impl IntoIterator<Item = HexCoord>) {
        self.highlighted = cells
            .into_iter()
            .filter(|coord| self.cells.contains_key(coord))
            .collect();
        debug!(count = self.highlighted.len(), "Cells highlighted");
    }

    /// Returns true if the cell is highlighted.
    pub fn is_highlighted(&self, coord: HexCoord) -> bool {
        self.highlighted.contains(&coord)
    }

    /// Currently highlighted cells.
    pub fn highlighted(&self) -> &BTreeSet<HexCoord> {
        &self.highlighted
    }

    /// Removes all highlights.
    #[instrument(skip(self))]
    pub fn clear_highlights(&mut self) {
        self.highlighted.clear();
    }

    /// Sets or clears a cell's occupant. Returns false for off-grid cells.
    pub(super) fn set_occupant(&mut self, coord: HexCoord, occupant: Option<TokenId>) -> bool {
        match self.cells.get_mut(&coord) {
            Some(cell) => {
                cell.occupant = occupant;
                true
            }
            None => false,
        }
    }
}
