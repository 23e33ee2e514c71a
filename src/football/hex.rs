//! Hex coordinates for the pitch.
//!
//! Cells are addressed with odd-column offset coordinates centred on the
//! kickoff spot: `x` is the primary (goal-to-goal) axis and its sign names
//! the half of the board, `y` runs touchline to touchline. Distance and
//! neighbour arithmetic goes through axial coordinates.

use serde::{Deserialize, Serialize};

/// Axial unit steps to the six neighbours.
const AXIAL_DIRECTIONS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

/// A cell address on the pitch.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct HexCoord {
    /// Primary axis; negative is the left half, positive the right.
    pub x: i32,
    /// Secondary axis.
    pub y: i32,
}

impl HexCoord {
    /// The kickoff spot.
    pub const ORIGIN: HexCoord = HexCoord { x: 0, y: 0 };

    /// Creates a coordinate.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Converts to axial `(q, r)`.
    fn to_axial(self) -> (i32, i32) {
        let q = self.x;
        let r = self.y - (self.x - (self.x & 1)) / 2;
        (q, r)
    }

    /// Converts from axial `(q, r)`.
    fn from_axial(q: i32, r: i32) -> Self {
        Self {
            x: q,
            y: r + (q - (q & 1)) / 2,
        }
    }

    /// Hex distance between two cells.
    pub fn distance(self, other: HexCoord) -> u32 {
        let (q1, r1) = self.to_axial();
        let (q2, r2) = other.to_axial();
        let dq = q1 - q2;
        let dr = r1 - r2;
        ((dq.abs() + dr.abs() + (dq + dr).abs()) / 2) as u32
    }

    /// The six adjacent coordinates (not bounds-checked).
    pub fn neighbors(self) -> [HexCoord; 6] {
        let (q, r) = self.to_axial();
        AXIAL_DIRECTIONS.map(|(dq, dr)| Self::from_axial(q + dq, r + dr))
    }

    /// True when the two cells lie in opposite halves.
    ///
    /// Cells on the halfway line (`x == 0`) belong to neither half.
    pub fn opposite_half(self, other: HexCoord) -> bool {
        (self.x as i64) * (other.x as i64) < 0
    }
}

impl From<[i32; 2]> for HexCoord {
    fn from([x, y]: [i32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<HexCoord> for [i32; 2] {
    fn from(coord: HexCoord) -> Self {
        [coord.x, coord.y]
    }
}

impl std::fmt::Display for HexCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:+},{:+})", self.x, self.y)
    }
}
