//! Grid topology: 1-based row-major cell indexing and the 8-neighborhood.
//!
//! Pure geometry with no cost data. Cell numbering starts at 1 in the
//! upper-left corner and proceeds row by row; each cell has up to 8
//! neighbors identified by a canonical direction code, clockwise from
//! the upper left. Everything above the grid (cost surface, router,
//! graph builder) relies on neighbor lookup and the reverse direction
//! lookup agreeing exactly.

use serde::{Deserialize, Serialize};

use crate::types::Cell;

/// One of the 8 grid-adjacent directions.
///
/// Codes run clockwise starting at the upper left: 0 = north-west,
/// 1 = north, ... 7 = west. The code order doubles as the canonical
/// neighbor order in [`Grid::neighbors`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    /// Up-left (code 0).
    NorthWest = 0,
    /// Up (code 1).
    North = 1,
    /// Up-right (code 2).
    NorthEast = 2,
    /// Right (code 3).
    East = 3,
    /// Down-right (code 4).
    SouthEast = 4,
    /// Down (code 5).
    South = 5,
    /// Down-left (code 6).
    SouthWest = 6,
    /// Left (code 7).
    West = 7,
}

impl Direction {
    /// All 8 directions in canonical code order.
    pub const ALL: [Self; 8] = [
        Self::NorthWest,
        Self::North,
        Self::NorthEast,
        Self::East,
        Self::SouthEast,
        Self::South,
        Self::SouthWest,
        Self::West,
    ];

    /// The canonical direction code, 0-7.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// The direction from code, if the code is in range.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::NorthWest),
            1 => Some(Self::North),
            2 => Some(Self::NorthEast),
            3 => Some(Self::East),
            4 => Some(Self::SouthEast),
            5 => Some(Self::South),
            6 => Some(Self::SouthWest),
            7 => Some(Self::West),
            _ => None,
        }
    }

    /// The opposite direction: `(code + 4) mod 8`.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::NorthWest => Self::SouthEast,
            Self::North => Self::South,
            Self::NorthEast => Self::SouthWest,
            Self::East => Self::West,
            Self::SouthEast => Self::NorthWest,
            Self::South => Self::North,
            Self::SouthWest => Self::NorthEast,
            Self::West => Self::East,
        }
    }

    /// Whether this direction is one of the four diagonals.
    #[must_use]
    pub const fn is_diagonal(self) -> bool {
        matches!(
            self,
            Self::NorthWest | Self::NorthEast | Self::SouthEast | Self::SouthWest
        )
    }

    /// Row and column deltas for this direction.
    const fn deltas(self) -> (i64, i64) {
        match self {
            Self::NorthWest => (-1, -1),
            Self::North => (-1, 0),
            Self::NorthEast => (-1, 1),
            Self::East => (0, 1),
            Self::SouthEast => (1, 1),
            Self::South => (1, 0),
            Self::SouthWest => (1, -1),
            Self::West => (0, -1),
        }
    }
}

/// Grid dimensions and the cell indexing scheme over them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
}

impl Grid {
    /// Create a grid of the given dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total number of cells.
    #[must_use]
    pub const fn cell_count(self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Returns `true` if `cell` lies on this grid.
    #[must_use]
    pub fn contains(self, cell: Cell) -> bool {
        u64::from(cell.index()) <= self.cell_count()
    }

    /// The 1-based (row, column) of a cell, or `None` if off-grid.
    #[must_use]
    pub fn row_col(self, cell: Cell) -> Option<(u32, u32)> {
        if !self.contains(cell) || self.width == 0 {
            return None;
        }
        let zero_based = cell.index() - 1;
        Some((zero_based / self.width + 1, zero_based % self.width + 1))
    }

    /// The cell at 1-based (row, column), or `None` if out of range.
    #[must_use]
    pub fn cell_at(self, row: u32, column: u32) -> Option<Cell> {
        if row == 0 || column == 0 || row > self.height || column > self.width {
            return None;
        }
        Cell::new((row - 1) * self.width + column)
    }

    /// Planar position of a cell center as (column, row), 1-based.
    ///
    /// This is the coordinate frame the Delaunay pair selector
    /// triangulates in.
    #[must_use]
    pub fn position(self, cell: Cell) -> Option<(f64, f64)> {
        self.row_col(cell)
            .map(|(row, col)| (f64::from(col), f64::from(row)))
    }

    /// The neighbor of `cell` in the given direction, or `None` when it
    /// would fall off the grid or wrap a row boundary.
    #[must_use]
    pub fn neighbor(self, cell: Cell, direction: Direction) -> Option<Cell> {
        let (row, col) = self.row_col(cell)?;
        let (dr, dc) = direction.deltas();
        let nr = i64::from(row) + dr;
        let nc = i64::from(col) + dc;
        if nr < 1 || nc < 1 || nr > i64::from(self.height) || nc > i64::from(self.width) {
            return None;
        }
        self.cell_at(u32::try_from(nr).ok()?, u32::try_from(nc).ok()?)
    }

    /// All 8 neighbors of `cell` in canonical direction order, with
    /// `None` for every position that falls outside the grid.
    #[must_use]
    pub fn neighbors(self, cell: Cell) -> [Option<Cell>; 8] {
        Direction::ALL.map(|d| self.neighbor(cell, d))
    }

    /// The direction from `center` to `neighbor`, or `None` when the
    /// two cells are not grid-adjacent.
    #[must_use]
    pub fn direction_of(self, center: Cell, neighbor: Cell) -> Option<Direction> {
        let (cr, cc) = self.row_col(center)?;
        let (nr, nc) = self.row_col(neighbor)?;
        let dr = i64::from(nr) - i64::from(cr);
        let dc = i64::from(nc) - i64::from(cc);
        Direction::ALL
            .into_iter()
            .find(|d| d.deltas() == (dr, dc))
    }
}
