//! Cost surface: per-cell, per-direction weight tables.
//!
//! Three base tables live here -- construction, optional right-of-way,
//! and the routing table derived from them (or supplied directly as an
//! override). Pathfinding never reads the base routing table directly:
//! it routes on a [`RoutingWorkspace`], a run-scoped mutable copy that
//! the router decays edge by edge to bias later searches toward
//! corridors already traveled.
//!
//! Missing entries are `f64::INFINITY`. The infinity sentinel is safe
//! through shortest-path relaxation: sums stay infinite and never
//! compare below a real cost.

use serde::{Deserialize, Serialize};

use crate::graph::DirectedEdge;
use crate::grid::{Direction, Grid};
use crate::types::{Cell, SynthesisError};

/// Which weight table a lookup reads.
///
/// Replaces the `"r"` / `"c"` string selector of the original tool
/// with a closed enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightKind {
    /// The table pathfinding optimizes against.
    Routing,
    /// Construction plus right-of-way, used for final cost accounting.
    /// Coincides with `Routing` unless a routing override is supplied.
    ConstructionPlusRightOfWay,
}

/// A dense `cell x direction` table of `f64` weights.
///
/// Entries are stored row-major by cell (8 per cell, in canonical
/// direction order). Absent edges hold `f64::INFINITY`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightTable {
    grid: Grid,
    entries: Vec<f64>,
}

impl WeightTable {
    /// Number of entries a table for `grid` must hold.
    fn required_len(grid: Grid) -> usize {
        usize::try_from(grid.cell_count()).unwrap_or(usize::MAX).saturating_mul(8)
    }

    /// A table with every entry set to `value`.
    #[must_use]
    pub fn filled(grid: Grid, value: f64) -> Self {
        Self {
            grid,
            entries: vec![value; Self::required_len(grid)],
        }
    }

    /// Build a table from raw entries, row-major by cell, 8 per cell in
    /// canonical direction order.
    ///
    /// # Errors
    ///
    /// Returns [`SynthesisError::TableSize`] if the entry count does
    /// not match `grid.cell_count() * 8`.
    pub fn from_entries(grid: Grid, entries: Vec<f64>) -> Result<Self, SynthesisError> {
        let expected = Self::required_len(grid);
        if entries.len() != expected {
            return Err(SynthesisError::TableSize {
                expected,
                actual: entries.len(),
            });
        }
        Ok(Self { grid, entries })
    }

    fn slot(&self, cell: Cell, direction: Direction) -> Option<usize> {
        if !self.grid.contains(cell) {
            return None;
        }
        Some((cell.index() as usize - 1) * 8 + direction.code() as usize)
    }

    /// The entry for `cell` toward `direction`; infinity when `cell`
    /// is off-grid.
    #[must_use]
    pub fn get(&self, cell: Cell, direction: Direction) -> f64 {
        self.slot(cell, direction)
            .map_or(f64::INFINITY, |i| self.entries[i])
    }

    /// Set the entry for `cell` toward `direction`. Off-grid cells are
    /// ignored.
    pub fn set(&mut self, cell: Cell, direction: Direction, value: f64) {
        if let Some(i) = self.slot(cell, direction) {
            self.entries[i] = value;
        }
    }

    /// Element-wise sum of two tables over the same grid.
    fn element_sum(&self, other: &Self) -> Self {
        let entries = self
            .entries
            .iter()
            .zip(&other.entries)
            .map(|(a, b)| a + b)
            .collect();
        Self {
            grid: self.grid,
            entries,
        }
    }
}

/// The full cost surface for one planning area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSurface {
    grid: Grid,
    construction: WeightTable,
    right_of_way: Option<WeightTable>,
    routing: WeightTable,
}

impl CostSurface {
    /// Build a surface from a construction table and an optional
    /// right-of-way table. The routing table is derived as their
    /// element-wise sum (construction alone when right-of-way is
    /// absent).
    ///
    /// # Errors
    ///
    /// Returns [`SynthesisError::TableSize`] if a table does not match
    /// the grid.
    pub fn from_tables(
        grid: Grid,
        construction: WeightTable,
        right_of_way: Option<WeightTable>,
    ) -> Result<Self, SynthesisError> {
        Self::check_table(grid, &construction)?;
        if let Some(row) = &right_of_way {
            Self::check_table(grid, row)?;
        }
        let routing = right_of_way
            .as_ref()
            .map_or_else(|| construction.clone(), |row| construction.element_sum(row));
        Ok(Self {
            grid,
            construction,
            right_of_way,
            routing,
        })
    }

    /// Like [`from_tables`](Self::from_tables) but with an externally
    /// supplied routing table instead of the derived sum.
    ///
    /// # Errors
    ///
    /// Returns [`SynthesisError::TableSize`] if a table does not match
    /// the grid.
    pub fn with_routing_override(
        grid: Grid,
        construction: WeightTable,
        right_of_way: Option<WeightTable>,
        routing: WeightTable,
    ) -> Result<Self, SynthesisError> {
        Self::check_table(grid, &construction)?;
        if let Some(row) = &right_of_way {
            Self::check_table(grid, row)?;
        }
        Self::check_table(grid, &routing)?;
        Ok(Self {
            grid,
            construction,
            right_of_way,
            routing,
        })
    }

    /// Derive a surface from one scalar cost per cell.
    ///
    /// The weight of stepping from a cell to a neighbor is the mean of
    /// the two cell costs, multiplied by `diagonal_factor` for diagonal
    /// steps (pass `sqrt(2)` for distance-true weights, `1.0` for
    /// hop-count weights). A non-finite cell cost marks the cell
    /// impassable: every entry into or out of it is infinite. No
    /// right-of-way table is produced.
    ///
    /// This is the shape a rasterized cost landscape arrives in (the
    /// original tool loads its surface from a bitmap).
    ///
    /// # Errors
    ///
    /// Returns [`SynthesisError::TableSize`] if `cell_costs` does not
    /// hold one entry per grid cell.
    pub fn from_cell_costs(
        grid: Grid,
        cell_costs: &[f64],
        diagonal_factor: f64,
    ) -> Result<Self, SynthesisError> {
        let expected = usize::try_from(grid.cell_count()).unwrap_or(usize::MAX);
        if cell_costs.len() != expected {
            return Err(SynthesisError::TableSize {
                expected,
                actual: cell_costs.len(),
            });
        }

        let mut construction = WeightTable::filled(grid, f64::INFINITY);
        for (i, &cost) in cell_costs.iter().enumerate() {
            let Some(cell) = u32::try_from(i + 1).ok().and_then(Cell::new) else {
                continue;
            };
            for direction in Direction::ALL {
                let Some(neighbor) = grid.neighbor(cell, direction) else {
                    continue;
                };
                let neighbor_cost = cell_costs[neighbor.index() as usize - 1];
                if !cost.is_finite() || !neighbor_cost.is_finite() {
                    continue;
                }
                let factor = if direction.is_diagonal() {
                    diagonal_factor
                } else {
                    1.0
                };
                construction.set(cell, direction, (cost + neighbor_cost) / 2.0 * factor);
            }
        }

        Self::from_tables(grid, construction, None)
    }

    fn check_table(grid: Grid, table: &WeightTable) -> Result<(), SynthesisError> {
        let expected = WeightTable::required_len(grid);
        if table.entries.len() != expected {
            return Err(SynthesisError::TableSize {
                expected,
                actual: table.entries.len(),
            });
        }
        Ok(())
    }

    /// The grid this surface covers.
    #[must_use]
    pub const fn grid(&self) -> Grid {
        self.grid
    }

    /// The weight of the step from `a` to `b` under `kind`: 0 for
    /// identical cells, the table entry for grid-adjacent cells,
    /// infinity otherwise.
    #[must_use]
    pub fn weight(&self, a: Cell, b: Cell, kind: WeightKind) -> f64 {
        if a == b {
            return 0.0;
        }
        let Some(direction) = self.grid.direction_of(a, b) else {
            return f64::INFINITY;
        };
        match kind {
            WeightKind::Routing => self.routing.get(a, direction),
            WeightKind::ConstructionPlusRightOfWay => {
                let row = self
                    .right_of_way
                    .as_ref()
                    .map_or(0.0, |t| t.get(a, direction));
                self.construction.get(a, direction) + row
            }
        }
    }

    /// The construction component of the step from `a` to `b`.
    #[must_use]
    pub fn construction_weight(&self, a: Cell, b: Cell) -> f64 {
        if a == b {
            return 0.0;
        }
        self.grid
            .direction_of(a, b)
            .map_or(f64::INFINITY, |d| self.construction.get(a, d))
    }

    /// The right-of-way component of the step from `a` to `b`; zero
    /// everywhere when no right-of-way table was supplied.
    #[must_use]
    pub fn right_of_way_weight(&self, a: Cell, b: Cell) -> f64 {
        if a == b {
            return 0.0;
        }
        let Some(table) = &self.right_of_way else {
            return 0.0;
        };
        self.grid
            .direction_of(a, b)
            .map_or(f64::INFINITY, |d| table.get(a, d))
    }

    /// Whether a right-of-way table was supplied.
    #[must_use]
    pub const fn has_right_of_way(&self) -> bool {
        self.right_of_way.is_some()
    }
}

/// The run-scoped working copy of the routing table.
///
/// Created fresh at the start of every synthesis run and passed by
/// unique reference into the router; decay accumulated here never
/// leaks back into the [`CostSurface`].
#[derive(Debug, Clone)]
pub struct RoutingWorkspace {
    grid: Grid,
    entries: Vec<f64>,
}

impl RoutingWorkspace {
    /// Snapshot the surface's base routing table.
    #[must_use]
    pub fn new(surface: &CostSurface) -> Self {
        Self {
            grid: surface.grid,
            entries: surface.routing.entries.clone(),
        }
    }

    /// The working weight of the step from `a` to `b`: 0 for identical
    /// cells, the working entry for adjacent cells, infinity otherwise.
    #[must_use]
    pub fn weight(&self, a: Cell, b: Cell) -> f64 {
        if a == b {
            return 0.0;
        }
        self.grid
            .direction_of(a, b)
            .map_or(f64::INFINITY, |d| self.entry(a, d))
    }

    /// The working entry for `cell` toward `direction`.
    #[must_use]
    pub fn entry(&self, cell: Cell, direction: Direction) -> f64 {
        if !self.grid.contains(cell) {
            return f64::INFINITY;
        }
        self.entries[(cell.index() as usize - 1) * 8 + direction.code() as usize]
    }

    /// Multiply the working entry for one directed step by `factor`.
    ///
    /// Repeated decay of the same entry compounds multiplicatively.
    /// Non-adjacent pairs are ignored. The router decays both
    /// orientations of every edge a path traverses.
    pub fn decay(&mut self, edge: DirectedEdge, factor: f64) {
        let Some(direction) = self.grid.direction_of(edge.from, edge.to) else {
            return;
        };
        let slot = (edge.from.index() as usize - 1) * 8 + direction.code() as usize;
        self.entries[slot] *= factor;
    }
}
