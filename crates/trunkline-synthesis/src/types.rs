//! Shared types for the trunkline synthesis core.

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// A grid cell, identified by its 1-based row-major index.
///
/// Cell numbering starts at 1 in the upper-left corner and proceeds
/// row by row. Index 0 is not representable; "off-grid" is expressed
/// as `Option<Cell>` throughout the crate. External artifacts that use
/// a 0 sentinel convert at the boundary via [`Cell::new`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Cell(NonZeroU32);

impl Cell {
    /// Create a cell from a 1-based index. Returns `None` for index 0.
    #[must_use]
    pub const fn new(index: u32) -> Option<Self> {
        match NonZeroU32::new(index) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    /// The 1-based index.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ordered sequence of cells forming a route, each consecutive pair
/// grid-adjacent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRoute(Vec<Cell>);

impl CellRoute {
    /// Create a route from a vector of cells.
    #[must_use]
    pub const fn new(cells: Vec<Cell>) -> Self {
        Self(cells)
    }

    /// Returns `true` if the route has no cells.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of cells in the route.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the first cell, if any.
    #[must_use]
    pub fn first(&self) -> Option<Cell> {
        self.0.first().copied()
    }

    /// Returns the last cell, if any.
    #[must_use]
    pub fn last(&self) -> Option<Cell> {
        self.0.last().copied()
    }

    /// Returns a slice of all cells.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.0
    }

    /// Consumes the route and returns the underlying vector of cells.
    #[must_use]
    pub fn into_cells(self) -> Vec<Cell> {
        self.0
    }

    /// Returns the route traversed in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut cells = self.0.clone();
        cells.reverse();
        Self(cells)
    }
}

/// A routed path between two terminals: the full cell-by-cell route and
/// its accumulated cost under the base (non-decayed) routing weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorridorPath {
    /// The cell-by-cell route from origin to destination.
    pub route: CellRoute,
    /// Total cost of the route under base routing weights.
    pub cost: f64,
}

/// Whether a terminal emits or stores CO2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminalKind {
    /// A capture site injecting flow into the network.
    Source,
    /// A storage site receiving flow from the network.
    Sink,
}

impl fmt::Display for TerminalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => write!(f, "SOURCE"),
            Self::Sink => write!(f, "SINK"),
        }
    }
}

/// A source or sink site pinned to a grid cell.
///
/// Only the cell and a human-readable label are carried here; the
/// per-site economics (capture cost, storage capacity, wells) belong to
/// the downstream optimization model, not to network synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terminal {
    /// The grid cell the site occupies.
    pub cell: Cell,
    /// Display label used in diagnostics and exported artifacts.
    pub label: String,
}

impl Terminal {
    /// Create a terminal at `cell` with the given label.
    #[must_use]
    pub fn new(cell: Cell, label: impl Into<String>) -> Self {
        Self {
            cell,
            label: label.into(),
        }
    }
}

/// The source and sink sets for one synthesis run.
///
/// List order is significant: the pair-processing order during
/// pathfinding is sources first, then sinks, each in input order, and
/// corridor decay makes the overall result depend on that order (shared
/// corridors accumulate decay in the order paths are routed).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terminals {
    /// Capture sites.
    pub sources: Vec<Terminal>,
    /// Storage sites.
    pub sinks: Vec<Terminal>,
}

impl Terminals {
    /// Create a terminal set from source and sink lists.
    #[must_use]
    pub const fn new(sources: Vec<Terminal>, sinks: Vec<Terminal>) -> Self {
        Self { sources, sinks }
    }

    /// All terminal cells, sources first, in input order.
    #[must_use]
    pub fn combined_cells(&self) -> Vec<Cell> {
        self.sources
            .iter()
            .chain(self.sinks.iter())
            .map(|t| t.cell)
            .collect()
    }

    /// Total number of terminals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len() + self.sinks.len()
    }

    /// Returns `true` if there are no terminals at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty() && self.sinks.is_empty()
    }

    /// Returns `true` if `cell` hosts a source or a sink.
    #[must_use]
    pub fn is_terminal(&self, cell: Cell) -> bool {
        self.classify(cell).is_some()
    }

    /// Look up the kind and label of the terminal at `cell`, if any.
    ///
    /// Sources are checked before sinks, matching the combined order.
    #[must_use]
    pub fn classify(&self, cell: Cell) -> Option<(TerminalKind, &str)> {
        self.sources
            .iter()
            .find(|t| t.cell == cell)
            .map(|t| (TerminalKind::Source, t.label.as_str()))
            .or_else(|| {
                self.sinks
                    .iter()
                    .find(|t| t.cell == cell)
                    .map(|t| (TerminalKind::Sink, t.label.as_str()))
            })
    }

    /// The first cell occupied by more than one terminal, if any.
    ///
    /// Duplicate cells (within a list or across the two lists) are
    /// rejected by synthesis: two co-located terminals would collapse
    /// into one graph vertex and silently merge their flows.
    #[must_use]
    pub fn duplicate_cell(&self) -> Option<Cell> {
        let mut seen = std::collections::HashSet::new();
        for cell in self.combined_cells() {
            if !seen.insert(cell) {
                return Some(cell);
            }
        }
        None
    }
}

/// Configuration for a synthesis run.
///
/// Replaces the scenario state the original tool kept as process-wide
/// mutable fields; a config value is passed explicitly into
/// [`synthesize`](crate::synthesize).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Multiplicative decay applied to the working routing weight of
    /// every edge a computed path traverses, in both directions.
    ///
    /// Values just below 1 bias later path searches toward corridors
    /// already traveled without materially changing their cost. Must be
    /// in `(0, 1]`; 1 disables corridor sharing.
    pub corridor_decay: f64,
}

impl SynthesisConfig {
    /// Default corridor decay factor.
    ///
    /// Close enough to 1 that a reused corridor wins ties against a
    /// fresh parallel corridor without distorting real cost orderings.
    pub const DEFAULT_CORRIDOR_DECAY: f64 = 0.999_999_9;

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SynthesisError::InvalidConfig`] if `corridor_decay` is
    /// not a finite value in `(0, 1]`.
    pub fn validate(&self) -> Result<(), SynthesisError> {
        if !self.corridor_decay.is_finite()
            || self.corridor_decay <= 0.0
            || self.corridor_decay > 1.0
        {
            return Err(SynthesisError::InvalidConfig(format!(
                "corridor_decay must be in (0, 1], got {}",
                self.corridor_decay,
            )));
        }
        Ok(())
    }
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            corridor_decay: Self::DEFAULT_CORRIDOR_DECAY,
        }
    }
}

/// Errors that can occur during network synthesis.
///
/// All of these are diagnostic values for the caller to act on (fix
/// input data, adjust configuration); nothing in the core panics.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SynthesisError {
    /// Synthesis configuration is invalid.
    #[error("invalid synthesis configuration: {0}")]
    InvalidConfig(String),

    /// A weight or cost table does not match the grid size.
    #[error("table has {actual} entries, grid requires {expected}")]
    TableSize {
        /// Entry count the grid requires.
        expected: usize,
        /// Entry count actually supplied.
        actual: usize,
    },

    /// Two terminals occupy the same cell.
    #[error("more than one terminal occupies cell {0}")]
    DuplicateTerminal(Cell),

    /// One or more terminals have no finite-weight edge to the cost
    /// surface. Synthesis does not proceed to a partial result; the
    /// caller is expected to fix the input data.
    #[error("{} source(s) and {} sink(s) outside of cost surface", sources.len(), sinks.len())]
    UnreachableTerminals {
        /// Sources with no finite-weight adjacent edge.
        sources: Vec<Terminal>,
        /// Sinks with no finite-weight adjacent edge.
        sinks: Vec<Terminal>,
    },

    /// A destination could not be reached from a source even though
    /// both passed the adjacency reachability check (the cost surface
    /// is split into disconnected regions).
    #[error("no route exists from cell {from} to cell {to}")]
    Disconnected {
        /// Route origin.
        from: Cell,
        /// Unreached destination.
        to: Cell,
    },

    /// A selected pair has no path in the supplied catalog. Cannot
    /// happen when the catalog and pair set come from the same run.
    #[error("no catalog path for pair {a} / {b}")]
    MissingCatalogPath {
        /// One endpoint of the pair.
        a: Cell,
        /// The other endpoint.
        b: Cell,
    },
}
