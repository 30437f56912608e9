//! Shortest-path engine over the grid cost surface.
//!
//! Single-source Dijkstra on the working routing weights, stopping as
//! soon as every requested destination has been finalized. After each
//! destination's path is reconstructed, every edge it traversed is
//! decayed in both directions in the workspace, so subsequent searches
//! are biased to reuse corridors already traveled -- the shared
//! right-of-way economics of real pipeline networks, without a joint
//! multi-commodity formulation.
//!
//! The heap tolerates duplicate entries; a `finalized` flag makes
//! later (stale) entries no-ops on pop. No decrease-key.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};

use crate::graph::DirectedEdge;
use crate::grid::Direction;
use crate::surface::{CostSurface, RoutingWorkspace, WeightKind};
use crate::types::{Cell, CellRoute, CorridorPath, SynthesisError, Terminal, Terminals};

/// A pending heap entry: tentative distance to a cell.
#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    cost: f64,
    cell: Cell,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // total_cmp gives a total order over f64 (infinities included);
        // the cell index breaks ties so pop order is deterministic.
        self.cost
            .total_cmp(&other.cost)
            .then_with(|| self.cell.cmp(&other.cell))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Terminals with no finite-weight adjacent routing edge, split into
/// (sources, sinks).
///
/// Run before any pathfinding: an isolated terminal means the input
/// data is wrong, and synthesis must not produce a partial network.
/// A terminal whose cell lies off the grid is also reported here.
#[must_use]
pub fn unreachable_terminals(
    surface: &CostSurface,
    terminals: &Terminals,
) -> (Vec<Terminal>, Vec<Terminal>) {
    let grid = surface.grid();
    let isolated = |terminal: &Terminal| {
        grid.neighbors(terminal.cell)
            .into_iter()
            .flatten()
            .all(|n| !surface.weight(terminal.cell, n, WeightKind::Routing).is_finite())
    };
    let sources = terminals.sources.iter().filter(|t| isolated(t)).cloned().collect();
    let sinks = terminals.sinks.iter().filter(|t| isolated(t)).cloned().collect();
    (sources, sinks)
}

/// Shortest paths from `source` to each of `destinations`, under the
/// current working routing weights.
///
/// Returned paths are in `destinations` order; each carries its cost
/// re-accumulated under the **base** routing weights, so decay applied
/// by earlier searches never distorts reported costs. After each path
/// is reconstructed, its edges are decayed by `decay` in both
/// directions in `workspace`. All destinations routed by one call
/// share a single search tree: decay applied here influences later
/// calls, not the tree already computed.
///
/// # Errors
///
/// Returns [`SynthesisError::Disconnected`] if a destination cannot be
/// reached from `source` (the surface splits into separate regions, or
/// a cell lies off the grid).
pub fn shortest_paths(
    surface: &CostSurface,
    workspace: &mut RoutingWorkspace,
    source: Cell,
    destinations: &[Cell],
    decay: f64,
) -> Result<Vec<CorridorPath>, SynthesisError> {
    let grid = surface.grid();
    if !grid.contains(source) {
        return Err(SynthesisError::Disconnected {
            from: source,
            to: source,
        });
    }
    if let Some(&bad) = destinations.iter().find(|d| !grid.contains(**d)) {
        return Err(SynthesisError::Disconnected {
            from: source,
            to: bad,
        });
    }

    let len = usize::try_from(grid.cell_count()).unwrap_or(usize::MAX).saturating_add(1);
    let mut dist = vec![f64::INFINITY; len];
    let mut prev: Vec<Option<Cell>> = vec![None; len];
    let mut finalized = vec![false; len];
    let idx = |cell: Cell| cell.index() as usize;

    let mut pending: HashSet<Cell> = destinations.iter().copied().collect();
    let mut heap = BinaryHeap::new();
    dist[idx(source)] = 0.0;
    heap.push(Reverse(QueueEntry {
        cost: 0.0,
        cell: source,
    }));

    while let Some(Reverse(entry)) = heap.pop() {
        let u = entry.cell;
        if finalized[idx(u)] {
            continue;
        }
        finalized[idx(u)] = true;
        pending.remove(&u);
        if pending.is_empty() {
            break;
        }
        for direction in Direction::ALL {
            let Some(n) = grid.neighbor(u, direction) else {
                continue;
            };
            if finalized[idx(n)] {
                continue;
            }
            let alt = dist[idx(u)] + workspace.entry(u, direction);
            if alt < dist[idx(n)] {
                dist[idx(n)] = alt;
                prev[idx(n)] = Some(u);
                heap.push(Reverse(QueueEntry { cost: alt, cell: n }));
            }
        }
    }

    // Reconstruct each requested path, re-cost it against the base
    // routing weights, and decay the workspace along it.
    let mut paths = Vec::with_capacity(destinations.len());
    for &dest in destinations {
        if !dist[idx(dest)].is_finite() {
            return Err(SynthesisError::Disconnected {
                from: source,
                to: dest,
            });
        }
        let mut cells = vec![dest];
        let mut node = dest;
        while node != source {
            let Some(p) = prev[idx(node)] else {
                return Err(SynthesisError::Disconnected {
                    from: source,
                    to: dest,
                });
            };
            cells.push(p);
            node = p;
        }
        cells.reverse();

        let mut cost = 0.0;
        for step in cells.windows(2) {
            cost += surface.weight(step[0], step[1], WeightKind::Routing);
            let edge = DirectedEdge::new(step[0], step[1]);
            workspace.decay(edge, decay);
            workspace.decay(edge.reversed(), decay);
        }
        paths.push(CorridorPath {
            route: CellRoute::new(cells),
            cost,
        });
    }
    Ok(paths)
}

/// Route every unordered pair drawn from `cells` (pair `(i, j)` for
/// all `i < j`, in list order), sharing one workspace across the whole
/// sweep.
///
/// Because every path decays the corridors it uses, the catalog
/// depends on the order of `cells`: earlier pairs claim corridors
/// first. Callers fix that order deliberately (sources first, then
/// sinks, each in input order).
///
/// # Errors
///
/// Propagates [`SynthesisError::Disconnected`] from any pair.
pub fn route_catalog(
    surface: &CostSurface,
    workspace: &mut RoutingWorkspace,
    cells: &[Cell],
    decay: f64,
) -> Result<Vec<CorridorPath>, SynthesisError> {
    let mut catalog = Vec::new();
    for (i, &source) in cells.iter().enumerate() {
        let destinations = &cells[i + 1..];
        if destinations.is_empty() {
            break;
        }
        catalog.extend(shortest_paths(
            surface,
            workspace,
            source,
            destinations,
            decay,
        )?);
    }
    Ok(catalog)
}
