//! Candidate graph assembly and degree-2 reduction.
//!
//! Shortest paths for the selected pairs are stitched into one
//! cell-resolution graph, then interior pass-through vertices (degree
//! exactly 2, not a source or sink) are merged away until only
//! terminals and true branch points remain. Each merge sums the two
//! edge costs and concatenates the two routes, re-oriented so they
//! physically join at the removed vertex. A merge that would create a
//! parallel edge is skipped and the vertex retained.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;

use petgraph::unionfind::UnionFind;
use serde::{Deserialize, Serialize};

use crate::surface::{CostSurface, WeightKind};
use crate::types::{Cell, CellRoute, CorridorPath, SynthesisError, Terminals};

/// An unordered pair of cells.
///
/// Stored canonically as `(min, max)` so equality and hashing are
/// order-independent by construction. (The original tool hashed
/// undirected edges as `v1 + v2`, which collides for any two pairs
/// with equal sums.)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(from = "(Cell, Cell)", into = "(Cell, Cell)")]
pub struct UndirectedEdge {
    v1: Cell,
    v2: Cell,
}

impl UndirectedEdge {
    /// Create the edge between `a` and `b`, in either order.
    #[must_use]
    pub fn new(a: Cell, b: Cell) -> Self {
        if a <= b {
            Self { v1: a, v2: b }
        } else {
            Self { v1: b, v2: a }
        }
    }

    /// The two endpoints, smaller cell first.
    #[must_use]
    pub const fn endpoints(self) -> (Cell, Cell) {
        (self.v1, self.v2)
    }

    /// Returns `true` if `cell` is one of the endpoints.
    #[must_use]
    pub fn touches(self, cell: Cell) -> bool {
        self.v1 == cell || self.v2 == cell
    }
}

impl From<(Cell, Cell)> for UndirectedEdge {
    fn from((a, b): (Cell, Cell)) -> Self {
        Self::new(a, b)
    }
}

impl From<UndirectedEdge> for (Cell, Cell) {
    fn from(edge: UndirectedEdge) -> Self {
        edge.endpoints()
    }
}

impl fmt::Display for UndirectedEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-> {}", self.v1, self.v2)
    }
}

/// An ordered pair of cells.
///
/// Used where per-direction table entries are addressed; the reverse
/// edge is a distinct key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct DirectedEdge {
    /// Step origin.
    pub from: Cell,
    /// Step destination.
    pub to: Cell,
}

impl DirectedEdge {
    /// Create the directed edge from `from` to `to`.
    #[must_use]
    pub const fn new(from: Cell, to: Cell) -> Self {
        Self { from, to }
    }

    /// The same edge traversed in the opposite direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self {
            from: self.to,
            to: self.from,
        }
    }
}

impl fmt::Display for DirectedEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// The reduced junction-level candidate graph.
///
/// Vertices are sources, sinks, and irreducible branch points; every
/// edge carries its total routing cost, its full cell-by-cell route,
/// and (after decomposition) its construction and right-of-way
/// components. Immutable once returned to consumers.
///
/// Invariants: each route starts and ends at its edge's two endpoints
/// (in either order) and is an unbroken chain of grid-adjacent cells;
/// the per-step routing weights along the route sum to the recorded
/// cost.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateNetwork {
    /// All graph vertices, in ascending cell order.
    pub vertices: Vec<Cell>,
    /// Total routing cost per edge.
    pub edge_costs: HashMap<UndirectedEdge, f64>,
    /// Full cell route per edge.
    pub edge_routes: HashMap<UndirectedEdge, CellRoute>,
    /// Construction cost component per edge.
    pub edge_construction_costs: HashMap<UndirectedEdge, f64>,
    /// Right-of-way cost component per edge.
    pub edge_right_of_way_costs: HashMap<UndirectedEdge, f64>,
    /// Number of connected components over the final vertex set.
    pub connected_components: usize,
}

impl CandidateNetwork {
    /// An empty network (degenerate input: fewer than two terminals).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            vertices: Vec::new(),
            edge_costs: HashMap::new(),
            edge_routes: HashMap::new(),
            edge_construction_costs: HashMap::new(),
            edge_right_of_way_costs: HashMap::new(),
            connected_components: 0,
        }
    }

    /// Rebuild a network from per-edge data (the shape persisted
    /// artifacts arrive in). Vertices are derived from edge endpoints
    /// and the component count is recomputed.
    #[must_use]
    pub fn from_parts(
        edge_costs: HashMap<UndirectedEdge, f64>,
        edge_routes: HashMap<UndirectedEdge, CellRoute>,
        edge_construction_costs: HashMap<UndirectedEdge, f64>,
        edge_right_of_way_costs: HashMap<UndirectedEdge, f64>,
    ) -> Self {
        let vertex_set: BTreeSet<Cell> = edge_costs
            .keys()
            .flat_map(|e| {
                let (a, b) = e.endpoints();
                [a, b]
            })
            .collect();
        let vertices: Vec<Cell> = vertex_set.into_iter().collect();
        let connected_components = component_count(&vertices, edge_costs.keys());
        Self {
            vertices,
            edge_costs,
            edge_routes,
            edge_construction_costs,
            edge_right_of_way_costs,
            connected_components,
        }
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_costs.len()
    }

    /// All edges in ascending `(min, max)` order, for deterministic
    /// iteration in exports and reports.
    #[must_use]
    pub fn sorted_edges(&self) -> Vec<UndirectedEdge> {
        let mut edges: Vec<UndirectedEdge> = self.edge_costs.keys().copied().collect();
        edges.sort_unstable();
        edges
    }
}

/// Serde proxy: the edge maps are keyed by a struct, which JSON map
/// keys cannot express, so edges serialize as a sorted record list.
#[derive(Serialize, Deserialize)]
struct CandidateNetworkProxy {
    vertices: Vec<Cell>,
    connected_components: usize,
    edges: Vec<EdgeRecordProxy>,
}

#[derive(Serialize, Deserialize)]
struct EdgeRecordProxy {
    v1: Cell,
    v2: Cell,
    cost: f64,
    route: CellRoute,
    construction_cost: Option<f64>,
    right_of_way_cost: Option<f64>,
}

impl Serialize for CandidateNetwork {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let edges = self
            .sorted_edges()
            .into_iter()
            .map(|e| {
                let (v1, v2) = e.endpoints();
                EdgeRecordProxy {
                    v1,
                    v2,
                    cost: self.edge_costs.get(&e).copied().unwrap_or(f64::INFINITY),
                    route: self
                        .edge_routes
                        .get(&e)
                        .cloned()
                        .unwrap_or_else(|| CellRoute::new(Vec::new())),
                    construction_cost: self.edge_construction_costs.get(&e).copied(),
                    right_of_way_cost: self.edge_right_of_way_costs.get(&e).copied(),
                }
            })
            .collect();
        let proxy = CandidateNetworkProxy {
            vertices: self.vertices.clone(),
            connected_components: self.connected_components,
            edges,
        };
        proxy.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CandidateNetwork {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let proxy = CandidateNetworkProxy::deserialize(deserializer)?;
        let mut edge_costs = HashMap::new();
        let mut edge_routes = HashMap::new();
        let mut edge_construction_costs = HashMap::new();
        let mut edge_right_of_way_costs = HashMap::new();
        for record in proxy.edges {
            let edge = UndirectedEdge::new(record.v1, record.v2);
            edge_costs.insert(edge, record.cost);
            edge_routes.insert(edge, record.route);
            if let Some(c) = record.construction_cost {
                edge_construction_costs.insert(edge, c);
            }
            if let Some(c) = record.right_of_way_cost {
                edge_right_of_way_costs.insert(edge, c);
            }
        }
        Ok(Self {
            vertices: proxy.vertices,
            connected_components: proxy.connected_components,
            edge_costs,
            edge_routes,
            edge_construction_costs,
            edge_right_of_way_costs,
        })
    }
}

/// Counters from the degree-2 reduction pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReductionStats {
    /// Vertex count before reduction.
    pub vertices_before: usize,
    /// Edge count before reduction.
    pub edges_before: usize,
    /// Vertices merged away.
    pub vertices_removed: usize,
    /// Merge attempts skipped to avoid a parallel edge, cumulative
    /// across passes.
    pub merges_blocked: usize,
}

/// Stitch the selected pairs' shortest paths into a cell-resolution
/// graph and reduce it to the junction level.
///
/// Unit-edge costs are recorded under the base routing weights in walk
/// order. Construction and right-of-way components are left for
/// [`decompose`](crate::decompose) to fill in.
///
/// # Errors
///
/// Returns [`SynthesisError::MissingCatalogPath`] if a selected pair
/// has no path in `catalog` (cannot happen when both come from the
/// same synthesis run).
pub fn assemble(
    surface: &CostSurface,
    catalog: &[CorridorPath],
    pairs: &[UndirectedEdge],
    terminals: &Terminals,
) -> Result<(CandidateNetwork, ReductionStats), SynthesisError> {
    // Index catalog paths by their endpoint pair.
    let mut paths_by_pair: HashMap<UndirectedEdge, &CorridorPath> = HashMap::new();
    for path in catalog {
        if let (Some(first), Some(last)) = (path.route.first(), path.route.last()) {
            paths_by_pair
                .entry(UndirectedEdge::new(first, last))
                .or_insert(path);
        }
    }

    // Union all unit edges of the selected pairs' routes.
    let mut edge_costs: HashMap<UndirectedEdge, f64> = HashMap::new();
    let mut edge_routes: HashMap<UndirectedEdge, CellRoute> = HashMap::new();
    let mut adjacency: BTreeMap<Cell, BTreeSet<Cell>> = BTreeMap::new();
    for pair in pairs {
        let (a, b) = pair.endpoints();
        let path = paths_by_pair
            .get(pair)
            .ok_or(SynthesisError::MissingCatalogPath { a, b })?;
        for step in path.route.cells().windows(2) {
            let edge = UndirectedEdge::new(step[0], step[1]);
            edge_costs.insert(edge, surface.weight(step[0], step[1], WeightKind::Routing));
            edge_routes.insert(edge, CellRoute::new(vec![step[0], step[1]]));
            adjacency.entry(step[0]).or_default().insert(step[1]);
            adjacency.entry(step[1]).or_default().insert(step[0]);
        }
    }

    let mut stats = ReductionStats {
        vertices_before: adjacency.len(),
        edges_before: edge_costs.len(),
        ..ReductionStats::default()
    };

    // Removable candidates: non-terminal vertices of degree exactly 2,
    // in ascending cell order for a deterministic merge sequence.
    let terminal_cells: HashSet<Cell> = terminals.combined_cells().into_iter().collect();
    let mut candidates: BTreeSet<Cell> = adjacency
        .iter()
        .filter(|(cell, neighbors)| {
            !terminal_cells.contains(cell) && neighbors.len() == 2
        })
        .map(|(cell, _)| *cell)
        .collect();

    // Merge until a full pass makes no progress. A vertex whose merge
    // would duplicate an existing edge stays in the candidate set; it
    // becomes mergeable only if a merge elsewhere changes the edge set.
    loop {
        let mut removed_any = false;
        for vertex in candidates.clone() {
            let Some(neighbors) = adjacency.get(&vertex) else {
                continue;
            };
            if neighbors.len() != 2 {
                continue;
            }
            let mut it = neighbors.iter();
            let (Some(&u), Some(&w)) = (it.next(), it.next()) else {
                continue;
            };

            let merged = UndirectedEdge::new(u, w);
            if edge_costs.contains_key(&merged) {
                stats.merges_blocked += 1;
                continue;
            }

            let old1 = UndirectedEdge::new(u, vertex);
            let old2 = UndirectedEdge::new(vertex, w);
            let (Some(cost1), Some(cost2)) =
                (edge_costs.remove(&old1), edge_costs.remove(&old2))
            else {
                continue;
            };
            let (Some(route1), Some(route2)) =
                (edge_routes.remove(&old1), edge_routes.remove(&old2))
            else {
                continue;
            };

            // Orient the two routes so they join at the removed vertex.
            let route1 = if route1.last() == Some(vertex) {
                route1
            } else {
                route1.reversed()
            };
            let route2 = if route2.first() == Some(vertex) {
                route2
            } else {
                route2.reversed()
            };
            let mut cells = route1.into_cells();
            cells.extend_from_slice(&route2.cells()[1..]);

            edge_costs.insert(merged, cost1 + cost2);
            edge_routes.insert(merged, CellRoute::new(cells));

            if let Some(n) = adjacency.get_mut(&u) {
                n.remove(&vertex);
                n.insert(w);
            }
            if let Some(n) = adjacency.get_mut(&w) {
                n.remove(&vertex);
                n.insert(u);
            }
            adjacency.remove(&vertex);
            candidates.remove(&vertex);
            stats.vertices_removed += 1;
            removed_any = true;
        }
        if !removed_any {
            break;
        }
    }

    let vertices: Vec<Cell> = adjacency.keys().copied().collect();
    let connected_components = component_count(&vertices, edge_costs.keys());
    let network = CandidateNetwork {
        vertices,
        edge_costs,
        edge_routes,
        edge_construction_costs: HashMap::new(),
        edge_right_of_way_costs: HashMap::new(),
        connected_components,
    };
    Ok((network, stats))
}

/// Count connected components over `vertices` under `edges`.
fn component_count<'a>(
    vertices: &[Cell],
    edges: impl Iterator<Item = &'a UndirectedEdge>,
) -> usize {
    if vertices.is_empty() {
        return 0;
    }
    let index_of: HashMap<Cell, usize> = vertices
        .iter()
        .enumerate()
        .map(|(i, &c)| (c, i))
        .collect();
    let mut union_find: UnionFind<usize> = UnionFind::new(vertices.len());
    for edge in edges {
        let (a, b) = edge.endpoints();
        if let (Some(&ia), Some(&ib)) = (index_of.get(&a), index_of.get(&b)) {
            union_find.union(ia, ib);
        }
    }
    let roots: HashSet<usize> = (0..vertices.len())
        .map(|i| union_find.find_mut(i))
        .collect();
    roots.len()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::surface::WeightTable;
    use crate::types::Terminal;

    fn cell(i: u32) -> Cell {
        Cell::new(i).unwrap()
    }

    fn route(cells: &[u32]) -> CellRoute {
        CellRoute::new(cells.iter().map(|&i| cell(i)).collect())
    }

    fn uniform_surface(grid: Grid, weight: f64) -> CostSurface {
        CostSurface::from_tables(grid, WeightTable::filled(grid, weight), None).unwrap()
    }

    // --- Edge key tests ---

    #[test]
    fn undirected_edge_is_order_independent() {
        let a = UndirectedEdge::new(cell(3), cell(7));
        let b = UndirectedEdge::new(cell(7), cell(3));
        assert_eq!(a, b);
        assert_eq!(a.endpoints(), (cell(3), cell(7)));
        assert!(a.touches(cell(3)));
        assert!(a.touches(cell(7)));
        assert!(!a.touches(cell(5)));
    }

    #[test]
    fn undirected_edges_with_equal_sums_are_distinct() {
        // 1+6 == 2+5 == 3+4; the original's additive hash collides here.
        let e1 = UndirectedEdge::new(cell(1), cell(6));
        let e2 = UndirectedEdge::new(cell(2), cell(5));
        let e3 = UndirectedEdge::new(cell(3), cell(4));
        let set: HashSet<UndirectedEdge> = [e1, e2, e3].into_iter().collect();
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn directed_edge_is_order_significant() {
        let e = DirectedEdge::new(cell(1), cell(2));
        assert_ne!(e, e.reversed());
        assert_eq!(e.reversed().reversed(), e);
        assert_eq!(e.to_string(), "1 -> 2");
    }

    #[test]
    fn undirected_edge_serde_canonicalizes() {
        let e = UndirectedEdge::new(cell(9), cell(2));
        let json = serde_json::to_string(&e).unwrap();
        assert_eq!(json, "[2,9]");
        let back: UndirectedEdge = serde_json::from_str("[9,2]").unwrap();
        assert_eq!(back, e);
    }

    // --- Assembly and reduction tests ---

    /// Catalog with a single path; pair selection covers it.
    fn single_path_inputs(
        cells: &[u32],
        grid: Grid,
    ) -> (CostSurface, Vec<CorridorPath>, Vec<UndirectedEdge>) {
        let surface = uniform_surface(grid, 1.0);
        #[allow(clippy::cast_precision_loss)]
        let cost = (cells.len() - 1) as f64;
        let path = CorridorPath {
            route: route(cells),
            cost,
        };
        let pair = UndirectedEdge::new(
            cell(cells[0]),
            cell(cells[cells.len() - 1]),
        );
        (surface, vec![path], vec![pair])
    }

    #[test]
    fn chain_collapses_to_single_edge() {
        // 1-2-3 on a 3x1 strip: interior vertex 2 merges away.
        let grid = Grid::new(3, 1);
        let (surface, catalog, pairs) = single_path_inputs(&[1, 2, 3], grid);
        let terminals = Terminals::new(
            vec![Terminal::new(cell(1), "s")],
            vec![Terminal::new(cell(3), "k")],
        );
        let (network, stats) = assemble(&surface, &catalog, &pairs, &terminals).unwrap();

        assert_eq!(network.vertices, vec![cell(1), cell(3)]);
        let edge = UndirectedEdge::new(cell(1), cell(3));
        assert_eq!(network.edge_count(), 1);
        assert!((network.edge_costs[&edge] - 2.0).abs() < 1e-9);
        assert_eq!(network.edge_routes[&edge], route(&[1, 2, 3]));
        assert_eq!(stats.vertices_before, 3);
        assert_eq!(stats.edges_before, 2);
        assert_eq!(stats.vertices_removed, 1);
        assert_eq!(stats.merges_blocked, 0);
        assert_eq!(network.connected_components, 1);
    }

    #[test]
    fn terminal_interior_vertex_is_kept() {
        // Same chain, but 2 is itself a terminal: no reduction.
        let grid = Grid::new(3, 1);
        let (surface, catalog, pairs) = single_path_inputs(&[1, 2, 3], grid);
        let terminals = Terminals::new(
            vec![Terminal::new(cell(1), "s"), Terminal::new(cell(2), "m")],
            vec![Terminal::new(cell(3), "k")],
        );
        let (network, stats) = assemble(&surface, &catalog, &pairs, &terminals).unwrap();

        assert_eq!(network.vertices, vec![cell(1), cell(2), cell(3)]);
        assert_eq!(network.edge_count(), 2);
        assert_eq!(stats.vertices_removed, 0);
    }

    #[test]
    fn reduction_preserves_route_endpoints_and_adjacency() {
        // Two paths sharing a corridor segment produce a branch point.
        //
        //   1 . 2 . 3
        //   4 . 5 . 6      paths: 1-5-9 and 7-5-9 share vertex 5.
        //   7 . 8 . 9
        let grid = Grid::new(3, 3);
        let surface = uniform_surface(grid, 1.0);
        let catalog = vec![
            CorridorPath {
                route: route(&[1, 5, 9]),
                cost: 2.0,
            },
            CorridorPath {
                route: route(&[7, 5, 9]),
                cost: 2.0,
            },
            CorridorPath {
                route: route(&[1, 4, 7]),
                cost: 2.0,
            },
        ];
        let pairs = vec![
            UndirectedEdge::new(cell(1), cell(9)),
            UndirectedEdge::new(cell(7), cell(9)),
        ];
        let terminals = Terminals::new(
            vec![Terminal::new(cell(1), "a"), Terminal::new(cell(7), "b")],
            vec![Terminal::new(cell(9), "k")],
        );
        let (network, _) = assemble(&surface, &catalog, &pairs, &terminals).unwrap();

        // Vertex 5 has degree 3 (toward 1, 7, and 9): a true junction.
        assert_eq!(
            network.vertices,
            vec![cell(1), cell(5), cell(7), cell(9)],
        );
        assert_eq!(network.edge_count(), 3);
        for (edge, edge_route) in &network.edge_routes {
            let (a, b) = edge.endpoints();
            let first = edge_route.first().unwrap();
            let last = edge_route.last().unwrap();
            assert!(
                (first == a && last == b) || (first == b && last == a),
                "route endpoints {first}/{last} must match edge {edge}",
            );
            for step in edge_route.cells().windows(2) {
                assert!(
                    grid.direction_of(step[0], step[1]).is_some(),
                    "route must chain grid-adjacent cells",
                );
            }
        }
        assert_eq!(network.connected_components, 1);
    }

    #[test]
    fn detour_merge_succeeds_when_no_direct_edge_exists() {
        // 2x2 grid. Pair 2-3 routed through 4: vertex 4 is interior
        // degree-2 and no direct 2-3 edge exists, so 2-4 and 4-3 fold
        // into 2-3.
        let grid = Grid::new(2, 2);
        let surface = uniform_surface(grid, 1.0);
        let catalog = vec![CorridorPath {
            route: route(&[2, 4, 3]),
            cost: 2.0,
        }];
        let pairs = vec![UndirectedEdge::new(cell(2), cell(3))];
        let terminals = Terminals::new(
            vec![Terminal::new(cell(2), "s")],
            vec![Terminal::new(cell(3), "k")],
        );
        let (network, stats) = assemble(&surface, &catalog, &pairs, &terminals).unwrap();

        assert_eq!(network.vertices, vec![cell(2), cell(3)]);
        assert_eq!(stats.vertices_removed, 1);
        assert_eq!(
            network.edge_routes[&UndirectedEdge::new(cell(2), cell(3))],
            route(&[2, 4, 3]),
        );
    }

    #[test]
    fn blocked_merge_leaves_vertex_in_place() {
        // A direct 2-3 edge AND a 2-4-3 detour. Folding vertex 4 away
        // would create a second 2-3 edge, so it is retained and the
        // cycle survives.
        let grid = Grid::new(2, 2);
        let surface = uniform_surface(grid, 1.0);
        let catalog = vec![
            CorridorPath {
                route: route(&[2, 3]),
                cost: 1.0,
            },
            CorridorPath {
                route: route(&[2, 4]),
                cost: 1.0,
            },
            CorridorPath {
                route: route(&[4, 3]),
                cost: 1.0,
            },
        ];
        let pairs = vec![
            UndirectedEdge::new(cell(2), cell(3)),
            UndirectedEdge::new(cell(2), cell(4)),
            UndirectedEdge::new(cell(3), cell(4)),
        ];
        let terminals = Terminals::new(
            vec![Terminal::new(cell(2), "s")],
            vec![Terminal::new(cell(3), "k")],
        );
        let (network, stats) = assemble(&surface, &catalog, &pairs, &terminals).unwrap();

        assert_eq!(network.vertices, vec![cell(2), cell(3), cell(4)]);
        assert_eq!(network.edge_count(), 3);
        assert_eq!(stats.vertices_removed, 0);
        assert!(stats.merges_blocked >= 1);
    }

    #[test]
    fn missing_catalog_path_is_reported() {
        let grid = Grid::new(3, 1);
        let surface = uniform_surface(grid, 1.0);
        let pairs = vec![UndirectedEdge::new(cell(1), cell(3))];
        let terminals = Terminals::default();
        let result = assemble(&surface, &[], &pairs, &terminals);
        assert!(matches!(
            result,
            Err(SynthesisError::MissingCatalogPath { .. }),
        ));
    }

    #[test]
    fn disjoint_pairs_give_two_components() {
        let grid = Grid::new(4, 1);
        let surface = uniform_surface(grid, 1.0);
        let catalog = vec![
            CorridorPath {
                route: route(&[1, 2]),
                cost: 1.0,
            },
            CorridorPath {
                route: route(&[3, 4]),
                cost: 1.0,
            },
        ];
        let pairs = vec![
            UndirectedEdge::new(cell(1), cell(2)),
            UndirectedEdge::new(cell(3), cell(4)),
        ];
        let terminals = Terminals::new(
            vec![Terminal::new(cell(1), "a"), Terminal::new(cell(3), "b")],
            vec![Terminal::new(cell(2), "x"), Terminal::new(cell(4), "y")],
        );
        let (network, _) = assemble(&surface, &catalog, &pairs, &terminals).unwrap();
        assert_eq!(network.connected_components, 2);
    }

    // --- Serde ---

    #[test]
    fn network_serde_round_trip() {
        let mut edge_costs = HashMap::new();
        let mut edge_routes = HashMap::new();
        let e = UndirectedEdge::new(cell(1), cell(3));
        edge_costs.insert(e, 2.5);
        edge_routes.insert(e, route(&[1, 2, 3]));
        let network = CandidateNetwork::from_parts(
            edge_costs,
            edge_routes,
            HashMap::new(),
            HashMap::new(),
        );

        let json = serde_json::to_string(&network).unwrap();
        let back: CandidateNetwork = serde_json::from_str(&json).unwrap();
        assert_eq!(network, back);
        assert_eq!(back.vertices, vec![cell(1), cell(3)]);
        assert_eq!(back.connected_components, 1);
    }

    #[test]
    fn empty_network_has_no_components() {
        let network = CandidateNetwork::empty();
        assert_eq!(network.connected_components, 0);
        assert!(network.vertices.is_empty());
        assert_eq!(network.edge_count(), 0);
    }
}
