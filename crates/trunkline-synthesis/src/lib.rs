//! trunkline-synthesis: candidate-network synthesis core (sans-IO).
//!
//! Plans candidate CO2-transport pipeline corridors over a rasterized
//! cost landscape:
//! reachability check -> all-pairs shortest paths with corridor decay
//! -> Delaunay pair selection -> graph assembly and degree-2 reduction
//! -> cost decomposition.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! weight tables and returns structured data. File formats live in
//! `trunkline-export`; loading raw scenario data is the caller's
//! business.
//!
//! The core is single-threaded by design: each stage fully consumes
//! the previous stage's output, and the one piece of run-scoped
//! mutable state (the decayed working routing weights) is created
//! fresh per run and threaded through by unique reference. Because
//! corridor decay makes later paths prefer corridors claimed by
//! earlier ones, the result depends on terminal order; [`Terminals`]
//! fixes that order deliberately.

pub mod decompose;
pub mod delaunay;
pub mod diagnostics;
pub mod graph;
pub mod grid;
pub mod router;
pub mod surface;
pub mod types;

use std::time::{Duration, Instant};

pub use diagnostics::{StageDiagnostics, StageMetrics, SynthesisDiagnostics, SynthesisSummary};
pub use graph::{CandidateNetwork, DirectedEdge, ReductionStats, UndirectedEdge};
pub use grid::{Direction, Grid};
pub use surface::{CostSurface, RoutingWorkspace, WeightKind, WeightTable};
pub use types::{
    Cell, CellRoute, CorridorPath, SynthesisConfig, SynthesisError, Terminal, TerminalKind,
    Terminals,
};

/// Everything one synthesis run produces.
///
/// The network is the public surface handed to the optimization model
/// writer and the heuristic solvers; the pair list and path catalog
/// are the intermediate artifacts the surrounding tool persists.
/// Immutable once returned.
#[derive(Debug, Clone)]
pub struct SynthesisOutcome {
    /// The pairs selected for candidate routing.
    pub delaunay_pairs: Vec<UndirectedEdge>,
    /// Shortest paths for every unordered terminal pair, in processing
    /// order.
    pub catalog: Vec<CorridorPath>,
    /// The reduced junction-level candidate network.
    pub network: CandidateNetwork,
    /// Per-stage timing and counts.
    pub diagnostics: SynthesisDiagnostics,
}

/// Run the full network synthesis over a cost surface.
///
/// # Stages
///
/// 1. Detect terminals isolated by the cost surface (abort if any)
/// 2. Route every unordered terminal pair, decaying used corridors
/// 3. Select the Delaunay pair subset worth a direct candidate route
/// 4. Stitch the selected paths into a graph; reduce degree-2 interior
///    vertices
/// 5. Decompose each surviving edge's cost into construction and
///    right-of-way components
///
/// Fewer than two terminals is not an error: the result is an empty
/// network.
///
/// # Errors
///
/// Returns [`SynthesisError::InvalidConfig`] for a bad configuration,
/// [`SynthesisError::DuplicateTerminal`] when two terminals share a
/// cell, [`SynthesisError::UnreachableTerminals`] when any terminal
/// has no finite-weight edge into the surface, and
/// [`SynthesisError::Disconnected`] when the surface splits terminals
/// into separate regions.
pub fn synthesize(
    surface: &CostSurface,
    terminals: &Terminals,
    config: &SynthesisConfig,
) -> Result<SynthesisOutcome, SynthesisError> {
    config.validate()?;
    let run_start = Instant::now();

    // 1. Reachability: refuse to produce a partially wrong network.
    let stage_start = Instant::now();
    let (unreachable_sources, unreachable_sinks) =
        router::unreachable_terminals(surface, terminals);
    let reachability = StageDiagnostics {
        duration: stage_start.elapsed(),
        metrics: StageMetrics::Reachability {
            sources_checked: terminals.sources.len(),
            sinks_checked: terminals.sinks.len(),
        },
    };
    if !unreachable_sources.is_empty() || !unreachable_sinks.is_empty() {
        return Err(SynthesisError::UnreachableTerminals {
            sources: unreachable_sources,
            sinks: unreachable_sinks,
        });
    }
    if let Some(cell) = terminals.duplicate_cell() {
        return Err(SynthesisError::DuplicateTerminal(cell));
    }

    let cells = terminals.combined_cells();
    if cells.len() < 2 {
        // Degenerate input: nothing to route.
        let network = CandidateNetwork::empty();
        let diagnostics = idle_diagnostics(surface, terminals, &network, reachability, run_start);
        return Ok(SynthesisOutcome {
            delaunay_pairs: Vec::new(),
            catalog: Vec::new(),
            network,
            diagnostics,
        });
    }

    // 2. All-pairs path catalog over a fresh working weight copy.
    let stage_start = Instant::now();
    let mut workspace = RoutingWorkspace::new(surface);
    let catalog = router::route_catalog(surface, &mut workspace, &cells, config.corridor_decay)?;
    let pathfinding = StageDiagnostics {
        duration: stage_start.elapsed(),
        metrics: StageMetrics::Pathfinding {
            terminal_count: cells.len(),
            path_count: catalog.len(),
            total_route_cells: catalog.iter().map(|p| p.route.len()).sum(),
        },
    };

    // 3. Delaunay pair selection, independently from raw positions.
    let stage_start = Instant::now();
    let delaunay_pairs = delaunay::select_pairs(surface.grid(), &cells);
    let pair_selection = StageDiagnostics {
        duration: stage_start.elapsed(),
        metrics: StageMetrics::PairSelection {
            point_count: cells.len(),
            pair_count: delaunay_pairs.len(),
        },
    };

    // 4. Graph assembly and degree-2 reduction.
    let stage_start = Instant::now();
    let (mut network, stats) = graph::assemble(surface, &catalog, &delaunay_pairs, terminals)?;
    let reduction = StageDiagnostics {
        duration: stage_start.elapsed(),
        metrics: StageMetrics::Reduction {
            vertices_before: stats.vertices_before,
            edges_before: stats.edges_before,
            vertices_removed: stats.vertices_removed,
            merges_blocked: stats.merges_blocked,
            vertices_after: network.vertices.len(),
            edges_after: network.edge_count(),
        },
    };

    // 5. Cost decomposition for the downstream cost models.
    let stage_start = Instant::now();
    let (construction, right_of_way) = decompose::component_costs(surface, &network.edge_routes);
    network.edge_construction_costs = construction;
    network.edge_right_of_way_costs = right_of_way;
    let decomposition = StageDiagnostics {
        duration: stage_start.elapsed(),
        metrics: StageMetrics::Decomposition {
            edge_count: network.edge_count(),
        },
    };

    let diagnostics = SynthesisDiagnostics {
        reachability,
        pathfinding,
        pair_selection,
        reduction,
        decomposition,
        total_duration: run_start.elapsed(),
        summary: summary(surface, terminals, &network),
    };
    Ok(SynthesisOutcome {
        delaunay_pairs,
        catalog,
        network,
        diagnostics,
    })
}

fn summary(
    surface: &CostSurface,
    terminals: &Terminals,
    network: &CandidateNetwork,
) -> SynthesisSummary {
    SynthesisSummary {
        grid_width: surface.grid().width,
        grid_height: surface.grid().height,
        source_count: terminals.sources.len(),
        sink_count: terminals.sinks.len(),
        vertex_count: network.vertices.len(),
        edge_count: network.edge_count(),
        connected_components: network.connected_components,
    }
}

/// Diagnostics for a run that had nothing to route.
fn idle_diagnostics(
    surface: &CostSurface,
    terminals: &Terminals,
    network: &CandidateNetwork,
    reachability: StageDiagnostics,
    run_start: Instant,
) -> SynthesisDiagnostics {
    let idle = |metrics: StageMetrics| StageDiagnostics {
        duration: Duration::ZERO,
        metrics,
    };
    SynthesisDiagnostics {
        reachability,
        pathfinding: idle(StageMetrics::Pathfinding {
            terminal_count: terminals.len(),
            path_count: 0,
            total_route_cells: 0,
        }),
        pair_selection: idle(StageMetrics::PairSelection {
            point_count: terminals.len(),
            pair_count: 0,
        }),
        reduction: idle(StageMetrics::Reduction {
            vertices_before: 0,
            edges_before: 0,
            vertices_removed: 0,
            merges_blocked: 0,
            vertices_after: 0,
            edges_after: 0,
        }),
        decomposition: idle(StageMetrics::Decomposition { edge_count: 0 }),
        total_duration: run_start.elapsed(),
        summary: summary(surface, terminals, network),
    }
}
