//! End-to-end: synthesize a small scenario and round-trip every
//! persisted artifact shape through its serializer and parser.

#![allow(clippy::unwrap_used)]

use trunkline_export::{
    SvgMetadata, candidate_edge_records, candidate_network_table, delaunay_pair_records,
    delaunay_pair_table, network_from_records, parse_candidate_network_table,
    parse_delaunay_pair_table, parse_raw_paths_table, raw_paths_table, to_svg,
};
use trunkline_synthesis::{
    Cell, CostSurface, Grid, SynthesisConfig, SynthesisOutcome, Terminal, Terminals, WeightTable,
    synthesize,
};

fn cell(i: u32) -> Cell {
    Cell::new(i).unwrap()
}

/// 5x5 grid, uniform weights, two sources and one sink.
fn run_scenario() -> (SynthesisOutcome, Terminals, Grid) {
    let grid = Grid::new(5, 5);
    let construction = WeightTable::filled(grid, 2.0);
    let right_of_way = WeightTable::filled(grid, 0.5);
    let surface = CostSurface::from_tables(grid, construction, Some(right_of_way)).unwrap();
    let terminals = Terminals::new(
        vec![
            Terminal::new(cell(1), "plant-a"),
            Terminal::new(cell(5), "plant-b"),
        ],
        vec![Terminal::new(cell(23), "basin-1")],
    );
    let outcome = synthesize(&surface, &terminals, &SynthesisConfig::default()).unwrap();
    (outcome, terminals, grid)
}

#[test]
fn delaunay_pair_table_round_trips() {
    let (outcome, terminals, _) = run_scenario();
    assert!(!outcome.delaunay_pairs.is_empty());

    let records = delaunay_pair_records(&outcome.delaunay_pairs, &terminals).unwrap();
    let parsed = parse_delaunay_pair_table(&delaunay_pair_table(&records)).unwrap();
    assert_eq!(parsed, records);

    // Labels survive.
    assert!(parsed.iter().any(|r| r.label1 == "plant-a" || r.label2 == "plant-a"));
}

#[test]
fn candidate_network_table_round_trips_exactly() {
    let (outcome, _, _) = run_scenario();
    assert!(outcome.network.edge_count() >= 2);

    let records = candidate_edge_records(&outcome.network);
    let parsed = parse_candidate_network_table(&candidate_network_table(&records)).unwrap();
    assert_eq!(parsed, records);

    // Rebuilding the network loses nothing.
    let rebuilt = network_from_records(&parsed);
    assert_eq!(rebuilt.vertices, outcome.network.vertices);
    assert_eq!(rebuilt.edge_costs, outcome.network.edge_costs);
    assert_eq!(rebuilt.edge_routes, outcome.network.edge_routes);
    assert_eq!(
        rebuilt.edge_construction_costs,
        outcome.network.edge_construction_costs,
    );
    assert_eq!(
        rebuilt.edge_right_of_way_costs,
        outcome.network.edge_right_of_way_costs,
    );
    assert_eq!(
        rebuilt.connected_components,
        outcome.network.connected_components,
    );
}

#[test]
fn raw_paths_table_round_trips() {
    let (outcome, _, _) = run_scenario();
    // 3 terminals -> 3 unordered pairs.
    assert_eq!(outcome.catalog.len(), 3);

    let parsed = parse_raw_paths_table(&raw_paths_table(&outcome.catalog)).unwrap();
    assert_eq!(parsed, outcome.catalog);
}

#[test]
fn network_renders_to_svg() {
    let (outcome, terminals, grid) = run_scenario();
    let meta = SvgMetadata {
        title: Some("round-trip scenario"),
        description: None,
    };
    let svg = to_svg(&outcome.network, grid, &terminals, &meta);

    assert!(svg.contains(r#"viewBox="0 0 5 5""#));
    assert!(svg.contains("<title>round-trip scenario</title>"));
    assert_eq!(
        svg.matches("<circle").count(),
        3,
        "each terminal gets a marker",
    );
    assert!(svg.matches("<path").count() >= 2);
}
