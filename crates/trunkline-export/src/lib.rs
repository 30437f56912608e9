//! trunkline-export: Pure format serializers (sans-IO).
//!
//! Converts synthesis results into persistable artifacts: the
//! tab-separated Delaunay-pair, candidate-network and raw-paths tables
//! (with exact round-trip parsers), and an SVG rendering of the
//! candidate network for visual inspection. Every function here takes
//! in-memory structures and returns a `String`; file access is the
//! caller's business.

pub mod svg;
pub mod table;

pub use svg::{SvgMetadata, to_svg};
pub use table::{
    CandidateEdgeRecord, DelaunayPairRecord, ExportError, candidate_edge_records,
    candidate_network_table, delaunay_pair_records, delaunay_pair_table, network_from_records,
    parse_candidate_network_table, parse_delaunay_pair_table, parse_raw_paths_table,
    raw_paths_table,
};
