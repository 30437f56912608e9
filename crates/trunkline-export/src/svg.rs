//! SVG rendering of a candidate network.
//!
//! Draws every edge's full cell route as a polyline over the grid
//! extent, with sources, sinks, and junctions as distinct markers,
//! using the [`svg`] crate for document construction and XML escaping.
//! The `viewBox` is the grid in cell units (one unit per cell), so the
//! output overlays pixel-per-cell renderings of the cost raster
//! directly.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use svg::Document;
use svg::node::Text;
use svg::node::element::path::Data;
use svg::node::element::{Circle, Description, Path, Rectangle, Title};

use trunkline_synthesis::{CandidateNetwork, CellRoute, Grid, TerminalKind, Terminals};

/// Stroke and marker colors.
const ROUTE_COLOR: &str = "#555555";
const SOURCE_COLOR: &str = "crimson";
const SINK_COLOR: &str = "royalblue";
const JUNCTION_COLOR: &str = "black";

/// Metadata to embed in the SVG document.
///
/// Both fields are optional. When present, a `<title>` and/or `<desc>`
/// element is emitted after the opening `<svg>` tag. Text values are
/// XML-escaped automatically by the `svg` crate.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Document title -- typically the scenario name.
    pub title: Option<&'a str>,

    /// Document description -- typically synthesis parameters, so
    /// exported files are distinguishable.
    pub description: Option<&'a str>,
}

/// Build an SVG path `d` attribute string from a cell route.
///
/// Cells map to their centers in cell units (`column - 0.5`,
/// `row - 0.5`). Returns an empty string for routes with fewer than 2
/// cells and skips cells that lie off the grid.
#[must_use]
pub fn build_route_data(route: &CellRoute, grid: Grid) -> String {
    let centers: Vec<(f64, f64)> = route
        .cells()
        .iter()
        .filter_map(|&cell| grid.position(cell))
        .map(|(x, y)| (x - 0.5, y - 0.5))
        .collect();
    if centers.len() < 2 {
        return String::new();
    }

    let mut data = Data::new().move_to(centers[0]);
    for &center in &centers[1..] {
        data = data.line_to(center);
    }
    String::from(svg::node::Value::from(data))
}

/// Serialize a candidate network into an SVG document string.
///
/// Each edge route becomes a `<path>`; each vertex becomes a marker:
/// a circle for sources and sinks (distinct colors), a small square
/// for junctions. Routes with fewer than 2 on-grid cells are skipped.
#[must_use]
pub fn to_svg(
    network: &CandidateNetwork,
    grid: Grid,
    terminals: &Terminals,
    metadata: &SvgMetadata<'_>,
) -> String {
    let mut doc = Document::new()
        .set("width", grid.width)
        .set("height", grid.height)
        .set("viewBox", (0, 0, grid.width, grid.height));

    if let Some(title) = metadata.title {
        doc = doc.add(Title::new(title));
    }
    if let Some(description) = metadata.description {
        doc = doc.add(Description::new().add(Text::new(description)));
    }

    // Edge routes first so markers draw on top.
    for edge in network.sorted_edges() {
        let Some(route) = network.edge_routes.get(&edge) else {
            continue;
        };
        let d = build_route_data(route, grid);
        if d.is_empty() {
            continue;
        }
        let path = Path::new()
            .set("d", d)
            .set("fill", "none")
            .set("stroke", ROUTE_COLOR)
            .set("stroke-width", 0.2)
            .set("stroke-linecap", "round");
        doc = doc.add(path);
    }

    for &vertex in &network.vertices {
        let Some((x, y)) = grid.position(vertex) else {
            continue;
        };
        let (cx, cy) = (x - 0.5, y - 0.5);
        match terminals.classify(vertex) {
            Some((TerminalKind::Source, _)) => {
                doc = doc.add(marker_circle(cx, cy, SOURCE_COLOR));
            }
            Some((TerminalKind::Sink, _)) => {
                doc = doc.add(marker_circle(cx, cy, SINK_COLOR));
            }
            None => {
                let square = Rectangle::new()
                    .set("x", cx - 0.25)
                    .set("y", cy - 0.25)
                    .set("width", 0.5)
                    .set("height", 0.5)
                    .set("fill", JUNCTION_COLOR);
                doc = doc.add(square);
            }
        }
    }

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}

fn marker_circle(cx: f64, cy: f64, color: &str) -> Circle {
    Circle::new()
        .set("cx", cx)
        .set("cy", cy)
        .set("r", 0.4)
        .set("fill", color)
}
