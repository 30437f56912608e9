//! Tab-separated table serializers for network artifacts.
//!
//! Three shapes, matching what the surrounding planning tool persists
//! per scenario:
//!
//! - the **Delaunay pair list**: one row per selected pair, each
//!   endpoint tagged with its terminal kind and label;
//! - the **candidate network**: one row per edge with its endpoints,
//!   cost, optional construction / right-of-way components, and the
//!   full cell route flattened into trailing columns;
//! - the **raw paths** catalog: per path, a summary row followed by a
//!   cell-count-prefixed route row.
//!
//! Each serializer has a parser that reproduces the in-memory
//! structures with no loss of route ordering. Costs are formatted with
//! Rust's shortest-round-trip `f64` display, so parse(serialize(x))
//! is exact.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use trunkline_synthesis::{
    CandidateNetwork, Cell, CellRoute, CorridorPath, Terminals, TerminalKind, UndirectedEdge,
};

/// Errors from table serialization or parsing.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExportError {
    /// A pair endpoint is not among the listed sources and sinks.
    #[error("cell {0} is not a listed source or sink")]
    UnknownTerminal(Cell),

    /// A table failed to parse.
    #[error("malformed table at line {line}: {message}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },
}

fn malformed(line: usize, message: impl Into<String>) -> ExportError {
    ExportError::Malformed {
        line,
        message: message.into(),
    }
}

fn parse_cell(field: &str, line: usize) -> Result<Cell, ExportError> {
    let index: u32 = field
        .parse()
        .map_err(|_| malformed(line, format!("invalid cell index {field:?}")))?;
    Cell::new(index).ok_or_else(|| malformed(line, "cell index 0 is the off-grid sentinel"))
}

fn parse_cost(field: &str, line: usize) -> Result<f64, ExportError> {
    field
        .parse()
        .map_err(|_| malformed(line, format!("invalid cost {field:?}")))
}

fn parse_kind(field: &str, line: usize) -> Result<TerminalKind, ExportError> {
    match field {
        "SOURCE" => Ok(TerminalKind::Source),
        "SINK" => Ok(TerminalKind::Sink),
        other => Err(malformed(
            line,
            format!("expected SOURCE or SINK, got {other:?}"),
        )),
    }
}

// ---------------------------------------------------------------------------
// Delaunay pair list
// ---------------------------------------------------------------------------

/// One selected pair with both endpoints resolved to their terminals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelaunayPairRecord {
    /// Kind of the first endpoint.
    pub kind1: TerminalKind,
    /// Label of the first endpoint.
    pub label1: String,
    /// Kind of the second endpoint.
    pub kind2: TerminalKind,
    /// Label of the second endpoint.
    pub label2: String,
    /// First endpoint cell.
    pub v1: Cell,
    /// Second endpoint cell.
    pub v2: Cell,
}

/// Resolve each selected pair against the terminal lists.
///
/// # Errors
///
/// Returns [`ExportError::UnknownTerminal`] if a pair endpoint is not
/// a listed source or sink.
pub fn delaunay_pair_records(
    pairs: &[UndirectedEdge],
    terminals: &Terminals,
) -> Result<Vec<DelaunayPairRecord>, ExportError> {
    pairs
        .iter()
        .map(|pair| {
            let (v1, v2) = pair.endpoints();
            let (kind1, label1) = terminals
                .classify(v1)
                .ok_or(ExportError::UnknownTerminal(v1))?;
            let (kind2, label2) = terminals
                .classify(v2)
                .ok_or(ExportError::UnknownTerminal(v2))?;
            Ok(DelaunayPairRecord {
                kind1,
                label1: label1.to_owned(),
                kind2,
                label2: label2.to_owned(),
                v1,
                v2,
            })
        })
        .collect()
}

/// Serialize pair records into the tab-separated pair list.
#[must_use]
pub fn delaunay_pair_table(records: &[DelaunayPairRecord]) -> String {
    let mut out = String::from("#  Selected node pairs\n");
    for r in records {
        let _ = writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}",
            r.kind1, r.label1, r.kind2, r.label2, r.v1, r.v2,
        );
    }
    out
}

/// Parse a pair list produced by [`delaunay_pair_table`].
///
/// Comment lines (`#`) and blank lines are skipped.
///
/// # Errors
///
/// Returns [`ExportError::Malformed`] on any row that does not have
/// the six expected fields.
pub fn parse_delaunay_pair_table(input: &str) -> Result<Vec<DelaunayPairRecord>, ExportError> {
    let mut records = Vec::new();
    for (i, raw) in input.lines().enumerate() {
        let line = i + 1;
        if raw.trim().is_empty() || raw.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = raw.split('\t').collect();
        if fields.len() != 6 {
            return Err(malformed(
                line,
                format!("expected 6 fields, got {}", fields.len()),
            ));
        }
        records.push(DelaunayPairRecord {
            kind1: parse_kind(fields[0], line)?,
            label1: fields[1].to_owned(),
            kind2: parse_kind(fields[2], line)?,
            label2: fields[3].to_owned(),
            v1: parse_cell(fields[4], line)?,
            v2: parse_cell(fields[5], line)?,
        });
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Candidate network table
// ---------------------------------------------------------------------------

/// One candidate edge: endpoints, cost, optional cost components, and
/// the full cell route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateEdgeRecord {
    /// Smaller endpoint cell.
    pub v1: Cell,
    /// Larger endpoint cell.
    pub v2: Cell,
    /// Total routing cost.
    pub cost: f64,
    /// Construction component, when decomposed.
    pub construction_cost: Option<f64>,
    /// Right-of-way component, when decomposed.
    pub right_of_way_cost: Option<f64>,
    /// Full cell route between the endpoints.
    pub route: Vec<Cell>,
}

const NETWORK_HEADER: &str = "Vertex1\tVertex2\tCost\tCellRoute";
const NETWORK_HEADER_WITH_COMPONENTS: &str =
    "Vertex1\tVertex2\tCost\tConstructionCost\tRightOfWayCost\tCellRoute";

/// Flatten a network into per-edge records, in ascending edge order.
#[must_use]
pub fn candidate_edge_records(network: &CandidateNetwork) -> Vec<CandidateEdgeRecord> {
    network
        .sorted_edges()
        .into_iter()
        .map(|edge| {
            let (v1, v2) = edge.endpoints();
            CandidateEdgeRecord {
                v1,
                v2,
                cost: network.edge_costs.get(&edge).copied().unwrap_or(f64::INFINITY),
                construction_cost: network.edge_construction_costs.get(&edge).copied(),
                right_of_way_cost: network.edge_right_of_way_costs.get(&edge).copied(),
                route: network
                    .edge_routes
                    .get(&edge)
                    .map(|r| r.cells().to_vec())
                    .unwrap_or_default(),
            }
        })
        .collect()
}

/// Serialize edge records into the tab-separated network table.
///
/// The component-cost columns are present only when every record
/// carries both components (they are produced together by the cost
/// decomposition, or not at all).
#[must_use]
pub fn candidate_network_table(records: &[CandidateEdgeRecord]) -> String {
    let with_components = !records.is_empty()
        && records
            .iter()
            .all(|r| r.construction_cost.is_some() && r.right_of_way_cost.is_some());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        if with_components {
            NETWORK_HEADER_WITH_COMPONENTS
        } else {
            NETWORK_HEADER
        },
    );
    for r in records {
        let _ = write!(out, "{}\t{}\t{}", r.v1, r.v2, r.cost);
        if with_components {
            let _ = write!(
                out,
                "\t{}\t{}",
                r.construction_cost.unwrap_or(0.0),
                r.right_of_way_cost.unwrap_or(0.0),
            );
        }
        for cell in &r.route {
            let _ = write!(out, "\t{cell}");
        }
        let _ = writeln!(out);
    }
    out
}

/// Parse a network table produced by [`candidate_network_table`].
///
/// # Errors
///
/// Returns [`ExportError::Malformed`] on an unrecognized header or a
/// row with too few fields.
pub fn parse_candidate_network_table(
    input: &str,
) -> Result<Vec<CandidateEdgeRecord>, ExportError> {
    let mut lines = input.lines().enumerate();
    let Some((_, header)) = lines.next() else {
        return Err(malformed(1, "missing header"));
    };
    let with_components = match header {
        NETWORK_HEADER => false,
        NETWORK_HEADER_WITH_COMPONENTS => true,
        other => return Err(malformed(1, format!("unrecognized header {other:?}"))),
    };
    let fixed_fields = if with_components { 5 } else { 3 };

    let mut records = Vec::new();
    for (i, raw) in lines {
        let line = i + 1;
        if raw.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = raw.split('\t').collect();
        if fields.len() < fixed_fields {
            return Err(malformed(
                line,
                format!("expected at least {fixed_fields} fields, got {}", fields.len()),
            ));
        }
        let v1 = parse_cell(fields[0], line)?;
        let v2 = parse_cell(fields[1], line)?;
        let cost = parse_cost(fields[2], line)?;
        let (construction_cost, right_of_way_cost) = if with_components {
            (
                Some(parse_cost(fields[3], line)?),
                Some(parse_cost(fields[4], line)?),
            )
        } else {
            (None, None)
        };
        let route = fields[fixed_fields..]
            .iter()
            .map(|f| parse_cell(f, line))
            .collect::<Result<Vec<Cell>, ExportError>>()?;
        records.push(CandidateEdgeRecord {
            v1,
            v2,
            cost,
            construction_cost,
            right_of_way_cost,
            route,
        });
    }
    Ok(records)
}

/// Rebuild a [`CandidateNetwork`] from parsed edge records.
///
/// Vertices and the component count are recomputed from the edge set;
/// component-cost maps are populated only from records that carry
/// them.
#[must_use]
pub fn network_from_records(records: &[CandidateEdgeRecord]) -> CandidateNetwork {
    let mut edge_costs = std::collections::HashMap::new();
    let mut edge_routes = std::collections::HashMap::new();
    let mut construction = std::collections::HashMap::new();
    let mut right_of_way = std::collections::HashMap::new();
    for r in records {
        let edge = UndirectedEdge::new(r.v1, r.v2);
        edge_costs.insert(edge, r.cost);
        edge_routes.insert(edge, CellRoute::new(r.route.clone()));
        if let Some(c) = r.construction_cost {
            construction.insert(edge, c);
        }
        if let Some(c) = r.right_of_way_cost {
            right_of_way.insert(edge, c);
        }
    }
    CandidateNetwork::from_parts(edge_costs, edge_routes, construction, right_of_way)
}

// ---------------------------------------------------------------------------
// Raw paths table
// ---------------------------------------------------------------------------

/// Serialize the shortest-path catalog: per path, a summary row
/// (`FromCell ToCell Cost Length`) followed by a route row prefixed
/// with its cell count.
#[must_use]
pub fn raw_paths_table(catalog: &[CorridorPath]) -> String {
    let mut out = String::from("FromCell\tToCell\tCost\tLength\n");
    for path in catalog {
        let cells = path.route.cells();
        let (Some(first), Some(last)) = (path.route.first(), path.route.last()) else {
            continue;
        };
        let _ = writeln!(out, "{first}\t{last}\t{}\t{}", path.cost, cells.len());
        let _ = write!(out, "{}", cells.len());
        for cell in cells {
            let _ = write!(out, "\t{cell}");
        }
        let _ = writeln!(out);
    }
    out
}

/// Parse a catalog produced by [`raw_paths_table`].
///
/// # Errors
///
/// Returns [`ExportError::Malformed`] when a summary row and its route
/// row disagree, or either is truncated.
pub fn parse_raw_paths_table(input: &str) -> Result<Vec<CorridorPath>, ExportError> {
    let mut lines = input.lines().enumerate();
    let Some((_, header)) = lines.next() else {
        return Err(malformed(1, "missing header"));
    };
    if header != "FromCell\tToCell\tCost\tLength" {
        return Err(malformed(1, format!("unrecognized header {header:?}")));
    }

    let mut catalog = Vec::new();
    while let Some((i, summary)) = lines.next() {
        let line = i + 1;
        if summary.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = summary.split('\t').collect();
        if fields.len() != 4 {
            return Err(malformed(
                line,
                format!("expected 4 summary fields, got {}", fields.len()),
            ));
        }
        let from = parse_cell(fields[0], line)?;
        let to = parse_cell(fields[1], line)?;
        let cost = parse_cost(fields[2], line)?;
        let length: usize = fields[3]
            .parse()
            .map_err(|_| malformed(line, format!("invalid length {:?}", fields[3])))?;

        let Some((j, route_row)) = lines.next() else {
            return Err(malformed(line, "summary row without a route row"));
        };
        let route_line = j + 1;
        let route_fields: Vec<&str> = route_row.split('\t').collect();
        if route_fields.len() != length + 1 {
            return Err(malformed(
                route_line,
                format!("expected {} route fields, got {}", length + 1, route_fields.len()),
            ));
        }
        let cells = route_fields[1..]
            .iter()
            .map(|f| parse_cell(f, route_line))
            .collect::<Result<Vec<Cell>, ExportError>>()?;
        if cells.first() != Some(&from) || cells.last() != Some(&to) {
            return Err(malformed(
                route_line,
                "route endpoints disagree with the summary row",
            ));
        }
        catalog.push(CorridorPath {
            route: CellRoute::new(cells),
            cost,
        });
    }
    Ok(catalog)
}
