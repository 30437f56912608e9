//! Per-edge cost decomposition.
//!
//! Downstream cost models price construction and right-of-way
//! differently (capital vs. easement acquisition), so the aggregate
//! routing cost of each candidate edge is split back into those two
//! components by walking its stored route. Purely derived, read-only
//! output.

use std::collections::HashMap;

use crate::graph::UndirectedEdge;
use crate::surface::CostSurface;
use crate::types::CellRoute;

/// Sum the construction and right-of-way components along every route.
///
/// Returns `(construction, right_of_way)` maps keyed identically to
/// the route map. When the surface has no right-of-way table the
/// right-of-way sums are all zero.
#[must_use]
pub fn component_costs(
    surface: &CostSurface,
    routes: &HashMap<UndirectedEdge, CellRoute>,
) -> (HashMap<UndirectedEdge, f64>, HashMap<UndirectedEdge, f64>) {
    let mut construction = HashMap::with_capacity(routes.len());
    let mut right_of_way = HashMap::with_capacity(routes.len());
    for (&edge, route) in routes {
        let mut construction_cost = 0.0;
        let mut right_of_way_cost = 0.0;
        for step in route.cells().windows(2) {
            construction_cost += surface.construction_weight(step[0], step[1]);
            right_of_way_cost += surface.right_of_way_weight(step[0], step[1]);
        }
        construction.insert(edge, construction_cost);
        right_of_way.insert(edge, right_of_way_cost);
    }
    (construction, right_of_way)
}
