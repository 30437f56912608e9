//! Delaunay pair selection over terminal positions.
//!
//! Routing a candidate corridor for every one of the O(n^2)
//! source/sink pairs is wasteful; the Delaunay triangulation of the
//! terminal positions yields a sparse planar pair set that still
//! connects every terminal to its natural neighbors. The terminal
//! count is small, so the triangulation is brute force: a triple of
//! points is a Delaunay triangle exactly when no other point lies
//! strictly inside its circumcircle. A point exactly *on* the
//! circumcircle does not invalidate the triangle.
//!
//! Positions are the planar (column, row) cell centers, converted to
//! [`geo::Coord`] at this module boundary.

use std::collections::{BTreeSet, HashSet};

use geo::Coord;

use crate::graph::UndirectedEdge;
use crate::grid::Grid;
use crate::types::Cell;

/// Select the candidate pair set for the given terminal cells.
///
/// Cells are deduplicated and off-grid cells skipped before
/// triangulation. Fewer than two distinct on-grid cells select
/// nothing; exactly two select the single pair. The result is sorted
/// and free of duplicates.
#[must_use]
pub fn select_pairs(grid: Grid, cells: &[Cell]) -> Vec<UndirectedEdge> {
    let mut seen = HashSet::new();
    let mut points: Vec<(Cell, Coord<f64>)> = Vec::new();
    for &cell in cells {
        if seen.insert(cell)
            && let Some((x, y)) = grid.position(cell)
        {
            points.push((cell, Coord { x, y }));
        }
    }

    if points.len() < 2 {
        return Vec::new();
    }
    if points.len() == 2 {
        return vec![UndirectedEdge::new(points[0].0, points[1].0)];
    }

    let mut pairs = BTreeSet::new();
    for i in 0..points.len() {
        for j in i + 1..points.len() {
            for k in j + 1..points.len() {
                let is_triangle = points.iter().enumerate().all(|(a, &(_, p))| {
                    a == i
                        || a == j
                        || a == k
                        || !circumcircle_contains(p, points[i].1, points[j].1, points[k].1)
                });
                if is_triangle {
                    pairs.insert(UndirectedEdge::new(points[i].0, points[j].0));
                    pairs.insert(UndirectedEdge::new(points[i].0, points[k].0));
                    pairs.insert(UndirectedEdge::new(points[j].0, points[k].0));
                }
            }
        }
    }
    pairs.into_iter().collect()
}

/// Twice the signed area of triangle `a`-`b`-`c`: positive for a
/// counterclockwise winding, negative for clockwise, zero for
/// collinear points.
fn doubled_signed_area(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Whether `d` lies strictly inside the circumcircle of `a`-`b`-`c`.
///
/// Uses the classical lifted-coordinate incircle determinant,
/// normalized by the triangle winding so the answer is independent of
/// vertex order. A degenerate (collinear) triangle is treated as
/// containing every point, so it never survives as a Delaunay triangle
/// when any fourth point exists.
fn circumcircle_contains(d: Coord<f64>, a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> bool {
    let orientation = doubled_signed_area(a, b, c);
    if orientation == 0.0 {
        return true;
    }

    let adx = a.x - d.x;
    let ady = a.y - d.y;
    let bdx = b.x - d.x;
    let bdy = b.y - d.y;
    let cdx = c.x - d.x;
    let cdy = c.y - d.y;

    let ab_det = adx * bdy - bdx * ady;
    let bc_det = bdx * cdy - cdx * bdy;
    let ca_det = cdx * ady - adx * cdy;
    let a_lift = adx * adx + ady * ady;
    let b_lift = bdx * bdx + bdy * bdy;
    let c_lift = cdx * cdx + cdy * cdy;

    let incircle = a_lift * bc_det + b_lift * ca_det + c_lift * ab_det;
    if orientation > 0.0 {
        incircle > 0.0
    } else {
        incircle < 0.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn cell(i: u32) -> Cell {
        Cell::new(i).unwrap()
    }

    fn coord(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    fn edge(a: u32, b: u32) -> UndirectedEdge {
        UndirectedEdge::new(cell(a), cell(b))
    }

    // --- Predicate tests ---

    #[test]
    fn incircle_detects_interior_point() {
        // Unit circle through (1,0), (0,1), (-1,0); origin is inside.
        let a = coord(1.0, 0.0);
        let b = coord(0.0, 1.0);
        let c = coord(-1.0, 0.0);
        assert!(circumcircle_contains(coord(0.0, 0.0), a, b, c));
        assert!(!circumcircle_contains(coord(2.0, 0.0), a, b, c));
    }

    #[test]
    fn incircle_is_winding_independent() {
        let a = coord(1.0, 0.0);
        let b = coord(0.0, 1.0);
        let c = coord(-1.0, 0.0);
        let inside = coord(0.1, 0.2);
        // Same answer for both windings of the same triangle.
        assert!(circumcircle_contains(inside, a, b, c));
        assert!(circumcircle_contains(inside, c, b, a));
        let outside = coord(3.0, 3.0);
        assert!(!circumcircle_contains(outside, a, b, c));
        assert!(!circumcircle_contains(outside, c, b, a));
    }

    #[test]
    fn point_on_circle_is_not_contained() {
        // (0,-1) lies exactly on the unit circle through the triangle.
        let a = coord(1.0, 0.0);
        let b = coord(0.0, 1.0);
        let c = coord(-1.0, 0.0);
        assert!(!circumcircle_contains(coord(0.0, -1.0), a, b, c));
    }

    #[test]
    fn degenerate_triangle_contains_everything() {
        let a = coord(0.0, 0.0);
        let b = coord(1.0, 1.0);
        let c = coord(2.0, 2.0);
        assert!(circumcircle_contains(coord(50.0, -3.0), a, b, c));
    }

    // --- Pair selection tests ---

    #[test]
    fn fewer_than_two_points_select_nothing() {
        let grid = Grid::new(3, 3);
        assert!(select_pairs(grid, &[]).is_empty());
        assert!(select_pairs(grid, &[cell(5)]).is_empty());
        // A duplicate does not count as a second point.
        assert!(select_pairs(grid, &[cell(5), cell(5)]).is_empty());
    }

    #[test]
    fn two_points_select_the_single_pair() {
        let grid = Grid::new(3, 3);
        assert_eq!(select_pairs(grid, &[cell(1), cell(9)]), vec![edge(1, 9)]);
    }

    #[test]
    fn three_points_select_the_triangle() {
        let grid = Grid::new(3, 3);
        let pairs = select_pairs(grid, &[cell(1), cell(3), cell(7)]);
        assert_eq!(pairs, vec![edge(1, 3), edge(1, 7), edge(3, 7)]);
    }

    #[test]
    fn convex_quadrilateral_selects_outer_edges_plus_one_diagonal() {
        // Grid 8x4. Positions (column, row):
        //   A = cell 1  -> (1,1)      B = cell 7  -> (7,1)
        //   D = cell 27 -> (3,4)      C = cell 30 -> (6,4)
        // A non-cyclic convex quadrilateral: the Delaunay triangles are
        // ABD and BCD, so the diagonal B-D is selected and A-C is not.
        let grid = Grid::new(8, 4);
        let (a, b, c, d) = (cell(1), cell(7), cell(30), cell(27));
        let pairs = select_pairs(grid, &[a, b, c, d]);

        let expected: Vec<UndirectedEdge> = {
            let mut v = vec![
                UndirectedEdge::new(a, b),
                UndirectedEdge::new(b, c),
                UndirectedEdge::new(c, d),
                UndirectedEdge::new(d, a),
                UndirectedEdge::new(b, d),
            ];
            v.sort_unstable();
            v
        };
        assert_eq!(pairs, expected);
        assert!(
            !pairs.contains(&UndirectedEdge::new(a, c)),
            "both diagonals must never be selected for a non-cyclic quad",
        );
    }

    #[test]
    fn concyclic_points_keep_all_triangles() {
        // Four corners of a square are concyclic: every triple's
        // fourth point lies exactly on the circumcircle, which is
        // acceptable, so all 6 edges (both diagonals) survive. This
        // pins the "on the circle" tie handling.
        let grid = Grid::new(5, 5);
        let corners = [cell(1), cell(5), cell(21), cell(25)];
        let pairs = select_pairs(grid, &corners);
        assert_eq!(pairs.len(), 6);
    }

    #[test]
    fn off_grid_cells_are_skipped() {
        let grid = Grid::new(3, 3);
        let pairs = select_pairs(grid, &[cell(1), cell(9), cell(50)]);
        assert_eq!(pairs, vec![edge(1, 9)]);
    }

    #[test]
    fn selection_is_planar_for_a_grid_of_terminals() {
        // 3x3 terminals at every cell of a 3x3 grid: Delaunay edge
        // count for n points is at most 3n - 6 (here 21); crossing-free
        // planarity also means the two long diagonals of the full
        // square cannot both appear.
        let grid = Grid::new(3, 3);
        let all: Vec<Cell> = (1..=9).map(cell).collect();
        let pairs = select_pairs(grid, &all);
        assert!(pairs.len() <= 21);
        assert!(pairs.len() >= 8, "expected a connected triangulation");
    }
}
