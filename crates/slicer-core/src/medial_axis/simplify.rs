//! §4.1.1 Polygon simplification.

use crate::clip::intersection;
use crate::constants::res;
use slicer_geom::{Coord, ExPoly, Point, Polygon, EPS_S};

fn cross_collinear(a: Point, b: Point, c: Point) -> bool {
    let area2 = (b - a).cross(c - a);
    area2.unsigned_abs() <= (EPS_S as i128) * (EPS_S as i128)
}

/// Removes vertices collinear with both neighbours within `EPS_S`.
fn drop_collinear(ring: &Polygon) -> Vec<Point> {
    let pts = ring.points();
    let n = pts.len();
    if n < 4 {
        return pts.to_vec();
    }
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let prev = pts[(i + n - 1) % n];
        let cur = pts[i];
        let next = pts[(i + 1) % n];
        if !cross_collinear(prev, cur, next) {
            out.push(cur);
        }
    }
    if out.len() < 3 {
        pts.to_vec()
    } else {
        out
    }
}

fn nearest_point_on_ring(ring: &Polygon, p: Point) -> Point {
    let mut best = ring.points()[0];
    let mut best_d = best.dist_sq(p);
    for line in ring.lines() {
        for cand in [line.0, line.1] {
            let d = cand.dist_sq(p);
            if d < best_d {
                best_d = d;
                best = cand;
            }
        }
    }
    best
}

/// Snaps or drops vertices that fall off the `bounds` contour, then
/// intersects the result with `bounds`, then collapses near-duplicate
/// vertices (spec §4.1.1).
fn snap_to_bounds(simplified: &ExPoly, bounds: &ExPoly) -> ExPoly {
    let snap_ring = |ring: &Polygon| -> Vec<Point> {
        let pts = ring.points();
        let n = pts.len();
        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            let p = pts[i];
            if bounds.outer().contains_point(p) || bounds.holes().iter().any(|h| h.contains_point(p)) {
                out.push(p);
                continue;
            }
            let on_bounds = nearest_point_on_ring(bounds.outer(), p);
            let neighbour_dist = ((pts[(i + n - 1) % n].dist(p) + pts[(i + 1) % n].dist(p)) / 2.0).max(1.0);
            if on_bounds.dist(p) < neighbour_dist / 2.0 {
                out.push(on_bounds);
            }
            // else: drop the vertex
        }
        out
    };
    let outer_pts = snap_ring(simplified.outer());
    let outer = Polygon::new(outer_pts).unwrap_or_else(|_| simplified.outer().clone());
    let mut holes = Vec::new();
    for h in simplified.holes() {
        if let Ok(p) = Polygon::new(snap_ring(h)) {
            holes.push(p);
        }
    }
    let snapped = ExPoly::new(outer, holes);
    let clipped = intersection(&[snapped], &[bounds.clone()]);
    clipped.into_iter().next().unwrap_or_else(|| simplified.clone())
}

fn drop_near_duplicates(ring: &[Point], min_dist: Coord) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(ring.len());
    for &p in ring {
        if let Some(&last) = out.last() {
            if last.dist_sq(p) < (min_dist as i128) * (min_dist as i128) {
                continue;
            }
        }
        out.push(p);
    }
    if out.len() > 1 {
        if let (Some(&first), Some(&last)) = (out.first(), out.last()) {
            if first.dist_sq(last) < (min_dist as i128) * (min_dist as i128) {
                out.pop();
            }
        }
    }
    out
}

/// Runs the full §4.1.1 pipeline: collinear removal, bounds snapping (only
/// when `bounds != surface`), then near-duplicate collapse.
pub fn simplify(surface: &ExPoly, bounds: &ExPoly) -> ExPoly {
    let outer = Polygon::new(drop_collinear(surface.outer())).unwrap_or_else(|_| surface.outer().clone());
    let holes = surface
        .holes()
        .iter()
        .filter_map(|h| Polygon::new(drop_collinear(h)).ok())
        .collect::<Vec<_>>();
    let mut result = ExPoly::new(outer, holes);

    if bounds != surface {
        result = snap_to_bounds(&result, bounds);
    }

    let min_dist = res();
    let outer = Polygon::new(drop_near_duplicates(result.outer().points(), min_dist))
        .unwrap_or_else(|_| result.outer().clone());
    let holes = result
        .holes()
        .iter()
        .filter_map(|h| Polygon::new(drop_near_duplicates(h.points(), min_dist)).ok())
        .collect::<Vec<_>>();
    ExPoly::new(outer, holes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use slicer_test_fixtures::square;

    #[test]
    fn simplify_identity_when_bounds_equal_surface() {
        let sq = square(10.0);
        let out = simplify(&sq, &sq);
        assert!(!out.is_empty());
    }
}
