//! §4.1.2 Circular fast-path.

use crate::clip::{offset, Join};
use crate::types::ThickPolyline;
use slicer_geom::{Coord, ExPoly, Point, Polygon};

fn is_convex(ring: &Polygon) -> bool {
    let pts = ring.points();
    let n = pts.len();
    if n < 3 {
        return false;
    }
    let mut sign = 0i8;
    for i in 0..n {
        let a = pts[i];
        let b = pts[(i + 1) % n];
        let c = pts[(i + 2) % n];
        let cross = (b - a).cross(c - b);
        if cross != 0 {
            let s = if cross > 0 { 1 } else { -1 };
            if sign == 0 {
                sign = s;
            } else if sign != s {
                return false;
            }
        }
    }
    true
}

/// If `surface` has no holes, is convex, has more than 4 vertices, and the
/// centroid-distance spread is tight enough, returns a single closed thick
/// polyline in lieu of running the full Voronoi pipeline (spec §4.1.2).
pub fn try_circular_fast_path(surface: &ExPoly, min_width: Coord) -> Option<Vec<ThickPolyline>> {
    if !surface.holes().is_empty() {
        return None;
    }
    let outer = surface.outer();
    if outer.len() <= 4 || !is_convex(outer) {
        return None;
    }

    let centroid = outer.vertex_centroid();
    let radii: Vec<f64> = outer.points().iter().map(|p| p.dist(centroid)).collect();
    let (min_r, max_r) = radii.iter().fold((f64::MAX, f64::MIN), |(mn, mx), &r| (mn.min(r), mx.max(r)));
    if max_r - min_r >= (min_width as f64) / 4.0 {
        return None;
    }

    let r = ((min_r + max_r) / 2.0).round() as Coord;
    let inset = -(r / 2);
    let ring = offset(&[surface.clone()], inset, Join::Round);
    let centerline = ring.into_iter().next()?.outer().clone();

    let pts = centerline.points().to_vec();
    let n = pts.len();
    let widths = vec![r; n];
    Some(vec![ThickPolyline::new(pts, widths, (false, false))])
}

#[cfg(test)]
mod tests {
    use super::*;
    use slicer_geom::from_mm;
    use slicer_test_fixtures::square;

    #[test]
    fn square_is_not_circular_enough() {
        let sq = square(10.0);
        assert!(try_circular_fast_path(&sq, from_mm(0.4)).is_none());
    }
}
