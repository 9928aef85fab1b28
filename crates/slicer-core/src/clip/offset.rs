//! Polygon offsetting with `square`/`miter`/`round` joins (spec §2.1,
//! `CLIP.offset(d, join, miter_limit)`).
//!
//! Each ring is offset edge-by-edge along its own outward normal (outward
//! being "away from the filled interior", so a CCW outer ring grows with
//! positive `delta` and a CW hole ring grows with positive `delta` too,
//! since growing a hole means shrinking the filled area — exactly the
//! convention `ExPoly::new` already orients rings into). The per-edge
//! offset lines are then joined at each original vertex, and the raw
//! (possibly self-overlapping) result across every ring is cleaned up with
//! a single `NonZero`-filled union, the same trick Clipper-family offset
//! engines use to resolve self-intersections at reflex corners.

use super::convert::ring_to_path;
use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay::ShapeType;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::f64::overlay::F64Overlay;
use i_overlay::i_float::f64_point::F64Point;
use slicer_geom::{Coord, ExPoly, Point, Polygon};

/// The corner style used where two offset edges meet (spec §2.1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Join {
    Square,
    /// Miter join with the given miter limit (ratio of miter length to
    /// `|delta|`); falls back to [`Join::Square`] past the limit.
    Miter(f64),
    Round,
}

const ROUND_SEGMENT_ANGLE: f64 = std::f64::consts::PI / 12.0; // 15 degrees

fn outward_normal(a: F64Point, b: F64Point) -> (f64, f64) {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len < 1e-12 {
        (0.0, 0.0)
    } else {
        (dy / len, -dx / len)
    }
}

fn line_intersection(
    p1: F64Point,
    d1: (f64, f64),
    p2: F64Point,
    d2: (f64, f64),
) -> Option<F64Point> {
    let denom = d1.0 * d2.1 - d1.1 * d2.0;
    if denom.abs() < 1e-9 {
        return None;
    }
    let t = ((p2.x - p1.x) * d2.1 - (p2.y - p1.y) * d2.0) / denom;
    Some(F64Point::new(p1.x + d1.0 * t, p1.y + d1.1 * t))
}

/// Appends the corner geometry between the end of the previous offset edge
/// (`prev_end`) and the start of the current one (`cur_start`), both
/// offset from original vertex `v` by `delta`.
fn append_corner(
    out: &mut Vec<F64Point>,
    prev_end: F64Point,
    cur_start: F64Point,
    v: F64Point,
    delta: f64,
    join: Join,
) {
    let close_enough = (prev_end.x - cur_start.x).abs() < 1e-6 && (prev_end.y - cur_start.y).abs() < 1e-6;
    if close_enough {
        out.push(cur_start);
        return;
    }
    match join {
        Join::Round => {
            let a0 = (prev_end.y - v.y).atan2(prev_end.x - v.x);
            let mut a1 = (cur_start.y - v.y).atan2(cur_start.x - v.x);
            let mut delta_angle = a1 - a0;
            // normalize into the short way around consistent with delta's sign
            while delta_angle <= -std::f64::consts::PI {
                delta_angle += 2.0 * std::f64::consts::PI;
            }
            while delta_angle > std::f64::consts::PI {
                delta_angle -= 2.0 * std::f64::consts::PI;
            }
            a1 = a0 + delta_angle;
            let steps = (delta_angle.abs() / ROUND_SEGMENT_ANGLE).ceil().max(1.0) as usize;
            out.push(prev_end);
            for s in 1..steps {
                let a = a0 + delta_angle * (s as f64 / steps as f64);
                out.push(F64Point::new(v.x + delta.abs() * a.cos(), v.y + delta.abs() * a.sin()));
            }
            out.push(cur_start);
        }
        Join::Square => {
            out.push(prev_end);
            out.push(cur_start);
        }
        Join::Miter(limit) => {
            let d_prev = (prev_end.x - v.x, prev_end.y - v.y);
            let d_cur = (cur_start.x - v.x, cur_start.y - v.y);
            // direction of each offset edge at its endpoint, i.e. perpendicular to the radius from v
            let dir_prev = (-d_prev.1, d_prev.0);
            let dir_cur = (-d_cur.1, d_cur.0);
            match line_intersection(prev_end, dir_prev, cur_start, dir_cur) {
                Some(p) => {
                    let miter_len = ((p.x - v.x).powi(2) + (p.y - v.y).powi(2)).sqrt();
                    if miter_len <= limit * delta.abs() {
                        out.push(p);
                    } else {
                        out.push(prev_end);
                        out.push(cur_start);
                    }
                }
                None => {
                    out.push(prev_end);
                    out.push(cur_start);
                }
            }
        }
    }
}

fn offset_ring_path(ring: &Polygon, delta: f64, join: Join) -> Vec<F64Point> {
    let path = ring_to_path(ring);
    let n = path.len();
    if n < 3 {
        return Vec::new();
    }
    let mut oa = vec![F64Point::new(0.0, 0.0); n];
    let mut ob = vec![F64Point::new(0.0, 0.0); n];
    for i in 0..n {
        let a = path[i];
        let b = path[(i + 1) % n];
        let (nx, ny) = outward_normal(a, b);
        oa[i] = F64Point::new(a.x + nx * delta, a.y + ny * delta);
        ob[i] = F64Point::new(b.x + nx * delta, b.y + ny * delta);
    }
    let mut out = Vec::with_capacity(n * 2);
    for i in 0..n {
        let prev = (i + n - 1) % n;
        append_corner(&mut out, ob[prev], oa[i], path[i], delta, join);
        out.push(ob[i]);
    }
    out
}

fn path_to_polygon(path: &[F64Point]) -> Option<Polygon> {
    let pts = path
        .iter()
        .map(|p| Point::new(p.x.round() as i64, p.y.round() as i64))
        .collect::<Vec<_>>();
    Polygon::new(pts).ok()
}

/// Offsets every ring of every input `ExPoly` by `delta` (positive grows the
/// filled area, negative shrinks it) using `join`, then resolves any
/// self-overlap introduced at reflex corners with a `NonZero` union.
pub fn offset(polys: &[ExPoly], delta: Coord, join: Join) -> Vec<ExPoly> {
    if delta == 0 {
        return polys.to_vec();
    }
    let delta_f = delta as f64;
    let mut overlay = F64Overlay::new();
    let mut any_path = false;
    for ex in polys {
        for ring in ex.rings() {
            let path = offset_ring_path(ring, delta_f, join);
            if path.len() >= 3 {
                overlay.add_path(path, ShapeType::Subject);
                any_path = true;
            }
        }
    }
    if !any_path {
        return Vec::new();
    }
    // No `Clip` shapes are added, so `Union` over the `NonZero`-filled graph
    // just resolves the self-overlap each ring's own corner joins introduce.
    let graph = overlay.into_graph(FillRule::NonZero);
    let shapes = graph.extract_shapes(OverlayRule::Union);
    let mut out = Vec::with_capacity(shapes.len());
    for shape in shapes {
        let mut rings = shape.iter().filter_map(|path| path_to_polygon(path));
        let Some(outer) = rings.next() else { continue };
        let holes = rings.collect::<Vec<_>>();
        out.push(ExPoly::new(outer, holes));
    }
    out
}

/// Applies [`offset`] twice in sequence: `offset(offset(polys, d1, join), d2, join)`.
/// This is the "offset2" idiom the spec leans on throughout PG (§4.2.1,
/// §4.2.4) to collapse too-thin necks or to grow-then-shrink a shape back
/// to size while smoothing slivers.
pub fn offset2(polys: &[ExPoly], delta1: Coord, delta2: Coord, join: Join) -> Vec<ExPoly> {
    let mid = offset(polys, delta1, join);
    offset(&mid, delta2, join)
}

#[cfg(test)]
mod tests {
    use super::*;
    use slicer_test_fixtures::square;

    #[test]
    fn inward_offset_shrinks_area() {
        let sq = square(20.0);
        let shrunk = offset(&[sq.clone()], slicer_geom::from_mm(-1.0), Join::Square);
        assert_eq!(shrunk.len(), 1);
        assert!(shrunk[0].area() < sq.area());
    }

    #[test]
    fn outward_offset_grows_area() {
        let sq = square(20.0);
        let grown = offset(&[sq.clone()], slicer_geom::from_mm(1.0), Join::Miter(3.0));
        assert_eq!(grown.len(), 1);
        assert!(grown[0].area() > sq.area());
    }

    #[test]
    fn offset_to_negative_area_vanishes() {
        let sq = square(1.0);
        let shrunk = offset(&[sq], slicer_geom::from_mm(-1.0), Join::Square);
        assert!(shrunk.is_empty());
    }
}
