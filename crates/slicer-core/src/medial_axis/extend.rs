//! Pipeline step 5 ("extends_line"), spec §4.1.5. Runs before or after the
//! thinning steps (6, 7) depending on `stop_at_min_width`; the ordering
//! decision lives in `super::run_pipeline`, not here.

use crate::types::ThickPolyline;
use slicer_geom::{ExPoly, Point};

/// The free endpoint and its outward-pointing local tangent.
fn tangent_away(pl: &ThickPolyline, at_start: bool) -> (Point, (f64, f64)) {
    let pts = pl.pts();
    let n = pts.len();
    if at_start {
        let a = pts[0];
        let b = pts[1.min(n - 1)];
        (a, ((a.x - b.x) as f64, (a.y - b.y) as f64))
    } else {
        let a = pts[n - 1];
        let b = pts[n.saturating_sub(2)];
        (a, ((a.x - b.x) as f64, (a.y - b.y) as f64))
    }
}

/// Casts a ray from `origin` along `dir` and returns the nearest
/// intersection with any edge of `bounds` (outer ring and every hole), or
/// `None` if the ray misses (spec §7, `ExtensionMiss` — not fatal, the
/// polyline just keeps its original endpoint).
fn ray_hits_bounds(origin: Point, dir: (f64, f64), bounds: &ExPoly) -> Option<Point> {
    let len = (dir.0 * dir.0 + dir.1 * dir.1).sqrt();
    if len < 1e-9 {
        return None;
    }
    let dir = (dir.0 / len, dir.1 / len);
    let (ox, oy) = (origin.x as f64, origin.y as f64);
    let mut best: Option<(f64, Point)> = None;
    for ring in bounds.rings() {
        for (a, b) in ring.lines() {
            let (ax, ay) = (a.x as f64, a.y as f64);
            let (ex, ey) = (b.x as f64 - ax, b.y as f64 - ay);
            let denom = dir.0 * ey - dir.1 * ex;
            if denom.abs() < 1e-9 {
                continue;
            }
            let t = ((ax - ox) * ey - (ay - oy) * ex) / denom;
            if t <= 1e-6 {
                continue;
            }
            let s = if ex.abs() > ey.abs() {
                (ox + dir.0 * t - ax) / ex
            } else {
                (oy + dir.1 * t - ay) / ey
            };
            if !(0.0..=1.0).contains(&s) {
                continue;
            }
            if best.map(|(bt, _)| t < bt).unwrap_or(true) {
                let p = Point::new((ox + dir.0 * t).round() as i64, (oy + dir.1 * t).round() as i64);
                best = Some((t, p));
            }
        }
    }
    best.map(|(_, p)| p)
}

/// Extends both free endpoints of every open polyline along its local
/// tangent until it meets `bounds` (spec §4.1.5 step 5). A miss on one end
/// leaves that end exactly where it was; loops are untouched.
pub fn extends_line(polylines: Vec<ThickPolyline>, bounds: &ExPoly) -> Vec<ThickPolyline> {
    polylines
        .into_iter()
        .map(|mut pl| {
            if pl.is_loop() {
                return pl;
            }
            if pl.endpoints().0 {
                let (origin, dir) = tangent_away(&pl, true);
                if let Some(hit) = ray_hits_bounds(origin, dir, bounds) {
                    let w0 = pl.width()[0];
                    let (pts, widths, _) = pl.parts_mut();
                    pts.insert(0, hit);
                    widths.insert(0, w0);
                }
            }
            if pl.endpoints().1 {
                let (origin, dir) = tangent_away(&pl, false);
                if let Some(hit) = ray_hits_bounds(origin, dir, bounds) {
                    let wl = *pl.width().last().unwrap();
                    let (pts, widths, _) = pl.parts_mut();
                    pts.push(hit);
                    widths.push(wl);
                }
            }
            pl
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use slicer_test_fixtures::square;

    #[test]
    fn loop_is_untouched() {
        let bounds = square(20.0);
        let pts = vec![Point::new(0, 0), Point::new(100, 0), Point::new(50, 100)];
        let pl = ThickPolyline::new(pts.clone(), vec![10, 10, 10], (false, false));
        let out = extends_line(vec![pl], &bounds);
        assert_eq!(out[0].pts(), pts.as_slice());
    }
}
