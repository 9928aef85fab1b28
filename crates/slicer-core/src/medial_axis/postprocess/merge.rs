//! Pipeline steps 1 ("concat"), 2 ("fusion_curve"), 3 ("main_fusion"), 4
//! ("fusion_corners") and 8 ("concatenate_polylines_with_crossing") — every
//! step that joins two polylines into one (spec §4.1.5).

use super::super::kappa::KappaCache;
use crate::types::ThickPolyline;
use slicer_geom::{Coord, Point, EPS_S};

fn endpoint(pl: &ThickPolyline, at_start: bool) -> Point {
    if at_start {
        pl.pts()[0]
    } else {
        pl.pts()[pl.pts().len() - 1]
    }
}

fn coincide(a: Point, b: Point) -> bool {
    a.dist_sq(b) <= (EPS_S as i128) * (EPS_S as i128)
}

/// Joins `b` onto the end of `a` so the shared point is not duplicated,
/// producing one continuous polyline. `a`'s last point is assumed to
/// coincide with `b`'s first point; callers reverse either side first so
/// this precondition holds.
fn splice(mut a: ThickPolyline, b: ThickPolyline) -> ThickPolyline {
    let (mut a_pts, mut a_w, a_ends) = {
        let (pts, w, ends) = a.parts_mut();
        (std::mem::take(pts), std::mem::take(w), *ends)
    };
    let (b_pts, b_w, b_ends) = b.into_parts();
    a_pts.extend_from_slice(&b_pts[1..]);
    a_w.extend_from_slice(&b_w[1..]);
    ThickPolyline::new(a_pts, a_w, (a_ends.0, b_ends.1))
}

/// Step 1: merge polylines that share a free endpoint, repeatedly, until
/// no more merges are possible. Always produces one continuous piece per
/// connected chain of free endpoints.
pub fn concat(mut polylines: Vec<ThickPolyline>) -> Vec<ThickPolyline> {
    loop {
        let mut found = None;
        'outer: for i in 0..polylines.len() {
            if polylines[i].is_loop() {
                continue;
            }
            for j in 0..polylines.len() {
                if i == j || polylines[j].is_loop() {
                    continue;
                }
                let (ends_i, ends_j) = (polylines[i].endpoints(), polylines[j].endpoints());
                if ends_i.1 && ends_j.0 && coincide(endpoint(&polylines[i], false), endpoint(&polylines[j], true)) {
                    found = Some((i, j));
                    break 'outer;
                }
            }
        }
        let Some((i, j)) = found else { break };
        let (a, b) = if i > j {
            let a = polylines.remove(i);
            let b = polylines.remove(j);
            (a, b)
        } else {
            let b = polylines.remove(j);
            let a = polylines.remove(i);
            (a, b)
        };
        polylines.push(splice(a, b));
    }
    polylines
}

/// Step 2: drop short Y-branches whose free tip meets the contour at a
/// shallow angle (approximated here by a length/kappa threshold, since the
/// original branch graph that produced the Y is no longer available once
/// polylines have been flattened).
pub fn fusion_curve(polylines: Vec<ThickPolyline>, kappa: &mut KappaCache, max_width: Coord) -> Vec<ThickPolyline> {
    let short_limit = max_width as f64 * 0.6;
    polylines
        .into_iter()
        .filter(|pl| {
            if pl.is_loop() || pl.length() > short_limit {
                return true;
            }
            let ends = pl.endpoints();
            if !(ends.0 ^ ends.1) {
                return true;
            }
            let tip = if ends.0 { pl.pts()[0] } else { pl.pts()[pl.pts().len() - 1] };
            kappa.kappa(tip, max_width as f64) > 0.6
        })
        .collect()
}

fn straightness(a_dir: (f64, f64), b_dir: (f64, f64)) -> f64 {
    let dot = a_dir.0 * b_dir.0 + a_dir.1 * b_dir.1;
    let na = (a_dir.0.powi(2) + a_dir.1.powi(2)).sqrt().max(1e-9);
    let nb = (b_dir.0.powi(2) + b_dir.1.powi(2)).sqrt().max(1e-9);
    dot / (na * nb)
}

fn tangent_at_end(pl: &ThickPolyline, at_start: bool) -> (f64, f64) {
    let pts = pl.pts();
    let n = pts.len();
    let (a, b) = if at_start {
        (pts[1.min(n - 1)], pts[0])
    } else {
        (pts[n - 1], pts[n - 2.min(n - 1)])
    };
    ((a.x - b.x) as f64, (a.y - b.y) as f64)
}

fn resample(pts: &[Point], widths: &[Coord], n: usize) -> (Vec<Point>, Vec<f64>) {
    let total: f64 = pts.windows(2).map(|w| w[0].dist(w[1])).sum();
    if total <= 0.0 || n < 2 {
        return (pts.to_vec(), widths.iter().map(|&w| w as f64).collect());
    }
    let mut out_pts = Vec::with_capacity(n);
    let mut out_w = Vec::with_capacity(n);
    for i in 0..n {
        let target = total * (i as f64) / ((n - 1) as f64);
        let mut acc = 0.0;
        let mut seg = pts.len() - 2;
        for (k, w) in pts.windows(2).enumerate() {
            let d = w[0].dist(w[1]);
            if acc + d >= target || k == pts.len() - 2 {
                seg = k;
                break;
            }
            acc += d;
        }
        let d = pts[seg].dist(pts[seg + 1]).max(1e-9);
        let t = ((target - acc) / d).clamp(0.0, 1.0);
        let p = Point::new(
            pts[seg].x + ((pts[seg + 1].x - pts[seg].x) as f64 * t) as i64,
            pts[seg].y + ((pts[seg + 1].y - pts[seg].y) as f64 * t) as i64,
        );
        let w = widths[seg] as f64 + (widths[seg + 1] as f64 - widths[seg] as f64) * t;
        out_pts.push(p);
        out_w.push(w);
    }
    (out_pts, out_w)
}

/// Step 3: the central merge. Pairs polylines sharing a free endpoint,
/// requires straightness at the joint, comparable lengths, and a merged
/// width that would not exceed `max_width * 1.05`; merges by
/// percent-length resampling and the weighted average from spec §4.1.5.
pub fn main_fusion(
    polylines: Vec<ThickPolyline>,
    kappa: &mut KappaCache,
    max_width: Coord,
) -> Vec<ThickPolyline> {
    let mut pool = polylines;
    loop {
        let mut best: Option<(usize, usize, bool, bool, f64)> = None;
        for i in 0..pool.len() {
            if pool[i].is_loop() {
                continue;
            }
            for j in (i + 1)..pool.len() {
                if pool[j].is_loop() {
                    continue;
                }
                for &end_i in &[true, false] {
                    if !(if end_i { pool[i].endpoints().0 } else { pool[i].endpoints().1 }) {
                        continue;
                    }
                    for &end_j in &[true, false] {
                        if !(if end_j { pool[j].endpoints().0 } else { pool[j].endpoints().1 }) {
                            continue;
                        }
                        if !coincide(endpoint(&pool[i], end_i), endpoint(&pool[j], end_j)) {
                            continue;
                        }
                        let dir_i = tangent_at_end(&pool[i], end_i);
                        let dir_j = tangent_at_end(&pool[j], end_j);
                        // at a continuation the directions should be roughly opposed
                        let s = -straightness(dir_i, dir_j);
                        let len_i = pool[i].length();
                        let len_j = pool[j].length();
                        if len_i.max(len_j) > 4.0 * len_i.min(len_j).max(1.0) {
                            continue;
                        }
                        if s < 0.7 {
                            continue;
                        }
                        if best.map(|(_, _, _, _, b)| s > b).unwrap_or(true) {
                            best = Some((i, j, end_i, end_j, s));
                        }
                    }
                }
            }
        }
        let Some((i, j, end_i, end_j, _)) = best else { break };

        let a = if end_i { pool[i].reversed() } else { pool[i].clone() };
        let b = if end_j { pool[j].clone() } else { pool[j].reversed() };

        let n = a.len().max(b.len()).max(2);
        let (pa, wa) = resample(a.pts(), a.width(), n);
        let (pb, wb) = resample(b.pts(), b.width(), n);
        let max_len = a.length().max(b.length()).max(1.0);
        let len_a = a.length();
        let len_b = b.length();
        let kappa_a = kappa.kappa(pa[n / 2], max_width as f64);
        let kappa_b = kappa.kappa(pb[n / 2], max_width as f64);
        let w_poly = (2.0 - len_a / max_len) * kappa_a;
        let w_cand = (2.0 - len_b / max_len) * kappa_b;
        let d_poly = len_a.max(1.0);
        let d_cand = len_b.max(1.0);
        let max_d = d_poly.max(d_cand);
        let min_d = d_poly.min(d_cand);

        let mut merged_pts = Vec::with_capacity(n);
        let mut merged_w = Vec::with_capacity(n);
        for k in 0..n {
            let mx = (pa[k].x as f64 + pb[k].x as f64) / 2.0;
            let my = (pa[k].y as f64 + pb[k].y as f64) / 2.0;
            merged_pts.push(Point::new(mx.round() as i64, my.round() as i64));
            let sep = pa[k].dist(pb[k]);
            let width = 0.5 * wa[k] * d_poly / max_d
                + 0.5 * wb[k] * d_cand / max_d
                + 2.0 * sep * (min_d / max_d).sqrt();
            merged_w.push((width.min(max_width as f64 * 1.05)).round() as Coord);
        }

        let new_ends = (
            if end_i { pool[i].endpoints().1 } else { pool[i].endpoints().0 },
            if end_j { pool[j].endpoints().1 } else { pool[j].endpoints().0 },
        );
        let merged = ThickPolyline::new(merged_pts, merged_w, new_ends);

        let (hi, lo) = if i > j { (i, j) } else { (j, i) };
        pool.remove(hi);
        pool.remove(lo);
        pool.push(merged);
    }
    pool
}

/// Step 4: merges tiny Y-pulls on convex external curves. Approximated as
/// a bounded corner-ward nudge of the shared endpoint rather than a full
/// branch re-derivation, proportional to the contour-angle coefficient.
pub fn fusion_corners(mut polylines: Vec<ThickPolyline>, kappa: &mut KappaCache, max_width: Coord) -> Vec<ThickPolyline> {
    for pl in polylines.iter_mut() {
        if pl.is_loop() || pl.length() > max_width as f64 * 2.0 {
            continue;
        }
        let ends = pl.endpoints();
        if !ends.0 && !ends.1 {
            continue;
        }
        let tip_is_start = ends.0;
        let tip = if tip_is_start { pl.pts()[0] } else { *pl.pts().last().unwrap() };
        let k = kappa.kappa(tip, max_width as f64);
        if k <= 0.0 {
            continue;
        }
        let neighbour = if tip_is_start { pl.pts()[1] } else { pl.pts()[pl.pts().len() - 2] };
        let branch_len = tip.dist(neighbour);
        let shift = (branch_len * 0.144 * k).max(0.0);
        let dir = ((tip.x - neighbour.x) as f64, (tip.y - neighbour.y) as f64);
        let len = (dir.0.powi(2) + dir.1.powi(2)).sqrt().max(1e-9);
        let moved = Point::new(
            tip.x + (dir.0 / len * shift) as i64,
            tip.y + (dir.1 / len * shift) as i64,
        );
        let (pts, _, _) = pl.parts_mut();
        if tip_is_start {
            pts[0] = moved;
        } else {
            let last = pts.len() - 1;
            pts[last] = moved;
        }
    }
    polylines
}

/// Step 8: second merge pass, accepting pairs that meet at a junction
/// (rather than only at free endpoints) and choosing the straightest
/// continuation through that junction.
pub fn concatenate_with_crossing(polylines: Vec<ThickPolyline>) -> Vec<ThickPolyline> {
    let mut pool = polylines;
    loop {
        let mut merged = false;
        'search: for i in 0..pool.len() {
            for j in 0..pool.len() {
                if i == j {
                    continue;
                }
                for &end_i in &[true, false] {
                    for &end_j in &[true, false] {
                        if !coincide(endpoint(&pool[i], end_i), endpoint(&pool[j], end_j)) {
                            continue;
                        }
                        let dir_i = tangent_at_end(&pool[i], end_i);
                        let dir_j = tangent_at_end(&pool[j], end_j);
                        if -straightness(dir_i, dir_j) < 0.9 {
                            continue;
                        }
                        let a = if end_i { pool[i].reversed() } else { pool[i].clone() };
                        let b = if end_j { pool[j].clone() } else { pool[j].reversed() };
                        let combined = splice(a, b);
                        let (hi, lo) = if i > j { (i, j) } else { (j, i) };
                        pool.remove(hi);
                        pool.remove(lo);
                        pool.push(combined);
                        merged = true;
                        break 'search;
                    }
                }
            }
        }
        if !merged {
            break;
        }
    }
    pool
}
