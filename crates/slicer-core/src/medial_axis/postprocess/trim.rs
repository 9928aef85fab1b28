//! Pipeline steps 6 ("remove_too_thin_extrusion"), 7
//! ("remove_too_thin_points"), 9 ("remove_too_short_polylines") and 13
//! ("remove_bits") (spec §4.1.5).

use crate::types::ThickPolyline;
use slicer_geom::{Coord, EPS_S};

/// Step 6: trims free endpoints whose width has dropped below
/// `min_width`, walking inward until a point at or above threshold is
/// found (or the whole polyline is consumed, in which case it is
/// dropped).
pub fn remove_too_thin_extrusion(polylines: Vec<ThickPolyline>, min_width: Coord) -> Vec<ThickPolyline> {
    let mut out = Vec::with_capacity(polylines.len());
    for pl in polylines {
        if pl.is_loop() {
            out.push(pl);
            continue;
        }
        let ends = pl.endpoints();
        let (pts, widths, _) = pl.clone().into_parts();
        let mut start = 0usize;
        let mut end = pts.len();
        if ends.0 {
            while start < end && widths[start] < min_width {
                start += 1;
            }
        }
        if ends.1 {
            while end > start && widths[end - 1] < min_width {
                end -= 1;
            }
        }
        if end - start < 2 {
            continue;
        }
        out.push(ThickPolyline::new(pts[start..end].to_vec(), widths[start..end].to_vec(), ends));
    }
    out
}

/// Step 7: splits a polyline at any interior point thinner than
/// `min_width`, each resulting piece getting free endpoints at the split.
pub fn remove_too_thin_points(polylines: Vec<ThickPolyline>, min_width: Coord) -> Vec<ThickPolyline> {
    let mut out = Vec::new();
    for pl in polylines {
        if pl.is_loop() {
            out.push(pl);
            continue;
        }
        let ends = pl.endpoints();
        let (pts, widths, _) = pl.into_parts();
        let n = pts.len();
        let mut run_start = 0usize;
        for i in 1..n - 1 {
            if widths[i] < min_width {
                if i - run_start >= 2 {
                    let seg_ends = (if run_start == 0 { ends.0 } else { true }, true);
                    out.push(ThickPolyline::new(
                        pts[run_start..i].to_vec(),
                        widths[run_start..i].to_vec(),
                        seg_ends,
                    ));
                }
                run_start = i + 1;
            }
        }
        if n - run_start >= 2 {
            let seg_ends = (if run_start == 0 { ends.0 } else { true }, ends.1);
            out.push(ThickPolyline::new(pts[run_start..n].to_vec(), widths[run_start..n].to_vec(), seg_ends));
        }
    }
    out
}

/// Step 9: iteratively drops the shortest free-endpoint polyline below
/// `min_size` (`2 * max_width`).
pub fn remove_too_short_polylines(mut polylines: Vec<ThickPolyline>, max_width: Coord) -> Vec<ThickPolyline> {
    let min_size = 2.0 * max_width as f64;
    loop {
        let shortest = polylines
            .iter()
            .enumerate()
            .filter(|(_, pl)| !pl.is_loop() && (pl.endpoints().0 || pl.endpoints().1) && pl.length() < min_size)
            .min_by(|(_, a), (_, b)| a.length().partial_cmp(&b.length()).unwrap());
        let Some((idx, _)) = shortest else { break };
        polylines.remove(idx);
        if polylines.is_empty() {
            break;
        }
    }
    polylines
}

/// Step 13: removes tiny free-endpoint stubs meeting a multi-branch joint
/// where at least two other, longer polylines share that joint point.
pub fn remove_bits(polylines: Vec<ThickPolyline>, nozzle_diameter: Coord) -> Vec<ThickPolyline> {
    let stub_limit = nozzle_diameter as f64 * 1.5;
    let tol2 = (EPS_S as i128) * (EPS_S as i128);
    let mut keep = vec![true; polylines.len()];
    for i in 0..polylines.len() {
        if polylines[i].is_loop() || polylines[i].length() >= stub_limit {
            continue;
        }
        let ends = polylines[i].endpoints();
        if !ends.0 && !ends.1 {
            continue;
        }
        let tip = if ends.0 { polylines[i].pts()[0] } else { *polylines[i].pts().last().unwrap() };
        let longer_neighbours = polylines
            .iter()
            .enumerate()
            .filter(|(j, pl)| {
                *j != i
                    && pl.length() >= stub_limit
                    && (pl.pts()[0].dist_sq(tip) < tol2 || pl.pts().last().unwrap().dist_sq(tip) < tol2)
            })
            .count();
        if longer_neighbours >= 2 {
            keep[i] = false;
        }
    }
    polylines.into_iter().zip(keep).filter_map(|(pl, k)| k.then_some(pl)).collect()
}
