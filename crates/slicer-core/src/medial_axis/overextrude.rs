//! Pipeline step 10 ("ensure_not_overextrude"), spec §4.1.5.
//!
//! The reference volume is `bounds`'s area; the planar "volume" emitted by
//! a set of thick polylines is approximated as the trapezoid-rule sum used
//! for the area-ratio check in [`super::area_ratio`], plus a small
//! end-cap term at free endpoints scaled by the `(1 - π/4)` corner
//! allowance spec §4.1.5 names but doesn't spell out the exact formula
//! for — this file's reading is recorded in `DESIGN.md`.

use crate::types::ThickPolyline;
use slicer_geom::{Coord, ExPoly};
use std::f64::consts::FRAC_PI_4;

fn emitted_area(polylines: &[ThickPolyline]) -> f64 {
    let mut total = 0.0;
    let corner_allowance = 1.0 - FRAC_PI_4;
    for pl in polylines {
        let pts = pl.pts();
        let w = pl.width();
        for i in 0..pts.len().saturating_sub(1) {
            total += 0.5 * (w[i] + w[i + 1]) as f64 * pts[i].dist(pts[i + 1]);
        }
        let ends = pl.endpoints();
        if ends.0 {
            let r = w[0] as f64 / 2.0;
            total += corner_allowance * std::f64::consts::PI * r * r;
        }
        if ends.1 {
            let r = *w.last().unwrap() as f64 / 2.0;
            total += corner_allowance * std::f64::consts::PI * r * r;
        }
    }
    total
}

/// Scales every polyline's widths uniformly so the emitted planar area does
/// not exceed `bounds`'s solid area. A no-op when already within budget, so
/// applying this twice is a fixed point (spec §8.2).
pub fn ensure_not_overextrude(polylines: Vec<ThickPolyline>, bounds: &ExPoly) -> Vec<ThickPolyline> {
    let total = emitted_area(&polylines);
    let reference = bounds.area();
    if total <= reference || total <= 0.0 {
        return polylines;
    }
    let scale = reference / total;
    polylines
        .into_iter()
        .map(|mut pl| {
            let (_, widths, _) = pl.parts_mut();
            for w in widths.iter_mut() {
                *w = ((*w as f64) * scale).round() as Coord;
            }
            pl
        })
        .collect()
}
