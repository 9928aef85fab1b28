//! Pipeline step 12 ("taper_ends"), spec §4.1.5: linearly reduces width
//! from each free endpoint down to `min_size` over `taper_size` of
//! centerline length.

use super::params::MaxParams;
use crate::types::ThickPolyline;
use slicer_geom::Coord;
use std::f64::consts::FRAC_PI_4;

fn cumulative_lengths(pl: &ThickPolyline) -> Vec<f64> {
    let pts = pl.pts();
    let mut cum = vec![0.0; pts.len()];
    for i in 1..pts.len() {
        cum[i] = cum[i - 1] + pts[i - 1].dist(pts[i]);
    }
    cum
}

/// Tapers both free endpoints of every open polyline toward `min_size`
/// over `params.taper_size` of arc length; a `taper_size` of `0` disables
/// the step entirely (spec §4.1 Inputs).
pub fn taper_ends(polylines: Vec<ThickPolyline>, params: &MaxParams) -> Vec<ThickPolyline> {
    if params.taper_size <= 0 {
        return polylines;
    }
    let min_size = ((0.1 * params.nozzle_diameter as f64).max(params.height as f64 * (1.0 - FRAC_PI_4)))
        .round()
        .max(1.0) as Coord;
    let taper_len = params.taper_size as f64;

    polylines
        .into_iter()
        .map(|mut pl| {
            if pl.is_loop() {
                return pl;
            }
            let ends = pl.endpoints();
            let cum = cumulative_lengths(&pl);
            let total = *cum.last().unwrap_or(&0.0);
            let n = pl.len();
            let (_, widths, _) = pl.parts_mut();
            if ends.0 {
                for i in 0..n {
                    if cum[i] >= taper_len {
                        break;
                    }
                    let t = cum[i] / taper_len;
                    let tapered = min_size as f64 + t * (widths[i] as f64 - min_size as f64);
                    widths[i] = widths[i].min(tapered.round() as Coord);
                }
            }
            if ends.1 {
                for i in 0..n {
                    let from_end = total - cum[i];
                    if from_end >= taper_len {
                        continue;
                    }
                    let t = from_end / taper_len;
                    let tapered = min_size as f64 + t * (widths[i] as f64 - min_size as f64);
                    widths[i] = widths[i].min(tapered.round() as Coord);
                }
            }
            pl
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use slicer_geom::{from_mm, Point};

    fn params() -> MaxParams {
        let mut p = MaxParams::new(from_mm(0.2), from_mm(0.6), from_mm(0.4), from_mm(0.2));
        p.taper_size = from_mm(2.0);
        p
    }

    #[test]
    fn disabled_when_taper_size_is_zero() {
        let pl = ThickPolyline::new(
            vec![Point::new(0, 0), Point::new(from_mm(10.0), 0)],
            vec![from_mm(0.5), from_mm(0.5)],
            (true, true),
        );
        let mut p = params();
        p.taper_size = 0;
        let out = taper_ends(vec![pl.clone()], &p);
        assert_eq!(out[0].width(), pl.width());
    }

    #[test]
    fn tip_narrows_toward_min_size() {
        let pl = ThickPolyline::new(
            vec![Point::new(0, 0), Point::new(from_mm(10.0), 0)],
            vec![from_mm(0.5), from_mm(0.5)],
            (true, true),
        );
        let out = taper_ends(vec![pl], &params());
        assert!(out[0].width()[0] < from_mm(0.5));
    }
}
