//! MAX: medial-axis extraction (spec §4.1). [`medial_axis`] is the single
//! entry point for the whole module; every other item here is a pipeline
//! stage it drives in the exact order spec §4.1.5 prescribes, or a helper
//! (`VD` construction, the circular fast-path, the contour-angle
//! coefficient) that stage needs.

mod build;
mod circular;
mod extend;
mod grow;
mod kappa;
mod overextrude;
mod params;
mod postprocess;
mod simplify;
mod taper;
mod walk;

pub use build::ValidEdge;
pub use params::MaxParams;

use crate::clip::{offset, Join};
use crate::types::ThickPolyline;
use kappa::KappaCache;
use slicer_geom::{ExPoly, EPS_S};

/// The ratio of trapezoid-rule emitted area to `bounds.area()`; both the
/// `ensure_not_overextrude` pre-check here and spec §4.1 Failure semantics'
/// malformed-skeleton check use this same quantity.
fn area_ratio(polylines: &[ThickPolyline], bounds: &ExPoly) -> f64 {
    let reference = bounds.area();
    if reference <= 0.0 {
        return f64::INFINITY;
    }
    let mut total = 0.0;
    for pl in polylines {
        let pts = pl.pts();
        let w = pl.width();
        for i in 0..pts.len().saturating_sub(1) {
            total += 0.5 * (w[i] + w[i + 1]) as f64 * pts[i].dist(pts[i + 1]);
        }
    }
    total / reference
}

fn in_unit_band(ratio: f64) -> bool {
    (1.0 / 1.1..=1.1).contains(&ratio)
}

/// Runs polyline construction plus the full thirteen-step post-processing
/// pipeline on an already-simplified `surface` (spec §4.1.3–§4.1.5).
fn run_pipeline(surface: &ExPoly, bounds: &ExPoly, params: &MaxParams) -> crate::Result<Vec<ThickPolyline>> {
    let (vd, valid) = build::build_valid_edges(surface, params.max_width)?;
    let mut polylines = walk::build_polylines(&vd, &valid);

    let mut kappa = KappaCache::new(bounds);
    polylines = postprocess::concat(polylines);
    polylines = postprocess::fusion_curve(polylines, &mut kappa, params.max_width);
    polylines = postprocess::main_fusion(polylines, &mut kappa, params.max_width);
    polylines = postprocess::fusion_corners(polylines, &mut kappa, params.max_width);

    // Step 5 swaps position with steps 6/7 depending on `stop_at_min_width`
    // (spec §4.1.5 step 5, "honoring stop_at_min_width to choose whether
    // extension happens before or after thinning").
    if params.stop_at_min_width {
        polylines = postprocess::remove_too_thin_extrusion(polylines, params.min_width);
        polylines = postprocess::remove_too_thin_points(polylines, params.min_width);
        polylines = extend::extends_line(polylines, bounds);
    } else {
        polylines = extend::extends_line(polylines, bounds);
        polylines = postprocess::remove_too_thin_extrusion(polylines, params.min_width);
        polylines = postprocess::remove_too_thin_points(polylines, params.min_width);
    }

    polylines = postprocess::concatenate_with_crossing(polylines);
    polylines = postprocess::remove_too_short_polylines(polylines, params.max_width);
    polylines = overextrude::ensure_not_overextrude(polylines, bounds);
    polylines = grow::grow_to_nozzle_diameter(polylines, params.nozzle_diameter, params.max_width);
    polylines = taper::taper_ends(polylines, params);
    polylines = postprocess::remove_bits(polylines, params.nozzle_diameter);

    Ok(polylines)
}

/// Extracts variable-width centerline polylines from `surface` (spec
/// §4.1). `bounds` is an enclosing reference region used only for
/// endpoint extension and the contour-angle coefficient; pass `surface`
/// itself when no separate anchor region applies.
///
/// Returns an empty vector when `surface`'s simplified area is below
/// `min_width²` (too small to skeletonise at all — not an error). Returns
/// [`crate::SlicerError::VoronoiDegenerate`] if the induced skeleton area
/// ratio is outside `[1/1.1, 1.1]` even after the `+EPS_S`-offset retry
/// (spec §4.1 Failure semantics, §7).
pub fn medial_axis(surface: &ExPoly, bounds: &ExPoly, params: &MaxParams) -> crate::Result<Vec<ThickPolyline>> {
    let simplified = simplify::simplify(surface, bounds);

    let min_area = (params.min_width as f64).powi(2);
    if simplified.area() < min_area {
        log::trace!(
            "medial_axis: simplified area {:.1} below min_width^2 {:.1}, emitting nothing",
            simplified.area(),
            min_area
        );
        return Ok(Vec::new());
    }

    if let Some(circ) = circular::try_circular_fast_path(&simplified, params.min_width) {
        log::debug!("medial_axis: circular fast-path taken");
        return Ok(circ);
    }

    let first = run_pipeline(&simplified, bounds, params)?;
    let first_ratio = area_ratio(&first, bounds);
    if first.is_empty() || in_unit_band(first_ratio) {
        return Ok(first);
    }

    log::warn!(
        "medial_axis: skeleton area ratio {first_ratio:.4} outside [1/1.1, 1.1], retrying on +EPS_S offset input"
    );
    let offset_surface = offset(&[simplified.clone()], EPS_S, Join::Round)
        .into_iter()
        .next()
        .unwrap_or_else(|| simplified.clone());
    let retry = run_pipeline(&offset_surface, bounds, params)?;
    let retry_ratio = area_ratio(&retry, bounds);

    if in_unit_band(retry_ratio) {
        return Ok(retry);
    }
    if in_unit_band(first_ratio) {
        return Ok(first);
    }

    let best_ratio = if (retry_ratio - 1.0).abs() < (first_ratio - 1.0).abs() {
        retry_ratio
    } else {
        first_ratio
    };
    log::error!("medial_axis: skeleton still degenerate after retry, ratio {best_ratio:.4}");
    Err(crate::error::SlicerError::VoronoiDegenerate { ratio: best_ratio })
}

#[cfg(test)]
mod tests {
    use super::*;
    use slicer_geom::from_mm;
    use slicer_test_fixtures::{square, thin_sliver};

    fn params() -> MaxParams {
        MaxParams::new(from_mm(0.2), from_mm(0.6), from_mm(0.4), from_mm(0.2))
    }

    #[test]
    fn tiny_region_emits_nothing() {
        let tiny = square(0.01);
        let out = medial_axis(&tiny, &tiny, &params()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn thin_sliver_produces_a_polyline() {
        let sliver = thin_sliver(0.4, 20.0);
        let out = medial_axis(&sliver, &sliver, &params()).unwrap();
        assert!(!out.is_empty());
        for pl in &out {
            for &w in pl.width() {
                assert!(w as f64 <= from_mm(0.6) as f64 * 1.05 + 1.0);
            }
        }
    }

    #[test]
    fn square_centerline_widths_respect_max_width_bound() {
        let sq = square(20.0);
        let out = medial_axis(&sq, &sq, &params()).unwrap();
        for pl in &out {
            for &w in pl.width() {
                assert!(w as f64 <= from_mm(0.6) as f64 * 1.05 + 1.0);
            }
        }
    }
}
