//! §4.2.1 Onion-shell loop: PG's central orchestrator. Walks inward one
//! shell at a time, peeling off thin walls at the outermost shell and gap
//! candidates at every shell past it, until the island runs out or the
//! requested loop count (plus any overhang-driven growth) is reached.

use super::overhang;
use super::params::PerimeterParams;
use crate::clip::{difference, offset, offset2, Join};
use crate::collab::BridgeDetector;
use crate::medial_axis::{medial_axis, MaxParams};
use crate::types::{Loop, PerimeterRole, ThickPolyline};
use slicer_geom::{Coord, ExPoly};

const MITER: Join = Join::Miter(3.0);
/// Fudge subtracted from half-widths in the `offset2` neck-collapsing trick
/// so two offsets of the same nominal width don't re-touch bit-for-bit
/// (spec §4.2.1 literally writes `… − 1`); one scaled-`Coord` unit.
const NECK_FUDGE: Coord = 1;
/// Extra clearance added on the outward side of the gap-collection offset,
/// keeping the collected gap region from re-touching `next` (spec §4.2.1
/// names this "safety" without a value).
const GAP_SAFETY: Coord = 1;

/// What one call to [`run`] hands back to `perimeter::mod` before nesting,
/// gap-filling, and extra-perimeter induction are applied.
#[derive(Debug, Clone, Default)]
pub struct OnionResult {
    pub by_depth: Vec<Vec<Loop>>,
    pub thin_walls: Vec<ThickPolyline>,
    pub raw_gap: Vec<ExPoly>,
    pub infill_seed: Vec<ExPoly>,
    pub loop_count: usize,
}

fn good_spacing(i: usize, params: &PerimeterParams) -> Coord {
    if i == 1 {
        params.ext_spacing2()
    } else {
        params.spacing()
    }
}

fn compute_next(i: usize, last: &[ExPoly], params: &PerimeterParams) -> Vec<ExPoly> {
    if i == 0 {
        if params.detect_thin_walls {
            let half_width = params.ext_width() / 2;
            let half_min_spacing = params.ext_min_spacing() / 2;
            offset2(
                last,
                -(half_width + half_min_spacing - NECK_FUDGE),
                half_min_spacing - NECK_FUDGE,
                MITER,
            )
        } else {
            offset(last, -(params.ext_width() / 2), MITER)
        }
    } else {
        let spacing = good_spacing(i, params);
        if params.detect_thin_walls {
            let half_spacing = spacing / 2;
            let half_min_spacing = params.ext_min_spacing() / 2;
            offset2(
                last,
                -(half_spacing + half_min_spacing - NECK_FUDGE),
                half_min_spacing - NECK_FUDGE,
                MITER,
            )
        } else {
            offset(last, -spacing, MITER)
        }
    }
}

/// §4.2.1's thin-wall extraction at the outermost shell: `thin_zone = last
/// ∖ (next ⊕ ext_width/2)`, half-thinned and grown back to drop slivers,
/// then skeletonised by MAX with `last ∖ thin_zone` as the anchor bounds.
fn collect_thin_walls(
    last: &[ExPoly],
    next: &[ExPoly],
    params: &PerimeterParams,
    out: &mut Vec<ThickPolyline>,
) {
    let grown_next = offset(next, params.ext_width() / 2, MITER);
    let thin_zone = difference(last, &grown_next);
    if thin_zone.is_empty() {
        return;
    }
    let half = offset(&thin_zone, -(params.ext_width() / 4), MITER);
    let islands = offset(&half, params.ext_width() / 4, MITER);
    let anchor_region = difference(last, &thin_zone);

    let thin_params = MaxParams::new(
        params.thin_walls_min_width,
        params.ext_width(),
        params.nozzle_diameter,
        params.layer_height,
    );
    for ex in &islands {
        let anchor = anchor_region
            .iter()
            .find(|a| a.contains_point(ex.outer().points()[0]))
            .unwrap_or(ex);
        match medial_axis(ex, anchor, &thin_params) {
            Ok(polys) => out.extend(polys),
            Err(err) => log::warn!("perimeter: thin-wall medial_axis failed on one island: {err}"),
        }
    }
}

/// §4.2.1's gap collection at every internal shell: the annulus `last`
/// would still cover but `next` (grown back out by `good_spacing/2 +
/// safety`) no longer reaches.
fn collect_gap(last: &[ExPoly], next: &[ExPoly], good_spacing: Coord, out: &mut Vec<ExPoly>) {
    let inner = offset(last, -(good_spacing / 2), MITER);
    let outer = offset(next, good_spacing / 2 + GAP_SAFETY, MITER);
    out.extend(difference(&inner, &outer));
}

fn register_loops(
    depth: u32,
    next: &[ExPoly],
    lower_dilated: &[ExPoly],
    overhangs_enabled: bool,
) -> Vec<Loop> {
    let contour_role = if depth == 0 {
        PerimeterRole::ExternalPerimeter
    } else {
        PerimeterRole::Perimeter
    };
    let mut loops = Vec::new();
    for ex in next {
        let mut outer_loop = Loop::new_uniform(ex.outer().clone(), depth, true, contour_role);
        if overhangs_enabled && !lower_dilated.is_empty() {
            outer_loop = overhang::classify_loop_roles(outer_loop, lower_dilated);
        }
        loops.push(outer_loop);
        for hole in ex.holes() {
            let mut hole_loop = Loop::new_uniform(hole.clone(), depth, false, PerimeterRole::Perimeter);
            if overhangs_enabled && !lower_dilated.is_empty() {
                hole_loop = overhang::classify_loop_roles(hole_loop, lower_dilated);
            }
            loops.push(hole_loop);
        }
    }
    loops
}

/// Runs the onion-shell loop over one island from the outside in (spec
/// §4.2.1). `params.lower_slices`/`upper_slices` drive overhang growth past
/// the requested perimeter count; extra-perimeter induction (§4.2.5) and
/// the final MAX pass over collected gaps (§4.2.4) are the caller's job —
/// see [`crate::perimeter::generate_perimeters`].
pub fn run(island: &ExPoly, params: &PerimeterParams, bridge_detector: &dyn BridgeDetector) -> OnionResult {
    let lower_dilated = overhang::dilated_lower_slices(&params.lower_slices, params.nozzle_diameter);
    let requested = params.perimeters as usize;

    let mut by_depth = Vec::new();
    let mut thin_walls = Vec::new();
    let mut raw_gap = Vec::new();
    let mut last = vec![island.clone()];
    let mut loop_count = 0usize;
    let mut i = 0usize;

    loop {
        let next = compute_next(i, &last, params);

        if i == 0 && params.detect_thin_walls {
            collect_thin_walls(&last, &next, params, &mut thin_walls);
        }
        if i >= 1 && params.gap_fill {
            collect_gap(&last, &next, good_spacing(i, params), &mut raw_gap);
        }

        if next.is_empty() {
            loop_count = i.saturating_sub(1);
            break;
        }

        by_depth.push(register_loops(i as u32, &next, &lower_dilated, params.overhangs));
        loop_count = i;
        last = next;

        let grow_for_overhang = params.overhangs && {
            let (residual, _angle) = overhang::unsupported_after_bridging(
                &last,
                &lower_dilated,
                params.spacing(),
                bridge_detector,
                None,
            );
            !residual.is_empty()
        };
        if i > requested && !grow_for_overhang {
            break;
        }
        i += 1;
    }

    let inset = params.external_infill_margin;
    let min_infill_spacing = params.spacing();
    let infill_seed = offset2(
        &last,
        -(inset + min_infill_spacing / 2) + params.infill_overlap,
        min_infill_spacing / 2,
        MITER,
    );

    OnionResult { by_depth, thin_walls, raw_gap, infill_seed, loop_count }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slicer_geom::from_mm;
    use slicer_test_fixtures::square;

    struct NeverBridges;
    impl BridgeDetector for NeverBridges {
        fn detect_angle(&self, _u: &[ExPoly], _l: &[ExPoly], _s: i64, _p: Option<f64>) -> (f64, Vec<ExPoly>) {
            (0.0, Vec::new())
        }
    }

    fn flow(width_mm: f64) -> crate::config::Flow {
        crate::config::Flow::new_from_spacing(from_mm(width_mm), from_mm(0.4), from_mm(0.2), false)
    }

    #[test]
    fn simple_square_produces_requested_shells() {
        let params = PerimeterParams::new(3, flow(0.45), flow(0.45));
        let result = run(&square(20.0), &params, &NeverBridges);
        assert_eq!(result.by_depth.len(), result.loop_count + 1);
        assert!(result.by_depth.len() >= 1);
        assert!(!result.infill_seed.is_empty());
    }

    #[test]
    fn tiny_island_runs_out_of_shells_quickly() {
        let params = PerimeterParams::new(5, flow(0.45), flow(0.45));
        let result = run(&square(0.3), &params, &NeverBridges);
        assert!(result.by_depth.len() < 5);
    }

    #[test]
    fn infill_overlap_grows_the_infill_seed() {
        let mut params = PerimeterParams::new(3, flow(0.45), flow(0.45));
        let without_overlap = run(&square(20.0), &params, &NeverBridges).infill_seed;

        params.infill_overlap = from_mm(0.1);
        let with_overlap = run(&square(20.0), &params, &NeverBridges).infill_seed;

        let area_without: f64 = without_overlap.iter().map(|ex| ex.area()).sum();
        let area_with: f64 = with_overlap.iter().map(|ex| ex.area()).sum();
        assert!(area_with > area_without);
    }
}
