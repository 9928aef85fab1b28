//! PG: perimeter generation (spec §4.2). [`generate_perimeters`] is the
//! single entry point; it drives the onion-shell loop, loop nesting,
//! gap-fill skeletonisation, and extra-perimeter induction in that order.

mod extra;
mod gap;
mod nesting;
mod onion;
mod overhang;
mod params;

pub use overhang::{classify_loop_roles, dilated_lower_slices, has_overhang, split_by_support, union_all};
pub use params::{PerimeterOutput, PerimeterParams};

use crate::collab::BridgeDetector;
use slicer_geom::ExPoly;

/// Upper bound on how many times [`extra::induce_extra_perimeters`] may
/// grow a surface's loop count; the spec only says "saturates".
const MAX_EXTRA_PERIMETERS: u32 = 5;

/// Runs perimeter generation end to end for one island (spec §4.2 Inputs /
/// Output): the onion-shell loop (§4.2.1), loop nesting (§4.2.2) — overhang
/// role classification (§4.2.3) happens per-loop inside the onion loop,
/// where the dilated lower slices are already in scope — gap-fill
/// skeletonisation (§4.2.4), and extra-perimeter induction (§4.2.5).
pub fn generate_perimeters(
    island: &ExPoly,
    params: &PerimeterParams,
    bridge_detector: &dyn BridgeDetector,
) -> PerimeterOutput {
    let onion_result = onion::run(island, params, bridge_detector);

    let gap_fill = if params.gap_fill {
        gap::fill_gaps(
            &onion_result.raw_gap,
            params.perimeter_flow.width,
            params.spacing(),
            params.nozzle_diameter,
            params.layer_height,
        )
    } else {
        Vec::new()
    };

    let contours = nesting::nest_loops(onion_result.by_depth);

    let extra_perimeters = if params.extra_perimeters && !params.upper_slices.is_empty() {
        contours
            .iter()
            .map(|root| {
                let shell = ExPoly::from_outer(root.polygon.clone());
                extra::induce_extra_perimeters(
                    &shell,
                    &params.upper_slices,
                    params.spacing(),
                    MAX_EXTRA_PERIMETERS,
                )
            })
            .max()
            .unwrap_or(0)
    } else {
        0
    };

    PerimeterOutput {
        contours,
        thin_walls: onion_result.thin_walls,
        gap_fill,
        infill_seed: onion_result.infill_seed,
        extra_perimeters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Flow;
    use slicer_geom::from_mm;
    use slicer_test_fixtures::square_with_square_hole;

    struct NeverBridges;
    impl BridgeDetector for NeverBridges {
        fn detect_angle(&self, _u: &[ExPoly], _l: &[ExPoly], _s: i64, _p: Option<f64>) -> (f64, Vec<ExPoly>) {
            (0.0, Vec::new())
        }
    }

    fn flow(width_mm: f64) -> Flow {
        Flow::new_from_spacing(from_mm(width_mm), from_mm(0.4), from_mm(0.2), false)
    }

    #[test]
    fn square_with_hole_nests_and_seeds_infill() {
        let island = square_with_square_hole(20.0, 8.0);
        let params = PerimeterParams::new(3, flow(0.45), flow(0.45));
        let out = generate_perimeters(&island, &params, &NeverBridges);
        assert!(!out.contours.is_empty());
        assert_eq!(out.extra_perimeters, 0);
    }
}
