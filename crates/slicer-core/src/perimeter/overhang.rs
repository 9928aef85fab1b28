//! §4.2.3 Overhang classification.

use crate::clip::{difference, intersection, offset, union, Join};
use crate::collab::BridgeDetector;
use crate::types::{Loop, PerimeterRole};
use slicer_geom::{Coord, ExPoly, Point};

/// Dilates every lower-slice island outward by `nozzle_diameter / 2`,
/// giving `_lower` (spec §4.2.3).
pub fn dilated_lower_slices(lower_slices: &[ExPoly], nozzle_diameter: Coord) -> Vec<ExPoly> {
    if lower_slices.is_empty() {
        return Vec::new();
    }
    offset(lower_slices, nozzle_diameter / 2, Join::Round)
}

/// Whether any part of `next` (the current onion shell) falls outside
/// `_lower`, i.e. this island has unsupported area that would need an
/// overhang perimeter.
pub fn has_overhang(next: &[ExPoly], lower_dilated: &[ExPoly]) -> bool {
    if lower_dilated.is_empty() {
        return !next.is_empty();
    }
    !difference(next, lower_dilated).is_empty()
}

/// Runs the bridge-direction search over the unsupported region and
/// subtracts its bridgeable area from the no-support region, returning
/// the residual unsupported area extra-perimeter loops would still need
/// to cover, along with the chosen bridge angle (if any coverage was
/// found).
pub fn unsupported_after_bridging(
    island: &[ExPoly],
    lower_dilated: &[ExPoly],
    spacing: Coord,
    detector: &dyn BridgeDetector,
    preferred_angle: Option<f64>,
) -> (Vec<ExPoly>, Option<f64>) {
    let no_support = difference(island, lower_dilated);
    if no_support.is_empty() {
        return (no_support, None);
    }
    let (angle, coverage) = detector.detect_angle(&no_support, lower_dilated, spacing, preferred_angle);
    if coverage.is_empty() {
        return (no_support, None);
    }
    (difference(&no_support, &coverage), Some(angle))
}

/// Splits every edge of `loop_` by membership in `lower_dilated`: points
/// whose containing segment lies inside get `Perimeter`, the rest get
/// `OverhangPerimeter` (spec §4.2.3, Property 7 §8.1).
pub fn classify_loop_roles(mut loop_: Loop, lower_dilated: &[ExPoly]) -> Loop {
    if lower_dilated.is_empty() {
        return loop_;
    }
    let pts = loop_.polygon.points().to_vec();
    let n = pts.len();
    let mut any_over = false;
    let mut roles = Vec::with_capacity(n);
    for i in 0..n {
        let a = pts[i];
        let b = pts[(i + 1) % n];
        let mid = Point::new((a.x + b.x) / 2, (a.y + b.y) / 2);
        let supported = lower_dilated.iter().any(|ex| ex.contains_point(mid));
        if supported {
            roles.push(PerimeterRole::Perimeter);
        } else {
            roles.push(PerimeterRole::OverhangPerimeter);
            any_over = true;
        }
    }
    loop_.roles = roles;
    loop_.has_overhang = any_over;
    loop_
}

/// Splits a closed path's polygon into supported/unsupported sub-paths via
/// `intersection`/`difference` against `_lower`, matching the spec's
/// `role=Perimeter` / `role=OverhangPerimeter` split for generated loops
/// that aren't onion-shell contours (e.g. thin-wall or gap-fill paths
/// routed through overhang classification upstream of extrusion).
pub fn split_by_support(path: &ExPoly, lower_dilated: &[ExPoly]) -> (Vec<ExPoly>, Vec<ExPoly>) {
    if lower_dilated.is_empty() {
        return (Vec::new(), vec![path.clone()]);
    }
    let supported = intersection(&[path.clone()], lower_dilated);
    let unsupported = difference(&[path.clone()], lower_dilated);
    (supported, unsupported)
}

/// Unions `polys` into one coverage set, used where overhang handling
/// needs to treat several islands' no-support regions as one.
pub fn union_all(polys: &[ExPoly]) -> Vec<ExPoly> {
    polys
        .iter()
        .fold(Vec::<ExPoly>::new(), |acc, p| union(&acc, std::slice::from_ref(p)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use slicer_test_fixtures::square;

    struct NeverBridges;
    impl BridgeDetector for NeverBridges {
        fn detect_angle(&self, _u: &[ExPoly], _l: &[ExPoly], _s: i64, _p: Option<f64>) -> (f64, Vec<ExPoly>) {
            (0.0, Vec::new())
        }
    }

    #[test]
    fn no_lower_slices_means_everything_overhangs() {
        let island = vec![square(20.0)];
        assert!(has_overhang(&island, &[]));
    }

    #[test]
    fn fully_supported_has_no_overhang() {
        let island = vec![square(20.0)];
        let lower = vec![square(20.0)];
        assert!(!has_overhang(&island, &lower));
    }

    #[test]
    fn unsupported_after_bridging_falls_back_to_no_support_when_detector_finds_nothing() {
        let island = vec![square(20.0)];
        let (residual, angle) = unsupported_after_bridging(&island, &[], 1000, &NeverBridges, None);
        assert!(!residual.is_empty());
        assert!(angle.is_none());
    }
}
