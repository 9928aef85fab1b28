//! §4.3.1 Top/bottom detection.

use crate::clip::{difference, intersection, offset, offset2, union, Join};
use crate::types::{Surface, SurfaceTag};
use slicer_geom::{Coord, ExPoly};

/// Classifies one layer/region's slices into top, bottom, and internal
/// surfaces (spec §4.3.1).
///
/// `bridge_over_void` mirrors the "raft layers > 0, or generally when
/// bridge-over-void is allowed" clause: when true and there is no lower
/// layer, unsupported bottom area is tagged `Bottom|Bridge` instead of
/// plain `Bottom`.
pub fn detect_top_bottom(
    slices: &[ExPoly],
    upper_slices: &[ExPoly],
    lower_slices: &[ExPoly],
    ext_perim_width: Coord,
    bridge_over_void: bool,
) -> Vec<Surface> {
    let raw_top = difference(slices, upper_slices);
    let sliver_offset = (ext_perim_width / 10).max(1);
    let top = offset2(&raw_top, sliver_offset, -sliver_offset, Join::Square);

    let raw_bottom = difference(slices, lower_slices);
    let no_lower_layer = lower_slices.is_empty();

    // top wins where top and bottom regions overlap.
    let bottom = difference(&raw_bottom, &top);
    let covered = union(&top, &bottom);
    let internal = difference(slices, &covered);

    let mut out = Vec::new();
    for ex in top {
        out.push(Surface::new(ex, SurfaceTag::top()));
    }
    let bottom_tag = if no_lower_layer && bridge_over_void {
        SurfaceTag::bottom_bridge()
    } else {
        SurfaceTag::bottom()
    };
    for ex in bottom {
        out.push(Surface::new(ex, bottom_tag));
    }
    for ex in internal {
        out.push(Surface::new(ex, SurfaceTag::internal_sparse()));
    }
    out
}

/// The overlap that top/bottom detection assigns to `Top` when it runs,
/// exposed separately for callers that need it (e.g. interface-shell
/// bookkeeping).
pub fn top_bottom_overlap(slices: &[ExPoly], upper_slices: &[ExPoly], lower_slices: &[ExPoly]) -> Vec<ExPoly> {
    let top = difference(slices, upper_slices);
    let bottom = difference(slices, lower_slices);
    intersection(&top, &bottom)
}

/// Thin-wall outward dilation used ahead of `detect_top_bottom` when a
/// region's external perimeter alone would otherwise undercount top area
/// (spec §4.3.1, `offset = ext_perim_width/10`).
pub fn dilate_sliver_collapse(region: &[ExPoly], ext_perim_width: Coord) -> Vec<ExPoly> {
    let d = (ext_perim_width / 10).max(1);
    offset(region, d, Join::Square)
}

#[cfg(test)]
mod tests {
    use super::*;
    use slicer_geom::from_mm;
    use slicer_test_fixtures::square;

    #[test]
    fn isolated_layer_is_entirely_top_and_bottom() {
        let slices = vec![square(20.0)];
        let surfaces = detect_top_bottom(&slices, &[], &[], from_mm(0.45), false);
        assert!(surfaces.iter().any(|s| s.tag.position == crate::types::Position::Top));
    }

    #[test]
    fn fully_sandwiched_layer_is_internal() {
        let slices = vec![square(20.0)];
        let neighbor = vec![square(20.0)];
        let surfaces = detect_top_bottom(&slices, &neighbor, &neighbor, from_mm(0.45), false);
        assert!(surfaces
            .iter()
            .all(|s| s.tag.position == crate::types::Position::Internal));
    }
}
