//! §4.3.4 Dense-region tagging.

use crate::clip::{difference, intersection, offset, Join};
use crate::config::DenseInfillAlgorithm;
use crate::types::{Surface, SurfaceTag};
use slicer_geom::{Coord, ExPoly};

/// Bisects an inward-offset factor so the dense sub-region covers
/// `target` while staying as small as possible (spec §4.3.4,
/// `dense_fill_fit_to_size`, used by `AutoNotFull` / small-area
/// `AutoOrEnlarged`).
fn dense_fill_fit_to_size(sparse: &ExPoly, target: &[ExPoly], max_margin: Coord) -> Vec<ExPoly> {
    let target_area: f64 = target.iter().map(ExPoly::area).sum();
    if target_area <= 0.0 {
        return Vec::new();
    }

    let mut lo = 0i64;
    let mut hi = max_margin.max(1);
    let mut best = offset(std::slice::from_ref(sparse), hi, Join::Miter(3.0));
    for _ in 0..24 {
        let mid = (lo + hi) / 2;
        if mid == lo {
            break;
        }
        let grown = offset(std::slice::from_ref(sparse), mid, Join::Miter(3.0));
        let covers = intersection(&grown, target).iter().map(ExPoly::area).sum::<f64>() >= target_area * 0.999;
        if covers {
            best = grown;
            hi = mid;
        } else {
            lo = mid;
        }
    }
    best
}

/// Enlarges `sparse` by the external-infill margin, used by `Enlarged` and
/// large-area `AutoOrEnlarged`.
fn dense_fill_enlarge(sparse: &ExPoly, margin: Coord) -> Vec<ExPoly> {
    offset(std::slice::from_ref(sparse), margin, Join::Miter(3.0))
}

/// Morphological cleanup ahead of dense-region tagging: erode then dilate
/// the solid-above intersection by `infill_width` (spec §4.3.4).
fn clean_intersection(sparse: &ExPoly, solid_above: &[ExPoly], infill_width: Coord) -> Vec<ExPoly> {
    let raw = intersection(std::slice::from_ref(sparse), solid_above);
    let eroded = offset(&raw, -infill_width, Join::Square);
    offset(&eroded, infill_width, Join::Square)
}

/// Tags the sub-region of `sparse` directly under a solid surface with
/// `max_solid_above = 1`, splitting it out as new `Surface` records (spec
/// §4.3.4). `k` is this surface's depth in the overlap chain, used for
/// `priority = k + 1`. Returns `(remainder, dense)`: `remainder` is what's
/// left of `sparse` after the dense sub-region is carved out (empty if it
/// covers the whole surface), `dense` the newly tagged pieces.
pub fn tag_dense_region(
    sparse: &Surface,
    solid_above: &[ExPoly],
    algorithm: DenseInfillAlgorithm,
    external_infill_margin: Coord,
    infill_width: Coord,
    region_area_is_large: bool,
    k: u32,
) -> (Vec<Surface>, Vec<Surface>) {
    let cleaned = clean_intersection(&sparse.expoly, solid_above, infill_width);
    if cleaned.is_empty() {
        return (vec![sparse.clone()], Vec::new());
    }

    let dense_region: Vec<ExPoly> = match algorithm {
        DenseInfillAlgorithm::Automatic => cleaned.clone(),
        DenseInfillAlgorithm::Enlarged => {
            cleaned.iter().flat_map(|ex| dense_fill_enlarge(ex, external_infill_margin)).collect()
        }
        DenseInfillAlgorithm::AutoNotFull => {
            cleaned.iter().flat_map(|ex| dense_fill_fit_to_size(ex, &cleaned, external_infill_margin)).collect()
        }
        DenseInfillAlgorithm::AutoOrEnlarged => {
            if region_area_is_large {
                cleaned.iter().flat_map(|ex| dense_fill_enlarge(ex, external_infill_margin)).collect()
            } else {
                cleaned.iter().flat_map(|ex| dense_fill_fit_to_size(ex, &cleaned, external_infill_margin)).collect()
            }
        }
    };

    let dense_clipped = intersection(&dense_region, std::slice::from_ref(&sparse.expoly));
    if dense_clipped.is_empty() {
        return (vec![sparse.clone()], Vec::new());
    }

    let remainder = difference(std::slice::from_ref(&sparse.expoly), &dense_clipped);

    let dense_surfaces = dense_clipped
        .into_iter()
        .map(|ex| {
            let mut s = sparse.clone();
            s.expoly = ex;
            s.tag = SurfaceTag::internal_sparse();
            s.max_solid_above = Some(1);
            s.priority = k + 1;
            s
        })
        .collect();

    let remainder_surfaces = remainder
        .into_iter()
        .map(|ex| {
            let mut s = sparse.clone();
            s.expoly = ex;
            s
        })
        .collect();

    (remainder_surfaces, dense_surfaces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use slicer_geom::from_mm;
    use slicer_test_fixtures::square;

    #[test]
    fn no_solid_above_leaves_surface_untouched() {
        let sparse = Surface::new(square(20.0), SurfaceTag::internal_sparse());
        let (remainder, dense) =
            tag_dense_region(&sparse, &[], DenseInfillAlgorithm::Automatic, from_mm(1.0), from_mm(0.4), false, 0);
        assert_eq!(remainder.len(), 1);
        assert!(dense.is_empty());
    }

    #[test]
    fn solid_above_tags_a_dense_sub_region() {
        let sparse = Surface::new(square(20.0), SurfaceTag::internal_sparse());
        let solid_above = vec![square(10.0)];
        let (_remainder, dense) = tag_dense_region(
            &sparse,
            &solid_above,
            DenseInfillAlgorithm::Automatic,
            from_mm(1.0),
            from_mm(0.4),
            false,
            0,
        );
        assert!(!dense.is_empty());
        assert_eq!(dense[0].max_solid_above, Some(1));
        assert_eq!(dense[0].priority, 1);
    }
}
