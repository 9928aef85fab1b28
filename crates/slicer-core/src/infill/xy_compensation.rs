//! §4.3.5 Layer XY compensation.

use crate::clip::{difference, intersection, offset, union, Join};
use slicer_geom::{Coord, ExPoly, Point, Polygon};

/// The three steady-state compensation deltas plus the first-layer
/// (elephant-foot) extra delta (spec §4.3.5).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XyCompensation {
    pub outer: Coord,
    pub inner: Coord,
    pub hole: Coord,
    pub first_layer_extra: Coord,
}

/// Turning-angle convexity test at one vertex, tolerant to 5.7° (spec
/// §4.3.5, "convex within a tolerance of 5.7°"); `a, v, b` are consecutive
/// ring vertices.
fn is_convex_vertex(a: Point, v: Point, b: Point) -> bool {
    const TOLERANCE_RAD: f64 = 5.7 * std::f64::consts::PI / 180.0;
    let (d1x, d1y) = ((v.x - a.x) as f64, (v.y - a.y) as f64);
    let (d2x, d2y) = ((b.x - v.x) as f64, (b.y - v.y) as f64);
    let cross = d1x * d2y - d1y * d2x;
    let len1 = (d1x * d1x + d1y * d1y).sqrt();
    let len2 = (d2x * d2x + d2y * d2y).sqrt();
    if len1 < 1e-9 || len2 < 1e-9 {
        return true;
    }
    let sin_turn = cross / (len1 * len2);
    sin_turn >= -TOLERANCE_RAD.sin()
}

/// Whether every vertex of `hole` turns convex (CCW interior) within
/// tolerance; area below `min_area` softens the classification toward
/// "convex" per spec §4.3.5 ("area thresholds soften the convex/concave
/// classification").
fn hole_is_convex(hole: &Polygon, min_area: f64) -> bool {
    if hole.area() < min_area {
        return true;
    }
    let pts = hole.points();
    let n = pts.len();
    (0..n).all(|i| is_convex_vertex(pts[(i + n - 1) % n], pts[i], pts[(i + 1) % n]))
}

/// Grows only the convex holes of `ex` by `delta_hole` (positive shrinks a
/// hole, since growing filled area around a hole narrows it); concave
/// holes are left as-is.
fn grow_convex_holes(ex: &ExPoly, delta_hole: Coord, softening_min_area: f64) -> ExPoly {
    if delta_hole == 0 {
        return ex.clone();
    }
    let mut holes = Vec::with_capacity(ex.holes().len());
    for hole in ex.holes() {
        if hole_is_convex(hole, softening_min_area) {
            let hole_ex = ExPoly::from_outer(hole.oriented(slicer_geom::Orientation::CounterClockwise));
            let grown = offset(std::slice::from_ref(&hole_ex), -delta_hole, Join::Square);
            if let Some(g) = grown.into_iter().next() {
                holes.push(g.outer().clone());
                continue;
            }
        }
        holes.push(hole.clone());
    }
    ExPoly::new(ex.outer().clone(), holes)
}

/// Applies one region's XY compensation to its merged slice for a single
/// layer (spec §4.3.5). `is_first_layer` gates the elephant-foot extra
/// delta; `min_convex_hole_area` is the area threshold below which a hole
/// is treated as convex regardless of its actual turning angles.
pub fn compensate_single_region(
    slice: &[ExPoly],
    comp: &XyCompensation,
    is_first_layer: bool,
    min_convex_hole_area: f64,
) -> Vec<ExPoly> {
    let mut current = slice.to_vec();

    let grow = comp.outer.max(0);
    if grow > 0 {
        current = offset(&current, grow, Join::Miter(3.0));
    }

    if is_first_layer && comp.first_layer_extra > 0 {
        current = offset(&current, comp.first_layer_extra, Join::Round);
    }

    current = current.iter().map(|ex| grow_convex_holes(ex, comp.hole, min_convex_hole_area)).collect();

    let shrink = comp.inner.min(0);
    if shrink < 0 {
        current = offset(&current, shrink, Join::Miter(3.0));
    }

    current
}

/// Multi-region XY compensation: grows each region against a shared merged
/// polygon (for hole-growing consistency) before a shared trimming pass
/// with negative deltas (spec §4.3.5).
pub fn compensate_multi_region(
    regions: &[Vec<ExPoly>],
    comps: &[XyCompensation],
    is_first_layer: bool,
    min_convex_hole_area: f64,
) -> Vec<Vec<ExPoly>> {
    assert_eq!(regions.len(), comps.len());
    let merged = regions.iter().fold(Vec::<ExPoly>::new(), |acc, r| union(&acc, r));

    let mut grown: Vec<Vec<ExPoly>> = Vec::with_capacity(regions.len());
    for (region, comp) in regions.iter().zip(comps) {
        let with_holes: Vec<ExPoly> = region.iter().map(|ex| grow_convex_holes(ex, comp.hole, min_convex_hole_area)).collect();
        let g = if comp.outer > 0 {
            intersection(&offset(&with_holes, comp.outer, Join::Miter(3.0)), &merged)
        } else {
            with_holes
        };
        let g = if is_first_layer && comp.first_layer_extra > 0 {
            offset(&g, comp.first_layer_extra, Join::Round)
        } else {
            g
        };
        grown.push(g);
    }

    for (region, comp) in grown.iter_mut().zip(comps) {
        let shrink = comp.inner.min(0);
        if shrink < 0 {
            *region = offset(region, shrink, Join::Miter(3.0));
        }
    }

    // Shared trim: a region's own shrink can still leave it overlapping a
    // neighbor that grew into the same area upstream; drop that overlap
    // against every other region's post-shrink shape (spec §4.3.5's
    // `_shrink_contour_holes` pass).
    let shrunk = grown.clone();
    for (i, region) in grown.iter_mut().enumerate() {
        let others: Vec<ExPoly> =
            shrunk.iter().enumerate().filter(|(j, _)| *j != i).flat_map(|(_, r)| r.iter().cloned()).collect();
        *region = shrink_contour_holes(region, &others);
    }
    grown
}

/// Drops the part of a multi-region trim that would otherwise bleed into a
/// neighboring region, used by [`compensate_multi_region`]'s shared-trim
/// step (the spec's `_shrink_contour_holes`).
pub fn shrink_contour_holes(region: &[ExPoly], others: &[ExPoly]) -> Vec<ExPoly> {
    difference(region, others)
}

#[cfg(test)]
mod tests {
    use super::*;
    use slicer_geom::from_mm;
    use slicer_test_fixtures::square;

    #[test]
    fn zero_compensation_is_identity() {
        let slice = vec![square(20.0)];
        let comp = XyCompensation { outer: 0, inner: 0, hole: 0, first_layer_extra: 0 };
        let out = compensate_single_region(&slice, &comp, false, 0.0);
        assert_eq!(out.len(), 1);
        assert!((out[0].area() - slice[0].area()).abs() < 1.0);
    }

    #[test]
    fn positive_outer_delta_grows_the_slice() {
        let slice = vec![square(20.0)];
        let comp = XyCompensation { outer: from_mm(0.1), inner: 0, hole: 0, first_layer_extra: 0 };
        let out = compensate_single_region(&slice, &comp, false, 0.0);
        assert!(out[0].area() > slice[0].area());
    }

    /// Two regions that grow into the same shared area must not still
    /// overlap after `compensate_multi_region`'s final trim.
    #[test]
    fn multi_region_final_trim_removes_cross_region_overlap() {
        use slicer_geom::{Point, Polygon};

        let shift = |poly: &Polygon, dx_mm: f64| -> Polygon {
            Polygon::new(poly.points().iter().map(|p| Point::new(p.x + from_mm(dx_mm), p.y)).collect()).unwrap()
        };
        let left = square(10.0);
        let right = ExPoly::from_outer(shift(square(10.0).outer(), 10.0));

        let regions = vec![vec![left], vec![right]];
        let comps = vec![
            XyCompensation { outer: from_mm(1.0), inner: 0, hole: 0, first_layer_extra: 0 },
            XyCompensation { outer: from_mm(1.0), inner: 0, hole: 0, first_layer_extra: 0 },
        ];
        let out = compensate_multi_region(&regions, &comps, false, 0.0);

        let overlap = intersection(&out[0], &out[1]);
        let overlap_area: f64 = overlap.iter().map(|ex| ex.area()).sum();
        assert!(overlap_area < 1.0, "regions still overlap after shared trim: {overlap_area}");
    }
}
