//! Conversions between [`slicer_geom`] types and `i_overlay`'s path/shape
//! representation, mirroring the reference geometry workspace's own
//! `bool_ops::i_overlay_integration::convert` module.

use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay::ShapeType;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::f64::overlay::F64Overlay;
use i_overlay::i_float::f64_point::F64Point;
use slicer_geom::{ExPoly, Point, Polygon};

/// `i_overlay` operates in `f64`; our coordinates already live on a
/// `SCALE`-unit integer grid that fits comfortably inside an `f64`
/// mantissa for any realistic print volume, so the conversion loses no
/// precision the overlay engine itself would preserve.
pub(super) fn ring_to_path(ring: &Polygon) -> Vec<F64Point> {
    ring.points()
        .iter()
        .map(|p| F64Point::new(p.x as f64, p.y as f64))
        .collect()
}

pub(super) fn expoly_paths(ex: &ExPoly) -> Vec<Vec<F64Point>> {
    ex.rings().map(ring_to_path).collect()
}

fn path_to_polygon(path: &[F64Point]) -> Option<Polygon> {
    let pts = path
        .iter()
        .map(|p| Point::new(p.x.round() as i64, p.y.round() as i64))
        .collect::<Vec<_>>();
    Polygon::new(pts).ok()
}

/// Converts `i_overlay`'s `shapes` (each shape a `Vec` of rings, outer
/// first) back into [`ExPoly`]s, dropping any ring that degenerated to
/// fewer than 3 vertices after integer rounding.
pub(super) fn shapes_to_expolys(shapes: Vec<Vec<Vec<F64Point>>>) -> Vec<ExPoly> {
    let mut out = Vec::with_capacity(shapes.len());
    for shape in shapes {
        let mut rings = shape.into_iter().filter_map(|path| path_to_polygon(&path));
        let Some(outer) = rings.next() else { continue };
        let holes = rings.collect::<Vec<_>>();
        out.push(ExPoly::new(outer, holes));
    }
    out
}

/// Runs one overlay `rule` between `subject` and `clip` expolygon sets.
pub(super) fn run_overlay(subject: &[ExPoly], clip: &[ExPoly], rule: OverlayRule) -> Vec<ExPoly> {
    let mut overlay = F64Overlay::new();
    for ex in subject {
        for path in expoly_paths(ex) {
            overlay.add_path(path, ShapeType::Subject);
        }
    }
    for ex in clip {
        for path in expoly_paths(ex) {
            overlay.add_path(path, ShapeType::Clip);
        }
    }
    let graph = overlay.into_graph(FillRule::EvenOdd);
    let shapes = graph.extract_shapes(rule);
    shapes_to_expolys(shapes)
}
