use super::convert::run_overlay;
use i_overlay::core::overlay_rule::OverlayRule;
use slicer_geom::ExPoly;

/// The four set operations `CLIP` exposes (spec §2.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    Union,
    Intersection,
    Difference,
    Xor,
}

impl From<BooleanOp> for OverlayRule {
    fn from(op: BooleanOp) -> Self {
        match op {
            BooleanOp::Union => OverlayRule::Union,
            BooleanOp::Intersection => OverlayRule::Intersect,
            BooleanOp::Difference => OverlayRule::Difference,
            BooleanOp::Xor => OverlayRule::Xor,
        }
    }
}

/// Runs `op` between `subject` and `clip`, the one entry point every other
/// boolean helper in this module forwards to.
pub fn boolean_op(subject: &[ExPoly], clip: &[ExPoly], op: BooleanOp) -> Vec<ExPoly> {
    if subject.is_empty() && matches!(op, BooleanOp::Difference | BooleanOp::Intersection) {
        return Vec::new();
    }
    run_overlay(subject, clip, op.into())
}

pub fn union(subject: &[ExPoly], clip: &[ExPoly]) -> Vec<ExPoly> {
    boolean_op(subject, clip, BooleanOp::Union)
}

pub fn intersection(subject: &[ExPoly], clip: &[ExPoly]) -> Vec<ExPoly> {
    boolean_op(subject, clip, BooleanOp::Intersection)
}

pub fn difference(subject: &[ExPoly], clip: &[ExPoly]) -> Vec<ExPoly> {
    boolean_op(subject, clip, BooleanOp::Difference)
}

pub fn xor(subject: &[ExPoly], clip: &[ExPoly]) -> Vec<ExPoly> {
    boolean_op(subject, clip, BooleanOp::Xor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use slicer_test_fixtures::square;

    #[test]
    fn union_of_disjoint_squares_has_two_pieces() {
        let a = square(10.0);
        let mut b_poly = square(10.0);
        // translate b off to the side so the squares don't touch
        let shifted = slicer_geom::Polygon::new(
            b_poly
                .outer()
                .points()
                .iter()
                .map(|p| slicer_geom::Point::new(p.x + slicer_geom::from_mm(20.0), p.y))
                .collect(),
        )
        .unwrap();
        b_poly = slicer_geom::ExPoly::from_outer(shifted);
        let out = union(&[a], &[b_poly]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn intersection_of_overlapping_squares_is_nonempty() {
        let a = square(10.0);
        let b = square(10.0);
        let out = intersection(&[a], &[b]);
        assert!(!out.is_empty());
        assert!((out[0].area() - 100.0).abs() < 1e-3);
    }

    #[test]
    fn difference_of_identical_squares_is_empty() {
        let a = square(10.0);
        let b = square(10.0);
        let out = difference(&[a], &[b]);
        assert!(out.is_empty());
    }
}
