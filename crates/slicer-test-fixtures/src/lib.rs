//! Canonical `ExPoly`/`Polygon` literals shared by `slicer-core`'s unit and
//! integration tests, so individual tests don't hand-roll the same handful of
//! shapes over and over.

use slicer_geom::{from_mm, ExPoly, Point, Polygon};

fn rect(w_mm: f64, h_mm: f64) -> Polygon {
    let w = from_mm(w_mm);
    let h = from_mm(h_mm);
    Polygon::new(vec![
        Point::new(0, 0),
        Point::new(w, 0),
        Point::new(w, h),
        Point::new(0, h),
    ])
    .expect("fixture rectangles are always valid")
}

/// An axis-aligned square of side `side_mm`, lower-left corner at the origin.
pub fn square(side_mm: f64) -> ExPoly {
    ExPoly::from_outer(rect(side_mm, side_mm))
}

/// An axis-aligned rectangle, lower-left corner at the origin.
pub fn rectangle(w_mm: f64, h_mm: f64) -> ExPoly {
    ExPoly::from_outer(rect(w_mm, h_mm))
}

/// A `outer_mm` square with a centered `hole_mm` square hole.
pub fn square_with_square_hole(outer_mm: f64, hole_mm: f64) -> ExPoly {
    let margin = (outer_mm - hole_mm) / 2.0;
    let hole = rect(hole_mm, hole_mm);
    let hole = Polygon::new(
        hole.points()
            .iter()
            .map(|p| Point::new(p.x + from_mm(margin), p.y + from_mm(margin)))
            .collect(),
    )
    .unwrap();
    ExPoly::new(rect(outer_mm, outer_mm), vec![hole])
}

/// Two `side_mm` squares inside a `boundary_mm` square, separated on the X
/// axis by a `gap_mm` gap, used to exercise gap-fill detection (scenario S4).
pub fn two_squares_with_gap(boundary_mm: f64, side_mm: f64, gap_mm: f64) -> (ExPoly, ExPoly, ExPoly) {
    let boundary = square(boundary_mm);
    let cy = (boundary_mm - side_mm) / 2.0;
    let left_x = (boundary_mm - 2.0 * side_mm - gap_mm) / 2.0;
    let right_x = left_x + side_mm + gap_mm;

    let shift = |poly: &Polygon, dx: f64, dy: f64| -> Polygon {
        Polygon::new(
            poly.points()
                .iter()
                .map(|p| Point::new(p.x + from_mm(dx), p.y + from_mm(dy)))
                .collect(),
        )
        .unwrap()
    };

    let left = ExPoly::from_outer(shift(&rect(side_mm, side_mm), left_x, cy));
    let right = ExPoly::from_outer(shift(&rect(side_mm, side_mm), right_x, cy));
    (boundary, left, right)
}

/// A thin sliver: `width_mm` x `length_mm`, used to exercise the thin-wall
/// / medial-axis path (scenario S1).
pub fn thin_sliver(width_mm: f64, length_mm: f64) -> ExPoly {
    ExPoly::from_outer(rect(length_mm, width_mm))
}
