/// Builds a [`crate::Point`] from `x`/`y` scaled-[`crate::Coord`] literals.
///
/// ```
/// use slicer_geom::point;
/// let p = point!(x: 1_000, y: 2_000);
/// assert_eq!(p.x, 1_000);
/// ```
#[macro_export]
macro_rules! point {
    (x: $x:expr, y: $y:expr $(,)?) => {
        $crate::Point::new($x, $y)
    };
}
