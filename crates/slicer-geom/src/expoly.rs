use crate::point::Point;
use crate::polygon::{Orientation, Polygon};
use alloc::vec::Vec;

/// A single outer boundary with zero or more holes, all strictly nested
/// inside the outer boundary and pairwise disjoint (§3 Data Model).
///
/// `slicer-core`'s clip/offset primitive (`CLIP`, §2.1) always produces and
/// consumes collections of `ExPoly` rather than raw polygon soup, since
/// hole/contour association is load-bearing for every downstream stage
/// (perimeter nesting, infill boundary subtraction).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExPoly {
    outer: Polygon,
    holes: Vec<Polygon>,
}

impl ExPoly {
    /// Builds an `ExPoly`, orienting the outer ring CCW and holes CW
    /// regardless of how they were wound on input (§6.3).
    pub fn new(outer: Polygon, holes: Vec<Polygon>) -> Self {
        let outer = outer.oriented(Orientation::CounterClockwise);
        let holes = holes
            .into_iter()
            .map(|h| h.oriented(Orientation::Clockwise))
            .collect();
        ExPoly { outer, holes }
    }

    /// An `ExPoly` with no holes.
    pub fn from_outer(outer: Polygon) -> Self {
        Self::new(outer, Vec::new())
    }

    #[inline]
    pub fn outer(&self) -> &Polygon {
        &self.outer
    }

    #[inline]
    pub fn holes(&self) -> &[Polygon] {
        &self.holes
    }

    /// Iterates every ring (outer, then holes) — the form most `CLIP`
    /// operations and the Voronoi segment source want their input in.
    pub fn rings(&self) -> impl Iterator<Item = &Polygon> {
        core::iter::once(&self.outer).chain(self.holes.iter())
    }

    /// All edges of the outer ring and every hole, as the flat segment set
    /// the `VD` primitive (§2.1) is built from.
    pub fn lines(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.rings().flat_map(|r| r.lines())
    }

    /// Net area: outer area minus the area of all holes.
    pub fn area(&self) -> f64 {
        self.outer.area() - self.holes.iter().map(Polygon::area).sum::<f64>()
    }

    pub fn is_empty(&self) -> bool {
        self.outer.is_empty() || self.area() <= 0.0
    }

    /// Even-odd containment test over outer-minus-holes.
    pub fn contains_point(&self, pt: Point) -> bool {
        if !self.outer.contains_point(pt) {
            return false;
        }
        !self.holes.iter().any(|h| h.contains_point(pt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(side: i64) -> Polygon {
        Polygon::new(vec![
            Point::new(0, 0),
            Point::new(side, 0),
            Point::new(side, side),
            Point::new(0, side),
        ])
        .unwrap()
    }

    #[test]
    fn holes_reorient_to_clockwise() {
        let outer = square(100_000);
        let hole = square(10_000); // CCW by construction above
        let ex = ExPoly::new(outer, vec![hole]);
        assert_eq!(ex.holes()[0].orientation(), Orientation::Clockwise);
    }

    #[test]
    fn area_subtracts_holes() {
        let outer = square(100);
        let hole = square(10);
        let ex = ExPoly::new(outer, vec![hole]);
        assert_eq!(ex.area(), 100.0 * 100.0 - 10.0 * 10.0);
    }
}
