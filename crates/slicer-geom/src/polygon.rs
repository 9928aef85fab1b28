use crate::error::Error;
use crate::point::Point;
use crate::Result;

/// Winding direction of a ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    CounterClockwise,
    Clockwise,
}

/// A simple polygon ring: an ordered sequence of vertices, implicitly closed
/// (the first vertex is not repeated at the end of `points`).
///
/// By convention (§6.3 of the toolpath spec) outer rings are wound
/// counter-clockwise and hole rings clockwise; [`Polygon`] does not enforce
/// this on construction (callers may build either kind), but
/// [`Polygon::orient`] flips the ring to match a requested [`Orientation`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polygon {
    points: alloc::vec::Vec<Point>,
}

impl Polygon {
    /// Builds a polygon from a vertex list. Fails if fewer than 3 distinct
    /// vertices remain once a trailing repeat of the first vertex is dropped.
    pub fn new(mut points: alloc::vec::Vec<Point>) -> Result<Self> {
        if points.len() >= 2 && points.first() == points.last() {
            points.pop();
        }
        if points.len() < 3 {
            return Err(Error::DegenerateRing { len: points.len() });
        }
        Ok(Polygon { points })
    }

    /// Builds a polygon without validating vertex count; used internally by
    /// algorithms that are known to preserve validity (e.g. clip results).
    pub(crate) fn from_raw(points: alloc::vec::Vec<Point>) -> Self {
        Polygon { points }
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates the closed edges of the ring, wrapping from the last vertex
    /// back to the first.
    pub fn lines(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Twice the signed area (shoelace sum); positive for CCW rings.
    pub fn signed_area_x2(&self) -> i128 {
        self.lines().map(|(a, b)| a.cross(b)).sum()
    }

    /// Unsigned area in squared [`crate::Coord`] units.
    pub fn area(&self) -> f64 {
        (self.signed_area_x2().unsigned_abs() as f64) / 2.0
    }

    pub fn orientation(&self) -> Orientation {
        if self.signed_area_x2() >= 0 {
            Orientation::CounterClockwise
        } else {
            Orientation::Clockwise
        }
    }

    /// Reverses vertex order in place, flipping the ring's orientation.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Returns a copy of `self` wound in the requested `orientation`.
    pub fn oriented(&self, orientation: Orientation) -> Self {
        let mut p = self.clone();
        if p.orientation() != orientation {
            p.reverse();
        }
        p
    }

    /// Even-odd ray-casting point-in-ring test; boundary membership is
    /// treated as "inside" within `EPS_S` of an edge.
    pub fn contains_point(&self, pt: Point) -> bool {
        let mut inside = false;
        for (a, b) in self.lines() {
            let (ax, ay) = (a.x as f64, a.y as f64);
            let (bx, by) = (b.x as f64, b.y as f64);
            let (px, py) = (pt.x as f64, pt.y as f64);
            if (ay > py) != (by > py) {
                let t = (py - ay) / (by - ay);
                let x_at_y = ax + t * (bx - ax);
                if px < x_at_y {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Centroid of the ring's vertices (not the area centroid); sufficient
    /// for the circular fast-path's radius check (§4.1.2).
    pub fn vertex_centroid(&self) -> Point {
        let n = self.points.len() as i64;
        let (sx, sy) = self
            .points
            .iter()
            .fold((0i128, 0i128), |(sx, sy), p| (sx + p.x as i128, sy + p.y as i128));
        Point::new((sx / n as i128) as i64, (sy / n as i128) as i64)
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
    fn square_is_ccw_and_has_correct_area() {
        let sq = square(1000);
        assert_eq!(sq.orientation(), Orientation::CounterClockwise);
        assert_eq!(sq.area(), 1_000_000.0);
    }

    #[test]
    fn reversed_square_is_cw() {
        let mut sq = square(1000);
        sq.reverse();
        assert_eq!(sq.orientation(), Orientation::Clockwise);
    }

    #[test]
    fn contains_point_inside_and_outside() {
        let sq = square(1000);
        assert!(sq.contains_point(Point::new(500, 500)));
        assert!(!sq.contains_point(Point::new(1500, 500)));
    }

    #[test]
    fn degenerate_ring_is_rejected() {
        assert!(Polygon::new(vec![Point::new(0, 0), Point::new(1, 1)]).is_err());
    }
}
