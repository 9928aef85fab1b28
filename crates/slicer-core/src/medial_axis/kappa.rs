//! §4.1.6 Contour angle coefficient.

use slicer_geom::{ExPoly, Point};
use std::collections::HashMap;

/// Caches `kappa(p)` across repeated `main_fusion` lookups in one MAX
/// invocation, keyed by the rounded point (points recur exactly since they
/// come off the same polyline endpoints).
#[derive(Debug, Default)]
pub struct KappaCache {
    bounds_pts: Vec<Point>,
    cache: HashMap<(i64, i64), f64>,
}

impl KappaCache {
    pub fn new(bounds: &ExPoly) -> Self {
        let mut bounds_pts = bounds.outer().points().to_vec();
        for h in bounds.holes() {
            bounds_pts.extend_from_slice(h.points());
        }
        KappaCache { bounds_pts, cache: HashMap::new() }
    }

    /// Returns `1 − |α − π/2| / (π/2)` where `α` is the signed interior
    /// angle at the nearest contour vertex pair separated by at least
    /// `min_dist` from `p`.
    pub fn kappa(&mut self, p: Point, min_dist: f64) -> f64 {
        if let Some(&v) = self.cache.get(&(p.x, p.y)) {
            return v;
        }
        let v = self.compute(p, min_dist);
        self.cache.insert((p.x, p.y), v);
        v
    }

    fn compute(&self, p: Point, min_dist: f64) -> f64 {
        if self.bounds_pts.len() < 3 {
            return 1.0;
        }
        let n = self.bounds_pts.len();
        let mut best = 0usize;
        let mut best_d = f64::MAX;
        for (i, &c) in self.bounds_pts.iter().enumerate() {
            let d = c.dist(p);
            if d < best_d {
                best_d = d;
                best = i;
            }
        }
        let mut prev = (best + n - 1) % n;
        let mut next = (best + 1) % n;
        while self.bounds_pts[prev].dist(self.bounds_pts[best]) < min_dist && prev != next {
            prev = (prev + n - 1) % n;
        }
        while self.bounds_pts[next].dist(self.bounds_pts[best]) < min_dist && next != prev {
            next = (next + 1) % n;
        }
        let a = self.bounds_pts[prev];
        let b = self.bounds_pts[best];
        let c = self.bounds_pts[next];
        let v1 = (a.x as f64 - b.x as f64, a.y as f64 - b.y as f64);
        let v2 = (c.x as f64 - b.x as f64, c.y as f64 - b.y as f64);
        let dot = v1.0 * v2.0 + v1.1 * v2.1;
        let det = v1.0 * v2.1 - v1.1 * v2.0;
        let alpha = det.atan2(dot).abs();
        1.0 - (alpha - std::f64::consts::FRAC_PI_2).abs() / std::f64::consts::FRAC_PI_2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slicer_test_fixtures::square;

    #[test]
    fn kappa_of_square_corner_is_near_one() {
        let sq = square(10.0);
        let mut cache = KappaCache::new(&sq);
        let corner = sq.outer().points()[0];
        let k = cache.kappa(corner, 1.0);
        assert!(k > 0.9);
    }
}
