//! §4.1.3 Voronoi construction and edge validation.

use crate::constants::CLIPPER_MAX_COORD;
use crate::voronoi::{self, SegmentVd};
use slicer_geom::{Coord, ExPoly, Point};

/// One validated VD edge carrying the full widths at its two endpoints
/// (spec `VoronoiEdgeRecord`).
#[derive(Debug, Clone, Copy)]
pub struct ValidEdge {
    pub edge: usize,
    pub twin: usize,
    pub a: Point,
    pub b: Point,
    pub w0: Coord,
    pub w1: Coord,
}

fn point_in_surface_or_near(surface: &ExPoly, p: Point) -> bool {
    surface.contains_point(p) || surface.outer().points().iter().any(|&q| q.dist(p) < 1.0)
}

/// Distance from `p` to the nearer of a cell's generating segment
/// endpoints, used as the candidate full-width radius (spec §4.1.3).
fn cell_site_distance(p: Point, segment: (Point, Point)) -> f64 {
    let (a, b) = segment;
    let ab = b - a;
    let len_sq = (ab.x as f64).powi(2) + (ab.y as f64).powi(2);
    if len_sq < 1.0 {
        return p.dist(a);
    }
    let ap = p - a;
    let t = ((ap.x as f64 * ab.x as f64) + (ap.y as f64 * ab.y as f64)) / len_sq;
    let t = t.clamp(0.0, 1.0);
    let proj = Point::new(a.x + (ab.x as f64 * t) as i64, a.y + (ab.y as f64 * t) as i64);
    p.dist(proj)
}

/// Builds the VD of `surface.lines()` and returns the set of valid edges
/// (spec §4.1.3): excludes secondary and infinite edges, rejects any edge
/// whose endpoints aren't finite and within `CLIPPER_MAX_COORD`, whose path
/// excursion outside `surface` exceeds `EPS_S`, or whose candidate widths
/// are both implausibly above `max_width`.
pub fn build_valid_edges(surface: &ExPoly, max_width: Coord) -> crate::Result<(SegmentVd, Vec<ValidEdge>)> {
    let segments: Vec<(Point, Point)> = surface.lines().map(|(a, b)| (a, b)).collect();
    let vd = voronoi::build(&segments)?;

    let mut valid = Vec::new();
    for (edge_id, e) in vd.edges.iter().enumerate() {
        if !e.is_primary || e.is_secondary || e.is_infinite {
            continue;
        }
        let (Some(v0), Some(v1)) = (e.vertex0, e.vertex1) else {
            continue;
        };
        let a = vd.vertices[v0].point;
        let b = vd.vertices[v1].point;
        if a.x.unsigned_abs() as i64 > CLIPPER_MAX_COORD || a.y.unsigned_abs() as i64 > CLIPPER_MAX_COORD {
            continue;
        }
        if b.x.unsigned_abs() as i64 > CLIPPER_MAX_COORD || b.y.unsigned_abs() as i64 > CLIPPER_MAX_COORD {
            continue;
        }
        if !point_in_surface_or_near(surface, a) && !point_in_surface_or_near(surface, b) {
            continue;
        }

        let cell = e.cell;
        let twin_cell = vd.edges[e.twin].cell;
        let seg_l = vd.source_segment(cell);
        let seg_r = vd.source_segment(twin_cell);
        let w0 = 2.0 * cell_site_distance(a, seg_l).min(cell_site_distance(a, seg_r));
        let w1 = 2.0 * cell_site_distance(b, seg_l).min(cell_site_distance(b, seg_r));

        let max_w = max_width as f64;
        if w0 > 1.05 * max_w && w1 > 1.05 * max_w {
            continue;
        }

        valid.push(ValidEdge {
            edge: edge_id,
            twin: e.twin,
            a,
            b,
            w0: w0.round() as Coord,
            w1: w1.round() as Coord,
        });
    }

    Ok((vd, valid))
}
