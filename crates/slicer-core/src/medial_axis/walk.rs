//! §4.1.4 Polyline construction via ROT.

use super::build::ValidEdge;
use crate::types::ThickPolyline;
use crate::voronoi::SegmentVd;
use slicer_geom::EPS_S;
use std::collections::HashMap;

/// Walks from `cur_vertex` (having just arrived via `arrival_edge`) as far
/// as a single unambiguous valid continuation exists, appending points and
/// widths. Returns whether the walk stopped at a free endpoint (as opposed
/// to a junction).
fn walk_one_direction(
    vd: &SegmentVd,
    valid: &HashMap<usize, ValidEdge>,
    used: &mut [bool],
    mut cur_vertex: usize,
    mut arrival_edge: usize,
    pts: &mut Vec<slicer_geom::Point>,
    widths: &mut Vec<slicer_geom::Coord>,
) -> bool {
    loop {
        let arrival_twin = vd.edges[arrival_edge].twin;
        let candidates: Vec<usize> = vd
            .incident_edges(cur_vertex)
            .into_iter()
            .filter(|&e| valid.contains_key(&e) && !used[e] && e != arrival_twin)
            .collect();
        match candidates.len() {
            1 => {
                let e = candidates[0];
                let ve = valid[&e];
                used[e] = true;
                used[ve.twin] = true;
                pts.push(ve.b);
                widths.push(ve.w1);
                arrival_edge = e;
                cur_vertex = match vd.edges[e].vertex1 {
                    Some(v) => v,
                    None => return true,
                };
            }
            0 => return true,
            _ => return false,
        }
    }
}

/// Builds the initial set of thick polylines by repeatedly seeding an
/// unused valid edge and walking forward/backward over `ROT` until a free
/// endpoint or a T/star junction is reached (spec §4.1.4).
pub fn build_polylines(vd: &SegmentVd, valid_edges: &[ValidEdge]) -> Vec<ThickPolyline> {
    let valid: HashMap<usize, ValidEdge> = valid_edges.iter().map(|v| (v.edge, *v)).collect();
    let mut used = vec![false; vd.edges.len()];
    let mut out = Vec::new();

    for seed in valid_edges {
        if used[seed.edge] {
            continue;
        }
        used[seed.edge] = true;
        used[seed.twin] = true;

        let mut pts = vec![seed.a, seed.b];
        let mut widths = vec![seed.w0, seed.w1];

        let forward_free = match vd.edges[seed.edge].vertex1 {
            Some(v1) => walk_one_direction(vd, &valid, &mut used, v1, seed.edge, &mut pts, &mut widths),
            None => true,
        };

        let mut back_pts = Vec::new();
        let mut back_widths = Vec::new();
        let backward_free = match vd.edges[seed.twin].vertex1 {
            Some(v0) => {
                walk_one_direction(vd, &valid, &mut used, v0, seed.twin, &mut back_pts, &mut back_widths)
            }
            None => true,
        };
        back_pts.reverse();
        back_widths.reverse();
        pts.splice(0..0, back_pts);
        widths.splice(0..0, back_widths);

        let mut endpoints = (backward_free, forward_free);
        if pts.len() > 2 {
            let first = pts[0];
            let last = pts[pts.len() - 1];
            if first.dist_sq(last) < (EPS_S as i128) * (EPS_S as i128) {
                endpoints = (false, false);
            }
        }

        out.push(ThickPolyline::new(pts, widths, endpoints));
    }

    out
}
