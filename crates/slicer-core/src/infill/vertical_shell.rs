//! §4.3.2 Vertical-shell enforcement.

use crate::clip::{difference, intersection, offset, union, Join};
use crate::types::{LayerView, Position, Surface, SurfaceTag};
use slicer_geom::Coord;

/// One region's per-layer inputs to [`enforce_vertical_shells`]: this
/// layer's internal surfaces plus a snapshot of the neighboring layers
/// `ensure_vertical_shell_thickness` projects through. `top_solid_layers`/
/// `bottom_solid_layers` and `top_solid_min_thickness`/
/// `bottom_solid_min_thickness` are the "or" pair spec §4.3.2 names: a
/// neighbor is included once *either* its layer-count budget or its
/// accumulated-height budget is satisfied.
pub struct ShellContext<'a> {
    pub this_layer: &'a LayerView,
    pub neighbors_above: &'a [LayerView],
    pub neighbors_below: &'a [LayerView],
    pub top_solid_layers: u32,
    pub bottom_solid_layers: u32,
    pub top_solid_min_thickness: Coord,
    pub bottom_solid_min_thickness: Coord,
    pub min_infill_spacing: Coord,
}

/// How many of `neighbors` (nearest first) `project_surfaces` should draw
/// from: at least `min_layers`, extended further if needed so their
/// cumulative height reaches `min_thickness` (spec §4.3.2's layer-count /
/// min-thickness "or").
fn effective_layer_count(neighbors: &[LayerView], min_layers: u32, min_thickness: Coord) -> usize {
    let mut count = min_layers as usize;
    if min_thickness > 0 {
        let mut accumulated: Coord = 0;
        let mut by_thickness = 0usize;
        for l in neighbors {
            if accumulated >= min_thickness {
                break;
            }
            accumulated += l.height;
            by_thickness += 1;
        }
        count = count.max(by_thickness);
    }
    count.min(neighbors.len())
}

fn project_surfaces<'a>(
    neighbors: &'a [LayerView],
    min_layers: u32,
    min_thickness: Coord,
    surfaces_of: impl Fn(&'a LayerView) -> &'a [slicer_geom::ExPoly],
) -> Vec<slicer_geom::ExPoly> {
    let count = effective_layer_count(neighbors, min_layers, min_thickness);
    neighbors.iter().take(count).flat_map(|l| surfaces_of(l).iter().cloned()).collect()
}

/// Reassigns the region of `internal_surfaces` that a `top_solid_layers`/
/// `bottom_solid_layers` projection from neighboring layers' already-
/// classified top/bottom surfaces still reaches as `Internal|Solid`,
/// regularizing the result to drop slivers (spec §4.3.2).
/// `existing_fill_holes` is subtracted first (area already solid via
/// another mechanism, e.g. bridge-over-infill).
pub fn enforce_vertical_shells(
    internal_surfaces: &[Surface],
    ctx: &ShellContext,
    existing_fill_holes: &[slicer_geom::ExPoly],
) -> Vec<Surface> {
    let internal_ex: Vec<_> = internal_surfaces
        .iter()
        .filter(|s| s.tag.position == Position::Internal)
        .map(|s| s.expoly.clone())
        .collect();
    if internal_ex.is_empty() {
        return Vec::new();
    }

    let projected_top = project_surfaces(
        ctx.neighbors_above,
        ctx.top_solid_layers,
        ctx.top_solid_min_thickness,
        |l| &l.top_surfaces,
    );
    let projected_bottom = project_surfaces(
        ctx.neighbors_below,
        ctx.bottom_solid_layers,
        ctx.bottom_solid_min_thickness,
        |l| &l.bottom_surfaces,
    );
    let projected = union(&projected_top, &projected_bottom);

    let shell_raw = intersection(&projected, &internal_ex);
    let shell_raw = difference(&shell_raw, existing_fill_holes);

    let inward = offset(&shell_raw, -(ctx.min_infill_spacing / 2), Join::Square);
    let shell = offset(&inward, (ctx.min_infill_spacing as f64 * 0.8).round() as Coord, Join::Square);

    shell
        .into_iter()
        .map(|ex| Surface::new(ex, SurfaceTag::internal_solid()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LayerView;
    use slicer_geom::from_mm;
    use slicer_test_fixtures::square;

    fn layer(index: usize, ex: slicer_geom::ExPoly) -> LayerView {
        LayerView {
            index,
            print_z: 0,
            height: from_mm(0.2),
            slices: vec![ex],
            top_surfaces: Vec::new(),
            bottom_surfaces: Vec::new(),
            internal_sparse_surfaces: Vec::new(),
        }
    }

    fn layer_with_top(index: usize, ex: slicer_geom::ExPoly, top: Vec<slicer_geom::ExPoly>) -> LayerView {
        LayerView { top_surfaces: top, ..layer(index, ex) }
    }

    #[test]
    fn empty_internal_surfaces_yield_nothing() {
        let this = layer(0, square(20.0));
        let ctx = ShellContext {
            this_layer: &this,
            neighbors_above: &[],
            neighbors_below: &[],
            top_solid_layers: 3,
            bottom_solid_layers: 3,
            top_solid_min_thickness: 0,
            bottom_solid_min_thickness: 0,
            min_infill_spacing: from_mm(0.5),
        };
        assert!(enforce_vertical_shells(&[], &ctx, &[]).is_empty());
    }

    /// A neighbor with no classified top surface (only a raw slice) must
    /// not contribute any projected area — regression test for treating a
    /// neighbor's full cross-section as a stand-in for its top surfaces.
    #[test]
    fn neighbor_without_classified_top_surface_projects_nothing() {
        let this = layer(0, square(20.0));
        let internal = vec![Surface::new(square(20.0), SurfaceTag::internal_sparse())];
        let bare_neighbor = layer(1, square(20.0));
        let ctx = ShellContext {
            this_layer: &this,
            neighbors_above: std::slice::from_ref(&bare_neighbor),
            neighbors_below: &[],
            top_solid_layers: 3,
            bottom_solid_layers: 3,
            top_solid_min_thickness: 0,
            bottom_solid_min_thickness: 0,
            min_infill_spacing: from_mm(0.5),
        };
        assert!(enforce_vertical_shells(&internal, &ctx, &[]).is_empty());
    }

    #[test]
    fn classified_top_surface_promotes_internal_to_solid() {
        let this = layer(0, square(20.0));
        let internal = vec![Surface::new(square(20.0), SurfaceTag::internal_sparse())];
        let neighbor = layer_with_top(1, square(20.0), vec![square(20.0)]);
        let ctx = ShellContext {
            this_layer: &this,
            neighbors_above: std::slice::from_ref(&neighbor),
            neighbors_below: &[],
            top_solid_layers: 3,
            bottom_solid_layers: 3,
            top_solid_min_thickness: 0,
            bottom_solid_min_thickness: 0,
            min_infill_spacing: from_mm(0.5),
        };
        let out = enforce_vertical_shells(&internal, &ctx, &[]);
        assert!(!out.is_empty());
        assert!(out.iter().all(|s| s.tag.density == crate::types::Density::Solid));
    }

    #[test]
    fn min_thickness_extends_past_layer_count_budget() {
        // top_solid_layers=0 alone would reach no neighbor, but
        // top_solid_min_thickness pulls in the first (0.2mm-tall) neighbor.
        let neighbors = [layer_with_top(1, square(20.0), vec![square(20.0)])];
        let n = effective_layer_count(&neighbors, 0, from_mm(0.2));
        assert_eq!(n, 1);
        let n_unthresholded = effective_layer_count(&neighbors, 0, 0);
        assert_eq!(n_unthresholded, 0);
    }
}
