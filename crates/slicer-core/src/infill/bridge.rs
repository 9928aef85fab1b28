//! §4.3.3 Bridge over infill.

use crate::clip::{difference, intersection, offset2, Join};
use crate::types::{Density, LayerView, Position, Surface, SurfaceTag};
use slicer_geom::Coord;

/// Candidate collapsing widths tried in order; the narrower margin is kept
/// whenever it doesn't fragment the region further than the wider one
/// (spec §4.3.3, "choose the narrower-margin of two offset widths if the
/// first splits the region into more pieces than the second").
fn collapse_candidates(bridge_width: Coord) -> [Coord; 2] {
    [bridge_width, 2 * bridge_width]
}

fn collapse_sparse(sparse: &[slicer_geom::ExPoly], margin: Coord) -> Vec<slicer_geom::ExPoly> {
    offset2(sparse, -3 * margin, 3 * margin, Join::Miter(3.0))
}

/// For each `internal_solid` surface not on the lowest layer, promotes the
/// portion that sits over sparse internal infill within `bridge_height` of
/// lower layers to `Internal|Solid|Bridge` (spec §4.3.3).
pub fn bridge_over_infill(
    internal_solid: &[Surface],
    lower_layers_within_bridge_height: &[LayerView],
    bridge_width: Coord,
    is_lowest_layer: bool,
) -> Vec<Surface> {
    if is_lowest_layer || lower_layers_within_bridge_height.is_empty() {
        return internal_solid.to_vec();
    }

    let lower_sparse: Vec<_> =
        lower_layers_within_bridge_height.iter().flat_map(|l| l.internal_sparse_surfaces.iter().cloned()).collect();
    if lower_sparse.is_empty() {
        return internal_solid.to_vec();
    }

    let candidates = collapse_candidates(bridge_width);
    let narrow = collapse_sparse(&lower_sparse, candidates[0]);
    let wide = collapse_sparse(&lower_sparse, candidates[1]);
    let collapsed = if narrow.len() <= wide.len() { narrow } else { wide };

    let mut out = Vec::with_capacity(internal_solid.len());
    for surface in internal_solid {
        if surface.tag.position != Position::Internal || surface.tag.density != Density::Solid {
            out.push(surface.clone());
            continue;
        }
        let over_sparse = intersection(std::slice::from_ref(&surface.expoly), &collapsed);
        if over_sparse.is_empty() {
            out.push(surface.clone());
            continue;
        }
        let remainder = difference(std::slice::from_ref(&surface.expoly), &over_sparse);
        for ex in remainder {
            let mut s = surface.clone();
            s.expoly = ex;
            out.push(s);
        }
        for ex in over_sparse {
            let mut s = surface.clone();
            s.expoly = ex;
            s.tag = SurfaceTag::internal_solid_bridge();
            out.push(s);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use slicer_geom::from_mm;
    use slicer_test_fixtures::square;

    #[test]
    fn lowest_layer_is_left_untouched() {
        let surfaces = vec![Surface::new(square(20.0), SurfaceTag::internal_solid())];
        let out = bridge_over_infill(&surfaces, &[], from_mm(0.45), true);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].tag, SurfaceTag::internal_solid());
    }

    #[test]
    fn no_lower_layers_leaves_surfaces_untouched() {
        let surfaces = vec![Surface::new(square(20.0), SurfaceTag::internal_solid())];
        let out = bridge_over_infill(&surfaces, &[], from_mm(0.45), false);
        assert_eq!(out.len(), 1);
    }

    fn layer_with_sparse(ex: slicer_geom::ExPoly, sparse: Vec<slicer_geom::ExPoly>) -> LayerView {
        LayerView {
            index: 0,
            print_z: 0,
            height: from_mm(0.2),
            slices: vec![ex],
            top_surfaces: Vec::new(),
            bottom_surfaces: Vec::new(),
            internal_sparse_surfaces: sparse,
        }
    }

    /// A lower layer with a full raw slice but no classified sparse surface
    /// must not promote anything — regression test for treating a
    /// neighbor's entire cross-section as a stand-in for its sparse infill.
    #[test]
    fn lower_layer_without_classified_sparse_surface_promotes_nothing() {
        let surfaces = vec![Surface::new(square(20.0), SurfaceTag::internal_solid())];
        let lower = layer_with_sparse(square(20.0), Vec::new());
        let out = bridge_over_infill(&surfaces, std::slice::from_ref(&lower), from_mm(0.45), false);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].tag, SurfaceTag::internal_solid());
    }

    #[test]
    fn lower_sparse_surface_promotes_overlap_to_bridge() {
        let surfaces = vec![Surface::new(square(20.0), SurfaceTag::internal_solid())];
        let lower = layer_with_sparse(square(20.0), vec![square(20.0)]);
        let out = bridge_over_infill(&surfaces, std::slice::from_ref(&lower), from_mm(0.45), false);
        assert!(out.iter().any(|s| s.tag == SurfaceTag::internal_solid_bridge()));
    }
}
