//! Traits for the three external collaborators this crate consumes but
//! never constructs itself (spec §6.1): the mesh slicer, the flow oracle,
//! and the bridge-direction detector. Triangle-mesh slicing, G-code
//! emission, support generation, and configuration loading are out of
//! scope; these traits are the only seam the core exposes toward them.

use crate::config::{Flow, FlowRole};
use slicer_geom::ExPoly;

/// Produces per-Z layer polygons for a region; an opaque producer from the
/// core's point of view. The only contract is that every returned `ExPoly`
/// is simple and its holes are well-formed.
pub trait SliceSource {
    /// `z_list` in scaled `Coord` units; returns one `Vec<ExPoly>` per `z`.
    fn slice_region(&self, region_id: u32, z_list: &[i64]) -> Vec<Vec<ExPoly>>;

    /// Like [`Self::slice_region`] but for modifier meshes layered over a
    /// region (painted seams, infill modifiers, etc).
    fn slice_modifiers(&self, region_id: u32, z_list: &[i64]) -> Vec<Vec<ExPoly>>;
}

/// Supplies extrusion-role flow parameters.
pub trait FlowProvider {
    fn flow(&self, role: FlowRole) -> Flow;
}

/// The direction and area a region can bridge over, used by
/// [`crate::perimeter`]'s overhang classification (§4.2.3).
pub trait BridgeDetector {
    /// Returns the chosen bridge angle (radians) and the polygons of the
    /// unsupported area that angle actually covers.
    fn detect_angle(
        &self,
        unsupported: &[ExPoly],
        lower_island: &[ExPoly],
        spacing: i64,
        preferred: Option<f64>,
    ) -> (f64, Vec<ExPoly>);
}
