//! §4.2 Inputs/Output: the per-island parameters and result bundle PG's
//! entry point takes and returns.

use crate::config::Flow;
use crate::types::{Loop, Surface, ThickPolyline};
use slicer_geom::{Coord, ExPoly};

/// One island's perimeter-generation request (spec §4.2 Inputs).
#[derive(Debug, Clone)]
pub struct PerimeterParams {
    pub perimeters: u32,
    pub ext_perimeter_flow: Flow,
    pub perimeter_flow: Flow,
    pub detect_thin_walls: bool,
    pub gap_fill: bool,
    pub extra_perimeters: bool,
    pub overhangs: bool,
    pub nozzle_diameter: Coord,
    pub layer_height: Coord,
    /// Floor for `MAX`'s `min_width` when skeletonising thin walls and gaps
    /// (spec §6.1 `thin_walls_min_width`).
    pub thin_walls_min_width: Coord,
    pub external_infill_margin: Coord,
    /// Absolute infill/perimeter overlap added back into `infill_seed`'s
    /// inset (spec §4.2.1's `+ overlap` term), derived by the caller from
    /// `config.infill_overlap`'s fraction (spec §6.1 `infill_overlap`).
    pub infill_overlap: Coord,
    pub lower_slices: Vec<ExPoly>,
    pub upper_slices: Vec<ExPoly>,
}

impl PerimeterParams {
    pub fn new(perimeters: u32, ext_perimeter_flow: Flow, perimeter_flow: Flow) -> Self {
        PerimeterParams {
            perimeters,
            nozzle_diameter: ext_perimeter_flow.nozzle_diameter,
            layer_height: ext_perimeter_flow.height,
            ext_perimeter_flow,
            perimeter_flow,
            detect_thin_walls: true,
            gap_fill: true,
            extra_perimeters: true,
            overhangs: true,
            thin_walls_min_width: 0,
            external_infill_margin: 0,
            infill_overlap: 0,
            lower_slices: Vec::new(),
            upper_slices: Vec::new(),
        }
    }

    pub(crate) fn ext_width(&self) -> Coord {
        self.ext_perimeter_flow.width
    }
    pub(crate) fn ext_spacing(&self) -> Coord {
        self.ext_perimeter_flow.spacing
    }
    pub(crate) fn spacing(&self) -> Coord {
        self.perimeter_flow.spacing
    }
    /// Narrower of the two perimeter spacings, used to collapse too-thin
    /// necks at the first (external) shell (spec §4.2.1).
    pub(crate) fn ext_min_spacing(&self) -> Coord {
        self.ext_spacing().min(self.spacing())
    }
    /// Spacing used between the external shell and the first internal one
    /// (spec §4.2.1, `good_spacing` at `i=1`).
    pub(crate) fn ext_spacing2(&self) -> Coord {
        (self.ext_spacing() + self.spacing()) / 2
    }
}

/// PG's output for one island (spec §4.2 Output).
#[derive(Debug, Clone, Default)]
pub struct PerimeterOutput {
    pub contours: Vec<Loop>,
    pub thin_walls: Vec<ThickPolyline>,
    pub gap_fill: Vec<ThickPolyline>,
    pub infill_seed: Vec<ExPoly>,
    /// Extra loops §4.2.5 induced on top of `contours`' own depth, saturated
    /// at the caller-chosen bound (spec §4.2.5 doesn't name one).
    pub extra_perimeters: u32,
}

impl PerimeterOutput {
    /// `infill_seed` wrapped as `Internal|Sparse` [`Surface`]s, the shape
    /// IRC's top/bottom classification (spec §4.3.1) expects as input.
    pub fn seed_surfaces(&self) -> Vec<Surface> {
        self.infill_seed
            .iter()
            .cloned()
            .map(|ex| Surface::new(ex, crate::types::SurfaceTag::internal_sparse()))
            .collect()
    }
}
