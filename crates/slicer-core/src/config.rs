//! The closed set of configuration options the toolpath core reads (spec
//! §6.1). These are plain value types: parsing them from a config file or
//! CLI is an external collaborator's job (§1 Non-goals); this module only
//! defines the shapes the core understands.

use slicer_geom::Coord;

/// Per-region loop counts, thicknesses and flags that drive [`crate::perimeter`]
/// and [`crate::infill`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionConfig {
    // Loop counts
    pub perimeters: u32,
    pub top_solid_layers: u32,
    pub bottom_solid_layers: u32,
    pub solid_infill_every_layers: u32,
    pub infill_every_layers: u32,

    // Thicknesses (mm)
    pub top_solid_min_thickness: f64,
    pub bottom_solid_min_thickness: f64,

    // Flags
    pub thin_walls: bool,
    pub gap_fill: bool,
    pub overhangs: bool,
    pub extra_perimeters: bool,
    pub only_one_perimeter_top: bool,
    pub ensure_vertical_shell_thickness: bool,
    pub infill_only_where_needed: bool,
    pub infill_dense: bool,
    pub interface_shells: bool,
    pub spiral_vase: bool,
    pub hole_to_polyhole: bool,
    pub clip_multipart_objects: bool,

    // Widths / margins (scaled Coord)
    pub thin_walls_min_width: Coord,
    pub thin_walls_overlap: f64,
    pub external_infill_margin: Coord,
    pub bridged_infill_margin: Coord,
    pub infill_overlap: f64,
    pub solid_over_perimeters: u32,

    pub dense_infill_algorithm: DenseInfillAlgorithm,
    pub support_distance_mode: SupportDistanceMode,

    pub xy_size_compensation: Coord,
    pub xy_inner_size_compensation: Coord,
    pub hole_size_compensation: Coord,
    pub first_layer_size_compensation: Coord,
    pub first_layer_size_compensation_layers: u32,
}

impl Default for RegionConfig {
    fn default() -> Self {
        RegionConfig {
            perimeters: 3,
            top_solid_layers: 3,
            bottom_solid_layers: 3,
            solid_infill_every_layers: 0,
            infill_every_layers: 1,
            top_solid_min_thickness: 0.0,
            bottom_solid_min_thickness: 0.0,
            thin_walls: true,
            gap_fill: true,
            overhangs: true,
            extra_perimeters: true,
            only_one_perimeter_top: false,
            ensure_vertical_shell_thickness: true,
            infill_only_where_needed: false,
            infill_dense: false,
            interface_shells: false,
            spiral_vase: false,
            hole_to_polyhole: false,
            clip_multipart_objects: false,
            thin_walls_min_width: 0,
            thin_walls_overlap: 0.5,
            external_infill_margin: 0,
            bridged_infill_margin: 0,
            infill_overlap: 0.0,
            solid_over_perimeters: 0,
            dense_infill_algorithm: DenseInfillAlgorithm::Automatic,
            support_distance_mode: SupportDistanceMode::ZdNone,
            xy_size_compensation: 0,
            xy_inner_size_compensation: 0,
            hole_size_compensation: 0,
            first_layer_size_compensation: 0,
            first_layer_size_compensation_layers: 1,
        }
    }
}

/// The algorithm used to size the dense-infill sub-region under a solid
/// surface (spec §4.3.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DenseInfillAlgorithm {
    Automatic,
    AutoNotFull,
    Enlarged,
    AutoOrEnlarged,
}

/// How support-material Z-distance is modeled; the core only needs to know
/// which mode is active to decide whether a surface counts as "supported"
/// for bridge/overhang purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SupportDistanceMode {
    ZdNone,
    ZdSoluble,
    ZdDistance,
}

/// Physical flow parameters for one extrusion role (spec §6.1 Flow oracle).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Flow {
    pub width: Coord,
    pub spacing: Coord,
    pub nozzle_diameter: Coord,
    pub height: Coord,
    pub bridge: bool,
}

impl Flow {
    pub fn new_from_spacing(spacing: Coord, nozzle_diameter: Coord, height: Coord, bridge: bool) -> Self {
        // Mirrors the reference slicer's flow-from-spacing inversion: width
        // is recovered from spacing by undoing the overlap the spacing
        // itself bakes in for a rectangle-with-semicircular-ends bead.
        let width = if bridge {
            spacing
        } else {
            let corner_allowance = height as f64 * (1.0 - std::f64::consts::FRAC_PI_4);
            spacing + corner_allowance.round() as Coord
        };
        Flow {
            width: width.max(nozzle_diameter / 4),
            spacing,
            nozzle_diameter,
            height,
            bridge,
        }
    }
}

/// The extrusion role a [`Flow`] (and downstream perimeter loop) plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlowRole {
    ExternalPerimeter,
    Perimeter,
    Infill,
    SolidInfill,
    TopInfill,
    SupportMaterial,
}
