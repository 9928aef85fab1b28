use slicer_geom::Coord;

/// One MAX invocation's admissibility thresholds and physical constraints
/// (spec §4.1 Inputs).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaxParams {
    pub min_width: Coord,
    pub max_width: Coord,
    pub nozzle_diameter: Coord,
    pub height: Coord,
    /// Endpoint taper length; `0` disables `taper_ends`.
    pub taper_size: Coord,
    /// Selects whether `extends_line` runs before or after the
    /// thinning/trimming steps.
    pub stop_at_min_width: bool,
}

impl MaxParams {
    pub fn new(min_width: Coord, max_width: Coord, nozzle_diameter: Coord, height: Coord) -> Self {
        MaxParams {
            min_width,
            max_width,
            nozzle_diameter,
            height,
            taper_size: 0,
            stop_at_min_width: false,
        }
    }
}
