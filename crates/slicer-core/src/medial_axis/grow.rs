//! Pipeline step 11 ("grow_to_nozzle_diameter"), spec §4.1.5: widens any
//! point thinner than the nozzle so single-pass extrusion can still lay
//! it down, capped at `max_width` so Property 1 (§8.1) still holds.

use crate::types::ThickPolyline;
use slicer_geom::Coord;

pub fn grow_to_nozzle_diameter(
    polylines: Vec<ThickPolyline>,
    nozzle_diameter: Coord,
    max_width: Coord,
) -> Vec<ThickPolyline> {
    let floor = nozzle_diameter.min(max_width);
    polylines
        .into_iter()
        .map(|mut pl| {
            let (_, widths, _) = pl.parts_mut();
            for w in widths.iter_mut() {
                if *w < floor {
                    *w = floor;
                }
            }
            pl
        })
        .collect()
}
