//! Numeric constants referenced by name but not defined in the glossary;
//! values follow the conventional defaults used across the FFF slicers
//! this crate's algorithms are drawn from.

use slicer_geom::{from_mm, Coord};

/// Upper bound on any coordinate value passed through offsetting; an edge
/// whose endpoint would exceed this is dropped rather than propagated
/// (spec §7, `NumericalOverflow`).
pub const CLIPPER_MAX_COORD: Coord = 1 << 50;

/// Minimum resolution below which adjacent polygon vertices are collapsed
/// (spec §4.1.1).
pub fn res() -> Coord {
    from_mm(0.0125)
}

/// Fractional overlap tolerance used when sizing the gap-fill width band
/// (spec §4.2.4).
pub const OVERLAP_TOL: f64 = 0.05;
