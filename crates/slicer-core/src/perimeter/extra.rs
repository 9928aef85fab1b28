//! §4.2.5 Extra-perimeter induction.

use crate::clip::{difference, offset, Join};
use slicer_geom::{Coord, ExPoly};

fn boundary_length(ex: &[ExPoly]) -> f64 {
    ex.iter().flat_map(|e| e.rings()).flat_map(|r| r.lines()).map(|(a, b)| a.dist(b)).sum()
}

fn intersecting_length(ring_region: &[ExPoly], upper: &[ExPoly]) -> f64 {
    let covered = crate::clip::intersection(ring_region, upper);
    boundary_length(&covered)
}

/// While the critical annular ring just inside the current shell still
/// carries more than 30% of the upper slice's boundary length, increments
/// `extra_perimeters` on this surface (spec §4.2.5). Returns the final
/// count; `max_extra` is a saturation bound since the spec only says
/// "saturates" without naming the cap.
pub fn induce_extra_perimeters(
    current_shell: &ExPoly,
    upper_slices: &[ExPoly],
    spacing: Coord,
    max_extra: u32,
) -> u32 {
    if upper_slices.is_empty() {
        return 0;
    }
    let upper_boundary_len = boundary_length(upper_slices);
    if upper_boundary_len <= 0.0 {
        return 0;
    }

    let mut extra = 0u32;
    let mut ring_outer = current_shell.clone();
    while extra < max_extra {
        let ring_inner = offset(std::slice::from_ref(&ring_outer), -spacing, Join::Miter(3.0));
        let ring_region = difference(std::slice::from_ref(&ring_outer), &ring_inner);
        let covered_len = intersecting_length(&ring_region, upper_slices);
        if covered_len <= 0.3 * upper_boundary_len {
            break;
        }
        extra += 1;
        let Some(next) = ring_inner.into_iter().next() else { break };
        ring_outer = next;
    }
    extra
}

#[cfg(test)]
mod tests {
    use super::*;
    use slicer_geom::from_mm;
    use slicer_test_fixtures::square;

    #[test]
    fn no_upper_slices_means_no_extra_perimeters() {
        let shell = square(20.0);
        assert_eq!(induce_extra_perimeters(&shell, &[], from_mm(0.45), 5), 0);
    }

    #[test]
    fn fully_covering_upper_slice_saturates() {
        let shell = square(20.0);
        let upper = vec![square(20.0)];
        let extra = induce_extra_perimeters(&shell, &upper, from_mm(0.45), 3);
        assert_eq!(extra, 3);
    }
}
