//! IRC: infill region classification (spec §4.3). Operates on a stack of
//! per-layer, per-region [`Surface`] sets produced by [`crate::perimeter`],
//! running top/bottom detection (§4.3.1), vertical-shell enforcement
//! (§4.3.2), bridge-over-infill promotion (§4.3.3), dense-region tagging
//! (§4.3.4), and XY compensation (§4.3.5) — in that order, matching the
//! sequencing spec §5 lays out for the cross-layer sub-steps.

mod bridge;
mod dense;
mod top_bottom;
mod vertical_shell;
mod xy_compensation;

pub use bridge::bridge_over_infill;
pub use dense::tag_dense_region;
pub use top_bottom::{detect_top_bottom, dilate_sliver_collapse, top_bottom_overlap};
pub use vertical_shell::{enforce_vertical_shells, ShellContext};
pub use xy_compensation::{compensate_multi_region, compensate_single_region, shrink_contour_holes, XyCompensation};

use crate::config::RegionConfig;
use crate::types::{LayerView, Position, Surface};
use slicer_geom::Coord;

/// One region's full IRC pass for a single layer, threading the §4.3.1–
/// §4.3.4 sub-steps together. XY compensation (§4.3.5) is applied
/// upstream of slicing into regions and so isn't part of this per-region
/// pass — see [`compensate_single_region`]/[`compensate_multi_region`].
pub struct IrcContext<'a> {
    pub config: &'a RegionConfig,
    pub ext_perim_width: Coord,
    pub infill_width: Coord,
    pub min_infill_spacing: Coord,
    pub bridge_width: Coord,
    pub external_infill_margin: Coord,
    /// Neighboring layers nearest-first, each already carrying its own
    /// §4.3.1-classified `top_surfaces`/`bottom_surfaces`/
    /// `internal_sparse_surfaces` (not just raw `slices`) — see
    /// [`LayerView`].
    pub neighbors_above: &'a [LayerView],
    pub neighbors_below: &'a [LayerView],
    pub lower_layers_within_bridge_height: &'a [LayerView],
    pub is_lowest_layer: bool,
    pub region_area_is_large: bool,
}

/// Runs §4.3.1–§4.3.4 for one region on one layer, returning the final
/// surface set.
pub fn classify_region(
    this_layer: &LayerView,
    upper_slices: &[slicer_geom::ExPoly],
    lower_slices: &[slicer_geom::ExPoly],
    ctx: &IrcContext,
) -> Vec<Surface> {
    let mut surfaces = top_bottom::detect_top_bottom(
        &this_layer.slices,
        upper_slices,
        lower_slices,
        ctx.ext_perim_width,
        ctx.config.support_distance_mode != crate::config::SupportDistanceMode::ZdNone,
    );

    if ctx.config.ensure_vertical_shell_thickness {
        let shell_ctx = vertical_shell::ShellContext {
            this_layer,
            neighbors_above: ctx.neighbors_above,
            neighbors_below: ctx.neighbors_below,
            top_solid_layers: ctx.config.top_solid_layers,
            bottom_solid_layers: ctx.config.bottom_solid_layers,
            top_solid_min_thickness: slicer_geom::from_mm(ctx.config.top_solid_min_thickness),
            bottom_solid_min_thickness: slicer_geom::from_mm(ctx.config.bottom_solid_min_thickness),
            min_infill_spacing: ctx.min_infill_spacing,
        };
        let promoted = vertical_shell::enforce_vertical_shells(&surfaces, &shell_ctx, &[]);
        if !promoted.is_empty() {
            let promoted_area: Vec<_> = promoted.iter().map(|s| s.expoly.clone()).collect();
            surfaces.retain(|s| s.tag.position != Position::Internal);
            surfaces.extend(promoted);
            let remainder = crate::clip::difference(&this_layer.slices, &promoted_area);
            for ex in remainder {
                surfaces.push(Surface::new(ex, crate::types::SurfaceTag::internal_sparse()));
            }
        }
    }

    surfaces = bridge::bridge_over_infill(
        &surfaces,
        ctx.lower_layers_within_bridge_height,
        ctx.bridge_width,
        ctx.is_lowest_layer,
    );

    if ctx.config.infill_dense {
        let total_area: f64 = surfaces.iter().map(|s| s.expoly.area()).sum();
        let density_below_40pct = total_area > 0.0
            && surfaces
                .iter()
                .filter(|s| s.tag.position == Position::Internal && s.tag.density == crate::types::Density::Sparse)
                .map(|s| s.expoly.area())
                .sum::<f64>()
                / total_area
                < 0.4;
        if density_below_40pct {
            let solid_above: Vec<_> = surfaces
                .iter()
                .filter(|s| s.tag.density == crate::types::Density::Solid)
                .map(|s| s.expoly.clone())
                .collect();
            let mut next = Vec::with_capacity(surfaces.len());
            for s in surfaces {
                if s.tag.position == Position::Internal && s.tag.density == crate::types::Density::Sparse {
                    let (remainder, dense) = dense::tag_dense_region(
                        &s,
                        &solid_above,
                        ctx.config.dense_infill_algorithm,
                        ctx.external_infill_margin,
                        ctx.infill_width,
                        ctx.region_area_is_large,
                        0,
                    );
                    next.extend(remainder);
                    next.extend(dense);
                } else {
                    next.push(s);
                }
            }
            surfaces = next;
        }
    }

    surfaces
}

#[cfg(test)]
mod tests {
    use super::*;
    use slicer_geom::from_mm;
    use slicer_test_fixtures::square;

    fn layer(ex: slicer_geom::ExPoly) -> LayerView {
        LayerView {
            index: 1,
            print_z: from_mm(0.4),
            height: from_mm(0.2),
            slices: vec![ex],
            top_surfaces: Vec::new(),
            bottom_surfaces: Vec::new(),
            internal_sparse_surfaces: Vec::new(),
        }
    }

    #[test]
    fn sandwiched_layer_with_vertical_shells_off_is_internal() {
        let this = layer(square(20.0));
        let config = RegionConfig { ensure_vertical_shell_thickness: false, infill_dense: false, ..Default::default() };
        let ctx = IrcContext {
            config: &config,
            ext_perim_width: from_mm(0.45),
            infill_width: from_mm(0.4),
            min_infill_spacing: from_mm(0.5),
            bridge_width: from_mm(0.45),
            external_infill_margin: from_mm(1.0),
            neighbors_above: &[],
            neighbors_below: &[],
            lower_layers_within_bridge_height: &[],
            is_lowest_layer: false,
            region_area_is_large: false,
        };
        let neighbor = vec![square(20.0)];
        let out = classify_region(&this, &neighbor, &neighbor, &ctx);
        assert!(out.iter().all(|s| s.tag.position == Position::Internal));
    }
}
