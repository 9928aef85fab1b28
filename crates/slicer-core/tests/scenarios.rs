//! End-to-end scenarios S1-S6, exercising MAX/PG/IRC together the way a
//! caller wires them rather than one module's unit tests in isolation.

use slicer_core::clip::difference;
use slicer_core::collab::BridgeDetector;
use slicer_core::config::Flow;
use slicer_core::infill::{bridge_over_infill, detect_top_bottom, enforce_vertical_shells, ShellContext};
use slicer_core::perimeter::{generate_perimeters, PerimeterParams};
use slicer_core::types::{Density, LayerView, Position, Surface, SurfaceTag};
use slicer_geom::{from_mm, ExPoly, Orientation, SCALE};
use slicer_test_fixtures::{square, square_with_square_hole, thin_sliver, two_squares_with_gap};

struct NeverBridges;
impl BridgeDetector for NeverBridges {
    fn detect_angle(&self, _unsupported: &[ExPoly], _lower: &[ExPoly], _spacing: i64, _preferred: Option<f64>) -> (f64, Vec<ExPoly>) {
        (0.0, Vec::new())
    }
}

fn flow(width_mm: f64, spacing_mm: f64, nozzle_mm: f64, height_mm: f64) -> Flow {
    Flow {
        width: from_mm(width_mm),
        spacing: from_mm(spacing_mm),
        nozzle_diameter: from_mm(nozzle_mm),
        height: from_mm(height_mm),
        bridge: false,
    }
}

fn area_mm2(polys: &[ExPoly]) -> f64 {
    polys.iter().map(ExPoly::area).sum::<f64>() / (SCALE as f64).powi(2)
}

/// S1: a 0.4mm x 20mm rectangle has no room for a perimeter ring; it should
/// come out entirely as one thin-wall polyline.
#[test]
fn s1_thin_rectangle_becomes_one_thin_wall() {
    _ = pretty_env_logger::try_init();

    let island = thin_sliver(0.4, 20.0);
    let ext_flow = flow(0.4, 0.45, 0.4, 0.2);
    let mut params = PerimeterParams::new(2, ext_flow, ext_flow);
    params.thin_walls_min_width = from_mm(0.2);

    let out = generate_perimeters(&island, &params, &NeverBridges);

    assert!(out.contours.is_empty(), "a 0.4mm rectangle has no room for a closed perimeter loop");
    assert!(!out.thin_walls.is_empty(), "expected at least one thin-wall polyline");

    let longest = out
        .thin_walls
        .iter()
        .max_by(|a, b| a.length().partial_cmp(&b.length()).unwrap())
        .unwrap();
    let length_mm = longest.length() / SCALE as f64;
    assert!(length_mm > 5.0, "thin wall should run most of the 20mm rectangle, got {length_mm}mm");

    let avg_width_mm = longest.width().iter().map(|&w| w as f64 / SCALE as f64).sum::<f64>() / longest.width().len() as f64;
    assert!((0.2..=0.6).contains(&avg_width_mm), "width {avg_width_mm}mm outside admissible band");
}

/// S2: a 20mm square with perimeters=3 and ext_spacing=spacing=0.45mm
/// nests to exactly three contour loops and no thin walls or gap fills.
#[test]
fn s2_square_produces_three_nested_shells() {
    _ = pretty_env_logger::try_init();

    let f = flow(0.45, 0.45, 0.4, 0.2);
    let params = PerimeterParams::new(3, f, f);
    let out = generate_perimeters(&square(20.0), &params, &NeverBridges);

    assert_eq!(out.contours.len(), 1, "one island, one contour tree");
    let mut loop_count = 0usize;
    for root in &out.contours {
        root.visit(&mut |_| loop_count += 1);
    }
    assert_eq!(loop_count, 3, "expected three nested contour loops");
    assert!(out.thin_walls.is_empty());
    assert!(out.gap_fill.is_empty());

    let area = area_mm2(&out.infill_seed);
    assert!(area > 200.0 && area < 360.0, "infill_seed area {area}mm^2 should be near a ~17.3mm square");
}

/// S3: a 100x100 square with a centered 50x50 hole nests into one contour
/// tree of three contour loops, each wrapping exactly one (opposite-
/// orientation) hole loop.
#[test]
fn s3_square_with_hole_nests_contours_and_holes() {
    _ = pretty_env_logger::try_init();

    let f = flow(0.45, 0.45, 0.4, 0.2);
    let params = PerimeterParams::new(3, f, f);
    let island = square_with_square_hole(100.0, 50.0);
    let out = generate_perimeters(&island, &params, &NeverBridges);

    assert_eq!(out.contours.len(), 1);

    let mut contour_count = 0usize;
    let mut hole_count = 0usize;
    for root in &out.contours {
        root.visit(&mut |l| {
            if l.is_contour {
                contour_count += 1;
            } else {
                hole_count += 1;
            }
        });
    }
    assert_eq!(contour_count, 3);
    assert_eq!(hole_count, 3);

    fn check_nesting(node: &slicer_core::types::Loop, remaining_depth: i32) {
        assert_eq!(node.polygon.orientation(), Orientation::CounterClockwise);
        let holes: Vec<_> = node.children.iter().filter(|c| !c.is_contour).collect();
        assert_eq!(holes.len(), 1, "each contour should have exactly one hole child");
        assert_eq!(holes[0].polygon.orientation(), Orientation::Clockwise);

        let contours: Vec<_> = node.children.iter().filter(|c| c.is_contour).collect();
        if remaining_depth > 0 {
            assert_eq!(contours.len(), 1, "expected one nested contour child");
            check_nesting(contours[0], remaining_depth - 1);
        }
    }
    for root in &out.contours {
        check_nesting(root, 2);
    }
}

/// S4: two 5mm squares 0.6mm apart inside a 20mm boundary leave a thin
/// isthmus of material between them; it should come out as one gap-fill
/// polyline running the length of the gap.
#[test]
fn s4_narrow_gap_produces_one_gap_fill_polyline() {
    _ = pretty_env_logger::try_init();

    let (boundary, left, right) = two_squares_with_gap(20.0, 5.0, 0.6);
    let islands = difference(&[boundary], &[left, right]);
    assert_eq!(islands.len(), 1, "the boundary minus both obstacles is still one connected island");

    let f = flow(0.45, 0.45, 0.4, 0.2);
    let mut params = PerimeterParams::new(1, f, f);
    params.detect_thin_walls = false;
    params.overhangs = false;

    let out = generate_perimeters(&islands[0], &params, &NeverBridges);
    assert!(!out.gap_fill.is_empty(), "expected the narrow isthmus to be picked up as gap fill");

    let longest = out
        .gap_fill
        .iter()
        .max_by(|a, b| a.length().partial_cmp(&b.length()).unwrap())
        .unwrap();
    let length_mm = longest.length() / SCALE as f64;
    assert!((2.0..=8.0).contains(&length_mm), "gap fill length {length_mm}mm should run the ~5mm gap");

    let avg_width_mm = longest.width().iter().map(|&w| w as f64 / SCALE as f64).sum::<f64>() / longest.width().len() as f64;
    assert!((0.2..=1.0).contains(&avg_width_mm), "gap fill width {avg_width_mm}mm should be near 0.6mm");
}

/// Runs `detect_top_bottom` for one synthetic layer and packs the result
/// into a `LayerView` the way a caller building a neighbor stack would.
fn classified_layer(index: usize, ex: ExPoly, upper: &[ExPoly], lower: &[ExPoly]) -> (LayerView, Vec<Surface>) {
    let surfaces = detect_top_bottom(&[ex.clone()], upper, lower, from_mm(0.45), false);
    let top_surfaces = surfaces.iter().filter(|s| s.tag.position == Position::Top).map(|s| s.expoly.clone()).collect();
    let bottom_surfaces =
        surfaces.iter().filter(|s| s.tag.position == Position::Bottom).map(|s| s.expoly.clone()).collect();
    let internal_sparse_surfaces = surfaces
        .iter()
        .filter(|s| s.tag.position == Position::Internal && s.tag.density == Density::Sparse)
        .map(|s| s.expoly.clone())
        .collect();
    let view = LayerView {
        index,
        print_z: from_mm(0.2 * (index as f64 + 1.0)),
        height: from_mm(0.2),
        slices: vec![ex],
        top_surfaces,
        bottom_surfaces,
        internal_sparse_surfaces,
    };
    (view, surfaces)
}

/// S5: a three-layer stepped dome (shrinking upper-slice projections).
/// The topmost layer is entirely `Top`; the two layers below it get their
/// internal area promoted to `Internal|Solid` by vertical-shell
/// enforcement projecting that `Top` surface down.
#[test]
fn s5_top_of_dome_promotes_layers_below_to_internal_solid() {
    _ = pretty_env_logger::try_init();

    let l0 = square(20.0);
    let l1 = square(16.0);
    let l2 = square(12.0);

    let (view2, surfaces2) = classified_layer(2, l2.clone(), &[], &[l1.clone()]);
    assert!(
        surfaces2.iter().all(|s| s.tag.position == Position::Top),
        "topmost layer should be entirely Top"
    );

    let (view1, surfaces1) = classified_layer(1, l1.clone(), &[l2.clone()], &[l0.clone()]);
    let internal1: Vec<Surface> = surfaces1.iter().filter(|s| s.tag.position == Position::Internal).cloned().collect();
    assert!(!internal1.is_empty(), "the area under the topmost layer should start out internal");

    let shell_ctx1 = ShellContext {
        this_layer: &view1,
        neighbors_above: std::slice::from_ref(&view2),
        neighbors_below: &[],
        top_solid_layers: 1,
        bottom_solid_layers: 0,
        top_solid_min_thickness: 0,
        bottom_solid_min_thickness: 0,
        min_infill_spacing: from_mm(0.5),
    };
    let promoted1 = enforce_vertical_shells(&internal1, &shell_ctx1, &[]);
    assert!(!promoted1.is_empty(), "layer directly below the dome top should get vertical-shell solid area");
    assert!(promoted1.iter().all(|s| s.tag.density == Density::Solid));

    let (view0, surfaces0) = classified_layer(0, l0.clone(), &[l1.clone()], &[l0.clone()]);
    let internal0: Vec<Surface> = surfaces0.iter().filter(|s| s.tag.position == Position::Internal).cloned().collect();
    assert!(!internal0.is_empty());

    let neighbors_above0 = [view1, view2];
    let shell_ctx0 = ShellContext {
        this_layer: &view0,
        neighbors_above: &neighbors_above0,
        neighbors_below: &[],
        top_solid_layers: 2,
        bottom_solid_layers: 0,
        top_solid_min_thickness: 0,
        bottom_solid_min_thickness: 0,
        min_infill_spacing: from_mm(0.5),
    };
    let promoted0 = enforce_vertical_shells(&internal0, &shell_ctx0, &[]);
    assert!(!promoted0.is_empty(), "two layers below the dome top should get vertical-shell solid area");
}

/// S6: a flat slab resting on posts that leave a central sparse pocket.
/// The part of the slab's `Internal|Solid` surface over the pocket should
/// promote to `Internal|Solid|Bridge`; the part over the posts should not.
#[test]
fn s6_bridge_over_sparse_pocket() {
    _ = pretty_env_logger::try_init();

    let lower = LayerView {
        index: 0,
        print_z: from_mm(0.2),
        height: from_mm(0.2),
        slices: vec![square(20.0)],
        top_surfaces: Vec::new(),
        bottom_surfaces: Vec::new(),
        internal_sparse_surfaces: vec![square(8.0)],
    };
    let slab = vec![Surface::new(square(20.0), SurfaceTag::internal_solid())];

    let out = bridge_over_infill(&slab, std::slice::from_ref(&lower), from_mm(0.45), false);

    let bridge_area = area_mm2(
        &out.iter().filter(|s| s.tag == SurfaceTag::internal_solid_bridge()).map(|s| s.expoly.clone()).collect::<Vec<_>>(),
    );
    let plain_area = area_mm2(
        &out.iter().filter(|s| s.tag == SurfaceTag::internal_solid()).map(|s| s.expoly.clone()).collect::<Vec<_>>(),
    );

    assert!(bridge_area > 30.0 && bridge_area < 90.0, "bridge area {bridge_area}mm^2 should track the ~8mm pocket");
    assert!(plain_area > 300.0, "the rest of the slab should stay plain Internal|Solid");
    assert!((bridge_area + plain_area - 400.0).abs() < 10.0, "promotion should partition the slab, not lose area");
}
