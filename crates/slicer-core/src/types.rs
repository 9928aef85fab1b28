//! The shared value types produced and consumed across MAX/PG/IRC (spec §3
//! Data Model). Everything here is a plain value type passed by reference;
//! no entity holds a back-pointer into another stage's data (§9 Patterns to
//! re-architect — "Shared mutable state with back-pointers").

use slicer_geom::{Coord, ExPoly, Point, Polygon};

/// A variable-width centerline polyline: MAX's sole output, and the input
/// to thin-wall/gap-fill extrusion.
///
/// `width[i]` is the full extrusion width at `pts[i]`; `endpoints.0`/`.1`
/// say whether the first/last point is a free (non-junction, non-loop)
/// endpoint. A closed loop has both flags `false` and, by construction,
/// `pts[0] == pts[pts.len() - 1]` is **not** required — the loop closes
/// implicitly between the last and first point, matching [`Polygon`]'s own
/// convention.
#[derive(Debug, Clone, PartialEq)]
pub struct ThickPolyline {
    pts: Vec<Point>,
    width: Vec<Coord>,
    endpoints: (bool, bool),
}

impl ThickPolyline {
    pub fn new(pts: Vec<Point>, width: Vec<Coord>, endpoints: (bool, bool)) -> Self {
        assert_eq!(pts.len(), width.len(), "width must track pts 1:1");
        ThickPolyline { pts, width, endpoints }
    }

    #[inline]
    pub fn pts(&self) -> &[Point] {
        &self.pts
    }

    #[inline]
    pub fn width(&self) -> &[Coord] {
        &self.width
    }

    #[inline]
    pub fn endpoints(&self) -> (bool, bool) {
        self.endpoints
    }

    #[inline]
    pub fn is_loop(&self) -> bool {
        !self.endpoints.0 && !self.endpoints.1
    }

    pub fn len(&self) -> usize {
        self.pts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pts.is_empty()
    }

    /// Total centerline length, scaled-`Coord` units.
    pub fn length(&self) -> f64 {
        self.pts.windows(2).map(|w| w[0].dist(w[1])).sum()
    }

    /// Reverses point order, width order, and swaps the endpoint flags.
    /// Property 4 (§8.1): the set of emitted extrusion segments is
    /// unchanged by this operation.
    pub fn reverse(&mut self) {
        self.pts.reverse();
        self.width.reverse();
        self.endpoints = (self.endpoints.1, self.endpoints.0);
    }

    pub fn reversed(&self) -> Self {
        let mut c = self.clone();
        c.reverse();
        c
    }

    /// Mutable access used by the post-processing pipeline stages; kept
    /// crate-private so invariants (matching lengths) stay enforced at the
    /// module boundary.
    pub(crate) fn parts_mut(&mut self) -> (&mut Vec<Point>, &mut Vec<Coord>, &mut (bool, bool)) {
        (&mut self.pts, &mut self.width, &mut self.endpoints)
    }

    pub(crate) fn into_parts(self) -> (Vec<Point>, Vec<Coord>, (bool, bool)) {
        (self.pts, self.width, self.endpoints)
    }
}

/// The extrusion role assigned to one edge of a perimeter [`Loop`] (spec
/// §4.2.3, §6.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerimeterRole {
    ExternalPerimeter,
    Perimeter,
    OverhangPerimeter,
}

/// One onion-shell ring produced by perimeter generation, with its nesting
/// children (spec §3, §4.2.2).
///
/// `roles` has one entry per edge of `polygon` (i.e. `roles.len() ==
/// polygon.len()`), so that an overhang-classified loop can carry a
/// per-point role partition (Property 7, §8.1) instead of one role for the
/// whole ring.
#[derive(Debug, Clone)]
pub struct Loop {
    pub polygon: Polygon,
    pub depth: u32,
    pub is_contour: bool,
    pub has_overhang: bool,
    pub roles: Vec<PerimeterRole>,
    pub children: Vec<Loop>,
}

impl Loop {
    pub fn new_uniform(polygon: Polygon, depth: u32, is_contour: bool, role: PerimeterRole) -> Self {
        let roles = vec![role; polygon.len()];
        Loop {
            polygon,
            depth,
            is_contour,
            has_overhang: false,
            roles,
            children: Vec::new(),
        }
    }

    /// Visits every loop in the tree rooted at `self`, depth-first.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Loop)) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }
}

/// Horizontal position class of a [`Surface`] (spec §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Top,
    Bottom,
    Internal,
}

/// Fill density class of a [`Surface`] (spec §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Density {
    Solid,
    Sparse,
    Void,
}

/// Modifier orthogonal to position/density (spec §3, §4.3.3).
///
/// `OverBridge` marks internal-solid surfaces that sit directly above a
/// `Bridge` surface, the "reinforce the layer over a bridge" case; the
/// distilled spec names the bit but doesn't spell out its trigger, so this
/// is an explicit Open Question resolution — see `DESIGN.md`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    None,
    Bridge,
    OverBridge,
}

/// The bitfield `(position, density, modifier)` tag of a [`Surface`] (spec
/// §3, §4.3). Only the combinations spelled out in §4.3 /
/// §1 ("top / bottom / bottom-bridge / internal-solid / internal-sparse /
/// internal-void / bridge-over-sparse") are constructible; [`SurfaceTag::new`]
/// rejects the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceTag {
    pub position: Position,
    pub density: Density,
    pub modifier: Modifier,
}

impl SurfaceTag {
    pub fn new(position: Position, density: Density, modifier: Modifier) -> Option<Self> {
        use Density::*;
        use Modifier::*;
        use Position::*;
        let valid = matches!(
            (position, density, modifier),
            (Top, Solid, None)
                | (Bottom, Solid, None)
                | (Bottom, Solid, Bridge)
                | (Internal, Solid, None)
                | (Internal, Solid, Bridge)
                | (Internal, Solid, OverBridge)
                | (Internal, Sparse, None)
                | (Internal, Void, None)
        );
        valid.then_some(SurfaceTag { position, density, modifier })
    }

    pub fn top() -> Self {
        Self::new(Position::Top, Density::Solid, Modifier::None).unwrap()
    }
    pub fn bottom() -> Self {
        Self::new(Position::Bottom, Density::Solid, Modifier::None).unwrap()
    }
    pub fn bottom_bridge() -> Self {
        Self::new(Position::Bottom, Density::Solid, Modifier::Bridge).unwrap()
    }
    pub fn internal_solid() -> Self {
        Self::new(Position::Internal, Density::Solid, Modifier::None).unwrap()
    }
    pub fn internal_solid_bridge() -> Self {
        Self::new(Position::Internal, Density::Solid, Modifier::Bridge).unwrap()
    }
    pub fn internal_solid_over_bridge() -> Self {
        Self::new(Position::Internal, Density::Solid, Modifier::OverBridge).unwrap()
    }
    pub fn internal_sparse() -> Self {
        Self::new(Position::Internal, Density::Sparse, Modifier::None).unwrap()
    }
    pub fn internal_void() -> Self {
        Self::new(Position::Internal, Density::Void, Modifier::None).unwrap()
    }

    pub fn is_solid(&self) -> bool {
        self.density == Density::Solid
    }

    pub fn is_internal(&self) -> bool {
        self.position == Position::Internal
    }
}

/// A classified fill region: PG seeds these as `Internal|Sparse`, then IRC
/// repeatedly rewrites `tag` (and occasionally splits one `Surface` into
/// several) in place (spec §3, §4.3).
#[derive(Debug, Clone)]
pub struct Surface {
    /// The unfilled interior (the infill boundary), not the perimeter ring.
    pub expoly: ExPoly,
    pub tag: SurfaceTag,
    /// Layer thickness this surface represents, in mm (for solid infill
    /// volume bookkeeping across `solid_infill_every_layers`).
    pub thickness_layers: u32,
    pub extra_perimeters: u32,
    pub bridge_angle: Option<f64>,
    pub max_solid_above: Option<u32>,
    pub priority: u32,
}

impl Surface {
    pub fn new(expoly: ExPoly, tag: SurfaceTag) -> Self {
        Surface {
            expoly,
            tag,
            thickness_layers: 1,
            extra_perimeters: 0,
            bridge_angle: None,
            max_solid_above: None,
            priority: 0,
        }
    }
}

/// An immutable snapshot of one layer's upstream metadata, handed into IRC
/// routines instead of a back-pointer to a mutable `Layer`/`PrintObject`
/// (spec §9 "Shared mutable state with back-pointers").
///
/// `top_surfaces`/`bottom_surfaces`/`internal_sparse_surfaces` are this
/// layer's own §4.3.1-classified surfaces (not its raw `slices`) — callers
/// building a neighbor stack for [`crate::infill::ShellContext`] or
/// `bridge_over_infill` run `detect_top_bottom` on each layer first and
/// carry the result here, since `slices` alone (a layer's full
/// cross-section) covers nearly all of any neighbor's internal area and
/// would make vertical-shell/bridge projection degenerate to "almost
/// everything".
#[derive(Debug, Clone)]
pub struct LayerView {
    pub index: usize,
    pub print_z: Coord,
    pub height: Coord,
    pub slices: Vec<ExPoly>,
    pub top_surfaces: Vec<ExPoly>,
    pub bottom_surfaces: Vec<ExPoly>,
    pub internal_sparse_surfaces: Vec<ExPoly>,
}
