//! `VD`/`ROT`: segment Voronoi diagram construction over a set of input
//! line segments, exposing a vertex/edge/cell graph with twin pointers and
//! rotation order around each vertex (spec §2.1).
//!
//! Built on `boostvoronoi`, the same segment-Voronoi engine used for
//! centerline extraction elsewhere in the ecosystem (`hallr`'s `centerline`
//! command wraps the identical `Builder`/`Diagram` API this module calls
//! directly).

mod segment_vd;

pub use segment_vd::{build, SegmentVd, VdCell, VdEdge, VdSourceCategory, VdVertex};
