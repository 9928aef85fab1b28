//! The thirteen-step post-processing pipeline of spec §4.1.5, split across
//! two files by what each step does: [`merge`] joins polylines together,
//! [`trim`] removes or splits them. [`super::extend`], [`super::overextrude`],
//! [`super::grow`] and [`super::taper`] hold the remaining steps (5, 10, 11,
//! 12), which don't fit either grouping.

mod merge;
mod trim;

pub use merge::{concat, concatenate_with_crossing, fusion_corners, fusion_curve, main_fusion};
pub use trim::{remove_bits, remove_too_short_polylines, remove_too_thin_extrusion, remove_too_thin_points};
