#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_debug_implementations)]
//! `slicer-geom` defines the fixed-point 2D primitive types shared by the
//! toolpath synthesis core: [`Point`], [`Polygon`], [`ExPoly`].
//!
//! In most cases you only need this crate if you're a crate author who wants
//! to pass geometry in or out of [`slicer-core`](https://crates.io/crates/slicer-core)
//! without depending on the full algorithmic core.
//!
//! # Coordinates
//!
//! All geometry is fixed-point: a [`Coord`] is a scaled `i64`, with [`SCALE`]
//! units per millimetre. Every distance-bearing computation in this crate and
//! in `slicer-core` is carried out on these integers so that results are
//! reproducible bit-for-bit across platforms; conversion to/from millimetres
//! happens only at the edges ([`to_mm`], [`from_mm`]).

extern crate alloc;

mod coord;
mod error;
mod expoly;
mod macros;
mod point;
mod polygon;

pub use coord::{from_mm, to_mm, Coord, EPS_S, EPS_U, SCALE};
pub use error::Error;
pub use expoly::ExPoly;
pub use point::Point;
pub use polygon::{Orientation, Polygon};

/// Result alias used throughout `slicer-geom`.
pub type Result<T> = core::result::Result<T, Error>;
