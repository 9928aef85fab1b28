use core::fmt;

/// Errors raised while constructing or validating `slicer-geom` values.
///
/// This mirrors the hand-written `std::error::Error` style used across the
/// rest of the toolpath core: a small, closed enum with a manual [`Display`]
/// impl rather than a derive-macro crate, since none of these types carry
/// more than a couple of formatted fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A coordinate was NaN or infinite.
    NonFiniteCoordinate { x: f64, y: f64 },
    /// A polygon ring had fewer than 3 distinct vertices after closing.
    DegenerateRing { len: usize },
    /// A hole was not strictly contained in its claimed outer ring.
    HoleNotContained,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NonFiniteCoordinate { x, y } => {
                write!(f, "non-finite coordinate ({x}, {y})")
            }
            Error::DegenerateRing { len } => {
                write!(f, "ring has only {len} vertices, need at least 3")
            }
            Error::HoleNotContained => write!(f, "hole is not contained in its outer ring"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
