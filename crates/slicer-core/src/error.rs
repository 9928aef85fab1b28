use core::fmt;

/// The observable error kinds of the toolpath core (spec §7).
///
/// Most of these are *recoverable*: a component that hits
/// [`SlicerError::InputGeometryInvalid`], [`SlicerError::NumericalOverflow`]
/// or [`SlicerError::ExtensionMiss`] logs a `warn!` and skips the affected
/// island/edge/polyline rather than propagating an `Err` — see each
/// variant's doc comment. Only [`SlicerError::CancellationRequested`] and an
/// unrecoverable [`SlicerError::VoronoiDegenerate`] (both retries exhausted)
/// are meant to unwind out of a component entry point.
#[derive(Debug, Clone, PartialEq)]
pub enum SlicerError {
    /// A non-simple polygon, zero-area region, or NaN vertex reached a
    /// component. Recovery: skip the affected island/layer.
    InputGeometryInvalid(String),
    /// The induced area ratio of a medial-axis skeleton fell outside
    /// `[1/1.1, 1.1]` even after the `+EPS_S` retry (§4.1, Failure
    /// semantics). Recovery: none left; the caller gets this as a hard
    /// error for that one `medial_axis` invocation.
    VoronoiDegenerate { ratio: f64 },
    /// A vertex exceeded the maximum representable offset coordinate.
    /// Recovery: the offending edge is dropped from the MAX valid-set.
    NumericalOverflow,
    /// A free-endpoint line extension found no intersection with `bounds`
    /// and no anchor region. Recovery: the polyline is deleted, not an
    /// error — callers should not normally see this variant returned.
    ExtensionMiss,
    /// A caller-installed [`crate::CancellationToken`] signalled
    /// cancellation between layers or at the start of a region loop.
    /// Propagates as an early unwind; no partial output is produced.
    CancellationRequested,
}

impl fmt::Display for SlicerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlicerError::InputGeometryInvalid(msg) => {
                write!(f, "input geometry invalid: {msg}")
            }
            SlicerError::VoronoiDegenerate { ratio } => {
                write!(f, "voronoi skeleton degenerate, area ratio {ratio:.4} outside [1/1.1, 1.1]")
            }
            SlicerError::NumericalOverflow => write!(f, "coordinate exceeds representable range"),
            SlicerError::ExtensionMiss => write!(f, "endpoint extension found no anchor"),
            SlicerError::CancellationRequested => write!(f, "cancellation requested"),
        }
    }
}

impl std::error::Error for SlicerError {}

pub type Result<T> = std::result::Result<T, SlicerError>;
