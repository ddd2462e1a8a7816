use core::fmt;

/// Failures reported by the reconstruction core.
///
/// Every variant is local to one event: callers skip the event and move on.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A grid with zero cells was handed to an operator.
    EmptyGrid,
    /// A grid does not have the dimensions the operator expects.
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    /// Grid topology parameters cannot describe a closed sphere.
    InvalidTopology(String),
    /// An operator parameter is out of its valid range.
    InvalidParameter(String),
    /// The fitter received more candidates than it can pair.
    AmbiguousTrackInput { count: usize },
    /// A sensor id points past the end of the sensor table.
    SensorOutOfRange { id: usize, len: usize },
    /// Run configuration could not be read or parsed.
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid => write!(f, "grid has no cells"),
            Self::DimensionMismatch { expected, actual } => write!(
                f,
                "dimension mismatch: expected {}x{}, got {}x{}",
                expected.0, expected.1, actual.0, actual.1
            ),
            Self::InvalidTopology(msg) => write!(f, "invalid grid topology: {msg}"),
            Self::InvalidParameter(msg) => write!(f, "invalid parameter: {msg}"),
            Self::AmbiguousTrackInput { count } => {
                write!(f, "cannot fit a track through {count} candidates")
            }
            Self::SensorOutOfRange { id, len } => {
                write!(f, "sensor id {id} outside table of {len} sensors")
            }
            Self::Config(msg) => write!(f, "config error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
