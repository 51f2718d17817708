use std::{error::Error, fmt, io};

use crate::initialization::RandErr;

/// The result type used across the whole crate.
pub type Result<T> = std::result::Result<T, BprErr>;

/// Every failure a training call can report.
///
/// Configuration errors are raised before any training work begins, input errors
/// are raised while converting the interactions or validating existing factors.
#[derive(Debug)]
pub enum BprErr {
    /// A training parameter is out of its valid range.
    InvalidConfig(String),
    /// The device offload path was requested but no accelerator is registered.
    DeviceUnavailable,
    /// The worker pool for the training call couldn't be created.
    ThreadPool(rayon::ThreadPoolBuildError),
    /// There are no observed interactions to sample from.
    EmptyInteractions,
    ShapeMismatch {
        what: &'static str,
        got: (usize, usize),
        expected: (usize, usize),
    },
    LengthMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    InvalidIndex {
        what: &'static str,
        index: usize,
        bound: usize,
    },
    IdOverflow {
        what: &'static str,
        len: usize,
    },
    /// A failure reported by an accelerator backend.
    Device(String),
    Io(io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for BprErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::DeviceUnavailable => {
                f.write_str("invalid config: device offload requested but no accelerator is available")
            }
            Self::ThreadPool(e) => write!(f, "failed to build the worker pool: {e}"),
            Self::EmptyInteractions => {
                f.write_str("the interaction matrix has no observed entries")
            }
            Self::ShapeMismatch {
                what,
                got: (got_rows, got_cols),
                expected: (rows, cols),
            } => write!(
                f,
                "shape mismatch for {what}: got {got_rows}x{got_cols}, expected {rows}x{cols}"
            ),
            Self::LengthMismatch {
                what,
                got,
                expected,
            } => write!(f, "length mismatch for {what}: got {got}, expected {expected}"),
            Self::InvalidIndex { what, index, bound } => {
                write!(f, "{what} index {index} is out of bounds for size {bound}")
            }
            Self::IdOverflow { what, len } => {
                write!(f, "{len} {what} don't fit in 32 bit ids")
            }
            Self::Device(msg) => write!(f, "device error: {msg}"),
            Self::Io(e) => write!(f, "io error: {e}"),
            Self::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl Error for BprErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ThreadPool(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for BprErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for BprErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<rayon::ThreadPoolBuildError> for BprErr {
    fn from(value: rayon::ThreadPoolBuildError) -> Self {
        Self::ThreadPool(value)
    }
}

impl From<RandErr> for BprErr {
    fn from(value: RandErr) -> Self {
        Self::InvalidConfig(value.to_string())
    }
}

/// Boundary conversion for the binary.
impl From<BprErr> for io::Error {
    fn from(value: BprErr) -> Self {
        match value {
            BprErr::Io(e) => e,
            other => io::Error::new(io::ErrorKind::InvalidInput, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_round_trip_through_the_boundary() {
        let err = BprErr::from(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let io_err = io::Error::from(err);
        assert_eq!(io_err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn config_errors_become_invalid_input() {
        let io_err = io::Error::from(BprErr::DeviceUnavailable);
        assert_eq!(io_err.kind(), io::ErrorKind::InvalidInput);
        assert!(io_err.to_string().contains("accelerator"));
    }

    #[test]
    fn shape_mismatch_is_readable() {
        let err = BprErr::ShapeMismatch {
            what: "item factors",
            got: (3, 4),
            expected: (3, 5),
        };
        assert_eq!(
            err.to_string(),
            "shape mismatch for item factors: got 3x4, expected 3x5"
        );
    }
}
