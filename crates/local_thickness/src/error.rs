//! Error types and result alias for the crate.
//!
//! All variants are precondition violations reported at call entry; the
//! numerical pipeline itself has no recoverable failure states.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid volume shape {width}x{height}x{depth}: all dimensions must be >= 1")]
    InvalidShape {
        /// Width of the rejected shape.
        width: usize,
        /// Height of the rejected shape.
        height: usize,
        /// Depth of the rejected shape.
        depth: usize,
    },

    #[error("invalid threshold {threshold}: must be in 1..=255")]
    InvalidThreshold {
        /// The rejected threshold value.
        threshold: u8,
    },

    #[error("buffer holds {actual} voxels but the shape requires {expected}")]
    BufferSize {
        /// Voxel count implied by the shape.
        expected: usize,
        /// Voxel count actually supplied.
        actual: usize,
    },

    #[error("volume shapes disagree: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// Shape of the reference volume.
        expected: (usize, usize, usize),
        /// Shape of the offending volume.
        actual: (usize, usize, usize),
    },

    #[error("computation cancelled between stages")]
    Cancelled,

    #[error("worker thread panicked: {0}")]
    WorkerFault(
        /// Panic payload rendered as text.
        String,
    ),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_mismatch_reports_both_shapes() {
        let err = Error::ShapeMismatch {
            expected: (10, 10, 2),
            actual: (11, 10, 2),
        };
        let text = err.to_string();
        assert!(text.contains("(10, 10, 2)"));
        assert!(text.contains("(11, 10, 2)"));
    }

    #[test]
    fn invalid_threshold_names_the_value() {
        let err = Error::InvalidThreshold { threshold: 0 };
        assert!(err.to_string().contains('0'));
    }
}
