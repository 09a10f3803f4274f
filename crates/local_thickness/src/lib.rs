#![forbid(unsafe_code)]
//! local_thickness: Hildebrand-Ruegsegger local thickness maps for binary 3D volumes.
//!
//! Every foreground voxel receives the diameter of the largest ball that
//! fits entirely inside the foreground and covers it, computed by a
//! four-stage pipeline: Euclidean distance transform, distance-ridge
//! extraction, ball covering, and border clean-up, with an optional trim
//! against the input mask.
//!
//! Modules:
//! - volume: input/output voxel grids and the classification config
//! - thickness: pipeline stages and the sequencing driver
pub mod error;
pub mod thickness;
pub mod volume;

/// Convenient re-exports for common types. Import with `use local_thickness::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::thickness::{
        cleanup, compute_local_thickness, compute_local_thickness_cancellable, distance_ridge,
        edt, local_thickness, mask_trim,
    };
    pub use crate::volume::{BinaryVolume, Config, FloatVolume};
}
