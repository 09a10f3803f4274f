//! The local thickness pipeline.
//!
//! Four sequential stages over a binary volume (distance transform,
//! distance ridge, ball covering, border clean-up) plus an optional trim
//! against the input mask. Each stage is a pure function over the previous
//! stage's volume and is exported for stepwise use; the driver sequences
//! them and drops every intermediate as soon as the next stage returns.
pub mod cleanup;
pub mod edt;
pub mod local;
pub mod ridge;
pub mod trim;

pub use cleanup::cleanup;
pub use edt::edt;
pub use local::local_thickness;
pub use ridge::distance_ridge;
pub use trim::mask_trim;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::volume::{BinaryVolume, Config, FloatVolume};

/// Computes the local thickness map of `input`: every foreground voxel
/// receives the diameter of the largest foreground ball covering it.
pub fn compute_local_thickness(input: &BinaryVolume, cfg: &Config) -> Result<FloatVolume> {
    run_guarded(input, cfg, None)
}

/// Like [`compute_local_thickness`], but checks `cancel` between stages
/// and returns [`Error::Cancelled`] once it is set. Stages themselves run
/// to completion; no partial output is returned.
pub fn compute_local_thickness_cancellable(
    input: &BinaryVolume,
    cfg: &Config,
    cancel: &AtomicBool,
) -> Result<FloatVolume> {
    run_guarded(input, cfg, Some(cancel))
}

fn run_guarded(
    input: &BinaryVolume,
    cfg: &Config,
    cancel: Option<&AtomicBool>,
) -> Result<FloatVolume> {
    cfg.validate()?;
    // A panicking worker unwinds out of its stage; surface it as an error
    // instead of unwinding through the public entry point.
    match panic::catch_unwind(AssertUnwindSafe(|| run_stages(input, cfg, cancel))) {
        Ok(result) => result,
        Err(payload) => Err(Error::WorkerFault(panic_message(payload))),
    }
}

fn run_stages(
    input: &BinaryVolume,
    cfg: &Config,
    cancel: Option<&AtomicBool>,
) -> Result<FloatVolume> {
    let (w, h, d) = input.dim();
    info!("Computing local thickness of a {w}x{h}x{d} volume.");
    let started = Instant::now();

    check_cancelled(cancel)?;
    let stage = Instant::now();
    let distances = edt(input, cfg)?;
    debug!("Distance transform took {:?}.", stage.elapsed());

    check_cancelled(cancel)?;
    let stage = Instant::now();
    let ridge = distance_ridge(&distances);
    drop(distances);
    debug!("Distance ridge took {:?}.", stage.elapsed());

    check_cancelled(cancel)?;
    let stage = Instant::now();
    let covered = local_thickness(&ridge);
    drop(ridge);
    debug!("Ball covering took {:?}.", stage.elapsed());

    check_cancelled(cancel)?;
    let stage = Instant::now();
    let mut result = cleanup(&covered);
    drop(covered);
    debug!("Clean-up took {:?}.", stage.elapsed());

    if cfg.mask_trim {
        check_cancelled(cancel)?;
        let stage = Instant::now();
        result = mask_trim(&result, input, cfg)?;
        debug!("Mask trim took {:?}.", stage.elapsed());
    }

    info!("Local thickness finished in {:?}.", started.elapsed());
    Ok(result)
}

fn check_cancelled(cancel: Option<&AtomicBool>) -> Result<()> {
    match cancel {
        Some(flag) if flag.load(Ordering::Relaxed) => Err(Error::Cancelled),
        _ => Ok(()),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}
