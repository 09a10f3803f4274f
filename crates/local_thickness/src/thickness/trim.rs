//! Optional trim of the thickness map against the input mask.
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::volume::{BinaryVolume, Config, FloatVolume};

/// Returns a copy of `thickness` with every voxel zeroed whose input byte
/// classifies as background under `cfg`. Neither input is mutated.
pub fn mask_trim(
    thickness: &FloatVolume,
    input: &BinaryVolume,
    cfg: &Config,
) -> Result<FloatVolume> {
    cfg.validate()?;
    if thickness.dim() != input.dim() {
        return Err(Error::ShapeMismatch {
            expected: input.dim(),
            actual: thickness.dim(),
        });
    }

    let mut out = thickness.clone();
    out.data
        .par_iter_mut()
        .zip(input.data.par_iter())
        .for_each(|(v, &byte)| {
            if cfg.is_background(byte) {
                *v = 0.0;
            }
        });
    Ok(out)
}
