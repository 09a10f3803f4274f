//! Border clean-up and radius-to-diameter conversion.
//!
//! The covering pass underestimates voxels near the surface because balls
//! cannot extend outside the foreground. Border voxels (foreground with a
//! background 26-neighbor) are replaced by the mean of their interior
//! neighbors; all values are then doubled into diameters.
use rayon::prelude::*;

use crate::volume::FloatVolume;

const BORDER: f32 = -1.0;

/// Averages border voxels from their interior neighbors and doubles every
/// radius into a diameter. Background voxels stay 0.
pub fn cleanup(thickness: &FloatVolume) -> FloatVolume {
    let (w, h, _) = thickness.dim();

    // Phase 1: tag every voxel as background (0), border (-1) or interior
    // (its own value). Out-of-bounds counts as background.
    let mut flags = FloatVolume::zeros_like(thickness);
    flags
        .data
        .par_chunks_mut(w * h)
        .enumerate()
        .for_each(|(k, slice)| {
            for j in 0..h {
                for i in 0..w {
                    let v = thickness.get(i, j, k);
                    slice[j * w + i] = if v == 0.0 {
                        0.0
                    } else if has_background_neighbor(thickness, i, j, k) {
                        BORDER
                    } else {
                        v
                    };
                }
            }
        });

    // Phase 2: resolve borders from the flag snapshot. Only interior
    // (positive) neighbors contribute, so the result does not depend on
    // the order borders are visited in.
    let mut out = FloatVolume::zeros_like(thickness);
    out.data
        .par_chunks_mut(w * h)
        .enumerate()
        .for_each(|(k, slice)| {
            for j in 0..h {
                for i in 0..w {
                    let flag = flags.get(i, j, k);
                    slice[j * w + i] = if flag == BORDER {
                        match interior_neighbor_mean(&flags, i, j, k) {
                            Some(mean) => -mean,
                            None => -thickness.get(i, j, k),
                        }
                    } else {
                        flag
                    };
                }
            }
        });

    // Phase 3: strip the border markers and convert radius to diameter.
    out.data.par_chunks_mut(w * h).for_each(|slice| {
        for v in slice.iter_mut() {
            *v = 2.0 * v.abs();
        }
    });

    out
}

fn has_background_neighbor(volume: &FloatVolume, x: usize, y: usize, z: usize) -> bool {
    let (w, h, d) = volume.dim();
    for dz in -1i64..=1 {
        for dy in -1i64..=1 {
            for dx in -1i64..=1 {
                if dx == 0 && dy == 0 && dz == 0 {
                    continue;
                }
                let (xn, yn, zn) = (x as i64 + dx, y as i64 + dy, z as i64 + dz);
                if xn < 0 || yn < 0 || zn < 0 {
                    return true;
                }
                let (xn, yn, zn) = (xn as usize, yn as usize, zn as usize);
                if xn >= w || yn >= h || zn >= d {
                    return true;
                }
                if volume.get(xn, yn, zn) == 0.0 {
                    return true;
                }
            }
        }
    }
    false
}

/// Mean over the strictly positive 26-neighbors, `None` when there is no
/// such neighbor.
fn interior_neighbor_mean(flags: &FloatVolume, x: usize, y: usize, z: usize) -> Option<f32> {
    let (w, h, d) = flags.dim();
    let mut sum = 0.0f32;
    let mut count = 0u32;
    for dz in -1i64..=1 {
        for dy in -1i64..=1 {
            for dx in -1i64..=1 {
                if dx == 0 && dy == 0 && dz == 0 {
                    continue;
                }
                let (xn, yn, zn) = (x as i64 + dx, y as i64 + dy, z as i64 + dz);
                if xn < 0 || yn < 0 || zn < 0 {
                    continue;
                }
                let (xn, yn, zn) = (xn as usize, yn as usize, zn as usize);
                if xn >= w || yn >= h || zn >= d {
                    continue;
                }
                let v = flags.get(xn, yn, zn);
                if v > 0.0 {
                    sum += v;
                    count += 1;
                }
            }
        }
    }
    (count > 0).then(|| sum / count as f32)
}
