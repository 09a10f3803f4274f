//! Squared Euclidean distance transform of the background set.
//!
//! Three separable integer passes (x, then y, then z) over a shared
//! squared-distance grid, after Saito and Toriwaki. Each foreground voxel
//! ends up holding its exact Euclidean distance to the nearest background
//! voxel; background voxels hold 0.
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::Result;
use crate::volume::{BinaryVolume, Config, FloatVolume};

/// Computes the Euclidean distance transform of `input` under `cfg`.
///
/// Distances are not squared in the returned volume. A volume with no
/// background voxel at all yields all zeros: with nothing to measure
/// from, distance is 0 by convention.
pub fn edt(input: &BinaryVolume, cfg: &Config) -> Result<FloatVolume> {
    cfg.validate()?;
    let (w, h, d) = input.dim();

    if !input.data.iter().any(|&v| cfg.is_background(v)) {
        warn!("Volume has no background voxels; distance map is all zeros.");
        return FloatVolume::new(w, h, d);
    }

    let n = w.max(h).max(d) as i64;
    // Exceeds any achievable squared distance; stands in for +infinity in
    // the per-axis minimum searches.
    let sentinel = 3 * (n + 1) * (n + 1);

    let mut sq = vec![0i64; w * h * d];
    step_x(input, cfg, sentinel, &mut sq);
    step_y(w, h, &mut sq);
    step_z(input, cfg, &mut sq);

    let mut out = FloatVolume::new(w, h, d)?;
    out.data
        .par_chunks_mut(w * h)
        .zip(sq.par_chunks(w * h))
        .zip(input.data.par_chunks(w * h))
        .for_each(|((out_slice, sq_slice), src_slice)| {
            for (i, v) in out_slice.iter_mut().enumerate() {
                *v = if cfg.is_background(src_slice[i]) {
                    0.0
                } else {
                    (sq_slice[i] as f64).sqrt() as f32
                };
            }
        });

    debug!("Distance transform done; max distance {}.", out.max_value());
    Ok(out)
}

/// Step 1: per row, squared distance to the nearest background along x.
fn step_x(input: &BinaryVolume, cfg: &Config, sentinel: i64, sq: &mut [i64]) {
    let (w, h, _) = input.dim();
    sq.par_chunks_mut(w * h)
        .zip(input.data.par_chunks(w * h))
        .for_each(|(slice, src)| {
            let mut background = vec![false; w];
            for j in 0..h {
                let row = &mut slice[j * w..(j + 1) * w];
                for (x, flag) in background.iter_mut().enumerate() {
                    *flag = cfg.is_background(src[j * w + x]);
                }
                for x in 0..w {
                    if background[x] {
                        row[x] = 0;
                        continue;
                    }
                    let mut best = sentinel;
                    for (xb, &bg) in background.iter().enumerate().skip(x + 1) {
                        if bg {
                            let delta = (xb - x) as i64;
                            best = delta * delta;
                            break;
                        }
                    }
                    for xb in (0..x).rev() {
                        if background[xb] {
                            let delta = (x - xb) as i64;
                            best = best.min(delta * delta);
                            break;
                        }
                    }
                    row[x] = best;
                }
            }
        });
}

/// Step 2: fold y-axis offsets into each slice's squared distances.
fn step_y(w: usize, h: usize, sq: &mut [i64]) {
    sq.par_chunks_mut(w * h).for_each(|slice| {
        let mut temp = vec![0i64; h];
        for i in 0..w {
            let mut all_zero = true;
            for (j, t) in temp.iter_mut().enumerate() {
                *t = slice[i + w * j];
                all_zero &= *t == 0;
            }
            if all_zero {
                continue;
            }
            for j in 0..h {
                let mut best = temp[j];
                for (y, &t) in temp.iter().enumerate() {
                    let delta = j as i64 - y as i64;
                    let test = t + delta * delta;
                    if test < best {
                        best = test;
                    }
                }
                slice[i + w * j] = best;
            }
        }
    });
}

/// Step 3: fold z-axis offsets, re-checking the original classification so
/// background voxels stay 0.
fn step_z(input: &BinaryVolume, cfg: &Config, sq: &mut [i64]) {
    let (w, h, d) = input.dim();

    // Writes for a fixed y cross every slice, so each worker produces its
    // y-plane into a fresh buffer and the result is scattered afterwards.
    let sq_view: &[i64] = sq;
    let planes: Vec<Vec<i64>> = (0..h)
        .into_par_iter()
        .map(|j| {
            let mut plane = vec![0i64; w * d];
            let mut temp = vec![0i64; d];
            for i in 0..w {
                let mut all_zero = true;
                for (k, t) in temp.iter_mut().enumerate() {
                    *t = sq_view[i + w * (j + h * k)];
                    all_zero &= *t == 0;
                }
                if all_zero {
                    continue;
                }

                let z_start = temp
                    .iter()
                    .position(|&v| v != 0)
                    .map_or(0, |z| z.saturating_sub(1));
                let z_stop = temp
                    .iter()
                    .rposition(|&v| v != 0)
                    .map_or(d - 1, |z| (z + 1).min(d - 1));

                for k in 0..d {
                    if cfg.is_background(input.get(i, j, k)) {
                        plane[i + w * k] = temp[k];
                        continue;
                    }
                    let lo = z_start.min(k);
                    let hi = z_stop.max(k);
                    let mut best = temp[k];
                    for (z, &t) in temp.iter().enumerate().take(hi + 1).skip(lo) {
                        let delta = k as i64 - z as i64;
                        let test = t + delta * delta;
                        if test < best {
                            best = test;
                        }
                    }
                    plane[i + w * k] = best;
                }
            }
            plane
        })
        .collect();

    sq.par_chunks_mut(w * h)
        .enumerate()
        .for_each(|(k, slice)| {
            for (j, plane) in planes.iter().enumerate() {
                let row = &mut slice[j * w..(j + 1) * w];
                row.copy_from_slice(&plane[k * w..(k + 1) * w]);
            }
        });
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{RngExt, SeedableRng};

    use super::*;
    use crate::error::Error;

    fn volume_from_fn(
        w: usize,
        h: usize,
        d: usize,
        mut f: impl FnMut(usize, usize, usize) -> u8,
    ) -> BinaryVolume {
        let mut data = Vec::with_capacity(w * h * d);
        for z in 0..d {
            for y in 0..h {
                for x in 0..w {
                    data.push(f(x, y, z));
                }
            }
        }
        BinaryVolume::new(w, h, d, data).unwrap()
    }

    fn brute_force_edt(input: &BinaryVolume, cfg: &Config) -> Vec<f64> {
        let (w, h, d) = input.dim();
        let mut background = Vec::new();
        for z in 0..d {
            for y in 0..h {
                for x in 0..w {
                    if cfg.is_background(input.get(x, y, z)) {
                        background.push((x as i64, y as i64, z as i64));
                    }
                }
            }
        }
        let mut out = vec![0.0; w * h * d];
        for z in 0..d {
            for y in 0..h {
                for x in 0..w {
                    if cfg.is_background(input.get(x, y, z)) {
                        continue;
                    }
                    let best = background
                        .iter()
                        .map(|&(bx, by, bz)| {
                            let (dx, dy, dz) = (x as i64 - bx, y as i64 - by, z as i64 - bz);
                            dx * dx + dy * dy + dz * dz
                        })
                        .min()
                        .unwrap_or(0);
                    out[input.index(x, y, z)] = (best as f64).sqrt();
                }
            }
        }
        out
    }

    #[test]
    fn rejects_zero_threshold() {
        let input = volume_from_fn(2, 2, 2, |_, _, _| 0);
        let cfg = Config::default().with_threshold(0);
        assert!(matches!(
            edt(&input, &cfg),
            Err(Error::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn all_background_is_all_zero() {
        let input = volume_from_fn(4, 4, 4, |_, _, _| 0);
        let out = edt(&input, &Config::default()).unwrap();
        assert!(out.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn all_foreground_is_all_zero() {
        let input = volume_from_fn(4, 4, 4, |_, _, _| 255);
        let out = edt(&input, &Config::default()).unwrap();
        assert!(out.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn distances_along_a_row() {
        let input = volume_from_fn(8, 1, 1, |x, _, _| if x == 0 { 0 } else { 255 });
        let out = edt(&input, &Config::default()).unwrap();
        for x in 0..8 {
            assert_eq!(out.get(x, 0, 0), x as f32);
        }
    }

    #[test]
    fn single_background_voxel_in_center() {
        let input = volume_from_fn(5, 5, 5, |x, y, z| {
            if (x, y, z) == (2, 2, 2) {
                0
            } else {
                255
            }
        });
        let out = edt(&input, &Config::default()).unwrap();
        assert_eq!(out.get(2, 2, 2), 0.0);
        assert_eq!(out.get(2, 2, 0), 2.0);
        assert_eq!(out.get(1, 2, 2), 1.0);
        assert!((out.get(0, 0, 0) - (12.0f32).sqrt()).abs() < 1e-6);
    }

    #[test]
    fn centered_cube_has_distance_two_at_center() {
        let input = volume_from_fn(10, 10, 10, |x, y, z| {
            let inside = (4..=7).contains(&x) && (4..=7).contains(&y) && (4..=7).contains(&z);
            if inside {
                255
            } else {
                0
            }
        });
        let out = edt(&input, &Config::default()).unwrap();
        assert_eq!(out.get(5, 5, 5), 2.0);
        assert_eq!(out.get(4, 4, 4), 1.0);
        assert_eq!(out.get(3, 5, 5), 0.0);
    }

    #[test]
    fn matches_brute_force_on_random_volumes() {
        let cfg = Config::default();
        for seed in [3u64, 17, 2026] {
            let mut rng = StdRng::seed_from_u64(seed);
            let input = volume_from_fn(8, 7, 6, |_, _, _| rng.random());
            let out = edt(&input, &cfg).unwrap();
            let expected = brute_force_edt(&input, &cfg);
            for (i, &v) in out.data().iter().enumerate() {
                assert!(
                    (v as f64 - expected[i]).abs() < 1e-4,
                    "seed {seed}, voxel {i}: got {v}, expected {}",
                    expected[i]
                );
            }
        }
    }

    #[test]
    fn inverse_classification_of_complemented_volume_matches() {
        let mut rng = StdRng::seed_from_u64(99);
        let bytes: Vec<u8> = (0..6 * 6 * 6).map(|_| rng.random()).collect();
        let complemented: Vec<u8> = bytes.iter().map(|&v| !v).collect();

        let plain = BinaryVolume::new(6, 6, 6, bytes).unwrap();
        let flipped = BinaryVolume::new(6, 6, 6, complemented).unwrap();

        let out_plain = edt(&plain, &Config::default()).unwrap();
        // !v < 128 exactly when v >= 128, so inverse classification of the
        // complement selects the same foreground set.
        let out_flipped = edt(&flipped, &Config::default().with_inverse(true)).unwrap();
        assert_eq!(out_plain.data(), out_flipped.data());
    }
}
