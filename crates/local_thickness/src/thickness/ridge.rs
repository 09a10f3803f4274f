//! Distance-ridge extraction.
//!
//! Keeps only voxels whose distance ball is not contained in a
//! 26-neighbor's ball, judged on the integer lattice: for each occurring
//! squared radius and each neighbor displacement class, a precomputed
//! template holds the smallest neighbor ball that covers every lattice
//! point of the origin ball.
use rayon::prelude::*;
use tracing::debug;

use crate::volume::FloatVolume;

/// Representative displacement per 26-neighbor class: the number of
/// nonzero components determines the class, and lattice symmetry makes a
/// single representative sufficient.
const CLASS_REPRESENTATIVES: [(i64, i64, i64); 3] = [(1, 0, 0), (1, 1, 0), (1, 1, 1)];

/// Keeps the distance of every ridge voxel, zeroing all others.
///
/// Treats `distances` as an EDT output: value 0 is background, anything
/// positive is a foreground distance.
pub fn distance_ridge(distances: &FloatVolume) -> FloatVolume {
    let (w, h, d) = distances.dim();
    let mut out = FloatVolume::zeros_like(distances);

    let Some(index) = DistanceIndex::build(distances) else {
        return out;
    };
    let templates = index.covering_templates();

    out.data
        .par_chunks_mut(w * h)
        .enumerate()
        .for_each(|(k, out_slice)| {
            for j in 0..h {
                for i in 0..w {
                    let dist = distances.get(i, j, k);
                    if dist <= 0.0 {
                        continue;
                    }
                    let ind = index.position_of(radius_sq(dist));

                    let mut covered = false;
                    'search: for dz in -1i64..=1 {
                        let zn = k as i64 + dz;
                        if zn < 0 || zn >= d as i64 {
                            continue;
                        }
                        for dy in -1i64..=1 {
                            let yn = j as i64 + dy;
                            if yn < 0 || yn >= h as i64 {
                                continue;
                            }
                            for dx in -1i64..=1 {
                                if dx == 0 && dy == 0 && dz == 0 {
                                    continue;
                                }
                                let xn = i as i64 + dx;
                                if xn < 0 || xn >= w as i64 {
                                    continue;
                                }
                                let class = (dx.abs() + dy.abs() + dz.abs() - 1) as usize;
                                let neighbor =
                                    distances.get(xn as usize, yn as usize, zn as usize);
                                if radius_sq(neighbor) >= templates[class][ind] {
                                    covered = true;
                                    break 'search;
                                }
                            }
                        }
                    }

                    if !covered {
                        out_slice[j * w + i] = dist;
                    }
                }
            }
        });

    debug!(
        "Ridge extraction kept {} of {} foreground voxels.",
        out.data.iter().filter(|&&v| v > 0.0).count(),
        distances.data.iter().filter(|&&v| v > 0.0).count()
    );
    out
}

/// Recovers the integer squared radius from a stored distance.
#[inline]
pub(crate) fn radius_sq(dist: f32) -> i64 {
    (dist as f64 * dist as f64 + 0.5) as i64
}

#[inline]
fn int_sqrt(v: i64) -> i64 {
    (v as f64).sqrt() as i64
}

/// Ordered set of occurring squared radii plus a dense reverse lookup.
struct DistanceIndex {
    values: Vec<i64>,
    position: Vec<u32>,
}

impl DistanceIndex {
    /// Scans the distance map; `None` when no voxel carries a distance.
    fn build(distances: &FloatVolume) -> Option<Self> {
        let dist_max = distances.max_value();
        if dist_max <= 0.0 {
            return None;
        }
        let r_sq_max = (radius_sq(dist_max) + 1) as usize;

        let mut occurs = vec![false; r_sq_max];
        for &v in distances.data.iter() {
            if v > 0.0 {
                occurs[radius_sq(v) as usize] = true;
            }
        }

        let mut values = Vec::new();
        let mut position = vec![0u32; r_sq_max];
        for (r_sq, &seen) in occurs.iter().enumerate() {
            if seen {
                position[r_sq] = values.len() as u32;
                values.push(r_sq as i64);
            }
        }
        Some(Self { values, position })
    }

    /// Position of an occurring squared radius in the ordered set.
    #[inline]
    fn position_of(&self, r_sq: i64) -> usize {
        self.position[r_sq as usize] as usize
    }

    /// One row per displacement class, one entry per occurring squared
    /// radius: the smallest neighbor squared radius that covers it.
    fn covering_templates(&self) -> [Vec<i64>; 3] {
        CLASS_REPRESENTATIVES.map(|(dx, dy, dz)| {
            self.values
                .par_iter()
                .map(|&r_sq| min_covering_radius_sq(r_sq, dx, dy, dz))
                .collect()
        })
    }
}

/// Smallest squared radius of a ball centered at the unit displacement
/// `(dx, dy, dz)` whose lattice points contain every lattice point of the
/// origin ball of squared radius `r_sq`.
fn min_covering_radius_sq(r_sq: i64, dx: i64, dy: i64, dz: i64) -> i64 {
    let r = 1 + int_sqrt(r_sq);
    let mut max = 0;
    for k in 0..=r {
        for j in 0..=r {
            let rem = r_sq - k * k - j * j;
            if rem < 0 {
                continue;
            }
            let i_plus = int_sqrt(rem) + dx;
            let val = (k - dz) * (k - dz) + (j - dy) * (j - dy) + i_plus * i_plus;
            if val > max {
                max = val;
            }
        }
    }
    max
}
