//! Ball-covering local thickness pass.
//!
//! For every foreground voxel, the largest ridge-ball radius whose ball
//! contains it. Workers own disjoint output slices and pull every ridge
//! ball that intersects their slice, so writes are never shared.
use rayon::prelude::*;
use tracing::debug;

use crate::thickness::ridge::radius_sq;
use crate::volume::FloatVolume;

struct Ball {
    x: i64,
    y: i64,
    z: i64,
    radius: f32,
    radius_sq: i64,
}

/// Paints each ridge ball over the output, keeping the maximum radius per
/// voxel. Voxels covered by no ball stay 0.
pub fn local_thickness(ridge: &FloatVolume) -> FloatVolume {
    let (w, h, d) = ridge.dim();
    let mut out = FloatVolume::zeros_like(ridge);

    let mut balls = Vec::new();
    for z in 0..d {
        for y in 0..h {
            for x in 0..w {
                let radius = ridge.get(x, y, z);
                if radius > 0.0 {
                    balls.push(Ball {
                        x: x as i64,
                        y: y as i64,
                        z: z as i64,
                        radius,
                        radius_sq: radius_sq(radius),
                    });
                }
            }
        }
    }
    if balls.is_empty() {
        return out;
    }
    debug!("Covering pass over {} ridge balls.", balls.len());

    out.data
        .par_chunks_mut(w * h)
        .enumerate()
        .for_each(|(k, out_slice)| {
            for ball in &balls {
                let dz = k as i64 - ball.z;
                let rem_z = ball.radius_sq - dz * dz;
                if rem_z < 0 {
                    continue;
                }
                let j_reach = int_sqrt(rem_z);
                let j_lo = (ball.y - j_reach).max(0);
                let j_hi = (ball.y + j_reach).min(h as i64 - 1);
                for j in j_lo..=j_hi {
                    let dy = j - ball.y;
                    let rem = rem_z - dy * dy;
                    let i_reach = int_sqrt(rem);
                    let i_lo = (ball.x - i_reach).max(0) as usize;
                    let i_hi = (ball.x + i_reach).min(w as i64 - 1) as usize;
                    let row = &mut out_slice[j as usize * w..(j as usize + 1) * w];
                    for value in &mut row[i_lo..=i_hi] {
                        if ball.radius > *value {
                            *value = ball.radius;
                        }
                    }
                }
            }
        });

    out
}

#[inline]
fn int_sqrt(v: i64) -> i64 {
    (v as f64).sqrt() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_ridge_yields_zeros() {
        let ridge = FloatVolume::new(4, 4, 4).unwrap();
        let out = local_thickness(&ridge);
        assert!(out.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn single_ball_covers_exactly_its_lattice_points() {
        let mut ridge = FloatVolume::new(7, 7, 7).unwrap();
        ridge.set(3, 3, 3, 2.0);
        let out = local_thickness(&ridge);

        for z in 0..7i64 {
            for y in 0..7i64 {
                for x in 0..7i64 {
                    let dist_sq = (x - 3).pow(2) + (y - 3).pow(2) + (z - 3).pow(2);
                    let expected = if dist_sq <= 4 { 2.0 } else { 0.0 };
                    assert_eq!(
                        out.get(x as usize, y as usize, z as usize),
                        expected,
                        "voxel ({x}, {y}, {z})"
                    );
                }
            }
        }
    }

    #[test]
    fn overlapping_balls_keep_the_larger_radius() {
        let mut ridge = FloatVolume::new(8, 5, 5).unwrap();
        ridge.set(2, 2, 2, 1.5);
        ridge.set(4, 2, 2, 2.5);
        let out = local_thickness(&ridge);

        // Inside both balls: the larger radius wins.
        assert_eq!(out.get(3, 2, 2), 2.5);
        // Inside the small ball only.
        assert_eq!(out.get(1, 1, 2), 1.5);
        // Inside the large ball only.
        assert_eq!(out.get(6, 2, 2), 2.5);
        // Outside both.
        assert_eq!(out.get(0, 4, 4), 0.0);
    }

    #[test]
    fn ball_at_corner_is_clamped_to_bounds() {
        let mut ridge = FloatVolume::new(4, 4, 4).unwrap();
        ridge.set(0, 0, 0, 2.0);
        let out = local_thickness(&ridge);
        assert_eq!(out.get(0, 0, 0), 2.0);
        assert_eq!(out.get(2, 0, 0), 2.0);
        assert_eq!(out.get(3, 3, 3), 0.0);
    }
}
