//! Synthetic binary test volumes with known thickness.
use local_thickness::prelude::*;

/// Solid sphere of the given radius centered in an `edge`-sized cube.
/// Its local thickness is the sphere diameter everywhere.
pub fn sphere(edge: usize, radius: f64) -> BinaryVolume {
    let center = (edge as f64 - 1.0) / 2.0;
    let mut data = Vec::with_capacity(edge * edge * edge);
    for z in 0..edge {
        for y in 0..edge {
            for x in 0..edge {
                let (dx, dy, dz) = (x as f64 - center, y as f64 - center, z as f64 - center);
                let inside = dx * dx + dy * dy + dz * dz <= radius * radius;
                data.push(if inside { 255 } else { 0 });
            }
        }
    }
    BinaryVolume::new(edge, edge, edge, data).expect("valid phantom shape")
}

/// A horizontal slab of the given thickness plus a separate rod of the
/// given radius running along x. Slab and rod thickness differ, so the
/// output map separates the two structures.
pub fn slab_and_rod(slab_thickness: usize, rod_radius: f64) -> BinaryVolume {
    let (w, h, d) = (96usize, 64usize, 64usize);
    let slab_lo = 8;
    let slab_hi = slab_lo + slab_thickness;
    let (rod_y, rod_z) = (h as f64 * 0.5, d as f64 * 0.75);

    let mut data = Vec::with_capacity(w * h * d);
    for z in 0..d {
        for y in 0..h {
            for x in 0..w {
                let in_slab = (slab_lo..slab_hi).contains(&z) && x >= 4 && x < w - 4;
                let (dy, dz) = (y as f64 - rod_y, z as f64 - rod_z);
                let in_rod =
                    dy * dy + dz * dz <= rod_radius * rod_radius && x >= 4 && x < w - 4;
                data.push(if in_slab || in_rod { 255 } else { 0 });
            }
        }
    }
    BinaryVolume::new(w, h, d, data).expect("valid phantom shape")
}
