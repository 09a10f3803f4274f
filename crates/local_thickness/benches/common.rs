use std::time::Duration;

use criterion::{Criterion, Throughput};
use local_thickness::prelude::*;

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn voxels_throughput(voxels: usize) -> Throughput {
    Throughput::Elements(voxels.max(1) as u64)
}

/// Solid sphere of the given radius centered in an `edge`-sized cube.
pub fn sphere_phantom(edge: usize, radius: f64) -> BinaryVolume {
    let center = (edge as f64 - 1.0) / 2.0;
    let mut data = Vec::with_capacity(edge * edge * edge);
    for z in 0..edge {
        for y in 0..edge {
            for x in 0..edge {
                let (dx, dy, dz) = (
                    x as f64 - center,
                    y as f64 - center,
                    z as f64 - center,
                );
                let inside = dx * dx + dy * dy + dz * dz <= radius * radius;
                data.push(if inside { 255 } else { 0 });
            }
        }
    }
    BinaryVolume::new(edge, edge, edge, data).expect("valid phantom shape")
}
