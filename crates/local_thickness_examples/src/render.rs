//! Tracing setup and PNG slice rendering shared by the example binaries.
use std::path::Path;

use anyhow::{Context, Result};
use image::GrayImage;
use local_thickness::prelude::*;

/// Installs a formatting tracing subscriber honoring `RUST_LOG`, defaulting
/// to info-level output.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Writes one z-slice of a binary volume as a PNG.
pub fn save_binary_slice(volume: &BinaryVolume, z: usize, path: &Path) -> Result<()> {
    let (w, h, _) = volume.dim();
    let bytes: Vec<u8> = (0..h)
        .flat_map(|y| (0..w).map(move |x| volume.get(x, y, z)))
        .collect();
    let img = GrayImage::from_raw(w as u32, h as u32, bytes)
        .context("slice does not fit the image buffer")?;
    img.save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Writes one z-slice of a thickness map as a PNG, scaled so the volume
/// maximum maps to white.
pub fn save_thickness_slice(volume: &FloatVolume, z: usize, path: &Path) -> Result<()> {
    let (w, h, _) = volume.dim();
    let max = volume.max_value().max(f32::MIN_POSITIVE);
    let bytes: Vec<u8> = (0..h)
        .flat_map(|y| {
            (0..w).map(move |x| (volume.get(x, y, z) / max * 255.0).round() as u8)
        })
        .collect();
    let img = GrayImage::from_raw(w as u32, h as u32, bytes)
        .context("slice does not fit the image buffer")?;
    img.save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Writes several z-slices of a thickness map side by side as one PNG,
/// all scaled against the same volume maximum.
pub fn save_thickness_montage(volume: &FloatVolume, slices: &[usize], path: &Path) -> Result<()> {
    let (w, h, _) = volume.dim();
    let max = volume.max_value().max(f32::MIN_POSITIVE);
    let mut bytes = Vec::with_capacity(w * slices.len() * h);
    for y in 0..h {
        for &z in slices {
            for x in 0..w {
                bytes.push((volume.get(x, y, z) / max * 255.0).round() as u8);
            }
        }
    }
    let img = GrayImage::from_raw((w * slices.len()) as u32, h as u32, bytes)
        .context("montage does not fit the image buffer")?;
    img.save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
