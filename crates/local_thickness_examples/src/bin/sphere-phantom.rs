use std::fs;
use std::path::PathBuf;

use local_thickness::prelude::*;
use local_thickness_examples::{init_tracing, save_binary_slice, save_thickness_slice, sphere};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let edge = 64;
    let radius = 20.0;
    let input = sphere(edge, radius);

    let thickness = compute_local_thickness(&input, &Config::default())?;

    let center = edge / 2;
    let measured = thickness.get(center, center, center);
    println!("sphere radius {radius}: expected diameter {}", 2.0 * radius);
    println!("measured diameter at center: {measured}");
    println!("maximum diameter in map: {}", thickness.max_value());

    let out_dir = PathBuf::from("out/sphere-phantom");
    fs::create_dir_all(&out_dir)?;
    save_binary_slice(&input, center, &out_dir.join("input-mid-slice.png"))?;
    save_thickness_slice(&thickness, center, &out_dir.join("thickness-mid-slice.png"))?;
    println!("slices written to {}", out_dir.display());

    Ok(())
}
