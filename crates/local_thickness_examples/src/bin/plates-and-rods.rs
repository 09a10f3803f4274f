use std::fs;
use std::path::PathBuf;

use local_thickness::prelude::*;
use local_thickness_examples::{init_tracing, save_thickness_montage, slab_and_rod};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let slab_thickness = 6;
    let rod_radius = 10.0;
    let input = slab_and_rod(slab_thickness, rod_radius);
    let (w, h, d) = input.dim();

    let thickness = compute_local_thickness(&input, &Config::default())?;

    // The slab reads as its through-thickness, the rod as its diameter.
    let slab_sample = thickness.get(w / 2, h / 2, 8 + slab_thickness / 2);
    let rod_sample = thickness.get(w / 2, h / 2, (d as f64 * 0.75) as usize);
    println!("slab thickness {slab_thickness}: measured {slab_sample}");
    println!("rod diameter {}: measured {rod_sample}", 2.0 * rod_radius);

    let out_dir = PathBuf::from("out/plates-and-rods");
    fs::create_dir_all(&out_dir)?;
    let slices = [8 + slab_thickness / 2, (d as f64 * 0.75) as usize];
    save_thickness_montage(&thickness, &slices, &out_dir.join("slab-and-rod-montage.png"))?;
    println!("montage written to {}", out_dir.display());

    Ok(())
}
