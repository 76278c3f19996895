/// PNG export of rendered framebuffers
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::RgbImage;
use painter3d_core::Framebuffer;

pub fn file_name(resolution: usize) -> String {
    format!("render_{}x{}.png", resolution, resolution)
}

pub fn to_image(framebuffer: &Framebuffer) -> Result<RgbImage> {
    let side = u32::try_from(framebuffer.resolution())
        .context("Resolution too large for an image")?;
    RgbImage::from_raw(side, side, framebuffer.to_rgb8())
        .context("Framebuffer size does not match its resolution")
}

/// Write one PNG per framebuffer into `dir`, creating it if needed
pub fn save_all(framebuffers: &[Framebuffer], dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    framebuffers
        .iter()
        .map(|framebuffer| {
            let path = dir.join(file_name(framebuffer.resolution()));
            to_image(framebuffer)?
                .save(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            Ok(path)
        })
        .collect()
}
