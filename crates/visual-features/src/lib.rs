//! Image analysis: sample grid → statistics → classified [`ImageProfile`].

pub mod classify;
pub mod sampler;
pub mod stats;

use caption_core::{ImageProfile, Result};
use image::{DynamicImage, GenericImageView};
use tracing::debug;

pub use classify::classify;
pub use sampler::{decode, sample_grid, SAMPLE_WIDTH};
pub use stats::{extract_stats, ImageStats};

/// Profile an already decoded image.
pub fn analyze_image(img: &DynamicImage) -> Result<ImageProfile> {
    let grid = sample_grid(img)?;
    let stats = extract_stats(&grid);
    let (w, h) = img.dimensions();
    debug!(
        width = w,
        height = h,
        grid_w = grid.width(),
        grid_h = grid.height(),
        luminance = stats.average_luminance,
        contrast = stats.contrast,
        saturation = stats.saturation,
        warmth = stats.warmth,
        skin = stats.skin_ratio,
        edges = stats.edge_density,
        "image statistics"
    );
    Ok(classify(&stats))
}

/// Decode and profile in one go; the decoded image is handed back for rendering.
pub fn analyze_bytes(img_bytes: &[u8]) -> Result<(DynamicImage, ImageProfile)> {
    let img = decode(img_bytes)?;
    let profile = analyze_image(&img)?;
    Ok((img, profile))
}
