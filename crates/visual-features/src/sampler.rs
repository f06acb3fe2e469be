use caption_core::{CaptionError, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, RgbaImage};

/// Width of the analysis grid; height follows the aspect ratio.
pub const SAMPLE_WIDTH: u32 = 192;

/// Samples with normalized alpha below this are treated as transparent.
pub const ALPHA_CUTOFF: f32 = 0.1;

/// Decode any format `image` understands. Zero-sized results are rejected.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    let img = image::load_from_memory(bytes).map_err(|e| CaptionError::InvalidImage(e.to_string()))?;
    ensure_dimensions(&img)?;
    Ok(img)
}

pub(crate) fn ensure_dimensions(img: &DynamicImage) -> Result<()> {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return Err(CaptionError::InvalidImage(format!("image has zero dimension ({}x{})", w, h)));
    }
    Ok(())
}

/// Grid size for an image of `w`x`h`: fixed width, rounded proportional height, never 0.
pub fn grid_size(w: u32, h: u32) -> (u32, u32) {
    let gh = (SAMPLE_WIDTH as f64 * h as f64 / w as f64).round() as u32;
    (SAMPLE_WIDTH, gh.max(1))
}

/// Resample to the analysis grid in one pass. Shrinking averages the covered area;
/// sources narrower than the grid are enlarged with bilinear interpolation, the way a
/// smoothed canvas draw does.
pub fn sample_grid(img: &DynamicImage) -> Result<RgbaImage> {
    ensure_dimensions(img)?;
    let (w, h) = img.dimensions();
    let (gw, gh) = grid_size(w, h);
    Ok(imageops::resize(img, gw, gh, FilterType::Triangle))
}

#[inline]
pub fn is_opaque_enough(alpha: u8) -> bool { (alpha as f32 / 255.0) >= ALPHA_CUTOFF }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_keeps_aspect_ratio() {
        assert_eq!(grid_size(400, 300), (192, 144));
        assert_eq!(grid_size(1920, 1080), (192, 108));
        assert_eq!(grid_size(100, 100), (192, 192));
        assert_eq!(grid_size(10_000, 1), (192, 1));
    }

    #[test]
    fn zero_sized_image_is_invalid() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(0, 12));
        assert!(matches!(sample_grid(&img), Err(CaptionError::InvalidImage(_))));
    }

    #[test]
    fn garbage_bytes_are_invalid() {
        assert!(matches!(decode(b"definitely not a picture"), Err(CaptionError::InvalidImage(_))));
    }

    #[test]
    fn alpha_cutoff() {
        assert!(!is_opaque_enough(0));
        assert!(!is_opaque_enough(25));
        assert!(is_opaque_enough(26));
        assert!(is_opaque_enough(255));
    }

    #[test]
    fn narrow_image_is_interpolated_up() {
        let solid = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 2, image::Rgba([30, 60, 90, 255])));
        let grid = sample_grid(&solid).unwrap();
        assert_eq!(grid.dimensions(), (192, 96));
        assert!(grid.pixels().all(|p| p.0 == [30, 60, 90, 255]));

        let mut halves = RgbaImage::from_pixel(2, 1, image::Rgba([0, 0, 0, 255]));
        halves.put_pixel(1, 0, image::Rgba([255, 255, 255, 255]));
        let grid = sample_grid(&DynamicImage::ImageRgba8(halves)).unwrap();
        assert_eq!(grid.dimensions(), (192, 96));
        assert!(grid.get_pixel(0, 0)[0] < 64);
        assert!(grid.get_pixel(191, 0)[0] > 191);
        assert!((0..192).any(|x| (64..=191).contains(&grid.get_pixel(x, 0)[0])));
    }
}
