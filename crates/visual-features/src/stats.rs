use caption_core::clamp01;
use image::RgbaImage;
use palette::{FromColor, Hsv, Srgb};

use crate::sampler::is_opaque_enough;

/// Raw statistics of a sample grid, before classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageStats {
    /// Mean normalized RGB of the included samples.
    pub avg_rgb: [f32; 3],
    pub average_luminance: f32,
    pub contrast: f32,
    pub saturation: f32,
    pub warmth: f32,
    pub skin_ratio: f32,
    pub edge_density: f32,
}

/// Raw mean gradients are small; this stretches them into a usable [0,1] range.
const EDGE_GAIN: f64 = 6.0;

#[inline]
pub fn luminance(r: f32, g: f32, b: f32) -> f32 { 0.2126 * r + 0.7152 * g + 0.0722 * b }

/// HSV (hue in degrees [0,360), saturation, value) of a normalized RGB triple.
pub fn rgb_to_hsv(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let hsv: Hsv = Hsv::from_color(Srgb::new(r, g, b));
    (hsv.hue.into_positive_degrees(), hsv.saturation, hsv.value)
}

/// Rule-of-thumb RGB skin test on 0-255 channels.
pub fn is_skin(r: u8, g: u8, b: u8) -> bool {
    let (r, g, b) = (r as i32, g as i32, b as i32);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    r > 95 && g > 40 && b > 20 && max - min > 15 && (r - g).abs() > 15 && r > g && r > b
}

pub fn extract_stats(grid: &RgbaImage) -> ImageStats {
    let (w, h) = grid.dimensions();
    let (w, h) = (w as usize, h as usize);

    let mut sum_rgb = [0f64; 3];
    let mut sum_l = 0f64;
    let mut sum_l2 = 0f64;
    let mut sum_sat = 0f64;
    let mut sum_warm = 0f64;
    let mut skin = 0usize;
    let mut n = 0usize;

    // transparent samples keep luminance 0 for the gradient pass
    let mut luma = vec![0f32; w * h];
    for (x, y, p) in grid.enumerate_pixels() {
        let [r8, g8, b8, a8] = p.0;
        if !is_opaque_enough(a8) {
            continue;
        }
        let (r, g, b) = (r8 as f32 / 255.0, g8 as f32 / 255.0, b8 as f32 / 255.0);
        let l = luminance(r, g, b);
        luma[y as usize * w + x as usize] = l;

        sum_rgb[0] += r as f64;
        sum_rgb[1] += g as f64;
        sum_rgb[2] += b as f64;
        sum_l += l as f64;
        sum_l2 += (l * l) as f64;
        sum_sat += rgb_to_hsv(r, g, b).1 as f64;
        sum_warm += (r - b) as f64;
        if is_skin(r8, g8, b8) {
            skin += 1;
        }
        n += 1;
    }

    let nf = n.max(1) as f64;
    let avg_l = sum_l / nf;
    ImageStats {
        avg_rgb: [(sum_rgb[0] / nf) as f32, (sum_rgb[1] / nf) as f32, (sum_rgb[2] / nf) as f32],
        average_luminance: avg_l as f32,
        contrast: (sum_l2 / nf - avg_l * avg_l).max(0.0).sqrt() as f32,
        saturation: (sum_sat / nf) as f32,
        warmth: (sum_warm / nf) as f32,
        skin_ratio: (skin as f64 / nf) as f32,
        edge_density: edge_density(&luma, w, h),
    }
}

/// Mean absolute luminance step to the right/lower neighbour, scaled and clamped.
/// A single-row or single-column grid only contributes the direction it has.
pub fn edge_density(luma: &[f32], w: usize, h: usize) -> f32 {
    let mut sum = 0f64;
    let mut count = 0usize;
    if w >= 2 && h >= 2 {
        for y in 0..h - 1 {
            for x in 0..w - 1 {
                let i = y * w + x;
                sum += (luma[i] - luma[i + 1]).abs() as f64;
                sum += (luma[i] - luma[i + w]).abs() as f64;
                count += 2;
            }
        }
    } else if w >= 2 {
        for x in 0..w - 1 {
            sum += (luma[x] - luma[x + 1]).abs() as f64;
            count += 1;
        }
    } else if h >= 2 {
        for y in 0..h - 1 {
            sum += (luma[y] - luma[y + 1]).abs() as f64;
            count += 1;
        }
    }
    if count == 0 {
        return 0.0;
    }
    clamp01((sum / count as f64 * EDGE_GAIN) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn skin_rule() {
        assert!(is_skin(220, 170, 140));
        assert!(!is_skin(90, 60, 40)); // too dark
        assert!(!is_skin(200, 190, 150)); // r-g too small
        assert!(!is_skin(128, 128, 128));
    }

    #[test]
    fn hsv_of_primaries() {
        let (h, s, v) = rgb_to_hsv(0.0, 0.0, 1.0);
        assert!((h - 240.0).abs() < 0.01);
        assert!((s - 1.0).abs() < 1e-6 && (v - 1.0).abs() < 1e-6);
        let (_, s, _) = rgb_to_hsv(0.5, 0.5, 0.5);
        assert_eq!(s, 0.0);
        let (_, s, v) = rgb_to_hsv(0.0, 0.0, 0.0);
        assert_eq!((s, v), (0.0, 0.0));
    }

    #[test]
    fn transparent_samples_are_excluded() {
        let mut grid = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255]));
        grid.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        grid.put_pixel(1, 0, Rgba([0, 0, 0, 10]));
        let stats = extract_stats(&grid);
        assert!((stats.average_luminance - 1.0).abs() < 1e-5);
        assert!(stats.contrast < 1e-3);
    }

    #[test]
    fn fully_transparent_grid_is_all_zero() {
        let grid = RgbaImage::from_pixel(8, 8, Rgba([200, 10, 10, 0]));
        let stats = extract_stats(&grid);
        assert_eq!(stats.average_luminance, 0.0);
        assert_eq!(stats.skin_ratio, 0.0);
        assert_eq!(stats.edge_density, 0.0);
    }

    #[test]
    fn single_row_uses_horizontal_steps_only() {
        let luma = [0.0, 1.0, 0.0, 1.0];
        assert_eq!(edge_density(&luma, 4, 1), 1.0);
        let flat = [0.4; 5];
        assert_eq!(edge_density(&flat, 1, 5), 0.0);
        assert_eq!(edge_density(&[0.7], 1, 1), 0.0);
    }

    #[test]
    fn gentle_ramp_has_low_edges() {
        // two levels per column
        let grid = RgbaImage::from_fn(64, 8, |x, _| {
            let v = (x * 2) as u8;
            Rgba([v, v, v, 255])
        });
        let stats = extract_stats(&grid);
        assert!(stats.edge_density > 0.0 && stats.edge_density < 0.05);
    }
}
