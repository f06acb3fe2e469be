use caption_core::{OutputFormat, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use crate::encode::encode_rgba;
use crate::glyphs::GlyphSource;

/// Rectangle in logical (unscaled) pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogicalRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl LogicalRect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self { Self { x, y, w, h } }
}

/// 2D drawing capability the compositor needs. Coordinates are logical;
/// the surface owns the logical → device transform.
pub trait RasterSurface {
    fn fill_rect(&mut self, rect: LogicalRect, color: Rgba<u8>);
    /// One logical pixel wide, inside `rect`.
    fn stroke_rect(&mut self, rect: LogicalRect, color: Rgba<u8>);
    fn draw_image(&mut self, image: &DynamicImage, dest: LogicalRect);
    fn measure_text(&self, text: &str) -> f32;
    /// `top` is the top of the line box; the line is centred on `center_x`.
    fn draw_text_centered(&mut self, text: &str, center_x: f32, top: f32, color: Rgba<u8>);
    fn encode(&self, format: OutputFormat, quality: Option<f32>) -> Result<Vec<u8>>;
}

/// CPU raster surface backed by an RGBA buffer.
pub struct ImageSurface<'g> {
    canvas: RgbaImage,
    scale: f32,
    glyphs: &'g GlyphSource,
    font_px: f32,
}

impl<'g> ImageSurface<'g> {
    pub fn new(logical_w: u32, logical_h: u32, scale: f32, glyphs: &'g GlyphSource, font_px: f32) -> Self {
        let w = (logical_w as f32 * scale).round().max(1.0) as u32;
        let h = (logical_h as f32 * scale).round().max(1.0) as u32;
        Self { canvas: RgbaImage::new(w, h), scale, glyphs, font_px }
    }

    pub fn dimensions(&self) -> (u32, u32) { self.canvas.dimensions() }

    pub fn into_image(self) -> RgbaImage { self.canvas }

    fn device_rect(&self, r: LogicalRect) -> Option<Rect> {
        let x0 = (r.x * self.scale).round() as i32;
        let y0 = (r.y * self.scale).round() as i32;
        let x1 = ((r.x + r.w) * self.scale).round() as i32;
        let y1 = ((r.y + r.h) * self.scale).round() as i32;
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Rect::at(x0, y0).of_size((x1 - x0) as u32, (y1 - y0) as u32))
    }
}

impl RasterSurface for ImageSurface<'_> {
    fn fill_rect(&mut self, rect: LogicalRect, color: Rgba<u8>) {
        if let Some(r) = self.device_rect(rect) {
            draw_filled_rect_mut(&mut self.canvas, r, color);
        }
    }

    fn stroke_rect(&mut self, rect: LogicalRect, color: Rgba<u8>) {
        let Some(r) = self.device_rect(rect) else { return };
        let width = self.scale.round().max(1.0) as u32;
        for inset in 0..width {
            if r.width() <= 2 * inset || r.height() <= 2 * inset {
                break;
            }
            let ring = Rect::at(r.left() + inset as i32, r.top() + inset as i32)
                .of_size(r.width() - 2 * inset, r.height() - 2 * inset);
            draw_hollow_rect_mut(&mut self.canvas, ring, color);
        }
    }

    fn draw_image(&mut self, image: &DynamicImage, dest: LogicalRect) {
        let Some(r) = self.device_rect(dest) else { return };
        let scaled = imageops::resize(image, r.width(), r.height(), FilterType::Triangle);
        imageops::overlay(&mut self.canvas, &scaled, r.left() as i64, r.top() as i64);
    }

    fn measure_text(&self, text: &str) -> f32 { self.glyphs.measure(text, self.font_px) }

    fn draw_text_centered(&mut self, text: &str, center_x: f32, top: f32, color: Rgba<u8>) {
        let left = center_x - self.measure_text(text) / 2.0;
        let x = (left * self.scale).round() as i32;
        let y = (top * self.scale).round() as i32;
        self.glyphs.draw(&mut self.canvas, text, x, y, self.font_px * self.scale, color);
    }

    fn encode(&self, format: OutputFormat, quality: Option<f32>) -> Result<Vec<u8>> {
        encode_rgba(&self.canvas, format, quality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    #[test]
    fn scale_is_applied_once() {
        let glyphs = GlyphSource::Bitmap;
        let mut s = ImageSurface::new(10, 5, 2.0, &glyphs, 8.0);
        assert_eq!(s.dimensions(), (20, 10));
        s.fill_rect(LogicalRect::new(5.0, 0.0, 5.0, 5.0), RED);
        let img = s.into_image();
        assert_eq!(*img.get_pixel(9, 9), Rgba([0, 0, 0, 0]));
        assert_eq!(*img.get_pixel(10, 0), RED);
        assert_eq!(*img.get_pixel(19, 9), RED);
    }

    #[test]
    fn stroke_is_one_logical_pixel() {
        let glyphs = GlyphSource::Bitmap;
        let mut s = ImageSurface::new(8, 8, 2.0, &glyphs, 8.0);
        s.stroke_rect(LogicalRect::new(0.0, 0.0, 8.0, 8.0), BLUE);
        let img = s.into_image();
        assert_eq!(*img.get_pixel(0, 5), BLUE);
        assert_eq!(*img.get_pixel(1, 5), BLUE);
        assert_eq!(*img.get_pixel(2, 5), Rgba([0, 0, 0, 0]));
        assert_eq!(*img.get_pixel(15, 15), BLUE);
    }

    #[test]
    fn image_is_stretched_into_destination() {
        let glyphs = GlyphSource::Bitmap;
        let mut s = ImageSurface::new(20, 20, 1.0, &glyphs, 8.0);
        let src = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, RED));
        s.draw_image(&src, LogicalRect::new(0.0, 0.0, 20.0, 10.0));
        let img = s.into_image();
        assert_eq!(*img.get_pixel(19, 9), RED);
        assert_eq!(*img.get_pixel(19, 10), Rgba([0, 0, 0, 0]));
    }
}
