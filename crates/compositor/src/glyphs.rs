use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use caption_core::{CaptionError, Result};
use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;

/// How caption text turns into pixels.
pub enum GlyphSource {
    /// A TrueType/OpenType face supplied by the user.
    Outline(FontVec),
    /// Built-in 8x8 bitmap cells, one font-size square per character.
    Bitmap,
}

impl Default for GlyphSource {
    fn default() -> Self { GlyphSource::Bitmap }
}

impl std::fmt::Debug for GlyphSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            GlyphSource::Outline(_) => "GlyphSource::Outline",
            GlyphSource::Bitmap => "GlyphSource::Bitmap",
        })
    }
}

impl GlyphSource {
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        FontVec::try_from_vec(data)
            .map(GlyphSource::Outline)
            .map_err(|e| CaptionError::Font(e.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|e| CaptionError::Font(format!("{}: {}", path.display(), e)))?;
        Self::from_bytes(data)
    }

    /// Advance width of `text` at `px` pixels.
    pub fn measure(&self, text: &str, px: f32) -> f32 {
        match self {
            GlyphSource::Outline(font) => text_size(PxScale::from(px), font, text).0 as f32,
            GlyphSource::Bitmap => text.chars().count() as f32 * px,
        }
    }

    /// Draw `text` with its top-left corner at (`x`, `y`), in canvas pixels.
    pub fn draw(&self, canvas: &mut RgbaImage, text: &str, x: i32, y: i32, px: f32, color: Rgba<u8>) {
        match self {
            GlyphSource::Outline(font) => {
                let scale = PxScale::from(px);
                // double strike for a heavier weight
                draw_text_mut(canvas, color, x, y, scale, font, text);
                draw_text_mut(canvas, color, x + 1, y, scale, font, text);
            }
            GlyphSource::Bitmap => draw_bitmap_text(canvas, text, x, y, px, color),
        }
    }
}

fn bitmap_glyph(ch: char) -> Option<[u8; 8]> {
    BASIC_FONTS.get(ch).or_else(|| LATIN_FONTS.get(ch))
}

fn draw_bitmap_text(canvas: &mut RgbaImage, text: &str, x: i32, y: i32, px: f32, color: Rgba<u8>) {
    let dot = px / 8.0;
    let dot_size = dot.ceil().max(1.0) as u32;
    for (i, ch) in text.chars().enumerate() {
        let cell_x = x as f32 + i as f32 * px;
        match bitmap_glyph(ch) {
            Some(rows) => {
                for (row, bits) in rows.iter().enumerate() {
                    for col in 0..8 {
                        if (bits >> col) & 1 == 0 {
                            continue;
                        }
                        let dx = (cell_x + col as f32 * dot).round() as i32;
                        let dy = (y as f32 + row as f32 * dot).round() as i32;
                        draw_filled_rect_mut(canvas, Rect::at(dx, dy).of_size(dot_size, dot_size), color);
                    }
                }
            }
            None => {
                // no bitmap: outlined box inset by one dot
                let side = (px - 2.0 * dot).round().max(1.0) as u32;
                let at = Rect::at((cell_x + dot).round() as i32, (y as f32 + dot).round() as i32).of_size(side, side);
                draw_hollow_rect_mut(canvas, at, color);
            }
        }
    }
}
