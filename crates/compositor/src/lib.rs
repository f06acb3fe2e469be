//! Caption band layout, drawing and encoding.

pub mod encode;
pub mod fonts;
pub mod glyphs;
pub mod layout;
pub mod surface;
pub mod theme;

use caption_core::{RenderConfig, Result, Theme};
use image::{DynamicImage, GenericImageView};
use tracing::info;

pub use glyphs::GlyphSource;
pub use layout::Layout;
pub use surface::{ImageSurface, LogicalRect, RasterSurface};
pub use theme::{band_color, palette, ThemePalette};

/// Encoded composite plus its geometry.
#[derive(Clone, Debug)]
pub struct Composite {
    pub bytes: Vec<u8>,
    /// Device pixels of the encoded raster.
    pub width: u32,
    pub height: u32,
    pub layout: Layout,
}

/// Paint background, picture, optional letterbox, band, border and text, in that order.
pub fn draw_composite<S: RasterSurface + ?Sized>(surface: &mut S, source: &DynamicImage, layout: &Layout, theme: Theme) {
    let colors = palette(theme);
    let total_w = layout.total_width as f32;
    let total_h = layout.total_height as f32;
    let img_w = layout.image_width as f32;
    let img_h = layout.image_height as f32;

    surface.fill_rect(LogicalRect::new(0.0, 0.0, total_w, total_h), colors.background);
    surface.draw_image(source, LogicalRect::new(0.0, 0.0, img_w, img_h));

    if theme == Theme::Cinema {
        let bar = layout.bar_height as f32;
        surface.fill_rect(LogicalRect::new(0.0, 0.0, img_w, bar), theme::BLACK);
        surface.fill_rect(LogicalRect::new(0.0, img_h - bar, img_w, bar), theme::BLACK);
    }

    surface.fill_rect(LogicalRect::new(0.0, img_h, img_w, layout.band_height as f32), band_color(theme));
    surface.stroke_rect(LogicalRect::new(0.0, 0.0, total_w, total_h), colors.border);

    for (i, line) in layout.lines.iter().enumerate() {
        let top = layout.text_top as f32 + (i as u32 * layout.line_height) as f32;
        surface.draw_text_centered(line, total_w / 2.0, top, colors.foreground);
    }
}

/// Render `caption` under `source`. `Ok(None)` when the caption is blank.
pub fn compose(source: &DynamicImage, caption: &str, config: &RenderConfig, glyphs: &GlyphSource) -> Result<Option<Composite>> {
    config.validate()?;
    let text = caption.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let (w, h) = source.dimensions();
    let font_px = config.font_size as f32;
    let layout = Layout::plan(w, h, config, text, |s| glyphs.measure(s, font_px));

    let mut surface = ImageSurface::new(layout.total_width, layout.total_height, config.dpr(), glyphs, font_px);
    draw_composite(&mut surface, source, &layout, config.theme);
    let bytes = surface.encode(config.format, config.effective_quality())?;
    let (width, height) = surface.dimensions();

    info!(
        width,
        height,
        lines = layout.lines.len(),
        format = %config.format,
        bytes = bytes.len(),
        "composite rendered"
    );
    Ok(Some(Composite { bytes, width, height, layout }))
}
