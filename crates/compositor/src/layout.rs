use caption_core::RenderConfig;
use serde::Serialize;
use text_features::wrap_text;

/// Geometry of one composite, in logical pixels.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub image_width: u32,
    pub image_height: u32,
    pub band_height: u32,
    pub total_width: u32,
    pub total_height: u32,
    pub font_size: u32,
    pub line_height: u32,
    pub padding_x: u32,
    pub padding_y: u32,
    /// Letterbox bar height, used by the cinema theme.
    pub bar_height: u32,
    /// Top of the first text line.
    pub text_top: u32,
    pub lines: Vec<String>,
}

fn round_u32(v: f32) -> u32 { v.round().max(0.0) as u32 }

impl Layout {
    /// Size the output for a source of `source_w`x`source_h` and wrap `caption`
    /// with `measure` (text → width at `config.font_size`).
    pub fn plan<F>(source_w: u32, source_h: u32, config: &RenderConfig, caption: &str, measure: F) -> Self
    where
        F: FnMut(&str) -> f32,
    {
        let fs = config.font_size.max(1) as f32;
        let out_w = config.output_width(source_w);
        let scale = out_w as f32 / source_w.max(1) as f32;
        let image_width = round_u32(source_w as f32 * scale).max(1);
        let image_height = round_u32(source_h as f32 * scale).max(1);

        let padding_y = round_u32(fs * 1.2);
        let padding_x = round_u32(fs);
        let line_height = round_u32(fs * 1.36);
        let max_text_width = image_width as f32 - 2.0 * padding_x as f32;

        let lines = wrap_text(caption, max_text_width, measure);
        let line_count = u32::try_from(lines.len()).unwrap_or(u32::MAX);
        let block = line_count.saturating_mul(line_height);
        let band_height = round_u32(fs * 3.0).max(block.saturating_add(padding_y.saturating_mul(2)));
        let text_top = image_height.saturating_add(10u32.max(round_u32((band_height - block) as f32 / 2.0)));

        Self {
            image_width,
            image_height,
            band_height,
            total_width: image_width,
            total_height: image_height.saturating_add(band_height),
            font_size: fs as u32,
            line_height,
            padding_x,
            padding_y,
            bar_height: round_u32(image_height as f32 * 0.08),
            text_top,
            lines,
        }
    }

    pub fn max_text_width(&self) -> f32 { self.total_width as f32 - 2.0 * self.padding_x as f32 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caption_core::MaxWidth;

    fn cell(fs: f32) -> impl FnMut(&str) -> f32 { move |s: &str| s.chars().count() as f32 * fs }

    #[test]
    fn one_line_band() {
        let cfg = RenderConfig::default();
        let l = Layout::plan(400, 300, &cfg, "风在远处", cell(36.0));
        assert_eq!(l.lines, ["风在远处"]);
        assert_eq!((l.padding_x, l.padding_y, l.line_height), (36, 43, 49));
        assert_eq!(l.band_height, 135);
        assert_eq!((l.total_width, l.total_height), (400, 435));
        assert_eq!(l.text_top, 300 + 43);
        assert_eq!(l.bar_height, 24);
    }

    #[test]
    fn band_never_below_three_font_sizes() {
        let cfg = RenderConfig { font_size: 10, ..RenderConfig::default() };
        let l = Layout::plan(400, 300, &cfg, "x", cell(10.0));
        // 1 line: 14 + 2*12 = 38 > 30
        assert_eq!(l.band_height, 38);
        let l = Layout::plan(400, 300, &cfg, "", cell(10.0));
        assert!(l.lines.is_empty());
        assert_eq!(l.band_height, 30);
        assert_eq!(l.text_top, 300 + 15);
    }

    #[test]
    fn long_caption_wraps_inside_padding() {
        let cfg = RenderConfig::default();
        let text = "你看见的是灰，我看见的是回不去的远处。风在远处里拐了个弯，我们就此走散。";
        let l = Layout::plan(400, 300, &cfg, text, cell(36.0));
        // 328px of room → 9 cells per line
        assert!(l.lines.iter().all(|line| line.chars().count() <= 9));
        assert_eq!(l.lines.concat(), text);
        assert_eq!(l.band_height, l.lines.len() as u32 * 49 + 86);
    }

    #[test]
    fn max_width_scales_uniformly() {
        let cfg = RenderConfig { max_width: MaxWidth::Limit(200), ..RenderConfig::default() };
        let l = Layout::plan(400, 300, &cfg, "短", cell(36.0));
        assert_eq!((l.image_width, l.image_height), (200, 150));
        let cfg = RenderConfig { max_width: MaxWidth::Limit(1080), ..RenderConfig::default() };
        let l = Layout::plan(400, 300, &cfg, "短", cell(36.0));
        assert_eq!((l.image_width, l.image_height), (400, 300));
    }

    #[test]
    fn huge_font_size_saturates_instead_of_overflowing() {
        let cfg = RenderConfig { font_size: 3_000_000_000, ..RenderConfig::default() };
        let l = Layout::plan(400, 300, &cfg, "风在远处", cell(3.0e9));
        assert_eq!(l.lines.len(), 4);
        assert_eq!(l.band_height, u32::MAX);
        assert_eq!(l.total_height, u32::MAX);
    }
}
