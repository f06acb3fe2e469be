use caption_core::Theme;
use image::Rgba;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThemePalette {
    pub background: Rgba<u8>,
    pub foreground: Rgba<u8>,
    pub border: Rgba<u8>,
}

pub const BLACK: Rgba<u8> = hex(0x000000);

const fn hex(rgb: u32) -> Rgba<u8> {
    Rgba([(rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 255])
}

pub fn palette(theme: Theme) -> ThemePalette {
    match theme {
        Theme::Dark => ThemePalette { background: hex(0x0b0b0c), foreground: hex(0xf5f5f5), border: hex(0x0b0b0c) },
        Theme::Light => ThemePalette { background: hex(0xf3f4f6), foreground: hex(0x111827), border: hex(0xe5e7eb) },
        Theme::Cinema => ThemePalette { background: hex(0x050505), foreground: hex(0xf5f5f5), border: hex(0x050505) },
    }
}

/// Caption band fill; cinema always uses pure black.
pub fn band_color(theme: Theme) -> Rgba<u8> {
    match theme {
        Theme::Cinema => BLACK,
        _ => palette(theme).background,
    }
}
