use caption_core::{ContentGuess, DominantColor, ImageProfile, MoodTag};

use crate::stats::{rgb_to_hsv, ImageStats};

/// Ordered rules; the first match wins.
pub fn dominant_color(r: f32, g: f32, b: f32) -> DominantColor {
    let (h, s, v) = rgb_to_hsv(r, g, b);
    if v < 0.12 {
        return DominantColor::Black;
    }
    if v > 0.92 && s < 0.12 {
        return DominantColor::White;
    }
    if s < 0.14 {
        return DominantColor::Gray;
    }
    match h {
        h if !(15.0..345.0).contains(&h) => DominantColor::Red,
        h if h < 40.0 => DominantColor::Orange,
        h if h < 70.0 => DominantColor::Yellow,
        h if h < 160.0 => DominantColor::Green,
        h if h < 200.0 => DominantColor::Cyan,
        h if h < 255.0 => DominantColor::Blue,
        h if h < 315.0 => DominantColor::Purple,
        _ => DominantColor::Red,
    }
}

pub fn brightness_tag(average_luminance: f32) -> MoodTag {
    if average_luminance < 0.32 {
        MoodTag::Night
    } else if average_luminance > 0.74 {
        MoodTag::Daylight
    } else {
        MoodTag::Dusk
    }
}

pub fn contrast_tag(contrast: f32) -> MoodTag {
    if contrast > 0.24 { MoodTag::HighContrast } else { MoodTag::SoftLight }
}

pub fn intensity_tag(saturation: f32) -> MoodTag {
    if saturation > 0.46 {
        MoodTag::Intense
    } else if saturation < 0.22 {
        MoodTag::Restrained
    } else {
        MoodTag::Moderate
    }
}

pub fn tone_tag(warmth: f32) -> MoodTag {
    if warmth > 0.08 {
        MoodTag::Warm
    } else if warmth < -0.08 {
        MoodTag::Cool
    } else {
        MoodTag::Neutral
    }
}

/// Skin takes precedence over edges.
pub fn content_guess(skin_ratio: f32, edge_density: f32) -> ContentGuess {
    if skin_ratio > 0.085 {
        ContentGuess::Person
    } else if edge_density > 0.28 {
        ContentGuess::Urban
    } else {
        ContentGuess::Landscape
    }
}

pub fn classify(stats: &ImageStats) -> ImageProfile {
    let [r, g, b] = stats.avg_rgb;
    ImageProfile {
        average_luminance: stats.average_luminance,
        saturation: stats.saturation,
        contrast: stats.contrast,
        warmth: stats.warmth,
        skin_ratio: stats.skin_ratio,
        edge_density: stats.edge_density,
        dominant_color: dominant_color(r, g, b),
        mood_tags: [
            brightness_tag(stats.average_luminance),
            contrast_tag(stats.contrast),
            intensity_tag(stats.saturation),
            tone_tag(stats.warmth),
        ],
        content_guess: content_guess(stats.skin_ratio, stats.edge_density),
    }
}
