//! Shared vocabulary of the caption pipeline: the perceptual profile of an image,
//! the closed label sets the classifier picks from, render settings and errors.

use std::ops::RangeInclusive;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

pub fn clamp01(n: f32) -> f32 { n.clamp(0.0, 1.0) }

#[derive(Debug, Error)]
pub enum CaptionError {
    /// Zero-sized or undecodable input. Fatal to analysis.
    #[error("invalid image: {0}")]
    InvalidImage(String),
    #[error("failed to encode {format} output: {reason}")]
    EncodeFailure { format: OutputFormat, reason: String },
    #[error("a render is already in progress")]
    RenderInProgress,
    #[error("cannot load font: {0}")]
    Font(String),
    #[error("invalid render settings: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, CaptionError>;

/* =========================
   Classification labels
   ========================= */

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DominantColor { Black, White, Gray, Red, Orange, Yellow, Green, Cyan, Blue, Purple }

impl DominantColor {
    pub fn as_str(self) -> &'static str {
        match self {
            DominantColor::Black => "black",
            DominantColor::White => "white",
            DominantColor::Gray => "gray",
            DominantColor::Red => "red",
            DominantColor::Orange => "orange",
            DominantColor::Yellow => "yellow",
            DominantColor::Green => "green",
            DominantColor::Cyan => "cyan",
            DominantColor::Blue => "blue",
            DominantColor::Purple => "purple",
        }
    }

    /// Word used inside caption templates.
    pub fn label(self) -> &'static str {
        match self {
            DominantColor::Black => "黑",
            DominantColor::White => "白",
            DominantColor::Gray => "灰",
            DominantColor::Red => "红",
            DominantColor::Orange => "橙",
            DominantColor::Yellow => "黄",
            DominantColor::Green => "绿",
            DominantColor::Cyan => "青",
            DominantColor::Blue => "蓝",
            DominantColor::Purple => "紫",
        }
    }
}

/// One label per axis; see [`MoodTag::axis`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoodTag {
    Night, Dusk, Daylight,
    HighContrast, SoftLight,
    Intense, Moderate, Restrained,
    Warm, Cool, Neutral,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoodAxis { Brightness, Contrast, Intensity, Tone }

impl MoodTag {
    pub fn axis(self) -> MoodAxis {
        match self {
            MoodTag::Night | MoodTag::Dusk | MoodTag::Daylight => MoodAxis::Brightness,
            MoodTag::HighContrast | MoodTag::SoftLight => MoodAxis::Contrast,
            MoodTag::Intense | MoodTag::Moderate | MoodTag::Restrained => MoodAxis::Intensity,
            MoodTag::Warm | MoodTag::Cool | MoodTag::Neutral => MoodAxis::Tone,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MoodTag::Night => "night",
            MoodTag::Dusk => "dusk",
            MoodTag::Daylight => "daylight",
            MoodTag::HighContrast => "high-contrast",
            MoodTag::SoftLight => "soft-light",
            MoodTag::Intense => "intense",
            MoodTag::Moderate => "moderate",
            MoodTag::Restrained => "restrained",
            MoodTag::Warm => "warm",
            MoodTag::Cool => "cool",
            MoodTag::Neutral => "neutral",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentGuess { Person, Urban, Landscape }

impl ContentGuess {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentGuess::Person => "person",
            ContentGuess::Urban => "urban",
            ContentGuess::Landscape => "landscape",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ContentGuess::Person => "人物",
            ContentGuess::Urban => "城市/建筑",
            ContentGuess::Landscape => "风景/静物",
        }
    }
}

/// Perceptual profile of one analyzed image. Built once per image and never mutated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageProfile {
    pub average_luminance: f32,
    pub saturation: f32,
    /// Population standard deviation of luminance.
    pub contrast: f32,
    /// Mean of (R - B), in [-1, 1].
    pub warmth: f32,
    pub skin_ratio: f32,
    pub edge_density: f32,
    pub dominant_color: DominantColor,
    /// Ordered brightness, contrast, intensity, tone.
    pub mood_tags: [MoodTag; 4],
    pub content_guess: ContentGuess,
}

impl ImageProfile {
    pub fn has_mood(&self, tag: MoodTag) -> bool { self.mood_tags.contains(&tag) }

    pub fn summary(&self) -> ProfileSummary {
        ProfileSummary {
            content_guess: self.content_guess.as_str().to_string(),
            mood: self.mood_tags.iter().map(|t| t.as_str()).collect::<Vec<_>>().join(" · "),
        }
    }
}

/// Display strings for the UI layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSummary { pub content_guess: String, pub mood: String }

/* =========================
   Caption styles
   ========================= */

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CaptionStyle {
    #[default]
    Cinematic,
    Noir,
    Youth,
    Suspense,
    SciFi,
}

impl CaptionStyle {
    pub const ALL: [CaptionStyle; 5] = [
        CaptionStyle::Cinematic,
        CaptionStyle::Noir,
        CaptionStyle::Youth,
        CaptionStyle::Suspense,
        CaptionStyle::SciFi,
    ];

    /// Exact key lookup; `None` for anything outside the closed set.
    pub fn parse(key: &str) -> Option<Self> {
        match key.trim() {
            "cinematic" => Some(CaptionStyle::Cinematic),
            "noir" => Some(CaptionStyle::Noir),
            "youth" => Some(CaptionStyle::Youth),
            "suspense" => Some(CaptionStyle::Suspense),
            "sciFi" | "scifi" | "sci-fi" => Some(CaptionStyle::SciFi),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CaptionStyle::Cinematic => "cinematic",
            CaptionStyle::Noir => "noir",
            CaptionStyle::Youth => "youth",
            CaptionStyle::Suspense => "suspense",
            CaptionStyle::SciFi => "sciFi",
        }
    }
}

/* =========================
   Render settings
   ========================= */

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
    Cinema,
}

impl Theme {
    pub fn parse(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            "cinema" => Some(Theme::Cinema),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
    Webp,
}

impl OutputFormat {
    /// Accepts bare names, the `jpg` alias and mime types.
    pub fn parse(input: &str) -> Option<Self> {
        let normalized = input.trim().to_ascii_lowercase();
        match normalized.trim_start_matches("image/") {
            "png" => Some(OutputFormat::Png),
            "jpg" | "jpeg" => Some(OutputFormat::Jpeg),
            "webp" => Some(OutputFormat::Webp),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Webp => "webp",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Webp => "image/webp",
        }
    }

    pub fn is_lossy(self) -> bool { !matches!(self, OutputFormat::Png) }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Webp => "webp",
        })
    }
}

/// Output width cap. Serialized as `"original"` or a positive integer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum MaxWidth {
    #[default]
    Original,
    Limit(u32),
}

impl MaxWidth {
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("original") {
            return Some(MaxWidth::Original);
        }
        match s.parse::<u32>() {
            Ok(n) if n > 0 => Some(MaxWidth::Limit(n)),
            _ => None,
        }
    }

    pub fn limit(self) -> Option<u32> {
        match self {
            MaxWidth::Original => None,
            MaxWidth::Limit(n) => Some(n),
        }
    }
}

impl Serialize for MaxWidth {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            MaxWidth::Original => serializer.serialize_str("original"),
            MaxWidth::Limit(n) => serializer.serialize_u32(*n),
        }
    }
}

impl<'de> Deserialize<'de> for MaxWidth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Width(u64),
            Text(String),
            Unset(()),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Width(n) => match u32::try_from(n) {
                Ok(n) if n > 0 => Ok(MaxWidth::Limit(n)),
                _ => Err(de::Error::custom(format!("max width out of range: {n}"))),
            },
            Raw::Text(s) => MaxWidth::parse(&s)
                .ok_or_else(|| de::Error::custom(format!("expected a positive width or \"original\", got {s:?}"))),
            Raw::Unset(()) => Ok(MaxWidth::Original),
        }
    }
}

/// Font sizes a render accepts, in logical pixels.
pub const FONT_SIZE_RANGE: RangeInclusive<u32> = 12..=96;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub theme: Theme,
    pub font_size: u32,
    pub max_width: MaxWidth,
    pub format: OutputFormat,
    /// 0..1, only used by jpeg/webp.
    pub quality: f32,
    pub device_pixel_ratio: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            font_size: 36,
            max_width: MaxWidth::Original,
            format: OutputFormat::Png,
            quality: 0.92,
            device_pixel_ratio: 1.0,
        }
    }
}

impl RenderConfig {
    /// Reject settings that cannot produce a sane canvas.
    pub fn validate(&self) -> Result<()> {
        if !FONT_SIZE_RANGE.contains(&self.font_size) {
            return Err(CaptionError::InvalidConfig(format!(
                "font size {} outside {}..={}",
                self.font_size,
                FONT_SIZE_RANGE.start(),
                FONT_SIZE_RANGE.end()
            )));
        }
        Ok(())
    }

    /// Quality to hand to the encoder; `None` when the format is lossless.
    pub fn effective_quality(&self) -> Option<f32> {
        if !self.format.is_lossy() {
            return None;
        }
        Some(if self.quality.is_finite() { clamp01(self.quality) } else { 0.92 })
    }

    pub fn dpr(&self) -> f32 {
        if self.device_pixel_ratio.is_finite() { self.device_pixel_ratio.clamp(1.0, 2.0) } else { 1.0 }
    }

    pub fn output_width(&self, original_width: u32) -> u32 {
        match self.max_width {
            MaxWidth::Limit(limit) if limit > 0 => original_width.min(limit),
            _ => original_width,
        }
    }
}
/// `<basename>_subtitle.<ext>`; the basename loses its last extension.
pub fn suggested_filename(source_name: Option<&str>, format: OutputFormat) -> String {
    let base = source_name
        .map(|n| n.rsplit(['/', '\\']).next().unwrap_or(n))
        .map(|n| match n.rfind('.') {
            Some(i) if i > 0 => &n[..i],
            _ => n,
        })
        .filter(|n| !n.is_empty())
        .unwrap_or("caption");
    format!("{}_subtitle.{}", base, format.extension())
}
