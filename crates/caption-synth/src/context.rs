use caption_core::{ContentGuess, ImageProfile, MoodTag};
use serde::Serialize;

/// Values substituted into a template. Every field is non-empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CaptionContext {
    pub scene: String,
    pub object: String,
    pub time_word: &'static str,
    pub tone_word: &'static str,
    pub light_word: &'static str,
    pub intensity_word: &'static str,
    pub dominant_color: &'static str,
    pub verb: &'static str,
}

impl CaptionContext {
    /// First two keywords become scene and object; the content guess fills the gaps.
    pub fn build(profile: &ImageProfile, keywords: &[String]) -> Self {
        let time_word = if profile.has_mood(MoodTag::Night) {
            "夜"
        } else if profile.has_mood(MoodTag::Daylight) {
            "白天"
        } else {
            "黄昏"
        };
        let tone_word = if profile.has_mood(MoodTag::Cool) {
            "冷"
        } else if profile.has_mood(MoodTag::Warm) {
            "暖"
        } else {
            "淡"
        };
        let light_word = if profile.has_mood(MoodTag::HighContrast) { "硬" } else { "柔" };
        let intensity_word = if profile.has_mood(MoodTag::Intense) {
            "浓"
        } else if profile.has_mood(MoodTag::Restrained) {
            "轻"
        } else {
            "稳"
        };
        let verb = match tone_word {
            "冷" => "收起",
            "暖" => "抱紧",
            _ => "放下",
        };

        let (scene_fallback, object_fallback) = match profile.content_guess {
            ContentGuess::Person => ("镜头", "眼神"),
            ContentGuess::Urban => ("街口", "霓虹"),
            ContentGuess::Landscape => ("远处", "风"),
        };
        let keyword = |i: usize, fallback: &str| {
            keywords.get(i).filter(|k| !k.is_empty()).cloned().unwrap_or_else(|| fallback.to_string())
        };

        Self {
            scene: keyword(0, scene_fallback),
            object: keyword(1, object_fallback),
            time_word,
            tone_word,
            light_word,
            intensity_word,
            dominant_color: profile.dominant_color.label(),
            verb,
        }
    }

    /// Replace every placeholder present in `template`; unknown braces are left alone.
    pub fn fill(&self, template: &str) -> String {
        template
            .replace("{scene}", &self.scene)
            .replace("{object}", &self.object)
            .replace("{timeWord}", self.time_word)
            .replace("{toneWord}", self.tone_word)
            .replace("{lightWord}", self.light_word)
            .replace("{intensityWord}", self.intensity_word)
            .replace("{dominantColor}", self.dominant_color)
            .replace("{verb}", self.verb)
    }
}
