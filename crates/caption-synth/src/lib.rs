//! Caption synthesis: profile + keywords → context → templated line from a style bank.

pub mod bank;
pub mod context;
pub mod rng;

use caption_core::{CaptionStyle, ImageProfile};
use text_features::split_keywords;
use tracing::{debug, warn};

pub use context::CaptionContext;
pub use rng::{ClockSeed, FixedSeed, Mulberry32, SeedSource};

/// At most this many keywords appear in the optional suffix.
const SUFFIX_KEYWORDS: usize = 3;

/// Unknown keys fall back to the cinematic bank.
pub fn resolve_style(key: &str) -> CaptionStyle {
    CaptionStyle::parse(key).unwrap_or_else(|| {
        warn!(style = key, "unknown caption style, using cinematic");
        CaptionStyle::default()
    })
}

/// One caption from `style`'s bank. Draws from `rng` for the template and,
/// when keywords exist, once more for the suffix (one chance in four).
pub fn synthesize(profile: &ImageProfile, style: CaptionStyle, keywords_raw: &str, rng: &mut Mulberry32) -> String {
    let keywords = split_keywords(keywords_raw);
    let ctx = CaptionContext::build(profile, &keywords);

    let list = bank::templates(style);
    let template = rng.pick(list).copied().unwrap_or_default();
    let mut line = ctx.fill(template);

    if !keywords.is_empty() {
        let extra = keywords[..keywords.len().min(SUFFIX_KEYWORDS)].join(" / ");
        let tails = [String::new(), String::new(), String::new(), format!("（{}）", extra)];
        if let Some(tail) = rng.pick(&tails) {
            line.push_str(tail);
        }
    }
    debug!(style = style.as_str(), keywords = keywords.len(), caption = %line, "caption synthesized");
    line
}

/// Reseeds a fresh generator from its [`SeedSource`] on every call.
pub struct Captioner {
    seeds: Box<dyn SeedSource>,
}

impl Default for Captioner {
    fn default() -> Self { Self::new(Box::new(ClockSeed)) }
}

impl Captioner {
    pub fn new(seeds: Box<dyn SeedSource>) -> Self { Self { seeds } }

    pub fn caption(&mut self, profile: &ImageProfile, style: CaptionStyle, keywords_raw: &str) -> String {
        let mut rng = Mulberry32::new(self.seeds.next_seed());
        synthesize(profile, style, keywords_raw, &mut rng)
    }

    pub fn caption_for_key(&mut self, profile: &ImageProfile, style_key: &str, keywords_raw: &str) -> String {
        self.caption(profile, resolve_style(style_key), keywords_raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caption_core::{ContentGuess, DominantColor, MoodTag};

    fn gray_landscape() -> ImageProfile {
        ImageProfile {
            average_luminance: 0.5,
            saturation: 0.0,
            contrast: 0.0,
            warmth: 0.0,
            skin_ratio: 0.0,
            edge_density: 0.0,
            dominant_color: DominantColor::Gray,
            mood_tags: [MoodTag::Dusk, MoodTag::SoftLight, MoodTag::Restrained, MoodTag::Neutral],
            content_guess: ContentGuess::Landscape,
        }
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        let p = gray_landscape();
        for style in CaptionStyle::ALL {
            let a = synthesize(&p, style, "雨, 伞", &mut Mulberry32::new(42));
            let b = synthesize(&p, style, "雨, 伞", &mut Mulberry32::new(42));
            assert_eq!(a, b);
        }
        let mut c1 = Captioner::new(Box::new(FixedSeed(7)));
        let mut c2 = Captioner::new(Box::new(FixedSeed(7)));
        assert_eq!(c1.caption(&p, CaptionStyle::Noir, ""), c2.caption(&p, CaptionStyle::Noir, ""));
    }

    #[test]
    fn empty_keywords_use_content_fallbacks() {
        let p = gray_landscape();
        let ctx = CaptionContext::build(&p, &[]);
        assert_eq!((ctx.scene.as_str(), ctx.object.as_str()), ("远处", "风"));
        assert_eq!((ctx.time_word, ctx.tone_word, ctx.verb), ("黄昏", "淡", "放下"));
        assert_eq!((ctx.light_word, ctx.intensity_word, ctx.dominant_color), ("柔", "轻", "灰"));

        let expected: Vec<String> = bank::templates(CaptionStyle::Cinematic).iter().map(|t| ctx.fill(t)).collect();
        for seed in 0..50 {
            let line = synthesize(&p, CaptionStyle::Cinematic, "", &mut Mulberry32::new(seed));
            assert!(expected.contains(&line), "{line}");
        }
    }

    #[test]
    fn keywords_fill_scene_and_object() {
        let mut p = gray_landscape();
        p.content_guess = ContentGuess::Urban;
        p.mood_tags = [MoodTag::Night, MoodTag::HighContrast, MoodTag::Intense, MoodTag::Cool];
        let ctx = CaptionContext::build(&p, &["码头".to_string()]);
        assert_eq!(ctx.scene, "码头");
        assert_eq!(ctx.object, "霓虹");
        assert_eq!((ctx.time_word, ctx.verb, ctx.light_word, ctx.intensity_word), ("夜", "收起", "硬", "浓"));
        assert_eq!(ctx.fill("{scene}|{object}|{unknown}"), "码头|霓虹|{unknown}");
    }

    #[test]
    fn every_template_is_fully_substituted() {
        let p = gray_landscape();
        let ctx = CaptionContext::build(&p, &["a".into(), "b".into()]);
        for style in CaptionStyle::ALL {
            for t in bank::templates(style) {
                let filled = ctx.fill(t);
                assert!(!filled.contains('{') && !filled.contains('}'), "{filled}");
            }
        }
    }

    #[test]
    fn keyword_suffix_appears_about_one_time_in_four() {
        let p = gray_landscape();
        let mut hits = 0;
        for seed in 0..2000u32 {
            let line = synthesize(&p, CaptionStyle::Youth, "雨 伞 街 灯", &mut Mulberry32::new(seed.wrapping_mul(2654435761)));
            if line.ends_with("（雨 / 伞 / 街）") {
                hits += 1;
            }
        }
        assert!((350..650).contains(&hits), "{hits}");
    }

    #[test]
    fn no_suffix_without_keywords() {
        let p = gray_landscape();
        for seed in 0..200 {
            let line = synthesize(&p, CaptionStyle::SciFi, "  ,, ", &mut Mulberry32::new(seed));
            assert!(!line.ends_with('）'));
        }
    }

    #[test]
    fn unknown_style_falls_back() {
        assert_eq!(resolve_style("western"), CaptionStyle::Cinematic);
        assert_eq!(resolve_style("suspense"), CaptionStyle::Suspense);
    }
}
