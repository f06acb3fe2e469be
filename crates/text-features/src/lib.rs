//! Text helpers: keyword splitting and character-granular line wrapping.

pub mod wrap;

pub use wrap::wrap_text;

/// ASCII and full-width list separators plus any whitespace.
fn is_keyword_separator(c: char) -> bool {
    matches!(c, ',' | '，' | '、' | '/' | '|' | ';' | '；') || c.is_whitespace()
}

/// Split free text into keywords, keeping their order. Separator runs collapse.
pub fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(is_keyword_separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
