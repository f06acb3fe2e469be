//! Caption face lookup among the installed system fonts.

use ab_glyph::{Font, FontRef, FontVec};
use fontdb::{Database, Family, Query, Stretch, Style, Weight, ID};
use tracing::{info, warn};

use crate::glyphs::GlyphSource;

/// Serif faces tried in order. `Serif` is the platform serif; `ui-serif` has no portable lookup.
pub const CAPTION_FAMILIES: &[Family<'static>] = &[
    Family::Name("Songti SC"),
    Family::Name("SimSun"),
    Family::Name("Noto Serif SC"),
    Family::Name("Noto Serif CJK SC"),
    Family::Serif,
];

/// A face must map this to a real glyph to be usable for captions.
const CJK_SAMPLE: char = '夜';

pub(crate) fn first_available<'a, T>(families: &'a [Family<'a>], lookup: impl FnMut(&'a Family<'a>) -> Option<T>) -> Option<T> {
    families.iter().find_map(lookup)
}

fn covers_cjk(db: &Database, id: ID) -> bool {
    db.with_face_data(id, |data, index| {
        FontRef::try_from_slice_and_index(data, index).map_or(false, |font| font.glyph_id(CJK_SAMPLE).0 != 0)
    })
    .unwrap_or(false)
}

/// First preferred family with CJK coverage, then any installed face with it.
pub fn find_caption_face(db: &Database) -> Option<ID> {
    first_available(CAPTION_FAMILIES, |family| {
        let query = Query {
            families: std::slice::from_ref(family),
            weight: Weight::EXTRA_BOLD,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        db.query(&query).filter(|id| covers_cjk(db, *id))
    })
    .or_else(|| db.faces().map(|f| f.id).find(|id| covers_cjk(db, *id)))
}

fn family_name(db: &Database, id: ID) -> String {
    db.face(id)
        .and_then(|f| f.families.first())
        .map(|(name, _)| name.clone())
        .unwrap_or_default()
}

impl GlyphSource {
    /// Caption face from the system font set, or bitmap glyphs when nothing covers CJK.
    pub fn system() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        Self::from_database(&db)
    }

    pub fn from_database(db: &Database) -> Self {
        let found = find_caption_face(db).and_then(|id| {
            let font = db
                .with_face_data(id, |data, index| FontVec::try_from_vec_and_index(data.to_vec(), index).ok())
                .flatten()?;
            Some((family_name(db, id), font))
        });
        match found {
            Some((family, font)) => {
                info!(family = %family, faces = db.len(), "caption font resolved");
                GlyphSource::Outline(font)
            }
            None => {
                warn!(faces = db.len(), "no installed font covers CJK text, using built-in bitmap glyphs");
                GlyphSource::Bitmap
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn families_are_tried_in_preference_order() {
        let mut tried = Vec::new();
        let picked = first_available(CAPTION_FAMILIES, |f| {
            tried.push(*f);
            match f {
                Family::Name("SimSun") | Family::Name("Noto Serif SC") | Family::Serif => Some(*f),
                _ => None,
            }
        });
        assert_eq!(picked, Some(Family::Name("SimSun")));
        assert_eq!(tried, [Family::Name("Songti SC"), Family::Name("SimSun")]);

        let picked = first_available(CAPTION_FAMILIES, |f| (*f == Family::Serif).then_some(*f));
        assert_eq!(picked, Some(Family::Serif));
        assert_eq!(first_available(CAPTION_FAMILIES, |_| None::<()>), None);
    }

    #[test]
    fn empty_font_set_falls_back_to_bitmap() {
        let db = Database::new();
        assert_eq!(find_caption_face(&db), None);
        assert!(matches!(GlyphSource::from_database(&db), GlyphSource::Bitmap));
    }

    #[test]
    fn unparseable_face_is_skipped() {
        let mut db = Database::new();
        db.load_font_data(vec![0u8; 64]);
        assert_eq!(find_caption_face(&db), None);
    }

    #[test]
    fn system_font_when_resolved_covers_cjk() {
        if let GlyphSource::Outline(font) = GlyphSource::system() {
            assert_ne!(font.glyph_id(CJK_SAMPLE).0, 0);
        }
    }
}
