//! Character classes for the Arabic script and cleaning of raw corpus text.

use lazy_static::lazy_static;
use regex::Regex;

/// The Hamza family: the glottal stop in its orthographic variants
/// (bare, over Alef, over Waw, under Alef, over Yeh).
pub const HAMZAS: [char; 5] = [
    '\u{0621}', // ء
    '\u{0623}', // أ
    '\u{0624}', // ؤ
    '\u{0625}', // إ
    '\u{0626}', // ئ
];

pub fn is_hamza(c: char) -> bool {
    HAMZAS.contains(&c)
}

/// The eight combining marks that can be written after a Hamza
/// (tanwin forms, short vowels, shadda and sukun).
pub fn is_diacritic(c: char) -> bool {
    matches!(c, '\u{064B}'..='\u{0652}')
}

/// Removes every character outside the Arabic block, keeping whitespace.
/// Total over any input and idempotent.
pub fn clean_text(text: &str) -> String {
    lazy_static! {
        static ref NON_ARABIC: Regex = Regex::new(r"[^؀-ۿ\s]").unwrap();
    }

    NON_ARABIC.replace_all(text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn cleaning_strips_latin_and_digits() {
        assert_eq!(clean_text("hello نبأ world123"), " نبأ ");
    }

    #[test]
    fn cleaning_keeps_fully_arabic_text() {
        assert_eq!(clean_text("نبأَ كتب"), "نبأَ كتب");
    }

    #[test]
    fn cleaning_empty_text_is_empty() {
        assert_eq!(clean_text(""), "");
    }

    #[quickcheck]
    fn can_clean_anything(text: String) -> bool {
        let cleaned = clean_text(&text);
        cleaned
            .chars()
            .all(|c| ('\u{0600}'..='\u{06FF}').contains(&c) || c.is_whitespace())
    }

    #[quickcheck]
    fn cleaning_is_idempotent(text: String) -> bool {
        let once = clean_text(&text);
        clean_text(&once) == once
    }

    #[test]
    fn diacritic_range_has_eight_members() {
        assert_eq!(('\u{064B}'..='\u{0652}').filter(|c| is_diacritic(*c)).count(), 8);
    }

    #[test]
    fn hamza_under_alef_is_recognized() {
        assert!(is_hamza('إ'));
    }
}
