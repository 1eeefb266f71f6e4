//! Closed vocabularies of the wardrobe application.
//!
//! The palette and the English lookup tables are read-only process-wide
//! statics. Term lists are kept longest-first so that substring scans prefer
//! the most specific entry ("navy blue" before "blue", "t-shirt" before
//! "shirt") and stay deterministic.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The application's color palette, declared in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaletteColor {
    Noir,
    Blanc,
    Gris,
    Bleu,
    Beige,
    Marron,
    Rouge,
    Rose,
    Vert,
    Jaune,
    Orange,
    Violet,
}

impl PaletteColor {
    /// Every palette entry, highest priority first.
    pub const ALL: [PaletteColor; 12] = [
        PaletteColor::Noir,
        PaletteColor::Blanc,
        PaletteColor::Gris,
        PaletteColor::Bleu,
        PaletteColor::Beige,
        PaletteColor::Marron,
        PaletteColor::Rouge,
        PaletteColor::Rose,
        PaletteColor::Vert,
        PaletteColor::Jaune,
        PaletteColor::Orange,
        PaletteColor::Violet,
    ];

    /// Substituted whenever nothing maps cleanly.
    pub const DEFAULT: PaletteColor = PaletteColor::Noir;

    /// Bucket every legwear garment is forced into.
    pub const LEGWEAR: PaletteColor = PaletteColor::Bleu;

    pub const DARK: PaletteColor = PaletteColor::Noir;
    pub const LIGHT: PaletteColor = PaletteColor::Blanc;

    pub fn label(&self) -> &'static str {
        match self {
            Self::Noir => "Noir",
            Self::Blanc => "Blanc",
            Self::Gris => "Gris",
            Self::Bleu => "Bleu",
            Self::Beige => "Beige",
            Self::Marron => "Marron",
            Self::Rouge => "Rouge",
            Self::Rose => "Rose",
            Self::Vert => "Vert",
            Self::Jaune => "Jaune",
            Self::Orange => "Orange",
            Self::Violet => "Violet",
        }
    }

    /// Position in the priority ranking, 0 being the highest.
    pub fn priority(&self) -> usize {
        Self::ALL.iter().position(|color| color == self).unwrap_or(Self::ALL.len())
    }

    /// Case-insensitive lookup by display label.
    pub fn from_label(label: &str) -> Option<PaletteColor> {
        let wanted = label.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|color| color.label().eq_ignore_ascii_case(wanted))
    }
}

impl fmt::Display for PaletteColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const COLOR_TERMS: &[(&str, PaletteColor)] = &[
    ("black", PaletteColor::Noir),
    ("jet black", PaletteColor::Noir),
    ("charcoal", PaletteColor::Gris),
    ("white", PaletteColor::Blanc),
    ("off-white", PaletteColor::Blanc),
    ("off white", PaletteColor::Blanc),
    ("ivory", PaletteColor::Blanc),
    ("cream", PaletteColor::Beige),
    ("grey", PaletteColor::Gris),
    ("gray", PaletteColor::Gris),
    ("silver", PaletteColor::Gris),
    ("heather", PaletteColor::Gris),
    ("blue", PaletteColor::Bleu),
    ("navy", PaletteColor::Bleu),
    ("navy blue", PaletteColor::Bleu),
    ("light blue", PaletteColor::Bleu),
    ("dark blue", PaletteColor::Bleu),
    ("sky blue", PaletteColor::Bleu),
    ("royal blue", PaletteColor::Bleu),
    ("denim", PaletteColor::Bleu),
    ("indigo", PaletteColor::Bleu),
    ("turquoise", PaletteColor::Bleu),
    ("cyan", PaletteColor::Bleu),
    ("beige", PaletteColor::Beige),
    ("tan", PaletteColor::Beige),
    ("khaki", PaletteColor::Beige),
    ("camel", PaletteColor::Beige),
    ("sand", PaletteColor::Beige),
    ("nude", PaletteColor::Beige),
    ("brown", PaletteColor::Marron),
    ("chocolate", PaletteColor::Marron),
    ("coffee", PaletteColor::Marron),
    ("cognac", PaletteColor::Marron),
    ("red", PaletteColor::Rouge),
    ("burgundy", PaletteColor::Rouge),
    ("maroon", PaletteColor::Rouge),
    ("crimson", PaletteColor::Rouge),
    ("scarlet", PaletteColor::Rouge),
    ("wine", PaletteColor::Rouge),
    ("pink", PaletteColor::Rose),
    ("fuchsia", PaletteColor::Rose),
    ("magenta", PaletteColor::Rose),
    ("salmon", PaletteColor::Rose),
    ("coral", PaletteColor::Orange),
    ("green", PaletteColor::Vert),
    ("olive", PaletteColor::Vert),
    ("khaki green", PaletteColor::Vert),
    ("mint", PaletteColor::Vert),
    ("emerald", PaletteColor::Vert),
    ("teal", PaletteColor::Vert),
    ("yellow", PaletteColor::Jaune),
    ("mustard", PaletteColor::Jaune),
    ("gold", PaletteColor::Jaune),
    ("golden", PaletteColor::Jaune),
    ("orange", PaletteColor::Orange),
    ("rust", PaletteColor::Orange),
    ("purple", PaletteColor::Violet),
    ("violet", PaletteColor::Violet),
    ("lavender", PaletteColor::Violet),
    ("lilac", PaletteColor::Violet),
    ("plum", PaletteColor::Violet),
];

const CATEGORY_TERMS: &[(&str, &str)] = &[
    ("t-shirt", "T-shirt"),
    ("tshirt", "T-shirt"),
    ("tee", "T-shirt"),
    ("tank top", "Débardeur"),
    ("shirt", "Chemise"),
    ("blouse", "Chemisier"),
    ("polo", "Polo"),
    ("sweatshirt", "Sweat"),
    ("hoodie", "Sweat à capuche"),
    ("sweater", "Pull"),
    ("jumper", "Pull"),
    ("pullover", "Pull"),
    ("cardigan", "Gilet"),
    ("pants", "Pantalon"),
    ("trousers", "Pantalon"),
    ("chinos", "Pantalon"),
    ("sweatpants", "Jogging"),
    ("joggers", "Jogging"),
    ("jeans", "Jean"),
    ("leggings", "Legging"),
    ("shorts", "Short"),
    ("dress", "Robe"),
    ("skirt", "Jupe"),
    ("jacket", "Veste"),
    ("blazer", "Veste"),
    ("down jacket", "Doudoune"),
    ("puffer jacket", "Doudoune"),
    ("puffer", "Doudoune"),
    ("coat", "Manteau"),
    ("raincoat", "Imperméable"),
    ("parka", "Parka"),
    ("suit", "Costume"),
    ("swimsuit", "Maillot de bain"),
    ("shoes", "Chaussures"),
    ("sneakers", "Baskets"),
    ("trainers", "Baskets"),
    ("boots", "Bottes"),
    ("sandals", "Sandales"),
    ("hat", "Chapeau"),
    ("cap", "Casquette"),
    ("beanie", "Bonnet"),
    ("scarf", "Écharpe"),
    ("gloves", "Gants"),
    ("bag", "Sac"),
    ("belt", "Ceinture"),
    ("other", "Autre"),
];

/// Substrings marking legwear. Matching garments are forced into the denim bucket.
pub const LEGWEAR_KEYWORDS: &[&str] = &[
    "jean", "pants", "pantalon", "trouser", "legging", "denim", "shorts", "chino",
];

pub const FALLBACK_COLORS: &[PaletteColor] = &[
    PaletteColor::Noir,
    PaletteColor::Blanc,
    PaletteColor::Gris,
    PaletteColor::Bleu,
    PaletteColor::Beige,
];

pub const FALLBACK_CATEGORIES: &[&str] = &["T-shirt", "Chemise", "Pull", "Pantalon", "Veste"];

/// Label used when a category token is empty.
pub const UNKNOWN_CATEGORY_LABEL: &str = "Autre";

fn longest_first<T: Copy>(terms: &[(&'static str, T)]) -> Vec<(&'static str, T)> {
    let mut ordered = terms.to_vec();
    // stable, so equal lengths keep declaration order
    ordered.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    ordered
}

static COLOR_INDEX: Lazy<HashMap<&'static str, PaletteColor>> = Lazy::new(|| COLOR_TERMS.iter().copied().collect());
static COLOR_SCAN: Lazy<Vec<(&'static str, PaletteColor)>> = Lazy::new(|| longest_first(COLOR_TERMS));
static CATEGORY_INDEX: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| CATEGORY_TERMS.iter().copied().collect());
static CATEGORY_SCAN: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| longest_first(CATEGORY_TERMS));

pub fn color_exact(term: &str) -> Option<PaletteColor> {
    COLOR_INDEX.get(term).copied()
}

/// English color terms, longest first.
pub fn color_terms() -> &'static [(&'static str, PaletteColor)] {
    &COLOR_SCAN
}

pub fn category_exact(term: &str) -> Option<&'static str> {
    CATEGORY_INDEX.get(term).copied()
}

/// English category terms, longest first.
pub fn category_terms() -> &'static [(&'static str, &'static str)] {
    &CATEGORY_SCAN
}

/// The known color word appearing earliest in free text, if any.
///
/// Matches whole words only, so "covered" does not yield "red".
pub fn find_color_word(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    let words = split_words(&lowered);
    for (position, word) in words.iter().enumerate() {
        // at each position the two-word term wins ("navy blue" over "navy")
        if let Some(next) = words.get(position + 1) {
            let joined = format!("{} {}", word, next);
            if let Some((term, _)) = COLOR_INDEX.get_key_value(joined.as_str()) {
                return Some(*term);
            }
        }
        if let Some((term, _)) = COLOR_INDEX.get_key_value(*word) {
            return Some(*term);
        }
    }
    None
}

pub fn is_legwear(text: &str) -> bool {
    let lowered = text.to_lowercase();
    LEGWEAR_KEYWORDS.iter().any(|keyword| lowered.contains(keyword))
}

/// Splits on anything that is not a letter, digit or hyphen.
pub fn split_words(text: &str) -> Vec<&str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '-'))
        .filter(|word| !word.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_priority_and_labels() {
        assert_eq!(PaletteColor::DEFAULT.priority(), 0);
        assert_eq!(PaletteColor::ALL[0], PaletteColor::DEFAULT);
        assert_eq!(PaletteColor::from_label("bleu"), Some(PaletteColor::Bleu));
        assert_eq!(PaletteColor::from_label(" ROUGE "), Some(PaletteColor::Rouge));
        assert_eq!(PaletteColor::from_label("blue"), None);
    }

    #[test]
    fn scans_are_longest_first() {
        let terms = color_terms();
        let navy_blue = terms.iter().position(|(term, _)| *term == "navy blue").unwrap();
        let blue = terms.iter().position(|(term, _)| *term == "blue").unwrap();
        assert!(navy_blue < blue);

        let categories = category_terms();
        let tshirt = categories.iter().position(|(term, _)| *term == "t-shirt").unwrap();
        let shirt = categories.iter().position(|(term, _)| *term == "shirt").unwrap();
        assert!(tshirt < shirt);
    }

    #[test]
    fn finds_color_words_in_captions() {
        assert_eq!(find_color_word("a red cotton t-shirt on a hanger"), Some("red"));
        assert_eq!(find_color_word("A pair of Navy Blue chinos"), Some("navy blue"));
        assert_eq!(find_color_word("a garment covered in dust"), None);
        assert_eq!(find_color_word(""), None);
    }

    #[test]
    fn earliest_color_wins_over_later_shades() {
        assert_eq!(find_color_word("a white shirt with navy blue stripes"), Some("white"));
        assert_eq!(find_color_word("navy blue jacket with red lining"), Some("navy blue"));
    }

    #[test]
    fn legwear_keywords() {
        assert!(is_legwear("jeans"));
        assert!(is_legwear("Pantalon"));
        assert!(is_legwear("a pair of blue JEANS"));
        assert!(is_legwear("cargo shorts"));
        assert!(!is_legwear("t-shirt"));
        assert!(!is_legwear("Short"));
    }
}
