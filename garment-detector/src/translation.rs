//! Maps free-form English tokens onto the application's closed vocabularies.
//!
//! Both functions are total: any input, including empty strings and
//! garbage, produces a usable answer.

use crate::vocabulary::{self, PaletteColor, UNKNOWN_CATEGORY_LABEL};

/// Truncated tokens ("blu" for "blue") are only completed from this length on.
const MIN_REVERSE_MATCH_LEN: usize = 3;

/// Terms this short only match as whole words, so "red" is not found in
/// "colored" nor "tan" in "tangerine".
const MAX_WHOLE_WORD_TERM_LEN: usize = 3;

/// Trimmed, lowercased, without wrapping quotes or trailing punctuation.
pub fn normalize_token(token: &str) -> String {
    token
        .trim()
        .trim_matches(|c: char| c.is_ascii_punctuation() && c != '-')
        .trim()
        .to_lowercase()
}

pub fn to_canonical_color(token: &str, is_legwear: bool) -> PaletteColor {
    if is_legwear {
        return PaletteColor::LEGWEAR;
    }

    let normalized = normalize_token(token);
    if normalized.is_empty() {
        return PaletteColor::DEFAULT;
    }

    if let Some(color) = lookup_color(&normalized) {
        return color;
    }

    for (term, color) in vocabulary::color_terms() {
        if forward_match(term, &normalized) || reverse_match(term, &normalized) {
            return *color;
        }
    }

    for word in vocabulary::split_words(&normalized) {
        if let Some(color) = lookup_color(word) {
            return color;
        }
    }

    if normalized.contains("dark") {
        return PaletteColor::DARK;
    }
    if normalized.contains("light") || normalized.contains("pale") {
        return PaletteColor::LIGHT;
    }

    PaletteColor::DEFAULT
}

/// The token mentions the term. Short terms must stand as a whole word.
fn forward_match(term: &str, token: &str) -> bool {
    if term.len() <= MAX_WHOLE_WORD_TERM_LEN {
        token.split(|c: char| !c.is_alphanumeric()).any(|word| word == term)
    } else {
        token.contains(term)
    }
}

/// The token is a truncated single-word term ("blu" for "blue").
/// Multi-word terms are skipped so "dark" does not land on "dark blue", and
/// only prefixes count so "and" is not read as "sand".
fn reverse_match(term: &str, token: &str) -> bool {
    token.len() >= MIN_REVERSE_MATCH_LEN && !term.contains(' ') && term.starts_with(token)
}

fn lookup_color(term: &str) -> Option<PaletteColor> {
    vocabulary::color_exact(term).or_else(|| PaletteColor::from_label(term))
}

pub fn to_canonical_category(token: &str) -> String {
    let normalized = normalize_token(token);
    if normalized.is_empty() {
        return UNKNOWN_CATEGORY_LABEL.to_string();
    }

    if let Some(label) = vocabulary::category_exact(&normalized) {
        return label.to_string();
    }

    for (term, label) in vocabulary::category_terms() {
        if forward_match(term, &normalized) || reverse_match(term, &normalized) {
            return label.to_string();
        }
    }

    capitalize(&normalized)
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_and_case_insensitive() {
        assert_eq!(to_canonical_color("red", false), PaletteColor::Rouge);
        assert_eq!(to_canonical_color("  NAVY ", false), PaletteColor::Bleu);
        assert_eq!(to_canonical_color("\"Black.\"", false), PaletteColor::Noir);
        assert_eq!(to_canonical_color("Vert", false), PaletteColor::Vert);
    }

    #[test]
    fn substring_and_word_matches() {
        assert_eq!(to_canonical_color("light grey melange", false), PaletteColor::Gris);
        assert_eq!(to_canonical_color("burgundyish", false), PaletteColor::Rouge);
        assert_eq!(to_canonical_color("blu", false), PaletteColor::Bleu);
        assert_eq!(to_canonical_color("pull bleu", false), PaletteColor::Bleu);
    }

    #[test]
    fn short_terms_only_match_whole_words() {
        assert_eq!(to_canonical_color("multicolored", false), PaletteColor::DEFAULT);
        assert_eq!(to_canonical_color("colored", false), PaletteColor::DEFAULT);
        assert_eq!(to_canonical_color("tangerine", false), PaletteColor::DEFAULT);
        assert_eq!(to_canonical_color("and", false), PaletteColor::DEFAULT);
        assert_eq!(to_canonical_color("old", false), PaletteColor::DEFAULT);
        assert_eq!(to_canonical_color("bright red", false), PaletteColor::Rouge);
        assert_eq!(to_canonical_color("dark red", false), PaletteColor::Rouge);
        assert_eq!(to_canonical_category("what is that"), "What is that");
        assert_eq!(to_canonical_category("straw hat"), "Chapeau");
    }

    #[test]
    fn dark_and_light_heuristics() {
        assert_eq!(to_canonical_color("dark", false), PaletteColor::DARK);
        assert_eq!(to_canonical_color("very light", false), PaletteColor::LIGHT);
    }

    #[test]
    fn falls_back_to_default() {
        assert_eq!(to_canonical_color("unknown", false), PaletteColor::DEFAULT);
        assert_eq!(to_canonical_color("", false), PaletteColor::DEFAULT);
        assert_eq!(to_canonical_color("ñ§¶", false), PaletteColor::DEFAULT);
    }

    #[test]
    fn legwear_short_circuits() {
        assert_eq!(to_canonical_color("red", true), PaletteColor::LEGWEAR);
        assert_eq!(to_canonical_color("", true), PaletteColor::LEGWEAR);
    }

    #[test]
    fn categories() {
        assert_eq!(to_canonical_category("jeans"), "Jean");
        assert_eq!(to_canonical_category("T-Shirt"), "T-shirt");
        assert_eq!(to_canonical_category("a white t-shirt"), "T-shirt");
        assert_eq!(to_canonical_category("long puffer jacket"), "Doudoune");
        assert_eq!(to_canonical_category("jean"), "Jean");
        assert_eq!(to_canonical_category("pantalon"), "Pantalon");
        assert_eq!(to_canonical_category("kimono"), "Kimono");
        assert_eq!(to_canonical_category("   "), "Autre");
    }
}
