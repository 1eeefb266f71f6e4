use garment_detector::resolver::vote;
use garment_detector::vocabulary::{self, PaletteColor};
use garment_detector::{
    to_canonical_category, to_canonical_color, validate_color, ColorCandidate, ExtractionMethod,
    StrategyOutcome,
};
use proptest::prelude::*;

fn method() -> impl Strategy<Value = ExtractionMethod> {
    prop_oneof![
        Just(ExtractionMethod::DirectQuery),
        Just(ExtractionMethod::Caption),
        Just(ExtractionMethod::AlternateQuery),
        Just(ExtractionMethod::DominantColor),
    ]
}

fn color_word() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("red".to_string()),
        Just("Blue".to_string()),
        Just("navy blue".to_string()),
        Just("black".to_string()),
        Just("teal".to_string()),
        "[a-z]{1,8}",
    ]
}

proptest! {
    #[test]
    fn any_token_translates_into_the_palette(token in ".{0,40}", legwear in any::<bool>()) {
        let color = to_canonical_color(&token, legwear);
        prop_assert!(PaletteColor::ALL.contains(&color));
        prop_assert!(PaletteColor::from_label(color.label()).is_some());
    }

    #[test]
    fn legwear_is_always_blue(token in ".{0,40}") {
        prop_assert_eq!(to_canonical_color(&token, true), PaletteColor::LEGWEAR);
        prop_assert_eq!(validate_color(&token, true), PaletteColor::LEGWEAR);
    }

    #[test]
    fn validation_closes_over_the_palette(candidate in ".{0,40}") {
        let color = validate_color(&candidate, false);
        prop_assert!(PaletteColor::ALL.contains(&color));
    }

    #[test]
    fn categories_are_never_empty(token in ".{0,40}") {
        let category = to_canonical_category(&token);
        prop_assert!(!category.is_empty());
        prop_assert_eq!(category.trim(), category.as_str());
    }

    #[test]
    fn legwear_categories_from_any_color(
        color in ".{0,20}",
        garment in "[a-z ]{0,10}(jeans|pants|trousers|leggings|shorts|chinos|denim|pantalon)[a-z ]{0,10}"
    ) {
        prop_assert!(vocabulary::is_legwear(&garment));
        let outcome = StrategyOutcome::from_english(&color, &garment);
        prop_assert_eq!(outcome.color, PaletteColor::LEGWEAR);
        prop_assert_eq!(validate_color(&color, vocabulary::is_legwear(&garment)), PaletteColor::LEGWEAR);
    }

    #[test]
    fn vote_is_deterministic_and_picks_a_candidate(
        entries in prop::collection::vec((color_word(), method()), 1..8)
    ) {
        let candidates: Vec<ColorCandidate> = entries
            .iter()
            .map(|(token, method)| ColorCandidate::new(token.clone(), *method))
            .collect();

        let first = vote(&candidates);
        prop_assert_eq!(vote(&candidates), first.clone());

        let winner = first.expect("non-empty tokens always produce a winner");
        prop_assert!(candidates
            .iter()
            .any(|candidate| candidate.normalized() == winner || candidate.token.trim() == winner));
    }
}
