//! Complete, self-contained attempts at producing an attribute set.
//!
//! The orchestrator walks them in a fixed order: combined, traditional,
//! then the random fallback which cannot fail.

pub mod combined;
pub mod fallback;
pub mod traditional;

pub use combined::CombinedAnalysis;
pub use fallback::FallbackRandom;
pub use traditional::TraditionalAnalysis;

use crate::translation::{to_canonical_category, to_canonical_color};
use crate::types::{ImageReference, Result, StrategyKind};
use crate::validation::validate_color;
use crate::vocabulary::{self, PaletteColor};
use async_trait::async_trait;

#[async_trait]
pub trait Strategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Either a complete outcome or an error that sends the orchestrator on.
    async fn analyze(&self, image: &ImageReference) -> Result<StrategyOutcome>;
}

/// Validated color and display category, before temperature is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyOutcome {
    pub color: PaletteColor,
    pub category: String,
}

impl StrategyOutcome {
    /// Runs an English color token and category through translation and
    /// validation, applying the legwear prior from either form of the category.
    pub fn from_english(color_token: &str, category: &str) -> Self {
        let canonical_category = to_canonical_category(category);
        let legwear = vocabulary::is_legwear(category) || vocabulary::is_legwear(&canonical_category);
        let translated = to_canonical_color(color_token, legwear);
        Self {
            color: validate_color(translated.label(), legwear),
            category: canonical_category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legwear_overrides_extracted_color() {
        let outcome = StrategyOutcome::from_english("red", "jeans");
        assert_eq!(outcome.color, PaletteColor::Bleu);
        assert_eq!(outcome.category, "Jean");
    }

    #[test]
    fn regular_garments_keep_their_color() {
        let outcome = StrategyOutcome::from_english("burgundy", "sweater");
        assert_eq!(outcome.color, PaletteColor::Rouge);
        assert_eq!(outcome.category, "Pull");
    }

    #[test]
    fn unknown_color_lands_on_default() {
        let outcome = StrategyOutcome::from_english("unknown", "dress");
        assert_eq!(outcome.color, PaletteColor::DEFAULT);
        assert_eq!(outcome.category, "Robe");
    }
}
