use super::{Strategy, StrategyOutcome};
use crate::types::{ImageReference, Result, StrategyKind};
use crate::validation::validate_color;
use crate::vocabulary::{self, PaletteColor, FALLBACK_CATEGORIES, FALLBACK_COLORS, UNKNOWN_CATEGORY_LABEL};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::info;

/// Fabricates a plausible answer without calling anything. Cannot fail.
///
/// With a seed, every pick is the same; without one, each pick is drawn
/// from fresh entropy.
#[derive(Debug, Clone, Default)]
pub struct FallbackRandom {
    seed: Option<u64>,
}

impl FallbackRandom {
    pub fn new(seed: Option<u64>) -> Self {
        Self { seed }
    }

    pub fn pick(&self) -> StrategyOutcome {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let category = FALLBACK_CATEGORIES
            .choose(&mut rng)
            .copied()
            .unwrap_or(UNKNOWN_CATEGORY_LABEL);
        let color = FALLBACK_COLORS.choose(&mut rng).copied().unwrap_or(PaletteColor::DEFAULT);

        // the legwear prior holds even for made-up answers
        let color = validate_color(color.label(), vocabulary::is_legwear(category));
        info!("Fallback picked color {}, category {}", color, category);

        StrategyOutcome {
            color,
            category: category.to_string(),
        }
    }
}

#[async_trait]
impl Strategy for FallbackRandom {
    fn kind(&self) -> StrategyKind {
        StrategyKind::FallbackRandom
    }

    async fn analyze(&self, _image: &ImageReference) -> Result<StrategyOutcome> {
        Ok(self.pick())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_from_the_short_lists() {
        let fallback = FallbackRandom::default();
        for _ in 0..200 {
            let outcome = fallback.pick();
            assert!(FALLBACK_CATEGORIES.contains(&outcome.category.as_str()));
            assert!(PaletteColor::ALL.contains(&outcome.color));
            if vocabulary::is_legwear(&outcome.category) {
                assert_eq!(outcome.color, PaletteColor::LEGWEAR);
            }
        }
    }

    #[test]
    fn seeded_picks_repeat() {
        let fallback = FallbackRandom::new(Some(42));
        let first = fallback.pick();
        for _ in 0..20 {
            assert_eq!(fallback.pick(), first);
        }
    }
}
