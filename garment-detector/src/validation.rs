use crate::vocabulary::PaletteColor;
use tracing::{debug, warn};

/// Last check before a color leaves the pipeline.
///
/// Legwear is forced into the denim bucket; anything that is not a palette
/// label becomes the highest-priority palette entry.
pub fn validate_color(candidate: &str, is_legwear: bool) -> PaletteColor {
    if is_legwear {
        if !candidate.trim().eq_ignore_ascii_case(PaletteColor::LEGWEAR.label()) {
            debug!("Legwear prior overrides color {:?} with {}", candidate, PaletteColor::LEGWEAR);
        }
        return PaletteColor::LEGWEAR;
    }

    match PaletteColor::from_label(candidate) {
        Some(color) => color,
        None => {
            warn!(
                "Color {:?} is not in the palette, substituting {}",
                candidate,
                PaletteColor::DEFAULT
            );
            PaletteColor::DEFAULT
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_palette_members() {
        for color in PaletteColor::ALL {
            assert_eq!(validate_color(color.label(), false), color);
        }
    }

    #[test]
    fn substitutes_default_outside_palette() {
        assert_eq!(validate_color("teal", false), PaletteColor::DEFAULT);
        assert_eq!(validate_color("", false), PaletteColor::DEFAULT);
    }

    #[test]
    fn legwear_is_always_blue() {
        assert_eq!(validate_color("Rouge", true), PaletteColor::Bleu);
        assert_eq!(validate_color("garbage", true), PaletteColor::Bleu);
    }
}
