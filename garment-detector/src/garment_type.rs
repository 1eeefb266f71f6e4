use crate::config::StrategyConfig;
use crate::retry::invoke_with_retry;
use crate::traits::InferenceClient;
use crate::translation::normalize_token;
use crate::types::{DetectorError, GenerationParams, ImageReference, InferenceRequest, Result, TaskKind};
use crate::vocabulary::split_words;
use std::sync::Arc;
use tracing::debug;

/// The closed set of categories the model is asked to choose from.
pub const GARMENT_TOKENS: &[&str] = &[
    "t-shirt", "shirt", "pants", "jeans", "dress", "skirt", "jacket", "coat", "sweater", "hoodie", "shoes", "boots",
    "hat", "other",
];

pub fn garment_type_prompt() -> String {
    format!(
        "What category of garment is shown in this photo? Choose one of: {}. Answer with the category only.",
        GARMENT_TOKENS.join(", ")
    )
}

/// Asks the model for the garment category and pins the answer to a known token.
pub struct GarmentTypeDetector {
    client: Arc<dyn InferenceClient>,
    params: GenerationParams,
    config: StrategyConfig,
}

impl GarmentTypeDetector {
    pub fn new(client: Arc<dyn InferenceClient>, params: GenerationParams, config: StrategyConfig) -> Self {
        Self { client, params, config }
    }

    /// English category: a known token when one is mentioned, otherwise the
    /// trimmed lowercase answer for the translation layer to try.
    pub async fn detect(&self, image: &ImageReference) -> Result<String> {
        let prompt = garment_type_prompt();
        let build = || {
            InferenceRequest::new(TaskKind::GarmentType, prompt.as_str())
                .with_image(image)
                .with_params(self.params)
        };

        let answer = invoke_with_retry(self.client.as_ref(), build, &self.config).await?;
        let category = match_garment_token(&answer);
        if category.is_empty() {
            return Err(DetectorError::MalformedResponse("empty garment type answer".to_string()));
        }
        debug!("Garment type {:?} from answer {:?}", category, answer);
        Ok(category)
    }
}

/// Compound words only count when they end in a token at least this long
/// ("raincoat" is a coat, "what" is not a hat).
const MIN_COMPOUND_TOKEN_LEN: usize = 4;

/// The first known token mentioned in free text.
///
/// Whole words (or their plurals) are tried first, so "shirt" is not found
/// inside "t-shirt". Otherwise a word ending in a token of at least four
/// letters counts, so "hat" is never found inside "that" and "coat" is not
/// found inside "coated". "other" only counts as a whole word.
pub fn find_garment_token(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = split_words(&lowered).into_iter().map(singular).collect();

    let whole_word = GARMENT_TOKENS
        .iter()
        .copied()
        .find(|token| words.iter().any(|word| word == token || singular(token) == *word));
    if whole_word.is_some() {
        return whole_word;
    }

    GARMENT_TOKENS
        .iter()
        .copied()
        .filter(|token| *token != "other" && token.len() >= MIN_COMPOUND_TOKEN_LEN)
        .find(|token| words.iter().any(|word| word.ends_with(*token) || word.ends_with(singular(token))))
}

/// Drops a plural ending: "dresses" -> "dress", "coats" -> "coat".
fn singular(word: &str) -> &str {
    if let Some(stem) = word.strip_suffix("sses") {
        return &word[..stem.len() + 2];
    }
    match word.strip_suffix('s') {
        Some(stem) if !stem.ends_with('s') && !stem.is_empty() => stem,
        _ => word,
    }
}

pub fn match_garment_token(answer: &str) -> String {
    match find_garment_token(answer) {
        Some(token) => token.to_string(),
        None => normalize_token(answer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_answers_resolve_to_tokens() {
        assert_eq!(match_garment_token("This appears to be a pair of jeans."), "jeans");
        assert_eq!(match_garment_token("T-Shirt"), "t-shirt");
        assert_eq!(match_garment_token("It's a shirt"), "shirt");
        assert_eq!(match_garment_token("that is a winter coat"), "coat");
        assert_eq!(match_garment_token("two dresses"), "dress");
        assert_eq!(match_garment_token("raincoat"), "coat");
    }

    #[test]
    fn short_tokens_need_whole_words() {
        assert_eq!(find_garment_token("I can't tell what that is"), None);
        assert_eq!(match_garment_token("I can't tell what that is"), "i can't tell what that is");
        assert_eq!(find_garment_token("a coated fabric"), None);
        assert_eq!(find_garment_token("a straw hat"), Some("hat"));
        assert_eq!(find_garment_token("two raincoats"), Some("coat"));
    }

    #[test]
    fn unknown_answers_pass_through() {
        assert_eq!(match_garment_token("  Kimono. "), "kimono");
        assert_eq!(match_garment_token(""), "");
    }

    #[test]
    fn prompt_lists_every_token() {
        let prompt = garment_type_prompt();
        for token in GARMENT_TOKENS {
            assert!(prompt.contains(token));
        }
    }
}
