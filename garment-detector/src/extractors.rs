//! The four color candidate extractors.
//!
//! Each one turns an image (or its caption) into at most one raw color
//! token and never fails: any upstream error becomes `None`. Legwear
//! short-circuits every extractor to "blue" without touching the endpoint.

use crate::caption::is_placeholder;
use crate::config::StrategyConfig;
use crate::retry::invoke_with_retry;
use crate::traits::InferenceClient;
use crate::translation::normalize_token;
use crate::types::{ColorCandidate, ExtractionMethod, GenerationParams, ImageReference, InferenceRequest, TaskKind};
use crate::vocabulary::{self, find_color_word};
use std::sync::Arc;
use tracing::debug;

pub const LEGWEAR_COLOR_TOKEN: &str = "blue";

const DIRECT_COLOR_PROMPT: &str = "What is the main color of the clothing item in this photo? Answer with one color word.";
const ALTERNATE_COLOR_PROMPT: &str = "Look at the garment in this picture. Which color describes it best: black, white, grey, blue, beige, brown, red, pink, green, yellow, orange or purple?";
const DOMINANT_COLOR_PROMPT: &str = "What is the dominant color in this image? Reply with a single word.";

/// Answers that mean the model could not tell.
const NON_ANSWERS: &[&str] = &["unknown", "none", "n/a", "unsure", "not sure", "i don't know", "cannot determine", "unclear"];

/// What the extractors know about the garment before asking.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractionContext<'a> {
    pub caption: Option<&'a str>,
    pub category: Option<&'a str>,
}

impl<'a> ExtractionContext<'a> {
    pub fn new(caption: Option<&'a str>, category: Option<&'a str>) -> Self {
        Self { caption, category }
    }

    pub fn is_legwear(&self) -> bool {
        self.caption.is_some_and(vocabulary::is_legwear) || self.category.is_some_and(vocabulary::is_legwear)
    }
}

pub struct ColorExtractors {
    client: Arc<dyn InferenceClient>,
    params: GenerationParams,
    config: StrategyConfig,
}

impl ColorExtractors {
    pub fn new(client: Arc<dyn InferenceClient>, params: GenerationParams, config: StrategyConfig) -> Self {
        Self { client, params, config }
    }

    pub async fn extract(
        &self,
        method: ExtractionMethod,
        image: &ImageReference,
        context: ExtractionContext<'_>,
    ) -> Option<ColorCandidate> {
        match method {
            ExtractionMethod::DirectQuery => self.direct_query(image, context).await,
            ExtractionMethod::Caption => self.from_caption(context).await,
            ExtractionMethod::AlternateQuery => self.alternate_query(image, context).await,
            ExtractionMethod::DominantColor => self.dominant_color(image, context).await,
        }
    }

    pub async fn direct_query(&self, image: &ImageReference, context: ExtractionContext<'_>) -> Option<ColorCandidate> {
        self.ask_about_image(ExtractionMethod::DirectQuery, TaskKind::ColorQuery, DIRECT_COLOR_PROMPT, image, context)
            .await
    }

    /// Scans the caption for a color word first and only asks the model
    /// when the caption names none.
    pub async fn from_caption(&self, context: ExtractionContext<'_>) -> Option<ColorCandidate> {
        let method = ExtractionMethod::Caption;
        if context.is_legwear() {
            return Some(ColorCandidate::new(LEGWEAR_COLOR_TOKEN, method));
        }
        let caption = context.caption.filter(|caption| !is_placeholder(caption))?;

        if let Some(word) = find_color_word(caption) {
            debug!("Caption names color {:?}", word);
            return Some(ColorCandidate::new(word, method));
        }

        let prompt = format!(
            "Here is a description of a clothing item: \"{}\". What is the main color of the item? Answer with one color word.",
            caption
        );
        let build = || InferenceRequest::new(TaskKind::ColorFromCaption, prompt.as_str()).with_params(self.params);
        self.run(method, build).await
    }

    pub async fn alternate_query(&self, image: &ImageReference, context: ExtractionContext<'_>) -> Option<ColorCandidate> {
        self.ask_about_image(
            ExtractionMethod::AlternateQuery,
            TaskKind::AlternateColorQuery,
            ALTERNATE_COLOR_PROMPT,
            image,
            context,
        )
        .await
    }

    pub async fn dominant_color(&self, image: &ImageReference, context: ExtractionContext<'_>) -> Option<ColorCandidate> {
        self.ask_about_image(ExtractionMethod::DominantColor, TaskKind::DominantColor, DOMINANT_COLOR_PROMPT, image, context)
            .await
    }

    async fn ask_about_image(
        &self,
        method: ExtractionMethod,
        task: TaskKind,
        prompt: &str,
        image: &ImageReference,
        context: ExtractionContext<'_>,
    ) -> Option<ColorCandidate> {
        if context.is_legwear() {
            return Some(ColorCandidate::new(LEGWEAR_COLOR_TOKEN, method));
        }
        let build = || InferenceRequest::new(task, prompt).with_image(image).with_params(self.params);
        self.run(method, build).await
    }

    async fn run<F>(&self, method: ExtractionMethod, build: F) -> Option<ColorCandidate>
    where
        F: Fn() -> InferenceRequest + Send + Sync,
    {
        match invoke_with_retry(self.client.as_ref(), build, &self.config).await {
            Ok(answer) => {
                let token = parse_color_answer(&answer);
                debug!("{} extractor answered {:?} -> {:?}", method.as_str(), answer, token);
                token.map(|token| ColorCandidate::new(token, method))
            }
            Err(e) => {
                debug!("{} extractor gave up: {}", method.as_str(), e);
                None
            }
        }
    }
}

/// Pulls a color token out of a free-form answer.
///
/// A bare non-answer yields `None`. Otherwise a known color word anywhere in
/// the answer wins ("none of the above, it's red"), then a short one-word
/// answer is kept as is for the translation layer. Rambling yields `None`.
pub fn parse_color_answer(answer: &str) -> Option<String> {
    let normalized = normalize_token(answer);
    if normalized.is_empty() || NON_ANSWERS.contains(&normalized.as_str()) {
        return None;
    }
    if let Some(word) = find_color_word(&normalized) {
        return Some(word.to_string());
    }

    let words = vocabulary::split_words(&normalized);
    match words.as_slice() {
        [single] if single.chars().all(char::is_alphabetic) && single.len() <= 20 => Some(single.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_color_answers() {
        assert_eq!(parse_color_answer("Blue."), Some("blue".to_string()));
        assert_eq!(parse_color_answer("The shirt is navy blue"), Some("navy blue".to_string()));
        assert_eq!(parse_color_answer("Teal"), Some("teal".to_string()));
        assert_eq!(parse_color_answer("Aubergine"), Some("aubergine".to_string()));
        assert_eq!(parse_color_answer("unknown"), None);
        assert_eq!(parse_color_answer("I don't know, the picture is blurry"), None);
        assert_eq!(parse_color_answer(""), None);
        assert_eq!(parse_color_answer("it is hard to say from this angle"), None);
    }

    #[test]
    fn hedged_answers_keep_their_color() {
        assert_eq!(parse_color_answer("None of the above, it's red"), Some("red".to_string()));
        assert_eq!(parse_color_answer("Not sure, maybe beige?"), Some("beige".to_string()));
        assert_eq!(parse_color_answer("N/A"), None);
        assert_eq!(parse_color_answer("Unclear."), None);
    }

    #[test]
    fn legwear_context() {
        assert!(ExtractionContext::new(Some("a pair of blue jeans"), None).is_legwear());
        assert!(ExtractionContext::new(None, Some("pants")).is_legwear());
        assert!(!ExtractionContext::new(Some("a red dress"), Some("dress")).is_legwear());
        assert!(!ExtractionContext::default().is_legwear());
    }
}
