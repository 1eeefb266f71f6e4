use crate::config::StrategyConfig;
use crate::retry::invoke_with_retry;
use crate::traits::InferenceClient;
use crate::types::{GenerationParams, ImageReference, InferenceRequest, TaskKind};
use std::sync::Arc;
use tracing::{debug, warn};

/// Substituted when no caption could be produced.
pub const PLACEHOLDER_CAPTION: &str = "a clothing item";

const CAPTION_PROMPT: &str =
    "Describe the clothing item in this photo in one short sentence, mentioning its color and type.";

/// Produces a one-sentence caption used as text input by later stages.
pub struct ImageDescriber {
    client: Arc<dyn InferenceClient>,
    params: GenerationParams,
    config: StrategyConfig,
}

impl ImageDescriber {
    pub fn new(client: Arc<dyn InferenceClient>, params: GenerationParams, config: StrategyConfig) -> Self {
        Self { client, params, config }
    }

    /// Never fails: a failed or empty caption degrades to `PLACEHOLDER_CAPTION`.
    pub async fn describe(&self, image: &ImageReference) -> String {
        let build = || {
            InferenceRequest::new(TaskKind::Caption, CAPTION_PROMPT)
                .with_image(image)
                .with_params(self.params)
        };

        match invoke_with_retry(self.client.as_ref(), build, &self.config).await {
            Ok(text) => {
                let caption = first_line(&text);
                if caption.is_empty() {
                    warn!("Captioning returned nothing usable, using placeholder");
                    PLACEHOLDER_CAPTION.to_string()
                } else {
                    debug!("Caption: {}", caption);
                    caption
                }
            }
            Err(e) => {
                warn!("Captioning failed, using placeholder: {}", e);
                PLACEHOLDER_CAPTION.to_string()
            }
        }
    }
}

pub fn is_placeholder(caption: &str) -> bool {
    caption == PLACEHOLDER_CAPTION
}

fn first_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .trim_matches('"')
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::ScriptedInferenceClient;

    #[test]
    fn keeps_first_non_empty_line() {
        assert_eq!(first_line("\n  \"A blue denim jacket.\"\nExtra notes"), "A blue denim jacket.");
        assert_eq!(first_line("   "), "");
    }

    #[tokio::test]
    async fn failure_degrades_to_placeholder() {
        let client = Arc::new(ScriptedInferenceClient::new("down").failing(TaskKind::Caption));
        let describer = ImageDescriber::new(client, GenerationParams::default(), StrategyConfig::default());
        let caption = describer.describe(&ImageReference::remote("https://example.com/a.jpg")).await;
        assert!(is_placeholder(&caption));
    }
}
