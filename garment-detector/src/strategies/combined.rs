use super::{Strategy, StrategyOutcome};
use crate::config::StrategyConfig;
use crate::garment_type::{match_garment_token, GARMENT_TOKENS};
use crate::resolver::UNKNOWN_COLOR;
use crate::retry::invoke_with_retry;
use crate::traits::InferenceClient;
use crate::translation::normalize_token;
use crate::types::{
    DetectorError, GenerationParams, ImageReference, InferenceRequest, Result, StrategyKind, TaskKind,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// Single call asking for color and category at once.
pub struct CombinedAnalysis {
    client: Arc<dyn InferenceClient>,
    params: GenerationParams,
    config: StrategyConfig,
}

impl CombinedAnalysis {
    pub fn new(client: Arc<dyn InferenceClient>, params: GenerationParams, config: StrategyConfig) -> Self {
        Self { client, params, config }
    }

    fn prompt() -> String {
        format!(
            "Identify the clothing item in this photo. Reply exactly in the form \"color: <color>, category: <category>\" \
             where category is one of: {}.",
            GARMENT_TOKENS.join(", ")
        )
    }

    fn failed(reason: impl Into<String>) -> DetectorError {
        DetectorError::StrategyFailed {
            strategy: StrategyKind::Combined,
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl Strategy for CombinedAnalysis {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Combined
    }

    async fn analyze(&self, image: &ImageReference) -> Result<StrategyOutcome> {
        let prompt = Self::prompt();
        let build = || {
            InferenceRequest::new(TaskKind::Combined, prompt.as_str())
                .with_image(image)
                .with_params(self.params)
        };
        let answer = invoke_with_retry(self.client.as_ref(), build, &self.config).await?;
        debug!("Combined analysis answered {:?}", answer);

        let parsed = parse_combined_answer(&answer)
            .ok_or_else(|| Self::failed(format!("unparseable answer {:?}", answer)))?;
        if parsed.color == UNKNOWN_COLOR || parsed.category == UNKNOWN_COLOR {
            return Err(Self::failed("model could not tell"));
        }

        let category = match_garment_token(&parsed.category);
        info!("Combined analysis: color {:?}, category {:?}", parsed.color, category);
        Ok(StrategyOutcome::from_english(&parsed.color, &category))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedAnswer {
    pub color: String,
    pub category: String,
}

/// Reads `color: X, category: Y` out of an answer, in either order and
/// surrounded by any chatter. Both fields must be present and non-empty.
pub fn parse_combined_answer(answer: &str) -> Option<CombinedAnswer> {
    let lowered = answer.to_lowercase();
    let color = field_value(&lowered, &["color:", "colour:"])?;
    let category = field_value(&lowered, &["category:", "type:"])?;
    Some(CombinedAnswer { color, category })
}

fn field_value(text: &str, keys: &[&str]) -> Option<String> {
    let (start, key) = keys
        .iter()
        .filter_map(|key| text.find(key).map(|position| (position, *key)))
        .min_by_key(|(position, _)| *position)?;
    let rest = &text[start + key.len()..];
    let end = rest.find(&[',', ';', '\n', '|'][..]).unwrap_or(rest.len());
    let value = normalize_token(rest[..end].trim_matches(|c: char| c == '*' || c == '`'));
    (!value.is_empty()).then_some(value)
}
