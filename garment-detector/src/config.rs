//! Runtime configuration for the detector.
//!
//! Everything has a usable default; `DetectorConfig::from_env` overlays the
//! `GARMENT_*` environment variables and `from_json_file` loads a saved
//! configuration for reproducible runs.

use crate::types::{DetectorError, GenerationParams, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;

/// How to reach the inference endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Base URL of an OpenAI-compatible server, e.g. `http://localhost:11434/`
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
    pub max_output_tokens: u32,
    /// Captions are longer than one-word answers
    pub caption_max_tokens: u32,
    pub temperature: f32,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434/".to_string(),
            api_key: None,
            model: "llava".to_string(),
            timeout_seconds: 30,
            user_agent: "Garment-Detector/0.1".to_string(),
            max_output_tokens: 64,
            caption_max_tokens: 120,
            temperature: 0.0,
        }
    }
}

impl InferenceConfig {
    pub fn answer_params(&self) -> GenerationParams {
        GenerationParams {
            max_output_tokens: self.max_output_tokens,
            temperature: self.temperature,
        }
    }

    pub fn caption_params(&self) -> GenerationParams {
        GenerationParams {
            max_output_tokens: self.caption_max_tokens,
            temperature: self.temperature,
        }
    }
}

/// Knobs for how strategies spend their call budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Extra attempts per call on transient failures. Zero disables retries.
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    /// Run the independent color extractors concurrently.
    pub parallel_extractors: bool,
    /// Fixed seed for the random fallback; entropy-seeded when unset.
    pub fallback_seed: Option<u64>,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            retry_delay_ms: 500,
            parallel_extractors: false,
            fallback_seed: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub inference: InferenceConfig,
    pub strategy: StrategyConfig,
}

impl DetectorConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&raw)?;
        Ok(config)
    }

    /// Defaults overlaid with whatever `GARMENT_*` variables are set.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(endpoint) = env::var("GARMENT_INFERENCE_URL") {
            self.inference.endpoint = endpoint;
        }
        if let Ok(api_key) = env::var("GARMENT_INFERENCE_API_KEY") {
            if !api_key.is_empty() {
                self.inference.api_key = Some(api_key);
            }
        }
        if let Ok(model) = env::var("GARMENT_INFERENCE_MODEL") {
            self.inference.model = model;
        }
        if let Some(timeout) = parse_var("GARMENT_INFERENCE_TIMEOUT_SECS")? {
            self.inference.timeout_seconds = timeout;
        }
        if let Some(retries) = parse_var("GARMENT_MAX_RETRIES")? {
            self.strategy.max_retries = retries;
        }
        if let Some(parallel) = parse_var("GARMENT_PARALLEL_EXTRACTORS")? {
            self.strategy.parallel_extractors = parallel;
        }
        if let Some(seed) = parse_var("GARMENT_FALLBACK_SEED")? {
            self.strategy.fallback_seed = Some(seed);
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if self.inference.timeout_seconds == 0 {
            return Err(DetectorError::Config("timeout_seconds must be positive".to_string()));
        }
        if self.inference.model.trim().is_empty() {
            return Err(DetectorError::Config("model name is empty".to_string()));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(key: &str) -> Result<Option<T>> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| DetectorError::Config(format!("{} has an invalid value: {:?}", key, raw))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: DetectorConfig =
            serde_json::from_str(r#"{"inference": {"model": "qwen2-vl"}, "strategy": {"max_retries": 2}}"#).unwrap();
        assert_eq!(config.inference.model, "qwen2-vl");
        assert_eq!(config.inference.timeout_seconds, 30);
        assert_eq!(config.strategy.max_retries, 2);
        assert!(!config.strategy.parallel_extractors);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = DetectorConfig::default();
        config.inference.timeout_seconds = 0;
        assert!(matches!(config.validate(), Err(DetectorError::Config(_))));
    }
}
