use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
// Boundary types shared with the wardrobe application
pub use interfaces::defs::{AttributeDetector, CanonicalAttributes, ImageReference, Temperature};

/// Which question an inference call is asking. Used for routing in logs and mocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Caption,
    GarmentType,
    ColorQuery,
    ColorFromCaption,
    AlternateColorQuery,
    DominantColor,
    Combined,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Caption => "caption",
            Self::GarmentType => "garment_type",
            Self::ColorQuery => "color_query",
            Self::ColorFromCaption => "color_from_caption",
            Self::AlternateColorQuery => "alternate_color_query",
            Self::DominantColor => "dominant_color",
            Self::Combined => "combined",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_output_tokens: 64,
            temperature: 0.0,
        }
    }
}

/// One call to the inference endpoint. Built fresh for every attempt.
#[derive(Debug, Clone)]
pub struct InferenceRequest {
    pub task: TaskKind,
    pub prompt: String,
    pub image: Option<ImageReference>,
    pub params: GenerationParams,
}

impl InferenceRequest {
    pub fn new(task: TaskKind, prompt: impl Into<String>) -> Self {
        Self {
            task,
            prompt: prompt.into(),
            image: None,
            params: GenerationParams::default(),
        }
    }

    pub fn with_image(mut self, image: &ImageReference) -> Self {
        self.image = Some(image.clone());
        self
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }
}

/// The four ways of getting a color out of a photo, in declared order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    DirectQuery,
    Caption,
    AlternateQuery,
    DominantColor,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DirectQuery => "direct_query",
            Self::Caption => "caption",
            Self::AlternateQuery => "alternate_query",
            Self::DominantColor => "dominant_color",
        }
    }
}

/// A raw color token and the method that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorCandidate {
    pub token: String,
    pub method: ExtractionMethod,
}

impl ColorCandidate {
    pub fn new(token: impl Into<String>, method: ExtractionMethod) -> Self {
        Self {
            token: token.into(),
            method,
        }
    }

    /// Token as used for voting: trimmed and lowercased.
    pub fn normalized(&self) -> String {
        self.token.trim().to_lowercase()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Combined,
    Traditional,
    FallbackRandom,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Combined => "combined",
            Self::Traditional => "traditional",
            Self::FallbackRandom => "fallback_random",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attributes plus how they were obtained, for callers that want to flag
/// degraded answers. `detect` drops everything but `attributes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionReport {
    pub detection_id: Uuid,
    pub attributes: CanonicalAttributes,
    pub strategy: StrategyKind,
    pub fallthroughs: Vec<String>,
    pub detected_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

impl DetectionReport {
    pub fn is_degraded(&self) -> bool {
        self.strategy == StrategyKind::FallbackRandom
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DetectorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Inference call timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Inference quota exhausted (HTTP {status})")]
    Quota { status: u16 },

    #[error("Inference endpoint returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Malformed inference response: {0}")]
    MalformedResponse(String),

    #[error("Invalid image reference: {0}")]
    InvalidImage(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Strategy {strategy} failed: {reason}")]
    StrategyFailed { strategy: StrategyKind, reason: String },

    #[error("Detection cancelled by caller")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DetectorError {
    /// Whether repeating the same call could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Timeout { .. } => true,
            Self::Quota { status } => *status == 429,
            Self::Upstream { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, DetectorError>;
