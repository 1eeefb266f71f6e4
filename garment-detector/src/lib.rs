pub mod types;
pub mod config;
pub mod traits;
pub mod inference_client;
pub mod mock;
pub mod retry;
pub mod vocabulary;
pub mod translation;
pub mod validation;
pub mod temperature;
pub mod caption;
pub mod garment_type;
pub mod extractors;
pub mod resolver;
pub mod strategies;
pub mod orchestrator;

pub use types::*;
pub use config::{DetectorConfig, InferenceConfig, StrategyConfig};
pub use traits::InferenceClient;
pub use inference_client::HttpInferenceClient;
pub use mock::ScriptedInferenceClient;
pub use vocabulary::PaletteColor;
pub use translation::{to_canonical_category, to_canonical_color};
pub use validation::validate_color;
pub use temperature::classify_temperature;
pub use caption::ImageDescriber;
pub use garment_type::GarmentTypeDetector;
pub use extractors::{ColorExtractors, ExtractionContext};
pub use resolver::{CandidateResolver, UNKNOWN_COLOR};
pub use strategies::{CombinedAnalysis, FallbackRandom, Strategy, StrategyOutcome, TraditionalAnalysis};
pub use orchestrator::DetectionOrchestrator;
