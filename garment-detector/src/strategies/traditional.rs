use super::{Strategy, StrategyOutcome};
use crate::caption::{is_placeholder, ImageDescriber};
use crate::config::StrategyConfig;
use crate::extractors::{ColorExtractors, ExtractionContext};
use crate::garment_type::{find_garment_token, GarmentTypeDetector};
use crate::resolver::{CandidateResolver, UNKNOWN_COLOR};
use crate::traits::InferenceClient;
use crate::types::{
    ColorCandidate, DetectorError, ExtractionMethod, GenerationParams, ImageReference, Result, StrategyKind,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Extractors gathered before voting, in tie-break order. The dominant-color
/// query is held back as the resolver's last resort.
const VOTING_METHODS: [ExtractionMethod; 3] = [
    ExtractionMethod::DirectQuery,
    ExtractionMethod::Caption,
    ExtractionMethod::AlternateQuery,
];

const FALLBACK_GARMENT: &str = "other";

/// Caption, garment type and every color extractor, then a vote.
pub struct TraditionalAnalysis {
    describer: ImageDescriber,
    garment_detector: GarmentTypeDetector,
    extractors: ColorExtractors,
    config: StrategyConfig,
}

impl TraditionalAnalysis {
    pub fn new(
        client: Arc<dyn InferenceClient>,
        answer_params: GenerationParams,
        caption_params: GenerationParams,
        config: StrategyConfig,
    ) -> Self {
        Self {
            describer: ImageDescriber::new(client.clone(), caption_params, config.clone()),
            garment_detector: GarmentTypeDetector::new(client.clone(), answer_params, config.clone()),
            extractors: ColorExtractors::new(client, answer_params, config.clone()),
            config,
        }
    }

    async fn gather_candidates(&self, image: &ImageReference, context: ExtractionContext<'_>) -> Vec<ColorCandidate> {
        let results = if self.config.parallel_extractors {
            let (direct, caption, alternate) = futures::future::join3(
                self.extractors.extract(VOTING_METHODS[0], image, context),
                self.extractors.extract(VOTING_METHODS[1], image, context),
                self.extractors.extract(VOTING_METHODS[2], image, context),
            )
            .await;
            vec![direct, caption, alternate]
        } else {
            let mut results = Vec::with_capacity(VOTING_METHODS.len());
            for method in VOTING_METHODS {
                results.push(self.extractors.extract(method, image, context).await);
            }
            results
        };

        // declared order, whatever order the calls finished in
        results.into_iter().flatten().collect()
    }
}

#[async_trait]
impl Strategy for TraditionalAnalysis {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Traditional
    }

    async fn analyze(&self, image: &ImageReference) -> Result<StrategyOutcome> {
        let caption = self.describer.describe(image).await;
        let detected = match self.garment_detector.detect(image).await {
            Ok(category) => Some(category),
            Err(e) => {
                warn!("Garment type detection failed: {}", e);
                None
            }
        };

        let caption_text = (!is_placeholder(&caption)).then_some(caption.as_str());
        let context = ExtractionContext::new(caption_text, detected.as_deref());

        let candidates = self.gather_candidates(image, context).await;
        debug!(
            "Color candidates: {:?}",
            candidates
                .iter()
                .map(|candidate| format!("{}={}", candidate.method.as_str(), candidate.token))
                .collect::<Vec<_>>()
        );
        let color = CandidateResolver::new(&self.extractors)
            .resolve(&candidates, image, context)
            .await;

        if detected.is_none() && caption_text.is_none() && color == UNKNOWN_COLOR {
            return Err(DetectorError::StrategyFailed {
                strategy: StrategyKind::Traditional,
                reason: "no extractor produced anything".to_string(),
            });
        }

        let category = detected
            .or_else(|| caption_text.and_then(find_garment_token).map(str::to_string))
            .unwrap_or_else(|| FALLBACK_GARMENT.to_string());

        info!("Traditional analysis: color {:?}, category {:?}", color, category);
        Ok(StrategyOutcome::from_english(&color, &category))
    }
}
