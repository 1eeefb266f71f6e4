use crate::config::DetectorConfig;
use crate::inference_client::validate_image;
use crate::strategies::{CombinedAnalysis, FallbackRandom, Strategy, StrategyOutcome, TraditionalAnalysis};
use crate::temperature::classify_temperature;
use crate::traits::InferenceClient;
use crate::types::{
    AttributeDetector, CanonicalAttributes, DetectionReport, DetectorError, ImageReference, Result, StrategyKind,
};
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

/// Runs the strategies in priority order and always comes back with a
/// complete, in-palette answer.
pub struct DetectionOrchestrator {
    strategies: Vec<Box<dyn Strategy>>,
    fallback: FallbackRandom,
}

impl DetectionOrchestrator {
    /// Combined analysis, then traditional analysis, then the random fallback.
    pub fn new(client: Arc<dyn InferenceClient>, config: &DetectorConfig) -> Self {
        info!("Building detection orchestrator on {}", client.client_name());
        let answer_params = config.inference.answer_params();
        let caption_params = config.inference.caption_params();

        let strategies: Vec<Box<dyn Strategy>> = vec![
            Box::new(CombinedAnalysis::new(client.clone(), answer_params, config.strategy.clone())),
            Box::new(TraditionalAnalysis::new(
                client,
                answer_params,
                caption_params,
                config.strategy.clone(),
            )),
        ];

        Self::with_strategies(strategies, FallbackRandom::new(config.strategy.fallback_seed))
    }

    /// Custom chain; `fallback` still terminates it.
    pub fn with_strategies(strategies: Vec<Box<dyn Strategy>>, fallback: FallbackRandom) -> Self {
        Self { strategies, fallback }
    }

    pub fn strategy_order(&self) -> Vec<StrategyKind> {
        self.strategies
            .iter()
            .map(|strategy| strategy.kind())
            .chain(std::iter::once(StrategyKind::FallbackRandom))
            .collect()
    }

    pub async fn detect(&self, image: &ImageReference) -> CanonicalAttributes {
        self.detect_with_report(image).await.attributes
    }

    pub async fn detect_with_report(&self, image: &ImageReference) -> DetectionReport {
        match self.detect_until(image, std::future::pending::<()>()).await {
            Ok(report) => report,
            Err(e) => {
                // a pending future never cancels, but stay total regardless
                warn!("Detection ended early ({}), using fallback", e);
                self.report(
                    Uuid::new_v4(),
                    Instant::now(),
                    StrategyKind::FallbackRandom,
                    self.fallback.pick(),
                    vec![e.to_string()],
                )
            }
        }
    }

    /// Like `detect_with_report`, but gives up as soon as `cancelled` resolves.
    ///
    /// The in-flight call is dropped and no later strategy runs; the only
    /// error this returns is `DetectorError::Cancelled`.
    pub async fn detect_until<F>(&self, image: &ImageReference, cancelled: F) -> Result<DetectionReport>
    where
        F: Future<Output = ()>,
    {
        let detection_id = Uuid::new_v4();
        let span = info_span!("detect", %detection_id);
        self.run_strategies(detection_id, image, cancelled).instrument(span).await
    }

    async fn run_strategies<F>(&self, detection_id: Uuid, image: &ImageReference, cancelled: F) -> Result<DetectionReport>
    where
        F: Future<Output = ()>,
    {
        let started = Instant::now();
        tokio::pin!(cancelled);
        info!("Detecting attributes for {}", image.describe());

        let mut fallthroughs = Vec::new();

        if let Err(e) = validate_image(image) {
            warn!("Skipping inference: {}", e);
            fallthroughs.push(e.to_string());
        } else {
            for strategy in &self.strategies {
                let kind = strategy.kind();
                let attempt = tokio::select! {
                    biased;
                    _ = &mut cancelled => {
                        warn!("Cancelled during {} strategy", kind);
                        return Err(DetectorError::Cancelled);
                    }
                    result = strategy.analyze(image) => result,
                };

                match attempt {
                    Ok(outcome) => {
                        return Ok(self.report(detection_id, started, kind, outcome, fallthroughs));
                    }
                    Err(e) => {
                        warn!("{} strategy failed, falling through: {}", kind, e);
                        fallthroughs.push(format!("{}: {}", kind, e));
                    }
                }
            }
        }

        let outcome = self.fallback.pick();
        Ok(self.report(detection_id, started, StrategyKind::FallbackRandom, outcome, fallthroughs))
    }

    fn report(
        &self,
        detection_id: Uuid,
        started: Instant,
        strategy: StrategyKind,
        outcome: StrategyOutcome,
        fallthroughs: Vec<String>,
    ) -> DetectionReport {
        let temperature = classify_temperature(&outcome.category);
        let attributes = CanonicalAttributes {
            color: outcome.color.label().to_string(),
            category: outcome.category,
            temperature,
        };
        info!(
            "Detected {} / {} / {} via {} strategy",
            attributes.color, attributes.category, attributes.temperature, strategy
        );

        DetectionReport {
            detection_id,
            attributes,
            strategy,
            fallthroughs,
            detected_at: Utc::now(),
            elapsed_ms: started.elapsed().as_millis() as u64,
        }
    }
}

impl AttributeDetector for DetectionOrchestrator {
    fn detect_attributes(&self, image: &ImageReference) -> impl Future<Output = CanonicalAttributes> + Send {
        self.detect(image)
    }
}
