use crate::types::{InferenceRequest, Result};
use async_trait::async_trait;

/// Narrow capability over a text / vision-language inference endpoint.
///
/// Implementations bound every call with a timeout and report transport,
/// quota and shape problems as errors. They never retry and never touch
/// shared state beyond the call itself.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Human-readable name for logs
    fn client_name(&self) -> String;

    /// Run one prompt, optionally bound to an image, and return the generated text
    async fn invoke(&self, request: &InferenceRequest) -> Result<String>;
}
