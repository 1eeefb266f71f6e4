use crate::config::InferenceConfig;
use crate::traits::InferenceClient;
use crate::types::{DetectorError, ImageReference, InferenceRequest, Result};
use async_trait::async_trait;
use base64::Engine;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

const COMPLETIONS_PATH: &str = "v1/chat/completions";
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Talks to an OpenAI-compatible chat completions endpoint.
pub struct HttpInferenceClient {
    client: Client,
    config: InferenceConfig,
    completions_url: Url,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Vec<ContentPart>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl HttpInferenceClient {
    pub fn new(config: InferenceConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .build()?;

        let completions_url = completions_url(&config.endpoint)?;

        Ok(Self {
            client,
            config,
            completions_url,
        })
    }

    fn build_body<'a>(&'a self, request: &InferenceRequest) -> Result<ChatRequest<'a>> {
        let mut content = Vec::with_capacity(2);
        if let Some(image) = &request.image {
            content.push(ContentPart::ImageUrl {
                image_url: ImageUrl { url: image_url(image)? },
            });
        }
        content.push(ContentPart::Text {
            text: request.prompt.clone(),
        });

        Ok(ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage { role: "user", content }],
            max_tokens: request.params.max_output_tokens,
            temperature: request.params.temperature,
        })
    }

    async fn send(&self, request: &InferenceRequest) -> Result<String> {
        let body = self.build_body(request)?;
        let mut http_request = self.client.post(self.completions_url.clone()).json(&body);
        if let Some(api_key) = &self.config.api_key {
            http_request = http_request.bearer_auth(api_key);
        }

        let response = http_request.send().await.map_err(|e| self.map_transport_error(e))?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::PAYMENT_REQUIRED {
            return Err(DetectorError::Quota { status: status.as_u16() });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DetectorError::Upstream {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| self.map_transport_error(e))?;
        extract_content(parsed)
    }

    fn map_transport_error(&self, error: reqwest::Error) -> DetectorError {
        if error.is_timeout() {
            DetectorError::Timeout {
                seconds: self.config.timeout_seconds,
            }
        } else if error.is_decode() {
            DetectorError::MalformedResponse(error.to_string())
        } else {
            DetectorError::Http(error)
        }
    }
}

#[async_trait]
impl InferenceClient for HttpInferenceClient {
    fn client_name(&self) -> String {
        format!("HTTP inference ({} @ {})", self.config.model, self.completions_url)
    }

    async fn invoke(&self, request: &InferenceRequest) -> Result<String> {
        let start_time = Instant::now();
        debug!("Invoking {} task against {}", request.task, self.completions_url);

        // reqwest's own timeout does not cover a slow body stream on every platform
        let limit = Duration::from_secs(self.config.timeout_seconds);
        let result = match tokio::time::timeout(limit, self.send(request)).await {
            Ok(result) => result,
            Err(_) => Err(DetectorError::Timeout {
                seconds: self.config.timeout_seconds,
            }),
        };

        match &result {
            Ok(text) => debug!(
                "{} task answered in {}ms ({} chars)",
                request.task,
                start_time.elapsed().as_millis(),
                text.len()
            ),
            Err(e) => warn!("{} task failed after {}ms: {}", request.task, start_time.elapsed().as_millis(), e),
        }
        result
    }
}

/// `{endpoint}/v1/chat/completions`, tolerating a missing trailing slash.
pub fn completions_url(endpoint: &str) -> Result<Url> {
    let mut base = endpoint.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    let url = Url::parse(&base)?.join(COMPLETIONS_PATH)?;
    Ok(url)
}

/// Remote URLs pass through; inline payloads become `data:` URLs.
pub fn image_url(image: &ImageReference) -> Result<String> {
    validate_image(image)?;
    match image {
        ImageReference::Remote { url } => Ok(url.trim().to_string()),
        ImageReference::Inline { mime_type, data } => Ok(format!(
            "data:{};base64,{}",
            mime_type,
            base64::engine::general_purpose::STANDARD.encode(data)
        )),
    }
}

/// Rejects references the endpoint could never read.
pub fn validate_image(image: &ImageReference) -> Result<()> {
    match image {
        ImageReference::Remote { url } => {
            let parsed = Url::parse(url.trim())
                .map_err(|e| DetectorError::InvalidImage(format!("{}: {}", url, e)))?;
            match parsed.scheme() {
                "http" | "https" => Ok(()),
                other => Err(DetectorError::InvalidImage(format!("unsupported scheme {:?}", other))),
            }
        }
        ImageReference::Inline { mime_type, data } => {
            if data.is_empty() {
                return Err(DetectorError::InvalidImage("inline payload is empty".to_string()));
            }
            if !mime_type.starts_with("image/") {
                return Err(DetectorError::InvalidImage(format!("not an image type: {}", mime_type)));
            }
            Ok(())
        }
    }
}

fn extract_content(response: ChatResponse) -> Result<String> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|text| text.trim().to_string())
        .unwrap_or_default();

    if content.is_empty() {
        return Err(DetectorError::MalformedResponse("response carried no content".to_string()));
    }
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaskKind;

    #[test]
    fn completions_url_handles_slashes() {
        assert_eq!(
            completions_url("http://localhost:11434").unwrap().as_str(),
            "http://localhost:11434/v1/chat/completions"
        );
        assert_eq!(
            completions_url("https://gateway.example.com/openai/").unwrap().as_str(),
            "https://gateway.example.com/openai/v1/chat/completions"
        );
        assert!(completions_url("not a url").is_err());
    }

    #[test]
    fn inline_images_become_data_urls() {
        let image = ImageReference::inline("image/png", vec![0x89, 0x50, 0x4e, 0x47]);
        assert_eq!(image_url(&image).unwrap(), "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn invalid_images_are_rejected() {
        assert!(validate_image(&ImageReference::remote("")).is_err());
        assert!(validate_image(&ImageReference::remote("ftp://example.com/a.jpg")).is_err());
        assert!(validate_image(&ImageReference::inline("image/jpeg", Vec::new())).is_err());
        assert!(validate_image(&ImageReference::inline("text/plain", vec![1])).is_err());
        assert!(validate_image(&ImageReference::remote("https://example.com/a.jpg")).is_ok());
    }

    #[test]
    fn request_body_shape() {
        let client = HttpInferenceClient::new(InferenceConfig::default()).unwrap();
        let request = InferenceRequest::new(TaskKind::ColorQuery, "What color is this?")
            .with_image(&ImageReference::remote("https://example.com/shirt.jpg"));
        let body = serde_json::to_value(client.build_body(&request).unwrap()).unwrap();

        assert_eq!(body["model"], "llava");
        assert_eq!(body["max_tokens"], 64);
        let content = &body["messages"][0]["content"];
        assert_eq!(content[0]["type"], "image_url");
        assert_eq!(content[0]["image_url"]["url"], "https://example.com/shirt.jpg");
        assert_eq!(content[1]["type"], "text");
        assert_eq!(content[1]["text"], "What color is this?");
    }

    #[test]
    fn empty_choices_are_malformed() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(extract_content(response), Err(DetectorError::MalformedResponse(_))));

        let response: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": "  navy blue \n"}}]}"#).unwrap();
        assert_eq!(extract_content(response).unwrap(), "navy blue");
    }
}
