use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, StatusCode, Url,
};
use serde::Deserialize;
use serde_json::json;

use crate::errors::LlmError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/";
const CHAT_COMPLETIONS_PATH: &str = "chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Seam between the ingress router and the remote vision model. The
/// gateway tests swap in a canned implementation behind this trait.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Returns the raw, un-normalized model reply for one photo.
    async fn classify(
        &self,
        instruction: &str,
        image_bytes: &[u8],
        mime_type: &str,
    ) -> Result<String, LlmError>;
}

#[derive(Clone, Debug)]
pub struct VisionConfig {
    pub api_key: String,
    pub base_url: Url,
    pub model: String,
    pub request_timeout: Duration,
}

impl VisionConfig {
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        let base_url = Url::parse(DEFAULT_BASE_URL)
            .map_err(|err| LlmError::unknown(&format!("vision base url parse failed: {err}")))?;
        Ok(Self {
            api_key: api_key.into(),
            base_url,
            model: DEFAULT_MODEL.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Result<Self, LlmError> {
        self.base_url = Url::parse(base_url.as_ref())
            .map_err(|err| LlmError::unknown(&format!("vision base url parse failed: {err}")))?;
        if !self.base_url.path().ends_with('/') {
            self.base_url
                .set_path(&format!("{}/", self.base_url.path().trim_end_matches('/')));
        }
        Ok(self)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Client for an OpenAI-compatible vision chat endpoint. One bounded,
/// non-streaming call per photo; no retries.
pub struct VisionClassifier {
    client: Client,
    chat_url: Url,
    model: String,
}

impl VisionClassifier {
    pub fn new(config: VisionConfig) -> Result<Self, LlmError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let auth = format!("Bearer {}", config.api_key);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth)
                .map_err(|err| LlmError::unknown(&format!("invalid vision api key: {err}")))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| LlmError::unknown(&format!("vision client build failed: {err}")))?;

        let chat_url = config
            .base_url
            .join(CHAT_COMPLETIONS_PATH)
            .map_err(|err| LlmError::unknown(&format!("vision chat url join failed: {err}")))?;

        Ok(Self {
            client,
            chat_url,
            model: config.model,
        })
    }
}

#[async_trait]
impl Classifier for VisionClassifier {
    async fn classify(
        &self,
        instruction: &str,
        image_bytes: &[u8],
        mime_type: &str,
    ) -> Result<String, LlmError> {
        let image_b64 = base64::engine::general_purpose::STANDARD.encode(image_bytes);
        let payload = json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": instruction },
                    {
                        "type": "image_url",
                        "image_url": { "url": format!("data:{mime_type};base64,{image_b64}") }
                    }
                ]
            }]
        });

        let response = self
            .client
            .post(self.chat_url.clone())
            .json(&payload)
            .send()
            .await
            .map_err(|err| {
                LlmError::provider_unavailable(&format!("vision request error: {err}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unavailable>".into());
            return Err(map_http_error(status, &body));
        }

        let completion = response.json::<ChatCompletion>().await.map_err(|err| {
            LlmError::provider_unavailable(&format!("vision response decode: {err}"))
        })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::provider_unavailable("vision reply had no content"))?;

        Ok(content)
    }
}

#[derive(Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

fn map_http_error(status: StatusCode, body: &str) -> LlmError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            LlmError::provider_unavailable(&format!("vision auth failed: {body}"))
        }
        StatusCode::TOO_MANY_REQUESTS => {
            LlmError::provider_unavailable(&format!("vision rate limited request: {body}"))
        }
        StatusCode::BAD_REQUEST => LlmError::schema(&format!("vision rejected request: {body}")),
        _ => LlmError::provider_unavailable(&format!(
            "vision returned {}: {}",
            status.as_u16(),
            body
        )),
    }
}
