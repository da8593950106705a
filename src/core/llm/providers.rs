use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{FastdocError, Result};
use super::documenter::{LlmDocumenter, ProviderEndpoint};
use super::request::{ProviderKind, RequestSpec};

/// Factory that maps a provider selection to its request strategy
pub fn create_documenter(
    kind: ProviderKind,
    endpoint: ProviderEndpoint,
) -> Result<Box<dyn LlmDocumenter>> {
    if endpoint.credential.trim().is_empty() {
        return Err(FastdocError::Credential {
            provider: kind,
            message: "API key is empty".to_string(),
        });
    }

    let documenter: Box<dyn LlmDocumenter> = match kind {
        ProviderKind::Groq => Box::new(GroqProvider::new(endpoint)?),
        ProviderKind::Gemini => Box::new(GeminiProvider::new(endpoint)?),
        ProviderKind::OpenAi => Box::new(OpenAiProvider::new(endpoint)?),
        ProviderKind::OpenRouter => Box::new(OpenRouterProvider::new(endpoint)?),
    };

    Ok(documenter)
}

fn build_client(kind: ProviderKind, endpoint: &ProviderEndpoint) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .user_agent(concat!("fastdoc/", env!("CARGO_PKG_VERSION")));

    if let Some(timeout) = endpoint.timeout {
        builder = builder.timeout(timeout);
    }

    builder
        .build()
        .map_err(|e| FastdocError::generation(kind, format!("Failed to build HTTP client: {}", e)))
}

/// Send a JSON payload and return the parsed JSON body of a successful response
async fn send_json(
    kind: ProviderKind,
    request: reqwest::RequestBuilder,
    payload: &Value,
) -> Result<Value> {
    let response = request
        .header("Content-Type", "application/json")
        .json(payload)
        .send()
        .await
        .map_err(|e| {
            FastdocError::generation(kind, format!("{} API request failed: {}", kind, e))
        })?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(FastdocError::generation(
            kind,
            format!("{} API error {}: {}", kind, status, error_text),
        ));
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| {
            FastdocError::generation(kind, format!("Failed to parse {} response: {}", kind, e))
        })
}

fn chat_completion_payload(spec: &RequestSpec) -> Value {
    let mut body = json!({
        "model": spec.model,
        "messages": [
            {
                "role": "user",
                "content": spec.message()
            }
        ]
    });

    if let Some(max_tokens) = spec.max_tokens {
        body["max_tokens"] = json!(max_tokens);
    }
    if let Some(temperature) = spec.temperature {
        body["temperature"] = json!(temperature);
    }

    body
}

fn chat_completion_content(kind: ProviderKind, data: &Value) -> Result<String> {
    data["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| {
            let message = format!("Failed to extract content from {} response", kind);
            FastdocError::generation(kind, message)
        })
}

/// Groq chat completions (OpenAI compatible)
pub struct GroqProvider {
    endpoint: ProviderEndpoint,
    client: reqwest::Client,
}

impl GroqProvider {
    pub fn new(endpoint: ProviderEndpoint) -> Result<Self> {
        let client = build_client(ProviderKind::Groq, &endpoint)?;
        Ok(Self { endpoint, client })
    }

    pub fn url(&self) -> String {
        format!("{}/v1/chat/completions", self.endpoint.base_url)
    }

    pub fn build_request(&self, spec: &RequestSpec) -> Value {
        chat_completion_payload(spec)
    }
}

#[async_trait]
impl LlmDocumenter for GroqProvider {
    async fn generate(&self, spec: &RequestSpec) -> Result<String> {
        let payload = self.build_request(spec);
        debug!("POST {} (model {})", self.url(), spec.model);

        let request = self
            .client
            .post(self.url())
            .bearer_auth(&self.endpoint.credential);

        let data = send_json(self.kind(), request, &payload).await?;
        chat_completion_content(self.kind(), &data)
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Groq
    }
}

/// Google Gemini generateContent
pub struct GeminiProvider {
    endpoint: ProviderEndpoint,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(endpoint: ProviderEndpoint) -> Result<Self> {
        let client = build_client(ProviderKind::Gemini, &endpoint)?;
        Ok(Self { endpoint, client })
    }

    pub fn url(&self, spec: &RequestSpec) -> String {
        let model = spec.model.trim_start_matches("models/");
        format!("{}/v1beta/models/{}:generateContent", self.endpoint.base_url, model)
    }

    pub fn build_request(&self, spec: &RequestSpec) -> Value {
        let mut body = json!({
            "contents": [
                {
                    "parts": [
                        { "text": spec.message() }
                    ]
                }
            ]
        });

        let mut generation_config = serde_json::Map::new();
        if let Some(max_tokens) = spec.max_tokens {
            generation_config.insert("maxOutputTokens".to_string(), json!(max_tokens));
        }
        if let Some(temperature) = spec.temperature {
            generation_config.insert("temperature".to_string(), json!(temperature));
        }
        if !generation_config.is_empty() {
            body["generationConfig"] = Value::Object(generation_config);
        }

        body
    }

    fn extract_text(&self, data: &Value) -> Result<String> {
        let Some(parts) = data["candidates"][0]["content"]["parts"].as_array() else {
            let reason = data["promptFeedback"]["blockReason"]
                .as_str()
                .map(|r| format!(" (blocked: {})", r))
                .unwrap_or_default();
            return Err(FastdocError::generation(
                self.kind(),
                format!("Gemini response contained no candidates{}", reason),
            ));
        };

        let texts: Vec<&str> = parts.iter().filter_map(|part| part["text"].as_str()).collect();
        if texts.is_empty() {
            let reason = data["candidates"][0]["finishReason"]
                .as_str()
                .map(|r| format!(" (finish reason: {})", r))
                .unwrap_or_default();
            return Err(FastdocError::generation(
                self.kind(),
                format!("Gemini response contained no text{}", reason),
            ));
        }

        Ok(texts.concat())
    }
}

#[async_trait]
impl LlmDocumenter for GeminiProvider {
    async fn generate(&self, spec: &RequestSpec) -> Result<String> {
        let payload = self.build_request(spec);
        let url = self.url(spec);
        debug!("POST {}", url);

        let request = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.endpoint.credential);

        let data = send_json(self.kind(), request, &payload).await?;
        self.extract_text(&data)
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }
}

/// OpenAI legacy text completions
pub struct OpenAiProvider {
    endpoint: ProviderEndpoint,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(endpoint: ProviderEndpoint) -> Result<Self> {
        let client = build_client(ProviderKind::OpenAi, &endpoint)?;
        Ok(Self { endpoint, client })
    }

    pub fn url(&self) -> String {
        format!("{}/v1/completions", self.endpoint.base_url)
    }

    pub fn build_request(&self, spec: &RequestSpec) -> Value {
        let mut body = json!({
            "model": spec.model,
            "prompt": spec.message(),
        });

        if let Some(max_tokens) = spec.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        if let Some(temperature) = spec.temperature {
            body["temperature"] = json!(temperature);
        }

        body
    }
}

#[async_trait]
impl LlmDocumenter for OpenAiProvider {
    async fn generate(&self, spec: &RequestSpec) -> Result<String> {
        let payload = self.build_request(spec);
        debug!("POST {} (model {})", self.url(), spec.model);

        let request = self
            .client
            .post(self.url())
            .bearer_auth(&self.endpoint.credential);

        let data = send_json(self.kind(), request, &payload).await?;

        data["choices"][0]["text"]
            .as_str()
            .map(|text| text.trim().to_string())
            .ok_or_else(|| {
                FastdocError::generation(self.kind(), "Failed to extract text from OpenAI response")
            })
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }
}

/// OpenRouter chat completions, same shape as Groq on a different endpoint
pub struct OpenRouterProvider {
    endpoint: ProviderEndpoint,
    client: reqwest::Client,
}

impl OpenRouterProvider {
    pub fn new(endpoint: ProviderEndpoint) -> Result<Self> {
        let client = build_client(ProviderKind::OpenRouter, &endpoint)?;
        Ok(Self { endpoint, client })
    }

    pub fn url(&self) -> String {
        format!("{}/v1/chat/completions", self.endpoint.base_url)
    }

    pub fn build_request(&self, spec: &RequestSpec) -> Value {
        chat_completion_payload(spec)
    }
}

#[async_trait]
impl LlmDocumenter for OpenRouterProvider {
    async fn generate(&self, spec: &RequestSpec) -> Result<String> {
        let payload = self.build_request(spec);
        debug!("POST {} (model {})", self.url(), spec.model);

        // Optional attribution header understood by OpenRouter
        let request = self
            .client
            .post(self.url())
            .bearer_auth(&self.endpoint.credential)
            .header("X-Title", "fastdoc");

        let data = send_json(self.kind(), request, &payload).await?;
        chat_completion_content(self.kind(), &data)
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenRouter
    }
}
