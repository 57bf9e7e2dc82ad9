//! Gemini generate-content provider
//!
//! Translates a normalized generate request into the Gemini REST
//! `models/{model}:generateContent` call and extracts the response text.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, error, info, instrument, warn};

use crate::{
    config::Config,
    error::{AppError, AppResult},
    proxy::{
        headers::build_goog_headers,
        provider::{GenerationProvider, GenerationRequest},
    },
};

/// `config` keys that belong at the top level of a Gemini request body
/// rather than inside `generationConfig`.
const TOP_LEVEL_CONFIG_KEYS: &[&str] = &[
    "systemInstruction",
    "safetySettings",
    "tools",
    "toolConfig",
    "cachedContent",
];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Gemini REST client
pub struct GeminiProvider {
    client: reqwest::Client,
    base_url: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.gemini_api_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

/// Normalize caller contents into the array-of-content shape the REST API expects
///
/// A bare string becomes a single user turn; a single content object is
/// wrapped in an array and gets `role: user` when it has none.
pub fn normalize_contents(contents: &Value) -> Value {
    match contents {
        Value::String(text) => json!([{ "role": "user", "parts": [{ "text": text }] }]),
        Value::Array(_) => contents.clone(),
        Value::Object(object) => {
            let mut object = object.clone();
            object
                .entry("role")
                .or_insert_with(|| Value::String("user".to_string()));
            Value::Array(vec![Value::Object(object)])
        }
        other => json!([{ "role": "user", "parts": [{ "text": other.to_string() }] }]),
    }
}

/// Build the full request body from contents and caller config
pub fn build_request_body(request: &GenerationRequest) -> Value {
    let mut body = Map::new();
    body.insert("contents".to_string(), normalize_contents(&request.contents));

    let mut generation_config = Map::new();
    for (key, value) in &request.config {
        if !TOP_LEVEL_CONFIG_KEYS.contains(&key.as_str()) {
            generation_config.insert(key.clone(), value.clone());
            continue;
        }
        let value = match (key.as_str(), value) {
            ("systemInstruction", Value::String(text)) => json!({ "parts": [{ "text": text }] }),
            _ => value.clone(),
        };
        body.insert(key.clone(), value);
    }

    if !generation_config.is_empty() {
        body.insert(
            "generationConfig".to_string(),
            Value::Object(generation_config),
        );
    }

    Value::Object(body)
}

/// Human-readable detail for a non-success response
///
/// Prefers the provider's `error.message`, then the raw body, then the
/// status reason when the body is empty or unreadable.
fn error_detail(status: reqwest::StatusCode, body: Option<&str>) -> String {
    match body.map(str::trim).filter(|b| !b.is_empty()) {
        Some(text) => serde_json::from_str::<ErrorEnvelope>(text)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| text.to_string()),
        None => status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string(),
    }
}

/// Concatenate the text parts of the first candidate
fn extract_text(response: GenerateContentResponse) -> AppResult<String> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(AppError::upstream(format!("Prompt blocked by provider: {}", reason)));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| AppError::upstream("Provider returned no candidates"))?;

    let text: String = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter(|p| !p.thought)
        .filter_map(|p| p.text)
        .collect();

    if text.is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "UNKNOWN".to_string());
        return Err(AppError::upstream(format!(
            "Provider returned no text (finish reason: {})",
            reason
        )));
    }

    Ok(text)
}

#[async_trait]
impl GenerationProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    #[instrument(skip(self, api_key, request), fields(model = %request.model))]
    async fn generate(&self, api_key: &str, request: &GenerationRequest) -> AppResult<String> {
        let url = self.endpoint(&request.model);
        let body = build_request_body(request);

        info!(model = %request.model, "Forwarding generate request to Gemini");

        let response = self
            .client
            .post(&url)
            .headers(build_goog_headers(api_key)?)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to send request to Gemini");
                AppError::from(e)
            })?;

        let status = response.status();
        debug!(status = %status, "Received response from Gemini");

        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| warn!(error = %e, "Failed to read Gemini error body"))
                .ok();
            return Err(AppError::upstream(format!(
                "Gemini API error ({}): {}",
                status.as_u16(),
                error_detail(status, body.as_deref())
            )));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        extract_text(parsed)
    }
}
