//! Generate-content endpoint
//!
//! Relays a prompt to the generation provider with the server-held key and
//! wraps the resulting text in the `{"success": true, "data": ...}` envelope.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::{
    error::{AppError, AppResult},
    proxy::GenerationRequest,
    routes::{is_present, metrics::record_request, parse_json_body, read_body},
    AppState,
};

/// Generate request body
///
/// `contents` is the canonical field; `prompt` is accepted for older clients.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    #[serde(default, alias = "prompt")]
    pub contents: Option<Value>,
    #[serde(default)]
    pub config: Option<Map<String, Value>>,
    #[serde(default)]
    pub model: Option<String>,
}

/// Success envelope
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub data: String,
}

/// Handle generate-content requests
pub async fn generate(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let start_time = Instant::now();

    let result = match read_body(body) {
        Ok(body) => generate_text(&state, &body).await,
        Err(err) => Err(err),
    };

    let response = match result {
        Ok(text) => (
            StatusCode::OK,
            Json(GenerateResponse {
                success: true,
                data: text,
            }),
        )
            .into_response(),
        Err(err) => {
            warn!(status = %err.status_code(), error = %err, "Generate request failed");
            err.redact(state.config.debug_enabled).into_response()
        }
    };

    info!(
        status = %response.status(),
        duration_ms = start_time.elapsed().as_millis() as u64,
        "Generate request completed"
    );
    record_request("generate", response.status(), start_time.elapsed());
    response
}

/// Check that a model name is a single plain path segment
///
/// The name is interpolated into the upstream URL that carries the server
/// key, so only `[A-Za-z0-9._-]` is accepted and `..` is refused.
pub fn validate_model_name(model: &str) -> AppResult<String> {
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_');

    if model.is_empty() || model.contains("..") || !model.chars().all(allowed) {
        return Err(AppError::Validation(format!("Invalid model name: {:?}", model)));
    }

    Ok(model.to_string())
}

async fn generate_text(state: &AppState, body: &Bytes) -> AppResult<String> {
    let request: GenerateRequest = parse_json_body(body)?;

    let contents = request
        .contents
        .filter(is_present)
        .ok_or_else(|| AppError::Validation("prompt or contents field is required".to_string()))?;

    let model = request
        .model
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(state.config.gemini_default_model.as_str());
    let model = validate_model_name(model.strip_prefix("models/").unwrap_or(model))?;

    let api_key = state.config.gemini_api_key.as_deref().ok_or_else(|| {
        AppError::Configuration("GEMINI_API_KEY not set in server environment".to_string())
    })?;

    let generation = GenerationRequest {
        model,
        contents,
        config: request.config.unwrap_or_default(),
    };

    info!(
        provider = state.generator.name(),
        model = %generation.model,
        "Processing generate request"
    );

    state.generator.generate(api_key, &generation).await
}
