//! Chat-completions relay endpoint
//!
//! Forwards a caller-supplied payload with a caller-supplied key and returns
//! the upstream status and JSON body without interpretation.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{rejection::BytesRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    error::{AppError, AppResult},
    proxy::RelayResponse,
    routes::{is_present, metrics::record_request, parse_json_body, read_body},
    AppState,
};

/// Relay request body
#[derive(Debug, Clone, Deserialize)]
pub struct RelayRequest {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub payload: Option<Value>,
}

/// Handle chat-completions relay requests
pub async fn relay(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let start_time = Instant::now();

    let result = match read_body(body) {
        Ok(body) => relay_payload(&state, &body).await,
        Err(err) => Err(err),
    };

    let response = match result {
        Ok(upstream) => (upstream.status, Json(upstream.body)).into_response(),
        Err(err) => {
            warn!(status = %err.status_code(), error = %err, "Relay request failed");
            err.redact(state.config.debug_enabled).into_response()
        }
    };

    info!(
        status = %response.status(),
        duration_ms = start_time.elapsed().as_millis() as u64,
        "Relay request completed"
    );
    record_request("groq", response.status(), start_time.elapsed());
    response
}

async fn relay_payload(state: &AppState, body: &Bytes) -> AppResult<RelayResponse> {
    let request: RelayRequest = parse_json_body(body)?;

    let api_key = request.api_key.filter(|k| !k.trim().is_empty());
    let payload = request.payload.filter(is_present);

    let (api_key, payload) = match (api_key, payload) {
        (Some(api_key), Some(payload)) => (api_key, payload),
        _ => {
            return Err(AppError::Validation(
                "api_key and payload required".to_string(),
            ))
        }
    };

    state.relay.relay(&api_key, &payload).await
}
