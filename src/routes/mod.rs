//! HTTP routes for Relaygate
//!
//! This module defines all HTTP endpoints exposed by the gateway.

pub mod generate;
pub mod health;
pub mod metrics;
pub mod relay;

use std::sync::Arc;

use axum::{
    extract::{rejection::BytesRejection, DefaultBodyLimit},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    error::{AppError, AppResult},
    AppState,
};

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/details", get(health::health_details))
        .route("/ai/generate", post(generate::generate))
        .route("/ai/groq", post(relay::relay));

    Router::new()
        .nest("/api", api_routes)
        .route("/metrics", get(metrics::prometheus_metrics))
        // Global middleware (applied to all routes)
        // Enforced by the `Bytes` extractor, so handlers can render the rejection
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Turn a body extraction failure into an envelope error
pub(crate) fn read_body(body: Result<Bytes, BytesRejection>) -> AppResult<Bytes> {
    body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge("Request body exceeds the configured size limit".to_string())
        } else {
            AppError::Validation(format!("Failed to read request body: {}", rejection.body_text()))
        }
    })
}

/// Parse a JSON request body regardless of its declared content type
pub(crate) fn parse_json_body<T: DeserializeOwned>(body: &[u8]) -> AppResult<T> {
    serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("Invalid JSON in request body: {}", e)))
}

/// Whether a required JSON field carries a usable value
///
/// `null`, empty strings, arrays and objects count as missing.
pub(crate) fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        _ => true,
    }
}
