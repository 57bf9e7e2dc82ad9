//! Health check endpoints
//!
//! - `/api/health` - Liveness probe, fixed payload
//! - `/api/health/details` - Configuration status, never contacts upstreams

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::AppState;

/// Whether a server-side credential is loaded
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum CredentialStatus {
    Active,
    Missing,
}

/// Simple liveness response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Per-provider credential status
#[derive(Debug, Serialize)]
pub struct ProviderStatus {
    pub gemini: CredentialStatus,
}

/// Detailed health response
#[derive(Debug, Serialize)]
pub struct HealthDetailsResponse {
    pub status: &'static str,
    pub version: String,
    pub uptime_seconds: u64,
    pub timestamp: String,
    pub providers: ProviderStatus,
}

/// Liveness probe endpoint
///
/// Always returns `200 {"status":"online"}`.
pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (StatusCode::OK, Json(HealthResponse { status: "online" }))
}

/// Detailed health endpoint
pub async fn health_details(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthDetailsResponse>) {
    let gemini = if state.config.gemini_api_key.is_some() {
        CredentialStatus::Active
    } else {
        CredentialStatus::Missing
    };

    (
        StatusCode::OK,
        Json(HealthDetailsResponse {
            status: "online",
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: state.start_time.elapsed().as_secs(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            providers: ProviderStatus { gemini },
        }),
    )
}
