//! Groq chat-completions relay
//!
//! Pure pass-through: the caller's payload is POSTed unmodified and the
//! upstream status and JSON body come back unmodified.

use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    config::Config,
    error::{AppError, AppResult},
    proxy::{
        headers::build_bearer_headers,
        provider::{ChatRelayProvider, RelayResponse},
    },
};

/// Groq chat-completions client
pub struct GroqRelay {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl GroqRelay {
    /// Create a new Groq relay
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            url: format!(
                "{}/chat/completions",
                config.groq_api_url.trim_end_matches('/')
            ),
            timeout: config.relay_timeout(),
        }
    }
}

#[async_trait]
impl ChatRelayProvider for GroqRelay {
    fn name(&self) -> &'static str {
        "groq"
    }

    #[instrument(skip(self, api_key, payload), fields(url = %self.url))]
    async fn relay(&self, api_key: &str, payload: &Value) -> AppResult<RelayResponse> {
        let headers = build_bearer_headers(api_key)?;

        let model = payload.get("model").and_then(Value::as_str).unwrap_or("-");
        info!(model = %model, "Relaying chat completion to Groq");

        let response = self
            .client
            .post(&self.url)
            .headers(headers)
            .timeout(self.timeout)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, timeout_secs = self.timeout.as_secs(), "Failed to relay request to Groq");
                AppError::from(e)
            })?;

        let status = StatusCode::from_u16(response.status().as_u16())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        debug!(status = %status, "Received response from Groq");

        if !status.is_success() {
            warn!(status = %status, "Groq returned a non-success status, passing through");
        }

        // The body read can also hit the timeout, so go through reqwest errors
        let bytes = response.bytes().await?;
        let body: Value = serde_json::from_slice(&bytes).map_err(|e| AppError::Upstream {
            message: format!("Upstream returned a non-JSON body (status {})", status.as_u16()),
            trace: Some(e.to_string()),
        })?;

        Ok(RelayResponse { status, body })
    }
}
