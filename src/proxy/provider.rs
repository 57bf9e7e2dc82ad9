//! Upstream provider abstraction layer
//!
//! Defines the trait interfaces for the two upstream integrations so that
//! handlers depend on the interface and tests can substitute doubles.

use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::{Map, Value};

use crate::error::AppResult;

/// A generate-content call, already validated by the handler
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Model name without any `models/` prefix
    pub model: String,
    /// Prompt text or structured contents, as supplied by the caller
    pub contents: Value,
    /// Free-form generation options
    pub config: Map<String, Value>,
}

/// Raw upstream answer for the chat-completions relay
#[derive(Debug, Clone)]
pub struct RelayResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Generate-content provider (Gemini)
///
/// # Security
///
/// Implementations MUST never log the API key.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Provider name for logging and metrics
    fn name(&self) -> &'static str;

    /// Run a single generate call and return the generated text.
    async fn generate(&self, api_key: &str, request: &GenerationRequest) -> AppResult<String>;
}

/// Chat-completions relay provider (Groq)
#[async_trait]
pub trait ChatRelayProvider: Send + Sync {
    /// Provider name for logging and metrics
    fn name(&self) -> &'static str;

    /// Forward `payload` verbatim and return the upstream status and JSON body.
    ///
    /// A non-2xx upstream status is NOT an error here; only transport and
    /// decode failures are.
    async fn relay(&self, api_key: &str, payload: &Value) -> AppResult<RelayResponse>;
}
