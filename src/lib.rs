//! Relaygate - minimal generative-AI gateway
//!
//! This library provides the core functionality for the Relaygate server.
//! It relays generate-content requests to Gemini using a server-held key,
//! and chat-completion payloads to Groq using a caller-supplied key.

pub mod config;
pub mod error;
pub mod proxy;
pub mod routes;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

pub use crate::config::Config;
pub use crate::error::{AppError, AppResult};
pub use crate::proxy::{ChatRelayProvider, GeminiProvider, GenerationProvider, GroqRelay};

/// Application state shared across all request handlers
pub struct AppState {
    pub config: Config,
    pub start_time: Instant,
    /// Provider behind `/api/ai/generate`
    pub generator: Arc<dyn GenerationProvider>,
    /// Provider behind `/api/ai/groq`
    pub relay: Arc<dyn ChatRelayProvider>,
}

impl AppState {
    /// Create a new application state with the real upstream providers
    pub fn new(config: Config) -> Result<Self> {
        // Initialize HTTP client with connection pooling. No client-wide
        // timeout: the relay sets its own per request, generate has none.
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(100)
            .build()?;

        let generator: Arc<dyn GenerationProvider> =
            Arc::new(GeminiProvider::new(http_client.clone(), &config));
        let relay: Arc<dyn ChatRelayProvider> = Arc::new(GroqRelay::new(http_client, &config));

        Ok(Self::with_providers(config, generator, relay))
    }

    /// Create an application state from explicit providers
    ///
    /// Used by tests to substitute stub providers for the network clients.
    pub fn with_providers(
        config: Config,
        generator: Arc<dyn GenerationProvider>,
        relay: Arc<dyn ChatRelayProvider>,
    ) -> Self {
        Self {
            config,
            start_time: Instant::now(),
            generator,
            relay,
        }
    }
}
