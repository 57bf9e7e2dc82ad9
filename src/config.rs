//! Configuration management for Relaygate
//!
//! Configuration is loaded from environment variables once at startup and
//! injected into the application state. Handlers never read the process
//! environment themselves.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Default Gemini REST endpoint
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Default model used when a generate request does not name one
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
/// Default Groq (OpenAI-compatible) endpoint
pub const DEFAULT_GROQ_API_URL: &str = "https://api.groq.com/openai/v1";

/// Environment variables checked for the generate credential, in priority order
const GEMINI_KEY_VARS: &[&str] = &["GEMINI_API_KEY", "GOOGLE_API_KEY", "API_KEY"];

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// Gemini API base URL
    pub gemini_api_url: String,
    /// Gemini API key. Absence is reported per request, not at startup.
    pub gemini_api_key: Option<String>,
    /// Model used when the caller does not specify one
    pub gemini_default_model: String,

    /// Groq API base URL
    pub groq_api_url: String,
    /// Timeout for the chat-completions relay leg (in seconds)
    pub relay_timeout_seconds: u64,

    /// Maximum accepted request body size (in bytes)
    pub max_body_bytes: usize,

    /// Include diagnostic traces in error envelopes (development only)
    pub debug_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("GATEWAY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("GATEWAY_PORT")
                .or_else(|_| env::var("PORT"))
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .context("Invalid GATEWAY_PORT")?,

            gemini_api_url: env::var("GEMINI_API_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_API_URL.to_string()),
            gemini_api_key: GEMINI_KEY_VARS
                .iter()
                .filter_map(|name| env::var(name).ok())
                .find(|value| !value.trim().is_empty()),
            gemini_default_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),

            groq_api_url: env::var("GROQ_API_URL")
                .unwrap_or_else(|_| DEFAULT_GROQ_API_URL.to_string()),
            relay_timeout_seconds: env::var("RELAY_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("Invalid RELAY_TIMEOUT_SECONDS")?,

            max_body_bytes: env::var("MAX_BODY_BYTES")
                .unwrap_or_else(|_| (50 * 1024 * 1024).to_string())
                .parse()
                .context("Invalid MAX_BODY_BYTES")?,

            debug_enabled: env::var("GATEWAY_DEBUG")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        })
    }

    /// Relay timeout as a `Duration`
    pub fn relay_timeout(&self) -> Duration {
        Duration::from_secs(self.relay_timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            gemini_api_url: DEFAULT_GEMINI_API_URL.to_string(),
            gemini_api_key: None,
            gemini_default_model: DEFAULT_GEMINI_MODEL.to_string(),
            groq_api_url: DEFAULT_GROQ_API_URL.to_string(),
            relay_timeout_seconds: 30,
            max_body_bytes: 50 * 1024 * 1024,
            debug_enabled: false,
        }
    }
}
