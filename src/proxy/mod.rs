//! Proxy module
//!
//! Handles request forwarding to upstream AI providers.

pub mod gemini;
pub mod groq;
pub mod headers;
pub mod provider;

pub use gemini::GeminiProvider;
pub use groq::GroqRelay;
pub use provider::{ChatRelayProvider, GenerationProvider, GenerationRequest, RelayResponse};
