//! Header utilities for upstream requests
//!
//! Client headers are never forwarded; each upstream call gets a minimal,
//! freshly built header set.

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue, AUTHORIZATION, CONTENT_TYPE,
};

use crate::error::{AppError, AppResult};

/// Header carrying the Gemini API key
pub const GOOG_API_KEY: HeaderName = HeaderName::from_static("x-goog-api-key");

fn sensitive_value(value: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut value = HeaderValue::from_str(value)?;
    value.set_sensitive(true);
    Ok(value)
}

/// Build headers for bearer-authenticated JSON requests
///
/// The key is caller-supplied, so a malformed one is a validation error.
pub fn build_bearer_headers(api_key: &str) -> AppResult<HeaderMap> {
    let mut headers = HeaderMap::new();

    let auth = sensitive_value(&format!("Bearer {}", api_key))
        .map_err(|_| AppError::Validation("api_key contains invalid characters".to_string()))?;
    headers.insert(AUTHORIZATION, auth);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Ok(headers)
}

/// Build headers for Gemini requests (`x-goog-api-key`)
///
/// The key comes from server configuration.
pub fn build_goog_headers(api_key: &str) -> AppResult<HeaderMap> {
    let mut headers = HeaderMap::new();

    let key = sensitive_value(api_key).map_err(|_| {
        AppError::Configuration("Configured API key contains invalid characters".to_string())
    })?;
    headers.insert(GOOG_API_KEY, key);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Ok(headers)
}
