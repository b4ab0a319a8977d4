//! Request plumbing shared by the HTTP providers

use std::time::Duration;

use bookgraph_core::ApiError;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ProviderResult;

// Longest provider error body carried into an ApiError
const MAX_ERROR_BODY: usize = 500;

pub(crate) fn build_client(timeout_secs: u64) -> ProviderResult<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

/// Transport failures carry no status, so they are always retried
pub(crate) fn transport_error(provider: &str, err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::transport(format!("{} request timed out: {}", provider, err))
    } else {
        ApiError::transport(format!("{} request failed: {}", provider, err))
    }
}

/// Turn a non-success response into an [`ApiError`] with its status
pub(crate) async fn check_status(provider: &str, response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(ApiError::http(
        status.as_u16(),
        format!("{} API error: {}", provider, error_message(&body)),
    ))
}

/// Decode a JSON body; a body that does not decode is a transport error
pub(crate) async fn decode<T: DeserializeOwned>(
    provider: &str,
    response: Response,
) -> Result<T, ApiError> {
    response
        .json()
        .await
        .map_err(|e| ApiError::transport(format!("Failed to parse {} response: {}", provider, e)))
}

// {"error": {"message": ...}} (OpenAI), {"error": "..."} (Ollama), or raw text
fn error_message(body: &str) -> String {
    let parsed = serde_json::from_str::<Value>(body).ok();
    let message = parsed.as_ref().and_then(|v| match v.get("error") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Object(o)) => o.get("message").and_then(Value::as_str).map(str::to_string),
        _ => None,
    });
    let message = message.unwrap_or_else(|| body.trim().to_string());
    if message.chars().count() > MAX_ERROR_BODY {
        message.chars().take(MAX_ERROR_BODY).collect::<String>() + "..."
    } else {
        message
    }
}
