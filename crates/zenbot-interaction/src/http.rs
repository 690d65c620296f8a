//! Request plumbing shared by the provider clients.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use zenbot_core::ResolveError;

pub(crate) fn build_client(timeout: Duration) -> Result<Client, ResolveError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|err| ResolveError::configuration(format!("Failed to build HTTP client: {err}")))
}

/// Sends `request` and decodes a successful body as JSON.
pub(crate) async fn send_json(request: RequestBuilder, provider: &str) -> Result<Value, ResolveError> {
    let response = request.send().await.map_err(|err| {
        let reason = if err.is_timeout() {
            "timed out"
        } else if err.is_connect() {
            "connection failed"
        } else {
            "request failed"
        };
        ResolveError::transport(format!(
            "{provider} API {reason}: {}",
            err.without_url()
        ))
    })?;

    if !response.status().is_success() {
        return Err(error_from_response(response, provider).await);
    }

    response.json::<Value>().await.map_err(|err| {
        ResolveError::provider(
            None,
            format!("Failed to parse {provider} response: {}", err.without_url()),
        )
    })
}

async fn error_from_response(response: Response, provider: &str) -> ResolveError {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| format!("Failed to read {provider} error body"));
    map_http_error(status, &body)
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorField,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorField {
    Detailed {
        message: Option<String>,
        status: Option<String>,
    },
    Plain(String),
}

pub(crate) fn map_http_error(status: StatusCode, body: &str) -> ResolveError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .ok()
        .and_then(|wrapper| match wrapper.error {
            ErrorField::Detailed { message, status } => {
                let message = message?;
                Some(match status.filter(|s| !s.is_empty()) {
                    Some(status) => format!("{status}: {message}"),
                    None => message,
                })
            }
            ErrorField::Plain(message) => Some(message),
        })
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("API error: {}", status.as_u16())
            } else {
                body.to_string()
            }
        });

    ResolveError::provider(Some(status.as_u16()), message)
}

/// Hides a credential embedded in a URL before it is logged.
pub(crate) fn redact(url: &str, secret: &str) -> String {
    if secret.is_empty() {
        url.to_string()
    } else {
        url.replace(secret, "API_KEY_HIDDEN")
    }
}
