// src/logging_middleware.rs
//! Middleware for logging request and response bodies in debug mode
//!
//! A diary server's traffic is private by definition, so bodies are
//! redacted before they reach the log: credential fields are masked and
//! Set-Cookie / Cookie session material is never echoed.

use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use tracing::debug;

/// JSON fields whose values never belong in a log line
const REDACTED_FIELDS: &[&str] = &[
    "password",
    "current_password",
    "new_password",
    "access_token",
    "refresh_token",
];

/// Replace credential values in a parsed JSON body
fn redact_json(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, entry) in map.iter_mut() {
                if REDACTED_FIELDS.contains(&key.as_str()) {
                    *entry = serde_json::Value::String("***".to_string());
                } else {
                    redact_json(entry);
                }
            }
        }
        serde_json::Value::Array(items) => {
            for item in items.iter_mut() {
                redact_json(item);
            }
        }
        _ => {}
    }
}

/// Render a body for logging: redacted JSON, or a size marker for
/// anything that is not JSON text
fn loggable_body(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(body_str) => match serde_json::from_str::<serde_json::Value>(body_str) {
            Ok(mut json) => {
                redact_json(&mut json);
                serde_json::to_string_pretty(&json).unwrap_or_else(|_| "<unprintable>".to_string())
            }
            Err(_) => body_str.to_string(),
        },
        Err(_) => format!("<{} bytes of non-utf8 body>", bytes.len()),
    }
}

/// Middleware to log request and response bodies in debug mode
pub async fn log_request_response(request: Request, next: Next) -> Result<Response, StatusCode> {
    let (parts, body) = request.into_parts();

    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if !bytes.is_empty() {
        debug!(
            method = %parts.method,
            uri = %parts.uri,
            request_body = %loggable_body(&bytes),
            "Request"
        );
    }

    let request = Request::from_parts(parts, Body::from(bytes));

    let response = next.run(request).await;

    let (parts, body) = response.into_parts();

    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if !bytes.is_empty() {
        debug!(
            status = %parts.status,
            response_body = %loggable_body(&bytes),
            "Response"
        );
    }

    let response = Response::from_parts(parts, Body::from(bytes));

    Ok(response)
}
