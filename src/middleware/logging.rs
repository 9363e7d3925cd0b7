//! Request logging middleware.
//!
//! One line per request with method, path, status, latency and caller.

use crate::auth::models::Identity;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn};

/// Logs server errors and access denials at WARN, everything else at INFO.
///
/// Only the path is recorded; query strings and headers (tokens) are not.
/// The caller comes from the `Identity` the access gate attaches to the
/// response, so public routes log as `anonymous`.
pub async fn request_logging(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    if path == "/health" {
        return next.run(request).await;
    }

    let start = Instant::now();
    let response = next.run(request).await;
    let latency_ms = start.elapsed().as_millis();

    let status = response.status();
    let caller = caller_label(response.extensions().get::<Identity>());

    if status.is_server_error() {
        warn!(%method, %path, status = status.as_u16(), latency_ms, %caller, "Request failed (5xx)");
    } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        warn!(%method, %path, status = status.as_u16(), latency_ms, %caller, "Access denied");
    } else {
        info!(%method, %path, status = status.as_u16(), latency_ms, %caller, "Request completed");
    }

    response
}

/// `role:user_id` for gated requests, `anonymous` otherwise.
pub fn caller_label(identity: Option<&Identity>) -> String {
    match identity {
        Some(identity) => format!("{}:{}", identity.role, identity.user_id),
        None => "anonymous".to_string(),
    }
}
