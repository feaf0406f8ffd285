use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum::body::HttpBody as _;
use http_body_util::BodyExt;
use std::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::error::ServerError;

pub static X_TRACE_ID: &str = "x-trace-id";

/// JSON bodies up to this size are logged at debug level.
const MAX_LOGGED_BODY: usize = 1024;

/// Tag every request with a trace id (taken from `x-trace-id` when it is a
/// valid UUID, generated otherwise), run it inside a span and log its outcome.
pub async fn trace_middleware(req: Request<Body>, next: Next) -> Response {
    let start_time = Instant::now();

    let trace_id = req
        .headers()
        .get(X_TRACE_ID)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);

    let span = info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    async move {
        info!("→ request started");
        let header_value = HeaderValue::from_str(&trace_id.to_string()).ok();

        let (parts, body) = req.into_parts();
        let body = match log_body("request", &parts.headers, body).await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "failed to read request body");
                return ServerError::BadRequest(format!("failed to read request body: {e}"))
                    .into_response();
            }
        };
        let mut req = Request::from_parts(parts, body);
        if let Some(v) = &header_value {
            req.headers_mut().insert(X_TRACE_ID, v.clone());
        }

        let response = next.run(req).await;

        let (parts, body) = response.into_parts();
        let mut response = match log_body("response", &parts.headers, body).await {
            Ok(body) => Response::from_parts(parts, body),
            Err(e) => ServerError::Internal(format!("failed to read response body: {e}"))
                .into_response(),
        };
        if let Some(v) = header_value {
            response.headers_mut().insert(X_TRACE_ID, v);
        }

        info!(
            status = response.status().as_u16(),
            latency_ms = start_time.elapsed().as_millis(),
            "← response finished"
        );

        response
    }
    .instrument(span)
    .await
}

/// Log small JSON bodies at debug level.
///
/// Only a JSON body whose size is known to be under [`MAX_LOGGED_BODY`] is
/// buffered; anything else is handed on untouched so size limits further in
/// still apply to the raw stream.
async fn log_body(
    direction: &str,
    headers: &header::HeaderMap,
    body: Body,
) -> Result<Body, axum::Error> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let small = body
        .size_hint()
        .upper()
        .is_some_and(|upper| upper <= MAX_LOGGED_BODY as u64);

    if !content_type.contains("application/json") || !small {
        debug!(direction, content_type, size_hint = ?body.size_hint().upper(), "body not logged");
        return Ok(body);
    }

    let bytes = body.collect().await?.to_bytes();
    if let Ok(text) = std::str::from_utf8(&bytes) {
        debug!(direction, body = %text, "body");
    }
    Ok(Body::from(bytes))
}
