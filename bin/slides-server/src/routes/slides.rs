//! Conversion and slide retrieval endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use slides_core::slide_id;
use tracing::{debug, info};
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::schemas::slides::{ConvertRequest, ConvertResponse, ErrorResponse};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(convert, get_slides),
    components(schemas(ConvertRequest, ConvertResponse, ErrorResponse))
)]
pub struct SlidesApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/convert", post(convert))
        .route("/slides/{id}", get(get_slides))
}

/// Convert Markdown into reveal.js slides (`POST /convert`).
///
/// The result is stored under the filename's stem, replacing any earlier
/// slide set with the same id. Nothing is stored when conversion fails.
#[utoipa::path(
    post,
    path = "/convert",
    tag = "slides",
    request_body = ConvertRequest,
    responses(
        (status = 200, description = "Slides rendered", body = ConvertResponse),
        (status = 400, description = "Missing filename or content", body = ErrorResponse),
        (status = 500, description = "Conversion failed", body = ErrorResponse),
    )
)]
pub async fn convert(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ConvertRequest>, JsonRejection>,
) -> Result<Json<ConvertResponse>, ServerError> {
    let Json(req) = payload?;

    let (filename, content) = match (req.filename, req.content) {
        (Some(f), Some(c)) if !f.is_empty() && !c.is_empty() => (f, c),
        _ => return Err(ServerError::BadRequest("Missing filename or content".into())),
    };

    debug!(%filename, content_bytes = content.len(), "conversion request");

    let html = state.converter.convert(&filename, &content).await?;

    let id = slide_id(&filename);
    let replaced = state.registry.put(id.clone(), html);
    info!(slide_id = %id, replaced, "slides stored");

    Ok(Json(ConvertResponse {
        url: format!("/slides/{id}"),
        id,
    }))
}

/// Serve a rendered slide set (`GET /slides/{id}`).
#[utoipa::path(
    get,
    path = "/slides/{id}",
    tag = "slides",
    params(("id" = String, Path, description = "Slide id returned by /convert")),
    responses(
        (status = 200, description = "Rendered HTML", content_type = "text/html", body = String),
        (status = 404, description = "Slides not found", body = ErrorResponse),
    )
)]
pub async fn get_slides(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    let html = state
        .registry
        .get(&id)
        .ok_or_else(|| ServerError::NotFound("Slides not found".into()))?;

    Ok(([(header::CONTENT_TYPE, "text/html")], html))
}
