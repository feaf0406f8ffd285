//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors are automatically converted
//! to a `{"error": "..."}` JSON body with an appropriate status code.
//!
//! Converter failures are reported to the caller with the tool's own
//! diagnostic text; the caller needs it to fix their Markdown.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use slides_core::ConvertError;
use thiserror::Error;
use tracing::{error, warn};

/// All errors that can occur in the slides-server request lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Propagated from the converter.
    #[error("conversion error: {0}")]
    Conversion(#[from] ConvertError),

    /// The caller referenced a resource that does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller sent an invalid or malformed request.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The request body could not be extracted; keeps axum's status
    /// (400, 413, 415, 422).
    #[error("rejected request: {0}")]
    Rejected(#[from] JsonRejection),

    /// An unclassified internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, client_message) = match &self {
            ServerError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            ServerError::BadRequest(m) => {
                warn!(error = %m, "rejected request");
                (StatusCode::BAD_REQUEST, m.clone())
            }

            ServerError::Rejected(rejection) => {
                warn!(error = %rejection, status = %rejection.status(), "rejected request body");
                (rejection.status(), rejection.body_text())
            }

            ServerError::Conversion(e @ ConvertError::InvalidFilename(_)) => {
                warn!(error = %e, "rejected request");
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            ServerError::Conversion(e) if e.is_tool_failure() => {
                error!(error = %e, "pandoc conversion failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Pandoc conversion failed: {e}"),
                )
            }
            ServerError::Conversion(e) => {
                error!(error = %e, "conversion error");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            ServerError::Internal(m) => {
                error!(message = %m, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, m.clone())
            }
        };
        (status, Json(json!({ "error": client_message }))).into_response()
    }
}
