use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /convert`.
///
/// Both fields are optional at the parsing level so that an absent field is
/// reported as a missing-field error instead of a JSON parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ConvertRequest {
    /// Source file name, e.g. `"talk.md"`. Its stem becomes the slide id.
    #[serde(default)]
    pub filename: Option<String>,
    /// Markdown source.
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConvertResponse {
    pub id: String,
    /// Path of the rendered slides, e.g. `"/slides/talk"`.
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
