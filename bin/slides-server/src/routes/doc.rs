use crate::routes::{health, slides};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(info(
    title = "slides-server",
    description = "Markdown to reveal.js slides gateway",
    version = "0.1.0",
))]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(health::HealthApi::openapi());
    root.merge(slides::SlidesApi::openapi());
    root
}
