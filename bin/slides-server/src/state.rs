//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use slides_core::{Converter, PandocConverter, SlideRegistry};

use crate::config::Config;

/// State shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Finished slide sets, keyed by slide id.
    pub registry: Arc<SlideRegistry>,
    /// Markdown → HTML converter.
    pub converter: Arc<dyn Converter>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// State backed by pandoc, configured from `config`.
    pub fn new(config: Config) -> Self {
        let converter = PandocConverter::new()
            .with_program(config.pandoc_path.clone())
            .with_revealjs_url(config.revealjs_url.clone())
            .with_scratch_root(config.scratch_dir.clone());
        Self::with_converter(config, Arc::new(converter))
    }

    pub fn with_converter(config: Config, converter: Arc<dyn Converter>) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::new(SlideRegistry::new()),
            converter,
        }
    }
}
