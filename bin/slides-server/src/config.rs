//! Server configuration, loaded from environment variables at startup.

use std::path::PathBuf;

/// Runtime configuration for slides-server.
///
/// Every field has a sensible default so the server works out-of-the-box
/// without any environment variables set.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:5000"`).
    pub bind_address: String,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Converter executable (default: `pandoc` looked up on `PATH`).
    pub pandoc_path: PathBuf,

    /// Optional `revealjs-url` passed to the converter, for serving reveal.js
    /// assets from somewhere other than pandoc's default CDN.
    pub revealjs_url: Option<String>,

    /// Parent directory for per-request scratch directories. `None` uses the
    /// OS temp dir.
    pub scratch_dir: Option<PathBuf>,

    /// Comma-separated list of allowed CORS origins. `None` allows any origin.
    pub cors_allowed_origins: Option<String>,

    /// Serve Swagger UI and the OpenAPI document.
    pub enable_swagger: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_owned(),
            log_level: "info".to_owned(),
            log_json: false,
            pandoc_path: PathBuf::from("pandoc"),
            revealjs_url: None,
            scratch_dir: None,
            cors_allowed_origins: None,
            enable_swagger: true,
        }
    }
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_address: env_or("SLIDES_BIND", &defaults.bind_address),
            log_level: env_or("SLIDES_LOG", &defaults.log_level),
            log_json: parse_bool("SLIDES_LOG_JSON", defaults.log_json),
            pandoc_path: env_opt("SLIDES_PANDOC")
                .map(PathBuf::from)
                .unwrap_or(defaults.pandoc_path),
            revealjs_url: env_opt("SLIDES_REVEALJS_URL"),
            scratch_dir: env_opt("SLIDES_SCRATCH_DIR").map(PathBuf::from),
            cors_allowed_origins: env_opt("SLIDES_CORS_ORIGINS"),
            enable_swagger: parse_bool("SLIDES_ENABLE_SWAGGER", defaults.enable_swagger),
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Unset and blank values are both treated as absent.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}
