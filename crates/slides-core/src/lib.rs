//! Markdown-to-slides conversion and the in-memory slide registry.
//!
//! The HTTP surface lives in `slides-server`; this crate only knows how to
//! drive the external converter and where finished slide sets are kept.

pub mod converter;
pub mod error;
pub mod registry;

pub use converter::{output_file_name, slide_id, validate_filename, Converter, PandocConverter};
pub use error::ConvertError;
pub use registry::SlideRegistry;
