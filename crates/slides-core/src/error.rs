use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors that can be returned while converting Markdown into slides.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The submitted filename cannot be used as a plain file name.
    #[error("invalid filename '{0}': must be a plain file name without path separators")]
    InvalidFilename(String),

    /// Scratch space could not be created, written or read back.
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The converter program could not be started (missing, not executable, ...).
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The converter exited with a non-zero status.
    #[error("converter exited with {status}: {detail}")]
    ToolFailed { status: ExitStatus, detail: String },

    /// The converter reported success but did not produce its output file.
    #[error("converter reported success but produced no output at {}", path.display())]
    MissingOutput { path: PathBuf },
}

impl ConvertError {
    pub(crate) fn io(context: &'static str) -> impl FnOnce(std::io::Error) -> Self {
        move |source| ConvertError::Io { context, source }
    }

    /// `true` when the failure lies with the external converter rather than
    /// with local scratch space or the caller's input.
    pub fn is_tool_failure(&self) -> bool {
        matches!(
            self,
            ConvertError::Spawn { .. } | ConvertError::ToolFailed { .. } | ConvertError::MissingOutput { .. }
        )
    }
}
