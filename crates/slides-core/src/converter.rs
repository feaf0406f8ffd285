//! Converter Invoker: runs an external Markdown converter in a throwaway
//! scratch directory and returns the HTML it produced.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use bytes::Bytes;
use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::error::ConvertError;

/// Output format handed to pandoc.
const OUTPUT_FORMAT: &str = "revealjs";

/// Turns Markdown into presentation HTML.
///
/// Implementations must be safe to call concurrently; the HTTP surface shares
/// one instance across all requests.
#[async_trait]
pub trait Converter: Send + Sync + 'static {
    /// Convert `content`, submitted under `filename`, into a standalone HTML
    /// document.
    async fn convert(&self, filename: &str, content: &str) -> Result<Bytes, ConvertError>;
}

/// [`Converter`] backed by the `pandoc` command-line tool.
///
/// Each call gets its own scratch directory, removed when the call returns on
/// every path. The child process is killed if the call is dropped before it
/// finishes. There is no timeout: a hung converter holds its request open.
#[derive(Debug, Clone)]
pub struct PandocConverter {
    program: PathBuf,
    revealjs_url: Option<String>,
    scratch_root: Option<PathBuf>,
}

impl Default for PandocConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl PandocConverter {
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("pandoc"),
            revealjs_url: None,
            scratch_root: None,
        }
    }

    /// Program to execute instead of `pandoc` from `PATH`.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Base URL of the reveal.js assets referenced by the generated document.
    pub fn with_revealjs_url(mut self, url: Option<String>) -> Self {
        self.revealjs_url = url;
        self
    }

    /// Directory under which scratch directories are created. Defaults to the
    /// OS temp dir.
    pub fn with_scratch_root(mut self, root: Option<PathBuf>) -> Self {
        self.scratch_root = root;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn scratch_dir(&self) -> std::io::Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("slides-");
        match &self.scratch_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
    }

    fn args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            input.into(),
            "-t".into(),
            OUTPUT_FORMAT.into(),
            "-o".into(),
            output.into(),
            "-s".into(),
        ];
        if let Some(url) = &self.revealjs_url {
            args.push("-V".into());
            args.push(format!("revealjs-url={url}").into());
        }
        args
    }
}

#[async_trait]
impl Converter for PandocConverter {
    async fn convert(&self, filename: &str, content: &str) -> Result<Bytes, ConvertError> {
        validate_filename(filename)?;

        // Dropping `scratch` removes the directory and everything in it.
        let scratch = self
            .scratch_dir()
            .map_err(ConvertError::io("creating scratch directory"))?;

        // Input and output live in fixed subdirectories so no client-chosen
        // name can collide with either, e.g. `out` or `deck.html`.
        let in_dir = scratch.path().join("in");
        let out_dir = scratch.path().join("out");
        for dir in [&in_dir, &out_dir] {
            tokio::fs::create_dir(dir)
                .await
                .map_err(ConvertError::io("creating scratch subdirectory"))?;
        }

        let input_path = in_dir.join(filename);
        tokio::fs::write(&input_path, content)
            .await
            .map_err(ConvertError::io("writing markdown input"))?;
        let output_path = out_dir.join(output_file_name(filename));

        debug!(
            program = %self.program.display(),
            scratch = %scratch.path().display(),
            filename,
            "running converter"
        );

        let output = tokio::process::Command::new(&self.program)
            .args(self.args(&input_path, &output_path))
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ConvertError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
            let detail = if stderr.is_empty() {
                output.status.to_string()
            } else {
                stderr
            };
            warn!(filename, status = %output.status, error = %detail, "converter failed");
            return Err(ConvertError::ToolFailed {
                status: output.status,
                detail,
            });
        }

        let html = match tokio::fs::read(&output_path).await {
            Ok(html) => html,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(filename, path = %output_path.display(), "converter produced no output");
                return Err(ConvertError::MissingOutput { path: output_path });
            }
            Err(e) => return Err(ConvertError::io("reading converter output")(e)),
        };

        info!(filename, html_bytes = html.len(), "conversion succeeded");
        Ok(Bytes::from(html))
    }
}

/// Reject anything that is not a single plain file name, so the input file
/// always lands inside the scratch directory.
pub fn validate_filename(filename: &str) -> Result<(), ConvertError> {
    let invalid = filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains(['/', '\\', '\0']);
    if invalid {
        return Err(ConvertError::InvalidFilename(filename.to_owned()));
    }
    Ok(())
}

/// Name of the HTML file produced for `filename`: the final extension is
/// replaced by `.html`, or `.html` is appended when there is none.
pub fn output_file_name(filename: &str) -> String {
    format!("{}.html", file_stem(filename))
}

/// Registry key for `filename`: the output file name without `.html`.
pub fn slide_id(filename: &str) -> String {
    file_stem(filename).to_owned()
}

fn file_stem(filename: &str) -> &str {
    match filename.rfind('.') {
        // A leading dot marks a hidden file, not an extension.
        Some(idx) if idx > 0 => &filename[..idx],
        _ => filename,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn id_strips_markdown_extension() {
        assert_eq!(slide_id("talk.md"), "talk");
        assert_eq!(output_file_name("talk.md"), "talk.html");
    }

    #[test]
    fn id_strips_only_final_extension() {
        assert_eq!(slide_id("q3.review.markdown"), "q3.review");
        assert_eq!(output_file_name("q3.review.markdown"), "q3.review.html");
    }

    #[test]
    fn id_without_extension_is_filename() {
        assert_eq!(slide_id("README"), "README");
        assert_eq!(output_file_name("README"), "README.html");
        assert_eq!(slide_id(".hidden"), ".hidden");
    }

    #[test]
    fn html_input_keeps_its_stem() {
        assert_eq!(output_file_name("deck.html"), "deck.html");
        assert_eq!(slide_id("deck.html"), "deck");
    }

    #[test]
    fn rejects_path_like_filenames() {
        for name in ["", ".", "..", "../evil.md", "a/b.md", "a\\b.md", "nul\0.md"] {
            assert!(
                matches!(validate_filename(name), Err(ConvertError::InvalidFilename(_))),
                "{name:?} should be rejected"
            );
        }
        assert!(validate_filename("talk.md").is_ok());
    }

    #[test]
    fn builds_revealjs_arguments() {
        let converter = PandocConverter::new();
        let args = converter.args(Path::new("/s/talk.md"), Path::new("/s/out/talk.html"));
        let args: Vec<_> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(args, ["/s/talk.md", "-t", "revealjs", "-o", "/s/out/talk.html", "-s"]);

        let converter = converter.with_revealjs_url(Some("https://cdn.example/reveal.js".into()));
        let args = converter.args(Path::new("in.md"), Path::new("out.html"));
        assert_eq!(args.last().unwrap(), "revealjs-url=https://cdn.example/reveal.js");
        assert_eq!(args[args.len() - 2], "-V");
    }

    #[cfg(unix)]
    mod process {
        use super::super::*;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::tempdir;
        use tracing_test::traced_test;

        /// Write an executable shell script standing in for pandoc. Arguments
        /// arrive as `<input> -t revealjs -o <output> -s`.
        fn fake_tool(dir: &Path, body: &str) -> PathBuf {
            let path = dir.join("fake-pandoc");
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        fn is_empty_dir(dir: &Path) -> bool {
            std::fs::read_dir(dir).unwrap().next().is_none()
        }

        #[tokio::test]
        async fn returns_tool_output_and_cleans_up() {
            let bin = tempdir().unwrap();
            let scratch = tempdir().unwrap();
            let converter = PandocConverter::new()
                .with_program(fake_tool(bin.path(), r#"cat "$1" > "$5""#))
                .with_scratch_root(Some(scratch.path().to_path_buf()));

            let html = converter.convert("talk.md", "# Hello\n\n- a\n- b").await.unwrap();

            assert_eq!(&html[..], b"# Hello\n\n- a\n- b");
            assert!(is_empty_dir(scratch.path()));
        }

        #[tokio::test]
        async fn passes_format_and_standalone_flags() {
            let bin = tempdir().unwrap();
            let converter = PandocConverter::new()
                .with_program(fake_tool(bin.path(), r#"echo "$2 $3 $4 $6" > "$5""#));

            let html = converter.convert("talk.md", "# Hi").await.unwrap();

            assert_eq!(&html[..], b"-t revealjs -o -s\n");
        }

        #[tokio::test]
        async fn html_named_input_does_not_clobber_output() {
            let bin = tempdir().unwrap();
            let converter = PandocConverter::new()
                .with_program(fake_tool(bin.path(), r#"printf converted > "$5""#));

            let html = converter.convert("deck.html", "# Hi").await.unwrap();

            assert_eq!(&html[..], b"converted");
        }

        #[tokio::test]
        async fn names_matching_scratch_layout_are_converted() {
            let bin = tempdir().unwrap();
            let scratch = tempdir().unwrap();
            let converter = PandocConverter::new()
                .with_program(fake_tool(bin.path(), r#"cat "$1" > "$5""#))
                .with_scratch_root(Some(scratch.path().to_path_buf()));

            for name in ["out", "in", "out.md", "in.html", "README"] {
                let html = converter.convert(name, "# Hi").await.unwrap();
                assert_eq!(&html[..], b"# Hi", "{name}");
            }
            assert!(is_empty_dir(scratch.path()));
        }

        #[tokio::test]
        #[traced_test]
        async fn non_zero_exit_carries_stderr() {
            let bin = tempdir().unwrap();
            let scratch = tempdir().unwrap();
            let converter = PandocConverter::new()
                .with_program(fake_tool(bin.path(), "echo 'Unknown reader: md' >&2\nexit 3"))
                .with_scratch_root(Some(scratch.path().to_path_buf()));

            let err = converter.convert("talk.md", "# Hi").await.unwrap_err();

            match &err {
                ConvertError::ToolFailed { status, detail } => {
                    assert_eq!(status.code(), Some(3));
                    assert_eq!(detail, "Unknown reader: md");
                }
                other => panic!("unexpected error: {other:?}"),
            }
            assert!(err.is_tool_failure());
            assert!(is_empty_dir(scratch.path()));
            assert!(logs_contain("converter failed"));
        }

        #[tokio::test]
        async fn silent_failure_reports_exit_status() {
            let bin = tempdir().unwrap();
            let converter = PandocConverter::new().with_program(fake_tool(bin.path(), "exit 1"));

            let err = converter.convert("talk.md", "# Hi").await.unwrap_err();

            match err {
                ConvertError::ToolFailed { detail, .. } => assert!(detail.contains('1')),
                other => panic!("unexpected error: {other:?}"),
            }
        }

        #[tokio::test]
        async fn success_without_output_is_an_error() {
            let bin = tempdir().unwrap();
            let scratch = tempdir().unwrap();
            let converter = PandocConverter::new()
                .with_program(fake_tool(bin.path(), "exit 0"))
                .with_scratch_root(Some(scratch.path().to_path_buf()));

            let err = converter.convert("talk.md", "# Hi").await.unwrap_err();

            assert!(matches!(err, ConvertError::MissingOutput { .. }));
            assert!(is_empty_dir(scratch.path()));
        }

        #[tokio::test]
        async fn missing_program_is_a_spawn_error() {
            let scratch = tempdir().unwrap();
            let converter = PandocConverter::new()
                .with_program("/nonexistent/slides-pandoc")
                .with_scratch_root(Some(scratch.path().to_path_buf()));

            let err = converter.convert("talk.md", "# Hi").await.unwrap_err();

            assert!(matches!(err, ConvertError::Spawn { .. }));
            assert!(err.is_tool_failure());
            assert!(is_empty_dir(scratch.path()));
        }

        #[tokio::test]
        async fn invalid_filename_never_touches_disk() {
            let scratch = tempdir().unwrap();
            let converter = PandocConverter::new()
                .with_program("/nonexistent/slides-pandoc")
                .with_scratch_root(Some(scratch.path().to_path_buf()));

            let err = converter.convert("../escape.md", "# Hi").await.unwrap_err();

            assert!(matches!(err, ConvertError::InvalidFilename(_)));
            assert!(is_empty_dir(scratch.path()));
        }

        #[tokio::test]
        async fn unusable_scratch_root_is_an_io_error() {
            let converter = PandocConverter::new()
                .with_scratch_root(Some(PathBuf::from("/nonexistent/slides-scratch")));

            let err = converter.convert("talk.md", "# Hi").await.unwrap_err();

            assert!(matches!(err, ConvertError::Io { .. }));
            assert!(!err.is_tool_failure());
        }
    }
}
