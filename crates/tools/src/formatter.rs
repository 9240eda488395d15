//! The external diff formatter (delta by default).
//!
//! Each [`RenderRequest`] becomes one process: the patch goes to stdin and
//! the styled text comes back on stdout. Runs on the tokio runtime so the
//! event loop never blocks on it.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use diffnav_common::{RenderRequest, RenderResult};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum FormatterError {
    #[error("diff formatter `{0}` not found in PATH")]
    NotFound(String),
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with status {code}: {stderr}")]
    Failed {
        program: String,
        code: i32,
        stderr: String,
    },
}

#[derive(Debug, Clone)]
pub struct Formatter {
    program: PathBuf,
    /// Passed before the per-render arguments.
    base_args: Vec<String>,
}

impl Formatter {
    /// Resolves a configured command line such as `delta --dark`: the first
    /// word is looked up in `PATH`, the rest is kept as leading arguments.
    pub fn resolve(command: &str) -> Result<Formatter, FormatterError> {
        let mut words = command.split_whitespace();
        let name = words.next().unwrap_or_default();
        if name.is_empty() {
            return Err(FormatterError::NotFound(command.to_string()));
        }
        let program = which::which(name).map_err(|_| FormatterError::NotFound(name.to_string()))?;
        debug!(program = %program.display(), "diff formatter resolved");
        Ok(Formatter {
            program,
            base_args: words.map(str::to_string).collect(),
        })
    }

    pub fn with_command<I, S>(program: impl Into<PathBuf>, base_args: I) -> Formatter
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Formatter {
            program: program.into(),
            base_args: base_args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Command line for one render.
    pub fn args(request: &RenderRequest) -> Vec<String> {
        let mut args = vec![
            "--paging=never".to_string(),
            format!("-w={}", request.width),
            format!("--max-line-length={}", request.max_line_length()),
        ];
        if request.side_by_side {
            args.push("--side-by-side".to_string());
        }
        args
    }

    pub async fn render(&self, request: &RenderRequest) -> Result<String, FormatterError> {
        let program = self.program.display().to_string();
        let mut child = Command::new(&self.program)
            .args(&self.base_args)
            .args(Self::args(request))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| FormatterError::Spawn {
                program: program.clone(),
                source,
            })?;

        let stdin = child.stdin.take();
        let input = format!("{}\n", request.patch);
        let write = async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(input.as_bytes()).await?;
            }
            Ok::<(), std::io::Error>(())
        };
        let (written, output) = tokio::join!(write, child.wait_with_output());
        let output = output.map_err(|source| FormatterError::Spawn {
            program: program.clone(),
            source,
        })?;
        if let Err(err) = written {
            // the formatter may exit before reading everything; its status decides
            debug!(error = %err, "formatter closed stdin early");
        }

        if !output.status.success() {
            return Err(FormatterError::Failed {
                program,
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Renders `request`, turning every failure into an `Err` outcome so the
/// viewer can fall back to the raw patch.
pub async fn run(formatter: Result<Formatter, String>, request: RenderRequest) -> RenderResult {
    let outcome = match formatter {
        Ok(formatter) => formatter.render(&request).await.map_err(|err| {
            warn!(key = %request.key, error = %err, "diff formatter failed");
            err.to_string()
        }),
        Err(message) => Err(message),
    };
    RenderResult {
        key: request.key,
        generation: request.generation,
        outcome,
    }
}
