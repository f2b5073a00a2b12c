//! Error types for inline-sol-core.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::snippet::SnippetId;

/// Result type for inline-sol-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while compiling embedded snippets.
///
/// `Config` and `Workspace` errors abort the whole run. Every other variant
/// belongs to a single snippet (or source file) and leaves the rest of the
/// run untouched.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Invalid pipeline options.
    #[error("invalid options: {0}")]
    Config(String),

    /// Filesystem failure while setting up, staging into or tearing down the workspace.
    #[error("workspace error at {}: {message}", path.display())]
    Workspace { path: PathBuf, message: String },

    /// Snippet has no usable source text.
    #[error("snippet {id}: {message}")]
    Input { id: SnippetId, message: String },

    /// The external compiler failed.
    #[error("build failed for snippet {id}: {kind}{}", format_output(output))]
    Build {
        id: SnippetId,
        kind: BuildErrorKind,
        output: String,
    },

    /// The compiler output is missing or does not have the expected shape.
    #[error("invalid artifact for snippet {id} at {}: {message}", path.display())]
    Artifact {
        id: SnippetId,
        path: PathBuf,
        message: String,
    },

    /// A host source file could not be read or parsed.
    #[error("failed to scan {}: {message}", path.display())]
    Scan { path: PathBuf, message: String },

    /// Compiled artifacts could not be written out.
    #[error("failed to write {}: {message}", path.display())]
    Output { path: PathBuf, message: String },

    /// The async runtime could not be started.
    #[error("runtime error: {0}")]
    Runtime(String),

    /// One or more snippets failed during a build-script run.
    #[error("{failed} snippet(s) failed to compile:\n{details}")]
    Run { failed: usize, details: String },
}

/// Why an external compiler invocation was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildErrorKind {
    /// The executable could not be found or started.
    Spawn,
    /// The process exited unsuccessfully (`None` when killed by a signal).
    ExitStatus(Option<i32>),
    /// The process exited with status 0 but wrote to stderr.
    Stderr,
    /// The process did not finish within the configured limit.
    Timeout(Duration),
}

impl fmt::Display for BuildErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn => write!(f, "could not start compiler"),
            Self::ExitStatus(Some(code)) => write!(f, "compiler exited with status {code}"),
            Self::ExitStatus(None) => write!(f, "compiler terminated by signal"),
            Self::Stderr => write!(f, "compiler reported errors on stderr"),
            Self::Timeout(limit) => write!(f, "compiler timed out after {}s", limit.as_secs()),
        }
    }
}

fn format_output(output: &str) -> String {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\n{trimmed}")
    }
}

impl Error {
    /// Whether this error must abort the remaining work of a run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::Workspace { .. } | Self::Runtime(_)
        )
    }

    /// The snippet this error belongs to, if any.
    pub fn snippet_id(&self) -> Option<&SnippetId> {
        match self {
            Self::Input { id, .. } | Self::Build { id, .. } | Self::Artifact { id, .. } => {
                Some(id)
            }
            _ => None,
        }
    }

    /// Render the error together with a recovery hint where one is known.
    pub fn with_hint(&self) -> String {
        let hint = match self {
            Self::Build {
                kind: BuildErrorKind::Spawn,
                ..
            } => Some("install Foundry (https://getfoundry.sh) or pass the forge executable path"),
            Self::Build {
                kind: BuildErrorKind::Timeout(_),
                ..
            } => Some("raise `buildTimeoutSecs` or set it to 0 to wait indefinitely"),
            Self::Artifact { .. } => {
                Some("the forge output layout may differ from this version; check `forge --version`")
            }
            Self::Config(_) => {
                Some("recognized options are solc, forgeExecutable, workspaceDir and buildTimeoutSecs")
            }
            _ => None,
        };

        match hint {
            Some(hint) => format!("{self}\n  hint: {hint}"),
            None => self.to_string(),
        }
    }

    pub(crate) fn workspace(path: impl Into<PathBuf>, err: impl fmt::Display) -> Self {
        Self::Workspace {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
