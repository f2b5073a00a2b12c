//! External compiler invocation.
//!
//! Stages a snippet into the workspace and runs `forge build` over it.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::fs;
use tokio::process::Command;

use crate::error::{BuildErrorKind, Error, Result};
use crate::options::PipelineConfig;
use crate::snippet::{Snippet, SnippetId};
use crate::workspace::Workspace;

/// Drives the external compiler for individual snippets.
#[derive(Debug, Clone)]
pub struct BuildInvoker {
    /// Executable name or path, as configured
    executable: String,

    /// Upper bound on one compiler run
    timeout: Option<Duration>,
}

impl BuildInvoker {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            executable: config.executable_name().to_string(),
            timeout: config.build_timeout(),
        }
    }

    /// Stage the snippet and compile the workspace.
    pub async fn build(&self, workspace: &Workspace, snippet: &Snippet) -> Result<()> {
        self.stage(workspace, snippet).await?;
        self.run(workspace, snippet.id()).await
    }

    /// Write the snippet text verbatim to `src/<id>.sol`.
    ///
    /// An existing file is overwritten; its content is identical because the
    /// file name is derived from the content.
    pub async fn stage(&self, workspace: &Workspace, snippet: &Snippet) -> Result<PathBuf> {
        let path = workspace.source_path(snippet.id());
        fs::write(&path, snippet.raw_text())
            .await
            .map_err(|e| Error::workspace(&path, e))?;

        tracing::debug!("Staged snippet {} at {}", snippet.id(), path.display());
        Ok(path)
    }

    /// Run `<executable> build` in the workspace root and wait for it.
    ///
    /// Fails on a non-zero exit and also on any stderr output, since forge can
    /// report fatal problems while still exiting with status 0.
    async fn run(&self, workspace: &Workspace, id: &SnippetId) -> Result<()> {
        let program = self.resolve_executable(id)?;

        tracing::info!("Running {} build for snippet {}", program.display(), id);
        let start = Instant::now();

        let child = Command::new(&program)
            .arg("build")
            .current_dir(&workspace.root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::Build {
                id: id.clone(),
                kind: BuildErrorKind::Spawn,
                output: format!("failed to run {}: {}", program.display(), e),
            })?;

        // Dropping the wait future on timeout drops the child, which kills it.
        let waited = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(waited) => waited,
                Err(_) => {
                    return Err(Error::Build {
                        id: id.clone(),
                        kind: BuildErrorKind::Timeout(limit),
                        output: String::new(),
                    });
                }
            },
            None => child.wait_with_output().await,
        };

        let output = waited.map_err(|e| Error::Build {
            id: id.clone(),
            kind: BuildErrorKind::Spawn,
            output: format!("failed to wait for {}: {}", program.display(), e),
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            let captured = if stderr.trim().is_empty() { &stdout } else { &stderr };
            return Err(Error::Build {
                id: id.clone(),
                kind: BuildErrorKind::ExitStatus(output.status.code()),
                output: captured.to_string(),
            });
        }

        // TODO: let callers opt out of this check once forge warnings can be
        // told apart from errors.
        if !stderr.trim().is_empty() {
            tracing::warn!(
                "{} exited successfully but wrote to stderr for snippet {}",
                program.display(),
                id
            );
            return Err(Error::Build {
                id: id.clone(),
                kind: BuildErrorKind::Stderr,
                output: stderr.to_string(),
            });
        }

        tracing::info!(
            "Built snippet {} in {:.2}s",
            id,
            start.elapsed().as_secs_f64()
        );
        Ok(())
    }

    /// Locate the executable in PATH (or check an explicit path).
    fn resolve_executable(&self, id: &SnippetId) -> Result<PathBuf> {
        which::which(&self.executable).map_err(|e| Error::Build {
            id: id.clone(),
            kind: BuildErrorKind::Spawn,
            output: format!("{} not found: {}", self.executable, e),
        })
    }
}
