//! Run outcome: compiled artifacts and diagnostics.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::driver::CompiledSnippet;
use crate::error::{Error, Result};

/// A location in host source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Source file path
    pub file: PathBuf,

    /// Line number (1-indexed)
    pub line: usize,

    /// Column number (1-indexed)
    pub column: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

/// An error attached to the place in host source that caused it.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// `None` for run-level failures such as workspace teardown.
    pub location: Option<SourceLocation>,
    pub error: Error,
}

impl Diagnostic {
    pub fn at(location: SourceLocation, error: Error) -> Self {
        Self {
            location: Some(location),
            error,
        }
    }

    pub fn run_level(error: Error) -> Self {
        Self {
            location: None,
            error,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{}: {}", location, self.error.with_hint()),
            None => write!(f, "{}", self.error.with_hint()),
        }
    }
}

/// A compiled snippet and where it was found.
#[derive(Debug, Clone)]
pub struct ReportedArtifact {
    pub location: SourceLocation,
    pub compiled: CompiledSnippet,
}

/// Everything a run produced.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Artifacts in the order their snippets were encountered.
    pub artifacts: Vec<ReportedArtifact>,

    /// Every failure, in the order it happened.
    pub diagnostics: Vec<Diagnostic>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// The failure that cut the run short, if any.
    pub fn fatal(&self) -> Option<&Error> {
        self.diagnostics
            .iter()
            .map(|d| &d.error)
            .find(|e| e.is_fatal())
    }

    /// All diagnostics, one per paragraph.
    pub fn summary(&self) -> String {
        self.diagnostics
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Write each distinct artifact to `<dir>/<id>.json`.
    pub async fn write_artifacts(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        tokio::fs::create_dir_all(dir).await.map_err(|e| Error::Output {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;

        let unique: BTreeMap<_, _> = self
            .artifacts
            .iter()
            .map(|reported| (&reported.compiled.id, &reported.compiled.artifact))
            .collect();

        let mut written = Vec::with_capacity(unique.len());
        for (id, artifact) in unique {
            let path = dir.join(id.artifact_file_name());
            let json = serde_json::to_string_pretty(artifact).map_err(|e| Error::Output {
                path: path.clone(),
                message: e.to_string(),
            })?;
            tokio::fs::write(&path, json).await.map_err(|e| Error::Output {
                path: path.clone(),
                message: e.to_string(),
            })?;

            tracing::debug!("Wrote artifact {}", path.display());
            written.push(path);
        }

        Ok(written)
    }
}
