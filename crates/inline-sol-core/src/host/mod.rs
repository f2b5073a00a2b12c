//! Host side of the pipeline.
//!
//! Walks Rust sources for `sol!` invocations and feeds each one to a
//! [`TransformDriver`]:
//!
//! ```text
//! *.rs ──► SnippetScanner ──► TransformDriver::compile ──► RunReport
//!                 (syn)            (stage, build, read)        │
//!                                                              └──► <out>/<id>.json
//! ```

mod build_script;
mod report;
mod scanner;

use std::fs;
use std::path::{Path, PathBuf};

pub use build_script::{ARTIFACT_SUBDIR, build_script, run_build_script};
pub use report::{Diagnostic, ReportedArtifact, RunReport, SourceLocation};
pub use scanner::{FoundSnippet, ScanResult, SnippetScanner};

use crate::driver::TransformDriver;
use crate::error::{Error, Result};
use crate::options::{PipelineConfig, RawOptions};

/// Compile every `sol!` snippet in the given files and directories.
///
/// Returns `Err` only for invalid options, before any filesystem work.
/// Everything else ends up in the report in the order it happened. A fatal
/// failure (broken workspace) is recorded after the earlier diagnostics and
/// stops the remaining snippets; see [`RunReport::fatal`]. The workspace is
/// removed either way.
pub async fn compile_sources(options: RawOptions, paths: &[PathBuf]) -> Result<RunReport> {
    let config = PipelineConfig::resolve(options)?;

    let mut report = RunReport::default();
    let files = collect_rust_files(paths, &mut report.diagnostics);
    tracing::info!("Scanning {} source file(s) for sol! snippets", files.len());

    let driver = TransformDriver::start(config);
    let mut scanner = SnippetScanner::new();

    'files: for file in &files {
        let scan = match scanner.scan_file(file).await {
            Ok(scan) => scan,
            Err(e) => {
                report.diagnostics.push(Diagnostic::run_level(e));
                continue;
            }
        };
        report.diagnostics.extend(scan.rejected);

        for found in scan.snippets {
            match driver.compile(&found.text).await {
                Ok(compiled) => report.artifacts.push(ReportedArtifact {
                    location: found.location,
                    compiled,
                }),
                Err(e) if e.is_fatal() => {
                    tracing::error!("Aborting run at {}: {}", found.location, e);
                    report.diagnostics.push(Diagnostic::at(found.location, e));
                    break 'files;
                }
                Err(e) => {
                    tracing::warn!("Snippet at {} failed: {}", found.location, e);
                    report.diagnostics.push(Diagnostic::at(found.location, e));
                }
            }
        }
    }

    // Appended after the snippet failures so it never hides them.
    if let Err(e) = driver.finish().await {
        tracing::warn!("Workspace teardown failed: {}", e);
        report.diagnostics.push(Diagnostic::run_level(e));
    }

    tracing::info!(
        "Compiled {} snippet(s), {} diagnostic(s)",
        report.artifacts.len(),
        report.diagnostics.len()
    );
    Ok(report)
}

/// Expand paths into a sorted list of `.rs` files.
///
/// Directories are walked recursively, skipping hidden directories and `target`.
fn collect_rust_files(paths: &[PathBuf], diagnostics: &mut Vec<Diagnostic>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            walk_dir(path, &mut files, diagnostics);
        } else {
            // Missing files surface as scan errors.
            files.push(path.clone());
        }
    }

    files.sort();
    files.dedup();
    files
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>, diagnostics: &mut Vec<Diagnostic>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            diagnostics.push(Diagnostic::run_level(Error::Scan {
                path: dir.to_path_buf(),
                message: e.to_string(),
            }));
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();

        if path.is_dir() {
            if !name.starts_with('.') && name != "target" {
                walk_dir(&path, files, diagnostics);
            }
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            files.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_collect_rust_files() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("src/nested")).unwrap();
        fs::create_dir_all(root.join("target/debug")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join("src/lib.rs"), "").unwrap();
        fs::write(root.join("src/nested/mod.rs"), "").unwrap();
        fs::write(root.join("src/notes.md"), "").unwrap();
        fs::write(root.join("target/debug/build.rs"), "").unwrap();
        fs::write(root.join(".git/hook.rs"), "").unwrap();

        let mut diagnostics = Vec::new();
        let files = collect_rust_files(&[root.to_path_buf()], &mut diagnostics);

        assert!(diagnostics.is_empty());
        assert_eq!(
            files,
            vec![root.join("src/lib.rs"), root.join("src/nested/mod.rs")]
        );
    }

    #[tokio::test]
    async fn test_invalid_options_abort_before_filesystem_work() {
        let temp = TempDir::new().unwrap();
        let options = RawOptions::default()
            .with_solc("8.17")
            .with_workspace_dir(temp.path().join("project"));

        let err = compile_sources(options, &[temp.path().to_path_buf()])
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Config(_)));
        assert!(!temp.path().join("project").exists());
    }

    #[tokio::test]
    async fn test_missing_file_is_reported() {
        let temp = TempDir::new().unwrap();
        let options = RawOptions::default().with_workspace_dir(temp.path().join("project"));

        let report = compile_sources(options, &[temp.path().join("missing.rs")])
            .await
            .unwrap();

        assert_eq!(report.diagnostics.len(), 1);
        assert!(matches!(report.diagnostics[0].error, Error::Scan { .. }));
        assert!(!temp.path().join("project").exists());
    }
}
