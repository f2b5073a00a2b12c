//! Cargo build-script entry point.
//!
//! ```rust,ignore
//! // build.rs
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     inline_sol::build_script(Default::default())?;
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};

use super::{RunReport, compile_sources};
use crate::error::{Error, Result};
use crate::options::RawOptions;

/// Directory under `OUT_DIR` that `sol!` reads artifacts from.
pub const ARTIFACT_SUBDIR: &str = "inline-sol";

/// Workspace directory under `OUT_DIR` used when no `workspaceDir` is given.
const BUILD_SCRIPT_WORKSPACE: &str = "inline-sol-forge-project";

/// Compile the snippets of the crate whose build script is running.
///
/// Reads `CARGO_MANIFEST_DIR` and `OUT_DIR` from the environment.
pub fn build_script(options: RawOptions) -> Result<RunReport> {
    let manifest_dir = env_path("CARGO_MANIFEST_DIR")?;
    let out_dir = env_path("OUT_DIR")?;
    run_build_script(options, &manifest_dir, &out_dir)
}

/// Compile `<manifest_dir>/src` and write artifacts to `<out_dir>/inline-sol/`.
///
/// Each crate gets its own workspace under `out_dir` unless one is
/// configured, so parallel build scripts do not share a forge project.
pub fn run_build_script(
    options: RawOptions,
    manifest_dir: &Path,
    out_dir: &Path,
) -> Result<RunReport> {
    let src_dir = manifest_dir.join("src");
    println!("cargo:rerun-if-changed={}", src_dir.display());

    let options = match options.workspace_dir {
        Some(_) => options,
        None => options.with_workspace_dir(out_dir.join(BUILD_SCRIPT_WORKSPACE)),
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Runtime(e.to_string()))?;

    let artifact_dir = out_dir.join(ARTIFACT_SUBDIR);
    let report = runtime.block_on(async {
        let report = compile_sources(options, &[src_dir]).await?;
        report.write_artifacts(&artifact_dir).await?;
        Ok::<_, Error>(report)
    })?;

    if !report.is_success() {
        for diagnostic in &report.diagnostics {
            // cargo only reads the first line of each instruction
            println!("cargo:warning={}", diagnostic.to_string().replace('\n', " | "));
        }
        return Err(Error::Run {
            failed: report.diagnostics.len(),
            details: report.summary(),
        });
    }

    Ok(report)
}

fn env_path(name: &str) -> Result<PathBuf> {
    std::env::var_os(name)
        .map(PathBuf::from)
        .ok_or_else(|| Error::Config(format!("{name} is not set; call this from a build script")))
}
