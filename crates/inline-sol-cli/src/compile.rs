//! Compile command implementation for the inline-sol CLI.

use std::path::{Path, PathBuf};
use std::time::Instant;

use inline_sol_core::{RawOptions, RunReport, compile_sources};

use crate::colors;

/// Compile all snippets under `paths` and report the outcome.
pub async fn execute(
    options: RawOptions,
    paths: &[PathBuf],
    out_dir: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let start = Instant::now();

    let report = compile_sources(options, paths).await?;

    if let Some(dir) = out_dir {
        let written = report.write_artifacts(dir).await?;
        tracing::info!("Wrote {} artifact(s) to {}", written.len(), dir.display());
    }

    if json {
        print_json(&report)?;
    } else {
        print_summary(&report);
    }

    for diagnostic in &report.diagnostics {
        eprintln!("{}error{}: {}", colors::RED, colors::RESET, diagnostic);
    }

    if let Some(fatal) = report.fatal() {
        anyhow::bail!("run aborted: {}", fatal);
    }

    if !report.is_success() {
        anyhow::bail!(
            "{} of {} snippet(s) failed",
            report.diagnostics.len(),
            report.diagnostics.len() + report.artifacts.len()
        );
    }

    if !json {
        println!(
            "\n{}Compiled{} {} snippet(s) in {:.2}s",
            colors::GREEN,
            colors::RESET,
            report.artifacts.len(),
            start.elapsed().as_secs_f64()
        );
    }

    Ok(())
}

fn print_summary(report: &RunReport) {
    if report.artifacts.is_empty() && report.diagnostics.is_empty() {
        println!("No sol! snippets found.");
        return;
    }

    for reported in &report.artifacts {
        let artifact = &reported.compiled.artifact;
        // Two hex characters per byte, minus the 0x prefix.
        let bytecode_len = artifact.bytecode.object.trim_start_matches("0x").len() / 2;

        println!(
            "{}{}{} {}{}{}  abi: {} entries, bytecode: {} bytes",
            colors::BOLD,
            reported.compiled.id,
            colors::RESET,
            colors::DIM,
            reported.location,
            colors::RESET,
            artifact.abi.len(),
            bytecode_len
        );
    }
}

fn print_json(report: &RunReport) -> anyhow::Result<()> {
    let entries: Vec<_> = report
        .artifacts
        .iter()
        .map(|reported| {
            serde_json::json!({
                "id": reported.compiled.id,
                "location": reported.location.to_string(),
                "artifact": reported.compiled.artifact,
            })
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}
