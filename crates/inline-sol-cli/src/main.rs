//! inline-sol CLI - compile Solidity snippets embedded in Rust sources.

mod colors;
mod compile;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use inline_sol_core::RawOptions;

#[derive(Parser)]
#[command(name = "inline-sol")]
#[command(about = "Compile Solidity snippets embedded in Rust sources")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile every sol! snippet in the given files or directories
    Compile {
        /// Rust source files or directories to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Solidity compiler version (e.g. 0.8.17)
        #[arg(long)]
        solc: Option<String>,

        /// forge executable name or path
        #[arg(long)]
        forge: Option<String>,

        /// Build workspace directory; must be missing, empty or a previous workspace
        /// (default: under the system temp dir)
        #[arg(long)]
        workspace: Option<PathBuf>,

        /// Seconds to wait for one forge build; 0 waits indefinitely
        #[arg(long)]
        timeout: Option<u64>,

        /// Write artifacts as <id>.json into this directory
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Print artifacts as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Print the snippet id of a Solidity file's contents
    Id {
        /// Path to the Solidity source
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    // Helper to format pipeline errors with recovery hints
    let format_error = |err: anyhow::Error| -> anyhow::Error {
        if let Some(sol_err) = err.downcast_ref::<inline_sol_core::Error>() {
            anyhow::anyhow!("{}", sol_err.with_hint())
        } else {
            err
        }
    };

    match cli.command {
        Commands::Compile {
            paths,
            solc,
            forge,
            workspace,
            timeout,
            out,
            json,
        } => {
            let options = RawOptions {
                solc,
                forge_executable: forge,
                workspace_dir: workspace,
                build_timeout_secs: timeout,
            };
            compile::execute(options, &paths, out.as_deref(), json)
                .await
                .map_err(format_error)?;
        }

        Commands::Id { file } => {
            let source = std::fs::read_to_string(&file)?;
            println!("{}", inline_sol_core::SnippetId::identify(&source));
        }
    }

    Ok(())
}
