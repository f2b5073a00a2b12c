//! Core pipeline for inline-sol.
//!
//! Compiles Solidity snippets embedded in Rust source with forge:
//! - Options resolution and validation
//! - Build workspace lifecycle (one throwaway forge project per run)
//! - Content-addressed snippet ids
//! - `forge build` invocation and artifact validation
//! - Per-run driver and the `sol!` source scanner

pub mod artifact;
pub mod driver;
pub mod error;
pub mod host;
pub mod invoker;
pub mod manifest;
pub mod options;
pub mod snippet;
pub mod workspace;

pub use artifact::{Artifact, Bytecode};
pub use driver::{CompiledSnippet, TransformDriver};
pub use error::{BuildErrorKind, Error, Result};
pub use host::{
    ARTIFACT_SUBDIR, Diagnostic, RunReport, SnippetScanner, SourceLocation, build_script,
    compile_sources, run_build_script,
};
pub use invoker::BuildInvoker;
pub use options::{PipelineConfig, RawOptions, resolve};
pub use snippet::{Snippet, SnippetId};
pub use workspace::Workspace;
