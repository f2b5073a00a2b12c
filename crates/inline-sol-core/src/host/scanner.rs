//! Snippet scanner using syn to find `sol!` invocations in Rust source files.

use std::path::{Path, PathBuf};

use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::visit::Visit;
use syn::{Expr, File, LitStr, Macro, Token};

use super::report::{Diagnostic, SourceLocation};
use crate::error::{Error, Result};

/// A `sol!` invocation found in host source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundSnippet {
    /// Value of the string literal (escapes resolved, raw strings verbatim).
    pub text: String,
    pub location: SourceLocation,
}

/// Result of scanning one source file.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub snippets: Vec<FoundSnippet>,
    /// Qualified `inline_sol::sol!` invocations whose body is not a single string literal.
    pub rejected: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SolPath {
    Bare,
    Qualified,
}

/// Collects `sol!` snippets from a Rust source file.
#[derive(Default)]
pub struct SnippetScanner {
    snippets: Vec<FoundSnippet>,
    rejected: Vec<Diagnostic>,
    source_file: PathBuf,
}

impl SnippetScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and scan a source file.
    pub async fn scan_file(&mut self, path: &Path) -> Result<ScanResult> {
        let source = tokio::fs::read_to_string(path).await.map_err(|e| Error::Scan {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        self.scan_str(&source, path)
    }

    /// Scan source text; `path` is only used for locations and errors.
    pub fn scan_str(&mut self, source: &str, path: &Path) -> Result<ScanResult> {
        self.source_file = path.to_path_buf();
        self.snippets.clear();
        self.rejected.clear();

        let file: File = syn::parse_str(source).map_err(|e| Error::Scan {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        self.visit_file(&file);

        Ok(ScanResult {
            snippets: std::mem::take(&mut self.snippets),
            rejected: std::mem::take(&mut self.rejected),
        })
    }

    /// Classify a macro path as one of ours.
    ///
    /// `inline_sol::sol!` and `inline_sol::prelude::sol!` are always ours. A
    /// bare `sol!` may also be another crate's macro of the same name (alloy's
    /// takes Solidity as tokens), so it only counts when its body is a string
    /// literal.
    fn classify(mac: &Macro) -> Option<SolPath> {
        let segments: Vec<_> = mac
            .path
            .segments
            .iter()
            .map(|s| s.ident.to_string())
            .collect();

        match segments.as_slice() {
            [name] if name == "sol" => Some(SolPath::Bare),
            [krate, name] if krate == "inline_sol" && name == "sol" => Some(SolPath::Qualified),
            [krate, prelude, name]
                if krate == "inline_sol" && prelude == "prelude" && name == "sol" =>
            {
                Some(SolPath::Qualified)
            }
            _ => None,
        }
    }

    fn location(&self, span: proc_macro2::Span) -> SourceLocation {
        let start = span.start();
        SourceLocation {
            file: self.source_file.clone(),
            line: start.line,
            column: start.column + 1,
        }
    }
}

impl<'ast> Visit<'ast> for SnippetScanner {
    fn visit_macro(&mut self, mac: &'ast Macro) {
        if let Some(kind) = Self::classify(mac) {
            let location = self.location(mac.path.span());
            match mac.parse_body::<LitStr>() {
                Ok(lit) => self.snippets.push(FoundSnippet {
                    text: lit.value(),
                    location,
                }),
                Err(_) if kind == SolPath::Bare => {
                    tracing::debug!("Skipping non-literal sol! at {}", location);
                }
                Err(e) => self.rejected.push(Diagnostic::at(
                    location,
                    Error::Scan {
                        path: self.source_file.clone(),
                        message: format!("sol! expects a single string literal: {e}"),
                    },
                )),
            }
            return;
        }

        // Look inside expression-like macros (`vec![..]`, `println!(..)`, ...).
        if let Ok(args) = mac.parse_body_with(Punctuated::<Expr, Token![,]>::parse_terminated) {
            for expr in &args {
                self.visit_expr(expr);
            }
        }
    }
}
