//! Procedural macros for inline-sol.
//!
//! This crate provides the `sol!` macro that marks a string literal as an
//! embedded Solidity snippet. The macro itself never runs the compiler: the
//! crate's build script (see `inline_sol::build_script`) finds every `sol!`
//! invocation with `syn`, compiles it with forge and writes the artifact to
//! `$OUT_DIR/inline-sol/<id>.json`. The macro only computes the same
//! content-derived id and embeds that file.

use inline_sol_core::{ARTIFACT_SUBDIR, Snippet};
use proc_macro::TokenStream;
use quote::quote;
use syn::{LitStr, parse_macro_input};

/// Embeds a Solidity snippet compiled at build time.
///
/// Expands to an `inline_sol::EmbeddedArtifact` holding the artifact JSON.
///
/// # Example
///
/// ```rust,ignore
/// use inline_sol::sol;
///
/// static COUNTER: inline_sol::EmbeddedArtifact = sol!(r#"
///     // SPDX-License-Identifier: MIT
///     pragma solidity ^0.8.17;
///
///     contract Counter {
///         uint256 public count;
///         function increment() public { count += 1; }
///     }
/// "#);
///
/// let artifact = COUNTER.artifact()?;
/// println!("{}", artifact.bytecode.object);
/// ```
///
/// # Errors
///
/// Fails to compile when the argument is not a single string literal or the
/// literal holds no source text. A missing artifact file (build script not
/// run, or the snippet failed to compile) surfaces as an `include_str!` error.
#[proc_macro]
pub fn sol(input: TokenStream) -> TokenStream {
    let lit = parse_macro_input!(input as LitStr);

    let snippet = match Snippet::new(lit.value()) {
        Ok(snippet) => snippet,
        Err(e) => return syn::Error::new(lit.span(), e).to_compile_error().into(),
    };

    let id = snippet.id().as_str();
    let artifact_file = format!("/{}/{}", ARTIFACT_SUBDIR, snippet.id().artifact_file_name());

    let expanded = quote! {
        ::inline_sol::EmbeddedArtifact::new(
            #id,
            ::core::include_str!(::core::concat!(::core::env!("OUT_DIR"), #artifact_file)),
        )
    };

    TokenStream::from(expanded)
}
