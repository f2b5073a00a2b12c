//! inline-sol: Solidity snippets inside Rust, compiled at build time.
//!
//! Write Solidity where you use it, and let the build compile it with
//! [forge](https://getfoundry.sh):
//!
//! ```rust,ignore
//! use inline_sol::sol;
//!
//! static GREETER: inline_sol::EmbeddedArtifact = sol!(r#"
//!     pragma solidity ^0.8.17;
//!     contract Greeter {
//!         function greet() public pure returns (string memory) { return "hi"; }
//!     }
//! "#);
//!
//! fn deploy_code() -> String {
//!     GREETER.artifact().expect("artifact JSON").bytecode.object
//! }
//! ```
//!
//! and in `build.rs`:
//!
//! ```rust,ignore
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     inline_sol::build_script(inline_sol::RawOptions::default().with_solc("0.8.17"))?;
//!     Ok(())
//! }
//! ```
//!
//! The build script scans `src/` for `sol!` invocations, stages each snippet
//! into a throwaway forge project, runs `forge build`, validates the output
//! and writes one artifact per snippet into `OUT_DIR`. `sol!` then embeds the
//! artifact for its snippet. Any failing snippet fails the build with a
//! diagnostic pointing at the `sol!` call.
//!
//! Snippets are plain string literals: interpolation is not supported.

pub use inline_sol_macros::sol;

mod embedded;

pub use embedded::EmbeddedArtifact;
pub use inline_sol_core::{
    Artifact, Bytecode, Error, RawOptions, RunReport, SnippetId, build_script,
};

pub mod prelude {
    //! Common imports.
    //!
    //! ```rust,ignore
    //! use inline_sol::prelude::*;
    //! ```

    pub use crate::sol;
    pub use crate::{Artifact, EmbeddedArtifact};
}
