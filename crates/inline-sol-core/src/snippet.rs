//! Snippet identification.
//!
//! Snippets are content-addressed: the same Solidity text always maps to the
//! same [`SnippetId`], so its staged source file and its artifact path are
//! stable within (and across) runs.

use std::fmt;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Prefix that keeps generated names valid Solidity identifiers.
pub const SNIPPET_TAG: &str = "SolSnippet";

/// Number of hex digits of the digest kept in an id.
pub const DIGEST_PREFIX_LEN: usize = 8;

/// File extension of staged Solidity sources.
pub const SOURCE_EXTENSION: &str = "sol";

/// Deterministic, filesystem-safe identifier derived from snippet text.
///
/// Rendered as `SolSnippet_<8 hex digits>` where the digits are the start of
/// the SHA-256 digest of the UTF-8 text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SnippetId(String);

impl SnippetId {
    /// Derive the id of a piece of snippet text.
    pub fn identify(raw_text: &str) -> Self {
        let digest = Sha256::digest(raw_text.as_bytes());
        let hex = format!("{:x}", digest);
        Self(format!("{SNIPPET_TAG}_{}", &hex[..DIGEST_PREFIX_LEN]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the staged source file (`<id>.sol`).
    pub fn source_file_name(&self) -> String {
        format!("{}.{SOURCE_EXTENSION}", self.0)
    }

    /// Name of the compiler's JSON artifact (`<id>.json`).
    pub fn artifact_file_name(&self) -> String {
        format!("{}.json", self.0)
    }
}

impl fmt::Display for SnippetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A unit of Solidity source found embedded in host source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    raw_text: String,
    id: SnippetId,
}

impl Snippet {
    /// Wrap snippet text, rejecting text with nothing to compile.
    ///
    /// This check runs before any filesystem or process activity.
    pub fn new(raw_text: impl Into<String>) -> Result<Self> {
        let raw_text = raw_text.into();
        let id = SnippetId::identify(&raw_text);

        if raw_text.trim().is_empty() {
            return Err(Error::Input {
                id,
                message: "embedded Solidity snippet must contain source text".to_string(),
            });
        }

        Ok(Self { raw_text, id })
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn id(&self) -> &SnippetId {
        &self.id
    }
}
