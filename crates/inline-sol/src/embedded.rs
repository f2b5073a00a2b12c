//! Artifacts embedded by `sol!`.

use crate::Artifact;

/// A compiled snippet baked into the binary by [`sol!`](crate::sol).
///
/// Holds the snippet id and the artifact JSON written by the build script.
/// Parsing is deferred to [`EmbeddedArtifact::artifact`] so the value can
/// live in a `static`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddedArtifact {
    id: &'static str,
    json: &'static str,
}

impl EmbeddedArtifact {
    #[doc(hidden)]
    pub const fn new(id: &'static str, json: &'static str) -> Self {
        Self { id, json }
    }

    /// Content-derived snippet id, e.g. `SolSnippet_51feb570`.
    pub const fn id(&self) -> &'static str {
        self.id
    }

    /// Raw artifact JSON.
    pub const fn json(&self) -> &'static str {
        self.json
    }

    /// Parse the embedded JSON.
    pub fn artifact(&self) -> Result<Artifact, serde_json::Error> {
        serde_json::from_str(self.json)
    }

    /// Hex bytecode, without parsing the ABI.
    pub fn bytecode_object(&self) -> Result<String, serde_json::Error> {
        self.artifact().map(|artifact| artifact.bytecode.object)
    }
}
