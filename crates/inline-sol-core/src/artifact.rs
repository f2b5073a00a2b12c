//! Compiler artifact reading and validation.

use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::snippet::SnippetId;
use crate::workspace::Workspace;

/// Compiled snippet: ABI plus creation bytecode.
///
/// Serializes as `{"abi":[...],"bytecode":{"object":"0x..","sourceMap":".."}}`.
/// Any other fields forge writes are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    /// ABI entries, kept opaque.
    pub abi: Vec<serde_json::Value>,

    pub bytecode: Bytecode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bytecode {
    /// Hex-encoded bytecode.
    pub object: String,

    pub source_map: String,
}

/// Read and validate the artifact forge produced for a snippet.
pub async fn read(workspace: &Workspace, id: &SnippetId) -> Result<Artifact> {
    let path = workspace.artifact_path(id);
    tracing::debug!("Reading artifact for snippet {} from {}", id, path.display());

    let text = match tokio::fs::read_to_string(&path).await {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(artifact_error(id, &path, "artifact file not found"));
        }
        Err(e) => return Err(artifact_error(id, &path, format!("failed to read: {e}"))),
    };

    parse(id, &path, &text)
}

/// Parse artifact JSON and check it against the expected shape.
pub fn parse(id: &SnippetId, path: &Path, text: &str) -> Result<Artifact> {
    let document: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| artifact_error(id, path, format!("invalid JSON: {e}")))?;

    serde_json::from_value(document)
        .map_err(|e| artifact_error(id, path, format!("unexpected artifact shape: {e}")))
}

fn artifact_error(id: &SnippetId, path: &Path, message: impl Into<String>) -> Error {
    Error::Artifact {
        id: id.clone(),
        path: path.to_path_buf(),
        message: message.into(),
    }
}
