//! Pipeline options.
//!
//! [`RawOptions`] is what callers hand in (from code, JSON/TOML or CLI flags);
//! [`PipelineConfig`] is the validated, defaulted form every other component
//! reads from.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Solidity compiler version used when none is given.
pub const DEFAULT_SOLC_VERSION: &str = "0.8.17";

/// External compiler executable used when none is given.
pub const DEFAULT_FORGE_EXECUTABLE: &str = "forge";

/// Directory name of the shared workspace under the system temp dir.
pub const DEFAULT_WORKSPACE_DIR_NAME: &str = "__inline-sol-forge-project__";

/// Upper bound on a single `forge build` when none is given.
pub const DEFAULT_BUILD_TIMEOUT: Duration = Duration::from_secs(600);

/// Unvalidated pipeline options.
///
/// Keys are camelCase when deserialized: `solc`, `forgeExecutable`,
/// `workspaceDir`, `buildTimeoutSecs`. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawOptions {
    /// Solidity compiler version, e.g. `0.8.17`.
    pub solc: Option<String>,
    /// Name or path of the forge executable.
    pub forge_executable: Option<String>,
    /// Workspace root; defaults to a fixed directory under the system temp dir.
    pub workspace_dir: Option<PathBuf>,
    /// Seconds to wait for one compiler run; `0` waits indefinitely.
    pub build_timeout_secs: Option<u64>,
}

impl RawOptions {
    /// Parse options from a JSON object.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn with_solc(mut self, version: impl Into<String>) -> Self {
        self.solc = Some(version.into());
        self
    }

    pub fn with_forge_executable(mut self, executable: impl Into<String>) -> Self {
        self.forge_executable = Some(executable.into());
        self
    }

    pub fn with_workspace_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workspace_dir = Some(dir.into());
        self
    }

    pub fn with_build_timeout_secs(mut self, secs: u64) -> Self {
        self.build_timeout_secs = Some(secs);
        self
    }
}

/// Validated pipeline configuration. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    compiler_version: String,
    executable_name: String,
    workspace_root: PathBuf,
    default_workspace: bool,
    build_timeout: Option<Duration>,
}

impl PipelineConfig {
    /// Validate and default raw options.
    pub fn resolve(raw: RawOptions) -> Result<Self> {
        let compiler_version = match raw.solc {
            Some(version) if is_solidity_version(&version) => version,
            Some(version) => {
                return Err(Error::Config(format!(
                    "`solc` must be a version like {DEFAULT_SOLC_VERSION}, got {version:?}"
                )));
            }
            None => DEFAULT_SOLC_VERSION.to_string(),
        };

        let executable_name = match raw.forge_executable {
            Some(name) if name.trim().is_empty() => {
                return Err(Error::Config("`forgeExecutable` must not be empty".to_string()));
            }
            Some(name) => name,
            None => DEFAULT_FORGE_EXECUTABLE.to_string(),
        };

        let default_workspace = raw.workspace_dir.is_none();
        let workspace_root = raw
            .workspace_dir
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_WORKSPACE_DIR_NAME));

        let build_timeout = match raw.build_timeout_secs {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => Some(DEFAULT_BUILD_TIMEOUT),
        };

        Ok(Self {
            compiler_version,
            executable_name,
            workspace_root,
            default_workspace,
            build_timeout,
        })
    }

    pub fn compiler_version(&self) -> &str {
        &self.compiler_version
    }

    pub fn executable_name(&self) -> &str {
        &self.executable_name
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Whether the workspace root is the fixed directory under the system temp dir.
    pub fn is_default_workspace(&self) -> bool {
        self.default_workspace
    }

    /// `None` means the compiler is awaited without a limit.
    pub fn build_timeout(&self) -> Option<Duration> {
        self.build_timeout
    }
}

/// Shorthand for [`PipelineConfig::resolve`].
pub fn resolve(raw: RawOptions) -> Result<PipelineConfig> {
    PipelineConfig::resolve(raw)
}

/// Whether `version` has the shape `MAJOR.MINOR.PATCH` (digits only).
fn is_solidity_version(version: &str) -> bool {
    let parts: Vec<&str> = version.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = resolve(RawOptions::default()).unwrap();

        assert_eq!(config.compiler_version(), "0.8.17");
        assert_eq!(config.executable_name(), "forge");
        assert!(config.workspace_root().ends_with(DEFAULT_WORKSPACE_DIR_NAME));
        assert!(config.is_default_workspace());
        assert_eq!(config.build_timeout(), Some(DEFAULT_BUILD_TIMEOUT));

        let custom = resolve(RawOptions::default().with_workspace_dir("/tmp/ws")).unwrap();
        assert!(!custom.is_default_workspace());
    }

    #[test]
    fn test_resolve_is_pure() {
        let raw = RawOptions::default()
            .with_solc("0.8.20")
            .with_forge_executable("/opt/foundry/bin/forge");

        let first = resolve(raw.clone()).unwrap();
        let second = resolve(raw).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.compiler_version(), "0.8.20");
        assert_eq!(first.executable_name(), "/opt/foundry/bin/forge");
    }

    #[test]
    fn test_malformed_versions() {
        for bad in ["8.17", "abc", "1.2", "1.2.3.4", "v0.8.17", "0.8.17 ", "0..17", ""] {
            let result = resolve(RawOptions::default().with_solc(bad));
            assert!(
                matches!(result, Err(Error::Config(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_empty_executable_rejected() {
        let result = resolve(RawOptions::default().with_forge_executable(" "));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_timeout() {
        let config = resolve(RawOptions::default().with_build_timeout_secs(0)).unwrap();
        assert_eq!(config.build_timeout(), None);

        let config = resolve(RawOptions::default().with_build_timeout_secs(5)).unwrap();
        assert_eq!(config.build_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_from_json() {
        let raw = RawOptions::from_json(r#"{"solc":"0.8.19","forgeExecutable":"forge-nightly"}"#)
            .unwrap();
        assert_eq!(raw.solc.as_deref(), Some("0.8.19"));
        assert_eq!(raw.forge_executable.as_deref(), Some("forge-nightly"));
        assert_eq!(raw.workspace_dir, None);

        let raw = RawOptions::from_json("{}").unwrap();
        assert_eq!(raw, RawOptions::default());
    }

    #[test]
    fn test_from_json_rejects_unknown_keys() {
        let result = RawOptions::from_json(r#"{"solcVersion":"0.8.19"}"#);
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
