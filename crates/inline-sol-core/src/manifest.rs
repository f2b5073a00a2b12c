//! Foundry manifest generation.
//!
//! Produces the `foundry.toml` written at the root of the build workspace.

/// Manifest file name expected by forge.
pub const MANIFEST_FILE_NAME: &str = "foundry.toml";

/// Project name written into every generated manifest.
pub const PROJECT_NAME: &str = "inline-sol-forge-project";

/// Configuration for generating a Foundry manifest.
#[derive(Debug, Clone)]
pub struct ManifestConfig<'a> {
    /// Project name.
    pub name: &'a str,
    /// Source directory, relative to the project root.
    pub src: &'a str,
    /// Artifact directory, relative to the project root.
    pub out: &'a str,
    /// Solidity compiler version.
    pub solc: &'a str,
}

impl<'a> Default for ManifestConfig<'a> {
    fn default() -> Self {
        Self {
            name: PROJECT_NAME,
            src: "src",
            out: "dist",
            solc: crate::options::DEFAULT_SOLC_VERSION,
        }
    }
}

/// Generate a `foundry.toml` manifest.
pub fn generate_foundry_toml(config: &ManifestConfig<'_>) -> String {
    let mut toml = String::new();

    toml.push_str("[project]\n");
    toml.push_str(&format!("name = \"{}\"\n", config.name));
    toml.push_str(&format!("src = \"{}\"\n", config.src));
    toml.push_str(&format!("out = \"{}\"\n", config.out));
    toml.push_str(&format!("solc = \"{}\"\n", config.solc));

    toml
}

/// Whether `toml` is a manifest this crate generated.
pub fn is_generated_manifest(toml: &str) -> bool {
    let name = format!("name = \"{PROJECT_NAME}\"");
    toml.starts_with("[project]\n") && toml.lines().any(|line| line.trim() == name)
}
