//! Build workspace management.
//!
//! One throwaway forge project is shared by every snippet of a run:
//!
//! ```text
//! __inline-sol-forge-project__/
//! ├── foundry.toml             # manifest, embeds the solc version
//! ├── src/                     # staged snippets (<id>.sol)
//! └── dist/                    # forge output (<id>.sol/<id>.json)
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::{Error, Result};
use crate::manifest::{
    MANIFEST_FILE_NAME, ManifestConfig, generate_foundry_toml, is_generated_manifest,
};
use crate::options::PipelineConfig;
use crate::snippet::SnippetId;

const SOURCE_DIR: &str = "src";
const OUTPUT_DIR: &str = "dist";

/// Directory layout of a build workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    /// Root of the forge project.
    pub root: PathBuf,

    /// `foundry.toml` path.
    pub manifest_path: PathBuf,

    /// Directory holding staged snippet sources.
    pub source_dir: PathBuf,

    /// Directory forge writes artifacts into.
    pub output_dir: PathBuf,
}

impl Workspace {
    /// Compute the layout rooted at `root` without touching the filesystem.
    pub fn layout(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            manifest_path: root.join(MANIFEST_FILE_NAME),
            source_dir: root.join(SOURCE_DIR),
            output_dir: root.join(OUTPUT_DIR),
        }
    }

    /// Create a fresh workspace at the configured root.
    ///
    /// Anything already at the default root is removed first, so no file from
    /// a previous run survives. A caller-chosen root is only replaced when it
    /// is empty or holds an earlier workspace; any other existing path is a
    /// workspace error and is left untouched.
    pub async fn create(config: &PipelineConfig) -> Result<Self> {
        let workspace = Self::layout(config.workspace_root());

        if config.is_default_workspace() {
            remove_existing(&workspace.root).await?;
        } else {
            remove_previous_workspace(&workspace).await?;
        }

        // The manifest is written before src/; `remove_previous_workspace` keys on it.
        fs::create_dir_all(&workspace.root)
            .await
            .map_err(|e| Error::workspace(&workspace.root, e))?;

        let manifest = generate_foundry_toml(&ManifestConfig {
            solc: config.compiler_version(),
            src: SOURCE_DIR,
            out: OUTPUT_DIR,
            ..Default::default()
        });
        fs::write(&workspace.manifest_path, manifest)
            .await
            .map_err(|e| Error::workspace(&workspace.manifest_path, e))?;

        fs::create_dir_all(&workspace.source_dir)
            .await
            .map_err(|e| Error::workspace(&workspace.source_dir, e))?;

        tracing::info!("Created build workspace at {}", workspace.root.display());
        Ok(workspace)
    }

    /// Recursively remove the workspace. Removing a missing workspace is not an error.
    pub async fn destroy(&self) -> Result<()> {
        match fs::remove_dir_all(&self.root).await {
            Ok(()) => {
                tracing::info!("Removed build workspace at {}", self.root.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::workspace(&self.root, e)),
        }
    }

    /// Whether the root holds a `foundry.toml` written by [`Workspace::create`].
    pub async fn has_generated_manifest(&self) -> bool {
        match fs::read_to_string(&self.manifest_path).await {
            Ok(manifest) => is_generated_manifest(&manifest),
            Err(_) => false,
        }
    }

    /// Where a snippet's source is staged.
    pub fn source_path(&self, id: &SnippetId) -> PathBuf {
        self.source_dir.join(id.source_file_name())
    }

    /// Where forge writes a snippet's artifact.
    ///
    /// Forge nests artifacts under a directory named after the source file.
    pub fn artifact_path(&self, id: &SnippetId) -> PathBuf {
        self.output_dir
            .join(id.source_file_name())
            .join(id.artifact_file_name())
    }
}

async fn remove_existing(root: &Path) -> Result<()> {
    let metadata = match fs::symlink_metadata(root).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(Error::workspace(root, e)),
    };

    tracing::debug!("Removing stale workspace at {}", root.display());

    let removed = if metadata.is_dir() {
        fs::remove_dir_all(root).await
    } else {
        fs::remove_file(root).await
    };
    removed.map_err(|e| Error::workspace(root, e))
}

async fn remove_previous_workspace(workspace: &Workspace) -> Result<()> {
    let root = &workspace.root;
    let metadata = match fs::symlink_metadata(root).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(Error::workspace(root, e)),
    };

    if !metadata.is_dir() {
        return Err(Error::workspace(
            root,
            "path exists and is not a directory; refusing to replace it",
        ));
    }

    let mut entries = fs::read_dir(root)
        .await
        .map_err(|e| Error::workspace(root, e))?;
    let is_empty = entries
        .next_entry()
        .await
        .map_err(|e| Error::workspace(root, e))?
        .is_none();

    if !is_empty && !workspace.has_generated_manifest().await {
        return Err(Error::workspace(
            root,
            "directory is not an inline-sol workspace; refusing to replace it",
        ));
    }

    remove_existing(root).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::RawOptions;
    use tempfile::TempDir;

    fn config_in(temp: &TempDir) -> PipelineConfig {
        PipelineConfig::resolve(
            RawOptions::default()
                .with_solc("0.8.21")
                .with_workspace_dir(temp.path().join("project")),
        )
        .expect("valid options")
    }

    #[tokio::test]
    async fn test_create_layout() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let workspace = Workspace::create(&config_in(&temp)).await.unwrap();

        assert!(workspace.source_dir.is_dir());
        assert!(!workspace.output_dir.exists());

        let manifest = std::fs::read_to_string(&workspace.manifest_path).unwrap();
        assert!(manifest.contains("solc = \"0.8.21\""));
        assert!(manifest.contains("src = \"src\""));
        assert!(manifest.contains("out = \"dist\""));
    }

    #[tokio::test]
    async fn test_create_over_stale_workspace() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let config = config_in(&temp);

        let stale = Workspace::layout(config.workspace_root());
        std::fs::create_dir_all(stale.output_dir.join("old.sol")).unwrap();
        std::fs::create_dir_all(&stale.source_dir).unwrap();
        std::fs::write(
            &stale.manifest_path,
            generate_foundry_toml(&ManifestConfig::default()),
        )
        .unwrap();
        std::fs::write(stale.source_dir.join("old.sol"), "contract Old {}").unwrap();
        std::fs::write(stale.root.join("leftover.txt"), "stale").unwrap();

        let workspace = Workspace::create(&config).await.unwrap();

        let sources: Vec<_> = std::fs::read_dir(&workspace.source_dir).unwrap().collect();
        assert!(sources.is_empty());
        assert!(!workspace.output_dir.exists());
        assert!(!workspace.root.join("leftover.txt").exists());
    }

    #[tokio::test]
    async fn test_create_in_empty_directory() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let config = config_in(&temp);
        std::fs::create_dir_all(config.workspace_root()).unwrap();

        let workspace = Workspace::create(&config).await.unwrap();
        assert!(workspace.source_dir.is_dir());
    }

    #[tokio::test]
    async fn test_unrelated_directory_left_untouched() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let config = config_in(&temp);
        let root = config.workspace_root();
        std::fs::create_dir_all(root.join("src")).unwrap();
        std::fs::write(root.join("Cargo.toml"), "[package]\nname = \"app\"\n").unwrap();
        std::fs::write(root.join("src/main.rs"), "fn main() {}").unwrap();

        let err = Workspace::create(&config).await.unwrap_err();

        assert!(matches!(err, Error::Workspace { .. }));
        assert!(err.to_string().contains("not an inline-sol workspace"));
        assert!(root.join("Cargo.toml").is_file());
        assert!(root.join("src/main.rs").is_file());
    }

    #[tokio::test]
    async fn test_foreign_manifest_left_untouched() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let config = config_in(&temp);
        let root = config.workspace_root();
        std::fs::create_dir_all(root).unwrap();
        std::fs::write(
            root.join(MANIFEST_FILE_NAME),
            "[profile.default]\nsrc = \"contracts\"\n",
        )
        .unwrap();

        assert!(Workspace::create(&config).await.is_err());
        assert!(root.join(MANIFEST_FILE_NAME).is_file());
    }

    #[tokio::test]
    async fn test_existing_file_left_untouched() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let config = config_in(&temp);
        std::fs::write(config.workspace_root(), "not a directory").unwrap();

        let err = Workspace::create(&config).await.unwrap_err();

        assert!(matches!(err, Error::Workspace { .. }));
        assert_eq!(
            std::fs::read_to_string(config.workspace_root()).unwrap(),
            "not a directory"
        );
    }

    #[tokio::test]
    async fn test_destroy_is_idempotent() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let workspace = Workspace::create(&config_in(&temp)).await.unwrap();

        workspace.destroy().await.unwrap();
        assert!(!workspace.root.exists());

        workspace.destroy().await.unwrap();
    }

    #[test]
    fn test_paths() {
        let workspace = Workspace::layout(Path::new("/tmp/ws"));
        let id = SnippetId::identify("contract C {}");

        assert_eq!(
            workspace.source_path(&id),
            PathBuf::from("/tmp/ws/src/SolSnippet_51feb570.sol")
        );
        assert_eq!(
            workspace.artifact_path(&id),
            PathBuf::from("/tmp/ws/dist/SolSnippet_51feb570.sol/SolSnippet_51feb570.json")
        );
    }
}
