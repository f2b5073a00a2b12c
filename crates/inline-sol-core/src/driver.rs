//! Per-run orchestration.
//!
//! A [`TransformDriver`] lives for exactly one run. It starts creating the
//! workspace as soon as it is constructed, compiles snippets against that one
//! workspace, and removes it in [`TransformDriver::finish`].

use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};

use crate::artifact::{self, Artifact};
use crate::error::{Error, Result};
use crate::invoker::BuildInvoker;
use crate::options::PipelineConfig;
use crate::snippet::{Snippet, SnippetId};
use crate::workspace::Workspace;

type PendingWorkspace = Shared<BoxFuture<'static, Result<Arc<Workspace>>>>;

/// Artifact produced for one snippet.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSnippet {
    pub id: SnippetId,
    pub artifact: Artifact,
}

/// Compiles the snippets of a single run.
pub struct TransformDriver {
    config: PipelineConfig,

    invoker: BuildInvoker,

    /// Workspace creation, shared by every snippet handler of the run.
    workspace: PendingWorkspace,
}

impl TransformDriver {
    /// Start a run.
    ///
    /// Workspace creation is spawned immediately, so this must be called from
    /// within a Tokio runtime.
    pub fn start(config: PipelineConfig) -> Self {
        let creation = {
            let config = config.clone();
            tokio::spawn(async move { Workspace::create(&config).await.map(Arc::new) })
        };

        let root = config.workspace_root().to_path_buf();
        let workspace = async move {
            match creation.await {
                Ok(created) => created,
                Err(e) => Err(Error::workspace(root, format!("workspace setup task failed: {e}"))),
            }
        }
        .boxed()
        .shared();

        Self {
            invoker: BuildInvoker::new(&config),
            config,
            workspace,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Wait until the run's workspace exists.
    pub async fn workspace(&self) -> Result<Arc<Workspace>> {
        self.workspace.clone().await
    }

    /// Compile one snippet: stage, build, read.
    ///
    /// Empty text is rejected before the workspace is even awaited.
    pub async fn compile(&self, raw_text: &str) -> Result<CompiledSnippet> {
        let snippet = Snippet::new(raw_text)?;
        let workspace = self.workspace().await?;

        self.invoker.build(&workspace, &snippet).await?;
        let artifact = artifact::read(&workspace, snippet.id()).await?;

        tracing::debug!(
            "Snippet {} compiled: {} ABI entries, {} bytecode chars",
            snippet.id(),
            artifact.abi.len(),
            artifact.bytecode.object.len()
        );

        Ok(CompiledSnippet {
            id: snippet.id().clone(),
            artifact,
        })
    }

    /// End the run by removing the workspace.
    ///
    /// Waits for workspace creation first so teardown never races it. After a
    /// failed creation the default root is removed whatever it holds, while a
    /// caller-chosen root is only removed if it carries a generated manifest.
    pub async fn finish(self) -> Result<()> {
        let error = match self.workspace.await {
            Ok(workspace) => return workspace.destroy().await,
            Err(e) => e,
        };

        let layout = Workspace::layout(self.config.workspace_root());
        if self.config.is_default_workspace() || layout.has_generated_manifest().await {
            tracing::debug!("Tearing down after failed workspace setup: {}", error);
            layout.destroy().await
        } else {
            tracing::debug!(
                "Leaving {} in place after failed workspace setup: {}",
                layout.root.display(),
                error
            );
            Ok(())
        }
    }
}
