//! Shared command context passed into command families.

use crate::runtime::artifacts::ArtifactManager;
use crate::runtime::error::{XtaskError, XtaskResult};
use std::path::{Path, PathBuf};

/// Shared execution context for xtask command families.
#[derive(Clone, Debug)]
pub struct CommandContext {
    root: PathBuf,
    artifacts: ArtifactManager,
}

impl CommandContext {
    /// Create a new command context rooted at the current workspace.
    pub fn new() -> XtaskResult<Self> {
        Ok(Self::at(workspace_root()?))
    }

    /// Create a context rooted at an explicit directory.
    pub fn at(root: PathBuf) -> Self {
        let artifacts = ArtifactManager::new(root.clone());
        Self { root, artifacts }
    }

    /// Workspace root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Shared artifact manager.
    pub fn artifacts(&self) -> &ArtifactManager {
        &self.artifacts
    }
}

fn workspace_root() -> XtaskResult<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| XtaskError::environment("xtask lives under workspace root"))
}
