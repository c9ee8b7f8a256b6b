//! Artifact path management for xtask workflows.

use crate::runtime::error::{XtaskError, XtaskResult};
use std::fs;
use std::path::{Path, PathBuf};

const UTILITY_CSS_OUT_DIR: &str = ".artifacts/utility-css";
const UTILITY_CSS_REPORT: &str = "utility-css-report.json";

/// Central artifact path policy for xtask.
///
/// Keeps workspace-relative output locations consistent. Commands should use it instead of
/// hard-coding joins from `ctx.root()`.
#[derive(Clone, Debug)]
pub struct ArtifactManager {
    root: PathBuf,
}

impl ArtifactManager {
    /// Create an artifact manager rooted at the workspace.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Return the workspace root path used for resolution.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a workspace-relative artifact path.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Resolve a possibly-relative workspace path.
    ///
    /// Absolute paths are preserved, while relative paths are anchored to the workspace root.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Default output directory of `cargo xtask css build`.
    pub fn utility_css_out_dir(&self) -> PathBuf {
        self.path(UTILITY_CSS_OUT_DIR)
    }

    /// Build report location inside an output directory.
    pub fn utility_css_report(&self, out_dir: &Path) -> PathBuf {
        out_dir.join(UTILITY_CSS_REPORT)
    }

    /// Ensure a directory exists.
    ///
    /// Idempotent; succeeds when the directory already exists.
    pub fn ensure_dir(&self, path: &Path) -> XtaskResult<()> {
        fs::create_dir_all(path)
            .map_err(|err| XtaskError::io(format!("failed to create {}: {err}", path.display())))
    }

    /// Write a text artifact, creating parent directories as needed.
    pub fn write_text(&self, path: &Path, body: &str) -> XtaskResult<()> {
        if let Some(parent) = path.parent() {
            self.ensure_dir(parent)?;
        }
        fs::write(path, body).map_err(|err| {
            XtaskError::io(format!("failed to write {}: {err}", path.display())).with_path(path)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_root() -> PathBuf {
        std::env::temp_dir().join(format!(
            "xtask-artifacts-test-{}",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("time")
                .as_nanos()
        ))
    }

    #[test]
    fn artifact_paths_are_root_relative() {
        let root = PathBuf::from("/tmp/xtask-artifacts-root");
        let manager = ArtifactManager::new(root.clone());
        assert_eq!(
            manager.utility_css_out_dir(),
            root.join(".artifacts/utility-css")
        );
        assert_eq!(
            manager.utility_css_report(Path::new("/tmp/out")),
            PathBuf::from("/tmp/out/utility-css-report.json")
        );
    }

    #[test]
    fn write_text_creates_missing_parents() {
        let root = unique_temp_root();
        let manager = ArtifactManager::new(root.clone());
        let target = root.join("nested/output/utility.css");
        manager.write_text(&target, ".flex{}").expect("write artifact");
        assert_eq!(fs::read_to_string(&target).expect("read back"), ".flex{}");
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn resolve_path_keeps_absolute_and_expands_relative() {
        let root = PathBuf::from("/tmp/xtask-artifacts-root");
        let manager = ArtifactManager::new(root.clone());
        assert_eq!(
            manager.resolve_path(Path::new("src/components")),
            root.join("src/components")
        );
        assert_eq!(
            manager.resolve_path(Path::new("/tmp/already-absolute")),
            PathBuf::from("/tmp/already-absolute")
        );
    }
}
