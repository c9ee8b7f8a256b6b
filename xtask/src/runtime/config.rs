//! Typed configuration loading helpers.

use crate::runtime::error::{XtaskError, XtaskResult};
use serde::de::DeserializeOwned;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Generic TOML-backed config loader.
///
/// `ConfigLoader<T>` handles only filesystem access and TOML deserialization. Semantic
/// validation stays with the consumer (the utility CSS engine validates its own overrides).
///
/// ```rust
/// # use std::path::Path;
/// # use utility_css::PluginOptions;
/// # use xtask::runtime::config::ConfigLoader;
/// let loader = ConfigLoader::<PluginOptions>::new(Path::new("/workspace"), "utility-css.toml");
/// assert!(loader.path().ends_with("utility-css.toml"));
/// ```
#[derive(Clone, Debug)]
pub struct ConfigLoader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T> ConfigLoader<T>
where
    T: DeserializeOwned,
{
    /// Create a loader for the given workspace-relative path.
    ///
    /// Absolute paths are used unchanged.
    pub fn new(root: &Path, relative_path: impl AsRef<Path>) -> Self {
        Self {
            path: root.join(relative_path),
            _marker: PhantomData,
        }
    }

    /// Load and deserialize the configuration file.
    ///
    /// Missing files, unreadable files, and TOML parse failures are all surfaced as
    /// [`XtaskErrorCategory::Config`](crate::runtime::error::XtaskErrorCategory::Config).
    pub fn load(&self) -> XtaskResult<T> {
        let body = fs::read_to_string(&self.path).map_err(|err| {
            XtaskError::config(format!("failed to read {}: {err}", self.path.display()))
        })?;
        toml::from_str(&body).map_err(|err| {
            XtaskError::config(format!("failed to parse {}: {err}", self.path.display()))
        })
    }

    /// Load the file when it exists, or return `None`.
    ///
    /// Parse failures of an existing file are still errors.
    pub fn load_optional(&self) -> XtaskResult<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }
        self.load().map(Some)
    }

    /// Return the config path on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::error::XtaskErrorCategory;
    use std::time::{SystemTime, UNIX_EPOCH};
    use utility_css::PluginOptions;

    fn unique_test_root() -> PathBuf {
        std::env::temp_dir().join(format!(
            "xtask-config-test-{}",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("time")
                .as_nanos()
        ))
    }

    #[test]
    fn load_reads_plugin_options_from_workspace_relative_path() {
        let root = unique_test_root();
        let config_dir = root.join("tools");
        fs::create_dir_all(&config_dir).expect("create config dir");
        fs::write(
            config_dir.join("utility-css.toml"),
            "css_file_name = \"app.css\"\n\n[engine.shortcuts]\nbtn = \"px-4 py-2\"\n",
        )
        .expect("write config");

        let loader = ConfigLoader::<PluginOptions>::new(&root, "tools/utility-css.toml");
        let loaded = loader.load().expect("load config");
        assert_eq!(loaded.css_file_name, "app.css");
        assert!(loaded.inject_css);
        assert_eq!(loaded.engine.shortcuts["btn"], "px-4 py-2");

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn load_optional_returns_none_for_missing_file() {
        let root = unique_test_root();
        fs::create_dir_all(&root).expect("create temp root");

        let loader = ConfigLoader::<PluginOptions>::new(&root, "missing.toml");
        assert!(loader.load_optional().expect("optional load").is_none());

        let err = loader.load().expect_err("missing config should fail");
        assert_eq!(err.category, XtaskErrorCategory::Config);
        assert!(err.to_string().contains("missing.toml"));

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn load_reports_invalid_toml_as_config_error() {
        let root = unique_test_root();
        fs::create_dir_all(&root).expect("create temp root");
        fs::write(root.join("broken.toml"), "inject_css = [").expect("write broken config");

        let loader = ConfigLoader::<PluginOptions>::new(&root, "broken.toml");
        let err = loader.load_optional().expect_err("invalid config should fail");
        assert_eq!(err.category, XtaskErrorCategory::Config);
        assert!(err.to_string().contains("broken.toml"));

        let _ = fs::remove_dir_all(root);
    }
}
