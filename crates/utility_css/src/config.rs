//! Plugin options.

use serde::Deserialize;

use crate::engine::EngineConfig;
use crate::extract::DEFAULT_EXTENSIONS;

/// Stylesheet file name used when none is configured.
pub const DEFAULT_CSS_FILE_NAME: &str = "utility.css";

/// Options accepted by [`crate::UtilityCssPlugin`].
///
/// Every field is optional when deserializing. The camel-case names used by JavaScript build
/// configs (`unocssConfig`, `cssFileName`, `injectCSS`) are accepted as aliases.
///
/// ```toml
/// css_file_name = "app.css"
/// inject_css = false
///
/// [engine.shortcuts]
/// btn = "px-4 py-2 rounded"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PluginOptions {
    /// Engine overrides merged over the base preset.
    #[serde(alias = "unocssConfig")]
    pub engine: EngineConfig,
    /// Output file name of the generated stylesheet.
    #[serde(alias = "cssFileName")]
    pub css_file_name: String,
    /// Whether to prepend an import of the stylesheet to the entry chunk.
    #[serde(alias = "injectCSS")]
    pub inject_css: bool,
    /// File extensions eligible for scanning.
    pub extensions: Vec<String>,
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            css_file_name: DEFAULT_CSS_FILE_NAME.to_string(),
            inject_css: true,
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
        }
    }
}
