//! Structured xtask error types.

use std::fmt::{self, Display, Formatter};
use std::path::Path;

/// Stable error categories for xtask workflows.
///
/// Categories stay coarse so failures read the same way across commands.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum XtaskErrorCategory {
    /// Invalid or unreadable configuration.
    Config,
    /// Missing local prerequisites, such as a workspace root.
    Environment,
    /// Invalid user input or semantically invalid workflow request.
    Validation,
    /// Filesystem or general I/O failure.
    Io,
    /// The utility CSS build pass failed.
    Build,
}

/// Structured xtask error with contextual metadata.
///
/// The formatted display output is CLI-friendly. Optional `operation`, `target`, and `hint`
/// fields can be attached as the error propagates so failures remain actionable at the point
/// they are shown to the user.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct XtaskError {
    /// High-level error category.
    pub category: XtaskErrorCategory,
    /// Human-readable message.
    pub message: String,
    /// Optional operation name.
    pub operation: Option<String>,
    /// Optional path target.
    pub target: Option<String>,
    /// Optional remediation hint.
    pub hint: Option<String>,
}

/// Convenience result type for xtask internals.
pub type XtaskResult<T> = Result<T, XtaskError>;

impl XtaskError {
    /// Create an error with the given category and message.
    pub fn new(category: XtaskErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            operation: None,
            target: None,
            hint: None,
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(XtaskErrorCategory::Config, message)
    }

    /// Create an environment error.
    pub fn environment(message: impl Into<String>) -> Self {
        Self::new(XtaskErrorCategory::Environment, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(XtaskErrorCategory::Validation, message)
    }

    /// Create an IO error.
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(XtaskErrorCategory::Io, message)
    }

    /// Create a build-pass error.
    pub fn build(message: impl Into<String>) -> Self {
        Self::new(XtaskErrorCategory::Build, message)
    }

    /// Attach an operation label.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Attach a target path.
    pub fn with_path(mut self, path: &Path) -> Self {
        self.target = Some(path.display().to_string());
        self
    }

    /// Attach a remediation hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl Display for XtaskError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(operation) = &self.operation {
            write!(f, " [operation: {operation}]")?;
        }
        if let Some(target) = &self.target {
            write!(f, " [target: {target}]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " [hint: {hint}]")?;
        }
        Ok(())
    }
}

impl std::error::Error for XtaskError {}

impl From<std::io::Error> for XtaskError {
    fn from(value: std::io::Error) -> Self {
        XtaskError::io(value.to_string())
    }
}

impl From<utility_css::PluginError> for XtaskError {
    fn from(value: utility_css::PluginError) -> Self {
        match value {
            utility_css::PluginError::Config(_) => XtaskError::config(value.to_string()),
            utility_css::PluginError::Generate(_) => XtaskError::build(value.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use utility_css::{EngineError, PluginError};

    #[test]
    fn display_appends_context_fields_in_order() {
        let err = XtaskError::io("failed to write report")
            .with_operation("cargo xtask css build")
            .with_path(Path::new("/tmp/out"))
            .with_hint("check permissions");
        assert_eq!(
            err.to_string(),
            "failed to write report [operation: cargo xtask css build] [target: /tmp/out] [hint: check permissions]"
        );
    }

    #[test]
    fn plugin_errors_map_to_config_and_build_categories() {
        let config = XtaskError::from(PluginError::Config(EngineError::EmptyShortcut {
            name: "btn".into(),
        }));
        assert_eq!(config.category, XtaskErrorCategory::Config);

        let build = XtaskError::from(PluginError::Generate(EngineError::ShortcutCycle {
            chain: vec!["a".into(), "a".into()],
        }));
        assert_eq!(build.category, XtaskErrorCategory::Build);
        assert!(build.message.starts_with("failed to generate CSS - "));
    }
}
