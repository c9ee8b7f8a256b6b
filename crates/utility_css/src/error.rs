//! Error types for engine configuration, generation, and the build plugin.

use thiserror::Error;

/// Failures raised by the atomic CSS engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A configured theme colour is not a recognizable CSS colour.
    #[error("theme colour `{name}` has invalid value `{value}`")]
    InvalidColor {
        /// Colour reference, including the shade when the value came from a scale.
        name: String,
        /// Rejected value.
        value: String,
    },
    /// A configured breakpoint is not a `px`, `rem` or `em` length.
    #[error("breakpoint `{name}` has invalid width `{value}`")]
    InvalidBreakpoint {
        /// Breakpoint name.
        name: String,
        /// Rejected width.
        value: String,
    },
    /// A shortcut expands to nothing.
    #[error("shortcut `{name}` expands to no utilities")]
    EmptyShortcut {
        /// Shortcut name.
        name: String,
    },
    /// A custom rule has no declarations or an empty property.
    #[error("custom rule `{name}` is invalid: {reason}")]
    InvalidRule {
        /// Rule class name.
        name: String,
        /// What is wrong with it.
        reason: String,
    },
    /// Shortcut expansion revisited a shortcut already being expanded.
    #[error("shortcut cycle detected: {}", chain.join(" -> "))]
    ShortcutCycle {
        /// Expansion chain ending in the repeated shortcut.
        chain: Vec<String>,
    },
}

/// Failures surfaced by the build plugin to its host.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PluginError {
    /// Engine initialization rejected the merged configuration.
    #[error("invalid utility CSS configuration: {0}")]
    Config(#[source] EngineError),
    /// Stylesheet generation failed; the build should treat this as fatal.
    #[error("failed to generate CSS - {0}")]
    Generate(#[source] EngineError),
}
