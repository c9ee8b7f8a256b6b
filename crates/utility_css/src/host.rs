//! Build-host contract used by the plugin lifecycle, plus baseline adapters.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::bundle::OutputAsset;

/// Severity of a message routed through a [`BuildContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    /// Per-file progress.
    Debug,
    /// Lifecycle milestones.
    Info,
    /// Non-fatal skips.
    Warn,
    /// Fatal failures.
    Error,
}

/// One message recorded by [`MemoryBuildContext`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Severity.
    pub level: LogLevel,
    /// Message text.
    pub message: String,
}

/// Host services available to the plugin during a build.
///
/// Transforms may run on several threads at once, so implementations must be thread-safe.
pub trait BuildContext: Send + Sync {
    /// Registers an asset with the build output.
    fn emit_file(&self, asset: OutputAsset);

    /// Logs a lifecycle milestone.
    fn info(&self, message: &str);

    /// Logs a non-fatal condition.
    fn warn(&self, message: &str);

    /// Logs per-file progress.
    fn debug(&self, message: &str);

    /// Reports a fatal failure. The plugin also returns the failure as an error value.
    fn error(&self, message: &str);
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op build context that drops emitted files and messages.
pub struct NoopBuildContext;

impl BuildContext for NoopBuildContext {
    fn emit_file(&self, _asset: OutputAsset) {}

    fn info(&self, _message: &str) {}

    fn warn(&self, _message: &str) {}

    fn debug(&self, _message: &str) {}

    fn error(&self, _message: &str) {}
}

#[derive(Debug, Default)]
struct MemoryState {
    emitted: Vec<OutputAsset>,
    logs: Vec<LogRecord>,
}

#[derive(Debug, Clone, Default)]
/// In-memory build context that records emitted assets and messages and forwards messages to
/// `tracing`.
pub struct MemoryBuildContext {
    inner: Arc<Mutex<MemoryState>>,
}

impl MemoryBuildContext {
    /// Assets emitted so far, in emission order.
    pub fn emitted(&self) -> Vec<OutputAsset> {
        self.state().emitted.clone()
    }

    /// Removes and returns the emitted assets.
    pub fn take_emitted(&self) -> Vec<OutputAsset> {
        std::mem::take(&mut self.state().emitted)
    }

    /// Every recorded message.
    pub fn logs(&self) -> Vec<LogRecord> {
        self.state().logs.clone()
    }

    /// Recorded message texts at exactly `level`.
    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.state()
            .logs
            .iter()
            .filter(|record| record.level == level)
            .map(|record| record.message.clone())
            .collect()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => tracing::debug!(target: "utility_css", "{message}"),
            LogLevel::Info => tracing::info!(target: "utility_css", "{message}"),
            LogLevel::Warn => tracing::warn!(target: "utility_css", "{message}"),
            LogLevel::Error => tracing::error!(target: "utility_css", "{message}"),
        }
        self.state().logs.push(LogRecord {
            level,
            message: message.to_string(),
        });
    }
}

impl BuildContext for MemoryBuildContext {
    fn emit_file(&self, asset: OutputAsset) {
        tracing::debug!(
            target: "utility_css",
            file_name = asset.file_name.as_str(),
            bytes = asset.source.len(),
            "asset emitted"
        );
        self.state().emitted.push(asset);
    }

    fn info(&self, message: &str) {
        self.record(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.record(LogLevel::Warn, message);
    }

    fn debug(&self, message: &str) {
        self.record(LogLevel::Debug, message);
    }

    fn error(&self, message: &str) {
        self.record(LogLevel::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn memory_context_records_assets_and_messages_in_order() {
        let ctx = MemoryBuildContext::default();
        let ctx_obj: &dyn BuildContext = &ctx;

        ctx_obj.info("started");
        ctx_obj.emit_file(OutputAsset::new("a.css", ".a{}"));
        ctx_obj.warn("careful");
        ctx_obj.debug("detail");

        assert_eq!(ctx.emitted(), vec![OutputAsset::new("a.css", ".a{}")]);
        assert_eq!(ctx.messages(LogLevel::Warn), vec!["careful".to_string()]);
        assert_eq!(
            ctx.logs()
                .into_iter()
                .map(|record| record.level)
                .collect::<Vec<_>>(),
            vec![LogLevel::Info, LogLevel::Warn, LogLevel::Debug]
        );

        assert_eq!(ctx.take_emitted().len(), 1);
        assert!(ctx.emitted().is_empty());
    }

    #[test]
    fn clones_share_state() {
        let ctx = MemoryBuildContext::default();
        ctx.clone().error("boom");
        assert_eq!(ctx.messages(LogLevel::Error), vec!["boom".to_string()]);
    }

    #[test]
    fn noop_context_accepts_everything() {
        let ctx = NoopBuildContext;
        ctx.emit_file(OutputAsset::new("x.css", ""));
        ctx.error("ignored");
    }
}
