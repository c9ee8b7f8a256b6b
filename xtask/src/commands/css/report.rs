//! JSON report written next to the build outputs.

use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use utility_css::{BuildOutcome, LogLevel, MemoryBuildContext, SkipReason};

use crate::runtime::context::CommandContext;
use crate::runtime::error::{XtaskError, XtaskResult};

use super::sources::SourceScan;

/// Machine-readable summary of one `cargo xtask css build` run.
#[derive(Clone, Debug, Serialize)]
pub(super) struct CssBuildReport {
    pub generated_at: String,
    pub source_dir: String,
    pub status: &'static str,
    pub files_seen: usize,
    pub files_transformed: usize,
    pub files_unreadable: usize,
    pub token_count: usize,
    pub matched_count: usize,
    pub css_file: Option<String>,
    pub css_bytes: usize,
    pub injected_into: Option<String>,
    pub unmatched: Vec<String>,
    pub warnings: Vec<String>,
}

impl CssBuildReport {
    pub fn new(
        source_dir: &Path,
        scan: &SourceScan,
        token_count: usize,
        outcome: &BuildOutcome,
        build_ctx: &MemoryBuildContext,
    ) -> Self {
        let mut report = Self {
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            source_dir: source_dir.display().to_string(),
            status: status_label(outcome),
            files_seen: scan.files_seen,
            files_transformed: scan.files_transformed,
            files_unreadable: scan.files_unreadable,
            token_count,
            matched_count: 0,
            css_file: None,
            css_bytes: 0,
            injected_into: None,
            unmatched: Vec::new(),
            warnings: build_ctx.messages(LogLevel::Warn),
        };
        if let BuildOutcome::Emitted(summary) = outcome {
            report.matched_count = summary.matched_count;
            report.css_file = Some(summary.css_file_name.clone());
            report.css_bytes = summary.bytes;
            report.injected_into = summary.injected_into.clone();
            report.unmatched = summary.unmatched.clone();
        }
        report
    }

    pub fn write(&self, ctx: &CommandContext, path: &Path) -> XtaskResult<()> {
        let body = serde_json::to_string_pretty(self).map_err(|err| {
            XtaskError::io(format!("failed to serialize utility CSS report: {err}"))
        })?;
        ctx.artifacts().write_text(path, &format!("{body}\n"))
    }
}

fn status_label(outcome: &BuildOutcome) -> &'static str {
    match outcome {
        BuildOutcome::Emitted(_) => "emitted",
        BuildOutcome::Skipped(SkipReason::NoTokens) => "skipped-no-tokens",
        BuildOutcome::Skipped(SkipReason::EmptyCss) => "skipped-empty-css",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use utility_css::EmitSummary;

    #[test]
    fn emitted_outcome_fills_stylesheet_fields() {
        let outcome = BuildOutcome::Emitted(EmitSummary {
            css_file_name: "app.css".into(),
            bytes: 120,
            token_count: 4,
            matched_count: 3,
            unmatched: vec!["layouts".into()],
            injected_into: Some("main.js".into()),
        });
        let scan = SourceScan {
            files_seen: 5,
            files_transformed: 4,
            files_unreadable: 0,
        };
        let report = CssBuildReport::new(
            Path::new("/work/src"),
            &scan,
            4,
            &outcome,
            &MemoryBuildContext::default(),
        );

        assert_eq!(report.status, "emitted");
        assert_eq!(report.css_file.as_deref(), Some("app.css"));
        assert_eq!(report.css_bytes, 120);
        assert_eq!(report.unmatched, vec!["layouts".to_string()]);

        let value = serde_json::to_value(&report).expect("serialize");
        assert_eq!(value["injected_into"], "main.js");
        assert_eq!(value["files_transformed"], 4);
    }

    #[test]
    fn skipped_outcomes_have_distinct_labels() {
        assert_eq!(
            status_label(&BuildOutcome::Skipped(SkipReason::NoTokens)),
            "skipped-no-tokens"
        );
        assert_eq!(
            status_label(&BuildOutcome::Skipped(SkipReason::EmptyCss)),
            "skipped-empty-css"
        );
    }
}
