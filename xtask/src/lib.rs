//! Workspace automation commands (`cargo xtask`).
//!
//! The crate is a small CLI layer over a shared runtime. Command modules own workflow-specific
//! policy while [`runtime`] owns configuration loading, artifact paths, logging setup, and
//! error reporting. `cargo xtask css` drives the utility CSS plugin the way a bundler would.

pub mod cli;
pub mod commands;
pub mod runtime;

use crate::cli::TopLevelCommand;
use crate::commands::css::CssCommand;
use crate::runtime::context::CommandContext;
use crate::runtime::error::{XtaskError, XtaskResult};

/// Shared command contract for top-level xtask command families.
///
/// Each family owns its own typed option parsing while sharing runtime services through
/// [`CommandContext`]. [`XtaskCommand::parse`] is a pure translation from raw CLI arguments into
/// typed options; side effects belong in [`XtaskCommand::run`].
pub trait XtaskCommand {
    /// Typed options produced by CLI parsing for the command family.
    type Options;

    /// Parse command-line arguments into typed options.
    ///
    /// Implementations should return [`XtaskError::validation`](crate::runtime::error::XtaskError::validation)
    /// for invalid user-facing argument shapes.
    fn parse(args: &[String]) -> XtaskResult<Self::Options>;

    /// Execute the command family using the shared runtime context.
    fn run(ctx: &CommandContext, options: Self::Options) -> XtaskResult<()>;
}

/// Executes the `xtask` binary using the current process arguments.
///
/// Parses the top-level command selection, creates a [`CommandContext`] rooted at the
/// workspace, and delegates to the owning command family.
pub fn execute_from_env() -> XtaskResult<()> {
    let parsed = cli::parse(std::env::args().skip(1).collect())?;

    match parsed {
        TopLevelCommand::Css(args) => {
            let options = CssCommand::parse(&args)?;
            CssCommand::run(&CommandContext::new()?, options)
        }
        TopLevelCommand::Help => {
            cli::print_usage();
            Ok(())
        }
    }
}

/// Converts an xtask result into a stable process exit code.
///
/// All command failures map to exit code `1` after printing the formatted [`XtaskError`] to
/// stderr.
pub fn exit_code(result: XtaskResult<()>) -> std::process::ExitCode {
    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::ExitCode::from(1)
        }
    }
}

impl From<String> for XtaskError {
    fn from(value: String) -> Self {
        XtaskError::validation(value)
    }
}
