//! Utility stylesheet workflows.
//!
//! `cargo xtask css build` plays the host build system for the utility CSS plugin: it walks a
//! source tree, runs the transform hook over every file in parallel, hands an optional entry
//! chunk to bundle generation, and writes the outputs plus a JSON report.

mod report;
mod sources;

use std::path::{Path, PathBuf};

use tracing::info;
use utility_css::{
    BuildOutcome, MemoryBuildContext, OutputBundle, OutputChunk, PluginOptions, UtilityCssPlugin,
};

use crate::runtime::config::ConfigLoader;
use crate::runtime::context::CommandContext;
use crate::runtime::error::{XtaskError, XtaskResult};
use crate::XtaskCommand;

use self::report::CssBuildReport;
use self::sources::{collect_files, scan_files, SourceScan};

const DEFAULT_SOURCE_DIR: &str = "src";
const DEFAULT_CONFIG_FILE: &str = "utility-css.toml";
const BUILD_OPERATION: &str = "cargo xtask css build";

/// `cargo xtask css ...`
pub struct CssCommand;

/// Paths accepted by `build` and `scan`. Relative paths resolve against the workspace root.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CssArgs {
    /// Source directory to walk (default `src`).
    pub src: Option<PathBuf>,
    /// Output directory (default `.artifacts/utility-css`).
    pub out: Option<PathBuf>,
    /// Plugin options file (default `utility-css.toml`, optional).
    pub config: Option<PathBuf>,
    /// File whose code becomes the entry chunk.
    pub entry: Option<PathBuf>,
}

/// Supported `cargo xtask css` subcommands.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CssOptions {
    Build(CssArgs),
    Scan(CssArgs),
    Help,
}

impl XtaskCommand for CssCommand {
    type Options = CssOptions;

    fn parse(args: &[String]) -> XtaskResult<Self::Options> {
        parse_css_options(args)
    }

    fn run(ctx: &CommandContext, options: Self::Options) -> XtaskResult<()> {
        match options {
            CssOptions::Build(args) => css_build(ctx, &args).map(|_| ()),
            CssOptions::Scan(args) => css_scan(ctx, &args),
            CssOptions::Help => {
                print_css_usage();
                Ok(())
            }
        }
    }
}

fn parse_css_options(args: &[String]) -> XtaskResult<CssOptions> {
    let rest = args.get(1..).unwrap_or_default();
    match args.first().map(String::as_str) {
        None => Ok(CssOptions::Build(CssArgs::default())),
        Some("build") => Ok(CssOptions::Build(parse_css_args(rest)?)),
        Some("scan") => Ok(CssOptions::Scan(parse_css_args(rest)?)),
        Some("help" | "--help" | "-h") => Ok(CssOptions::Help),
        Some(other) => Err(XtaskError::validation(format!(
            "unknown css subcommand: {other}"
        ))),
    }
}

fn parse_css_args(args: &[String]) -> XtaskResult<CssArgs> {
    let mut parsed = CssArgs::default();
    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let slot = match flag.as_str() {
            "--src" => &mut parsed.src,
            "--out" => &mut parsed.out,
            "--config" => &mut parsed.config,
            "--entry" => &mut parsed.entry,
            other => {
                return Err(
                    XtaskError::validation(format!("unknown css argument: {other}"))
                        .with_hint("run `cargo xtask css help` for supported flags"),
                )
            }
        };
        let value = iter
            .next()
            .ok_or_else(|| XtaskError::validation(format!("missing value for {flag}")))?;
        *slot = Some(PathBuf::from(value));
    }
    Ok(parsed)
}

fn print_css_usage() {
    eprintln!(
        "Usage: cargo xtask css <subcommand> [--src DIR] [--out DIR] [--config FILE] [--entry FILE]\n\
         \n\
         Subcommands:\n\
           build                 Scan sources, generate the stylesheet, write outputs and report\n\
           scan                  Scan sources and print the sorted utility tokens\n\
         \n\
         Defaults: --src src, --out .artifacts/utility-css, --config utility-css.toml (optional)\n"
    );
}

/// Load plugin options. An explicit `--config` must exist; the default file is optional.
fn load_options(ctx: &CommandContext, config: Option<&Path>) -> XtaskResult<PluginOptions> {
    match config {
        Some(path) => ConfigLoader::<PluginOptions>::new(ctx.root(), path).load(),
        None => Ok(ConfigLoader::<PluginOptions>::new(ctx.root(), DEFAULT_CONFIG_FILE)
            .load_optional()?
            .unwrap_or_default()),
    }
}

fn source_dir(ctx: &CommandContext, args: &CssArgs) -> PathBuf {
    let src = args
        .src
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE_DIR));
    ctx.artifacts().resolve_path(&src)
}

fn css_build(ctx: &CommandContext, args: &CssArgs) -> XtaskResult<CssBuildReport> {
    let options = load_options(ctx, args.config.as_deref())?;
    let src_dir = source_dir(ctx, args);
    let out_dir = args
        .out
        .as_deref()
        .map(|out| ctx.artifacts().resolve_path(out))
        .unwrap_or_else(|| ctx.artifacts().utility_css_out_dir());

    let plugin = UtilityCssPlugin::new(options);
    let build_ctx = MemoryBuildContext::default();
    let pass = plugin
        .build_start(&build_ctx)
        .map_err(|err| XtaskError::from(err).with_operation(BUILD_OPERATION))?;

    let files = collect_files(&src_dir)?;
    let scan = scan_files(&pass, &build_ctx, ctx.root(), &files);
    let token_count = pass.tokens().len();

    let mut bundle = OutputBundle::new();
    if let Some(entry) = &args.entry {
        bundle.push_chunk(entry_chunk(ctx, entry)?);
    }

    let outcome = pass.generate_bundle(&mut bundle, &build_ctx).map_err(|err| {
        XtaskError::from(err)
            .with_operation(BUILD_OPERATION)
            .with_path(&src_dir)
    })?;

    ctx.artifacts().ensure_dir(&out_dir)?;
    for chunk in bundle.chunks() {
        ctx.artifacts()
            .write_text(&out_dir.join(&chunk.file_name), &chunk.code)?;
    }
    for asset in build_ctx.take_emitted() {
        ctx.artifacts()
            .write_text(&out_dir.join(&asset.file_name), &asset.source)?;
    }

    let report = CssBuildReport::new(&src_dir, &scan, token_count, &outcome, &build_ctx);
    let report_path = ctx.artifacts().utility_css_report(&out_dir);
    report.write(ctx, &report_path)?;

    print_build_summary(&scan, &outcome, &out_dir);
    println!("Wrote utility CSS report: {}", report_path.display());
    Ok(report)
}

fn css_scan(ctx: &CommandContext, args: &CssArgs) -> XtaskResult<()> {
    let options = load_options(ctx, args.config.as_deref())?;
    let src_dir = source_dir(ctx, args);

    let build_ctx = MemoryBuildContext::default();
    let pass = UtilityCssPlugin::new(options)
        .build_start(&build_ctx)
        .map_err(|err| XtaskError::from(err).with_operation("cargo xtask css scan"))?;

    let files = collect_files(&src_dir)?;
    let scan = scan_files(&pass, &build_ctx, ctx.root(), &files);
    let tokens = pass.into_tokens();

    info!(
        files = scan.files_seen,
        transformed = scan.files_transformed,
        tokens = tokens.len(),
        "scan finished"
    );
    for token in tokens.iter() {
        println!("{token}");
    }
    Ok(())
}

/// Builds the entry chunk from a source file; `index.ts` becomes `index.js`.
fn entry_chunk(ctx: &CommandContext, entry: &Path) -> XtaskResult<OutputChunk> {
    let path = ctx.artifacts().resolve_path(entry);
    let code = std::fs::read_to_string(&path).map_err(|err| {
        XtaskError::io(format!("failed to read entry {}: {err}", path.display()))
            .with_path(&path)
            .with_hint("pass an existing file to --entry")
    })?;
    let file_name = path
        .with_extension("js")
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| XtaskError::validation("entry path has no file name").with_path(&path))?;
    Ok(OutputChunk::new(file_name, code, true))
}

fn print_build_summary(scan: &SourceScan, outcome: &BuildOutcome, out_dir: &Path) {
    println!(
        "scanned {} files ({} eligible, {} unreadable)",
        scan.files_seen, scan.files_transformed, scan.files_unreadable
    );
    match outcome {
        BuildOutcome::Emitted(summary) => {
            println!(
                "generated {} ({} bytes, {} of {} tokens matched) in {}",
                summary.css_file_name,
                summary.bytes,
                summary.matched_count,
                summary.token_count,
                out_dir.display()
            );
            if let Some(chunk) = &summary.injected_into {
                println!("injected stylesheet import into {chunk}");
            }
        }
        BuildOutcome::Skipped(reason) => println!("no stylesheet written ({reason:?})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_root(prefix: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!(
            "{prefix}-{}-{}",
            std::process::id(),
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("time")
                .as_nanos()
        ));
        fs::create_dir_all(&root).expect("create temp root");
        root
    }

    fn write(root: &Path, relative: &str, body: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().expect("parent")).expect("create parent");
        fs::write(path, body).expect("write fixture");
    }

    #[test]
    fn parse_defaults_to_build() {
        assert_eq!(
            parse_css_options(&[]).expect("parse"),
            CssOptions::Build(CssArgs::default())
        );
    }

    #[test]
    fn parse_collects_path_flags() {
        let args: Vec<String> = ["scan", "--src", "ui", "--config", "/tmp/u.toml"]
            .iter()
            .map(|arg| arg.to_string())
            .collect();
        assert_eq!(
            parse_css_options(&args).expect("parse"),
            CssOptions::Scan(CssArgs {
                src: Some(PathBuf::from("ui")),
                config: Some(PathBuf::from("/tmp/u.toml")),
                ..CssArgs::default()
            })
        );
    }

    #[test]
    fn parse_rejects_unknown_flags_and_missing_values() {
        let err = parse_css_options(&["build".into(), "--minify".into()]).expect_err("flag");
        assert!(err.to_string().contains("unknown css argument: --minify"));

        let err = parse_css_options(&["build".into(), "--out".into()]).expect_err("value");
        assert!(err.to_string().contains("missing value for --out"));

        let err = parse_css_options(&["watch".into()]).expect_err("subcommand");
        assert!(err.to_string().contains("unknown css subcommand"));
    }

    #[test]
    fn build_writes_stylesheet_entry_chunk_and_report() {
        let root = unique_root("xtask-css-build");
        write(
            &root,
            "src/components/button.vue",
            r#"<template><button class="flex items-center bg-primary">x</button></template>"#,
        );
        write(&root, "src/README.md", r#"<div class="hidden"></div>"#);
        write(&root, "src/index.ts", "export * from './components';\n");

        let ctx = CommandContext::at(root.clone());
        let args = CssArgs {
            entry: Some(PathBuf::from("src/index.ts")),
            ..CssArgs::default()
        };
        let report = css_build(&ctx, &args).expect("build");

        let out_dir = root.join(".artifacts/utility-css");
        let css = fs::read_to_string(out_dir.join("utility.css")).expect("stylesheet");
        assert!(css.contains(".flex{display:flex;}"));
        assert!(!css.contains(".hidden"));

        let entry = fs::read_to_string(out_dir.join("index.js")).expect("entry chunk");
        assert!(entry.starts_with("import './utility.css';\n"));

        assert_eq!(report.status, "emitted");
        assert_eq!(report.files_seen, 3);
        assert_eq!(report.files_transformed, 2);
        assert_eq!(report.token_count, 3);

        let report_body =
            fs::read_to_string(out_dir.join("utility-css-report.json")).expect("report");
        let parsed: serde_json::Value = serde_json::from_str(&report_body).expect("json");
        assert_eq!(parsed["css_file"], "utility.css");
        assert_eq!(parsed["injected_into"], "index.js");

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn build_without_tokens_writes_only_the_report() {
        let root = unique_root("xtask-css-empty");
        write(&root, "src/main.ts", "export const answer = 42;\n");

        let ctx = CommandContext::at(root.clone());
        let report = css_build(&ctx, &CssArgs::default()).expect("build");

        let out_dir = root.join(".artifacts/utility-css");
        assert_eq!(report.status, "skipped-no-tokens");
        assert!(!out_dir.join("utility.css").exists());
        assert!(out_dir.join("utility-css-report.json").exists());
        assert_eq!(
            report.warnings,
            vec!["no utility classes found in the project".to_string()]
        );

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn build_honours_config_file_and_reports_cycles_as_build_errors() {
        let root = unique_root("xtask-css-config");
        write(&root, "src/app.vue", r#"<div class="btn"></div>"#);
        write(
            &root,
            "utility-css.toml",
            "[engine.shortcuts]\nbtn = \"px-4 btn-inner\"\nbtn-inner = \"btn\"\n",
        );

        let ctx = CommandContext::at(root.clone());
        let err = css_build(&ctx, &CssArgs::default()).expect_err("cycle");
        assert_eq!(
            err.category,
            crate::runtime::error::XtaskErrorCategory::Build
        );
        assert!(err.to_string().contains("shortcut cycle detected"));

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn explicit_missing_config_is_a_config_error() {
        let root = unique_root("xtask-css-missing-config");
        let ctx = CommandContext::at(root.clone());
        let err = load_options(&ctx, Some(Path::new("nope.toml"))).expect_err("missing");
        assert_eq!(
            err.category,
            crate::runtime::error::XtaskErrorCategory::Config
        );
        assert_eq!(
            load_options(&ctx, None).expect("default optional"),
            PluginOptions::default()
        );
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn missing_source_dir_is_a_validation_error() {
        let root = unique_root("xtask-css-no-src");
        let ctx = CommandContext::at(root.clone());
        let err = css_build(&ctx, &CssArgs::default()).expect_err("missing src");
        assert_eq!(
            err.category,
            crate::runtime::error::XtaskErrorCategory::Validation
        );
        let _ = fs::remove_dir_all(root);
    }
}
