//! Build plugin lifecycle: build start, per-file transform, bundle generation.
//!
//! Per-build state lives in a [`BuildPass`] returned by [`UtilityCssPlugin::build_start`].
//! Transforms borrow the pass and may run concurrently. [`BuildPass::generate_bundle`]
//! consumes it, so a finished pass cannot be scanned again and every build starts from an
//! empty token set.

use tracing::instrument;

use crate::bundle::{OutputAsset, OutputBundle};
use crate::config::PluginOptions;
use crate::engine::Generator;
use crate::error::PluginError;
use crate::extract::Extractor;
use crate::host::BuildContext;
use crate::token::{FrozenTokens, TokenSet};

/// Name reported to hosts.
pub const PLUGIN_NAME: &str = "utility-css";

/// Why a pass finished without emitting a stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No eligible file contributed a token.
    NoTokens,
    /// Tokens were found but none matched a rule and preflights are disabled.
    EmptyCss,
}

/// Details of an emitted stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitSummary {
    /// Asset file name.
    pub css_file_name: String,
    /// Stylesheet size in bytes.
    pub bytes: usize,
    /// Tokens collected during the pass.
    pub token_count: usize,
    /// Tokens that produced at least one rule.
    pub matched_count: usize,
    /// Tokens that matched no rule, sorted.
    pub unmatched: Vec<String>,
    /// Entry chunk that received the import, when injection happened.
    pub injected_into: Option<String>,
}

/// Successful end state of a build pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// A stylesheet asset was emitted.
    Emitted(EmitSummary),
    /// Nothing was emitted.
    Skipped(SkipReason),
}

/// Utility-class extraction and CSS generation plugin.
#[derive(Debug, Clone, Default)]
pub struct UtilityCssPlugin {
    options: PluginOptions,
}

impl UtilityCssPlugin {
    /// Creates a plugin with the given options.
    pub fn new(options: PluginOptions) -> Self {
        Self { options }
    }

    /// Plugin name.
    pub fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    /// Configured options.
    pub fn options(&self) -> &PluginOptions {
        &self.options
    }

    /// Initializes the engine and a fresh token set for one build.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Config`] when the engine overrides are invalid.
    #[instrument(level = "debug", skip_all, fields(plugin = PLUGIN_NAME))]
    pub fn build_start(&self, ctx: &dyn BuildContext) -> Result<BuildPass, PluginError> {
        let generator = Generator::new(&self.options.engine).map_err(|error| {
            let error = PluginError::Config(error);
            ctx.error(&error.to_string());
            error
        })?;

        ctx.info("utility CSS plugin build started");
        Ok(BuildPass {
            generator,
            extractor: Extractor::new(&self.options.extensions),
            tokens: TokenSet::new(),
            css_file_name: self.options.css_file_name.clone(),
            inject_css: self.options.inject_css,
        })
    }
}

/// State of one build between build start and bundle generation.
#[derive(Debug)]
pub struct BuildPass {
    generator: Generator,
    extractor: Extractor,
    tokens: TokenSet,
    css_file_name: String,
    inject_css: bool,
}

impl BuildPass {
    /// Scans one module. The code itself is never modified.
    ///
    /// Returns `None` for ineligible identifiers, otherwise the number of tokens this file
    /// added to the set.
    pub fn transform(&self, code: &str, id: &str, ctx: &dyn BuildContext) -> Option<usize> {
        if !self.extractor.is_eligible(id) {
            return None;
        }

        let added = self.tokens.extend(self.extractor.extract(code));
        ctx.debug(&format!(
            "processing {id}, found {} total tokens so far",
            self.tokens.len()
        ));
        Some(added)
    }

    /// Tokens collected so far.
    pub fn tokens(&self) -> &TokenSet {
        &self.tokens
    }

    /// Ends the pass without generating, returning the sorted tokens.
    pub fn into_tokens(self) -> FrozenTokens {
        self.tokens.freeze()
    }

    /// Generates the stylesheet, emits it and optionally injects its import.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Generate`] when the engine fails; the message is also reported
    /// through [`BuildContext::error`].
    #[instrument(level = "debug", skip_all, fields(plugin = PLUGIN_NAME))]
    pub fn generate_bundle(
        self,
        bundle: &mut OutputBundle,
        ctx: &dyn BuildContext,
    ) -> Result<BuildOutcome, PluginError> {
        let tokens = self.tokens.freeze();
        if tokens.is_empty() {
            ctx.warn("no utility classes found in the project");
            return Ok(BuildOutcome::Skipped(SkipReason::NoTokens));
        }

        let result = self.generator.generate(tokens.iter()).map_err(|error| {
            let error = PluginError::Generate(error);
            ctx.error(&error.to_string());
            error
        })?;

        if result.css.is_empty() {
            ctx.info(&format!(
                "no CSS generated from {} tokens; {} not emitted",
                tokens.len(),
                self.css_file_name
            ));
            return Ok(BuildOutcome::Skipped(SkipReason::EmptyCss));
        }

        let bytes = result.css.len();
        ctx.emit_file(OutputAsset::new(&self.css_file_name, result.css));
        ctx.info(&format!(
            "generated {} with {bytes} bytes from {} tokens",
            self.css_file_name,
            tokens.len()
        ));

        let injected_into = if self.inject_css {
            inject_import(bundle, &self.css_file_name, ctx)
        } else {
            None
        };

        Ok(BuildOutcome::Emitted(EmitSummary {
            css_file_name: self.css_file_name,
            bytes,
            token_count: tokens.len(),
            matched_count: result.matched.len(),
            unmatched: result.unmatched,
            injected_into,
        }))
    }
}

fn inject_import(
    bundle: &mut OutputBundle,
    css_file_name: &str,
    ctx: &dyn BuildContext,
) -> Option<String> {
    let chunk = bundle.entry_chunk_mut()?;
    chunk.code = format!("import './{css_file_name}';\n{}", chunk.code);
    ctx.info(&format!("injected CSS import into {}", chunk.file_name));
    Some(chunk.file_name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::OutputChunk;
    use crate::host::{LogLevel, MemoryBuildContext, NoopBuildContext};

    #[test]
    fn ineligible_files_are_ignored() {
        let pass = UtilityCssPlugin::default()
            .build_start(&NoopBuildContext)
            .expect("build start");
        assert_eq!(
            pass.transform("<div class=\"flex\"></div>", "README.md", &NoopBuildContext),
            None
        );
        assert!(pass.tokens().is_empty());
    }

    #[test]
    fn transform_reports_newly_added_tokens() {
        let ctx = MemoryBuildContext::default();
        let pass = UtilityCssPlugin::default().build_start(&ctx).expect("build start");

        assert_eq!(pass.transform(r#"<a class="flex p-2">"#, "a.vue", &ctx), Some(2));
        assert_eq!(pass.transform(r#"<b class="flex m-1">"#, "b.vue", &ctx), Some(1));
        assert_eq!(
            ctx.messages(LogLevel::Debug).last().map(String::as_str),
            Some("processing b.vue, found 3 total tokens so far")
        );
    }

    #[test]
    fn injection_prepends_import_to_the_entry_chunk_only() {
        let ctx = MemoryBuildContext::default();
        let pass = UtilityCssPlugin::default().build_start(&ctx).expect("build start");
        pass.transform(r#"<a class="flex">"#, "a.ts", &ctx);

        let mut bundle = OutputBundle::new();
        bundle.push_chunk(OutputChunk::new("chunk.js", "lazy()", false));
        bundle.push_chunk(OutputChunk::new("index.js", "main()", true));

        let outcome = pass.generate_bundle(&mut bundle, &ctx).expect("generate");
        let BuildOutcome::Emitted(summary) = outcome else {
            panic!("expected an emitted stylesheet");
        };
        assert_eq!(summary.injected_into.as_deref(), Some("index.js"));

        let codes: Vec<&str> = bundle.chunks().map(|chunk| chunk.code.as_str()).collect();
        assert_eq!(codes, vec!["lazy()", "import './utility.css';\nmain()"]);
    }
}
