//! Build-time utility-class pipeline for the component library.
//!
//! The crate scans component sources for utility-class tokens ([`extract`]), accumulates them
//! in a per-build [`token::TokenSet`], and turns the final set into a minimal atomic stylesheet
//! with the in-tree [`engine`]. [`plugin`] wires these into a three-hook build lifecycle that a
//! host drives through the [`host::BuildContext`] contract and the [`bundle`] model.
//!
//! ```
//! use utility_css::{MemoryBuildContext, OutputBundle, PluginOptions, UtilityCssPlugin};
//!
//! let ctx = MemoryBuildContext::default();
//! let plugin = UtilityCssPlugin::new(PluginOptions::default());
//! let pass = plugin.build_start(&ctx).expect("valid options");
//! pass.transform(r#"<div class="flex p-4"></div>"#, "App.vue", &ctx);
//!
//! let mut bundle = OutputBundle::new();
//! pass.generate_bundle(&mut bundle, &ctx).expect("generation");
//! assert_eq!(ctx.emitted()[0].file_name, "utility.css");
//! ```

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod bundle;
pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod host;
pub mod plugin;
pub mod token;

pub use bundle::{OutputAsset, OutputBundle, OutputChunk, OutputItem};
pub use config::{PluginOptions, DEFAULT_CSS_FILE_NAME};
pub use engine::theme::{ColorValue, Theme, ThemeOverrides};
pub use engine::{EngineConfig, GenerateResult, Generator, PREFLIGHT};
pub use error::{EngineError, PluginError};
pub use extract::{Extractor, DEFAULT_EXTENSIONS};
pub use host::{BuildContext, LogLevel, LogRecord, MemoryBuildContext, NoopBuildContext};
pub use plugin::{BuildOutcome, BuildPass, EmitSummary, SkipReason, UtilityCssPlugin, PLUGIN_NAME};
pub use token::{FrozenTokens, Token, TokenSet};
