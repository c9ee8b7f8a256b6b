//! In-tree atomic CSS engine.
//!
//! A [`Generator`] is built once per build pass from an [`EngineConfig`] (theme overrides,
//! shortcuts, custom rules, safelist and blocklist) layered over the base preset. It turns a
//! token set into a stylesheet containing only the rules those tokens need. Output is a pure
//! function of the token *set*: insertion order never changes the CSS.

pub mod css;
mod rules;
pub mod theme;
mod variants;

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;
use tracing::debug;

use self::css::{escape_class, render, CssRule, Declaration};
use self::rules::PRESET;
use self::theme::{Theme, ThemeOverrides};
use self::variants::VariantContext;
use crate::error::EngineError;

/// Custom-property defaults that shadow and ring utilities compose with.
pub const PREFLIGHT: &str = "*,::before,::after,::backdrop{--un-ring-offset-shadow:0 0 rgb(0 0 0 / 0);--un-ring-shadow:0 0 rgb(0 0 0 / 0);--un-shadow-inset: ;--un-shadow:0 0 rgb(0 0 0 / 0);--un-ring-inset: ;--un-ring-offset-width:0px;--un-ring-offset-color:#fff;--un-ring-width:0px;--un-ring-color:rgb(147 197 253 / 0.5);}";

/// Engine overrides merged over the base preset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Theme additions and replacements.
    pub theme: ThemeOverrides,
    /// Shortcut name to a whitespace-separated list of utilities (or other shortcuts).
    pub shortcuts: BTreeMap<String, String>,
    /// Custom static rules: class name to `property = value` declarations.
    pub rules: BTreeMap<String, BTreeMap<String, String>>,
    /// Tokens generated even when no source mentions them.
    pub safelist: Vec<String>,
    /// Tokens never generated.
    pub blocklist: Vec<String>,
    /// Whether to emit the custom-property preflight block.
    pub preflights: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            theme: ThemeOverrides::default(),
            shortcuts: BTreeMap::new(),
            rules: BTreeMap::new(),
            safelist: Vec::new(),
            blocklist: Vec::new(),
            preflights: true,
        }
    }
}

/// Output of one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateResult {
    /// Stylesheet text. Empty only when no token matched a rule and preflights are off.
    pub css: String,
    /// Tokens that produced at least one rule.
    pub matched: BTreeSet<String>,
    /// Tokens that produced nothing, in sorted order.
    pub unmatched: Vec<String>,
}

#[derive(Debug, Clone)]
struct Fragment {
    order: usize,
    context: VariantContext,
    suffix: Option<&'static str>,
    declarations: Vec<Declaration>,
}

#[derive(Debug, Clone)]
struct Shortcut {
    order: usize,
    utilities: Vec<String>,
}

/// Configured engine ready to generate stylesheets.
#[derive(Debug, Clone)]
pub struct Generator {
    theme: Theme,
    shortcuts: BTreeMap<String, Shortcut>,
    custom_rules: BTreeMap<String, (usize, Vec<Declaration>)>,
    safelist: Vec<String>,
    blocklist: BTreeSet<String>,
    preflights: bool,
}

impl Generator {
    /// Validates `config` and builds a generator.
    ///
    /// Invalid colours, breakpoints, custom rules and empty shortcuts are rejected here so a
    /// misconfigured build fails before any file is scanned.
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        let theme = Theme::default().with_overrides(&config.theme)?;

        let mut custom_rules = BTreeMap::new();
        for (index, (name, declarations)) in config.rules.iter().enumerate() {
            custom_rules.insert(
                name.clone(),
                (PRESET.len() + index, validate_rule(name, declarations)?),
            );
        }

        let shortcut_base = PRESET.len() + custom_rules.len();
        let mut shortcuts = BTreeMap::new();
        for (index, (name, expansion)) in config.shortcuts.iter().enumerate() {
            let utilities: Vec<String> = expansion.split_whitespace().map(str::to_string).collect();
            if utilities.is_empty() {
                return Err(EngineError::EmptyShortcut { name: name.clone() });
            }
            shortcuts.insert(
                name.clone(),
                Shortcut {
                    order: shortcut_base + index,
                    utilities,
                },
            );
        }

        Ok(Self {
            theme,
            shortcuts,
            custom_rules,
            safelist: config.safelist.clone(),
            blocklist: config.blocklist.iter().cloned().collect(),
            preflights: config.preflights,
        })
    }

    /// Resolved theme in use.
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Generates CSS for `tokens` plus the safelist, minus the blocklist.
    pub fn generate<I, S>(&self, tokens: I) -> Result<GenerateResult, EngineError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut candidates: BTreeSet<String> = tokens
            .into_iter()
            .map(|token| token.as_ref().to_string())
            .collect();
        candidates.extend(self.safelist.iter().cloned());
        candidates.retain(|candidate| !self.blocklist.contains(candidate));

        let mut rules = Vec::new();
        let mut result = GenerateResult::default();
        for class_name in candidates {
            let mut chain = Vec::new();
            let Some(fragments) = self.resolve(&class_name, &mut chain)? else {
                result.unmatched.push(class_name);
                continue;
            };

            let escaped = escape_class(&class_name);
            for fragment in fragments {
                let rule = CssRule {
                    selector: fragment.context.selector(&escaped, fragment.suffix),
                    media: fragment.context.media.clone(),
                    order: fragment.order,
                    declarations: fragment.declarations,
                };
                rules.push(if fragment.context.important {
                    rule.into_important()
                } else {
                    rule
                });
            }
            result.matched.insert(class_name);
        }

        debug!(
            matched = result.matched.len(),
            unmatched = result.unmatched.len(),
            rules = rules.len(),
            "resolved utility tokens"
        );

        result.css = render(self.preflights.then_some(PREFLIGHT), rules);
        Ok(result)
    }

    fn resolve(
        &self,
        class_name: &str,
        chain: &mut Vec<String>,
    ) -> Result<Option<Vec<Fragment>>, EngineError> {
        let Some((body, context)) = variants::parse(class_name, &self.theme) else {
            return Ok(None);
        };

        if let Some(shortcut) = self.shortcuts.get(body) {
            return self.expand_shortcut(body, shortcut, &context, chain);
        }

        if let Some((order, declarations)) = self.custom_rules.get(body) {
            return Ok(Some(vec![Fragment {
                order: *order,
                context,
                suffix: None,
                declarations: declarations.clone(),
            }]));
        }

        Ok(PRESET
            .resolve(body, &self.theme)
            .map(|(order, resolved)| {
                vec![Fragment {
                    order,
                    context,
                    suffix: resolved.suffix,
                    declarations: resolved.declarations,
                }]
            }))
    }

    fn expand_shortcut(
        &self,
        name: &str,
        shortcut: &Shortcut,
        context: &VariantContext,
        chain: &mut Vec<String>,
    ) -> Result<Option<Vec<Fragment>>, EngineError> {
        if chain.iter().any(|seen| seen == name) {
            let mut chain = chain.clone();
            chain.push(name.to_string());
            return Err(EngineError::ShortcutCycle { chain });
        }

        chain.push(name.to_string());
        let mut inner = Vec::new();
        for utility in &shortcut.utilities {
            match self.resolve(utility, chain)? {
                Some(fragments) => inner.extend(fragments),
                None => debug!(shortcut = name, utility = utility.as_str(), "shortcut part matched no rule"),
            }
        }
        chain.pop();

        if inner.is_empty() {
            return Ok(None);
        }

        inner.sort_by_key(|fragment| fragment.order);
        let mut merged: Vec<Fragment> = Vec::new();
        for fragment in inner {
            let context = context.merge(&fragment.context);
            let existing = merged
                .iter_mut()
                .find(|candidate| candidate.context == context && candidate.suffix == fragment.suffix);
            match existing {
                Some(existing) => existing.declarations.extend(fragment.declarations),
                None => merged.push(Fragment {
                    order: shortcut.order,
                    context,
                    suffix: fragment.suffix,
                    declarations: fragment.declarations,
                }),
            }
        }
        Ok(Some(merged))
    }
}

fn validate_rule(
    name: &str,
    declarations: &BTreeMap<String, String>,
) -> Result<Vec<Declaration>, EngineError> {
    let invalid = |reason: &str| EngineError::InvalidRule {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(invalid("name must be a single class"));
    }
    if declarations.is_empty() {
        return Err(invalid("no declarations"));
    }
    declarations
        .iter()
        .map(|(property, value)| {
            if property.trim().is_empty() || value.trim().is_empty() {
                Err(invalid("declarations need a property and a value"))
            } else {
                Ok(Declaration::new(property.trim(), value.trim()))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bare() -> EngineConfig {
        EngineConfig {
            preflights: false,
            ..EngineConfig::default()
        }
    }

    fn css(config: &EngineConfig, tokens: &[&str]) -> String {
        Generator::new(config)
            .expect("valid config")
            .generate(tokens)
            .expect("generation succeeds")
            .css
    }

    #[test]
    fn generates_only_matched_rules() {
        let generator = Generator::new(&bare()).expect("generator");
        let result = generator
            .generate(["flex", "prose-heading", "p-4"])
            .expect("generate");
        assert_eq!(
            result.css,
            "/* layer: default */\n.flex{display:flex;}\n.p-4{padding:1rem;}\n"
        );
        assert_eq!(result.unmatched, vec!["prose-heading".to_string()]);
        assert_eq!(result.matched.len(), 2);
    }

    #[test]
    fn output_is_independent_of_token_order() {
        let config = EngineConfig::default();
        let forward = css(&config, &["md:p-2", "hover:bg-red-500", "flex", "w-1/2"]);
        let backward = css(&config, &["w-1/2", "flex", "hover:bg-red-500", "md:p-2"]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn variants_wrap_selectors_and_media() {
        let output = css(&bare(), &["hover:bg-red-500", "md:flex", "!p-1"]);
        assert_eq!(
            output,
            concat!(
                "/* layer: default */\n",
                ".\\!p-1{padding:0.25rem !important;}\n",
                ".hover\\:bg-red-500:hover{--un-bg-opacity:1;",
                "background-color:rgb(239 68 68 / var(--un-bg-opacity));}\n",
                "@media (min-width: 768px){\n",
                ".md\\:flex{display:flex;}\n",
                "}\n",
            )
        );
    }

    #[test]
    fn preflight_is_emitted_first_when_enabled() {
        let output = css(&EngineConfig::default(), &["shadow"]);
        assert!(output.starts_with("/* layer: preflights */\n*,::before"));
        assert!(output.contains(".shadow{--un-shadow:"));
    }

    #[test]
    fn preflight_is_rendered_even_when_nothing_matches() {
        assert_eq!(
            css(&EngineConfig::default(), &["hello", "world"]),
            format!("/* layer: preflights */\n{PREFLIGHT}\n")
        );
        assert_eq!(css(&bare(), &["hello", "world"]), "");
    }

    #[test]
    fn shortcuts_merge_declarations_per_variant_context() {
        let mut config = bare();
        config.shortcuts.insert(
            "btn".into(),
            "rounded px-4 py-2 hover:bg-blue-600".into(),
        );
        let output = css(&config, &["btn"]);
        assert_eq!(
            output,
            "/* layer: default */\n\
             .btn{padding-left:1rem;padding-right:1rem;padding-top:0.5rem;padding-bottom:0.5rem;border-radius:0.25rem;}\n\
             .btn:hover{--un-bg-opacity:1;background-color:rgb(37 99 235 / var(--un-bg-opacity));}\n"
        );
    }

    #[test]
    fn nested_shortcuts_expand_and_cycles_fail() {
        let mut config = bare();
        config.shortcuts.insert("card".into(), "panel shadow-md".into());
        config.shortcuts.insert("panel".into(), "p-4 rounded-lg".into());
        assert!(css(&config, &["card"]).contains(".card{"));

        config.shortcuts.insert("a".into(), "b".into());
        config.shortcuts.insert("b".into(), "p-2 a".into());
        let error = Generator::new(&config)
            .expect("cycles are detected lazily")
            .generate(["a"])
            .expect_err("cycle");
        assert_eq!(
            error,
            EngineError::ShortcutCycle {
                chain: vec!["a".into(), "b".into(), "a".into()],
            }
        );
    }

    #[test]
    fn empty_shortcut_is_a_configuration_error() {
        let mut config = bare();
        config.shortcuts.insert("nothing".into(), "   ".into());
        assert_eq!(
            Generator::new(&config).expect_err("empty shortcut"),
            EngineError::EmptyShortcut {
                name: "nothing".into(),
            }
        );
    }

    #[test]
    fn custom_rules_order_after_the_preset() {
        let mut config = bare();
        config.rules.insert(
            "focus-ring".into(),
            BTreeMap::from([("outline".to_string(), "2px solid red".to_string())]),
        );
        let output = css(&config, &["focus-ring", "z-10"]);
        assert_eq!(
            output,
            "/* layer: default */\n.z-10{z-index:10;}\n.focus-ring{outline:2px solid red;}\n"
        );
    }

    #[test]
    fn custom_rules_are_validated() {
        let mut config = bare();
        config.rules.insert("broken".into(), BTreeMap::new());
        assert!(matches!(
            Generator::new(&config),
            Err(EngineError::InvalidRule { .. })
        ));
    }

    #[test]
    fn safelist_and_blocklist_adjust_the_candidate_set() {
        let mut config = bare();
        config.safelist = vec!["hidden".into()];
        config.blocklist = vec!["flex".into()];
        let output = css(&config, &["flex", "p-1"]);
        assert!(output.contains(".hidden{display:none;}"));
        assert!(!output.contains(".flex{"));
    }

    #[test]
    fn engine_config_deserializes_with_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
safelist = ["sr-only"]

[shortcuts]
btn = "px-4 py-2"
"#,
        )
        .expect("parse engine config");
        assert!(config.preflights);
        assert_eq!(config.safelist, vec!["sr-only".to_string()]);
        assert_eq!(config.shortcuts["btn"], "px-4 py-2");
    }
}
