//! CSS rule model, selector escaping, and stylesheet rendering.

use std::collections::BTreeMap;
use std::fmt::Write as _;

/// One `property:value` pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Declaration {
    /// CSS property name, including custom properties such as `--un-bg-opacity`.
    pub property: String,
    /// CSS value text.
    pub value: String,
}

impl Declaration {
    /// Creates a declaration.
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }

    fn important(mut self) -> Self {
        if !self.value.ends_with("!important") {
            self.value.push_str(" !important");
        }
        self
    }
}

/// A fully resolved rule for one class name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssRule {
    /// Complete selector, already escaped.
    pub selector: String,
    /// Media query condition without the `@media` keyword.
    pub media: Option<MediaQuery>,
    /// Sort key from the matching rule's position in the preset.
    pub order: usize,
    /// Declarations in emission order.
    pub declarations: Vec<Declaration>,
}

impl CssRule {
    pub(crate) fn body(&self) -> String {
        let mut body = String::new();
        for declaration in &self.declarations {
            let _ = write!(body, "{}:{};", declaration.property, declaration.value);
        }
        body
    }

    pub(crate) fn into_important(mut self) -> Self {
        self.declarations = self
            .declarations
            .into_iter()
            .map(Declaration::important)
            .collect();
        self
    }
}

/// Min-width media condition with its breakpoint rank.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MediaQuery {
    /// Position of the widest breakpoint involved, used for ordering.
    pub rank: usize,
    /// Condition text such as `(min-width: 640px)`.
    pub condition: String,
}

/// Escapes a class name for use in a class selector.
///
/// ASCII characters outside `[A-Za-z0-9_-]` are backslash-escaped and a leading digit (or a
/// digit after a leading hyphen) is written as a code point escape.
pub fn escape_class(class_name: &str) -> String {
    let mut escaped = String::with_capacity(class_name.len() + 8);
    let after_hyphen = usize::from(class_name.starts_with('-'));

    for (position, ch) in class_name.chars().enumerate() {
        if ch.is_ascii_digit() && position == after_hyphen {
            let _ = write!(escaped, "\\{:x} ", ch as u32);
        } else if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || !ch.is_ascii() {
            escaped.push(ch);
        } else {
            escaped.push('\\');
            escaped.push(ch);
        }
    }

    escaped
}

/// Renders rules into the final stylesheet text.
///
/// Rules without media come first, followed by one block per media condition in breakpoint
/// order. Within a block rules are ordered by preset position, then selector, and rules with
/// identical bodies are merged into one selector list.
pub fn render(preflight: Option<&str>, rules: Vec<CssRule>) -> String {
    let mut groups: BTreeMap<Option<MediaQuery>, Vec<CssRule>> = BTreeMap::new();
    for rule in rules {
        groups.entry(rule.media.clone()).or_default().push(rule);
    }

    let mut css = String::new();
    if let Some(preflight) = preflight {
        css.push_str("/* layer: preflights */\n");
        css.push_str(preflight);
        css.push('\n');
    }
    if groups.is_empty() {
        return css;
    }

    css.push_str("/* layer: default */\n");
    for (media, mut rules) in groups {
        rules.sort_by(|a, b| {
            a.order
                .cmp(&b.order)
                .then_with(|| a.selector.cmp(&b.selector))
        });

        let mut merged: Vec<(Vec<String>, String)> = Vec::new();
        for rule in rules {
            let body = rule.body();
            match merged.iter_mut().find(|(_, existing)| *existing == body) {
                Some((selectors, _)) => {
                    if !selectors.contains(&rule.selector) {
                        selectors.push(rule.selector);
                    }
                }
                None => merged.push((vec![rule.selector], body)),
            }
        }

        if let Some(media) = &media {
            let _ = writeln!(css, "@media {}{{", media.condition);
        }
        for (selectors, body) in merged {
            let _ = writeln!(css, "{}{{{}}}", selectors.join(","), body);
        }
        if media.is_some() {
            css.push_str("}\n");
        }
    }

    css
}
