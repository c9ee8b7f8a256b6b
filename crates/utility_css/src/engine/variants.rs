//! Variant prefixes (`md:`, `hover:`, `dark:`, `!`) and the selector context they build.

use super::css::MediaQuery;
use super::theme::Theme;

/// Selector and media context accumulated from a class name's variant prefixes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct VariantContext {
    pub(crate) media: Option<MediaQuery>,
    /// Ancestor selectors, each ending in a descendant combinator.
    pub(crate) parents: Vec<&'static str>,
    pub(crate) pseudo: String,
    pub(crate) important: bool,
}

impl VariantContext {
    /// Layers `inner` (from a shortcut's expansion) inside this context.
    pub(crate) fn merge(&self, inner: &VariantContext) -> VariantContext {
        let media = match (&self.media, &inner.media) {
            (Some(outer), Some(nested)) if nested.rank > outer.rank => Some(nested.clone()),
            (Some(outer), _) => Some(outer.clone()),
            (None, nested) => nested.clone(),
        };
        let mut parents = self.parents.clone();
        for parent in &inner.parents {
            if !parents.contains(parent) {
                parents.push(*parent);
            }
        }
        VariantContext {
            media,
            parents,
            pseudo: format!("{}{}", self.pseudo, inner.pseudo),
            important: self.important || inner.important,
        }
    }

    /// Builds the full selector for an already escaped class name.
    pub(crate) fn selector(&self, escaped_class: &str, suffix: Option<&str>) -> String {
        format!(
            "{}.{}{}{}",
            self.parents.concat(),
            escaped_class,
            self.pseudo,
            suffix.unwrap_or_default()
        )
    }
}

fn pseudo_class(name: &str) -> Option<&'static str> {
    Some(match name {
        "hover" => ":hover",
        "focus" => ":focus",
        "focus-visible" => ":focus-visible",
        "focus-within" => ":focus-within",
        "active" => ":active",
        "visited" => ":visited",
        "disabled" => ":disabled",
        "checked" => ":checked",
        "first" => ":first-child",
        "last" => ":last-child",
        "odd" => ":nth-child(odd)",
        "even" => ":nth-child(even)",
        _ => return None,
    })
}

fn parent_selector(name: &str) -> Option<&'static str> {
    Some(match name {
        "dark" => ".dark ",
        "group-hover" => ".group:hover ",
        "group-focus" => ".group:focus ",
        _ => return None,
    })
}

/// Splits on `:` outside of `[...]` so arbitrary values may contain colons.
fn split_variants(class_name: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (index, ch) in class_name.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ':' if depth == 0 => {
                parts.push(&class_name[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(&class_name[start..]);
    parts
}

/// Strips variant prefixes from `class_name`.
///
/// Returns the bare utility body and its context, or `None` when a prefix is not a known
/// variant or the body is empty.
pub(crate) fn parse<'a>(class_name: &'a str, theme: &Theme) -> Option<(&'a str, VariantContext)> {
    let mut parts = split_variants(class_name);
    let mut body = parts.pop()?;
    let mut context = VariantContext::default();

    if let Some(stripped) = body.strip_prefix('!') {
        body = stripped;
        context.important = true;
    }
    if body.is_empty() {
        return None;
    }

    for variant in parts {
        if let Some((rank, width)) = theme.breakpoint(variant) {
            let wider = context.media.as_ref().map_or(true, |media| rank > media.rank);
            if wider {
                context.media = Some(MediaQuery {
                    rank,
                    condition: format!("(min-width: {width})"),
                });
            }
        } else if let Some(pseudo) = pseudo_class(variant) {
            context.pseudo.push_str(pseudo);
        } else if let Some(parent) = parent_selector(variant) {
            if !context.parents.contains(&parent) {
                context.parents.push(parent);
            }
        } else {
            return None;
        }
    }

    Some((body, context))
}
