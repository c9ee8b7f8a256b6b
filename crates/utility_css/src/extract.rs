//! Heuristic utility-class scanner.
//!
//! The scanner does not parse markup or script grammars. It runs three independent regular
//! expression passes over the raw text and unions their results:
//!
//! 1. quoted values of `class`, `className` and `:class` attributes,
//! 2. quoted strings inside braced values of the same attributes (`className={...}`,
//!    `:class="{ 'bg-red-500': active }"`),
//! 3. any quoted string containing a utility-looking substring such as `bg-` or `flex`.
//!
//! Pass 3 also captures ordinary prose that happens to contain one of those substrings. Such
//! tokens simply match no engine rule. Class strings assembled from several expressions at
//! runtime are not reconstructed.

use std::sync::LazyLock;

use regex::Regex;

use crate::token::Token;

/// Extensions scanned when no allow-list is configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "vue", "svelte", "html"];

static CLASS_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:class(?:Name)?|:class)=["'`]([^"'`]+)["'`]"#).expect("static regex")
});

static CLASS_BINDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:class(?:Name)?|:class)=["'`]?\{([^}]*)\}"#).expect("static regex")
});

static QUOTED_STRING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["'`]([^"'`]+)["'`]"#).expect("static regex"));

static UTILITY_STRING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"["'`]([^"'`]*(?:bg-|text-|p-|m-|w-|h-|flex|grid|rounded|border)[^"'`]*)["'`]"#,
    )
    .expect("static regex")
});

/// Extension allow-list plus the three extraction passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extractor {
    extensions: Vec<String>,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS.iter().copied())
    }
}

impl Extractor {
    /// Creates an extractor accepting the given extensions (with or without a leading dot).
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_string())
                .filter(|ext| !ext.is_empty())
                .collect(),
        }
    }

    /// Allowed extensions without leading dots.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Returns whether a module identifier ends in one of the allowed extensions.
    pub fn is_eligible(&self, id: &str) -> bool {
        let Some((stem, ext)) = id.rsplit_once('.') else {
            return false;
        };
        !stem.is_empty() && self.extensions.iter().any(|allowed| allowed == ext)
    }

    /// Extracts every candidate token from `code`.
    ///
    /// The result may hold duplicates when passes overlap; the caller's set discards them.
    pub fn extract(&self, code: &str) -> Vec<Token> {
        let mut tokens = Vec::new();

        for captures in CLASS_ATTRIBUTE.captures_iter(code) {
            push_fragments(&mut tokens, &captures[1]);
        }

        for captures in CLASS_BINDING.captures_iter(code) {
            for quoted in QUOTED_STRING.captures_iter(&captures[1]) {
                push_fragments(&mut tokens, &quoted[1]);
            }
        }

        for captures in UTILITY_STRING.captures_iter(code) {
            push_fragments(&mut tokens, &captures[1]);
        }

        tokens
    }
}

fn push_fragments(tokens: &mut Vec<Token>, value: &str) {
    tokens.extend(value.split_whitespace().filter_map(Token::from_fragment));
}
