//! Utility-class tokens and the build-scoped token set.

use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};
use std::sync::{Mutex, PoisonError};

/// Structural delimiters of markup and template syntax. A fragment made only of these carries
/// no class name.
const DELIMITER_CHARS: &[char] = &['{', '}', '(', ')', '<', '>', ';', ',', '$'];

/// A single utility-class name.
///
/// Tokens are compared by exact, case-sensitive string equality and never contain whitespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(String);

impl Token {
    /// Builds a token from one whitespace-delimited fragment of scanned text.
    ///
    /// Returns `None` for empty fragments, fragments with internal whitespace, and fragments
    /// made entirely of delimiters (the lone `{` of a `:class="{...}"` binding). Anything else
    /// is kept, including arbitrary variants such as `[&>svg]:w-4`.
    pub fn from_fragment(fragment: &str) -> Option<Self> {
        if fragment.is_empty()
            || fragment.chars().any(char::is_whitespace)
            || fragment.chars().all(|ch| DELIMITER_CHARS.contains(&ch))
        {
            return None;
        }
        Some(Self(fragment.to_string()))
    }

    /// Returns the class name text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Token {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Insert-only, deduplicated token collection owned by one build pass.
///
/// Insertion takes `&self` so that a host may run file transforms in parallel. Each batch is
/// inserted under a single lock acquisition.
#[derive(Debug, Default)]
pub struct TokenSet {
    inner: Mutex<BTreeSet<Token>>,
}

impl TokenSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts one token. Returns `true` when the token was not yet present.
    pub fn insert(&self, token: Token) -> bool {
        self.lock().insert(token)
    }

    /// Inserts a batch of tokens and returns how many were new.
    pub fn extend<I>(&self, tokens: I) -> usize
    where
        I: IntoIterator<Item = Token>,
    {
        let mut guard = self.lock();
        let before = guard.len();
        guard.extend(tokens);
        guard.len() - before
    }

    /// Returns whether the set holds `class_name`.
    pub fn contains(&self, class_name: &str) -> bool {
        self.lock().contains(class_name)
    }

    /// Current number of distinct tokens.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns whether no token has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Consumes the set, ending the scanning phase.
    pub fn freeze(self) -> FrozenTokens {
        let tokens = self
            .inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        FrozenTokens { tokens }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeSet<Token>> {
        // A panic in another transform cannot leave a half-inserted token behind.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Immutable, sorted view of a token set after scanning has finished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrozenTokens {
    tokens: BTreeSet<Token>,
}

impl FrozenTokens {
    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns whether the scan found nothing.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterates tokens in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    /// Returns the tokens as a sorted list of class names.
    pub fn to_class_names(&self) -> Vec<String> {
        self.tokens.iter().map(ToString::to_string).collect()
    }
}

impl FromIterator<Token> for FrozenTokens {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}
