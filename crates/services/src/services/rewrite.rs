//! Ordered, named text rewrites.
//!
//! The normalizer and the cleaner are both a fixed sequence of small substitutions where
//! later steps see the output of earlier ones. Keeping each step as a named
//! [`RewriteRule`] in a table makes the order explicit and lets every rule be tested
//! on its own.

use regex::{Captures, Regex};
use tracing::trace;

/// Plain function rewrite, for steps a single regex substitution can't express.
pub type RewriteFn = fn(&str) -> String;

enum RewriteAction {
    Replace {
        pattern: Regex,
        replacement: &'static str,
    },
    JoinWords(Regex),
    Custom(RewriteFn),
}

pub struct RewriteRule {
    name: &'static str,
    action: RewriteAction,
}

impl RewriteRule {
    /// Regex substitution. `replacement` uses `regex` syntax (`$1`, `$$` for a dollar).
    ///
    /// Panics if `pattern` is invalid. Rule tables are built from literals.
    pub fn replace(name: &'static str, pattern: &str, replacement: &'static str) -> Self {
        Self {
            name,
            action: RewriteAction::Replace {
                pattern: compile(name, pattern),
                replacement,
            },
        }
    }

    /// Re-joins a phrase whose words the model split apart. Matches the words
    /// case-insensitively with any run of whitespace or hyphens between them and
    /// rewrites the separators to single hyphens, keeping each word's casing.
    pub fn join_words(name: &'static str, words: &[&str]) -> Self {
        let body = words
            .iter()
            .map(|word| format!("({})", regex::escape(word)))
            .collect::<Vec<_>>()
            .join(r"[\s\-]+");
        Self {
            name,
            action: RewriteAction::JoinWords(compile(name, &format!(r"(?i)\b{body}\b"))),
        }
    }

    pub fn custom(name: &'static str, rewrite: RewriteFn) -> Self {
        Self {
            name,
            action: RewriteAction::Custom(rewrite),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn apply(&self, input: &str) -> String {
        match &self.action {
            RewriteAction::Replace {
                pattern,
                replacement,
            } => pattern.replace_all(input, *replacement).into_owned(),
            RewriteAction::JoinWords(pattern) => pattern
                .replace_all(input, |caps: &Captures| {
                    caps.iter()
                        .skip(1)
                        .flatten()
                        .map(|m| m.as_str())
                        .collect::<Vec<_>>()
                        .join("-")
                })
                .into_owned(),
            RewriteAction::Custom(rewrite) => rewrite(input),
        }
    }
}

fn compile(name: &str, pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid pattern for rewrite rule `{name}`: {e}"))
}

/// Runs `rules` in order, each on the previous rule's output.
pub fn apply_all(rules: &[RewriteRule], input: &str) -> String {
    rules.iter().fold(input.to_string(), |text, rule| {
        let next = rule.apply(&text);
        if next != text {
            trace!(rule = rule.name(), "rewrite rule applied");
        }
        next
    })
}
