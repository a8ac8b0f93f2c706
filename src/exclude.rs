//! Exclusion rules for the docs scan.
//!
//! Each configured pattern is compiled once into an [`ExcludeRule`] before
//! the walk starts. A rule is tested against both the entry's relative path
//! (with `/` separators) and its bare name; a match on either excludes it.
//!
//! ## Pattern forms
//!
//! - **Literal** (no `*` or `?`): matches on exact equality *or* substring
//!   containment. `"api"` therefore also excludes `guides/rapid.md`.
//! - **Wildcard**: `*` matches any run of characters (including `/`), `?`
//!   matches exactly one character, everything else is literal. The whole
//!   candidate must match and comparison ignores case.

use regex::{Regex, RegexBuilder};

/// A single compiled exclusion pattern.
#[derive(Debug, Clone)]
pub enum ExcludeRule {
    /// Exact match or substring containment.
    Literal(String),
    /// Anchored, case-insensitive wildcard.
    Wildcard { pattern: String, regex: Regex },
    /// Wildcard that failed to compile; only exact equality applies.
    Exact(String),
}

impl ExcludeRule {
    pub fn new(pattern: &str) -> Self {
        if !pattern.contains(['*', '?']) {
            return ExcludeRule::Literal(pattern.to_string());
        }
        match compile_wildcard(pattern) {
            Ok(regex) => ExcludeRule::Wildcard {
                pattern: pattern.to_string(),
                regex,
            },
            Err(e) => {
                tracing::warn!(pattern, error = %e, "wildcard did not compile, using exact match");
                ExcludeRule::Exact(pattern.to_string())
            }
        }
    }

    /// The pattern as written in the config.
    pub fn pattern(&self) -> &str {
        match self {
            ExcludeRule::Literal(p) | ExcludeRule::Exact(p) => p,
            ExcludeRule::Wildcard { pattern, .. } => pattern,
        }
    }

    /// Whether this rule excludes an entry with the given relative path and name.
    pub fn matches(&self, relative_path: &str, name: &str) -> bool {
        match self {
            ExcludeRule::Literal(p) => {
                relative_path == p || name == p || relative_path.contains(p.as_str())
            }
            ExcludeRule::Wildcard { pattern, regex } => {
                regex.is_match(relative_path)
                    || regex.is_match(name)
                    || relative_path.contains(pattern.as_str())
            }
            ExcludeRule::Exact(p) => relative_path == p || name == p,
        }
    }
}

/// Translate `*` / `?` into an anchored regex, escaping everything else.
fn compile_wildcard(pattern: &str) -> Result<Regex, regex::Error> {
    let mut source = String::with_capacity(pattern.len() + 8);
    source.push('^');
    let mut literal = String::new();
    for c in pattern.chars() {
        match c {
            '*' | '?' => {
                source.push_str(&regex::escape(&literal));
                literal.clear();
                source.push_str(if c == '*' { ".*" } else { "." });
            }
            _ => literal.push(c),
        }
    }
    source.push_str(&regex::escape(&literal));
    source.push('$');
    RegexBuilder::new(&source)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
}

/// All exclusion rules for one scan.
#[derive(Debug, Clone, Default)]
pub struct ExcludeSet {
    rules: Vec<ExcludeRule>,
}

impl ExcludeSet {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        Self {
            rules: patterns.iter().map(|p| ExcludeRule::new(p.as_ref())).collect(),
        }
    }

    pub fn is_excluded(&self, relative_path: &str, name: &str) -> bool {
        self.rules.iter().any(|r| r.matches(relative_path, name))
    }

    pub fn rules(&self) -> &[ExcludeRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
