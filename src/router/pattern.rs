//! Route pattern compilation and matching.
//!
//! A route pattern mixes three dialects: literal segments (`/about`), inline
//! regular expressions (`/(\d+)`, `/blog(/\d{4})?`) and brace placeholders
//! (`/{name}`). Placeholders become lazy positional groups; their names are
//! decorative and never validated.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::router::error::Error;
use crate::router::params::{extract, Param};

/// A `{...}` placeholder directly after a path separator.
fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"/\{(.*?)\}").expect("placeholder regex is valid"))
}

/// Rewrite the Perl class escapes to their ASCII sets so `\d`, `\w` and `\s`
/// never match non-ASCII digits, letters or spaces. Other escapes pass through.
fn ascii_classes(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('d') => out.push_str("[0-9]"),
            Some('D') => out.push_str("[^0-9]"),
            Some('w') => out.push_str("[0-9A-Za-z_]"),
            Some('W') => out.push_str("[^0-9A-Za-z_]"),
            Some('s') => out.push_str(r"[\t\n\x0B\x0C\r ]"),
            Some('S') => out.push_str(r"[^\t\n\x0B\x0C\r ]"),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// One participating capture group: its text and byte offset in the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capture<'p> {
    pub text: &'p str,
    pub offset: usize,
}

/// A compiled route pattern.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compile a route pattern into an anchored, case-sensitive matcher.
    ///
    /// `\d`, `\w` and `\s` (and their negations) are ASCII-only.
    pub fn compile(pattern: &str) -> Result<Self, Error> {
        let rewritten = ascii_classes(&placeholder().replace_all(pattern, "/(.*?)"));
        let regex = Regex::new(&format!("^(?:{rewritten})$")).map_err(|source| Error::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// The pattern as registered, before placeholder rewriting.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Number of capturing groups, which is also the parameter count.
    pub fn group_count(&self) -> usize {
        self.regex.captures_len() - 1
    }

    /// Whether the whole path matches.
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Match the whole path and report every capturing group in order.
    ///
    /// Groups inside an optional branch that did not take part in the match
    /// are reported as `None`.
    pub fn captures<'p>(&self, path: &'p str) -> Option<Vec<Option<Capture<'p>>>> {
        let caps = self.regex.captures(path)?;
        Some(
            caps.iter()
                .skip(1)
                .map(|group| group.map(|m| Capture { text: m.as_str(), offset: m.start() }))
                .collect(),
        )
    }

    /// Match the path and extract its parameters.
    pub fn params(&self, path: &str) -> Option<Vec<Param>> {
        self.captures(path).map(|captures| extract(&captures))
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("source", &self.source)
            .field("regex", &self.regex.as_str())
            .finish()
    }
}
