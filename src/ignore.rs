//! Shell-glob ignore list checked against full candidate paths.
//!
//! Patterns use `*`, `?` and `[...]` classes. Wildcards are allowed to cross
//! `/`, so `*.tmp` matches `/data/cache/a.tmp` and `*/build` matches any entry
//! named `build` at any depth. Braces are literal characters and `**` means
//! the same as `*`.

use std::path::Path;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::error::{Result, ScanError};

#[derive(Debug, Clone)]
pub struct IgnoreList {
    patterns: Vec<String>,
    set: GlobSet,
}

impl Default for IgnoreList {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
            set: GlobSet::empty(),
        }
    }
}

impl IgnoreList {
    /// Compiles `patterns` in order. The first invalid pattern is reported.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        let mut builder = GlobSetBuilder::new();
        for pattern in &patterns {
            let glob = GlobBuilder::new(&to_glob(pattern))
                .literal_separator(false)
                .build()
                .map_err(|source| ScanError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })?;
            builder.add(glob);
        }
        let set = builder.build().map_err(|source| ScanError::InvalidPattern {
            pattern: patterns.join(", "),
            source,
        })?;
        Ok(Self { patterns, set })
    }

    pub fn matches(&self, path: &Path) -> bool {
        !self.patterns.is_empty() && self.set.is_match(path)
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Rewrites a shell pattern into globset syntax. Braces become one-character
/// classes and runs of `*` collapse to one. Escapes and bracket classes are
/// copied untouched.
fn to_glob(pattern: &str) -> String {
    let mut glob = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                glob.push(c);
                if let Some(escaped) = chars.next() {
                    glob.push(escaped);
                }
            }
            '[' => {
                glob.push(c);
                if let Some(negation) = chars.next_if(|&n| n == '!' || n == '^') {
                    glob.push(negation);
                }
                // A leading `]` is a member, not the end of the class.
                if let Some(bracket) = chars.next_if_eq(&']') {
                    glob.push(bracket);
                }
                for member in chars.by_ref() {
                    glob.push(member);
                    if member == ']' {
                        break;
                    }
                }
            }
            '*' => {
                glob.push(c);
                while chars.next_if_eq(&'*').is_some() {}
            }
            '{' | '}' => {
                glob.push('[');
                glob.push(c);
                glob.push(']');
            }
            _ => glob.push(c),
        }
    }
    glob
}
