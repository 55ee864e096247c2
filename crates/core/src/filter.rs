//! Inclusion predicates deciding which directories take part in a corpus.
//!
//! The default [`DirFilter`] reproduces the long-standing convention that a
//! fixture directory name contains no dot: `helpers.lib/` or `.git/` hold
//! auxiliary files and are skipped together with everything beneath them.

use serde::{Deserialize, Serialize};

/// Decides, by base name alone, whether a directory belongs to the test
/// surface and whether it is a terminal fixture.
pub trait DirPredicate {
    /// Whether a directory named `name` participates at all. Excluded
    /// directories are never descended into.
    fn includes(&self, name: &str) -> bool;

    /// Whether an included directory is a fixture regardless of any
    /// subdirectories it has.
    fn is_terminal(&self, _name: &str) -> bool {
        false
    }
}

impl<F> DirPredicate for F
where
    F: Fn(&str) -> bool,
{
    fn includes(&self, name: &str) -> bool {
        self(name)
    }
}

/// Configurable name-based filter, deserialized from `[suite.filter]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DirFilter {
    /// A name containing any of these characters is excluded.
    pub exclude_chars: String,
    /// Names excluded verbatim.
    pub exclude_names: Vec<String>,
    /// A name ending with one of these suffixes is a fixture, not a group.
    pub terminal_suffixes: Vec<String>,
}

impl Default for DirFilter {
    fn default() -> Self {
        DirFilter {
            exclude_chars: ".".to_string(),
            exclude_names: Vec::new(),
            terminal_suffixes: Vec::new(),
        }
    }
}

impl DirPredicate for DirFilter {
    fn includes(&self, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }
        if name.chars().any(|c| self.exclude_chars.contains(c)) {
            return false;
        }
        !self.exclude_names.iter().any(|n| n == name)
    }

    fn is_terminal(&self, name: &str) -> bool {
        self.terminal_suffixes
            .iter()
            .any(|suffix| !suffix.is_empty() && name.ends_with(suffix.as_str()))
    }
}
