//! Synchronization verifier: compares a declared tree against a fresh scan.
//!
//! Identity is the relative case path, never the derived identifier, so a
//! rename that happens to derive the same identifier still shows as drift.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use log::{debug, warn};
use serde::Serialize;

use crate::error::{CorpusError, DriftError};
use crate::filter::DirPredicate;
use crate::model::{build, is_within, TestGroupDescriptor};
use crate::scan::scan_scope;

/// Outcome of one synchronization check over one scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Relative path of the checked group; empty for the whole corpus.
    pub scope: String,
    /// Declared but absent on disk.
    pub missing: BTreeSet<String>,
    /// Present on disk but not declared.
    pub extra: BTreeSet<String>,
    pub declared: usize,
    pub live: usize,
}

impl SyncReport {
    pub fn compare<D, L>(scope: &str, declared: D, live: L) -> Self
    where
        D: IntoIterator,
        D::Item: AsRef<str>,
        L: IntoIterator,
        L::Item: AsRef<str>,
    {
        let declared: BTreeSet<String> = declared
            .into_iter()
            .map(|p| p.as_ref().to_string())
            .collect();
        let live: BTreeSet<String> = live.into_iter().map(|p| p.as_ref().to_string()).collect();
        SyncReport {
            scope: scope.to_string(),
            missing: declared.difference(&live).cloned().collect(),
            extra: live.difference(&declared).cloned().collect(),
            declared: declared.len(),
            live: live.len(),
        }
    }

    /// The only passing state: nothing missing and nothing extra.
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }

    pub fn into_result(self) -> Result<(), DriftError> {
        if self.is_clean() {
            Ok(())
        } else {
            Err(DriftError { report: self })
        }
    }

    fn scope_label(&self) -> &str {
        if self.scope.is_empty() {
            "<root>"
        } else {
            &self.scope
        }
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return write!(
                f,
                "fixtures under {} in sync ({} declared)",
                self.scope_label(),
                self.declared
            );
        }
        write!(
            f,
            "fixtures under {} out of sync ({} declared, {} on disk)",
            self.scope_label(),
            self.declared,
            self.live
        )?;
        if !self.missing.is_empty() {
            write!(f, "\n  declared but missing on disk:")?;
            for path in &self.missing {
                write!(f, "\n    - {}", path)?;
            }
        }
        if !self.extra.is_empty() {
            write!(f, "\n  present on disk but not declared:")?;
            for path in &self.extra {
                write!(f, "\n    + {}", path)?;
            }
        }
        Ok(())
    }
}

/// Check the subtree rooted at `declared.path` against the corpus.
pub fn verify(
    declared: &TestGroupDescriptor,
    root: &Path,
    filter: &dyn DirPredicate,
) -> Result<SyncReport, CorpusError> {
    verify_paths(&declared.path, declared.case_paths(), root, filter)
}

/// Check a scope against a flat list of declared case paths. Paths outside
/// `scope` are ignored, so the full declared list can be passed for every
/// scope.
pub fn verify_paths<'a, I>(
    scope: &str,
    declared: I,
    root: &Path,
    filter: &dyn DirPredicate,
) -> Result<SyncReport, CorpusError>
where
    I: IntoIterator<Item = &'a str>,
{
    let live_tree = match scan_scope(root, scope, filter)? {
        Some(node) => Some(build(&node)?),
        None => None,
    };
    let live = live_tree
        .as_ref()
        .map(|tree| tree.case_paths())
        .unwrap_or_default();

    let in_scope = declared
        .into_iter()
        .filter(|path| is_within(path, scope) && *path != scope);
    let report = SyncReport::compare(scope, in_scope, live);

    if report.is_clean() {
        debug!("{}", report);
    } else {
        warn!("{}", report);
    }
    Ok(report)
}

/// One report per declared group, parents first. Each check scans its own
/// subtree independently.
pub fn verify_all(
    declared: &TestGroupDescriptor,
    root: &Path,
    filter: &dyn DirPredicate,
) -> Result<Vec<SyncReport>, CorpusError> {
    declared
        .groups()
        .into_iter()
        .map(|group| verify(group, root, filter))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_computes_both_differences() {
        let report = SyncReport::compare(
            "foo",
            ["foo/simple", "foo/withGenerics"],
            ["foo/simple", "foo/inner"],
        );
        assert_eq!(report.missing, BTreeSet::from(["foo/withGenerics".to_string()]));
        assert_eq!(report.extra, BTreeSet::from(["foo/inner".to_string()]));
        assert_eq!(report.declared, 2);
        assert_eq!(report.live, 2);
        assert!(!report.is_clean());
    }

    #[test]
    fn clean_report_converts_to_ok() {
        let report = SyncReport::compare("", ["a"], ["a"]);
        assert!(report.is_clean());
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn drift_message_lists_every_path() {
        let report = SyncReport::compare("", ["a", "b"], ["c"]);
        let message = report.clone().into_result().unwrap_err().to_string();
        assert!(message.contains("out of sync"));
        assert!(message.contains("<root>"));
        assert!(message.contains("- a"));
        assert!(message.contains("- b"));
        assert!(message.contains("+ c"));
    }
}
