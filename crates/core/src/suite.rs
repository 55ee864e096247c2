//! Flattening a declared tree into runnable cases, and running them.
//!
//! Every group contributes its synthetic self-check ahead of its children.
//! A self-check fails only its own case; a corpus that cannot be scanned or
//! modeled aborts the run.

use std::path::Path;

use log::{info, warn};

use crate::error::{CorpusError, DriftError, ExecutionError};
use crate::exec::FixtureRunner;
use crate::filter::DirPredicate;
use crate::model::{Descriptor, Found, TestCaseDescriptor, TestGroupDescriptor};
use crate::verify::verify;

/// What a planned case does when run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseKind<'a> {
    /// Synthetic all-files-present check for a group.
    SelfCheck(&'a TestGroupDescriptor),
    /// Compile-and-run of one fixture.
    Fixture(&'a TestCaseDescriptor),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCase<'a> {
    /// Dotted path of identifiers, e.g. `BoxWithJava.Foo.testSimple`.
    pub name: String,
    pub kind: CaseKind<'a>,
}

/// Why a single case failed.
#[derive(Debug, thiserror::Error)]
pub enum CaseFailure {
    #[error(transparent)]
    Drift(#[from] DriftError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

#[derive(Debug)]
pub struct CaseResult {
    pub name: String,
    pub outcome: Result<(), CaseFailure>,
}

impl CaseResult {
    pub fn passed(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Plan the whole tree, or only the group or case at `scope`.
///
/// Returns `None` when `scope` names nothing in the declared tree.
pub fn plan<'a>(tree: &'a TestGroupDescriptor, scope: Option<&str>) -> Option<Vec<PlannedCase<'a>>> {
    let mut out = Vec::new();
    match scope {
        None => plan_group(tree, &tree.identifier, &mut out),
        Some(path) => {
            let prefix = qualified_prefix(tree, path);
            match tree.find(path)? {
                Found::Group(group) => plan_group(group, &prefix, &mut out),
                Found::Case(case) => out.push(PlannedCase {
                    name: prefix,
                    kind: CaseKind::Fixture(case),
                }),
            }
        }
    }
    Some(out)
}

fn plan_group<'a>(group: &'a TestGroupDescriptor, name: &str, out: &mut Vec<PlannedCase<'a>>) {
    out.push(PlannedCase {
        name: format!("{}.{}", name, group.self_check),
        kind: CaseKind::SelfCheck(group),
    });
    for child in &group.children {
        match child {
            Descriptor::Case(case) => out.push(PlannedCase {
                name: format!("{}.{}", name, case.identifier),
                kind: CaseKind::Fixture(case),
            }),
            Descriptor::Group(sub) => {
                plan_group(sub, &format!("{}.{}", name, sub.identifier), out);
            }
        }
    }
}

/// Dotted identifier path from the root down to the node at `path`.
fn qualified_prefix(tree: &TestGroupDescriptor, path: &str) -> String {
    let mut name = tree.identifier.clone();
    let mut group = tree;
    'descend: while group.path != path {
        for child in &group.children {
            match child {
                Descriptor::Group(sub) if crate::model::is_within(path, &sub.path) => {
                    name.push('.');
                    name.push_str(&sub.identifier);
                    group = sub;
                    continue 'descend;
                }
                Descriptor::Case(case) if case.path == path => {
                    name.push('.');
                    name.push_str(&case.identifier);
                    break 'descend;
                }
                _ => {}
            }
        }
        break;
    }
    name
}

/// Run one planned case.
pub fn run_case(
    case: &PlannedCase<'_>,
    root: &Path,
    filter: &dyn DirPredicate,
    runner: &dyn FixtureRunner,
) -> Result<CaseResult, CorpusError> {
    let outcome = match case.kind {
        CaseKind::SelfCheck(group) => verify(group, root, filter)?
            .into_result()
            .map_err(CaseFailure::from),
        CaseKind::Fixture(fixture) => runner
            .run_fixture(&fixture.path)
            .into_result(&fixture.path)
            .map_err(CaseFailure::from),
    };
    if let Err(e) = &outcome {
        warn!("{} failed: {}", case.name, e);
    }
    Ok(CaseResult {
        name: case.name.clone(),
        outcome,
    })
}

/// Run every planned case in order. Stops only when the corpus itself cannot
/// be scanned or modeled.
pub fn run_suite(
    plan: &[PlannedCase<'_>],
    root: &Path,
    filter: &dyn DirPredicate,
    runner: &dyn FixtureRunner,
) -> Result<Vec<CaseResult>, CorpusError> {
    let mut results = Vec::with_capacity(plan.len());
    for case in plan {
        results.push(run_case(case, root, filter, runner)?);
    }
    let failed = results.iter().filter(|r| !r.passed()).count();
    info!("ran {} case(s), {} failed", results.len(), failed);
    Ok(results)
}
