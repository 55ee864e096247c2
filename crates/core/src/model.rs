//! Test model: the declared tree of groups and cases built from a scan.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::ident;
use crate::scan::FixtureNode;

/// Result string every fixture program must produce.
pub const SUCCESS_MARKER: &str = "OK";

/// Identifier used for a corpus root whose own name derives nothing.
const FALLBACK_ROOT_IDENTIFIER: &str = "Corpus";

/// A node of the declared tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Descriptor {
    Group(TestGroupDescriptor),
    Case(TestCaseDescriptor),
}

impl Descriptor {
    pub fn path(&self) -> &str {
        match self {
            Descriptor::Group(g) => &g.path,
            Descriptor::Case(c) => &c.path,
        }
    }

    pub fn identifier(&self) -> &str {
        match self {
            Descriptor::Group(g) => &g.identifier,
            Descriptor::Case(c) => &c.identifier,
        }
    }
}

/// A directory with included subdirectories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestGroupDescriptor {
    pub identifier: String,
    /// Relative path of the directory; empty for the corpus root.
    pub path: String,
    /// Identifier of the synthetic all-files-present case of this group.
    pub self_check: String,
    pub children: Vec<Descriptor>,
}

/// A fixture directory: one compile-and-run test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCaseDescriptor {
    pub identifier: String,
    /// Relative path handed verbatim to the fixture runner.
    pub path: String,
    pub expected: String,
}

impl TestGroupDescriptor {
    /// Relative paths of every case below this group, in declaration order.
    pub fn case_paths(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_cases(&mut out);
        out
    }

    fn collect_cases<'a>(&'a self, out: &mut Vec<&'a str>) {
        for child in &self.children {
            match child {
                Descriptor::Case(c) => out.push(&c.path),
                Descriptor::Group(g) => g.collect_cases(out),
            }
        }
    }

    /// This group and every nested group, parents before children.
    pub fn groups(&self) -> Vec<&TestGroupDescriptor> {
        let mut out = vec![self];
        for child in &self.children {
            if let Descriptor::Group(g) = child {
                out.extend(g.groups());
            }
        }
        out
    }

    /// Find the group or case at a relative path below (or at) this group.
    pub fn find(&self, path: &str) -> Option<Found<'_>> {
        if path == self.path {
            return Some(Found::Group(self));
        }
        for child in &self.children {
            match child {
                Descriptor::Case(c) if c.path == path => return Some(Found::Case(c)),
                Descriptor::Group(g) if is_within(path, &g.path) => return g.find(path),
                _ => {}
            }
        }
        None
    }

    /// Number of cases below this group, self-checks excluded.
    pub fn case_count(&self) -> usize {
        self.case_paths().len()
    }
}

/// A lookup result from [`TestGroupDescriptor::find`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Found<'a> {
    Group(&'a TestGroupDescriptor),
    Case(&'a TestCaseDescriptor),
}

/// Whether `path` is `scope` itself or lies below it.
pub fn is_within(path: &str, scope: &str) -> bool {
    scope.is_empty()
        || path == scope
        || (path.starts_with(scope) && path.as_bytes().get(scope.len()) == Some(&b'/'))
}

/// Build the declared tree for a scanned node. The top node is always a
/// group, whatever its shape.
pub fn build(node: &FixtureNode) -> Result<TestGroupDescriptor, ModelError> {
    let mut identifier = ident::group_identifier(&node.name);
    if identifier.is_empty() {
        if !node.path.is_empty() {
            return Err(ModelError::EmptyIdentifier {
                path: node.path.clone(),
            });
        }
        identifier = FALLBACK_ROOT_IDENTIFIER.to_string();
    }
    let group = build_group(node, identifier)?;
    debug!(
        "built group '{}' at '{}' with {} case(s)",
        group.identifier,
        group.path,
        group.case_count()
    );
    Ok(group)
}

fn build_group(node: &FixtureNode, identifier: String) -> Result<TestGroupDescriptor, ModelError> {
    let self_check = ident::self_check_identifier(&identifier);

    // Groups and cases live in separate namespaces, as nested modules and
    // functions do.
    let mut group_names: BTreeMap<String, &str> = BTreeMap::new();
    let mut case_names: BTreeMap<String, &str> = BTreeMap::new();

    let mut children = Vec::with_capacity(node.children.len());
    for child in &node.children {
        if child.is_leaf() {
            let id = ident::case_identifier(&child.name);
            if id.is_empty() {
                return Err(ModelError::EmptyIdentifier {
                    path: child.path.clone(),
                });
            }
            if ident::fold(&id) == ident::fold(&self_check) {
                return Err(ModelError::ReservedIdentifier {
                    identifier: id,
                    path: child.path.clone(),
                });
            }
            claim(&mut case_names, &id, &child.path)?;
            children.push(Descriptor::Case(TestCaseDescriptor {
                identifier: id,
                path: child.path.clone(),
                expected: SUCCESS_MARKER.to_string(),
            }));
        } else {
            let id = ident::group_identifier(&child.name);
            if id.is_empty() {
                return Err(ModelError::EmptyIdentifier {
                    path: child.path.clone(),
                });
            }
            claim(&mut group_names, &id, &child.path)?;
            children.push(Descriptor::Group(build_group(child, id)?));
        }
    }

    Ok(TestGroupDescriptor {
        identifier,
        path: node.path.clone(),
        self_check,
        children,
    })
}

fn claim<'a>(
    seen: &mut BTreeMap<String, &'a str>,
    identifier: &str,
    path: &'a str,
) -> Result<(), ModelError> {
    if let Some(first) = seen.insert(ident::fold(identifier), path) {
        return Err(ModelError::IdentifierCollision {
            identifier: identifier.to_string(),
            first: first.to_string(),
            second: path.to_string(),
        });
    }
    Ok(())
}
