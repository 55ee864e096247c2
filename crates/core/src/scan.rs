//! Corpus scanner: walks a fixture root and yields the tree of included
//! directories.
//!
//! Only directories take part. Files are the fixture's own business, and
//! symbolic links are not followed so the tree stays finite.

use std::fs;
use std::path::Path;

use log::{debug, trace};

use crate::error::DiscoveryError;
use crate::filter::DirPredicate;

/// A directory under the corpus root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureNode {
    /// Path relative to the corpus root, `/`-separated. Empty for the root.
    pub path: String,
    /// Base name of the directory.
    pub name: String,
    /// Included subdirectories, sorted by name.
    pub children: Vec<FixtureNode>,
    /// Terminal by naming convention; never has children.
    pub terminal: bool,
}

impl FixtureNode {
    /// A node is a leaf fixture when nothing included sits beneath it.
    pub fn is_leaf(&self) -> bool {
        self.terminal || self.children.is_empty()
    }

    /// Relative paths of every leaf below this node, in tree order.
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        for child in &self.children {
            child.collect_leaves(&mut out);
        }
        out
    }

    fn collect_leaves(&self, out: &mut Vec<String>) {
        if self.is_leaf() {
            out.push(self.path.clone());
        } else {
            for child in &self.children {
                child.collect_leaves(out);
            }
        }
    }
}

/// Scan the whole corpus under `root`.
pub fn scan(root: &Path, filter: &dyn DirPredicate) -> Result<FixtureNode, DiscoveryError> {
    check_root(root)?;
    // `.` and `..` have no file name of their own.
    let name = root
        .file_name()
        .map(|n| n.to_os_string())
        .or_else(|| root.canonicalize().ok()?.file_name().map(|n| n.to_os_string()))
        .and_then(|n| n.into_string().ok())
        .unwrap_or_default();
    debug!("scanning fixture root {}", root.display());
    let children = scan_children(root, "", filter)?;
    Ok(FixtureNode {
        path: String::new(),
        name,
        children,
        terminal: false,
    })
}

/// Scan only the subtree at `scope` (relative to `root`).
///
/// The root itself must exist. A scope directory that has disappeared yields
/// `None`: every fixture declared under it is gone.
pub fn scan_scope(
    root: &Path,
    scope: &str,
    filter: &dyn DirPredicate,
) -> Result<Option<FixtureNode>, DiscoveryError> {
    if scope.is_empty() {
        return scan(root, filter).map(Some);
    }
    check_root(root)?;
    let dir = root.join(scope);
    // Same rule as the full walk: a symlinked directory is not part of the corpus.
    let is_dir = fs::symlink_metadata(&dir)
        .map(|meta| meta.is_dir())
        .unwrap_or(false);
    if !is_dir {
        debug!("scope '{}' no longer exists under {}", scope, root.display());
        return Ok(None);
    }
    let name = scope.rsplit('/').next().unwrap_or(scope).to_string();
    let children = scan_children(&dir, scope, filter)?;
    Ok(Some(FixtureNode {
        path: scope.to_string(),
        name,
        children,
        terminal: false,
    }))
}

fn check_root(root: &Path) -> Result<(), DiscoveryError> {
    if !root.exists() {
        return Err(DiscoveryError::RootNotFound {
            root: root.to_path_buf(),
        });
    }
    if !root.is_dir() {
        return Err(DiscoveryError::NotADirectory {
            root: root.to_path_buf(),
        });
    }
    Ok(())
}

fn scan_children(
    dir: &Path,
    rel: &str,
    filter: &dyn DirPredicate,
) -> Result<Vec<FixtureNode>, DiscoveryError> {
    let io_err = |source| DiscoveryError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        if !entry.file_type().map_err(io_err)?.is_dir() {
            continue;
        }
        let name = entry
            .file_name()
            .into_string()
            .map_err(|_| DiscoveryError::NonUtf8Name { path: entry.path() })?;
        if !filter.includes(&name) {
            trace!("skipping excluded directory {}", entry.path().display());
            continue;
        }
        names.push(name);
    }
    names.sort();

    let mut children = Vec::with_capacity(names.len());
    for name in names {
        let path = if rel.is_empty() {
            name.clone()
        } else {
            format!("{}/{}", rel, name)
        };
        let terminal = filter.is_terminal(&name);
        let grandchildren = if terminal {
            Vec::new()
        } else {
            scan_children(&dir.join(&name), &path, filter)?
        };
        children.push(FixtureNode {
            path,
            name,
            children: grandchildren,
            terminal,
        });
    }
    Ok(children)
}
