//! The persisted declared tree.
//!
//! A baseline is regenerated as a whole and written atomically, so a
//! verification run never reads a half-written file.

use std::fs;
use std::io::Write;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{BaselineError, CorpusError};
use crate::filter::DirPredicate;
use crate::ident;
use crate::model::{build, Descriptor, TestGroupDescriptor};
use crate::scan::scan;

/// Current on-disk format version.
pub const BASELINE_FORMAT: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Baseline {
    pub format: u32,
    /// Corpus root as written in the configuration, for readers of the file.
    pub root: String,
    pub tree: TestGroupDescriptor,
}

impl Baseline {
    /// Scan and model the corpus at `root`.
    pub fn generate(
        root: &Path,
        root_label: &str,
        filter: &dyn DirPredicate,
    ) -> Result<Self, CorpusError> {
        let node = scan(root, filter)?;
        let tree = build(&node)?;
        info!(
            "modeled {} fixture(s) in {} group(s) under {}",
            tree.case_count(),
            tree.groups().len(),
            root.display()
        );
        Ok(Baseline {
            format: BASELINE_FORMAT,
            root: root_label.replace('\\', "/"),
            tree,
        })
    }

    /// Deterministic serialization: pretty JSON with a trailing newline.
    pub fn to_json(&self) -> Result<String, BaselineError> {
        let mut out = serde_json::to_string_pretty(self).map_err(BaselineError::Serialize)?;
        out.push('\n');
        Ok(out)
    }

    pub fn load(path: &Path) -> Result<Self, BaselineError> {
        let src = fs::read_to_string(path).map_err(|source| BaselineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let baseline: Baseline =
            serde_json::from_str(&src).map_err(|source| BaselineError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        if baseline.format != BASELINE_FORMAT {
            return Err(BaselineError::UnsupportedFormat {
                path: path.to_path_buf(),
                found: baseline.format,
                expected: BASELINE_FORMAT,
            });
        }
        check_consistency(&baseline.tree).map_err(|message| BaselineError::Inconsistent {
            path: path.to_path_buf(),
            message,
        })?;
        debug!(
            "loaded baseline {} ({} case(s))",
            path.display(),
            baseline.tree.case_count()
        );
        Ok(baseline)
    }

    /// Replace `path` with this baseline in one rename.
    pub fn write(&self, path: &Path) -> Result<(), BaselineError> {
        write_atomically(path, &self.to_json()?)
    }

    /// Whether the file at `path` differs from this baseline's serialization.
    /// A missing file is stale.
    pub fn is_stale(&self, path: &Path) -> Result<bool, BaselineError> {
        is_stale(path, &self.to_json()?)
    }
}

/// Write `contents` to `path` through a temporary file in the same
/// directory.
pub fn write_atomically(path: &Path, contents: &str) -> Result<(), BaselineError> {
    let io_err = |source| BaselineError::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(io_err)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(contents.as_bytes()).map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}

/// Whether the file at `path` differs from `expected`. A missing file is
/// stale.
pub fn is_stale(path: &Path, expected: &str) -> Result<bool, BaselineError> {
    match fs::read_to_string(path) {
        Ok(current) => Ok(current != expected),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(true),
        Err(source) => Err(BaselineError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn check_consistency(group: &TestGroupDescriptor) -> Result<(), String> {
    let expected = ident::self_check_identifier(&group.identifier);
    if group.self_check != expected {
        return Err(format!(
            "group '{}' declares self-check '{}', expected '{}'",
            group.path, group.self_check, expected
        ));
    }
    for child in &group.children {
        if let Descriptor::Group(g) = child {
            check_consistency(g)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::DirFilter;

    fn corpus() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        for d in ["box/foo/simple", "box/foo/withGenerics", "box/bar/plain"] {
            fs::create_dir_all(tmp.path().join(d)).unwrap();
        }
        tmp
    }

    #[test]
    fn write_then_load_preserves_tree() {
        let tmp = corpus();
        let baseline =
            Baseline::generate(&tmp.path().join("box"), "box", &DirFilter::default()).unwrap();
        let path = tmp.path().join("out/box.baseline.json");
        baseline.write(&path).unwrap();

        let loaded = Baseline::load(&path).unwrap();
        assert_eq!(loaded, baseline);
        assert!(!baseline.is_stale(&path).unwrap());
    }

    #[test]
    fn serialization_is_tagged_and_ends_with_newline() {
        let tmp = corpus();
        let baseline =
            Baseline::generate(&tmp.path().join("box"), "box", &DirFilter::default()).unwrap();
        let json = baseline.to_json().unwrap();
        assert!(json.ends_with("}\n"));
        assert!(json.contains("\"kind\": \"group\""));
        assert!(json.contains("\"kind\": \"case\""));
        assert!(json.contains("\"self_check\": \"testAllFilesPresentInFoo\""));
    }

    #[test]
    fn missing_file_is_stale() {
        let tmp = corpus();
        let baseline =
            Baseline::generate(&tmp.path().join("box"), "box", &DirFilter::default()).unwrap();
        assert!(baseline.is_stale(&tmp.path().join("nope.json")).unwrap());
    }

    #[test]
    fn unknown_format_is_rejected() {
        let tmp = corpus();
        let mut baseline =
            Baseline::generate(&tmp.path().join("box"), "box", &DirFilter::default()).unwrap();
        baseline.format = 99;
        let path = tmp.path().join("future.json");
        fs::write(&path, baseline.to_json().unwrap()).unwrap();

        let err = Baseline::load(&path).unwrap_err();
        assert!(matches!(err, BaselineError::UnsupportedFormat { found: 99, .. }));
    }

    #[test]
    fn tampered_self_check_is_rejected() {
        let tmp = corpus();
        let mut baseline =
            Baseline::generate(&tmp.path().join("box"), "box", &DirFilter::default()).unwrap();
        baseline.tree.self_check = "testSomethingElse".to_string();
        let path = tmp.path().join("tampered.json");
        fs::write(&path, baseline.to_json().unwrap()).unwrap();

        let err = Baseline::load(&path).unwrap_err();
        assert!(matches!(err, BaselineError::Inconsistent { .. }));
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let tmp = corpus();
        let path = tmp.path().join("garbage.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            Baseline::load(&path).unwrap_err(),
            BaselineError::Parse { .. }
        ));
    }
}
