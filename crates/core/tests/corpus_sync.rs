//! End-to-end synchronization tests over temporary fixture corpora.
//!
//! Each test lays out a corpus on disk, records a baseline, mutates the
//! corpus and checks what the verifier and the suite runner report.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use boxtest_core::suite::{plan, run_suite, CaseFailure};
use boxtest_core::{
    verify, verify_all, Baseline, CorpusError, DirFilter, DiscoveryError, Found, ModelError,
    Outcome,
};
use tempfile::TempDir;

fn corpus(dirs: &[&str]) -> TempDir {
    let tmp = tempfile::tempdir().expect("temp dir");
    for d in dirs {
        let dir = tmp.path().join("box").join(d);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("box.kt"), "fun box(): String = \"OK\"\n").unwrap();
    }
    tmp
}

fn root(tmp: &TempDir) -> std::path::PathBuf {
    tmp.path().join("box")
}

fn baseline(tmp: &TempDir) -> Baseline {
    Baseline::generate(&root(tmp), "box", &DirFilter::default()).expect("baseline")
}

fn set(paths: &[&str]) -> BTreeSet<String> {
    paths.iter().map(|p| p.to_string()).collect()
}

/// Passes when the fixture directory still holds its source file.
fn disk_runner(root: &Path) -> impl Fn(&str) -> Outcome + '_ {
    move |path: &str| {
        if root.join(path).join("box.kt").exists() {
            Outcome::Success
        } else {
            Outcome::CompileError(format!("no sources in {}", path))
        }
    }
}

const EXAMPLE: &[&str] = &["foo/simple", "foo/withGenerics", "bar/plain"];

#[test]
fn generation_is_idempotent() {
    let tmp = corpus(EXAMPLE);
    let first = baseline(&tmp);
    let second = baseline(&tmp);
    assert_eq!(first, second);
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}

#[test]
fn unchanged_corpus_verifies_clean() {
    let tmp = corpus(EXAMPLE);
    let declared = baseline(&tmp);
    let reports = verify_all(&declared.tree, &root(&tmp), &DirFilter::default()).unwrap();
    assert_eq!(reports.len(), 3);
    assert!(reports.iter().all(|r| r.is_clean()), "{:?}", reports);
}

#[test]
fn added_directory_is_extra() {
    let tmp = corpus(EXAMPLE);
    let declared = baseline(&tmp);
    fs::create_dir_all(root(&tmp).join("foo/withVarargs")).unwrap();

    let report = verify(&declared.tree, &root(&tmp), &DirFilter::default()).unwrap();
    assert_eq!(report.extra, set(&["foo/withVarargs"]));
    assert!(report.missing.is_empty());
}

#[test]
fn removed_leaf_is_missing() {
    let tmp = corpus(EXAMPLE);
    let declared = baseline(&tmp);
    fs::remove_dir_all(root(&tmp).join("bar/plain")).unwrap();

    let report = verify(&declared.tree, &root(&tmp), &DirFilter::default()).unwrap();
    assert_eq!(report.missing, set(&["bar/plain"]));
    assert!(report.extra.is_empty());
}

#[test]
fn both_halves_are_reported_together() {
    let tmp = corpus(EXAMPLE);
    let declared = baseline(&tmp);
    fs::remove_dir_all(root(&tmp).join("bar/plain")).unwrap();
    fs::create_dir_all(root(&tmp).join("baz/fresh")).unwrap();

    let report = verify(&declared.tree, &root(&tmp), &DirFilter::default()).unwrap();
    assert_eq!(report.missing, set(&["bar/plain"]));
    assert_eq!(report.extra, set(&["baz/fresh"]));
    let message = report.to_string();
    assert!(message.contains("bar/plain") && message.contains("baz/fresh"));
}

#[test]
fn excluded_directories_never_surface() {
    let tmp = corpus(EXAMPLE);
    let declared = baseline(&tmp);
    fs::create_dir_all(root(&tmp).join("foo/helpers.lib/nested")).unwrap();
    fs::create_dir_all(root(&tmp).join(".idea/inner")).unwrap();

    assert!(!declared.to_json().unwrap().contains("helpers"));
    let reports = verify_all(&declared.tree, &root(&tmp), &DirFilter::default()).unwrap();
    assert!(reports.iter().all(|r| r.is_clean()));
}

#[test]
fn leaf_gaining_a_subdirectory_becomes_a_group() {
    let tmp = corpus(EXAMPLE);
    let declared = baseline(&tmp);
    fs::create_dir_all(root(&tmp).join("foo/simple/variant")).unwrap();

    let report = verify(&declared.tree, &root(&tmp), &DirFilter::default()).unwrap();
    assert_eq!(report.missing, set(&["foo/simple"]));
    assert_eq!(report.extra, set(&["foo/simple/variant"]));
}

#[test]
fn vanished_group_reports_all_its_cases_missing() {
    let tmp = corpus(EXAMPLE);
    let declared = baseline(&tmp);
    fs::remove_dir_all(root(&tmp).join("foo")).unwrap();

    let Some(Found::Group(foo)) = declared.tree.find("foo") else {
        panic!("foo should be declared as a group");
    };
    let report = verify(foo, &root(&tmp), &DirFilter::default()).unwrap();
    assert_eq!(report.missing, set(&["foo/simple", "foo/withGenerics"]));
    assert_eq!(report.live, 0);
}

#[test]
fn missing_root_aborts_verification() {
    let tmp = corpus(EXAMPLE);
    let declared = baseline(&tmp);
    fs::remove_dir_all(root(&tmp)).unwrap();

    let err = verify(&declared.tree, &root(&tmp), &DirFilter::default()).unwrap_err();
    assert!(matches!(
        err,
        CorpusError::Discovery(DiscoveryError::RootNotFound { .. })
    ));
}

#[test]
fn colliding_siblings_abort_generation() {
    let tmp = corpus(&["generics/with_bounds", "generics/withBounds"]);
    let err = Baseline::generate(&root(&tmp), "box", &DirFilter::default()).unwrap_err();
    match err {
        CorpusError::Model(ModelError::IdentifierCollision { first, second, .. }) => {
            assert_eq!(first, "generics/withBounds");
            assert_eq!(second, "generics/with_bounds");
        }
        other => panic!("expected a collision, got {:?}", other),
    }
}

#[test]
fn deleting_a_fixture_fails_only_its_group_self_check() {
    let tmp = corpus(EXAMPLE);
    let declared = baseline(&tmp);
    fs::remove_dir_all(root(&tmp).join("foo/withGenerics")).unwrap();

    let cases = plan(&declared.tree, None).unwrap();
    let root_dir = root(&tmp);
    let runner = disk_runner(&root_dir);
    let results = run_suite(&cases, &root(&tmp), &DirFilter::default(), &runner).unwrap();

    let failed: Vec<&str> = results
        .iter()
        .filter(|r| !r.passed())
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(
        failed,
        [
            "Box.testAllFilesPresentInBox",
            "Box.Foo.testAllFilesPresentInFoo",
            "Box.Foo.testWithGenerics",
        ]
    );

    let foo_check = results
        .iter()
        .find(|r| r.name == "Box.Foo.testAllFilesPresentInFoo")
        .unwrap();
    match &foo_check.outcome {
        Err(CaseFailure::Drift(drift)) => {
            assert_eq!(drift.report.missing, set(&["foo/withGenerics"]));
            assert!(drift.report.extra.is_empty());
        }
        other => panic!("expected drift, got {:?}", other),
    }

    let simple = results
        .iter()
        .find(|r| r.name == "Box.Foo.testSimple")
        .unwrap();
    assert!(simple.passed());

    let bar_check = results
        .iter()
        .find(|r| r.name == "Box.Bar.testAllFilesPresentInBar")
        .unwrap();
    assert!(bar_check.passed());
}

#[test]
fn scoped_run_stays_local() {
    let tmp = corpus(EXAMPLE);
    let declared = baseline(&tmp);
    fs::create_dir_all(root(&tmp).join("foo/added")).unwrap();

    let cases = plan(&declared.tree, Some("bar")).unwrap();
    let root_dir = root(&tmp);
    let runner = disk_runner(&root_dir);
    let results = run_suite(&cases, &root(&tmp), &DirFilter::default(), &runner).unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.passed()));
}

#[test]
fn execution_failures_stay_with_their_case() {
    let tmp = corpus(EXAMPLE);
    let declared = baseline(&tmp);

    let cases = plan(&declared.tree, None).unwrap();
    let runner = |path: &str| {
        if path == "bar/plain" {
            Outcome::RuntimeFailure("Fail: expected 1".to_string())
        } else {
            Outcome::Success
        }
    };
    let results = run_suite(&cases, &root(&tmp), &DirFilter::default(), &runner).unwrap();

    let failed: Vec<&str> = results
        .iter()
        .filter(|r| !r.passed())
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(failed, ["Box.Bar.testPlain"]);
    assert!(matches!(
        results.iter().find(|r| !r.passed()).unwrap().outcome,
        Err(CaseFailure::Execution(_))
    ));
}

#[test]
fn corpus_errors_abort_the_run() {
    let tmp = corpus(EXAMPLE);
    let declared = baseline(&tmp);
    fs::remove_dir_all(root(&tmp)).unwrap();

    let cases = plan(&declared.tree, None).unwrap();
    let runner = |_: &str| Outcome::Success;
    let err = run_suite(&cases, &root(&tmp), &DirFilter::default(), &runner).unwrap_err();
    assert!(matches!(err, CorpusError::Discovery(_)));
}

#[test]
fn custom_predicate_replaces_the_dot_rule() {
    let tmp = corpus(&["kt1234.regression", "plain", "skip_me/inner"]);
    let filter = |name: &str| !name.starts_with("skip_");
    let declared = Baseline::generate(&root(&tmp), "box", &filter).unwrap();
    assert_eq!(
        declared.tree.case_paths(),
        ["kt1234.regression", "plain"]
    );
    let report = verify(&declared.tree, &root(&tmp), &filter).unwrap();
    assert!(report.is_clean());
}
