//! Assertions for generated test listings.
//!
//! A listing produced by [`crate::emit::render_rust`] calls two functions it
//! expects in scope, `run_fixture(path)` and `all_files_present(scope,
//! declared)`. [`fixture_harness!`](crate::fixture_harness) defines both on
//! top of the assertions here.

use std::path::Path;

use crate::exec::FixtureRunner;
use crate::filter::DirPredicate;
use crate::verify::verify_paths;

/// Panic unless the fixture at `path` compiles and produces the sentinel.
pub fn assert_fixture_passes(runner: &dyn FixtureRunner, path: &str) {
    if let Err(e) = runner.run_fixture(path).into_result(path) {
        panic!("{}", e);
    }
}

/// Panic unless the declared case paths under `scope` match the corpus.
pub fn assert_all_files_present(
    root: &Path,
    scope: &str,
    declared: &[&str],
    filter: &dyn DirPredicate,
) {
    let report = match verify_paths(scope, declared.iter().copied(), root, filter) {
        Ok(report) => report,
        Err(e) => panic!("cannot check fixtures under {}: {}", root.display(), e),
    };
    if let Err(drift) = report.into_result() {
        panic!("{}\nregenerate the test listing to pick up the change", drift);
    }
}

/// Define the `run_fixture` and `all_files_present` functions a generated
/// listing calls.
///
/// ```rust,ignore
/// boxtest_core::fixture_harness! {
///     root: concat!(env!("CARGO_MANIFEST_DIR"), "/testdata/box"),
///     filter: boxtest_core::DirFilter::default(),
///     runner: my_runner(),
/// }
///
/// include!("generated/box.rs");
/// ```
///
/// `filter` and `runner` are evaluated afresh for each test.
#[macro_export]
macro_rules! fixture_harness {
    (root: $root:expr, filter: $filter:expr, runner: $runner:expr $(,)?) => {
        #[allow(dead_code)]
        fn run_fixture(path: &str) {
            let runner = $runner;
            $crate::harness::assert_fixture_passes(&runner, path);
        }

        #[allow(dead_code)]
        fn all_files_present(scope: &str, declared: &[&str]) {
            let filter = $filter;
            $crate::harness::assert_all_files_present(
                ::std::path::Path::new($root),
                scope,
                declared,
                &filter,
            );
        }
    };
}
