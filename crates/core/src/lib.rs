//! boxtest-core: keeps a declared test surface truthful against a fixture
//! corpus.
//!
//! A corpus is a directory tree in which every leaf directory is one
//! compile-and-run fixture and every inner directory groups fixtures. The
//! pipeline is:
//!
//! - [`scan()`] -- walk the corpus root into a [`FixtureNode`] tree
//! - [`build()`] -- derive the declared [`TestGroupDescriptor`] tree
//! - [`verify()`] -- rescan a group's subtree and diff it against the
//!   declared cases, yielding a [`SyncReport`]
//!
//! Around it sit the [`Baseline`] (the declared tree persisted as JSON), the
//! [`emit::render_rust`] listing generator, the [`FixtureRunner`] bridge to
//! whatever compiles and runs a fixture, and [`suite`] for planning and
//! running every case, self-checks included.

pub mod baseline;
pub mod emit;
pub mod error;
pub mod exec;
pub mod filter;
pub mod harness;
pub mod ident;
pub mod model;
pub mod scan;
pub mod suite;
pub mod verify;

// ── Convenience re-exports ───────────────────────────────────────────

pub use baseline::{Baseline, BASELINE_FORMAT};
pub use error::{
    BaselineError, CorpusError, DiscoveryError, DriftError, ExecutionError, ModelError,
};
pub use exec::{CommandRunner, FixtureRunner, Outcome};
pub use filter::{DirFilter, DirPredicate};
pub use model::{
    build, Descriptor, Found, TestCaseDescriptor, TestGroupDescriptor, SUCCESS_MARKER,
};
pub use scan::{scan, scan_scope, FixtureNode};
pub use verify::{verify, verify_all, verify_paths, SyncReport};
