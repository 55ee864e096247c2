use std::path::PathBuf;

use crate::verify::SyncReport;

/// The corpus root (or a directory under it) could not be walked.
///
/// Fatal: no partial tree is returned and the whole run is aborted.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("fixture root does not exist: {}", root.display())]
    RootNotFound { root: PathBuf },

    #[error("fixture root is not a directory: {}", root.display())]
    NotADirectory { root: PathBuf },

    #[error("cannot read directory {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory names become test identifiers, so they must be valid UTF-8.
    #[error("directory name is not valid UTF-8: {}", path.display())]
    NonUtf8Name { path: PathBuf },
}

/// The scanned corpus cannot be turned into an unambiguous test model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Two siblings of the same kind derive the same identifier after
    /// case-folding. A group and a case may share a folded identifier: the
    /// group becomes a module and the case a function, which Rust keeps in
    /// separate namespaces.
    #[error("identifier collision on '{identifier}': '{first}' and '{second}'")]
    IdentifierCollision {
        identifier: String,
        first: String,
        second: String,
    },

    #[error("directory '{path}' has no alphanumeric characters to derive an identifier from")]
    EmptyIdentifier { path: String },

    /// A fixture whose method name would shadow its group's self-check.
    #[error("fixture '{path}' derives reserved identifier '{identifier}'")]
    ReservedIdentifier { identifier: String, path: String },
}

/// Errors that mean the corpus itself cannot be modeled. Both abort a
/// generation or verification run globally.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// A non-empty [`SyncReport`]: the declared tests and the corpus disagree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{report}")]
pub struct DriftError {
    pub report: SyncReport,
}

/// A single fixture failed to compile or did not produce the success marker.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error("fixture '{path}' failed to compile: {detail}")]
    Compile { path: String, detail: String },

    #[error("fixture '{path}' failed at runtime: {detail}")]
    Runtime { path: String, detail: String },
}

/// Reading or writing a persisted baseline failed.
#[derive(Debug, thiserror::Error)]
pub enum BaselineError {
    #[error("cannot access baseline {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid baseline JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot serialize baseline: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("baseline {} has format {found}, expected {expected}", path.display())]
    UnsupportedFormat {
        path: PathBuf,
        found: u32,
        expected: u32,
    },

    #[error("baseline {} is inconsistent: {message}", path.display())]
    Inconsistent { path: PathBuf, message: String },
}
