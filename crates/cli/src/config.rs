//! `boxtest.toml`: the suites a project keeps in sync.
//!
//! Relative paths in the file are resolved against the file's directory.

use std::path::{Path, PathBuf};

use boxtest_core::{CommandRunner, DirFilter, SUCCESS_MARKER};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("config {} declares no suites", path.display())]
    NoSuites { path: PathBuf },

    #[error("duplicate suite name '{0}'")]
    DuplicateSuite(String),

    #[error("no suite named '{0}'")]
    UnknownSuite(String),

    #[error("suite '{0}' has no runner command configured")]
    NoRunner(String),
}

/// Top-level wrapper matching the `[[suite]]` tables.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    suite: Vec<SuiteEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct SuiteEntry {
    name: String,
    root: String,
    baseline: String,
    rust_out: Option<String>,
    #[serde(default)]
    runner: Vec<String>,
    sentinel: Option<String>,
    #[serde(default)]
    filter: DirFilter,
}

/// One suite with its paths resolved.
#[derive(Debug, Clone)]
pub struct Suite {
    pub name: String,
    /// Root as written in the config; recorded in the baseline.
    pub root_label: String,
    pub root: PathBuf,
    pub baseline: PathBuf,
    pub rust_out: Option<PathBuf>,
    pub runner: Vec<String>,
    pub sentinel: String,
    pub filter: DirFilter,
}

impl Suite {
    pub fn command_runner(&self) -> Result<CommandRunner, ConfigError> {
        CommandRunner::new(&self.runner, &self.root)
            .map(|runner| runner.with_sentinel(self.sentinel.clone()))
            .ok_or_else(|| ConfigError::NoRunner(self.name.clone()))
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub suites: Vec<Suite>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let src = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Self::parse(&src, path, base)
    }

    fn parse(src: &str, path: &Path, base: &Path) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(src).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if file.suite.is_empty() {
            return Err(ConfigError::NoSuites {
                path: path.to_path_buf(),
            });
        }

        let mut suites: Vec<Suite> = Vec::with_capacity(file.suite.len());
        for entry in file.suite {
            if suites.iter().any(|s| s.name == entry.name) {
                return Err(ConfigError::DuplicateSuite(entry.name));
            }
            // Runner arguments that name files in the project resolve like
            // every other path; bare program names are left for PATH lookup.
            let runner = entry
                .runner
                .iter()
                .map(|arg| {
                    let candidate = base.join(arg);
                    if arg.contains('/') && candidate.exists() {
                        candidate.to_string_lossy().into_owned()
                    } else {
                        arg.clone()
                    }
                })
                .collect();
            suites.push(Suite {
                root: base.join(&entry.root),
                baseline: base.join(&entry.baseline),
                rust_out: entry.rust_out.as_ref().map(|p| base.join(p)),
                root_label: entry.root,
                runner,
                sentinel: entry
                    .sentinel
                    .unwrap_or_else(|| SUCCESS_MARKER.to_string()),
                filter: entry.filter,
                name: entry.name,
            });
        }
        Ok(Config { suites })
    }

    /// The named suite, or every suite when no name is given.
    pub fn select(&self, name: Option<&str>) -> Result<Vec<&Suite>, ConfigError> {
        match name {
            None => Ok(self.suites.iter().collect()),
            Some(name) => self
                .suites
                .iter()
                .find(|s| s.name == name)
                .map(|s| vec![s])
                .ok_or_else(|| ConfigError::UnknownSuite(name.to_string())),
        }
    }
}
