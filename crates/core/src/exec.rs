//! Bridge to whatever compiles and runs a fixture.
//!
//! The core never compiles anything itself. It hands a runner the relative
//! fixture path recorded in the declared tree and interprets the outcome.

use std::path::PathBuf;
use std::process::Command;

use log::debug;

use crate::error::ExecutionError;
use crate::model::SUCCESS_MARKER;

/// Exit status a runner command uses to report a compilation failure.
pub const COMPILE_ERROR_STATUS: i32 = 2;

/// Result of compiling and running one fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    CompileError(String),
    RuntimeFailure(String),
}

impl Outcome {
    pub fn into_result(self, path: &str) -> Result<(), ExecutionError> {
        match self {
            Outcome::Success => Ok(()),
            Outcome::CompileError(detail) => Err(ExecutionError::Compile {
                path: path.to_string(),
                detail,
            }),
            Outcome::RuntimeFailure(detail) => Err(ExecutionError::Runtime {
                path: path.to_string(),
                detail,
            }),
        }
    }
}

/// Compiles and runs the fixture at a path relative to the corpus root.
pub trait FixtureRunner {
    fn run_fixture(&self, relative_path: &str) -> Outcome;
}

impl<F> FixtureRunner for F
where
    F: Fn(&str) -> Outcome,
{
    fn run_fixture(&self, relative_path: &str) -> Outcome {
        self(relative_path)
    }
}

/// Runs an external command per fixture.
///
/// The command gets the absolute fixture directory as its last argument and
/// the relative path in `BOXTEST_FIXTURE`. Exit status 0 means stdout holds
/// the program result, which must equal the sentinel; status 2 is a compile
/// error; anything else is a runtime failure.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    pub program: String,
    pub args: Vec<String>,
    pub root: PathBuf,
    pub sentinel: String,
}

impl CommandRunner {
    /// `command` is the program followed by its leading arguments.
    pub fn new(command: &[String], root: impl Into<PathBuf>) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(CommandRunner {
            program: program.clone(),
            args: args.to_vec(),
            root: root.into(),
            sentinel: SUCCESS_MARKER.to_string(),
        })
    }

    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.sentinel = sentinel.into();
        self
    }
}

impl FixtureRunner for CommandRunner {
    fn run_fixture(&self, relative_path: &str) -> Outcome {
        let fixture = self.root.join(relative_path);
        let fixture = std::path::absolute(&fixture).unwrap_or(fixture);
        debug!("running {} {:?} {}", self.program, self.args, fixture.display());

        let output = match Command::new(&self.program)
            .args(&self.args)
            .arg(&fixture)
            .env("BOXTEST_FIXTURE", relative_path)
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                return Outcome::RuntimeFailure(format!(
                    "cannot launch runner '{}': {}",
                    self.program, e
                ))
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        match output.status.code() {
            Some(0) => {
                let result = stdout.trim();
                if result == self.sentinel {
                    Outcome::Success
                } else {
                    Outcome::RuntimeFailure(format!(
                        "expected \"{}\", got \"{}\"",
                        self.sentinel, result
                    ))
                }
            }
            Some(COMPILE_ERROR_STATUS) => Outcome::CompileError(stderr.trim().to_string()),
            Some(code) => {
                Outcome::RuntimeFailure(format!("exit status {}: {}", code, stderr.trim()))
            }
            None => Outcome::RuntimeFailure(format!("terminated by signal: {}", stderr.trim())),
        }
    }
}
