mod commands;
mod config;
mod tap;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Config;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Keeps compile-and-run test suites in sync with their fixture corpora.
#[derive(Parser)]
#[command(
    name = "boxtest",
    version,
    about = "Fixture corpus synchronization for compile-and-run test suites"
)]
struct Cli {
    /// Path to the suite configuration file
    #[arg(long, global = true, default_value = "boxtest.toml")]
    config: PathBuf,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log scanning and verification progress to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a fixture root and print the test tree it declares
    Scan {
        /// Fixture corpus root directory
        root: PathBuf,
        /// Characters that exclude a directory name
        #[arg(long, default_value = ".")]
        exclude_chars: String,
        /// Directory name to exclude (repeatable)
        #[arg(long = "exclude")]
        exclude_names: Vec<String>,
        /// Name suffix marking a directory as a fixture (repeatable)
        #[arg(long = "terminal-suffix")]
        terminal_suffixes: Vec<String>,
    },

    /// Regenerate each suite's baseline (and test listing, when configured)
    Generate {
        /// Only this suite
        #[arg(long)]
        suite: Option<String>,
        /// Write nothing; fail if any generated output is stale
        #[arg(long)]
        check: bool,
    },

    /// Check every declared group against the fixture corpus
    Verify {
        /// Only this suite
        #[arg(long)]
        suite: Option<String>,
        /// Only the group at this path relative to the corpus root
        #[arg(long)]
        scope: Option<String>,
    },

    /// Run every declared case, self-checks included, and report TAP
    Test {
        /// Only this suite
        #[arg(long)]
        suite: Option<String>,
        /// Only the group or fixture at this path relative to the corpus root
        #[arg(long)]
        scope: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Scan {
            root,
            exclude_chars,
            exclude_names,
            terminal_suffixes,
        } => {
            let filter = boxtest_core::DirFilter {
                exclude_chars,
                exclude_names,
                terminal_suffixes,
            };
            commands::cmd_scan(&root, &filter, cli.output, cli.quiet);
        }
        Commands::Generate { suite, check } => {
            let config = load_config(&cli.config, cli.output, cli.quiet);
            commands::cmd_generate(&config, suite.as_deref(), check, cli.output, cli.quiet);
        }
        Commands::Verify { suite, scope } => {
            let config = load_config(&cli.config, cli.output, cli.quiet);
            commands::cmd_verify(
                &config,
                suite.as_deref(),
                scope.as_deref(),
                cli.output,
                cli.quiet,
            );
        }
        Commands::Test { suite, scope } => {
            let config = load_config(&cli.config, cli.output, cli.quiet);
            commands::cmd_test(
                &config,
                suite.as_deref(),
                scope.as_deref(),
                cli.output,
                cli.quiet,
            );
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "error" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn load_config(path: &Path, output: OutputFormat, quiet: bool) -> Config {
    match Config::load(path) {
        Ok(config) => config,
        Err(e) => {
            report_error(&format!("error: {}", e), output, quiet);
            process::exit(1);
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
