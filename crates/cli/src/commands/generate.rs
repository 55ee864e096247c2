use std::path::PathBuf;
use std::process;

use boxtest_core::baseline::{is_stale, write_atomically};
use boxtest_core::emit::render_rust;
use boxtest_core::{Baseline, BaselineError};
use log::info;

use crate::config::{Config, Suite};
use crate::{report_error, OutputFormat};

/// Generated contents of one output file.
struct Output {
    path: PathBuf,
    contents: String,
}

pub(crate) fn cmd_generate(
    config: &Config,
    suite: Option<&str>,
    check: bool,
    output: OutputFormat,
    quiet: bool,
) {
    let suites = match config.select(suite) {
        Ok(s) => s,
        Err(e) => {
            report_error(&format!("error: {}", e), output, quiet);
            process::exit(1);
        }
    };

    let mut summaries = Vec::new();
    let mut stale_paths: Vec<PathBuf> = Vec::new();

    for suite in suites {
        let baseline = match Baseline::generate(&suite.root, &suite.root_label, &suite.filter) {
            Ok(b) => b,
            Err(e) => {
                report_error(
                    &format!("error: suite '{}': {}", suite.name, e),
                    output,
                    quiet,
                );
                process::exit(1);
            }
        };
        let outputs = match outputs_for(suite, &baseline) {
            Ok(o) => o,
            Err(e) => {
                report_error(&format!("error: {}", e), output, quiet);
                process::exit(1);
            }
        };

        let result = if check {
            stale_outputs(&outputs)
        } else {
            write_outputs(&outputs).map(|()| Vec::new())
        };
        let stale = match result {
            Ok(stale) => stale,
            Err(e) => {
                report_error(&format!("error: {}", e), output, quiet);
                process::exit(1);
            }
        };
        stale_paths.extend(stale.iter().cloned());

        summaries.push(serde_json::json!({
            "suite": suite.name,
            "cases": baseline.tree.case_count(),
            "groups": baseline.tree.groups().len(),
            "outputs": outputs.iter().map(|o| o.path.display().to_string()).collect::<Vec<_>>(),
            "stale": stale.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
        }));

        if output == OutputFormat::Text && !quiet {
            let verb = if check { "checked" } else { "wrote" };
            for o in &outputs {
                let marker = if stale.contains(&o.path) { " (stale)" } else { "" };
                println!("{} {}{}", verb, o.path.display(), marker);
            }
            println!(
                "suite '{}': {} fixture(s) in {} group(s)",
                suite.name,
                baseline.tree.case_count(),
                baseline.tree.groups().len()
            );
        }
    }

    if output == OutputFormat::Json {
        let json = serde_json::to_string_pretty(&summaries)
            .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
        println!("{}", json);
    }

    if !stale_paths.is_empty() {
        let listed: Vec<String> = stale_paths
            .iter()
            .map(|p| format!("  {}", p.display()))
            .collect();
        let msg = format!(
            "generated output is stale; run `boxtest generate`:\n{}",
            listed.join("\n")
        );
        report_error(&msg, output, quiet);
        process::exit(1);
    }
}

fn outputs_for(suite: &Suite, baseline: &Baseline) -> Result<Vec<Output>, BaselineError> {
    let mut outputs = vec![Output {
        path: suite.baseline.clone(),
        contents: baseline.to_json()?,
    }];
    if let Some(path) = &suite.rust_out {
        outputs.push(Output {
            path: path.clone(),
            contents: render_rust(&baseline.tree, &suite.root_label),
        });
    }
    Ok(outputs)
}

fn stale_outputs(outputs: &[Output]) -> Result<Vec<PathBuf>, BaselineError> {
    let mut stale = Vec::new();
    for o in outputs {
        if is_stale(&o.path, &o.contents)? {
            stale.push(o.path.clone());
        }
    }
    Ok(stale)
}

fn write_outputs(outputs: &[Output]) -> Result<(), BaselineError> {
    for o in outputs {
        if is_stale(&o.path, &o.contents)? {
            write_atomically(&o.path, &o.contents)?;
            info!("wrote {}", o.path.display());
        } else {
            info!("{} is up to date", o.path.display());
        }
    }
    Ok(())
}
