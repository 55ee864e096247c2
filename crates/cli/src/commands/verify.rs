use std::process;

use boxtest_core::{verify_all, Baseline, Found, SyncReport};

use crate::config::{Config, Suite};
use crate::{report_error, OutputFormat};

pub(crate) fn cmd_verify(
    config: &Config,
    suite: Option<&str>,
    scope: Option<&str>,
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

    let mut results = Vec::new();
    let mut drifted = 0usize;
    let mut checked = 0usize;

    for suite in suites {
        let reports = match verify_suite(suite, scope) {
            Ok(r) => r,
            Err(msg) => {
                report_error(&format!("error: suite '{}': {}", suite.name, msg), output, quiet);
                process::exit(1);
            }
        };
        checked += reports.len();
        drifted += reports.iter().filter(|r| !r.is_clean()).count();

        if output == OutputFormat::Text {
            for report in &reports {
                if !report.is_clean() || !quiet {
                    println!("[{}] {}", suite.name, report);
                }
            }
        }
        results.push(serde_json::json!({
            "suite": suite.name,
            "reports": reports,
        }));
    }

    if output == OutputFormat::Json {
        let json = serde_json::to_string_pretty(&results)
            .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
        println!("{}", json);
    }

    if drifted > 0 {
        let msg = format!(
            "{} of {} group(s) out of sync; regenerate with `boxtest generate`",
            drifted, checked
        );
        report_error(&msg, output, quiet);
        process::exit(1);
    }
}

/// One report per declared group at or below `scope`.
fn verify_suite(suite: &Suite, scope: Option<&str>) -> Result<Vec<SyncReport>, String> {
    let baseline = Baseline::load(&suite.baseline).map_err(|e| e.to_string())?;
    let group = match scope {
        None => &baseline.tree,
        Some(path) => match baseline.tree.find(path) {
            Some(Found::Group(group)) => group,
            Some(Found::Case(_)) => {
                return Err(format!("'{}' is a fixture, not a group", path));
            }
            None => return Err(format!("no declared group at '{}'", path)),
        },
    };
    verify_all(group, &suite.root, &suite.filter).map_err(|e| e.to_string())
}
