use std::path::Path;
use std::process;

use boxtest_core::{build, scan, CorpusError, Descriptor, DirFilter, TestGroupDescriptor};

use crate::{report_error, OutputFormat};

pub(crate) fn cmd_scan(root: &Path, filter: &DirFilter, output: OutputFormat, quiet: bool) {
    let tree = match scan(root, filter)
        .map_err(CorpusError::from)
        .and_then(|node| build(&node).map_err(CorpusError::from))
    {
        Ok(tree) => tree,
        Err(e) => {
            report_error(&format!("error: {}", e), output, quiet);
            process::exit(1);
        }
    };

    match output {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&tree)
                .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
            println!("{}", json);
        }
        OutputFormat::Text => {
            let mut lines = Vec::new();
            render_group(&tree, 0, &mut lines);
            for line in &lines {
                println!("{}", line);
            }
            if !quiet {
                println!();
                println!(
                    "{} fixture(s) in {} group(s)",
                    tree.case_count(),
                    tree.groups().len()
                );
            }
        }
    }
}

/// One line per node: identifier, then the corpus path it stands for.
fn render_group(group: &TestGroupDescriptor, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    let path = if group.path.is_empty() {
        "."
    } else {
        group.path.as_str()
    };
    lines.push(format!("{}{}/  {}", indent, group.identifier, path));
    lines.push(format!("{}  {}", indent, group.self_check));
    for child in &group.children {
        match child {
            Descriptor::Group(sub) => render_group(sub, depth + 1, lines),
            Descriptor::Case(case) => {
                lines.push(format!("{}  {}  {}", indent, case.identifier, case.path));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxtest_core::FixtureNode;

    fn node(path: &str, children: Vec<FixtureNode>) -> FixtureNode {
        FixtureNode {
            path: path.to_string(),
            name: path.rsplit('/').next().unwrap().to_string(),
            children,
            terminal: false,
        }
    }

    #[test]
    fn tree_lines_nest_groups() {
        let mut root = node(
            "",
            vec![
                node("foo", vec![node("foo/simple", vec![])]),
                node("plain", vec![]),
            ],
        );
        root.name = "box".to_string();
        let tree = build(&root).unwrap();

        let mut lines = Vec::new();
        render_group(&tree, 0, &mut lines);
        assert_eq!(
            lines,
            vec![
                "Box/  .",
                "  testAllFilesPresentInBox",
                "  Foo/  foo",
                "    testAllFilesPresentInFoo",
                "    testSimple  foo/simple",
                "  testPlain  plain",
            ]
        );
    }
}
