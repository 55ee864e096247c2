//! Rendering a declared tree as a Rust test listing.
//!
//! One `mod` per group, one `#[test] fn` per case, plus the group's
//! self-check. The listing is meant to be pulled in with `include!` next to
//! [`fixture_harness!`](crate::fixture_harness).

use crate::model::{Descriptor, TestGroupDescriptor};

/// Name of the constant holding every declared case path.
pub const DECLARED_CONST: &str = "BOXTEST_DECLARED";

const INDENT: &str = "    ";

/// Render `tree` as Rust source. `origin` names the corpus in the header.
pub fn render_rust(tree: &TestGroupDescriptor, origin: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "// @generated by boxtest from `{}`. Do not edit by hand.\n",
        origin
    ));
    out.push_str("// Regenerate with `boxtest generate`.\n\n");

    out.push_str(&format!("const {}: &[&str] = &[\n", DECLARED_CONST));
    for path in tree.case_paths() {
        out.push_str(&format!("{}{:?},\n", INDENT, path));
    }
    out.push_str("];\n\n");

    out.push_str("#[allow(non_snake_case)]\n");
    render_group(&mut out, tree, 0);
    out
}

fn render_group(out: &mut String, group: &TestGroupDescriptor, depth: usize) {
    let pad = INDENT.repeat(depth);
    let inner = INDENT.repeat(depth + 1);

    out.push_str(&format!("{}mod {} {{\n", pad, item_name(&group.identifier)));
    out.push_str(&format!("{}use super::*;\n", inner));

    render_test(
        out,
        &inner,
        &group.self_check,
        &format!("all_files_present({:?}, {});", group.path, DECLARED_CONST),
    );

    for child in &group.children {
        match child {
            Descriptor::Case(case) => render_test(
                out,
                &inner,
                &case.identifier,
                &format!("run_fixture({:?});", case.path),
            ),
            Descriptor::Group(sub) => {
                out.push('\n');
                render_group(out, sub, depth + 1);
            }
        }
    }
    out.push_str(&format!("{}}}\n", pad));
}

fn render_test(out: &mut String, pad: &str, name: &str, body: &str) {
    out.push('\n');
    out.push_str(&format!("{}#[test]\n", pad));
    out.push_str(&format!("{}fn {}() {{\n", pad, item_name(name)));
    out.push_str(&format!("{}{}{}\n", pad, INDENT, body));
    out.push_str(&format!("{}}}\n", pad));
}

/// Make a derived identifier usable as a Rust item name.
fn item_name(identifier: &str) -> String {
    let starts_with_digit = identifier.chars().next().is_some_and(|c| c.is_ascii_digit());
    if starts_with_digit || identifier == "Self" {
        format!("_{}", identifier)
    } else {
        identifier.to_string()
    }
}
