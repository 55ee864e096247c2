//! Directory name → test identifier derivation.
//!
//! `withGenerics` becomes group `WithGenerics` and case `testWithGenerics`;
//! `with_generics` and `with-generics` derive the same names. The mapping is
//! a pure function of the name.

/// Prefix of every case method identifier.
pub const TEST_PREFIX: &str = "test";

/// Prefix of the synthetic self-check case carried by every group.
pub const SELF_CHECK_PREFIX: &str = "testAllFilesPresentIn";

/// PascalCase identifier of a group directory.
///
/// Splits on every character that is not an ASCII letter or digit and
/// upper-cases the first letter of each segment; the rest of each segment
/// keeps its case. Non-ASCII characters never reach an identifier.
pub fn group_identifier(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|segment| !segment.is_empty())
        .map(capitalize)
        .collect()
}

/// camelCase method identifier of a case directory: `test` + PascalCase.
pub fn case_identifier(name: &str) -> String {
    let pascal = group_identifier(name);
    if pascal.is_empty() {
        return pascal;
    }
    format!("{}{}", TEST_PREFIX, pascal)
}

/// Identifier of the synthetic all-files-present case of a group.
pub fn self_check_identifier(group_identifier: &str) -> String {
    format!("{}{}", SELF_CHECK_PREFIX, group_identifier)
}

/// Collision key: identifiers that differ only in case are the same test on
/// a case-insensitive filesystem or runner.
pub fn fold(identifier: &str) -> String {
    identifier.to_lowercase()
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
