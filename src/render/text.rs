//! Plain-text tree view of an outline.

use std::fmt::Write;

use crate::model::DocumentResult;

/// Render the title followed by one indented line per heading.
///
/// ```text
/// Annual Report
///   H1 Introduction (p. 1)
///     H2 Scope (p. 2)
/// ```
pub fn to_tree(result: &DocumentResult) -> String {
    let mut output = String::new();
    output.push_str(result.title.trim());
    output.push('\n');

    for heading in &result.outline {
        let indent = "  ".repeat(heading.level.depth() as usize);
        // Writing to a String cannot fail.
        let _ = writeln!(
            output,
            "{}{} {} (p. {})",
            indent, heading.level, heading.text, heading.page
        );
    }

    output
}
