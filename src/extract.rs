use std::collections::BTreeSet;

use crate::scanner::{is_operator, strip_comments};

/// Distinct variable symbols in comment-free text, in code point order.
pub fn extract_variables(stripped: &str) -> BTreeSet<char> {
    stripped
        .chars()
        .filter(|&c| !is_operator(c) && !c.is_whitespace())
        .collect()
}

/// Variables of a full source program, ignoring anything inside comments.
pub fn program_variables(source: &str) -> BTreeSet<char> {
    extract_variables(&strip_comments(source))
}
