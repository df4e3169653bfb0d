//! URL/identifier-safe codes derived from display names.
//!
//! Locations, wells, parameter groups and parameters all carry a `code` that
//! must be unique within its table. When a caller leaves it out, the code is
//! derived from the name; collisions are resolved by appending `_1`, `_2`, …

use std::iter;

/// Derive a code from a display name.
///
/// Whitespace runs become a single `_`, anything that is not alphanumeric or
/// `_` is dropped, and the result is lowercased. Non-Latin letters are kept.
pub fn slugify(name: &str) -> String {
    let mut code = String::with_capacity(name.len());
    let mut in_whitespace = false;

    for ch in name.trim().chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                code.push('_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if ch.is_alphanumeric() || ch == '_' {
            code.extend(ch.to_lowercase());
        }
    }

    code
}

/// Candidate codes in the order uniqueness loops try them:
/// `base`, `base_1`, `base_2`, …
pub fn code_candidates(base: &str) -> impl Iterator<Item = String> + '_ {
    iter::once(base.to_string()).chain((1u64..).map(move |n| format!("{base}_{n}")))
}
