//! `${NAME}` substitution over raw document text.
//!
//! Substitution is textual and runs before any parsing, so YAML and JSON
//! documents are treated identically. Lookups go through a caller-supplied
//! function; the application layer wires it to the process environment.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::domain::error::DomainError;

fn marker() -> &'static Regex {
    static MARKER_RE: OnceLock<Regex> = OnceLock::new();
    MARKER_RE.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("Invalid env marker regex")
    })
}

/// Replace every `${NAME}` in `text` with `lookup(NAME)`.
///
/// Fails closed: if any referenced name resolves to `None` the whole call
/// fails with [`DomainError::UnresolvedVariable`] listing every missing
/// name (deduplicated, in order of first appearance) and no text is returned.
pub fn substitute<F>(text: &str, lookup: F) -> Result<String, DomainError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut missing: Vec<String> = Vec::new();

    let replaced = marker().replace_all(text, |caps: &Captures<'_>| {
        let name = &caps[1];
        match lookup(name) {
            Some(value) => value,
            None => {
                if !missing.iter().any(|m| m == name) {
                    missing.push(name.to_owned());
                }
                String::new()
            }
        }
    });

    if !missing.is_empty() {
        return Err(DomainError::UnresolvedVariable { names: missing });
    }

    Ok(replaced.into_owned())
}

/// Names referenced by `text`, in order of first appearance.
pub fn referenced_names(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in marker().captures_iter(text) {
        let name = &caps[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_owned());
        }
    }
    names
}
