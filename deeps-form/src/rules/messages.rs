//! Rule kinds and their default messages

use serde::Deserialize;
use serde::Serialize;

use crate::value::format_number;

/// The rule kinds whose message can be overridden per field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKind {
    Required,
    MinLength,
    MaxLength,
    Min,
    Max,
    Pattern,
    Matches,
}

/// Turns a field name into a human-readable label.
///
/// camelCase, kebab-case and snake_case names become title-cased words:
/// `confirmPassword` -> `Confirm Password`, `first-name` -> `First Name`.
pub fn field_label(field: &str) -> String {
    let mut spaced = String::with_capacity(field.len() + 4);
    for c in field.chars() {
        match c {
            '-' | '_' => spaced.push(' '),
            c if c.is_ascii_uppercase() => {
                spaced.push(' ');
                spaced.push(c);
            }
            c => spaced.push(c),
        }
    }

    spaced
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub(crate) fn required(label: &str) -> String {
    format!("{label} is required")
}

pub(crate) fn min_length(label: &str, n: usize) -> String {
    format!("{label} must be at least {n} characters")
}

pub(crate) fn max_length(label: &str, n: usize) -> String {
    format!("{label} must not exceed {n} characters")
}

pub(crate) fn min(label: &str, bound: f64) -> String {
    format!("{label} must be at least {}", format_number(bound))
}

pub(crate) fn max(label: &str, bound: f64) -> String {
    format!("{label} must not exceed {}", format_number(bound))
}

pub(crate) fn matches(label: &str, other: &str) -> String {
    format!("{label} must match {}", field_label(other))
}
