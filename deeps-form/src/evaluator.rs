//! Rule evaluation
//!
//! [`evaluate`] is pure: it reads the values and rules it is given and
//! returns a fresh [`ErrorMap`].

use log::trace;

use crate::rules::CrossFieldPrecedence;
use crate::rules::FieldRules;
use crate::rules::FormRules;
use crate::rules::RuleKind;
use crate::rules::field_label;
use crate::rules::messages as defaults;
use crate::value::ErrorMap;
use crate::value::Value;
use crate::value::ValueMap;
use crate::value::value_of;

/// Validates every ruled field and returns the errors.
///
/// Fields without rules never produce an error. Each field's message is
/// independent of the others, so iteration order does not matter.
///
/// # Example
///
/// ```
/// use deeps_form::{evaluate, FieldRules, FormRules, Pattern, ValueMap};
///
/// let rules = FormRules::new().field("email", FieldRules::new().pattern(Pattern::Email));
///
/// let mut values = ValueMap::new();
/// values.insert("email".into(), "not-an-email".into());
///
/// let errors = evaluate(&values, &rules);
/// assert_eq!(errors["email"], "Invalid email format");
/// ```
pub fn evaluate(values: &ValueMap, rules: &FormRules) -> ErrorMap {
    let errors: ErrorMap = rules
        .fields()
        .filter_map(|(field, field_rules)| {
            evaluate_field(field, field_rules, values).map(|msg| (field.to_string(), msg))
        })
        .collect();

    trace!(
        "evaluated {} ruled fields, {} with errors",
        rules.len(),
        errors.len()
    );
    errors
}

/// Validates one field against its rules, reading siblings from `values`.
pub fn evaluate_field(field: &str, rules: &FieldRules, values: &ValueMap) -> Option<String> {
    let value = value_of(values, field);

    if !rules.is_required() && value.is_blank() {
        return None;
    }

    if let Some(msg) = check_ordered(field, rules, value) {
        return Some(msg);
    }

    let custom = rules.custom_rule().and_then(|check| check(value, values));
    let matches = check_matches(field, rules, value, values);

    match rules.cross_field_precedence() {
        CrossFieldPrecedence::MatchesOverCustom => matches.or(custom),
        CrossFieldPrecedence::CustomOverMatches => custom.or(matches),
    }
}

/// Required, length, range and pattern checks. First failure wins.
fn check_ordered(field: &str, rules: &FieldRules, value: &Value) -> Option<String> {
    let label = || field_label(field);

    if rules.is_required() && is_missing(value) {
        return Some(rules.message_for(RuleKind::Required, || defaults::required(&label())));
    }

    let text = value.to_text();
    let len = text.chars().count();

    if let Some(n) = rules.min_length_bound().filter(|n| len < *n) {
        return Some(rules.message_for(RuleKind::MinLength, || defaults::min_length(&label(), n)));
    }

    if let Some(n) = rules.max_length_bound().filter(|n| len > *n) {
        return Some(rules.message_for(RuleKind::MaxLength, || defaults::max_length(&label(), n)));
    }

    if let Some(number) = value.as_number() {
        if let Some(bound) = rules.min_bound().filter(|b| number < *b) {
            return Some(rules.message_for(RuleKind::Min, || defaults::min(&label(), bound)));
        }
        if let Some(bound) = rules.max_bound().filter(|b| number > *b) {
            return Some(rules.message_for(RuleKind::Max, || defaults::max(&label(), bound)));
        }
    }

    if let Some(pattern) = rules.pattern_rule() {
        if !pattern.is_match(&text) {
            return Some(rules.message_for(RuleKind::Pattern, || pattern.default_message(&label())));
        }
    }

    None
}

/// Booleans are missing only when `false`; text also when whitespace-only.
fn is_missing(value: &Value) -> bool {
    match value {
        Value::Bool(b) => !b,
        Value::String(s) => s.trim().is_empty(),
        other => !other.is_truthy(),
    }
}

fn check_matches(field: &str, rules: &FieldRules, value: &Value, values: &ValueMap) -> Option<String> {
    let target = rules.match_target()?;
    if value == value_of(values, target) {
        return None;
    }
    Some(rules.message_for(RuleKind::Matches, || {
        defaults::matches(&field_label(field), target)
    }))
}
