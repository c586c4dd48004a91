//! Declarative rule-sets
//!
//! A [`FormRules`] maps field names to [`FieldRules`]. Fields absent from the
//! map are never validated.
//!
//! # Example
//!
//! ```
//! use deeps_form::{FieldRules, FormRules, Pattern, RuleKind};
//!
//! let rules = FormRules::new()
//!     .field("username", FieldRules::new().required().min_length(3))
//!     .field("email", FieldRules::new().required().pattern(Pattern::Email))
//!     .field(
//!         "confirmPassword",
//!         FieldRules::new()
//!             .matches("password")
//!             .message(RuleKind::Matches, "Passwords do not match"),
//!     );
//!
//! assert_eq!(rules.len(), 3);
//! assert_eq!(rules.dependents_of("password"), vec!["confirmPassword"]);
//! ```

pub(crate) mod messages;
mod pattern;

pub use messages::RuleKind;
pub use messages::field_label;
pub use pattern::Pattern;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use crate::value::Value;
use crate::value::ValueMap;

/// Cross-field check: receives the field's value and every value of the
/// form, returns an error message on failure.
pub type CustomRule = Arc<dyn Fn(&Value, &ValueMap) -> Option<String> + Send + Sync>;

/// Which cross-field check decides the message when both `custom` and
/// `matches` fail on the same field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossFieldPrecedence {
    /// `matches` runs last and overwrites a `custom` error.
    #[default]
    MatchesOverCustom,
    /// A `custom` error is kept even when `matches` also fails.
    CustomOverMatches,
}

/// Constraints on a single field.
///
/// Checks run in a fixed order: required, min length, max length, min,
/// max, pattern. The first failure among those decides the field's error.
/// `custom` and `matches` run only when all of them passed.
#[derive(Clone, Default)]
pub struct FieldRules {
    required: bool,
    min_length: Option<usize>,
    max_length: Option<usize>,
    min: Option<f64>,
    max: Option<f64>,
    pattern: Option<Pattern>,
    custom: Option<CustomRule>,
    matches: Option<String>,
    messages: BTreeMap<RuleKind, String>,
    precedence: CrossFieldPrecedence,
}

impl FieldRules {
    /// Creates an empty rule-set. An empty rule-set accepts every value.
    pub fn new() -> Self {
        Self::default()
    }

    /// The value must be present. For booleans only `true` passes.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Minimum length of the value's text, in characters.
    pub fn min_length(mut self, n: usize) -> Self {
        self.min_length = Some(n);
        self
    }

    /// Maximum length of the value's text, in characters.
    pub fn max_length(mut self, n: usize) -> Self {
        self.max_length = Some(n);
        self
    }

    /// Lower numeric bound, checked when the value parses as a number.
    pub fn min(mut self, bound: f64) -> Self {
        self.min = Some(bound);
        self
    }

    /// Upper numeric bound, checked when the value parses as a number.
    pub fn max(mut self, bound: f64) -> Self {
        self.max = Some(bound);
        self
    }

    /// Format constraint.
    pub fn pattern(mut self, pattern: impl Into<Pattern>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// The value must equal the named sibling field's value.
    pub fn matches(mut self, field: impl Into<String>) -> Self {
        self.matches = Some(field.into());
        self
    }

    /// Business-rule check with access to every value of the form.
    pub fn custom<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &ValueMap) -> Option<String> + Send + Sync + 'static,
    {
        self.custom = Some(Arc::new(f));
        self
    }

    /// Overrides the default message for one rule kind.
    pub fn message(mut self, kind: RuleKind, msg: impl Into<String>) -> Self {
        self.messages.insert(kind, msg.into());
        self
    }

    /// Chooses which cross-field check wins when both fail.
    pub fn precedence(mut self, precedence: CrossFieldPrecedence) -> Self {
        self.precedence = precedence;
        self
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn min_length_bound(&self) -> Option<usize> {
        self.min_length
    }

    pub fn max_length_bound(&self) -> Option<usize> {
        self.max_length
    }

    pub fn min_bound(&self) -> Option<f64> {
        self.min
    }

    pub fn max_bound(&self) -> Option<f64> {
        self.max
    }

    pub fn pattern_rule(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }

    pub fn custom_rule(&self) -> Option<&CustomRule> {
        self.custom.as_ref()
    }

    /// The sibling field this one must match.
    pub fn match_target(&self) -> Option<&str> {
        self.matches.as_deref()
    }

    pub fn cross_field_precedence(&self) -> CrossFieldPrecedence {
        self.precedence
    }

    /// Returns the override for `kind`, or builds the default message.
    pub(crate) fn message_for(&self, kind: RuleKind, default: impl FnOnce() -> String) -> String {
        self.messages.get(&kind).cloned().unwrap_or_else(default)
    }
}

impl fmt::Debug for FieldRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRules")
            .field("required", &self.required)
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("pattern", &self.pattern)
            .field("custom", &self.custom.as_ref().map(|_| "<fn>"))
            .field("matches", &self.matches)
            .field("messages", &self.messages)
            .field("precedence", &self.precedence)
            .finish()
    }
}

/// Rule-sets of a whole form, keyed by field name.
#[derive(Debug, Clone, Default)]
pub struct FormRules {
    fields: BTreeMap<String, FieldRules>,
}

impl FormRules {
    /// Creates an empty form rule-set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the rules of one field.
    pub fn field(mut self, name: impl Into<String>, rules: FieldRules) -> Self {
        self.insert(name, rules);
        self
    }

    /// Adds (or replaces) the rules of one field in place.
    pub fn insert(&mut self, name: impl Into<String>, rules: FieldRules) {
        self.fields.insert(name.into(), rules);
    }

    /// Removes the rules of one field, returning them.
    pub fn remove(&mut self, name: &str) -> Option<FieldRules> {
        self.fields.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&FieldRules> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Iterates over ruled fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldRules)> {
        self.fields.iter().map(|(name, rules)| (name.as_str(), rules))
    }

    /// Names of the ruled fields.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields whose `matches` rule targets `field`.
    pub fn dependents_of(&self, field: &str) -> Vec<&str> {
        self.fields()
            .filter(|(_, rules)| rules.match_target() == Some(field))
            .map(|(name, _)| name)
            .collect()
    }
}

impl<K: Into<String>> FromIterator<(K, FieldRules)> for FormRules {
    fn from_iter<I: IntoIterator<Item = (K, FieldRules)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
