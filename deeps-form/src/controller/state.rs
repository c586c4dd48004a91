//! Session state records

use std::collections::BTreeSet;

use crate::value::ErrorMap;
use crate::value::ValueMap;

/// Mutable record of one form session.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub(crate) values: ValueMap,
    pub(crate) errors: ErrorMap,
    pub(crate) touched: BTreeSet<String>,
    pub(crate) is_submitting: bool,
    pub(crate) initial_values: ValueMap,
}

impl FormState {
    /// Starts a session from its initial values.
    pub fn new(initial_values: ValueMap) -> Self {
        Self {
            values: initial_values.clone(),
            initial_values,
            ..Self::default()
        }
    }

    pub fn values(&self) -> &ValueMap {
        &self.values
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn touched(&self) -> &BTreeSet<String> {
        &self.touched
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn initial_values(&self) -> &ValueMap {
        &self.initial_values
    }

    /// No field currently has an error.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Current values differ from the initial snapshot.
    pub fn is_dirty(&self) -> bool {
        self.values.len() != self.initial_values.len()
            || self.values.iter().any(|(field, value)| {
                self.initial_values
                    .get(field)
                    .is_none_or(|initial| !value.same_as(initial))
            })
    }

    /// Restores the initial values and forgets errors and touched fields.
    pub(crate) fn reset(&mut self) {
        self.values = self.initial_values.clone();
        self.errors.clear();
        self.touched.clear();
    }

    /// Stores or removes one field's error.
    pub(crate) fn put_error(&mut self, field: &str, error: Option<String>) {
        match error {
            Some(msg) => {
                self.errors.insert(field.to_string(), msg);
            }
            None => {
                self.errors.remove(field);
            }
        }
    }
}

/// Read-only projection of a session, as consumed by rendering code.
#[derive(Debug, Clone, PartialEq)]
pub struct FormSnapshot {
    pub values: ValueMap,
    pub errors: ErrorMap,
    pub touched: BTreeSet<String>,
    pub is_submitting: bool,
    pub is_valid: bool,
    pub is_dirty: bool,
}

impl From<&FormState> for FormSnapshot {
    fn from(state: &FormState) -> Self {
        Self {
            values: state.values.clone(),
            errors: state.errors.clone(),
            touched: state.touched.clone(),
            is_submitting: state.is_submitting,
            is_valid: state.is_valid(),
            is_dirty: state.is_dirty(),
        }
    }
}
