//! Form session controller
//!
//! A [`FormController`] owns one [`FormState`] and re-runs the evaluator in
//! response to change, blur and submit events.
//!
//! # Example
//!
//! ```
//! use deeps_form::{FieldRules, FormController, FormRules, ValueMap};
//!
//! let mut initial = ValueMap::new();
//! initial.insert("username".into(), "".into());
//!
//! let form = FormController::new(
//!     initial,
//!     FormRules::new().field("username", FieldRules::new().required().min_length(3)),
//! );
//!
//! form.set_field_value("username", "ab");
//! assert_eq!(form.show_error("username"), None);
//!
//! form.blur("username");
//! assert_eq!(
//!     form.show_error("username").as_deref(),
//!     Some("Username must be at least 3 characters")
//! );
//! ```

mod options;
mod state;
mod submit;

pub use options::BlurScope;
pub use options::FormOptions;
pub use state::FormSnapshot;
pub use state::FormState;
pub use submit::SubmitFailure;
pub use submit::SubmitOutcome;

use std::collections::BTreeSet;
use std::sync::PoisonError;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use log::debug;

use crate::evaluator::evaluate;
use crate::evaluator::evaluate_field;
use crate::rules::FormRules;
use crate::value::ErrorMap;
use crate::value::Value;
use crate::value::ValueMap;

/// Stateful wrapper around the evaluator for one form session.
///
/// All methods take `&self`; state sits behind a lock so it stays readable
/// while an asynchronous submit is pending. Locks are always taken rules
/// first, then state.
#[derive(Debug)]
pub struct FormController {
    rules: RwLock<FormRules>,
    options: FormOptions,
    state: RwLock<FormState>,
    /// Latest submission sequence. Bumped by every submit and by reset.
    sequence: AtomicU64,
}

impl FormController {
    /// Starts a session with default options.
    pub fn new(initial_values: ValueMap, rules: FormRules) -> Self {
        Self::with_options(initial_values, rules, FormOptions::default())
    }

    /// Starts a session with the given options.
    pub fn with_options(initial_values: ValueMap, rules: FormRules, options: FormOptions) -> Self {
        Self {
            rules: RwLock::new(rules),
            options,
            state: RwLock::new(FormState::new(initial_values)),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn options(&self) -> FormOptions {
        self.options
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Updates one field.
    ///
    /// Re-validates the whole form when `validate_on_change` is enabled and
    /// the field is already touched.
    pub fn set_field_value(&self, field: impl Into<String>, value: impl Into<Value>) {
        let field = field.into();
        let rules = self.read_rules();
        let mut state = self.write_state();
        state.values.insert(field.clone(), value.into());

        if self.options.validate_on_change && state.touched.contains(&field) {
            state.errors = evaluate(&state.values, &rules);
        }
    }

    /// Entry point for UI change events; same as [`set_field_value`](Self::set_field_value).
    pub fn handle_change(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.set_field_value(name, value);
    }

    /// Replaces every value at once. Does not validate.
    pub fn set_values(&self, values: ValueMap) {
        self.write_state().values = values;
    }

    /// Marks a field touched and, when `validate_on_blur` is enabled,
    /// re-validates according to the configured [`BlurScope`].
    pub fn blur(&self, field: impl Into<String>) {
        let field = field.into();
        let rules = self.read_rules();
        let mut state = self.write_state();
        state.touched.insert(field.clone());

        if !self.options.validate_on_blur {
            return;
        }

        match self.options.blur_scope {
            BlurScope::All => {
                state.errors = evaluate(&state.values, &rules);
            }
            BlurScope::FieldAndDependents => {
                let scope = std::iter::once(field.as_str()).chain(rules.dependents_of(&field));
                for name in scope {
                    if let Some(field_rules) = rules.get(name) {
                        let error = evaluate_field(name, field_rules, &state.values);
                        state.put_error(name, error);
                    }
                }
            }
        }
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Validates one field and updates only its error entry.
    ///
    /// A field without rules is valid and leaves the error map untouched.
    pub fn validate_field(&self, field: &str) -> bool {
        let rules = self.read_rules();
        let Some(field_rules) = rules.get(field) else {
            return true;
        };

        let mut state = self.write_state();
        let error = evaluate_field(field, field_rules, &state.values);
        let valid = error.is_none();
        state.put_error(field, error);
        valid
    }

    /// Validates every ruled field and replaces the whole error map.
    pub fn validate_all(&self) -> bool {
        let rules = self.read_rules();
        let mut state = self.write_state();
        state.errors = evaluate(&state.values, &rules);
        state.errors.is_empty()
    }

    /// Sets a field's error directly, e.g. from a server-side check.
    pub fn set_field_error(&self, field: impl Into<String>, error: impl Into<String>) {
        self.write_state().errors.insert(field.into(), error.into());
    }

    pub fn clear_field_error(&self, field: &str) {
        self.write_state().errors.remove(field);
    }

    /// Swaps the rule-set.
    ///
    /// Errors of fields the new rules no longer cover are dropped; the
    /// rest stay until the next validation.
    pub fn set_rules(&self, rules: FormRules) {
        let mut current = self.rules.write().unwrap_or_else(PoisonError::into_inner);
        let mut state = self.write_state();
        state.errors.retain(|field, _| rules.contains(field));
        *current = rules;
    }

    pub fn rules(&self) -> FormRules {
        self.read_rules().clone()
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Returns the field's error only once the field is touched.
    pub fn show_error(&self, field: &str) -> Option<String> {
        let state = self.read_state();
        if !state.touched.contains(field) {
            return None;
        }
        state.errors.get(field).cloned()
    }

    pub fn value(&self, field: &str) -> Value {
        self.read_state().values.get(field).cloned().unwrap_or_default()
    }

    pub fn values(&self) -> ValueMap {
        self.read_state().values.clone()
    }

    pub fn errors(&self) -> ErrorMap {
        self.read_state().errors.clone()
    }

    pub fn touched(&self) -> BTreeSet<String> {
        self.read_state().touched.clone()
    }

    pub fn is_touched(&self, field: &str) -> bool {
        self.read_state().touched.contains(field)
    }

    pub fn is_submitting(&self) -> bool {
        self.read_state().is_submitting
    }

    pub fn is_valid(&self) -> bool {
        self.read_state().is_valid()
    }

    pub fn is_dirty(&self) -> bool {
        self.read_state().is_dirty()
    }

    pub fn initial_values(&self) -> ValueMap {
        self.read_state().initial_values.clone()
    }

    /// Copies the state as rendering code sees it.
    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot::from(&*self.read_state())
    }

    // =========================================================================
    // Reset
    // =========================================================================

    /// Restores the initial values, clears errors and touched fields, and
    /// abandons any pending submission.
    pub fn reset_form(&self) {
        let mut state = self.write_state();
        self.sequence.fetch_add(1, Ordering::SeqCst);
        state.reset();
        state.is_submitting = false;
        debug!("form reset");
    }

    // =========================================================================
    // Locks
    // =========================================================================

    fn read_rules(&self) -> RwLockReadGuard<'_, FormRules> {
        self.rules.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_state(&self) -> RwLockReadGuard<'_, FormState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, FormState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
