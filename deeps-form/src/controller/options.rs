//! Session configuration

use serde::Deserialize;
use serde::Serialize;

/// Which fields a blur re-validates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlurScope {
    /// Every ruled field; the whole error map is replaced.
    #[default]
    All,
    /// The blurred field plus fields whose `matches` rule targets it.
    FieldAndDependents,
}

/// Options controlling when a [`FormController`](super::FormController)
/// re-runs validation.
///
/// # Example
///
/// ```
/// use deeps_form::{BlurScope, FormOptions};
///
/// let options = FormOptions::default()
///     .with_validate_on_change(true)
///     .with_blur_scope(BlurScope::FieldAndDependents);
///
/// assert!(options.validate_on_blur);
/// assert!(!options.reset_on_submit);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormOptions {
    /// Re-validate when a touched field changes.
    ///
    /// Default: false
    pub validate_on_change: bool,

    /// Re-validate when a field loses focus.
    ///
    /// Default: true
    pub validate_on_blur: bool,

    /// Restore the initial values after a successful submit.
    ///
    /// Default: false
    pub reset_on_submit: bool,

    /// Which fields a blur re-validates.
    ///
    /// Default: [`BlurScope::All`]
    pub blur_scope: BlurScope,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            validate_on_change: false,
            validate_on_blur: true,
            reset_on_submit: false,
            blur_scope: BlurScope::All,
        }
    }
}

impl FormOptions {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_validate_on_change(mut self, enabled: bool) -> Self {
        self.validate_on_change = enabled;
        self
    }

    pub fn with_validate_on_blur(mut self, enabled: bool) -> Self {
        self.validate_on_blur = enabled;
        self
    }

    pub fn with_reset_on_submit(mut self, enabled: bool) -> Self {
        self.reset_on_submit = enabled;
        self
    }

    pub fn with_blur_scope(mut self, scope: BlurScope) -> Self {
        self.blur_scope = scope;
        self
    }
}
