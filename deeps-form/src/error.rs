//! Error types

/// Error raised while authoring a rule-set.
///
/// Validation failures are never errors: they are reported as entries of
/// an [`ErrorMap`](crate::ErrorMap).
#[derive(Debug, Clone, thiserror::Error)]
pub enum RuleError {
    /// A regex pattern source failed to compile.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl RuleError {
    /// Creates a new invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            source,
        }
    }
}
