//! Format constraints

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::RuleError;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"));

/// Minimum number of digits a phone number must carry.
const PHONE_MIN_DIGITS: usize = 10;

/// A format constraint on a field's text.
///
/// Resolved once when the rule-set is authored; evaluation only dispatches
/// on the variant.
///
/// # Example
///
/// ```
/// use deeps_form::Pattern;
///
/// let zip: Pattern = r"^\d{5}$".parse().unwrap();
/// assert!(zip.is_match("12345"));
///
/// let email: Pattern = "email".parse().unwrap();
/// assert!(matches!(email, Pattern::Email));
/// ```
#[derive(Debug, Clone)]
pub enum Pattern {
    /// `local@domain.tld` shape.
    Email,
    /// Absolute URL.
    Url,
    /// Digits, spaces, `+`, `-` and parentheses with at least ten digits.
    Phone,
    /// Caller-supplied regex; the value must contain a match.
    Regex(Regex),
}

impl Pattern {
    /// Compiles a regex pattern.
    pub fn regex(source: &str) -> Result<Self, RuleError> {
        Regex::new(source)
            .map(Pattern::Regex)
            .map_err(|e| RuleError::invalid_pattern(source, e))
    }

    /// Checks the text against this pattern.
    pub fn is_match(&self, text: &str) -> bool {
        match self {
            Pattern::Email => EMAIL.is_match(text),
            Pattern::Url => url::Url::parse(text).is_ok(),
            Pattern::Phone => is_phone(text),
            Pattern::Regex(re) => re.is_match(text),
        }
    }

    /// Returns the default violation message.
    pub(crate) fn default_message(&self, label: &str) -> String {
        match self {
            Pattern::Email => "Invalid email format".to_string(),
            Pattern::Url => "Invalid URL format".to_string(),
            Pattern::Phone => "Invalid phone number".to_string(),
            Pattern::Regex(_) => format!("{label} format is invalid"),
        }
    }
}

impl FromStr for Pattern {
    type Err = RuleError;

    /// `"email"`, `"url"` and `"phone"` name the built-in formats; anything
    /// else is compiled as a regex.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Pattern::Email),
            "url" => Ok(Pattern::Url),
            "phone" => Ok(Pattern::Phone),
            other => Pattern::regex(other),
        }
    }
}

impl From<Regex> for Pattern {
    fn from(re: Regex) -> Self {
        Pattern::Regex(re)
    }
}

fn is_phone(text: &str) -> bool {
    let allowed = |c: char| c.is_ascii_digit() || c.is_whitespace() || "+-()".contains(c);
    !text.is_empty()
        && text.chars().all(allowed)
        && text.chars().filter(char::is_ascii_digit).count() >= PHONE_MIN_DIGITS
}
