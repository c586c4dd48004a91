//! Declarative form validation
//!
//! Two layers:
//!
//! - [`evaluate`] is a pure function from values and rule-sets to an error
//!   map.
//! - [`FormController`] tracks values, touched fields and submission state
//!   for one form session, re-running the evaluator on change, blur and
//!   submit.

pub mod controller;
pub mod error;
pub mod evaluator;
pub mod rules;
pub mod value;

pub use controller::*;
pub use error::RuleError;
pub use evaluator::evaluate;
pub use evaluator::evaluate_field;
pub use rules::CrossFieldPrecedence;
pub use rules::CustomRule;
pub use rules::FieldRules;
pub use rules::FormRules;
pub use rules::Pattern;
pub use rules::RuleKind;
pub use rules::field_label;
pub use value::ErrorMap;
pub use value::Value;
pub use value::ValueMap;
