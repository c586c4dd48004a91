//! Tests for the form session controller.

use std::cell::RefCell;
use std::time::Duration;

use deeps_form::{
    BlurScope, FieldRules, FormController, FormOptions, FormRules, Pattern, SubmitFailure,
    SubmitOutcome, Value, ValueMap,
};
use futures::FutureExt;
use simplelog::{Config, LevelFilter, TestLogger};

fn init_logger() {
    let _ = TestLogger::init(LevelFilter::Debug, Config::default());
}

fn initial() -> ValueMap {
    [
        ("email", Value::from("")),
        ("password", Value::from("")),
        ("confirm", Value::from("")),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

fn rules() -> FormRules {
    FormRules::new()
        .field("email", FieldRules::new().required().pattern(Pattern::Email))
        .field("password", FieldRules::new().required().min_length(6))
        .field("confirm", FieldRules::new().matches("password"))
}

fn fill_valid(form: &FormController) {
    form.set_field_value("email", "ada@example.com");
    form.set_field_value("password", "secret1");
    form.set_field_value("confirm", "secret1");
}

#[test]
fn test_validate_all() {
    let form = FormController::new(initial(), rules());
    fill_valid(&form);

    assert!(form.validate_all());
    assert!(form.errors().is_empty());

    form.set_field_value("email", "nope");
    assert!(!form.validate_all());
    let errors = form.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors["email"], "Invalid email format");
}

#[test]
fn test_change_does_not_validate_by_default() {
    let form = FormController::new(initial(), rules());
    form.blur("email");
    assert!(form.errors().contains_key("email"));

    form.set_field_value("email", "ada@example.com");
    assert!(form.errors().contains_key("email"));
}

#[test]
fn test_change_validates_touched_fields_when_enabled() {
    let form = FormController::with_options(
        initial(),
        rules(),
        FormOptions::default().with_validate_on_change(true),
    );

    // Untouched: no validation on change.
    form.set_field_value("email", "nope");
    assert!(form.errors().is_empty());

    form.blur("email");
    assert!(form.errors().contains_key("email"));

    form.handle_change("email", "ada@example.com");
    assert!(!form.errors().contains_key("email"));
}

#[test]
fn test_blur_validates_whole_form() {
    let form = FormController::new(initial(), rules());
    form.blur("email");

    let errors = form.errors();
    assert!(errors.contains_key("email"));
    assert!(errors.contains_key("password"));
    assert_eq!(form.touched().len(), 1);
}

#[test]
fn test_blur_without_validation() {
    let form = FormController::with_options(
        initial(),
        rules(),
        FormOptions::default().with_validate_on_blur(false),
    );
    form.blur("email");
    assert!(form.is_touched("email"));
    assert!(form.errors().is_empty());
}

#[test]
fn test_blur_scope_field_and_dependents() {
    let form = FormController::with_options(
        initial(),
        rules(),
        FormOptions::default().with_blur_scope(BlurScope::FieldAndDependents),
    );
    form.set_field_value("password", "secret1");
    form.set_field_value("confirm", "secret2");

    form.blur("password");

    let errors = form.errors();
    assert!(!errors.contains_key("email"));
    assert!(!errors.contains_key("password"));
    assert_eq!(errors["confirm"], "Confirm must match Password");
}

#[test]
fn test_show_error_requires_touch() {
    let form = FormController::new(initial(), rules());
    assert!(!form.validate_all());

    assert_eq!(form.show_error("email"), None);
    form.blur("email");
    assert_eq!(form.show_error("email").as_deref(), Some("Email is required"));
}

#[test]
fn test_validate_field_updates_only_its_entry() {
    let form = FormController::new(initial(), rules());
    form.set_field_error("password", "server says no");

    assert!(!form.validate_field("email"));
    assert_eq!(form.errors()["password"], "server says no");

    form.set_field_value("email", "ada@example.com");
    assert!(form.validate_field("email"));
    assert!(!form.errors().contains_key("email"));

    // Unruled field.
    assert!(form.validate_field("nickname"));
}

#[test]
fn test_dirty_tracking() {
    let form = FormController::new(initial(), rules());
    assert!(!form.is_dirty());

    form.set_field_value("email", "a");
    assert!(form.is_dirty());

    form.set_field_value("email", "");
    assert!(!form.is_dirty());
}

#[test]
fn test_nan_initial_value_is_not_dirty() {
    let initial: ValueMap = [("ratio".to_string(), Value::Float(f64::NAN))].into();
    let form = FormController::new(initial, FormRules::new());
    assert!(!form.is_dirty());

    form.set_field_value("ratio", 0.5);
    assert!(form.is_dirty());

    form.set_field_value("ratio", f64::NAN);
    assert!(!form.is_dirty());
}

#[test]
fn test_dirty_when_field_added() {
    let form = FormController::new(initial(), rules());
    form.set_field_value("nickname", "");
    assert!(form.is_dirty());
}

#[test]
fn test_reset_form() {
    let form = FormController::new(initial(), rules());
    fill_valid(&form);
    form.set_field_value("email", "nope");
    form.blur("email");
    form.set_field_error("other", "x");

    form.reset_form();

    assert_eq!(form.values(), initial());
    assert!(form.errors().is_empty());
    assert!(form.touched().is_empty());
    assert!(!form.is_submitting());
    assert!(!form.is_dirty());
}

#[test]
fn test_set_rules() {
    let form = FormController::new(initial(), rules());
    form.set_rules(FormRules::new());
    assert!(form.validate_all());
    assert!(form.rules().is_empty());
}

#[test]
fn test_set_rules_drops_errors_of_unruled_fields() {
    let form = FormController::new(initial(), rules());
    form.blur("email");
    assert!(form.errors().contains_key("email"));
    assert!(form.errors().contains_key("password"));

    form.set_rules(FormRules::new().field("password", FieldRules::new().required()));
    let errors = form.errors();
    assert!(!errors.contains_key("email"));
    assert!(errors.contains_key("password"));
    assert_eq!(form.show_error("email"), None);

    form.set_rules(FormRules::new());
    assert!(form.errors().is_empty());
    assert!(form.is_valid());
}

#[test]
fn test_snapshot() {
    let form = FormController::new(initial(), rules());
    form.set_field_value("email", "nope");
    form.blur("email");

    let snapshot = form.snapshot();
    assert!(snapshot.is_dirty);
    assert!(!snapshot.is_valid);
    assert!(!snapshot.is_submitting);
    assert!(snapshot.touched.contains("email"));
    assert_eq!(snapshot.values["email"], Value::from("nope"));
}

#[tokio::test]
async fn test_submit_success() {
    init_logger();
    let form = FormController::new(initial(), rules());
    fill_valid(&form);

    let received = RefCell::new(None);
    let outcome = form
        .submit(|values| {
            assert!(form.is_submitting());
            *received.borrow_mut() = Some(values);
            async { Ok::<(), String>(()) }
        })
        .await;

    assert_eq!(outcome, SubmitOutcome::Succeeded);
    assert!(!form.is_submitting());
    assert_eq!(received.into_inner().unwrap(), form.values());
    assert_eq!(form.touched().len(), 3);
}

#[tokio::test]
async fn test_submit_invalid_reports_errors() {
    let form = FormController::new(initial(), rules());
    let failure = RefCell::new(None);

    let outcome = form
        .submit_with(
            |_| async { Ok::<(), String>(()) },
            |err| *failure.borrow_mut() = Some(err),
        )
        .await;

    assert_eq!(outcome, SubmitOutcome::Invalid);
    assert!(!form.is_submitting());
    match failure.into_inner() {
        Some(SubmitFailure::Invalid(errors)) => {
            assert!(errors.contains_key("email"));
            assert!(errors.contains_key("password"));
        }
        other => panic!("unexpected failure: {other:?}"),
    }
    assert_eq!(form.show_error("email").as_deref(), Some("Email is required"));
}

#[tokio::test]
async fn test_submit_marks_ruled_fields_without_values_touched() {
    let form = FormController::new(ValueMap::new(), rules());
    let _ = form.submit(|_| async { Ok::<(), String>(()) }).await;
    assert!(form.is_touched("email"));
    assert!(form.is_touched("confirm"));
}

#[tokio::test]
async fn test_submit_rejected_passes_reason() {
    init_logger();
    let form = FormController::new(initial(), rules());
    fill_valid(&form);
    let failure = RefCell::new(None);

    let outcome = form
        .submit_with(
            |_| {
                let during = form.is_submitting();
                async move {
                    assert!(during);
                    Err("network down".to_string())
                }
            },
            |err| *failure.borrow_mut() = Some(err),
        )
        .await;

    assert_eq!(outcome, SubmitOutcome::Rejected);
    assert!(!form.is_submitting());
    assert_eq!(
        failure.into_inner(),
        Some(SubmitFailure::Rejected("network down".to_string()))
    );
    // Values are kept after a failed submit.
    assert_eq!(form.value("email"), Value::from("ada@example.com"));
}

#[tokio::test]
async fn test_reset_on_submit() {
    let form = FormController::with_options(
        initial(),
        rules(),
        FormOptions::default().with_reset_on_submit(true),
    );
    fill_valid(&form);

    let outcome = form.submit(|_| async { Ok::<(), String>(()) }).await;

    assert_eq!(outcome, SubmitOutcome::Succeeded);
    assert_eq!(form.values(), initial());
    assert!(form.touched().is_empty());
    assert!(form.errors().is_empty());
}

#[tokio::test]
async fn test_overlapping_submits_only_latest_finishes() {
    init_logger();
    let form = FormController::with_options(
        initial(),
        rules(),
        FormOptions::default().with_reset_on_submit(true),
    );
    fill_valid(&form);

    let slow = form.submit(|_| async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok::<(), String>(())
    });
    let fast = form.submit(|_| async {
        tokio::time::sleep(Duration::from_millis(5)).await;
        Ok::<(), String>(())
    });

    let (slow, fast) = tokio::join!(slow, fast);

    assert_eq!(fast, SubmitOutcome::Succeeded);
    assert_eq!(slow, SubmitOutcome::Superseded);
    assert!(!form.is_submitting());
    assert_eq!(form.values(), initial());
}

#[tokio::test]
async fn test_reset_supersedes_pending_submit() {
    init_logger();
    let form = FormController::new(initial(), rules());
    fill_valid(&form);

    let pending = form.submit(|_| async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok::<(), String>(())
    });
    let reset = async {
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(form.is_submitting());
        form.reset_form();
        assert!(!form.is_submitting());
    };

    let (outcome, ()) = tokio::join!(pending, reset);
    assert_eq!(outcome, SubmitOutcome::Superseded);
    assert!(!form.is_submitting());
}

#[test]
fn test_dropped_submit_clears_flag() {
    let form = FormController::new(initial(), rules());
    fill_valid(&form);

    let submit = form.submit(|_| futures::future::pending::<Result<(), String>>());
    assert_eq!(submit.now_or_never(), None);
    assert!(!form.is_submitting());
}
