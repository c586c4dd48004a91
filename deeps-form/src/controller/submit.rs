//! Submission flow

use std::future::Future;
use std::sync::atomic::Ordering;

use log::debug;

use super::FormController;
use crate::evaluator::evaluate;
use crate::value::ErrorMap;
use crate::value::ValueMap;

/// Why a submission did not succeed, as passed to the failure callback.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitFailure<E> {
    /// Validation found errors; the success callback never ran.
    Invalid(ErrorMap),
    /// The success callback itself failed.
    Rejected(E),
}

/// How a call to [`FormController::submit`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The success callback completed.
    Succeeded,
    /// Validation failed.
    Invalid,
    /// The success callback returned an error.
    Rejected,
    /// A newer submit or a reset started while the success callback was
    /// pending; this run left the state alone.
    Superseded,
}

impl FormController {
    /// Submits the form without a failure callback.
    ///
    /// See [`submit_with`](Self::submit_with).
    pub async fn submit<F, Fut, E>(&self, on_success: F) -> SubmitOutcome
    where
        F: FnOnce(ValueMap) -> Fut,
        Fut: Future<Output = Result<(), E>>,
    {
        self.submit_with(on_success, |_: SubmitFailure<E>| {}).await
    }

    /// Submits the form.
    ///
    /// Marks every field touched and validates all rules. With no errors,
    /// `on_success` receives the current values and is awaited; otherwise
    /// `on_error` receives the error map. A failing `on_success` hands its
    /// error (not the empty error map) to `on_error`.
    ///
    /// `is_submitting` is `true` for the duration and is cleared on every
    /// exit path, including when this future is dropped before completing.
    /// Only the most recent submission may clear it or apply
    /// `reset_on_submit`.
    pub async fn submit_with<F, Fut, E, H>(&self, on_success: F, on_error: H) -> SubmitOutcome
    where
        F: FnOnce(ValueMap) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        H: FnOnce(SubmitFailure<E>),
    {
        let (guard, values, errors) = {
            let rules = self.read_rules();
            let mut state = self.write_state();
            let seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
            state.is_submitting = true;

            let fields: Vec<String> = state
                .values
                .keys()
                .map(String::as_str)
                .chain(rules.names())
                .map(str::to_string)
                .collect();
            state.touched.extend(fields);
            state.errors = evaluate(&state.values, &rules);

            debug!(
                "submission {} started, {} invalid fields",
                seq,
                state.errors.len()
            );
            let guard = SubmitGuard {
                controller: self,
                seq,
                finished: false,
            };
            (guard, state.values.clone(), state.errors.clone())
        };

        if !errors.is_empty() {
            on_error(SubmitFailure::Invalid(errors));
            guard.finish(false);
            return SubmitOutcome::Invalid;
        }

        match on_success(values).await {
            Ok(()) => {
                if guard.finish(self.options.reset_on_submit) {
                    SubmitOutcome::Succeeded
                } else {
                    SubmitOutcome::Superseded
                }
            }
            Err(e) => {
                on_error(SubmitFailure::Rejected(e));
                if guard.finish(false) {
                    SubmitOutcome::Rejected
                } else {
                    SubmitOutcome::Superseded
                }
            }
        }
    }

    /// Ends submission `seq`. Returns `false` if a newer one has started.
    fn finish_submit(&self, seq: u64, reset: bool) -> bool {
        let mut state = self.write_state();
        if self.sequence.load(Ordering::SeqCst) != seq {
            debug!("submission {} superseded", seq);
            return false;
        }
        if reset {
            state.reset();
        }
        state.is_submitting = false;
        true
    }
}

/// Clears `is_submitting` if the submit future is dropped mid-flight.
struct SubmitGuard<'a> {
    controller: &'a FormController,
    seq: u64,
    finished: bool,
}

impl SubmitGuard<'_> {
    fn finish(mut self, reset: bool) -> bool {
        self.finished = true;
        self.controller.finish_submit(self.seq, reset)
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.controller.finish_submit(self.seq, false);
        }
    }
}
