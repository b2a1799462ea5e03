//! Funnel state machine
//!
//! Owns the current step and the accumulated answer set. Forward transitions
//! evaluate the current step's rule against the post-merge answers; backward
//! navigation walks the static step order, skipping steps whose reachability
//! precondition no longer holds.

use super::steps::{precondition, step_def, StepKey, Transition, STEP_ORDER};
use crate::models::{FormData, FormPatch};
use thiserror::Error;

/// Errors from explicit state transitions
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("cannot restore into step {0:?}")]
    RestoreIntoTerminal(StepKey),
    #[error("submission can only complete from the submitting step, not {0:?}")]
    NotSubmitting(StepKey),
}

/// One visitor's journey through the funnel
#[derive(Debug, Clone)]
pub struct FunnelMachine {
    current: StepKey,
    form: FormData,
}

impl Default for FunnelMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl FunnelMachine {
    pub fn new() -> Self {
        Self {
            current: StepKey::Intro,
            form: FormData::default(),
        }
    }

    pub fn current(&self) -> StepKey {
        self.current
    }

    pub fn form(&self) -> &FormData {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormData {
        &mut self.form
    }

    /// Prompt of the current step, rendered with the visitor's first name
    pub fn prompt(&self) -> String {
        step_def(self.current).prompt.render(&self.form)
    }

    /// Subtitle of the current step, if it has one
    pub fn subtitle(&self) -> Option<&'static str> {
        step_def(self.current).subtitle
    }

    /// Check a raw input value against the current step's validation rule.
    /// Steps without a validator accept anything.
    pub fn validate_input(&self, raw: &str) -> bool {
        match step_def(self.current).validator {
            Some(kind) => super::validators::validate(kind, raw),
            None => true,
        }
    }

    /// Apply a patch of answers and move forward.
    /// Returns the new current step. Advancing from submitting or success is
    /// a no-op so duplicate submissions cannot re-run the flow.
    pub fn advance(&mut self, patch: FormPatch) -> StepKey {
        if self.current.is_terminal() {
            return self.current;
        }

        let appended_reference = patch.reference_site.is_some();
        self.form.apply(patch);

        self.current = match step_def(self.current).transition {
            Transition::Next(next) => next,
            Transition::Branch(rules) => rules
                .iter()
                .find(|rule| rule.when.eval(&self.form, appended_reference))
                .map(|rule| rule.to)
                .unwrap_or_else(|| {
                    // Every branch table ends in Always; reaching this means
                    // the step table is misconfigured. Degrade to the static
                    // successor instead of stalling the visitor.
                    let fallback = step_order_successor(self.current);
                    log::warn!(
                        "No branch matched for step {:?}, falling back to {:?}",
                        self.current,
                        fallback
                    );
                    fallback
                }),
            Transition::Terminal => self.current,
        };
        self.current
    }

    /// Step back to the previous reachable step.
    /// Walks the static order backwards, skipping steps whose precondition
    /// fails for the current answers. From the first step this is a no-op,
    /// and so is stepping back out of submitting or success: a finished
    /// session cannot be re-armed into submitting again.
    pub fn go_back(&mut self) -> StepKey {
        if self.current.is_terminal() {
            return self.current;
        }
        let mut idx = self.current.index();
        while idx > 0 {
            idx -= 1;
            let candidate = STEP_ORDER[idx];
            let reachable = precondition(candidate)
                .map(|pred| pred.eval(&self.form, false))
                .unwrap_or(true);
            if reachable {
                self.current = candidate;
                return self.current;
            }
        }
        self.current
    }

    /// Discard all answers and return to the intro step
    pub fn reset(&mut self) {
        self.current = StepKey::Intro;
        self.form = FormData::default();
    }

    /// Restore a saved session. Terminal steps are not restorable; a visitor
    /// who already submitted starts over instead.
    pub fn restore(&mut self, step: StepKey, form: FormData) -> Result<(), TransitionError> {
        if step.is_terminal() {
            return Err(TransitionError::RestoreIntoTerminal(step));
        }
        self.current = step;
        self.form = form;
        Ok(())
    }

    /// Mark the submission finished and land on the success step
    pub fn complete_submission(&mut self) -> Result<(), TransitionError> {
        if self.current != StepKey::Submitting {
            return Err(TransitionError::NotSubmitting(self.current));
        }
        self.current = StepKey::Success;
        Ok(())
    }
}

fn step_order_successor(step: StepKey) -> StepKey {
    let idx = step.index();
    if idx + 1 < STEP_ORDER.len() {
        STEP_ORDER[idx + 1]
    } else {
        step
    }
}
