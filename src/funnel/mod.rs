//! The lead funnel: validators, step table, state machine and submission

pub mod machine;
pub mod steps;
pub mod submission;
pub mod validators;

pub use machine::{FunnelMachine, TransitionError};
pub use steps::{step_def, StepKey, STEP_ORDER};
pub use submission::{submit, LeadRepository, NotificationSink, SubmissionOutcome};
pub use validators::{validate, ValidatorKind};
