//! Submission pipeline
//!
//! Turns a completed funnel session into a persisted lead, a sales
//! notification and a conversion event. The visitor always sees success as
//! long as the machine reached the submitting step: storage and delivery
//! failures are logged loudly for manual recovery but never bubble up.

use super::machine::{FunnelMachine, TransitionError};
use super::steps::StepKey;
use crate::analytics::{generate_lead, AnalyticsSink};
use crate::file_storage::progress::ProgressStore;
use crate::file_storage::FileResult;
use crate::models::{Lead, LeadContext};
use crate::notify::build_message;

/// Where captured leads are persisted
pub trait LeadRepository {
    fn save_lead(&self, lead: &Lead) -> FileResult<String>;
}

/// Where lead notifications are delivered
#[allow(async_fn_in_trait)]
pub trait NotificationSink {
    async fn notify(&self, message: &str) -> Result<(), String>;
}

/// What happened during a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    /// Id of the stored document; `None` when the write failed
    pub lead_id: Option<String>,
    /// Whether the notification was delivered
    pub notified: bool,
}

/// Run the full submission for a machine sitting on the submitting step.
///
/// The only error is calling this when the machine is not submitting; every
/// downstream failure degrades to a logged warning so the visitor's flow
/// always completes.
pub async fn submit(
    machine: &mut FunnelMachine,
    repo: &impl LeadRepository,
    sink: &impl NotificationSink,
    analytics: &impl AnalyticsSink,
    progress: &ProgressStore,
    ctx: &LeadContext,
) -> Result<SubmissionOutcome, TransitionError> {
    if machine.current() != StepKey::Submitting {
        return Err(TransitionError::NotSubmitting(machine.current()));
    }

    let lead = Lead::from_form(machine.form(), ctx);

    let lead_id = match repo.save_lead(&lead) {
        Ok(id) => {
            log::info!("Lead saved: {}", id);
            Some(id)
        }
        Err(e) => {
            log::error!("Failed to save lead: {}", e);
            // Full payload in the log so the lead can be recovered by hand
            match serde_json::to_string(&lead) {
                Ok(json) => log::error!("LEAD_BACKUP {}", json),
                Err(e) => log::error!("LEAD_BACKUP unavailable, serialization failed: {}", e),
            }
            None
        }
    };

    let message = build_message(machine.form());
    let notified = match sink.notify(&message).await {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Lead notification not delivered: {}", e);
            log::info!("Undelivered notification text:\n{}", message);
            false
        }
    };

    analytics.track(&generate_lead(machine.form().project_type));

    machine.complete_submission()?;
    progress.clear();

    Ok(SubmissionOutcome { lead_id, notified })
}
