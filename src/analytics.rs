//! Conversion event reporting
//!
//! The funnel emits one `generate_lead` event per completed submission with
//! the conversion value of the picked tier. Sinks decide where events go;
//! the default sink writes them to the log for downstream scraping.

use crate::models::ProjectType;
use serde::Serialize;

/// Event name emitted when a lead is captured
pub const EVENT_GENERATE_LEAD: &str = "generate_lead";

/// Conversion value reported when no tier was picked
const DEFAULT_CONVERSION_VALUE: u32 = 997;

/// One conversion event as reported to analytics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionEvent {
    pub event: &'static str,
    pub value: u32,
    pub currency: &'static str,
}

/// Build the lead-capture conversion event for a picked tier
pub fn generate_lead(project_type: Option<ProjectType>) -> ConversionEvent {
    ConversionEvent {
        event: EVENT_GENERATE_LEAD,
        value: project_type
            .map(|pt| pt.conversion_value())
            .unwrap_or(DEFAULT_CONVERSION_VALUE),
        currency: "BRL",
    }
}

/// Destination for conversion events
pub trait AnalyticsSink {
    fn track(&self, event: &ConversionEvent);
}

/// Sink that writes events to the application log
#[derive(Debug, Clone, Default)]
pub struct LogAnalytics;

impl AnalyticsSink for LogAnalytics {
    fn track(&self, event: &ConversionEvent) {
        match serde_json::to_string(event) {
            Ok(json) => log::info!("ANALYTICS {}", json),
            Err(e) => log::warn!("Failed to serialize analytics event: {}", e),
        }
    }
}
