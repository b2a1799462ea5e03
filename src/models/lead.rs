//! Persisted lead document
//!
//! A `Lead` is the append-only record written when a visitor completes the
//! funnel. The serialized shape is the wire contract of `POST /api/lead`.

use super::{BudgetFit, DemandType, FormData, ProjectType, SiteSituation, UrgencyType};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Logo payloads above this size are not stored inline
const MAX_STORED_LOGO_CHARS: usize = 500_000;

/// Placeholder written in place of an oversized logo payload, so the record
/// still shows that a logo was provided
pub const LOGO_TOO_LARGE_MARKER: &str = "[LOGO_TOO_LARGE]";

/// Request-scoped metadata captured alongside a lead
#[derive(Debug, Clone, Default)]
pub struct LeadContext {
    /// Source tag identifying which property captured the lead
    pub source: String,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
}

/// One persisted lead record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    // Contact info
    pub nome: String,
    /// Digits-only phone number
    pub whatsapp: String,
    /// Display-formatted phone number as typed/masked
    pub whatsapp_formatted: String,
    pub email: String,
    pub empresa: Option<String>,

    // Demand info
    pub demand_type: Option<DemandType>,

    // Project info
    pub situation: Option<SiteSituation>,
    pub current_site_url: Option<String>,
    pub project_type: Option<ProjectType>,
    pub urgency: Option<UrgencyType>,
    pub desired_features: Vec<String>,
    pub objective: Option<String>,

    // Branding
    pub has_logo: bool,
    pub logo_file: Option<String>,
    pub logo_file_name: Option<String>,
    pub brand_colors: Vec<String>,
    pub reference_sites: Vec<String>,

    // Qualification
    pub budget_fit: Option<BudgetFit>,
    pub additional: Option<String>,

    // Legacy field kept for older dashboard queries
    pub site_type: Option<ProjectType>,

    // Metadata
    pub source: String,
    pub created_at: String,
    pub status: String,

    // Tracking
    pub user_agent: Option<String>,
    pub ip: Option<String>,
}

impl Lead {
    /// Build the stored document from an answer set.
    /// Normalizes the phone number and replaces oversized logo payloads with
    /// a placeholder marker instead of failing the whole write.
    pub fn from_form(form: &FormData, ctx: &LeadContext) -> Self {
        let logo_file = match &form.logo_file {
            Some(payload) if payload.len() > MAX_STORED_LOGO_CHARS => {
                log::warn!(
                    "Logo payload too large ({} chars), storing placeholder",
                    payload.len()
                );
                Some(LOGO_TOO_LARGE_MARKER.to_string())
            }
            other => other.clone(),
        };

        Self {
            nome: form.nome.clone(),
            whatsapp: normalize_phone(&form.whatsapp),
            whatsapp_formatted: format_whatsapp(&form.whatsapp),
            email: form.email.clone(),
            empresa: non_empty(&form.empresa),
            demand_type: form.demand_type,
            situation: form.situation,
            current_site_url: non_empty(&form.current_site_url),
            project_type: form.project_type,
            urgency: form.urgency,
            desired_features: form.desired_features.clone(),
            objective: non_empty(&form.objective),
            has_logo: form.has_logo.unwrap_or(false),
            logo_file,
            logo_file_name: form.logo_file_name.clone(),
            brand_colors: form.brand_colors.clone(),
            reference_sites: form.reference_sites.clone(),
            budget_fit: form.budget_fit,
            additional: non_empty(&form.additional),
            site_type: form.project_type,
            source: ctx.source.clone(),
            created_at: Utc::now().to_rfc3339(),
            status: "novo".to_string(),
            user_agent: ctx.user_agent.clone(),
            ip: ctx.ip.clone(),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Strip everything but digits from a phone number
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Format a Brazilian phone number as (XX) XXXXX-XXXX / (XX) XXXX-XXXX.
/// Numbers of unexpected length are returned digits-only.
pub fn format_whatsapp(raw: &str) -> String {
    let digits = normalize_phone(raw);
    match digits.len() {
        11 => format!("({}) {}-{}", &digits[..2], &digits[2..7], &digits[7..]),
        10 => format!("({}) {}-{}", &digits[..2], &digits[2..6], &digits[6..]),
        _ => digits,
    }
}
