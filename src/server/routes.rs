//! Funnel API handlers
//!
//! The lead endpoint never blocks the visitor: a failed store write still
//! answers 200 with a warning, and the full payload lands in the log for
//! manual recovery. Only a body that is not JSON at all is a hard error.

use super::state::ServerAppState;
use crate::funnel::validators::validate_logo_payload;
use crate::models::{FormData, Lead, LeadContext};
use crate::notify::build_message;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};

/// Response of `POST /api/lead`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadResponse {
    pub success: bool,
    pub lead_id: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Response of `POST /api/notify`
#[derive(Debug, Serialize)]
pub struct NotifyResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyPayload {
    pub form_data: FormData,
}

fn error_response(status: StatusCode, message: &str) -> axum::response::Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

fn lead_context(state: &ServerAppState, headers: &HeaderMap) -> LeadContext {
    LeadContext {
        source: state.config.source.clone(),
        user_agent: headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        ip: headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string()),
    }
}

/// `POST /api/lead` - persist a captured lead
pub async fn lead_handler(
    State(state): State<ServerAppState>,
    headers: HeaderMap,
    body: String,
) -> axum::response::Response {
    // The body is parsed by hand so a broken payload is a server-side error,
    // not an extractor rejection
    let form: FormData = match serde_json::from_str(&body) {
        Ok(form) => form,
        Err(e) => {
            log::error!("Malformed lead payload: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Erro ao salvar lead");
        }
    };

    if form.nome.trim().is_empty() || form.whatsapp.trim().is_empty() || form.email.trim().is_empty()
    {
        return error_response(StatusCode::BAD_REQUEST, "Dados obrigatorios faltando");
    }

    let mut form = form;
    if let (Some(payload), Some(name)) = (&form.logo_file, &form.logo_file_name) {
        if !validate_logo_payload(name, payload) {
            log::warn!("Dropping invalid logo upload '{}'", name);
            form.logo_file = None;
            form.logo_file_name = None;
        }
    }

    let lead = Lead::from_form(&form, &lead_context(&state, &headers));

    match state.lead_store.save(&lead) {
        Ok(id) => {
            log::info!("Lead saved: {}", id);
            Json(LeadResponse {
                success: true,
                lead_id: Some(id),
                message: "Lead salvo com sucesso".to_string(),
                warning: None,
            })
            .into_response()
        }
        Err(e) => {
            log::error!("Failed to save lead: {}", e);
            match serde_json::to_string(&lead) {
                Ok(json) => log::error!("LEAD_BACKUP {}", json),
                Err(e) => log::error!("LEAD_BACKUP unavailable, serialization failed: {}", e),
            }
            // The visitor is never blocked by a storage problem
            Json(LeadResponse {
                success: true,
                lead_id: None,
                message: "Lead registrado".to_string(),
                warning: Some("Lead nao persistido, registrado no log".to_string()),
            })
            .into_response()
        }
    }
}

/// `POST /api/notify` - send the sales notification for a lead
pub async fn notify_handler(
    State(state): State<ServerAppState>,
    body: String,
) -> axum::response::Response {
    let payload: NotifyPayload = match serde_json::from_str(&body) {
        Ok(payload) => payload,
        Err(e) => {
            log::error!("Malformed notify payload: {}", e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Falha ao enviar notificacao",
            );
        }
    };

    let form = &payload.form_data;
    if form.nome.trim().is_empty() || form.whatsapp.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Dados do lead incompletos");
    }

    let message = build_message(form);

    if !state.relay.is_configured() {
        log::info!("Relay not configured, notification text:\n{}", message);
        return Json(NotifyResponse {
            success: true,
            message: "Notificacao registrada (WhatsApp indisponivel)".to_string(),
            warning: Some("Relay nao configurado".to_string()),
        })
        .into_response();
    }

    match state
        .relay
        .send_text(&state.config.notify_number, &message)
        .await
    {
        Ok(()) => Json(NotifyResponse {
            success: true,
            message: "Notificacao enviada com sucesso".to_string(),
            warning: None,
        })
        .into_response(),
        Err(e) => {
            log::warn!("Lead notification not delivered: {}", e);
            log::info!("Undelivered notification text:\n{}", message);
            Json(NotifyResponse {
                success: true,
                message: "Notificacao registrada (WhatsApp indisponivel)".to_string(),
                warning: Some(e),
            })
            .into_response()
        }
    }
}

/// `GET /api/leads` - list captured lead summaries, newest first
pub async fn leads_handler(State(state): State<ServerAppState>) -> axum::response::Response {
    Json(state.lead_store.list()).into_response()
}
