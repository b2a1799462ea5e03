//! End-to-end funnel scenarios against the public library API

use lead_funnel_lib::analytics::{AnalyticsSink, ConversionEvent};
use lead_funnel_lib::file_storage::progress::{ProgressStore, SessionRestorer};
use lead_funnel_lib::file_storage::FileResult;
use lead_funnel_lib::funnel::{
    submit, FunnelMachine, LeadRepository, NotificationSink, StepKey,
};
use lead_funnel_lib::models::{
    BudgetFit, DemandType, FormPatch, Lead, LeadContext, ProjectType, SiteSituation, UrgencyType,
};
use std::cell::RefCell;
use tempfile::TempDir;

struct MemoryRepo {
    saved: RefCell<Vec<Lead>>,
}

impl MemoryRepo {
    fn new() -> Self {
        Self {
            saved: RefCell::new(Vec::new()),
        }
    }
}

impl LeadRepository for MemoryRepo {
    fn save_lead(&self, lead: &Lead) -> FileResult<String> {
        self.saved.borrow_mut().push(lead.clone());
        Ok(format!("lead_{:012}", self.saved.borrow().len()))
    }
}

struct MemorySink {
    messages: RefCell<Vec<String>>,
}

impl MemorySink {
    fn new() -> Self {
        Self {
            messages: RefCell::new(Vec::new()),
        }
    }
}

impl NotificationSink for MemorySink {
    async fn notify(&self, message: &str) -> Result<(), String> {
        self.messages.borrow_mut().push(message.to_string());
        Ok(())
    }
}

#[derive(Default)]
struct MemoryAnalytics {
    events: RefCell<Vec<ConversionEvent>>,
}

impl AnalyticsSink for MemoryAnalytics {
    fn track(&self, event: &ConversionEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

fn patch(build: impl FnOnce(&mut FormPatch)) -> FormPatch {
    let mut p = FormPatch::default();
    build(&mut p);
    p
}

/// Drive a machine through the shared contact steps up to demand type
fn answer_contact(machine: &mut FunnelMachine, nome: &str) {
    machine.advance(FormPatch::default());
    machine.advance(patch(|p| p.nome = Some(nome.to_string())));
    machine.advance(patch(|p| p.email = Some("contato@exemplo.com.br".to_string())));
    machine.advance(patch(|p| p.whatsapp = Some("11987654321".to_string())));
    assert_eq!(machine.current(), StepKey::DemandType);
}

#[tokio::test]
async fn business_lead_full_journey() {
    let dir = TempDir::new().unwrap();
    let progress = ProgressStore::new(dir.path());

    let mut machine = FunnelMachine::new();
    answer_contact(&mut machine, "Ana Souza");

    machine.advance(patch(|p| p.demand_type = Some(DemandType::Pj)));
    assert_eq!(machine.current(), StepKey::CompanyName);
    machine.advance(patch(|p| p.empresa = Some("Acme".to_string())));
    machine.advance(patch(|p| p.situation = Some(SiteSituation::NoSite)));
    // No existing site, the URL step is skipped
    assert_eq!(machine.current(), StepKey::ProjectType);

    machine.advance(patch(|p| p.project_type = Some(ProjectType::Institucional)));
    machine.advance(patch(|p| p.urgency = Some(UrgencyType::Urgent)));
    machine.advance(patch(|p| {
        p.desired_features = Some(vec!["whatsapp".to_string(), "gallery".to_string()])
    }));
    machine.advance(patch(|p| p.budget_fit = Some(BudgetFit::Yes)));
    machine.advance(patch(|p| p.has_logo = Some(false)));
    // No logo, branding upload steps are skipped
    assert_eq!(machine.current(), StepKey::HasReferences);

    machine.advance(patch(|p| p.has_references = Some(false)));
    machine.advance(patch(|p| p.additional = Some("Site antes do lancamento".to_string())));
    assert_eq!(machine.current(), StepKey::Lgpd);

    // Progress is saved mid-flow and cleared after submission
    progress.save(machine.current(), machine.form()).unwrap();
    assert!(progress.load().is_some());

    machine.advance(patch(|p| p.lgpd_accepted = Some(true)));
    assert_eq!(machine.current(), StepKey::Submitting);

    let repo = MemoryRepo::new();
    let sink = MemorySink::new();
    let analytics = MemoryAnalytics::default();
    let ctx = LeadContext {
        source: "sites.biomo.com.br".to_string(),
        user_agent: None,
        ip: None,
    };

    let outcome = submit(&mut machine, &repo, &sink, &analytics, &progress, &ctx)
        .await
        .unwrap();

    assert!(outcome.lead_id.is_some());
    assert!(outcome.notified);
    assert_eq!(machine.current(), StepKey::Success);
    assert!(progress.load().is_none());

    let saved = repo.saved.borrow();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].empresa.as_deref(), Some("Acme"));
    assert_eq!(saved[0].whatsapp_formatted, "(11) 98765-4321");
    assert_eq!(saved[0].status, "novo");

    let messages = sink.messages.borrow();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("LEAD URGENTE"));
    assert!(messages[0].contains("Empresa: Acme"));

    assert_eq!(analytics.events.borrow()[0].value, 2497);

    // A second submit attempt is rejected, the machine already completed
    drop(saved);
    drop(messages);
    let second = submit(&mut machine, &repo, &sink, &analytics, &progress, &ctx).await;
    assert!(second.is_err());
    assert_eq!(repo.saved.borrow().len(), 1);
}

#[tokio::test]
async fn personal_lead_skips_company_and_goes_back_cleanly() {
    let mut machine = FunnelMachine::new();
    answer_contact(&mut machine, "Bruno Lima");

    machine.advance(patch(|p| p.demand_type = Some(DemandType::Pf)));
    assert_eq!(machine.current(), StepKey::Situation);

    // Back-navigation skips the company step a personal lead never sees
    assert_eq!(machine.go_back(), StepKey::DemandType);

    machine.advance(patch(|p| p.demand_type = Some(DemandType::Pf)));
    machine.advance(patch(|p| p.situation = Some(SiteSituation::ImproveSite)));
    assert_eq!(machine.current(), StepKey::CurrentSiteUrl);
    machine.advance(patch(|p| p.current_site_url = Some("meusite.com.br".to_string())));
    assert_eq!(machine.current(), StepKey::ProjectType);
}

#[tokio::test]
async fn interrupted_session_resumes_from_snapshot() {
    let dir = TempDir::new().unwrap();
    let progress = ProgressStore::new(dir.path());

    let mut machine = FunnelMachine::new();
    answer_contact(&mut machine, "Clara Dias");
    machine.advance(patch(|p| p.demand_type = Some(DemandType::Pf)));
    progress.save(machine.current(), machine.form()).unwrap();

    // A fresh machine picks up where the visitor left off, exactly once
    let mut restorer = SessionRestorer::new();
    let mut resumed = FunnelMachine::new();
    assert_eq!(
        restorer.restore(&progress, &mut resumed),
        Some(StepKey::Situation)
    );
    assert_eq!(resumed.form().nome, "Clara Dias");
    assert_eq!(resumed.prompt(), "Qual dessas situacoes mais te representa?");

    let mut another = FunnelMachine::new();
    assert!(restorer.restore(&progress, &mut another).is_none());
}

#[tokio::test]
async fn reference_collection_loops_then_moves_on() {
    let mut machine = FunnelMachine::new();
    answer_contact(&mut machine, "Duda Reis");
    machine.advance(patch(|p| p.demand_type = Some(DemandType::Pf)));
    machine.advance(patch(|p| p.situation = Some(SiteSituation::NoSite)));
    machine.advance(patch(|p| p.project_type = Some(ProjectType::Simples)));
    machine.advance(patch(|p| p.urgency = Some(UrgencyType::Flexible)));
    machine.advance(FormPatch::default());
    machine.advance(patch(|p| p.budget_fit = Some(BudgetFit::Evaluate)));
    machine.advance(patch(|p| p.has_logo = Some(false)));
    machine.advance(patch(|p| p.has_references = Some(true)));
    assert_eq!(machine.current(), StepKey::ReferenceSites);

    machine.advance(patch(|p| p.reference_site = Some("https://ref1.com".to_string())));
    assert_eq!(machine.current(), StepKey::ReferenceSites);

    // Skipping with no new reference ends the loop early
    machine.advance(FormPatch::default());
    assert_eq!(machine.current(), StepKey::AdditionalNotes);
    assert_eq!(machine.form().reference_sites.len(), 1);
}
