//! WhatsApp notification message formatting
//!
//! Builds the summary the sales team receives for every captured lead. The
//! first lines carry a priority tag so hot leads stand out in the chat.

use crate::models::{find_feature, BudgetFit, DemandType, FormData, ProjectType, SiteSituation, UrgencyType};

fn project_emoji(project_type: ProjectType) -> &'static str {
    match project_type {
        ProjectType::Simples => "🚀",
        ProjectType::Institucional => "💼",
        ProjectType::Personalizado => "⚡",
    }
}

fn situation_label(situation: SiteSituation) -> &'static str {
    match situation {
        SiteSituation::NoSite => "Primeiro site",
        SiteSituation::NewSite => "Quer site novo (tem atual)",
        SiteSituation::ImproveSite => "Quer melhorias no site atual",
    }
}

fn urgency_label(urgency: UrgencyType) -> &'static str {
    match urgency {
        UrgencyType::Urgent => "Urgente (2 semanas)",
        UrgencyType::Normal => "Normal (30-60 dias)",
        UrgencyType::Flexible => "Sem pressa",
    }
}

fn budget_label(budget: BudgetFit) -> &'static str {
    match budget {
        BudgetFit::Yes => "Dentro do orcamento",
        BudgetFit::Evaluate => "Precisa avaliar",
        BudgetFit::No => "Acima do orcamento",
    }
}

/// Lead temperature from budget fit, boosted when the deadline is urgent
fn priority_tag(form: &FormData) -> &'static str {
    if form.urgency == Some(UrgencyType::Urgent) && form.budget_fit != Some(BudgetFit::No) {
        return "🔥🔥 *LEAD URGENTE*";
    }
    match form.budget_fit {
        Some(BudgetFit::No) => "❄️ *LEAD FRIO*",
        Some(BudgetFit::Evaluate) => "🤔 *LEAD MORNO*",
        _ => "🔥 *LEAD QUENTE*",
    }
}

fn feature_lines(ids: &[String]) -> String {
    if ids.is_empty() {
        return "Nenhuma selecionada".to_string();
    }
    ids.iter()
        .map(|id| match find_feature(id) {
            Some(f) => format!("{} {}", f.icon, f.label),
            None => id.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n   ")
}

/// Build the notification text for a captured lead
pub fn build_message(form: &FormData) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("🔔 *NOVO LEAD - sites.biomo.com.br*".to_string());
    lines.push(priority_tag(form).to_string());
    lines.push(String::new());

    match form.project_type {
        Some(pt) => {
            lines.push(format!("{} *Tipo:* {}", project_emoji(pt), pt.title()));
            lines.push(format!("💰 *Faixa:* {}", pt.price_label()));
        }
        None => {
            lines.push("🌐 *Tipo:* Nao definido".to_string());
            lines.push("💰 *Faixa:* Nao definida".to_string());
        }
    }
    if let Some(urgency) = form.urgency {
        lines.push(format!("⏰ *Prazo:* {}", urgency_label(urgency)));
    }
    if let Some(budget) = form.budget_fit {
        lines.push(format!("📊 *Budget:* {}", budget_label(budget)));
    }

    lines.push(String::new());
    lines.push("👤 *Contato:*".to_string());
    lines.push(format!("   Nome: {}", form.nome));
    lines.push(format!("   WhatsApp: {}", form.whatsapp));
    lines.push(format!("   Email: {}", form.email));
    if !form.empresa.trim().is_empty() {
        lines.push(format!("   Empresa: {}", form.empresa));
    }
    let demand = match form.demand_type {
        Some(DemandType::Pf) => "Pessoa Fisica",
        _ => "Pessoa Juridica",
    };
    lines.push(format!("   Tipo: {}", demand));

    lines.push(String::new());
    lines.push("📋 *Projeto:*".to_string());
    let situation = form
        .situation
        .map(situation_label)
        .unwrap_or("Nao informada");
    lines.push(format!("   Situacao: {}", situation));
    if !form.current_site_url.trim().is_empty() {
        lines.push(format!("   Site atual: {}", form.current_site_url));
    }

    lines.push(String::new());
    lines.push("🛠️ *Funcionalidades:*".to_string());
    lines.push(format!("   {}", feature_lines(&form.desired_features)));

    lines.push(String::new());
    lines.push("🎨 *Branding:*".to_string());
    let logo = if form.has_logo == Some(true) {
        format!(
            "Enviada ({})",
            form.logo_file_name.as_deref().unwrap_or("sem nome")
        )
    } else {
        "Nao tem".to_string()
    };
    lines.push(format!("   Logo: {}", logo));
    let colors = if form.brand_colors.is_empty() {
        "Nao definidas".to_string()
    } else {
        form.brand_colors.join(", ")
    };
    lines.push(format!("   Cores: {}", colors));

    lines.push(String::new());
    lines.push("🔗 *Referencias:*".to_string());
    let refs: Vec<&str> = form
        .reference_sites
        .iter()
        .map(String::as_str)
        .filter(|u| !u.is_empty())
        .collect();
    if refs.is_empty() {
        lines.push("   Nenhuma".to_string());
    } else {
        lines.push(format!("   {}", refs.join("\n   ")));
    }

    if !form.additional.trim().is_empty() {
        lines.push(String::new());
        lines.push("📝 *Observacoes:*".to_string());
        lines.push(format!("   {}", form.additional));
    }

    lines.push(String::new());
    lines.push("---".to_string());
    lines.push("_Lead capturado automaticamente_".to_string());
    lines.push("_Responder em ate 2h_".to_string());

    lines.join("\n")
}
