//! Data model for the funnel answer set
//!
//! `FormData` accumulates everything a visitor answers during one funnel
//! session. Field names follow the wire format used by the lead endpoint
//! (camelCase, Portuguese field names where the product uses them).

mod lead;

pub use lead::{format_whatsapp, normalize_phone, Lead, LeadContext, LOGO_TOO_LARGE_MARKER};

use serde::{Deserialize, Serialize};

/// Maximum number of brand colors a visitor can pick
pub const MAX_BRAND_COLORS: usize = 3;

/// Maximum number of reference site URLs a visitor can share
pub const MAX_REFERENCE_SITES: usize = 3;

/// Whether the site is for a person or a company
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemandType {
    /// Personal use (pessoa fisica)
    Pf,
    /// Company (pessoa juridica)
    Pj,
}

/// Current situation of the visitor's web presence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteSituation {
    NoSite,
    NewSite,
    ImproveSite,
}

impl SiteSituation {
    /// True when there is an existing site whose URL we should ask for
    pub fn has_current_site(self) -> bool {
        matches!(self, SiteSituation::NewSite | SiteSituation::ImproveSite)
    }
}

/// Which product tier the visitor picked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Simples,
    Institucional,
    Personalizado,
}

impl ProjectType {
    /// Display title used in prompts and notifications
    pub fn title(self) -> &'static str {
        match self {
            ProjectType::Simples => "Presenca Digital",
            ProjectType::Institucional => "Site Institucional",
            ProjectType::Personalizado => "Solucao Personalizada",
        }
    }

    /// Price range label shown to the visitor
    pub fn price_label(self) -> &'static str {
        match self {
            ProjectType::Simples => "a partir de R$ 997",
            ProjectType::Institucional => "a partir de R$ 2.497",
            ProjectType::Personalizado => "sob consulta",
        }
    }

    /// Conversion value in BRL reported to analytics
    pub fn conversion_value(self) -> u32 {
        match self {
            ProjectType::Simples => 997,
            ProjectType::Institucional => 2497,
            ProjectType::Personalizado => 5000,
        }
    }
}

/// How soon the visitor needs the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyType {
    Urgent,
    Normal,
    Flexible,
}

/// Whether the quoted price fits the visitor's budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetFit {
    Yes,
    Evaluate,
    No,
}

/// One entry in the catalog of site features a visitor can request
#[derive(Debug, Clone, Copy)]
pub struct FeatureInfo {
    pub id: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

/// Catalog of selectable site features
pub const AVAILABLE_FEATURES: &[FeatureInfo] = &[
    FeatureInfo {
        id: "whatsapp",
        label: "Botao WhatsApp direto",
        icon: "💬",
    },
    FeatureInfo {
        id: "forms",
        label: "Formulario de orcamento",
        icon: "📝",
    },
    FeatureInfo {
        id: "testimonials",
        label: "Depoimentos de clientes",
        icon: "⭐",
    },
    FeatureInfo {
        id: "gallery",
        label: "Galeria de fotos/portfolio",
        icon: "🖼️",
    },
    FeatureInfo {
        id: "maps",
        label: "Mapa de localizacao",
        icon: "📍",
    },
    FeatureInfo {
        id: "blog",
        label: "Blog pra atrair clientes",
        icon: "📰",
    },
    FeatureInfo {
        id: "scheduling",
        label: "Agendamento online",
        icon: "📅",
    },
    FeatureInfo {
        id: "ecommerce",
        label: "Loja virtual/carrinho",
        icon: "🛒",
    },
    FeatureInfo {
        id: "videos",
        label: "Videos do YouTube/Vimeo",
        icon: "🎬",
    },
    FeatureInfo {
        id: "chat",
        label: "Chat ao vivo",
        icon: "💭",
    },
];

/// Look up a feature by id in the catalog
pub fn find_feature(id: &str) -> Option<&'static FeatureInfo> {
    AVAILABLE_FEATURES.iter().find(|f| f.id == id)
}

/// Accumulated answers for one funnel session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormData {
    // Contact
    pub nome: String,
    pub email: String,
    pub whatsapp: String,
    pub demand_type: Option<DemandType>,
    pub empresa: String,

    // Current situation
    pub situation: Option<SiteSituation>,
    pub current_site_url: String,

    // Project
    pub project_type: Option<ProjectType>,
    pub urgency: Option<UrgencyType>,
    pub desired_features: Vec<String>,

    // Qualification
    pub budget_fit: Option<BudgetFit>,

    // Branding
    pub has_logo: Option<bool>,
    pub logo_file: Option<String>,
    pub logo_file_name: Option<String>,
    pub brand_colors: Vec<String>,
    pub has_references: Option<bool>,
    pub reference_sites: Vec<String>,

    // Free text
    pub additional: String,

    // Consent
    pub lgpd_accepted: bool,

    // Legacy field kept for wire compatibility
    pub objective: String,
}

impl FormData {
    /// First name of the visitor, used to personalize prompts
    pub fn first_name(&self) -> &str {
        self.nome.split_whitespace().next().unwrap_or(&self.nome)
    }

    /// Add a brand color; silently ignored past the cap or when duplicated
    pub fn add_brand_color(&mut self, color: String) {
        if self.brand_colors.len() < MAX_BRAND_COLORS && !self.brand_colors.contains(&color) {
            self.brand_colors.push(color);
        }
    }

    /// Add a reference site URL; silently ignored past the cap
    pub fn add_reference_site(&mut self, url: String) {
        if self.reference_sites.len() < MAX_REFERENCE_SITES {
            self.reference_sites.push(url);
        }
    }

    /// Apply a patch of answers on top of the current set.
    /// Per-field last-writer-wins; bounded collections clamp silently.
    pub fn apply(&mut self, patch: FormPatch) {
        if let Some(nome) = patch.nome {
            self.nome = nome;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(whatsapp) = patch.whatsapp {
            self.whatsapp = whatsapp;
        }
        if let Some(demand_type) = patch.demand_type {
            self.demand_type = Some(demand_type);
        }
        if let Some(empresa) = patch.empresa {
            self.empresa = empresa;
        }
        if let Some(situation) = patch.situation {
            self.situation = Some(situation);
        }
        if let Some(url) = patch.current_site_url {
            self.current_site_url = url;
        }
        if let Some(project_type) = patch.project_type {
            self.project_type = Some(project_type);
        }
        if let Some(urgency) = patch.urgency {
            self.urgency = Some(urgency);
        }
        if let Some(features) = patch.desired_features {
            self.desired_features.clear();
            for id in features {
                if !self.desired_features.contains(&id) {
                    self.desired_features.push(id);
                }
            }
        }
        if let Some(budget_fit) = patch.budget_fit {
            self.budget_fit = Some(budget_fit);
        }
        if let Some(has_logo) = patch.has_logo {
            self.has_logo = Some(has_logo);
        }
        if let Some((file, name)) = patch.logo {
            self.logo_file = Some(file);
            self.logo_file_name = Some(name);
        }
        if let Some(colors) = patch.brand_colors {
            self.brand_colors.clear();
            for color in colors {
                self.add_brand_color(color);
            }
        }
        if let Some(has_references) = patch.has_references {
            self.has_references = Some(has_references);
        }
        if let Some(url) = patch.reference_site {
            self.add_reference_site(url);
        }
        if let Some(additional) = patch.additional {
            self.additional = additional;
        }
        if let Some(accepted) = patch.lgpd_accepted {
            self.lgpd_accepted = accepted;
        }
    }
}

/// A partial update produced by answering one step.
/// Only the fields the step collects are set.
#[derive(Debug, Clone, Default)]
pub struct FormPatch {
    pub nome: Option<String>,
    pub email: Option<String>,
    pub whatsapp: Option<String>,
    pub demand_type: Option<DemandType>,
    pub empresa: Option<String>,
    pub situation: Option<SiteSituation>,
    pub current_site_url: Option<String>,
    pub project_type: Option<ProjectType>,
    pub urgency: Option<UrgencyType>,
    pub desired_features: Option<Vec<String>>,
    pub budget_fit: Option<BudgetFit>,
    pub has_logo: Option<bool>,
    /// Base64 payload and original filename of an uploaded logo
    pub logo: Option<(String, String)>,
    pub brand_colors: Option<Vec<String>>,
    pub has_references: Option<bool>,
    /// A single reference URL appended to the bounded list
    pub reference_site: Option<String>,
    pub additional: Option<String>,
    pub lgpd_accepted: Option<bool>,
}
