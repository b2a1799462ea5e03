//! Static step table for the lead funnel
//!
//! Steps are immutable configuration: each one carries its prompt template,
//! the kind of input it collects, an optional validation rule and a
//! transition rule evaluated against the accumulated answers. The table is
//! declarative so both the chat and the card-quiz front ends render from the
//! same definitions.

use super::validators::ValidatorKind;
use crate::models::{DemandType, FormData, MAX_REFERENCE_SITES};
use serde::{Deserialize, Serialize};

/// Stable identifier for each funnel step.
/// The discriminant order is the static step order used for back-navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKey {
    Intro,
    Name,
    Email,
    Whatsapp,
    DemandType,
    CompanyName,
    Situation,
    CurrentSiteUrl,
    ProjectType,
    Urgency,
    Features,
    BudgetFit,
    HasLogo,
    LogoUpload,
    BrandColors,
    HasReferences,
    ReferenceSites,
    AdditionalNotes,
    Lgpd,
    Submitting,
    Success,
}

/// Static order of all steps, used for backward walks and the fallback
/// successor when a branch rule is misconfigured
pub const STEP_ORDER: &[StepKey] = &[
    StepKey::Intro,
    StepKey::Name,
    StepKey::Email,
    StepKey::Whatsapp,
    StepKey::DemandType,
    StepKey::CompanyName,
    StepKey::Situation,
    StepKey::CurrentSiteUrl,
    StepKey::ProjectType,
    StepKey::Urgency,
    StepKey::Features,
    StepKey::BudgetFit,
    StepKey::HasLogo,
    StepKey::LogoUpload,
    StepKey::BrandColors,
    StepKey::HasReferences,
    StepKey::ReferenceSites,
    StepKey::AdditionalNotes,
    StepKey::Lgpd,
    StepKey::Submitting,
    StepKey::Success,
];

impl StepKey {
    /// Position in the static step order
    pub fn index(self) -> usize {
        self as usize
    }

    /// Terminal or transient states where no user input is accepted
    pub fn is_terminal(self) -> bool {
        matches!(self, StepKey::Submitting | StepKey::Success)
    }
}

/// What kind of input widget a step expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Email,
    Tel,
    Url,
    Textarea,
    QuickReply,
    MultiSelect,
    ProjectCards,
    Upload,
    Colors,
    Consent,
    None,
}

/// Prompt template; `{nome}` is replaced with the visitor's first name
#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate(pub &'static str);

impl PromptTemplate {
    pub fn render(&self, form: &FormData) -> String {
        self.0.replace("{nome}", form.first_name())
    }
}

/// Predicate over the answer set, used by branch rules and by the
/// reachability preconditions of conditional steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    Always,
    DemandIs(DemandType),
    HasCurrentSite,
    HasLogo(bool),
    HasReferences(bool),
    ConsentGiven,
    /// The advance that just ran appended a reference and the list is not full
    AppendedReferenceBelowCap,
}

impl Predicate {
    /// Evaluate against the answer set.
    /// `appended_reference` is true when the patch applied by the current
    /// advance added a reference site.
    pub fn eval(&self, form: &FormData, appended_reference: bool) -> bool {
        match self {
            Predicate::Always => true,
            Predicate::DemandIs(expected) => form.demand_type == Some(*expected),
            Predicate::HasCurrentSite => form
                .situation
                .map(|s| s.has_current_site())
                .unwrap_or(false),
            Predicate::HasLogo(expected) => form.has_logo == Some(*expected),
            Predicate::HasReferences(expected) => form.has_references == Some(*expected),
            Predicate::ConsentGiven => form.lgpd_accepted,
            Predicate::AppendedReferenceBelowCap => {
                appended_reference && form.reference_sites.len() < MAX_REFERENCE_SITES
            }
        }
    }
}

/// One branch of a conditional transition, evaluated in priority order
#[derive(Debug, Clone, Copy)]
pub struct BranchRule {
    pub when: Predicate,
    pub to: StepKey,
}

/// How a step decides where to go next
#[derive(Debug, Clone, Copy)]
pub enum Transition {
    /// Single unconditional successor
    Next(StepKey),
    /// Branch rules evaluated in order; first match wins
    Branch(&'static [BranchRule]),
    /// No user-driven transition (submitting/success)
    Terminal,
}

/// Definition of one funnel step
#[derive(Debug, Clone, Copy)]
pub struct StepDef {
    pub key: StepKey,
    pub prompt: PromptTemplate,
    pub subtitle: Option<&'static str>,
    pub input: InputKind,
    pub validator: Option<ValidatorKind>,
    pub transition: Transition,
}

const DEMAND_TYPE_BRANCHES: &[BranchRule] = &[
    BranchRule {
        when: Predicate::DemandIs(DemandType::Pj),
        to: StepKey::CompanyName,
    },
    BranchRule {
        when: Predicate::Always,
        to: StepKey::Situation,
    },
];

const SITUATION_BRANCHES: &[BranchRule] = &[
    BranchRule {
        when: Predicate::HasCurrentSite,
        to: StepKey::CurrentSiteUrl,
    },
    BranchRule {
        when: Predicate::Always,
        to: StepKey::ProjectType,
    },
];

const HAS_LOGO_BRANCHES: &[BranchRule] = &[
    BranchRule {
        when: Predicate::HasLogo(true),
        to: StepKey::LogoUpload,
    },
    BranchRule {
        when: Predicate::Always,
        to: StepKey::HasReferences,
    },
];

const HAS_REFERENCES_BRANCHES: &[BranchRule] = &[
    BranchRule {
        when: Predicate::HasReferences(true),
        to: StepKey::ReferenceSites,
    },
    BranchRule {
        when: Predicate::Always,
        to: StepKey::AdditionalNotes,
    },
];

const REFERENCE_SITES_BRANCHES: &[BranchRule] = &[
    BranchRule {
        when: Predicate::AppendedReferenceBelowCap,
        to: StepKey::ReferenceSites,
    },
    BranchRule {
        when: Predicate::Always,
        to: StepKey::AdditionalNotes,
    },
];

const LGPD_BRANCHES: &[BranchRule] = &[
    BranchRule {
        when: Predicate::ConsentGiven,
        to: StepKey::Submitting,
    },
    // Without consent the visitor stays on the consent step
    BranchRule {
        when: Predicate::Always,
        to: StepKey::Lgpd,
    },
];

/// The full step table, aligned with `STEP_ORDER`
const STEPS: &[StepDef] = &[
    StepDef {
        key: StepKey::Intro,
        prompt: PromptTemplate("Vamos criar o site que vai transformar seu negocio?"),
        subtitle: Some("Em 2 minutos, descubra a solucao perfeita pra voce"),
        input: InputKind::None,
        validator: None,
        transition: Transition::Next(StepKey::Name),
    },
    StepDef {
        key: StepKey::Name,
        prompt: PromptTemplate("Antes de comecar... como posso te chamar?"),
        subtitle: Some("Vou personalizar tudo pra voce"),
        input: InputKind::Text,
        validator: Some(ValidatorKind::Text),
        transition: Transition::Next(StepKey::Email),
    },
    StepDef {
        key: StepKey::Email,
        prompt: PromptTemplate("{nome}, qual seu melhor e-mail?"),
        subtitle: Some("Vou enviar sua proposta exclusiva por la"),
        input: InputKind::Email,
        validator: Some(ValidatorKind::Email),
        transition: Transition::Next(StepKey::Whatsapp),
    },
    StepDef {
        key: StepKey::Whatsapp,
        prompt: PromptTemplate("E seu WhatsApp, {nome}?"),
        subtitle: Some("Pra gente conversar de forma rapida e direta"),
        input: InputKind::Tel,
        validator: Some(ValidatorKind::Phone),
        transition: Transition::Next(StepKey::DemandType),
    },
    StepDef {
        key: StepKey::DemandType,
        prompt: PromptTemplate("O projeto e pra voce ou pra sua empresa?"),
        subtitle: None,
        input: InputKind::QuickReply,
        validator: None,
        transition: Transition::Branch(DEMAND_TYPE_BRANCHES),
    },
    StepDef {
        key: StepKey::CompanyName,
        prompt: PromptTemplate("Qual o nome do seu negocio?"),
        subtitle: Some("Quero conhecer melhor sua marca"),
        input: InputKind::Text,
        validator: Some(ValidatorKind::Text),
        transition: Transition::Next(StepKey::Situation),
    },
    StepDef {
        key: StepKey::Situation,
        prompt: PromptTemplate("Qual dessas situacoes mais te representa?"),
        subtitle: None,
        input: InputKind::QuickReply,
        validator: None,
        transition: Transition::Branch(SITUATION_BRANCHES),
    },
    StepDef {
        key: StepKey::CurrentSiteUrl,
        prompt: PromptTemplate("Me passa o link do seu site atual"),
        subtitle: Some("Vou analisar e sugerir melhorias"),
        input: InputKind::Url,
        validator: Some(ValidatorKind::Url),
        transition: Transition::Next(StepKey::ProjectType),
    },
    StepDef {
        key: StepKey::ProjectType,
        prompt: PromptTemplate("{nome}, qual solucao combina com seu momento?"),
        subtitle: Some("Cada uma foi pensada pra um objetivo diferente"),
        input: InputKind::ProjectCards,
        validator: None,
        transition: Transition::Next(StepKey::Urgency),
    },
    StepDef {
        key: StepKey::Urgency,
        prompt: PromptTemplate("Pra quando voce precisa do site pronto?"),
        subtitle: None,
        input: InputKind::QuickReply,
        validator: None,
        transition: Transition::Next(StepKey::Features),
    },
    StepDef {
        key: StepKey::Features,
        prompt: PromptTemplate("O que nao pode faltar no seu site?"),
        subtitle: Some("Marque tudo que faz sentido pro seu negocio"),
        input: InputKind::MultiSelect,
        validator: None,
        transition: Transition::Next(StepKey::BudgetFit),
    },
    StepDef {
        key: StepKey::BudgetFit,
        prompt: PromptTemplate("Esse investimento funciona pra voce?"),
        subtitle: None,
        input: InputKind::QuickReply,
        validator: None,
        transition: Transition::Next(StepKey::HasLogo),
    },
    StepDef {
        key: StepKey::HasLogo,
        prompt: PromptTemplate("{nome}, voce ja tem uma logo?"),
        subtitle: Some("Se nao tiver, a gente pode ajudar!"),
        input: InputKind::QuickReply,
        validator: None,
        transition: Transition::Branch(HAS_LOGO_BRANCHES),
    },
    StepDef {
        key: StepKey::LogoUpload,
        prompt: PromptTemplate("Perfeito! Envia ela aqui"),
        subtitle: Some("PNG, JPG ou SVG - qualquer um serve"),
        input: InputKind::Upload,
        validator: None,
        transition: Transition::Next(StepKey::BrandColors),
    },
    StepDef {
        key: StepKey::BrandColors,
        prompt: PromptTemplate("Quais cores representam sua marca?"),
        subtitle: Some("Vamos manter a identidade visual"),
        input: InputKind::Colors,
        validator: Some(ValidatorKind::Color),
        transition: Transition::Next(StepKey::HasReferences),
    },
    StepDef {
        key: StepKey::HasReferences,
        prompt: PromptTemplate("Tem algum site que voce admira?"),
        subtitle: Some("Referencias ajudam MUITO no resultado final"),
        input: InputKind::QuickReply,
        validator: None,
        transition: Transition::Branch(HAS_REFERENCES_BRANCHES),
    },
    StepDef {
        key: StepKey::ReferenceSites,
        prompt: PromptTemplate("Compartilha os links aqui"),
        subtitle: Some("Pode ser ate 3 sites que voce curte"),
        input: InputKind::Url,
        validator: Some(ValidatorKind::Url),
        transition: Transition::Branch(REFERENCE_SITES_BRANCHES),
    },
    StepDef {
        key: StepKey::AdditionalNotes,
        prompt: PromptTemplate("Quer me contar mais alguma coisa?"),
        subtitle: Some("Detalhes, ideias, sonhos... tudo vale!"),
        input: InputKind::Textarea,
        validator: Some(ValidatorKind::Text),
        transition: Transition::Next(StepKey::Lgpd),
    },
    StepDef {
        key: StepKey::Lgpd,
        prompt: PromptTemplate("Quase la, {nome}!"),
        subtitle: Some("So precisamos da sua autorizacao pra finalizar"),
        input: InputKind::Consent,
        validator: None,
        transition: Transition::Branch(LGPD_BRANCHES),
    },
    StepDef {
        key: StepKey::Submitting,
        prompt: PromptTemplate("Preparando sua proposta..."),
        subtitle: Some("Isso leva apenas alguns segundos"),
        input: InputKind::None,
        validator: None,
        transition: Transition::Terminal,
    },
    StepDef {
        key: StepKey::Success,
        prompt: PromptTemplate("Pronto, {nome}!"),
        subtitle: Some("Sua proposta personalizada esta a caminho"),
        input: InputKind::None,
        validator: None,
        transition: Transition::Terminal,
    },
];

/// Look up the definition of a step
pub fn step_def(key: StepKey) -> &'static StepDef {
    &STEPS[key.index()]
}

/// Reachability precondition of a conditional step.
/// `None` means the step is always reachable. Backward navigation skips any
/// step whose precondition does not hold for the current answer set, so
/// going back never lands on a step forward navigation would have skipped.
pub fn precondition(key: StepKey) -> Option<Predicate> {
    match key {
        StepKey::CompanyName => Some(Predicate::DemandIs(DemandType::Pj)),
        StepKey::CurrentSiteUrl => Some(Predicate::HasCurrentSite),
        StepKey::LogoUpload | StepKey::BrandColors => Some(Predicate::HasLogo(true)),
        StepKey::ReferenceSites => Some(Predicate::HasReferences(true)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SiteSituation;

    #[test]
    fn test_table_aligned_with_step_order() {
        assert_eq!(STEPS.len(), STEP_ORDER.len());
        for (i, def) in STEPS.iter().enumerate() {
            assert_eq!(def.key, STEP_ORDER[i], "step table out of order at {}", i);
            assert_eq!(def.key.index(), i);
        }
    }

    #[test]
    fn test_step_key_wire_format() {
        assert_eq!(
            serde_json::to_string(&StepKey::DemandType).unwrap(),
            "\"demand_type\""
        );
        assert_eq!(
            serde_json::from_str::<StepKey>("\"reference_sites\"").unwrap(),
            StepKey::ReferenceSites
        );
    }

    #[test]
    fn test_prompt_template_renders_first_name() {
        let form = FormData {
            nome: "Carlos Eduardo Lima".to_string(),
            ..Default::default()
        };
        let rendered = step_def(StepKey::Email).prompt.render(&form);
        assert_eq!(rendered, "Carlos, qual seu melhor e-mail?");
    }

    #[test]
    fn test_branch_rules_always_have_fallback() {
        for def in STEPS {
            if let Transition::Branch(rules) = def.transition {
                assert!(
                    rules.iter().any(|r| r.when == Predicate::Always),
                    "step {:?} has no Always fallback",
                    def.key
                );
            }
        }
    }

    #[test]
    fn test_precondition_current_site_url() {
        let pred = precondition(StepKey::CurrentSiteUrl).unwrap();

        let mut form = FormData {
            situation: Some(SiteSituation::NoSite),
            ..Default::default()
        };
        assert!(!pred.eval(&form, false));

        form.situation = Some(SiteSituation::ImproveSite);
        assert!(pred.eval(&form, false));
    }

    #[test]
    fn test_terminal_steps() {
        assert!(StepKey::Submitting.is_terminal());
        assert!(StepKey::Success.is_terminal());
        assert!(!StepKey::Lgpd.is_terminal());
    }
}
