//! Per-tag normalization tables
//!
//! Each prop lists its sources in priority order. Historical content used
//! different nesting depths for the same logical field (`faq.items` vs
//! `faqs` vs `items`); the first source that is present and of the right
//! shape wins.

use crate::domain::ComponentType;

/// Shape a candidate value must have to be accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Any non-null value
    Any,
    /// A JSON array
    List,
    /// A JSON object
    Object,
}

/// Where a prop value may come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Dotted path into the raw content
    Path(&'static str),
    /// Dotted path into the tag's registry default content
    Default(&'static str),
    /// An empty list, left for the user to fill in
    EmptyList,
    /// An object assembled from nested rules over the same raw content
    Object(&'static [PropRule]),
}

/// One output prop and its prioritized sources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropRule {
    /// Dotted path in the normalized output
    pub target: &'static str,
    pub shape: Shape,
    pub sources: &'static [Source],
}

impl PropRule {
    pub const fn any(target: &'static str, sources: &'static [Source]) -> Self {
        Self { target, shape: Shape::Any, sources }
    }

    pub const fn list(target: &'static str, sources: &'static [Source]) -> Self {
        Self { target, shape: Shape::List, sources }
    }

    pub const fn object(target: &'static str, sources: &'static [Source]) -> Self {
        Self { target, shape: Shape::Object, sources }
    }

    /// True if some source can produce a non-empty value without user content
    pub fn has_fallback(&self) -> bool {
        self.sources
            .iter()
            .any(|s| matches!(s, Source::Default(_) | Source::Object(_)))
    }
}

use Source::{Default, EmptyList, Path};

// ============================================================================
// Integration
// ============================================================================

const INTEGRATION_TYPES: &[PropRule] = &[
    PropRule::any("title", &[Path("integrationTypes.title"), Path("title"), Default("title")]),
    PropRule::list("items", &[Path("integrationTypes.items"), Path("items"), EmptyList]),
];

const INTEGRATION_BENEFITS: &[PropRule] = &[
    PropRule::any("title", &[Path("benefits.title"), Path("title"), Default("title")]),
    PropRule::list("items", &[Path("benefits.items"), Path("items"), EmptyList]),
    PropRule::list("benefits", &[Path("benefits.items"), Path("benefits"), Path("items"), EmptyList]),
];

const POPULAR_INTEGRATIONS: &[PropRule] = &[
    PropRule::any("title", &[Path("popularIntegrations.title"), Path("title"), Default("title")]),
    PropRule::list("platforms", &[Path("popularIntegrations.platforms"), Path("platforms"), EmptyList]),
];

// ============================================================================
// Payroll
// ============================================================================

const PAYROLL_PAIN_POINTS: &[PropRule] = &[
    PropRule::any("title", &[Path("painPoints.title"), Path("title"), Default("title")]),
    PropRule::any("subtitle", &[Path("painPoints.subtitle"), Path("subtitle"), Default("subtitle")]),
    PropRule::list(
        "painPoints",
        &[
            Path("painPoints.items"),
            Path("painPoints.painPoints"),
            Path("painPoints"),
            Path("items"),
            EmptyList,
        ],
    ),
];

const PAYROLL_BENEFITS: &[PropRule] = INTEGRATION_BENEFITS;

const PAYROLL_WORKFLOW: &[PropRule] = &[
    PropRule::any("title", &[Path("workflow.title"), Path("title"), Default("title")]),
    PropRule::any("subtitle", &[Path("workflow.subtitle"), Path("subtitle"), Default("subtitle")]),
    PropRule::list("steps", &[Path("workflow.steps"), Path("steps"), Path("workflow"), EmptyList]),
];

const PAYROLL_STEPPER: &[PropRule] = &[
    PropRule::any(
        "title",
        &[Path("coreWorkflow.title"), Path("stepper.title"), Path("title"), Default("title")],
    ),
    PropRule::list(
        "steps",
        &[
            Path("coreWorkflow.steps"),
            Path("stepper.steps"),
            Path("steps"),
            Path("stepper"),
            EmptyList,
        ],
    ),
];

const PAYROLL_FAQ: &[PropRule] = &[
    PropRule::any("title", &[Path("faq.title"), Path("title"), Default("title")]),
    PropRule::any("subtitle", &[Path("faq.subtitle"), Path("subtitle"), Default("subtitle")]),
    PropRule::list(
        "faqs",
        &[Path("faq.items"), Path("faq.faqs"), Path("faqs"), Path("items"), EmptyList],
    ),
];

const PAYROLL_CTA_FIELDS: &[PropRule] = &[
    PropRule::any("title", &[Path("cta.title"), Path("title"), Default("title")]),
    PropRule::any(
        "subtitle",
        &[Path("cta.description"), Path("cta.subtitle"), Path("subtitle"), Default("subtitle")],
    ),
    PropRule::any("buttonText", &[Path("cta.buttonText"), Path("buttonText"), Default("buttonText")]),
];

const PAYROLL_CTA: &[PropRule] = &[
    PAYROLL_CTA_FIELDS[0],
    PAYROLL_CTA_FIELDS[1],
    PAYROLL_CTA_FIELDS[2],
    PropRule::object("cta", &[Path("cta"), Source::Object(PAYROLL_CTA_FIELDS)]),
];

const PAYROLL_FEATURES: &[PropRule] = &[
    PropRule::any("title", &[Path("features.title"), Path("title"), Default("title")]),
    PropRule::any(
        "description",
        &[
            Path("features.description"),
            Path("subtitle"),
            Path("description"),
            Default("description"),
        ],
    ),
    PropRule::list("items", &[Path("features.items"), Path("features"), Path("items"), EmptyList]),
];

const PAYROLL_HOW_IT_WORKS: &[PropRule] = &[
    PropRule::any("title", &[Path("howItWorks.title"), Path("title"), Default("title")]),
    PropRule::any(
        "description",
        &[
            Path("howItWorks.description"),
            Path("subtitle"),
            Path("description"),
            Default("description"),
        ],
    ),
    PropRule::list(
        "steps",
        &[Path("coreWorkflow.steps"), Path("howItWorks.steps"), Path("steps"), EmptyList],
    ),
];

const PAYROLL_WHY_PERFECT: &[PropRule] = &[
    PropRule::any("title", &[Path("whyPerfect.title"), Path("title"), Default("title")]),
    PropRule::list("items", &[Path("whyPerfect.items"), Path("whyPerfect"), Path("items"), EmptyList]),
];

// ============================================================================
// HR / Implementation (props wrapped in `data`)
// ============================================================================

const HR_HERO: &[PropRule] = &[
    PropRule::any(
        "data.hero.title",
        &[Path("hero.title"), Path("title"), Path("data.hero.title"), Default("title")],
    ),
    PropRule::any(
        "data.hero.subtitle",
        &[Path("hero.subtitle"), Path("subtitle"), Path("data.hero.subtitle"), Default("subtitle")],
    ),
    PropRule::any(
        "data.hero.bgVideo",
        &[Path("hero.bgVideo"), Path("bgVideo"), Path("data.hero.bgVideo"), Default("bgVideo")],
    ),
    PropRule::any(
        "data.hero.bgColor",
        &[Path("hero.bgColor"), Path("bgColor"), Path("data.hero.bgColor"), Default("bgColor")],
    ),
];

const HR_MODULES: &[PropRule] = &[
    PropRule::any(
        "data.title",
        &[Path("modules.title"), Path("title"), Path("data.title"), Default("title")],
    ),
    PropRule::any(
        "data.subtitle",
        &[Path("modules.subtitle"), Path("subtitle"), Path("data.subtitle"), Default("subtitle")],
    ),
    PropRule::list(
        "data.modules",
        &[
            Path("modules.items"),
            Path("modules.modules"),
            Path("modules"),
            Path("items"),
            Path("data.modules"),
            EmptyList,
        ],
    ),
];

const HR_BENEFITS: &[PropRule] = INTEGRATION_BENEFITS;

const IMPLEMENTATION_HERO: &[PropRule] = HR_HERO;

const IMPLEMENTATION_PROCESS: &[PropRule] = &[
    PropRule::any(
        "data.title",
        &[Path("process.title"), Path("title"), Path("data.title"), Default("title")],
    ),
    PropRule::any(
        "data.subtitle",
        &[Path("process.subtitle"), Path("subtitle"), Path("data.subtitle"), Default("subtitle")],
    ),
    PropRule::list(
        "data.steps",
        &[
            Path("process.steps"),
            Path("steps"),
            Path("process"),
            Path("data.steps"),
            EmptyList,
        ],
    ),
];

const IMPLEMENTATION_BENEFITS: &[PropRule] = INTEGRATION_BENEFITS;

// ============================================================================
// Training
// ============================================================================

const TRAINING_HERO: &[PropRule] = &[
    PropRule::any(
        "heroContent.title",
        &[
            Path("heroContent.title"),
            Path("hero.title"),
            Path("title"),
            Default("heroContent.title"),
        ],
    ),
    PropRule::any(
        "heroContent.subtitle",
        &[
            Path("heroContent.description"),
            Path("hero.subtitle"),
            Path("subtitle"),
            Default("heroContent.description"),
        ],
    ),
    PropRule::any(
        "heroContent.description",
        &[
            Path("heroContent.description"),
            Path("hero.subtitle"),
            Path("subtitle"),
            Default("heroContent.description"),
        ],
    ),
    PropRule::any(
        "backgroundVideo",
        &[Path("backgroundVideo"), Path("hero.bgVideo"), Default("backgroundVideo")],
    ),
    PropRule::object(
        "ctaButton",
        &[Path("ctaButton"), Path("hero.ctaButton"), Default("ctaButton")],
    ),
];

const TRAINING_PROGRAMS_HEADER: &[PropRule] = &[
    PropRule::any("title", &[Path("title"), Default("programsSection.title")]),
    PropRule::any("description", &[Path("subtitle"), Default("programsSection.description")]),
    PropRule::any("image", &[Path("image"), Default("programsSection.image")]),
    PropRule::any(
        "Professional_Badge",
        &[Path("badge"), Default("programsSection.Professional_Badge")],
    ),
];

const TRAINING_PROGRAMS: &[PropRule] = &[
    PropRule::object(
        "programsSection",
        &[Path("programsSection"), Source::Object(TRAINING_PROGRAMS_HEADER)],
    ),
    PropRule::list(
        "trainingPrograms.programs",
        &[
            Path("trainingPrograms.programs"),
            Path("programs"),
            Path("trainingPrograms"),
            EmptyList,
        ],
    ),
];

const TRAINING_WHY_CHOOSE_HEADER: &[PropRule] = &[
    PropRule::any("title", &[Path("title"), Default("whyChooseSection.title")]),
    PropRule::any("subtitle", &[Path("subtitle"), Default("whyChooseSection.subtitle")]),
    PropRule::any("image", &[Path("image"), Default("whyChooseSection.image")]),
    PropRule::any(
        "Professional_Badge",
        &[Path("badge"), Default("whyChooseSection.Professional_Badge")],
    ),
];

const TRAINING_WHY_CHOOSE: &[PropRule] = &[
    PropRule::object(
        "whyChooseSection",
        &[Path("whyChooseSection"), Source::Object(TRAINING_WHY_CHOOSE_HEADER)],
    ),
    PropRule::list(
        "trainingFeatures",
        &[Path("trainingFeatures"), Path("features"), EmptyList],
    ),
];

/// Normalization rules for a tag; `None` selects the generic heuristic
pub fn rules_for(tag: ComponentType) -> Option<&'static [PropRule]> {
    use ComponentType::*;

    let rules = match tag {
        IntegrationTypesSection => INTEGRATION_TYPES,
        IntegrationBenefitsSection => INTEGRATION_BENEFITS,
        PopularIntegrationsSection => POPULAR_INTEGRATIONS,
        PayrollPainPointsSection => PAYROLL_PAIN_POINTS,
        PayrollBenefitsSection => PAYROLL_BENEFITS,
        PayrollWorkflowSection => PAYROLL_WORKFLOW,
        PayrollStepperSection => PAYROLL_STEPPER,
        PayrollFAQSection => PAYROLL_FAQ,
        PayrollCTASection => PAYROLL_CTA,
        PayrollFeaturesSection => PAYROLL_FEATURES,
        PayrollHowItWorksSection => PAYROLL_HOW_IT_WORKS,
        PayrollWhyPerfectSection => PAYROLL_WHY_PERFECT,
        HRHeroSection => HR_HERO,
        HRModulesSection => HR_MODULES,
        HRBenefitsSection => HR_BENEFITS,
        TrainingHeroSection => TRAINING_HERO,
        TrainingProgramsSection => TRAINING_PROGRAMS,
        TrainingWhyChooseSection => TRAINING_WHY_CHOOSE,
        ImplementationHeroSection => IMPLEMENTATION_HERO,
        ImplementationProcessSection => IMPLEMENTATION_PROCESS,
        ImplementationBenefitsSection => IMPLEMENTATION_BENEFITS,
        HeroSection | CtaSection | FeaturesSection | FAQSection | PricingSection | AboutHeroSection
        | AboutMissionSection | AboutTeamSection | PayrollHeroSection | HRFAQSection => return None,
    };
    Some(rules)
}

/// Props a renderer cannot do without (dotted paths into normalized props)
pub fn required_props(tag: ComponentType) -> &'static [&'static str] {
    use ComponentType::*;

    match tag {
        IntegrationTypesSection => &["title", "items"],
        IntegrationBenefitsSection => &["title", "items"],
        PopularIntegrationsSection => &["title", "platforms"],
        PayrollPainPointsSection => &["title", "painPoints"],
        PayrollBenefitsSection => &["title", "items"],
        PayrollWorkflowSection => &["title", "steps"],
        PayrollStepperSection => &["steps"],
        PayrollFAQSection => &["title", "faqs"],
        PayrollCTASection => &["title", "cta"],
        PayrollFeaturesSection => &["title", "items"],
        PayrollHowItWorksSection => &["title", "steps"],
        PayrollWhyPerfectSection => &["title", "items"],
        HRHeroSection => &["data.hero.title"],
        HRModulesSection => &["data.title", "data.modules"],
        HRBenefitsSection => &["title", "items"],
        TrainingHeroSection => &["heroContent.title"],
        TrainingProgramsSection => &["programsSection", "trainingPrograms.programs"],
        TrainingWhyChooseSection => &["whyChooseSection", "trainingFeatures"],
        ImplementationHeroSection => &["data.hero.title"],
        ImplementationProcessSection => &["data.steps"],
        ImplementationBenefitsSection => &["title", "items"],
        HeroSection | CtaSection | FeaturesSection | FAQSection | PricingSection | AboutHeroSection
        | AboutMissionSection | AboutTeamSection | PayrollHeroSection | HRFAQSection => &[],
    }
}

/// Every `Default` path a rule set reads, including nested object rules
pub fn default_paths(rules: &'static [PropRule]) -> Vec<&'static str> {
    let mut paths = Vec::new();
    for rule in rules {
        for source in rule.sources {
            match source {
                Source::Default(path) => paths.push(*path),
                Source::Object(nested) => paths.extend(default_paths(*nested)),
                Source::Path(_) | Source::EmptyList => {}
            }
        }
    }
    paths
}
