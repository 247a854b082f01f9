//! The closed set of section component tags
//!
//! Persisted records carry the tag as a plain string. Every lookup table
//! (schemas, normalizer rules, renderer templates) is keyed by
//! [`ComponentType`], so an unknown string has exactly one fallback path per
//! concern: [`ComponentType::from_name`] returns `None`.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! component_types {
    ($($variant:ident),+ $(,)?) => {
        /// Section component tag
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum ComponentType {
            $($variant),+
        }

        impl ComponentType {
            /// Every known tag, in catalog order
            pub const ALL: &'static [ComponentType] = &[$(ComponentType::$variant),+];

            /// The persisted tag string
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(ComponentType::$variant => stringify!($variant)),+
                }
            }

            /// Look up a persisted tag string. Matching is exact.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $(stringify!($variant) => Some(ComponentType::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

component_types! {
    // Generic landing sections
    HeroSection,
    CtaSection,
    FeaturesSection,
    FAQSection,
    PricingSection,
    // About page
    AboutHeroSection,
    AboutMissionSection,
    AboutTeamSection,
    // Integration services
    IntegrationTypesSection,
    IntegrationBenefitsSection,
    PopularIntegrationsSection,
    // Payroll solution
    PayrollHeroSection,
    PayrollPainPointsSection,
    PayrollBenefitsSection,
    PayrollWorkflowSection,
    PayrollStepperSection,
    PayrollFAQSection,
    PayrollCTASection,
    PayrollFeaturesSection,
    PayrollHowItWorksSection,
    PayrollWhyPerfectSection,
    // HR solution
    HRHeroSection,
    HRModulesSection,
    HRBenefitsSection,
    HRFAQSection,
    // Training services
    TrainingHeroSection,
    TrainingProgramsSection,
    TrainingWhyChooseSection,
    // Implementation services
    ImplementationHeroSection,
    ImplementationProcessSection,
    ImplementationBenefitsSection,
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
