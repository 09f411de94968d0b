//! Choice-model coefficients, WTP tables and cohort cost templates.
//!
//! Every table expresses level effects relative to the attribute's reference
//! level, which is fixed at zero by construction: the effect structs only
//! carry fields for the non-reference levels.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{info, warn};

use crate::attributes::{
    Attribute, AttributeLevel, AttributeLevels, CareerIncentive, DeliveryMode, MentorshipLevel,
    PreferenceModel, ProgramTier, ResponseSpeed,
};

#[derive(Debug, Error)]
pub enum CoefficientError {
    #[error("failed reading coefficient tables {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed parsing coefficient tables {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct ProgramEffects {
    pub intermediate: f64,
    pub advanced: f64,
}

impl ProgramEffects {
    pub fn effect(&self, level: ProgramTier) -> f64 {
        match level {
            ProgramTier::Frontline => 0.0,
            ProgramTier::Intermediate => self.intermediate,
            ProgramTier::Advanced => self.advanced,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct CareerEffects {
    pub uni: f64,
    pub govpath: f64,
}

impl CareerEffects {
    pub fn effect(&self, level: CareerIncentive) -> f64 {
        match level {
            CareerIncentive::Certificate => 0.0,
            CareerIncentive::Uni => self.uni,
            CareerIncentive::Govpath => self.govpath,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct MentorshipEffects {
    pub medium: f64,
    pub high: f64,
}

impl MentorshipEffects {
    pub fn effect(&self, level: MentorshipLevel) -> f64 {
        match level {
            MentorshipLevel::Low => 0.0,
            MentorshipLevel::Medium => self.medium,
            MentorshipLevel::High => self.high,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct DeliveryEffects {
    pub inperson: f64,
    pub online: f64,
}

impl DeliveryEffects {
    pub fn effect(&self, level: DeliveryMode) -> f64 {
        match level {
            DeliveryMode::Blended => 0.0,
            DeliveryMode::Inperson => self.inperson,
            DeliveryMode::Online => self.online,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct ResponseEffects {
    #[serde(rename = "15")]
    pub days_15: f64,
    #[serde(rename = "7")]
    pub days_7: f64,
}

impl ResponseEffects {
    pub fn effect(&self, level: ResponseSpeed) -> f64 {
        match level {
            ResponseSpeed::Days30 => 0.0,
            ResponseSpeed::Days15 => self.days_15,
            ResponseSpeed::Days7 => self.days_7,
        }
    }
}

/// Per-attribute level effects. Used both for utility coefficients and for
/// WTP values (thousands per trainee per month).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct AttributeEffects {
    pub program: ProgramEffects,
    pub career: CareerEffects,
    pub mentorship: MentorshipEffects,
    pub delivery: DeliveryEffects,
    pub response: ResponseEffects,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttributeContribution {
    pub attribute: Attribute,
    pub level: String,
    pub is_reference: bool,
    pub value: f64,
}

impl AttributeEffects {
    pub fn effect(&self, levels: &AttributeLevels, attribute: Attribute) -> f64 {
        match attribute {
            Attribute::Program => self.program.effect(levels.program),
            Attribute::Career => self.career.effect(levels.career),
            Attribute::Mentorship => self.mentorship.effect(levels.mentorship),
            Attribute::Delivery => self.delivery.effect(levels.delivery),
            Attribute::Response => self.response.effect(levels.response),
        }
    }

    /// Sum of the five level effects, accumulated in attribute order.
    pub fn total(&self, levels: &AttributeLevels) -> f64 {
        Attribute::ALL
            .iter()
            .map(|attribute| self.effect(levels, *attribute))
            .sum()
    }

    pub fn contributions(&self, levels: &AttributeLevels) -> Vec<AttributeContribution> {
        Attribute::ALL
            .iter()
            .map(|attribute| AttributeContribution {
                attribute: *attribute,
                level: levels.slug(*attribute).to_string(),
                is_reference: is_reference_level(levels, *attribute),
                value: self.effect(levels, *attribute),
            })
            .collect()
    }
}

fn is_reference_level(levels: &AttributeLevels, attribute: Attribute) -> bool {
    match attribute {
        Attribute::Program => levels.program.is_reference(),
        Attribute::Career => levels.career.is_reference(),
        Attribute::Mentorship => levels.mentorship.is_reference(),
        Attribute::Delivery => levels.delivery.is_reference(),
        Attribute::Response => levels.response.is_reference(),
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CoefficientSet {
    pub asc_enroll: f64,
    pub asc_opt_out: f64,
    /// Utility change per thousand currency units of cost per trainee per month.
    pub cost_per_thousand: f64,
    #[serde(flatten)]
    pub effects: AttributeEffects,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreferenceTables {
    #[serde(default)]
    pub provisional: bool,
    #[serde(default)]
    pub source: String,
    pub coefficients: CoefficientSet,
    pub wtp: AttributeEffects,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum CostComponent {
    ProgrammeStaff,
    TraineeSupport,
    FieldWork,
    TrainingMaterials,
    ManagementOverhead,
}

impl std::fmt::Display for CostComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::ProgrammeStaff => "Programme staff and mentors",
            Self::TraineeSupport => "Trainee allowances and salary support",
            Self::FieldWork => "Field investigations and travel",
            Self::TrainingMaterials => "Training materials and venues",
            Self::ManagementOverhead => "Management and overhead",
        };
        write!(f, "{display}")
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CostShare {
    pub component: CostComponent,
    pub share: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostTemplates {
    pub frontline: Vec<CostShare>,
    pub intermediate: Vec<CostShare>,
    pub advanced: Vec<CostShare>,
}

impl CostTemplates {
    pub fn for_tier(&self, tier: ProgramTier) -> &[CostShare] {
        match tier {
            ProgramTier::Frontline => &self.frontline,
            ProgramTier::Intermediate => &self.intermediate,
            ProgramTier::Advanced => &self.advanced,
        }
    }
}

impl Default for CostTemplates {
    fn default() -> Self {
        Self {
            frontline: template([0.35, 0.25, 0.20, 0.10, 0.10]),
            intermediate: template([0.30, 0.30, 0.22, 0.08, 0.10]),
            advanced: template([0.28, 0.34, 0.22, 0.06, 0.10]),
        }
    }
}

fn template(shares: [f64; 5]) -> Vec<CostShare> {
    [
        CostComponent::ProgrammeStaff,
        CostComponent::TraineeSupport,
        CostComponent::FieldWork,
        CostComponent::TrainingMaterials,
        CostComponent::ManagementOverhead,
    ]
    .into_iter()
    .zip(shares)
    .map(|(component, share)| CostShare { component, share })
    .collect()
}

/// All tables consulted by an evaluation. Swappable as a unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoefficientStore {
    pub average: PreferenceTables,
    pub supporters: PreferenceTables,
    #[serde(default)]
    pub cost_templates: CostTemplates,
}

impl CoefficientStore {
    pub fn builtin() -> Self {
        Self {
            average: average_tables(),
            supporters: supporter_tables(),
            cost_templates: CostTemplates::default(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, CoefficientError> {
        let data = fs::read_to_string(path).map_err(|source| CoefficientError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let store: Self = toml::from_str(&data).map_err(|source| CoefficientError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            "loaded coefficient tables from {} ({})",
            path.display(),
            store.fingerprint()
        );
        store.warn_if_provisional();
        Ok(store)
    }

    /// Loads tables from `path` when given, otherwise the built-in set.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, CoefficientError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let store = Self::builtin();
                store.warn_if_provisional();
                Ok(store)
            }
        }
    }

    pub fn tables(&self, model: PreferenceModel) -> &PreferenceTables {
        match model {
            PreferenceModel::Average => &self.average,
            PreferenceModel::Supporters => &self.supporters,
        }
    }

    pub fn coefficients(&self, model: PreferenceModel) -> &CoefficientSet {
        &self.tables(model).coefficients
    }

    pub fn wtp(&self, model: PreferenceModel) -> &AttributeEffects {
        &self.tables(model).wtp
    }

    pub fn is_provisional(&self, model: PreferenceModel) -> bool {
        self.tables(model).provisional
    }

    /// SHA-256 over the canonical JSON form of the tables.
    pub fn fingerprint(&self) -> String {
        let canonical = serde_json::to_string(self).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn warn_if_provisional(&self) {
        for model in PreferenceModel::ALL {
            if self.is_provisional(model) {
                warn!("{model} tables are provisional estimates pending confirmation");
            }
        }
    }
}

impl Default for CoefficientStore {
    fn default() -> Self {
        Self::builtin()
    }
}

fn average_tables() -> PreferenceTables {
    PreferenceTables {
        provisional: false,
        source: "Mixed logit, full stakeholder sample".to_string(),
        coefficients: CoefficientSet {
            asc_enroll: 0.168,
            asc_opt_out: -0.601,
            cost_per_thousand: -0.005,
            effects: AttributeEffects {
                program: ProgramEffects {
                    intermediate: 0.220,
                    advanced: 0.487,
                },
                career: CareerEffects {
                    uni: 0.017,
                    govpath: -0.122,
                },
                mentorship: MentorshipEffects {
                    medium: 0.453,
                    high: 0.640,
                },
                delivery: DeliveryEffects {
                    inperson: -0.232,
                    online: -1.073,
                },
                response: ResponseEffects {
                    days_15: 0.546,
                    days_7: 0.610,
                },
            },
        },
        wtp: AttributeEffects {
            program: ProgramEffects {
                intermediate: 47.06,
                advanced: 103.99,
            },
            career: CareerEffects {
                uni: 3.69,
                govpath: -26.17,
            },
            mentorship: MentorshipEffects {
                medium: 96.87,
                high: 136.79,
            },
            delivery: DeliveryEffects {
                inperson: -49.56,
                online: -229.33,
            },
            response: ResponseEffects {
                days_15: 116.70,
                days_7: 130.46,
            },
        },
    }
}

// Placeholder estimates for the supportive latent class; replace via a
// coefficient file once confirmed.
fn supporter_tables() -> PreferenceTables {
    PreferenceTables {
        provisional: true,
        source: "Latent class, supportive subgroup (placeholder)".to_string(),
        coefficients: CoefficientSet {
            asc_enroll: 0.098,
            asc_opt_out: -2.543,
            cost_per_thousand: -0.001,
            effects: AttributeEffects {
                program: ProgramEffects {
                    intermediate: 0.087,
                    advanced: 0.422,
                },
                career: CareerEffects {
                    uni: -0.024,
                    govpath: -0.123,
                },
                mentorship: MentorshipEffects {
                    medium: 0.342,
                    high: 0.486,
                },
                delivery: DeliveryEffects {
                    inperson: -0.017,
                    online: -0.700,
                },
                response: ResponseEffects {
                    days_15: 0.317,
                    days_7: 0.504,
                },
            },
        },
        wtp: AttributeEffects {
            program: ProgramEffects {
                intermediate: 87.0,
                advanced: 422.0,
            },
            career: CareerEffects {
                uni: -24.0,
                govpath: -123.0,
            },
            mentorship: MentorshipEffects {
                medium: 342.0,
                high: 486.0,
            },
            delivery: DeliveryEffects {
                inperson: -17.0,
                online: -700.0,
            },
            response: ResponseEffects {
                days_15: 317.0,
                days_7: 504.0,
            },
        },
    }
}
