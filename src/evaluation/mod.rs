pub mod benefit;
pub mod choice;
pub mod cost;
pub mod evaluator;
pub mod recommend;

use serde::{Deserialize, Serialize};

use crate::attributes::PreferenceModel;
use crate::coefficients::{AttributeContribution, CostComponent};
use crate::resolver::Configuration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChoiceOutcome {
    pub utility_enroll: f64,
    pub utility_opt_out: f64,
    pub uptake_prob: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BenefitOutcome {
    pub wtp_total_thousands: f64,
    pub per_trainee_benefit_per_month: f64,
    pub total_benefit: f64,
    pub contributions: Vec<AttributeContribution>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostOutcome {
    pub base_cost: f64,
    pub opportunity_cost: f64,
    pub total_cost: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostLine {
    pub component: CostComponent,
    pub share: f64,
    pub amount: f64,
}

/// Headline economics of one cohort.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EvaluationResult {
    pub uptake_prob: f64,
    pub total_benefit: f64,
    pub total_cost: f64,
    pub net_benefit: f64,
    pub bcr: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    StrongSupportGoodValue,
    BroadlyAttractive,
    SupportBelowBreakEven,
    ValueWithLowEndorsement,
    NotAttractive,
}

impl Verdict {
    pub const ALL: [Verdict; 5] = [
        Verdict::StrongSupportGoodValue,
        Verdict::BroadlyAttractive,
        Verdict::SupportBelowBreakEven,
        Verdict::ValueWithLowEndorsement,
        Verdict::NotAttractive,
    ];

    /// Same name the verdict carries on the wire.
    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::StrongSupportGoodValue => "strong_support_good_value",
            Self::BroadlyAttractive => "broadly_attractive",
            Self::SupportBelowBreakEven => "support_below_break_even",
            Self::ValueWithLowEndorsement => "value_with_low_endorsement",
            Self::NotAttractive => "not_attractive",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::StrongSupportGoodValue => "Strong support, good value",
            Self::BroadlyAttractive => "Broadly attractive",
            Self::SupportBelowBreakEven => "Support below break-even",
            Self::ValueWithLowEndorsement => "Value with low endorsement",
            Self::NotAttractive => "Not attractive",
        };
        write!(f, "{display}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub verdict: Verdict,
    pub message: String,
}

/// Full detail behind an [`EvaluationResult`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Evaluation {
    pub config: Configuration,
    pub choice: ChoiceOutcome,
    pub benefit: BenefitOutcome,
    pub cost: CostOutcome,
    pub cost_breakdown: Vec<CostLine>,
    pub result: EvaluationResult,
    pub recommendation: Option<Recommendation>,
    pub provisional_tables: bool,
}

impl Evaluation {
    pub fn preference_model(&self) -> PreferenceModel {
        self.config.preference_model()
    }
}
