pub mod national;
pub mod sensitivity;

use serde::{Deserialize, Serialize};

use crate::evaluation::{EvaluationResult, Recommendation};
use crate::resolver::lenient_number;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SensitivityPoint {
    pub multiplier: f64,
    pub cost_per_trainee: f64,
    pub result: EvaluationResult,
    pub recommendation: Option<Recommendation>,
}

/// National-scale inputs as supplied; any field may be missing or malformed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAssumptions {
    #[serde(default, deserialize_with = "lenient_number")]
    pub num_cohorts: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub fellows_per_district: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub value_per_graduate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub outbreaks_per_100_graduates: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub value_per_outbreak: Option<f64>,
}

impl RawAssumptions {
    pub fn or(self, fallback: &RawAssumptions) -> RawAssumptions {
        RawAssumptions {
            num_cohorts: self.num_cohorts.or(fallback.num_cohorts),
            fellows_per_district: self.fellows_per_district.or(fallback.fellows_per_district),
            value_per_graduate: self.value_per_graduate.or(fallback.value_per_graduate),
            outbreaks_per_100_graduates: self
                .outbreaks_per_100_graduates
                .or(fallback.outbreaks_per_100_graduates),
            value_per_outbreak: self.value_per_outbreak.or(fallback.value_per_outbreak),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationAssumptions {
    pub num_cohorts: u32,
    pub fellows_per_district: f64,
    pub value_per_graduate: f64,
    pub outbreaks_per_100_graduates: f64,
    pub value_per_outbreak: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationResult {
    pub assumptions: SimulationAssumptions,
    pub cohort_size: u32,
    pub per_cohort: EvaluationResult,
    pub total_cost: f64,
    pub total_benefit: f64,
    pub total_net: f64,
    pub effective_graduates: f64,
    pub district_coverage: f64,
    pub outbreaks_averted: f64,
    /// Outcome-based valuation, reported beside the WTP totals and never added to them.
    pub epi_benefit_total: f64,
}
