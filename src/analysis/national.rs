use tracing::debug;

use crate::analysis::{RawAssumptions, SimulationAssumptions, SimulationResult};
use crate::evaluation::EvaluationResult;
use crate::resolver::Configuration;

pub const DEFAULT_NUM_COHORTS: u32 = 50;
pub const FALLBACK_FELLOWS_PER_DISTRICT: f64 = 1.0;

pub fn resolve_assumptions(raw: &RawAssumptions) -> SimulationAssumptions {
    SimulationAssumptions {
        num_cohorts: match raw.num_cohorts {
            Some(v) if v.is_finite() && v >= 1.0 => {
                if v >= f64::from(u32::MAX) {
                    u32::MAX
                } else {
                    v.trunc() as u32
                }
            }
            _ => DEFAULT_NUM_COHORTS,
        },
        fellows_per_district: finite_or(raw.fellows_per_district, FALLBACK_FELLOWS_PER_DISTRICT),
        value_per_graduate: finite_or(raw.value_per_graduate, 0.0),
        outbreaks_per_100_graduates: finite_or(raw.outbreaks_per_100_graduates, 0.0),
        value_per_outbreak: finite_or(raw.value_per_outbreak, 0.0),
    }
}

fn finite_or(value: Option<f64>, fallback: f64) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(fallback)
}

/// Scales one cohort up to `num_cohorts` and estimates the downstream
/// epidemiological return of the expected graduates.
pub fn simulate(
    config: &Configuration,
    per_cohort: &EvaluationResult,
    assumptions: &SimulationAssumptions,
) -> SimulationResult {
    let cohorts = f64::from(assumptions.num_cohorts);
    let effective_graduates = cohorts * f64::from(config.cohort_size()) * per_cohort.uptake_prob;
    let district_coverage = if assumptions.fellows_per_district > 0.0 {
        effective_graduates / assumptions.fellows_per_district
    } else {
        0.0
    };
    let outbreaks_averted = (effective_graduates / 100.0) * assumptions.outbreaks_per_100_graduates;
    let epi_benefit_total = effective_graduates * assumptions.value_per_graduate
        + outbreaks_averted * assumptions.value_per_outbreak;

    debug!(
        cohorts = assumptions.num_cohorts,
        graduates = effective_graduates,
        "simulated national scale-up"
    );

    SimulationResult {
        assumptions: *assumptions,
        cohort_size: config.cohort_size(),
        per_cohort: *per_cohort,
        total_cost: per_cohort.total_cost * cohorts,
        total_benefit: per_cohort.total_benefit * cohorts,
        total_net: per_cohort.net_benefit * cohorts,
        effective_graduates,
        district_coverage,
        outbreaks_averted,
        epi_benefit_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coefficients::CoefficientStore;
    use crate::evaluation::evaluator::evaluate;

    fn assumptions(num_cohorts: u32) -> SimulationAssumptions {
        SimulationAssumptions {
            num_cohorts,
            fellows_per_district: 2.0,
            value_per_graduate: 400_000.0,
            outbreaks_per_100_graduates: 5.0,
            value_per_outbreak: 20_000_000.0,
        }
    }

    #[test]
    fn scale_up_is_exactly_linear() {
        let config = Configuration::default();
        let per_cohort = evaluate(&CoefficientStore::builtin(), &config).result;
        let single = simulate(&config, &per_cohort, &assumptions(25));
        let double = simulate(&config, &per_cohort, &assumptions(50));

        assert_eq!(double.total_cost, single.total_cost * 2.0);
        assert_eq!(double.total_benefit, single.total_benefit * 2.0);
        assert_eq!(double.total_net, single.total_net * 2.0);
        assert_eq!(double.effective_graduates, single.effective_graduates * 2.0);
    }

    #[test]
    fn computes_epidemiological_channel() {
        let config = Configuration::default();
        let per_cohort = EvaluationResult {
            uptake_prob: 0.5,
            total_benefit: 100.0,
            total_cost: 50.0,
            net_benefit: 50.0,
            bcr: 2.0,
        };
        let result = simulate(&config, &per_cohort, &assumptions(10));

        // 10 cohorts * 20 trainees * 0.5 uptake
        assert_eq!(result.effective_graduates, 100.0);
        assert_eq!(result.district_coverage, 50.0);
        assert_eq!(result.outbreaks_averted, 5.0);
        assert_eq!(result.epi_benefit_total, 100.0 * 400_000.0 + 5.0 * 20_000_000.0);
        // epidemiological value stays out of the WTP totals
        assert_eq!(result.total_benefit, 1_000.0);
        assert_eq!(result.total_net, 500.0);
    }

    #[test]
    fn district_coverage_is_zero_without_fellows() {
        let config = Configuration::default();
        let per_cohort = evaluate(&CoefficientStore::builtin(), &config).result;
        let mut zero = assumptions(10);
        zero.fellows_per_district = 0.0;
        assert_eq!(simulate(&config, &per_cohort, &zero).district_coverage, 0.0);
    }

    #[test]
    fn malformed_assumptions_fall_back() {
        let resolved = resolve_assumptions(&RawAssumptions {
            num_cohorts: Some(-3.0),
            fellows_per_district: Some(f64::NAN),
            value_per_graduate: Some(f64::INFINITY),
            outbreaks_per_100_graduates: None,
            value_per_outbreak: Some(7.5),
        });
        assert_eq!(resolved.num_cohorts, 50);
        assert_eq!(resolved.fellows_per_district, 1.0);
        assert_eq!(resolved.value_per_graduate, 0.0);
        assert_eq!(resolved.outbreaks_per_100_graduates, 0.0);
        assert_eq!(resolved.value_per_outbreak, 7.5);

        assert_eq!(resolve_assumptions(&RawAssumptions::default()).num_cohorts, 50);
    }
}
