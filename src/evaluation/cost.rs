use crate::coefficients::CoefficientStore;
use crate::evaluation::{CostLine, CostOutcome};
use crate::resolver::Configuration;

/// Flat loading for trainee productivity foregone while in training.
pub const OPPORTUNITY_COST_MULTIPLIER: f64 = 1.2;

/// Cost of running the planned cohort. Not conditioned on uptake.
pub fn compute_cost(config: &Configuration) -> CostOutcome {
    let base_cost = config.cost_per_trainee()
        * f64::from(config.cohort_size())
        * f64::from(config.duration_months());
    let total_cost = if config.include_opportunity_cost() {
        base_cost * OPPORTUNITY_COST_MULTIPLIER
    } else {
        base_cost
    };

    CostOutcome {
        base_cost,
        opportunity_cost: total_cost - base_cost,
        total_cost,
    }
}

/// Splits `total_cost` across the tier's template components.
pub fn cost_breakdown(
    store: &CoefficientStore,
    config: &Configuration,
    total_cost: f64,
) -> Vec<CostLine> {
    store
        .cost_templates
        .for_tier(config.program())
        .iter()
        .map(|share| CostLine {
            component: share.component,
            share: share.share,
            amount: total_cost * share.share,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::ProgramTier;
    use crate::resolver::{resolve_config, RawConfig};

    #[test]
    fn multiplies_cost_by_cohort_and_duration() {
        let config = Configuration::default();
        let outcome = compute_cost(&config);
        assert_eq!(outcome.base_cost, 250_000.0 * 20.0 * 12.0);
        assert_eq!(outcome.total_cost, outcome.base_cost);
        assert_eq!(outcome.opportunity_cost, 0.0);
    }

    #[test]
    fn opportunity_cost_applies_exact_multiplier() {
        let config = Configuration::default();
        let without = compute_cost(&config);
        let with = compute_cost(&config.with_opportunity_cost(true));
        assert_eq!(with.total_cost, without.total_cost * 1.2);
        assert_eq!(with.base_cost, without.base_cost);
        assert!(with.opportunity_cost > 0.0);
    }

    #[test]
    fn breakdown_uses_tier_template_and_sums_to_total() {
        let store = CoefficientStore::builtin();
        let config = resolve_config(&RawConfig {
            program: Some("frontline".into()),
            ..RawConfig::default()
        });
        assert_eq!(config.program(), ProgramTier::Frontline);
        let total = 1_000_000.0;
        let lines = cost_breakdown(&store, &config, total);
        assert_eq!(lines.len(), 5);
        assert!((lines[0].amount - 350_000.0).abs() < 1e-6);
        let summed: f64 = lines.iter().map(|l| l.amount).sum();
        assert!((summed - total).abs() < 1e-6);
    }
}
