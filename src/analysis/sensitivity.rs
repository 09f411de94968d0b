use crate::analysis::SensitivityPoint;
use crate::coefficients::CoefficientStore;
use crate::evaluation::evaluator::evaluate;
use crate::resolver::Configuration;

/// Cost multipliers in reporting order: -20 %, base, +20 %.
pub const COST_MULTIPLIERS: [f64; 3] = [0.8, 1.0, 1.2];

pub fn sensitivity(store: &CoefficientStore, config: &Configuration) -> [SensitivityPoint; 3] {
    COST_MULTIPLIERS.map(|multiplier| {
        let perturbed = config.with_cost_per_trainee(config.cost_per_trainee() * multiplier);
        let evaluation = evaluate(store, &perturbed);
        SensitivityPoint {
            multiplier,
            cost_per_trainee: perturbed.cost_per_trainee(),
            result: evaluation.result,
            recommendation: evaluation.recommendation,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{
        AttributeLevel, AttributeLevels, CareerIncentive, DeliveryMode, MentorshipLevel,
        PreferenceModel, ProgramTier, ResponseSpeed,
    };
    use crate::resolver::{resolve_config, RawConfig};

    #[test]
    fn points_are_ordered_low_base_high() {
        let store = CoefficientStore::builtin();
        let config = resolve_config(&RawConfig {
            cost_per_trainee: Some(200_000.0),
            ..RawConfig::default()
        });
        let points = sensitivity(&store, &config);

        let multipliers: Vec<f64> = points.iter().map(|p| p.multiplier).collect();
        assert_eq!(multipliers, vec![0.8, 1.0, 1.2]);
        assert_eq!(points[0].cost_per_trainee, 160_000.0);
        assert_eq!(points[1].cost_per_trainee, 200_000.0);
        assert_eq!(points[2].cost_per_trainee, 240_000.0);
        assert_eq!(points[1].result, evaluate(&store, &config).result);
    }

    #[test]
    fn uptake_never_rises_with_cost() {
        let store = CoefficientStore::builtin();
        for model in PreferenceModel::ALL {
            for program in ProgramTier::ALL {
                for career in CareerIncentive::ALL {
                    for mentorship in MentorshipLevel::ALL {
                        for delivery in DeliveryMode::ALL {
                            for response in ResponseSpeed::ALL {
                                let config = Configuration::default()
                                    .with_preference_model(model)
                                    .with_levels(AttributeLevels {
                                        program,
                                        career,
                                        mentorship,
                                        delivery,
                                        response,
                                    })
                                    .with_cost_per_trainee(200_000.0);
                                let points = sensitivity(&store, &config);
                                assert!(points[0].result.uptake_prob >= points[1].result.uptake_prob);
                                assert!(points[1].result.uptake_prob >= points[2].result.uptake_prob);
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn perturbed_costs_are_reclamped() {
        let store = CoefficientStore::builtin();
        let floor = Configuration::default().with_cost_per_trainee(80_000.0);
        let points = sensitivity(&store, &floor);
        assert_eq!(points[0].cost_per_trainee, 75_000.0);

        let ceiling = Configuration::default().with_cost_per_trainee(380_000.0);
        let points = sensitivity(&store, &ceiling);
        assert_eq!(points[2].cost_per_trainee, 400_000.0);
    }
}
