use crate::coefficients::CoefficientStore;
use crate::evaluation::ChoiceOutcome;
use crate::resolver::Configuration;

/// Probabilities are held this far inside (0, 1) once the logistic saturates.
const PROBABILITY_FLOOR: f64 = 1e-12;

pub fn compute_choice(store: &CoefficientStore, config: &Configuration) -> ChoiceOutcome {
    let coefficients = store.coefficients(config.preference_model());
    let utility_enroll = coefficients.asc_enroll
        + coefficients.effects.total(&config.levels())
        + coefficients.cost_per_thousand * (config.cost_per_trainee() / 1000.0);
    let utility_opt_out = coefficients.asc_opt_out;

    ChoiceOutcome {
        utility_enroll,
        utility_opt_out,
        uptake_prob: logit_probability(utility_enroll, utility_opt_out),
    }
}

/// Binary logit probability of the first alternative, in the logistic form
/// `1 / (1 + exp(other - chosen))` so large utilities cannot overflow.
pub fn logit_probability(chosen: f64, other: f64) -> f64 {
    let p = 1.0 / (1.0 + (other - chosen).exp());
    if p.is_nan() {
        return p;
    }
    p.clamp(PROBABILITY_FLOOR, 1.0 - PROBABILITY_FLOOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{
        AttributeLevel, AttributeLevels, CareerIncentive, DeliveryMode, MentorshipLevel,
        PreferenceModel, ProgramTier, ResponseSpeed,
    };
    use crate::resolver::{resolve_config, RawConfig};

    fn worked_example() -> Configuration {
        resolve_config(&RawConfig {
            program: Some("intermediate".into()),
            preference_model: Some("average".into()),
            career: Some("certificate".into()),
            mentorship: Some("high".into()),
            delivery: Some("blended".into()),
            response: Some("30".into()),
            cohort_size: Some(20.0),
            cost_per_trainee: Some(250_000.0),
            include_opportunity_cost: Some(false),
        })
    }

    #[test]
    fn worked_example_matches_hand_calculation() {
        let outcome = compute_choice(&CoefficientStore::builtin(), &worked_example());
        assert!((outcome.utility_enroll - (-0.222)).abs() < 1e-9);
        assert!((outcome.utility_opt_out - (-0.601)).abs() < 1e-12);

        let expected = (-0.222f64).exp() / ((-0.222f64).exp() + (-0.601f64).exp());
        assert!((outcome.uptake_prob - expected).abs() < 1e-12);
        assert!((outcome.uptake_prob - 0.5938).abs() < 5e-4);
    }

    #[test]
    fn uptake_is_strictly_inside_unit_interval_for_all_designs() {
        let store = CoefficientStore::builtin();
        for model in PreferenceModel::ALL {
            for program in ProgramTier::ALL {
                for career in CareerIncentive::ALL {
                    for mentorship in MentorshipLevel::ALL {
                        for delivery in DeliveryMode::ALL {
                            for response in ResponseSpeed::ALL {
                                for cost in [75_000.0, 250_000.0, 400_000.0] {
                                    let config = Configuration::default()
                                        .with_preference_model(model)
                                        .with_levels(AttributeLevels {
                                            program,
                                            career,
                                            mentorship,
                                            delivery,
                                            response,
                                        })
                                        .with_cost_per_trainee(cost);
                                    let p = compute_choice(&store, &config).uptake_prob;
                                    assert!(p > 0.0 && p < 1.0, "{config:?} -> {p}");
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn logistic_form_survives_extreme_utilities() {
        let high = logit_probability(5_000.0, -5_000.0);
        let low = logit_probability(-5_000.0, 5_000.0);
        assert!(high < 1.0 && high > 0.5);
        assert!(low > 0.0 && low < 0.5);
        assert!((logit_probability(0.3, 0.3) - 0.5).abs() < 1e-15);
    }

    #[test]
    fn non_finite_utilities_propagate() {
        assert!(logit_probability(f64::NAN, 0.0).is_nan());
    }

    #[test]
    fn higher_cost_lowers_uptake() {
        let store = CoefficientStore::builtin();
        let base = worked_example();
        let cheap = compute_choice(&store, &base.with_cost_per_trainee(100_000.0));
        let dear = compute_choice(&store, &base.with_cost_per_trainee(350_000.0));
        assert!(cheap.uptake_prob > dear.uptake_prob);
    }
}
