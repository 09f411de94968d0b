use crate::coefficients::CoefficientStore;
use crate::evaluation::BenefitOutcome;
use crate::resolver::Configuration;

/// WTP tables are expressed in thousands per trainee per month.
const WTP_UNIT: f64 = 1000.0;

/// Expected WTP benefit of one cohort. Only the share of trainees predicted
/// to enroll generates benefit.
pub fn compute_benefits(
    store: &CoefficientStore,
    config: &Configuration,
    uptake_prob: f64,
) -> BenefitOutcome {
    let wtp = store.wtp(config.preference_model());
    let wtp_total_thousands = wtp.total(&config.levels());
    let per_trainee_benefit_per_month = wtp_total_thousands * WTP_UNIT;
    let total_benefit = per_trainee_benefit_per_month
        * f64::from(config.cohort_size())
        * f64::from(config.duration_months())
        * uptake_prob;

    BenefitOutcome {
        wtp_total_thousands,
        per_trainee_benefit_per_month,
        total_benefit,
        contributions: wtp.contributions(&config.levels()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{
        Attribute, AttributeLevels, CareerIncentive, DeliveryMode, MentorshipLevel, ProgramTier,
        ResponseSpeed,
    };

    fn config() -> Configuration {
        Configuration::default().with_levels(AttributeLevels {
            program: ProgramTier::Intermediate,
            mentorship: MentorshipLevel::High,
            ..AttributeLevels::default()
        })
    }

    #[test]
    fn sums_chosen_levels_and_scales_by_cohort() {
        let store = CoefficientStore::builtin();
        let outcome = compute_benefits(&store, &config(), 0.5);

        let expected_thousands = 47.06 + 136.79;
        assert!((outcome.wtp_total_thousands - expected_thousands).abs() < 1e-9);
        assert!((outcome.per_trainee_benefit_per_month - expected_thousands * 1000.0).abs() < 1e-6);
        let expected_total = expected_thousands * 1000.0 * 20.0 * 12.0 * 0.5;
        assert!((outcome.total_benefit - expected_total).abs() < 1e-3);
    }

    #[test]
    fn benefit_is_linear_in_uptake() {
        let store = CoefficientStore::builtin();
        let full = compute_benefits(&store, &config(), 1.0);
        let quarter = compute_benefits(&store, &config(), 0.25);
        assert!((quarter.total_benefit * 4.0 - full.total_benefit).abs() < 1e-6);
    }

    #[test]
    fn reports_one_contribution_per_attribute() {
        let store = CoefficientStore::builtin();
        let config = config().with_levels(AttributeLevels {
            career: CareerIncentive::Govpath,
            delivery: DeliveryMode::Online,
            response: ResponseSpeed::Days7,
            ..config().levels()
        });

        let outcome = compute_benefits(&store, &config, 0.6);
        let attributes: Vec<Attribute> =
            outcome.contributions.iter().map(|c| c.attribute).collect();
        assert_eq!(attributes, Attribute::ALL.to_vec());

        let online = outcome
            .contributions
            .iter()
            .find(|c| c.attribute == Attribute::Delivery)
            .expect("delivery contribution");
        assert_eq!(online.level, "online");
        assert!((online.value - (-229.33)).abs() < 1e-12);
    }
}
