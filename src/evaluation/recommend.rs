use crate::evaluation::{Recommendation, Verdict};

pub struct RecommendationRule {
    pub verdict: Verdict,
    pub applies: fn(uptake_prob: f64, bcr: f64) -> bool,
    pub message: &'static str,
}

/// Evaluated top to bottom; the first rule that applies wins.
pub const RULES: [RecommendationRule; 5] = [
    RecommendationRule {
        verdict: Verdict::StrongSupportGoodValue,
        applies: |uptake, bcr| bcr >= 1.2 && uptake >= 0.7,
        message: "Strong support and good value: high predicted endorsement and a benefit-cost \
                  ratio of at least 1.2 make this configuration a priority to scale.",
    },
    RecommendationRule {
        verdict: Verdict::BroadlyAttractive,
        applies: |uptake, bcr| bcr >= 1.0 && uptake >= 0.5,
        message: "Broadly attractive: benefits cover costs and a majority of stakeholders are \
                  predicted to endorse this configuration.",
    },
    RecommendationRule {
        verdict: Verdict::SupportBelowBreakEven,
        applies: |uptake, bcr| bcr < 1.0 && uptake >= 0.5,
        message: "Reasonable support, BCR below 1: stakeholders are likely to endorse this \
                  configuration but benefits do not yet cover costs. Consider a lower cost per \
                  trainee or stronger mentorship.",
    },
    RecommendationRule {
        verdict: Verdict::ValueWithLowEndorsement,
        applies: |uptake, bcr| bcr >= 1.0 && uptake < 0.5,
        message: "Acceptable value, low endorsement: benefits cover costs but fewer than half of \
                  stakeholders are predicted to endorse. Strengthen career incentives, \
                  mentorship or response capacity before scaling.",
    },
    RecommendationRule {
        verdict: Verdict::NotAttractive,
        applies: |_, _| true,
        message: "Not attractive in current form: low predicted endorsement and benefits below \
                  costs. Redesign the configuration before considering scale-up.",
    },
];

/// `None` when either input is not finite.
pub fn recommend(uptake_prob: f64, bcr: f64) -> Option<Recommendation> {
    if !uptake_prob.is_finite() || !bcr.is_finite() {
        return None;
    }
    RULES
        .iter()
        .find(|rule| (rule.applies)(uptake_prob, bcr))
        .map(|rule| Recommendation {
            verdict: rule.verdict,
            message: rule.message.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(uptake: f64, bcr: f64) -> Option<Verdict> {
        recommend(uptake, bcr).map(|r| r.verdict)
    }

    #[test]
    fn first_matching_rule_wins() {
        assert_eq!(verdict(0.8, 1.5), Some(Verdict::StrongSupportGoodValue));
        // strong thresholds missed on uptake falls through to the next rule
        assert_eq!(verdict(0.65, 1.5), Some(Verdict::BroadlyAttractive));
        assert_eq!(verdict(0.75, 1.1), Some(Verdict::BroadlyAttractive));
        assert_eq!(verdict(0.6, 0.8), Some(Verdict::SupportBelowBreakEven));
        assert_eq!(verdict(0.3, 1.4), Some(Verdict::ValueWithLowEndorsement));
        assert_eq!(verdict(0.3, 0.4), Some(Verdict::NotAttractive));
    }

    #[test]
    fn thresholds_are_inclusive() {
        assert_eq!(verdict(0.7, 1.2), Some(Verdict::StrongSupportGoodValue));
        assert_eq!(verdict(0.5, 1.0), Some(Verdict::BroadlyAttractive));
        assert_eq!(verdict(0.4999, 1.0), Some(Verdict::ValueWithLowEndorsement));
    }

    #[test]
    fn non_finite_inputs_yield_no_recommendation() {
        assert!(recommend(f64::NAN, 1.0).is_none());
        assert!(recommend(0.6, f64::INFINITY).is_none());
    }

    #[test]
    fn messages_lead_with_headline() {
        let rec = recommend(0.9, 2.0).expect("recommendation");
        assert!(rec.message.starts_with("Strong support and good value"));
        assert!(rec.message.contains("priority to scale"));
    }
}
