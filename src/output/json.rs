use anyhow::Result;
use serde::Serialize;

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coefficients::CoefficientStore;
    use crate::evaluation::evaluator::evaluate;
    use crate::resolver::{resolve_config, Configuration, RawConfig};
    use crate::scenario::{compare_scenarios, ComparisonReport, ScenarioStore};

    #[test]
    fn evaluation_serializes_flat_levels() {
        let evaluation = evaluate(&CoefficientStore::builtin(), &Configuration::default());
        let rendered = render_json(&evaluation).expect("render evaluation");
        let value: serde_json::Value = serde_json::from_str(&rendered).expect("valid json");
        assert_eq!(value["config"]["program"], "intermediate");
        assert_eq!(value["config"]["response"], "30");
        assert_eq!(value["config"]["duration_months"], 12);
        assert!(value["result"]["uptake_prob"].as_f64().is_some());
    }

    #[test]
    fn comparison_report_is_a_single_document() {
        let tables = CoefficientStore::builtin();
        let mut store = ScenarioStore::new();
        store.save(None, &evaluate(&tables, &Configuration::default()));
        let advanced = resolve_config(&RawConfig {
            program: Some("advanced".into()),
            ..RawConfig::default()
        });
        store.save(None, &evaluate(&tables, &advanced));

        let report = ComparisonReport {
            scenarios: store.list(),
            comparison: Some(compare_scenarios(&store, 0, 1).expect("comparison")),
        };
        let rendered = render_json(&report).expect("render report");
        let value: serde_json::Value = serde_json::from_str(&rendered).expect("one json value");
        assert_eq!(value["scenarios"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["comparison"]["differing_attributes"][0], "program");
        assert_eq!(value["comparison"]["b"]["config"]["duration_months"], 24);

        let single = ComparisonReport {
            scenarios: &store.list()[..1],
            comparison: None,
        };
        let value: serde_json::Value =
            serde_json::from_str(&render_json(&single).expect("render")).expect("json");
        assert!(value["comparison"].is_null());
    }
}
