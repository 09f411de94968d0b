use crate::scenario::{ResultDelta, ScenarioComparison, ScenarioError, ScenarioStore};

pub fn compare_scenarios(
    store: &ScenarioStore,
    a: usize,
    b: usize,
) -> Result<ScenarioComparison, ScenarioError> {
    let first = store.get(a)?;
    let second = store.get(b)?;

    let delta = ResultDelta {
        uptake_prob: second.result.uptake_prob - first.result.uptake_prob,
        total_benefit: second.result.total_benefit - first.result.total_benefit,
        total_cost: second.result.total_cost - first.result.total_cost,
        net_benefit: second.result.net_benefit - first.result.net_benefit,
        bcr: second.result.bcr - first.result.bcr,
    };

    Ok(ScenarioComparison {
        differing_attributes: first.config.levels().differing(&second.config.levels()),
        a: first.clone(),
        b: second.clone(),
        delta,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::Attribute;
    use crate::coefficients::CoefficientStore;
    use crate::evaluation::evaluator::evaluate;
    use crate::resolver::{resolve_config, RawConfig};

    fn store_with_two() -> ScenarioStore {
        let tables = CoefficientStore::builtin();
        let mut store = ScenarioStore::new();
        let base = resolve_config(&RawConfig::default());
        let better = resolve_config(&RawConfig {
            mentorship: Some("high".into()),
            response: Some("7".into()),
            ..RawConfig::default()
        });
        store.save(Some("base"), &evaluate(&tables, &base));
        store.save(Some("better"), &evaluate(&tables, &better));
        store
    }

    #[test]
    fn reports_deltas_and_changed_attributes() {
        let store = store_with_two();
        let comparison = compare_scenarios(&store, 0, 1).expect("comparison");
        assert_eq!(
            comparison.differing_attributes,
            vec![Attribute::Mentorship, Attribute::Response]
        );
        assert!(comparison.delta.uptake_prob > 0.0);
        assert_eq!(comparison.delta.total_cost, 0.0);
        assert_eq!(
            comparison.delta.net_benefit,
            comparison.b.result.net_benefit - comparison.a.result.net_benefit
        );
    }

    #[test]
    fn comparing_a_scenario_with_itself_is_neutral() {
        let store = store_with_two();
        let comparison = compare_scenarios(&store, 1, 1).expect("comparison");
        assert!(comparison.differing_attributes.is_empty());
        assert_eq!(comparison.delta.bcr, 0.0);
    }

    #[test]
    fn missing_index_fails() {
        let store = store_with_two();
        assert!(compare_scenarios(&store, 0, 9).is_err());
    }
}
