use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::coefficients::CoefficientStore;
use crate::evaluation::evaluator::evaluate;
use crate::resolver::{resolve_config, RawConfig};
use crate::scenario::ScenarioStore;

/// One `[[scenario]]` entry of a scenario file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedScenario {
    pub name: Option<String>,
    #[serde(flatten)]
    pub inputs: RawConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioFile {
    #[serde(default, rename = "scenario")]
    pub scenarios: Vec<NamedScenario>,
}

impl ScenarioFile {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed reading scenario file: {}", path.display()))?;
        toml::from_str(&data)
            .with_context(|| format!("failed parsing scenario file: {}", path.display()))
    }

    /// Evaluates every entry, filling missing inputs from `defaults`, and
    /// saves them in file order.
    pub fn evaluate_into(
        &self,
        tables: &CoefficientStore,
        defaults: &RawConfig,
        store: &mut ScenarioStore,
    ) -> Vec<usize> {
        self.scenarios
            .iter()
            .map(|entry| {
                let config = resolve_config(&entry.inputs.clone().or(defaults));
                store.save(entry.name.as_deref(), &evaluate(tables, &config))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{MentorshipLevel, ResponseSpeed};

    const FILE: &str = r#"
[[scenario]]
name = "Current design"
program = "intermediate"

[[scenario]]
mentorship = "high"
response = 7
cost_per_trainee = 200000
"#;

    #[test]
    fn parses_named_and_unnamed_entries() {
        let file: ScenarioFile = toml::from_str(FILE).expect("parse scenario file");
        assert_eq!(file.scenarios.len(), 2);
        assert_eq!(file.scenarios[0].name.as_deref(), Some("Current design"));
        assert!(file.scenarios[1].name.is_none());
        assert_eq!(file.scenarios[1].inputs.cost_per_trainee, Some(200_000.0));
    }

    #[test]
    fn evaluates_entries_in_file_order() {
        let file: ScenarioFile = toml::from_str(FILE).expect("parse scenario file");
        let mut store = ScenarioStore::new();
        let indices =
            file.evaluate_into(&CoefficientStore::builtin(), &RawConfig::default(), &mut store);
        assert_eq!(indices, vec![0, 1]);

        let second = store.get(1).expect("second scenario");
        assert_eq!(second.name, "Scenario 2");
        assert_eq!(second.config.levels().mentorship, MentorshipLevel::High);
        assert_eq!(second.config.levels().response, ResponseSpeed::Days7);
    }

    #[test]
    fn empty_file_has_no_scenarios() {
        let file: ScenarioFile = toml::from_str("").expect("parse empty file");
        assert!(file.scenarios.is_empty());
    }
}
