use chrono::Utc;
use thiserror::Error;
use tracing::info;

use crate::evaluation::Evaluation;
use crate::scenario::SavedScenario;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScenarioError {
    #[error("no saved scenario at index {index} ({len} saved)")]
    NotFound { index: usize, len: usize },
}

/// Append-only, in-memory list of saved scenarios for one session.
#[derive(Debug, Clone, Default)]
pub struct ScenarioStore {
    scenarios: Vec<SavedScenario>,
}

impl ScenarioStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Saves a copy of `evaluation` and returns its index. A missing or blank
    /// name becomes `Scenario N`, counting from 1.
    pub fn save(&mut self, name: Option<&str>, evaluation: &Evaluation) -> usize {
        let index = self.scenarios.len();
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Scenario {}", index + 1));

        info!("saved scenario {index}: {name}");
        self.scenarios.push(SavedScenario {
            index,
            name,
            config: evaluation.config,
            result: evaluation.result,
            recommendation: evaluation.recommendation.clone(),
            saved_at: Utc::now(),
        });
        index
    }

    pub fn get(&self, index: usize) -> Result<&SavedScenario, ScenarioError> {
        self.scenarios.get(index).ok_or(ScenarioError::NotFound {
            index,
            len: self.scenarios.len(),
        })
    }

    pub fn list(&self) -> &[SavedScenario] {
        &self.scenarios
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}
