pub mod compare;
pub mod file;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::attributes::Attribute;
use crate::evaluation::{EvaluationResult, Recommendation};
use crate::resolver::Configuration;

pub use compare::compare_scenarios;
pub use file::{NamedScenario, ScenarioFile};
pub use store::{ScenarioError, ScenarioStore};

/// A named snapshot of a configuration and its result. Owns copies, so later
/// edits to live inputs never reach it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedScenario {
    pub index: usize,
    pub name: String,
    pub config: Configuration,
    pub result: EvaluationResult,
    pub recommendation: Option<Recommendation>,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioComparison {
    pub a: SavedScenario,
    pub b: SavedScenario,
    pub differing_attributes: Vec<Attribute>,
    pub delta: ResultDelta,
}

/// Saved scenarios plus their comparison, reported as one document.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ComparisonReport<'a> {
    pub scenarios: &'a [SavedScenario],
    pub comparison: Option<ScenarioComparison>,
}

/// `b - a` for each headline figure.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ResultDelta {
    pub uptake_prob: f64,
    pub total_benefit: f64,
    pub total_cost: f64,
    pub net_benefit: f64,
    pub bcr: f64,
}
