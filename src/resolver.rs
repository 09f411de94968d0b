use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::attributes::{AttributeLevels, PreferenceModel, ProgramTier};

pub const MIN_COST_PER_TRAINEE: f64 = 75_000.0;
pub const MAX_COST_PER_TRAINEE: f64 = 400_000.0;
pub const DEFAULT_COST_PER_TRAINEE: f64 = 250_000.0;
pub const DEFAULT_COHORT_SIZE: u32 = 20;
pub const DEFAULT_DURATION_MONTHS: u32 = 12;

/// A level as it arrives from a form, file or request: `"15"` and `15` are
/// both accepted for the response attribute. Any other value is kept so it
/// can fall back to the default instead of failing the whole request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LevelInput {
    Text(String),
    Number(f64),
    Other(Value),
}

impl LevelInput {
    fn as_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) if n.fract() == 0.0 && n.is_finite() => format!("{}", *n as i64),
            Self::Number(n) => n.to_string(),
            Self::Other(value) => value.to_string(),
        }
    }
}

impl From<&str> for LevelInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Reads a number or a numeric string. Anything else counts as missing.
pub fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// Reads a bool, a yes/no style string or 0/1. Anything else counts as missing.
pub fn lenient_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(flag)) => Some(flag),
        Some(Value::Number(n)) => n.as_f64().map(|v| v != 0.0),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

/// Unvalidated scenario inputs. Every field may be missing or malformed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawConfig {
    pub program: Option<LevelInput>,
    #[serde(alias = "model")]
    pub preference_model: Option<LevelInput>,
    pub career: Option<LevelInput>,
    pub mentorship: Option<LevelInput>,
    pub delivery: Option<LevelInput>,
    pub response: Option<LevelInput>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub cohort_size: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub cost_per_trainee: Option<f64>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub include_opportunity_cost: Option<bool>,
}

impl RawConfig {
    /// Fills every missing field from `fallback`.
    pub fn or(self, fallback: &RawConfig) -> RawConfig {
        RawConfig {
            program: self.program.or_else(|| fallback.program.clone()),
            preference_model: self
                .preference_model
                .or_else(|| fallback.preference_model.clone()),
            career: self.career.or_else(|| fallback.career.clone()),
            mentorship: self.mentorship.or_else(|| fallback.mentorship.clone()),
            delivery: self.delivery.or_else(|| fallback.delivery.clone()),
            response: self.response.or_else(|| fallback.response.clone()),
            cohort_size: self.cohort_size.or(fallback.cohort_size),
            cost_per_trainee: self.cost_per_trainee.or(fallback.cost_per_trainee),
            include_opportunity_cost: self
                .include_opportunity_cost
                .or(fallback.include_opportunity_cost),
        }
    }
}

/// A validated programme configuration. Fields are private and every
/// constructor goes through the resolver, so the cost clamp, the cohort
/// floor and the tier duration always hold. Deserializing reads the same
/// lenient shape as [`RawConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawConfig")]
pub struct Configuration {
    preference_model: PreferenceModel,
    #[serde(flatten)]
    levels: AttributeLevels,
    cohort_size: u32,
    cost_per_trainee: f64,
    include_opportunity_cost: bool,
    duration_months: u32,
}

impl Configuration {
    pub fn preference_model(&self) -> PreferenceModel {
        self.preference_model
    }

    pub fn levels(&self) -> AttributeLevels {
        self.levels
    }

    pub fn program(&self) -> ProgramTier {
        self.levels.program
    }

    pub fn cohort_size(&self) -> u32 {
        self.cohort_size
    }

    pub fn cost_per_trainee(&self) -> f64 {
        self.cost_per_trainee
    }

    pub fn include_opportunity_cost(&self) -> bool {
        self.include_opportunity_cost
    }

    pub fn duration_months(&self) -> u32 {
        self.duration_months
    }

    pub fn with_preference_model(&self, preference_model: PreferenceModel) -> Self {
        Self {
            preference_model,
            ..*self
        }
    }

    /// Same configuration with other levels; duration follows the new tier.
    pub fn with_levels(&self, levels: AttributeLevels) -> Self {
        Self {
            levels,
            duration_months: levels.program.duration_months(),
            ..*self
        }
    }

    /// Same configuration at a different per-trainee cost, re-clamped.
    pub fn with_cost_per_trainee(&self, cost_per_trainee: f64) -> Self {
        Self {
            cost_per_trainee: clamp_cost(cost_per_trainee),
            ..*self
        }
    }

    pub fn with_opportunity_cost(&self, include: bool) -> Self {
        Self {
            include_opportunity_cost: include,
            ..*self
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        resolve_config(&RawConfig::default())
    }
}

impl From<RawConfig> for Configuration {
    fn from(raw: RawConfig) -> Self {
        resolve_config(&raw)
    }
}

pub fn resolve_config(raw: &RawConfig) -> Configuration {
    let program = resolve_level::<ProgramTier>("program", raw.program.as_ref());
    let duration_months = program
        .map(|p| p.duration_months())
        .unwrap_or(DEFAULT_DURATION_MONTHS);
    let defaults = AttributeLevels::default();

    Configuration {
        preference_model: resolve_level("preference model", raw.preference_model.as_ref())
            .unwrap_or(PreferenceModel::Average),
        levels: AttributeLevels {
            program: program.unwrap_or(defaults.program),
            career: resolve_level("career", raw.career.as_ref()).unwrap_or(defaults.career),
            mentorship: resolve_level("mentorship", raw.mentorship.as_ref())
                .unwrap_or(defaults.mentorship),
            delivery: resolve_level("delivery", raw.delivery.as_ref())
                .unwrap_or(defaults.delivery),
            response: resolve_level("response", raw.response.as_ref())
                .unwrap_or(defaults.response),
        },
        cohort_size: resolve_cohort_size(raw.cohort_size),
        cost_per_trainee: resolve_cost(raw.cost_per_trainee),
        include_opportunity_cost: raw.include_opportunity_cost.unwrap_or(false),
        duration_months,
    }
}

fn resolve_level<T: FromStr>(field: &str, input: Option<&LevelInput>) -> Option<T> {
    let text = input?.as_text();
    match text.parse::<T>() {
        Ok(level) => Some(level),
        Err(_) => {
            debug!("unrecognized {field} level {text:?}, using default");
            None
        }
    }
}

pub fn resolve_cohort_size(raw: Option<f64>) -> u32 {
    match raw {
        Some(v) if v.is_finite() && v >= 1.0 => {
            if v >= f64::from(u32::MAX) {
                u32::MAX
            } else {
                v.trunc() as u32
            }
        }
        other => {
            if other.is_some() {
                debug!("invalid cohort size {other:?}, using {DEFAULT_COHORT_SIZE}");
            }
            DEFAULT_COHORT_SIZE
        }
    }
}

pub fn resolve_cost(raw: Option<f64>) -> f64 {
    match raw {
        Some(v) if v.is_finite() => clamp_cost(v),
        _ => DEFAULT_COST_PER_TRAINEE,
    }
}

pub fn clamp_cost(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(MIN_COST_PER_TRAINEE, MAX_COST_PER_TRAINEE)
    } else {
        DEFAULT_COST_PER_TRAINEE
    }
}
