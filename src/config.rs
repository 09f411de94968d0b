use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::analysis::RawAssumptions;
use crate::resolver::RawConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scenario: RawConfig,
    #[serde(default = "default_simulation")]
    pub simulation: RawAssumptions,
    #[serde(default)]
    pub coefficients: CoefficientsConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CoefficientsConfig {
    /// TOML file replacing the built-in coefficient and WTP tables.
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_currency")]
    pub currency: String,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub coefficients_path: Option<PathBuf>,
    pub currency: Option<String>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/fetp-dce/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        Ok(parsed)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(path) = overrides.coefficients_path {
            self.coefficients.path = Some(path.display().to_string());
        }
        if let Some(currency) = overrides.currency {
            self.display.currency = currency;
        }
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn resolved_coefficients_path(&self) -> Option<PathBuf> {
        self.coefficients
            .path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(expand_tilde)
    }

    pub fn default_template() -> String {
        let template = r#"# Default scenario; command-line flags and request fields take precedence.
[scenario]
program = "intermediate"        # frontline | intermediate | advanced
preference_model = "average"    # average | supporters
career = "certificate"          # certificate | uni | govpath
mentorship = "medium"           # low | medium | high
delivery = "blended"            # blended | inperson | online
response = "15"                 # 30 | 15 | 7 (days)
cohort_size = 20
cost_per_trainee = 250000       # per trainee per month, clamped to 75000..400000
include_opportunity_cost = false

[simulation]
num_cohorts = 50
fellows_per_district = 2.0
value_per_graduate = 500000.0
outbreaks_per_100_graduates = 5.0
value_per_outbreak = 30000000.0

[coefficients]
# path = "~/.config/fetp-dce/coefficients.toml"

[server]
host = "127.0.0.1"
port = 3001

[display]
currency = "INR"
"#;
        template.to_string()
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scenario: RawConfig::default(),
            simulation: default_simulation(),
            coefficients: CoefficientsConfig::default(),
            server: ServerConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
        }
    }
}

fn default_simulation() -> RawAssumptions {
    RawAssumptions {
        num_cohorts: Some(50.0),
        fellows_per_district: Some(2.0),
        value_per_graduate: Some(500_000.0),
        outbreaks_per_100_graduates: Some(5.0),
        value_per_outbreak: Some(30_000_000.0),
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_currency() -> String {
    "INR".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve_config;

    #[test]
    fn template_parses_into_config() {
        let parsed: Config = toml::from_str(&Config::default_template()).expect("parse template");
        assert_eq!(parsed.server.port, 3001);
        assert_eq!(parsed.display.currency, "INR");
        assert!(parsed.resolved_coefficients_path().is_none());

        let scenario = resolve_config(&parsed.scenario);
        assert_eq!(scenario.cohort_size(), 20);
        assert_eq!(scenario.duration_months(), 12);
        assert_eq!(parsed.simulation.num_cohorts, Some(50.0));
    }

    #[test]
    fn missing_sections_take_defaults() {
        let parsed: Config = toml::from_str("[display]\ncurrency = \"USD\"\n").expect("parse");
        assert_eq!(parsed.display.currency, "USD");
        assert_eq!(parsed.server.host, "127.0.0.1");
        assert_eq!(parsed.simulation.value_per_outbreak, Some(30_000_000.0));
        assert_eq!(parsed.scenario, RawConfig::default());
    }

    #[test]
    fn missing_file_yields_default_config() {
        let config = Config::load(Some(Path::new("/nonexistent/fetp-dce.toml")))
            .expect("missing file is not an error");
        assert_eq!(config.server.port, 3001);
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut config = Config::default();
        config.apply_overrides(ConfigOverrides {
            coefficients_path: Some(PathBuf::from("/tmp/tables.toml")),
            currency: None,
        });
        assert_eq!(
            config.resolved_coefficients_path(),
            Some(PathBuf::from("/tmp/tables.toml"))
        );
        assert_eq!(config.display.currency, "INR");
    }
}
