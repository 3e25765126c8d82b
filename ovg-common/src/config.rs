//! Configuration loading and resolution
//!
//! Config file resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`OVG_CONFIG`)
//! 3. Platform config file (`<config_dir>/ovg/config.toml`)
//! 4. Compiled defaults (fallback)
//!
//! A missing config file never stops startup; it is logged and defaults are
//! used. A file that exists but does not parse is an error.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::factors::{FactorDirection, FactorSpec, FactorTable};
use crate::{Error, Result};

/// Environment variable naming a config file
pub const CONFIG_ENV_VAR: &str = "OVG_CONFIG";

// ========================================
// Analysis Tunables
// ========================================

/// Every tunable constant of the analysis core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Engagement at or above this is "high" (inclusive)
    pub engagement_threshold: f64,
    /// Stress at or above this is "high" (inclusive)
    pub stress_threshold: f64,
    /// Burnout units with stress strictly above this are critical
    pub critical_stress_threshold: f64,
    /// Rows with headcount at or below this are dropped
    pub headcount_floor: u32,
    /// Gap band inside which a factor is not flagged
    pub driver_epsilon: f64,
    /// Ranked drivers kept per unit
    pub max_drivers: usize,
    /// Length of the critical/healthy headline lists
    pub summary_top_n: usize,
    /// Fixed simulation confidence (declared simplification, not fitted)
    pub simulation_confidence: f64,
    /// Report duplicate composite keys as errors instead of last-write-wins
    pub strict_keys: bool,
    /// Factor constants; set from `[factors]` sections, not `[analysis]`
    #[serde(skip_deserializing)]
    pub factors: FactorTable,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            engagement_threshold: 3.2,
            stress_threshold: 2.65,
            critical_stress_threshold: 2.9,
            headcount_floor: 9,
            driver_epsilon: 0.1,
            max_drivers: 3,
            summary_top_n: 5,
            simulation_confidence: 0.75,
            strict_keys: false,
            factors: FactorTable::default(),
        }
    }
}

impl AnalysisConfig {
    /// Reject values no analysis can run with
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("engagement_threshold", self.engagement_threshold),
            ("stress_threshold", self.stress_threshold),
            ("critical_stress_threshold", self.critical_stress_threshold),
            ("driver_epsilon", self.driver_epsilon),
            ("simulation_confidence", self.simulation_confidence),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(Error::Config(format!("{} must be a finite number", name)));
            }
        }

        if self.driver_epsilon < 0.0 {
            return Err(Error::Config(format!(
                "driver_epsilon must not be negative: {}",
                self.driver_epsilon
            )));
        }
        // Zero is reserved for the unknown-factor result
        if !(self.simulation_confidence > 0.0 && self.simulation_confidence <= 1.0) {
            return Err(Error::Config(format!(
                "simulation_confidence must be within (0, 1]: {}",
                self.simulation_confidence
            )));
        }
        if self.max_drivers == 0 {
            return Err(Error::Config("max_drivers must be at least 1".to_string()));
        }

        for (name, spec) in self.factors.iter() {
            if !(spec.engagement_weight.is_finite()
                && spec.stress_weight.is_finite()
                && spec.benchmark.is_finite())
            {
                return Err(Error::Config(format!(
                    "factor '{}' has a non-finite weight or benchmark",
                    name
                )));
            }
        }

        Ok(())
    }
}

/// Partial factor entry from a `[factors."<name>"]` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FactorOverride {
    pub engagement_weight: Option<f64>,
    pub stress_weight: Option<f64>,
    pub benchmark: Option<f64>,
    pub recommendation: Option<String>,
    pub direction: Option<FactorDirection>,
}

impl FactorOverride {
    /// Overlay onto an existing entry, or build a new one
    ///
    /// New entries need both weights and a benchmark.
    fn apply(self, name: &str, table: &mut FactorTable) -> Result<()> {
        if let Some(spec) = table.get_mut(name) {
            if let Some(w) = self.engagement_weight {
                spec.engagement_weight = w;
            }
            if let Some(w) = self.stress_weight {
                spec.stress_weight = w;
            }
            if let Some(b) = self.benchmark {
                spec.benchmark = b;
            }
            if let Some(r) = self.recommendation {
                spec.recommendation = r;
            }
            if let Some(d) = self.direction {
                spec.direction = d;
            }
            return Ok(());
        }

        let (Some(engagement_weight), Some(stress_weight), Some(benchmark)) =
            (self.engagement_weight, self.stress_weight, self.benchmark)
        else {
            return Err(Error::Config(format!(
                "new factor '{}' needs engagement_weight, stress_weight and benchmark",
                name
            )));
        };

        table.insert(
            name,
            FactorSpec {
                engagement_weight,
                stress_weight,
                benchmark,
                recommendation: self.recommendation.unwrap_or_default(),
                direction: self.direction.unwrap_or_default(),
            },
        );
        Ok(())
    }
}

// ========================================
// TOML File
// ========================================

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5731
}

/// Whole config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub factors: BTreeMap<String, FactorOverride>,
}

impl TomlConfig {
    /// Parse TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Analysis tunables with factor overrides applied, validated
    pub fn analysis_config(&self) -> Result<AnalysisConfig> {
        let mut analysis = self.analysis.clone();
        for (name, factor) in &self.factors {
            factor.clone().apply(name, &mut analysis.factors)?;
        }
        analysis.validate()?;
        Ok(analysis)
    }
}

// ========================================
// Resolution
// ========================================

/// Pick the config file path following the priority order
///
/// Returns `None` when neither an explicit path nor a platform file exists.
pub fn resolve_config_path(cli_arg: Option<&Path>, env_var_name: &str) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config file
    default_config_path().filter(|p| p.exists())
}

/// `<config_dir>/ovg/config.toml` for the current platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ovg").join("config.toml"))
}

/// Load a config file, degrading to defaults when it cannot be read
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let config = TomlConfig::from_toml_str(&content)?;
            info!("Loaded configuration from {}", path.display());
            Ok(config)
        }
        Err(e) => {
            warn!(
                "Config file {} not readable ({}), using compiled defaults",
                path.display(),
                e
            );
            Ok(TomlConfig::default())
        }
    }
}

/// Resolve and load in one step
pub fn load_config(cli_arg: Option<&Path>) -> Result<TomlConfig> {
    match resolve_config_path(cli_arg, CONFIG_ENV_VAR) {
        Some(path) => load_toml_config(&path),
        None => {
            info!("No config file found, using compiled defaults");
            Ok(TomlConfig::default())
        }
    }
}
