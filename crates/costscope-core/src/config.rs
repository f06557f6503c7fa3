use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Top-level configuration from `.costscope.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub monte_carlo: MonteCarloConfig,
    #[serde(default)]
    pub financial: FinancialConfig,
    #[serde(default)]
    pub sensitivity: SensitivityConfig,
    #[serde(default)]
    pub risk: RiskConfig,
    #[serde(default)]
    pub scenarios: ScenarioConfig,
    #[serde(default)]
    pub resources: ResourceConfig,
}

/// Bounds of a triangular distribution of multiplicative factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriangularFactor {
    pub low: f64,
    pub mode: f64,
    pub high: f64,
}

impl TriangularFactor {
    fn check(&self, name: &'static str) -> Result<(), ConfigError> {
        let ok = self.low > 0.0
            && self.low <= self.mode
            && self.mode <= self.high
            && self.high.is_finite();
        if ok {
            Ok(())
        } else {
            Err(ConfigError::InvalidTriangular {
                name,
                low: self.low,
                mode: self.mode,
                high: self.high,
            })
        }
    }
}

/// Monte Carlo sampling settings. The seed is always explicit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonteCarloConfig {
    #[serde(default = "default_iterations")]
    pub iterations: u64,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_size_factor")]
    pub size_factor: TriangularFactor,
    #[serde(default = "default_eaf_factor")]
    pub eaf_factor: TriangularFactor,
    #[serde(default = "default_true")]
    pub parallel: bool,
}

fn default_iterations() -> u64 {
    1000
}
fn default_seed() -> u64 {
    42
}
fn default_size_factor() -> TriangularFactor {
    TriangularFactor {
        low: 0.85,
        mode: 1.0,
        high: 1.30,
    }
}
fn default_eaf_factor() -> TriangularFactor {
    TriangularFactor {
        low: 0.90,
        mode: 1.0,
        high: 1.20,
    }
}
fn default_true() -> bool {
    true
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            seed: default_seed(),
            size_factor: default_size_factor(),
            eaf_factor: default_eaf_factor(),
            parallel: true,
        }
    }
}

/// Cash-flow schedule policy and IRR solver bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialConfig {
    #[serde(default = "default_investment_curve")]
    pub investment_curve: Vec<f64>,
    #[serde(default = "default_revenue_start")]
    pub revenue_start_period: usize,
    #[serde(default = "default_irr_lower")]
    pub irr_lower: f64,
    #[serde(default = "default_irr_upper")]
    pub irr_upper: f64,
    #[serde(default = "default_irr_tolerance")]
    pub irr_tolerance: f64,
    #[serde(default = "default_irr_max_iterations")]
    pub irr_max_iterations: u32,
}

fn default_investment_curve() -> Vec<f64> {
    vec![0.3, 0.4, 0.3]
}
fn default_revenue_start() -> usize {
    1
}
fn default_irr_lower() -> f64 {
    -0.99
}
fn default_irr_upper() -> f64 {
    10.0
}
fn default_irr_tolerance() -> f64 {
    1e-7
}
fn default_irr_max_iterations() -> u32 {
    200
}

impl Default for FinancialConfig {
    fn default() -> Self {
        Self {
            investment_curve: default_investment_curve(),
            revenue_start_period: default_revenue_start(),
            irr_lower: default_irr_lower(),
            irr_upper: default_irr_upper(),
            irr_tolerance: default_irr_tolerance(),
            irr_max_iterations: default_irr_max_iterations(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityConfig {
    #[serde(default = "default_delta")]
    pub delta: f64,
}

fn default_delta() -> f64 {
    0.10
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self {
            delta: default_delta(),
        }
    }
}

/// Shape parameters of the risk sub-scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Size (KLOC) at which the size part of the technical score is half its maximum.
    #[serde(default = "default_size_half_point")]
    pub size_half_point_kloc: f64,
    /// Relative p90-p10 spread that maps to a budget score of 100.
    #[serde(default = "default_budget_spread_ceiling")]
    pub budget_spread_ceiling: f64,
    /// Team/staffing ratio (or its inverse) that maps to a human score of 100.
    #[serde(default = "default_team_ratio_ceiling")]
    pub team_ratio_ceiling: f64,
}

fn default_size_half_point() -> f64 {
    100.0
}
fn default_budget_spread_ceiling() -> f64 {
    0.5
}
fn default_team_ratio_ceiling() -> f64 {
    4.0
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            size_half_point_kloc: default_size_half_point(),
            budget_spread_ceiling: default_budget_spread_ceiling(),
            team_ratio_ceiling: default_team_ratio_ceiling(),
        }
    }
}

/// Team multipliers and the Brooks'-law tradeoff curve used by the optimizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default = "default_accelerated")]
    pub accelerated_factor: f64,
    #[serde(default = "default_lean")]
    pub lean_factor: f64,
    #[serde(default = "default_brooks")]
    pub brooks_exponent: f64,
    #[serde(default = "default_max_compression")]
    pub max_compression: f64,
}

fn default_accelerated() -> f64 {
    1.5
}
fn default_lean() -> f64 {
    0.75
}
fn default_brooks() -> f64 {
    0.25
}
fn default_max_compression() -> f64 {
    0.75
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            accelerated_factor: default_accelerated(),
            lean_factor: default_lean(),
            brooks_exponent: default_brooks(),
            max_compression: default_max_compression(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceConfig {
    #[serde(default = "default_developer_share")]
    pub developer_share: f64,
}

fn default_developer_share() -> f64 {
    0.7
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            developer_share: default_developer_share(),
        }
    }
}

impl Config {
    /// Load configuration from a `.costscope.toml` file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let config: Config = toml::from_str(&content).with_context(|| {
            format!(
                "failed to parse '{}'. Run `costscope init` to create a valid config file",
                path.display()
            )
        })?;
        Ok(config)
    }

    /// Load from `.costscope.toml` in the given directory or any ancestor, or return defaults.
    pub fn load_or_default(dir: &Path) -> Self {
        let start = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        let mut current = start.as_path();
        loop {
            let config_path = current.join(".costscope.toml");
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => config,
                    Err(e) => {
                        tracing::warn!(
                            path = %config_path.display(),
                            "failed to load config: {e:#}. Using defaults."
                        );
                        Self::default()
                    }
                };
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }
        Self::default()
    }

    /// Check every tunable. Any error here is fatal to a request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mc = &self.monte_carlo;
        if mc.iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        mc.size_factor.check("size_factor")?;
        mc.eaf_factor.check("eaf_factor")?;

        let fin = &self.financial;
        let sum: f64 = fin.investment_curve.iter().sum();
        if fin.investment_curve.is_empty()
            || fin.investment_curve.iter().any(|w| *w < 0.0 || !w.is_finite())
            || (sum - 1.0).abs() > 1e-9
        {
            return Err(ConfigError::InvalidInvestmentCurve { sum });
        }
        if !(fin.irr_lower > -1.0 && fin.irr_lower < fin.irr_upper)
            || fin.irr_tolerance <= 0.0
            || fin.irr_max_iterations == 0
        {
            return Err(ConfigError::InvalidIrrInterval {
                lower: fin.irr_lower,
                upper: fin.irr_upper,
            });
        }

        let delta = self.sensitivity.delta;
        if !(delta > 0.0 && delta < 1.0) {
            return Err(ConfigError::InvalidSensitivityDelta(delta));
        }

        let risk = &self.risk;
        for (name, value) in [
            ("size_half_point_kloc", risk.size_half_point_kloc),
            ("budget_spread_ceiling", risk.budget_spread_ceiling),
        ] {
            if value <= 0.0 || !value.is_finite() {
                return Err(ConfigError::InvalidRiskSetting { name, value });
            }
        }
        if risk.team_ratio_ceiling <= 1.0 || !risk.team_ratio_ceiling.is_finite() {
            return Err(ConfigError::InvalidRiskSetting {
                name: "team_ratio_ceiling",
                value: risk.team_ratio_ceiling,
            });
        }

        let sc = &self.scenarios;
        if sc.accelerated_factor <= 1.0 {
            return Err(ConfigError::InvalidScenarioSetting {
                name: "accelerated_factor",
                value: sc.accelerated_factor,
            });
        }
        if !(sc.lean_factor > 0.0 && sc.lean_factor < 1.0) {
            return Err(ConfigError::InvalidScenarioSetting {
                name: "lean_factor",
                value: sc.lean_factor,
            });
        }
        if !(0.0..1.0).contains(&sc.brooks_exponent) {
            return Err(ConfigError::InvalidScenarioSetting {
                name: "brooks_exponent",
                value: sc.brooks_exponent,
            });
        }
        if !(sc.max_compression > 0.0 && sc.max_compression <= 1.0) {
            return Err(ConfigError::InvalidScenarioSetting {
                name: "max_compression",
                value: sc.max_compression,
            });
        }

        let share = self.resources.developer_share;
        if !(share > 0.0 && share < 1.0) {
            return Err(ConfigError::InvalidDeveloperShare(share));
        }
        Ok(())
    }

    /// Generate default TOML content for `costscope init`.
    pub fn default_toml() -> String {
        r#"# Costscope - Estimation Engine Configuration

[monte_carlo]
# Number of independent trials and the seed that makes them reproducible
iterations = 1000
seed = 42
parallel = true
# Multiplicative uncertainty on size and effort adjustment factor (triangular)
size_factor = { low = 0.85, mode = 1.0, high = 1.30 }
eaf_factor = { low = 0.90, mode = 1.0, high = 1.20 }

[financial]
# Share of the total cost spent in each period, starting at period 0 (must sum to 1)
investment_curve = [0.3, 0.4, 0.3]
# First period that earns revenue
revenue_start_period = 1
# IRR bisection bounds
irr_lower = -0.99
irr_upper = 10.0
irr_tolerance = 1e-7
irr_max_iterations = 200

[sensitivity]
# One-factor-at-a-time perturbation (+/- 10%)
delta = 0.10

[risk]
size_half_point_kloc = 100.0
budget_spread_ceiling = 0.5
team_ratio_ceiling = 4.0

[scenarios]
accelerated_factor = 1.5
lean_factor = 0.75
brooks_exponent = 0.25
# Shortest schedule reachable, as a fraction of the nominal duration
max_compression = 0.75

[resources]
# Share of the required staffing that is development work (the rest is testing)
developer_share = 0.7
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.monte_carlo.iterations, 1000);
        assert_eq!(config.monte_carlo.seed, 42);
        assert_eq!(config.financial.investment_curve, vec![0.3, 0.4, 0.3]);
        assert!((config.sensitivity.delta - 0.10).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_toml_is_valid() {
        let config: Config = toml::from_str(&Config::default_toml()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.monte_carlo.size_factor.high, 1.30);
        assert_eq!(config.scenarios.lean_factor, 0.75);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml_str = r#"
[monte_carlo]
iterations = 5000
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.monte_carlo.iterations, 5000);
        assert_eq!(config.monte_carlo.seed, 42);
        assert_eq!(config.financial.revenue_start_period, 1);
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let mut config = Config::default();
        config.monte_carlo.iterations = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroIterations));
    }

    #[test]
    fn test_investment_curve_must_sum_to_one() {
        let mut config = Config::default();
        config.financial.investment_curve = vec![0.5, 0.4];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidInvestmentCurve { .. })
        ));

        config.financial.investment_curve = vec![];
        assert!(config.validate().is_err());

        config.financial.investment_curve = vec![1.2, -0.2];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_triangular_bounds_checked() {
        let mut config = Config::default();
        config.monte_carlo.eaf_factor = TriangularFactor {
            low: 1.1,
            mode: 1.0,
            high: 1.2,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTriangular {
                name: "eaf_factor",
                ..
            })
        ));
    }

    #[test]
    fn test_scenario_factors_checked() {
        let mut config = Config::default();
        config.scenarios.lean_factor = 1.2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".costscope.toml"),
            "[monte_carlo]\nseed = 7\n",
        )
        .unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let config = Config::load_or_default(&nested);
        assert_eq!(config.monte_carlo.seed, 7);
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[monte_carlo\niterations = ").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("costscope init"));
    }
}
