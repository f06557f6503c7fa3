use serde::{Deserialize, Serialize};

use crate::config::RiskConfig;
use crate::monte_carlo::MonteCarloResult;
use crate::types::{EstimationModelResult, ProjectSpec};

/// Points contributed by each step of process complexity above organic.
const CLASS_STEP_POINTS: f64 = 15.0;
/// Maximum points contributed by size alone.
const SIZE_POINTS: f64 = 70.0;

/// Composite risk. Each sub-score is a percentage in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub technical: f64,
    pub human: f64,
    pub budget: f64,
    /// technical + human + budget, at most 300
    pub total_risk_score: f64,
    /// Mean of the three sub-scores
    pub overall: f64,
    pub success_probability: f64,
    /// Recommended budget reserve, in percent of the planned cost
    pub contingency_percent: f64,
}

fn clamp_pct(value: f64) -> f64 {
    if value.is_nan() {
        return 100.0;
    }
    value.clamp(0.0, 100.0)
}

/// Grows with size (saturating) and with process complexity.
pub fn technical_score(spec: &ProjectSpec, config: &RiskConfig) -> f64 {
    let kloc = spec.kloc();
    let size_part = SIZE_POINTS * kloc / (kloc + config.size_half_point_kloc);
    let class_part = CLASS_STEP_POINTS * f64::from(spec.process_class.rank());
    clamp_pct(size_part + class_part)
}

/// Grows as the team drifts away from the staffing the effort calls for,
/// in either direction.
pub fn human_score(spec: &ProjectSpec, estimate: &EstimationModelResult, config: &RiskConfig) -> f64 {
    let staffing = estimate.nominal_staffing();
    if staffing <= 0.0 {
        return 100.0;
    }
    let ratio = f64::from(spec.team_size()) / staffing;
    clamp_pct(100.0 * ratio.ln().abs() / config.team_ratio_ceiling.ln())
}

/// Grows with the width of the simulated p10-p90 cost band.
pub fn budget_score(mc: &MonteCarloResult, planned_cost: f64, config: &RiskConfig) -> f64 {
    clamp_pct(100.0 * mc.relative_spread(planned_cost) / config.budget_spread_ceiling)
}

pub fn assess(
    spec: &ProjectSpec,
    estimate: &EstimationModelResult,
    mc: &MonteCarloResult,
    config: &RiskConfig,
) -> RiskAssessment {
    let technical = technical_score(spec, config);
    let human = human_score(spec, estimate, config);
    let budget = budget_score(mc, estimate.total_cost, config);
    let total = technical + human + budget;
    let overall = total / 3.0;

    RiskAssessment {
        technical,
        human,
        budget,
        total_risk_score: total,
        overall,
        success_probability: (100.0 - 0.9 * overall).max(10.0),
        contingency_percent: 0.15 * overall,
    }
}
