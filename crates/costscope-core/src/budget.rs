use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ResourceConfig;
use crate::monte_carlo::MonteCarloResult;
use crate::types::{EstimationModelResult, ProjectSpec};

/// Delivery phase of the planned budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Planning,
    Design,
    Development,
    Testing,
    Deployment,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::Planning,
        Phase::Design,
        Phase::Development,
        Phase::Testing,
        Phase::Deployment,
    ];

    /// Share of the total budget, in percent.
    pub fn share_pct(&self) -> f64 {
        match self {
            Phase::Planning => 15.0,
            Phase::Design => 5.0,
            Phase::Development => 50.0,
            Phase::Testing => 20.0,
            Phase::Deployment => 10.0,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Planning => write!(f, "planning"),
            Phase::Design => write!(f, "design"),
            Phase::Development => write!(f, "development"),
            Phase::Testing => write!(f, "testing"),
            Phase::Deployment => write!(f, "deployment"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseBudget {
    pub phase: Phase,
    pub share_pct: f64,
    pub amount: f64,
}

pub fn phase_breakdown(total_cost: f64) -> Vec<PhaseBudget> {
    Phase::ALL
        .iter()
        .map(|&phase| PhaseBudget {
            phase,
            share_pct: phase.share_pct(),
            amount: total_cost * phase.share_pct() / 100.0,
        })
        .collect()
}

/// Planned (COCOMO) cost against the simulated forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetTracking {
    pub planned: f64,
    pub forecasted: f64,
    /// forecasted - planned; positive means an expected overrun
    pub variance: f64,
}

impl BudgetTracking {
    pub fn new(planned: f64, mc: &MonteCarloResult) -> Self {
        Self {
            planned,
            forecasted: mc.mean_cost,
            variance: mc.mean_cost - planned,
        }
    }

    pub fn variance_pct(&self) -> Option<f64> {
        (self.planned != 0.0).then(|| self.variance / self.planned * 100.0)
    }
}

/// Load of each role in percent of its capacity. Above 100 means overload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceUtilization {
    pub developers: f64,
    pub testers: f64,
}

fn load_pct(required: f64, available: u32) -> f64 {
    if available == 0 {
        0.0
    } else {
        100.0 * required / f64::from(available)
    }
}

impl ResourceUtilization {
    pub fn compute(
        spec: &ProjectSpec,
        estimate: &EstimationModelResult,
        config: &ResourceConfig,
    ) -> Self {
        let staffing = estimate.nominal_staffing();
        let share = config.developer_share;
        Self {
            developers: load_pct(staffing * share, spec.developer_count),
            testers: load_pct(staffing * (1.0 - share), spec.tester_count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::sample_spec;

    #[test]
    fn test_phase_shares_sum_to_total() {
        let phases = phase_breakdown(1_000_000.0);
        let total: f64 = phases.iter().map(|p| p.amount).sum();
        assert!((total - 1_000_000.0).abs() < 1e-6);
        assert_eq!(phases[2].phase, Phase::Development);
        assert!((phases[2].amount - 500_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_budget_variance() {
        let mc = MonteCarloResult {
            iterations: 10,
            mean_cost: 110.0,
            std_dev: 1.0,
            p10_cost: 100.0,
            p90_cost: 120.0,
            min_cost: 95.0,
            max_cost: 125.0,
        };
        let b = BudgetTracking::new(100.0, &mc);
        assert_eq!(b.forecasted, 110.0);
        assert_eq!(b.variance, 10.0);
        assert!((b.variance_pct().unwrap() - 10.0).abs() < 1e-12);
        assert_eq!(BudgetTracking::new(0.0, &mc).variance_pct(), None);
    }

    #[test]
    fn test_resource_utilization() {
        let spec = sample_spec();
        let estimate = EstimationModelResult {
            effort_person_months: 160.0,
            duration_months: 16.0,
            total_cost: 0.0,
        };
        // 10 people needed: 7 dev, 3 test
        let u = ResourceUtilization::compute(&spec, &estimate, &ResourceConfig::default());
        assert!((u.developers - 87.5).abs() < 1e-9);
        assert!((u.testers - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_overload_is_not_clamped() {
        let mut spec = sample_spec();
        spec.developer_count = 1;
        let estimate = EstimationModelResult {
            effort_person_months: 200.0,
            duration_months: 10.0,
            total_cost: 0.0,
        };
        let u = ResourceUtilization::compute(&spec, &estimate, &ResourceConfig::default());
        assert!(u.developers > 100.0);
    }
}
