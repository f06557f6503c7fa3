//! Discounted-cash-flow analysis of the estimated investment.
//!
//! Period 0 is the first investment period. Outflows follow the configured
//! investment curve; revenue arrives once per period from
//! `revenue_start_period` for `revenue_period_years` periods.

use serde::{Deserialize, Serialize};

use crate::config::FinancialConfig;
use crate::error::NumericError;
use crate::types::ProjectSpec;

/// One period of the schedule with its gross flows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashFlowPeriod {
    pub period: usize,
    pub outflow: f64,
    pub inflow: f64,
    pub net: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowSchedule {
    pub periods: Vec<CashFlowPeriod>,
}

impl CashFlowSchedule {
    /// Build the schedule for a project whose baseline cost is `total_cost`.
    pub fn build(spec: &ProjectSpec, total_cost: f64, config: &FinancialConfig) -> Self {
        let curve = &config.investment_curve;
        let start = config.revenue_start_period;
        let years = spec.revenue_period_years as usize;
        let len = curve.len().max(start + years);

        let periods = (0..len)
            .map(|i| {
                let outflow = curve.get(i).map_or(0.0, |w| w * total_cost);
                let inflow = if i >= start && i < start + years {
                    spec.expected_annual_revenue
                } else {
                    0.0
                };
                CashFlowPeriod {
                    period: i,
                    outflow,
                    inflow,
                    net: inflow - outflow,
                }
            })
            .collect();
        Self { periods }
    }

    pub fn net_flows(&self) -> Vec<f64> {
        self.periods.iter().map(|p| p.net).collect()
    }

    pub fn total_outflow(&self) -> f64 {
        self.periods.iter().map(|p| p.outflow).sum()
    }

    pub fn total_inflow(&self) -> f64 {
        self.periods.iter().map(|p| p.inflow).sum()
    }
}

/// Net present value of `flows` at `rate`, with `flows[0]` undiscounted.
pub fn npv(rate: f64, flows: &[f64]) -> f64 {
    flows
        .iter()
        .enumerate()
        .map(|(i, f)| f / (1.0 + rate).powi(i as i32))
        .sum()
}

/// Internal rate of return by bisection over `[irr_lower, irr_upper]`.
pub fn irr(flows: &[f64], config: &FinancialConfig) -> Result<f64, NumericError> {
    let (mut lo, mut hi) = (config.irr_lower, config.irr_upper);
    let no_root = NumericError::NoConvergence { lower: lo, upper: hi };

    let mut f_lo = npv(lo, flows);
    let f_hi = npv(hi, flows);
    if !f_lo.is_finite() || !f_hi.is_finite() {
        return Err(no_root);
    }
    if f_lo == 0.0 {
        return Ok(lo);
    }
    if f_hi == 0.0 {
        return Ok(hi);
    }
    if f_lo.signum() == f_hi.signum() {
        return Err(no_root);
    }

    for _ in 0..config.irr_max_iterations {
        let mid = 0.5 * (lo + hi);
        let f_mid = npv(mid, flows);
        if f_mid == 0.0 || 0.5 * (hi - lo) < config.irr_tolerance {
            return Ok(mid);
        }
        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }
    Err(no_root)
}

/// Return on investment in percent. `None` when nothing was invested.
pub fn roi(flows: &[f64]) -> Option<f64> {
    let gains: f64 = flows.iter().filter(|f| **f > 0.0).sum();
    let invested: f64 = flows.iter().filter(|f| **f < 0.0).map(|f| f.abs()).sum();
    if invested > 0.0 {
        Some((gains - invested) / invested * 100.0)
    } else {
        None
    }
}

/// Sentinel payback value: the cumulative flow never turns non-negative.
pub const NEVER_PAYS_BACK: f64 = -1.0;

/// Periods until the cumulative net flow first turns non-negative,
/// interpolated within the crossing period.
pub fn payback_period(flows: &[f64]) -> f64 {
    let mut cumulative = 0.0;
    for (i, &flow) in flows.iter().enumerate() {
        let before = cumulative;
        cumulative += flow;
        if cumulative >= 0.0 {
            if i == 0 || before >= 0.0 {
                return i as f64;
            }
            // flow > 0 here, since before < 0 <= cumulative
            return (i - 1) as f64 + (-before) / flow;
        }
    }
    NEVER_PAYS_BACK
}

/// Metrics derived from a cash-flow schedule and a discount rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialMetrics {
    pub npv: f64,
    /// `None` when the IRR solver found no root in its interval.
    pub irr: Option<f64>,
    pub roi: Option<f64>,
    /// -1 when the investment is not recovered within the horizon.
    pub payback_period: f64,
}

impl FinancialMetrics {
    pub fn from_flows(flows: &[f64], discount_rate: f64, config: &FinancialConfig) -> Self {
        let irr = match irr(flows, config) {
            Ok(rate) => Some(rate),
            Err(e) => {
                tracing::warn!("{e}");
                None
            }
        };
        Self {
            npv: npv(discount_rate, flows),
            irr,
            roi: roi(flows),
            payback_period: payback_period(flows),
        }
    }

    pub fn pays_back(&self) -> bool {
        self.payback_period >= 0.0
    }
}

/// Schedule plus metrics for one baseline cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialAnalysis {
    #[serde(flatten)]
    pub metrics: FinancialMetrics,
    #[serde(rename = "cashFlow")]
    pub cash_flow: Vec<f64>,
    pub schedule: CashFlowSchedule,
}

pub fn analyze(
    spec: &ProjectSpec,
    baseline_cost: f64,
    config: &FinancialConfig,
) -> FinancialAnalysis {
    let schedule = CashFlowSchedule::build(spec, baseline_cost, config);
    let cash_flow = schedule.net_flows();
    let metrics = FinancialMetrics::from_flows(&cash_flow, spec.discount_rate, config);
    FinancialAnalysis {
        metrics,
        cash_flow,
        schedule,
    }
}
