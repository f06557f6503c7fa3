//! One-factor-at-a-time sensitivity of cost, schedule and NPV.
//!
//! Each input is moved by `+delta` and `-delta` with everything else held
//! fixed, and the relative change of the measured output is reported in
//! percent. Changes are `None` when the baseline output is zero.

use serde::{Deserialize, Serialize};

use crate::cocomo;
use crate::config::{FinancialConfig, SensitivityConfig};
use crate::financial;
use crate::types::ProjectSpec;

/// Input that gets perturbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitivityDimension {
    /// Expected annual revenue
    Revenue,
    /// Cost per person-month
    Cost,
    /// Size in lines of code
    ProjectScale,
}

/// Output whose change is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitivityOutput {
    Npv,
    TotalCost,
    Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensitivityFactor {
    pub dimension: SensitivityDimension,
    pub output: SensitivityOutput,
    pub increase_pct: Option<f64>,
    pub decrease_pct: Option<f64>,
}

impl SensitivityFactor {
    /// Change in output percent per percent of input change, from the +delta run.
    pub fn elasticity(&self, delta: f64) -> Option<f64> {
        self.increase_pct.map(|pct| pct / (delta * 100.0))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityAnalysis {
    pub delta: f64,
    /// NPV change for +delta revenue
    pub revenue_impact: Option<f64>,
    /// Total cost change for +delta cost per person-month
    pub cost_impact: Option<f64>,
    /// Total cost change for +delta size
    #[serde(rename = "projectScale")]
    pub project_scale: Option<f64>,
    pub factors: Vec<SensitivityFactor>,
}

impl SensitivityAnalysis {
    pub fn factor(
        &self,
        dimension: SensitivityDimension,
        output: SensitivityOutput,
    ) -> Option<&SensitivityFactor> {
        self.factors
            .iter()
            .find(|f| f.dimension == dimension && f.output == output)
    }
}

pub fn pct_change(base: f64, perturbed: f64) -> Option<f64> {
    if base == 0.0 || !base.is_finite() {
        None
    } else {
        Some((perturbed - base) / base.abs() * 100.0)
    }
}

fn perturb(spec: &ProjectSpec, dimension: SensitivityDimension, scale: f64) -> ProjectSpec {
    match dimension {
        SensitivityDimension::Revenue => spec.with_revenue(spec.expected_annual_revenue * scale),
        SensitivityDimension::Cost => {
            spec.with_cost_per_person_month(spec.cost_per_person_month * scale)
        }
        SensitivityDimension::ProjectScale => spec.with_size(spec.size_loc * scale),
    }
}

fn measure(spec: &ProjectSpec, output: SensitivityOutput, financial: &FinancialConfig) -> f64 {
    let estimate = cocomo::estimate(spec);
    match output {
        SensitivityOutput::TotalCost => estimate.total_cost,
        SensitivityOutput::Duration => estimate.duration_months,
        SensitivityOutput::Npv => {
            financial::analyze(spec, estimate.total_cost, financial)
                .metrics
                .npv
        }
    }
}

const FACTORS: [(SensitivityDimension, SensitivityOutput); 5] = [
    (SensitivityDimension::Revenue, SensitivityOutput::Npv),
    (SensitivityDimension::Cost, SensitivityOutput::TotalCost),
    (SensitivityDimension::Cost, SensitivityOutput::Npv),
    (SensitivityDimension::ProjectScale, SensitivityOutput::TotalCost),
    (SensitivityDimension::ProjectScale, SensitivityOutput::Duration),
];

pub fn analyze(
    spec: &ProjectSpec,
    financial: &FinancialConfig,
    config: &SensitivityConfig,
) -> SensitivityAnalysis {
    let delta = config.delta;
    let factors: Vec<SensitivityFactor> = FACTORS
        .iter()
        .map(|&(dimension, output)| {
            let base = measure(spec, output, financial);
            let up = measure(&perturb(spec, dimension, 1.0 + delta), output, financial);
            let down = measure(&perturb(spec, dimension, 1.0 - delta), output, financial);
            SensitivityFactor {
                dimension,
                output,
                increase_pct: pct_change(base, up),
                decrease_pct: pct_change(base, down),
            }
        })
        .collect();

    let headline = |dimension: SensitivityDimension, output: SensitivityOutput| {
        factors
            .iter()
            .find(|f| f.dimension == dimension && f.output == output)
            .and_then(|f| f.increase_pct)
    };

    SensitivityAnalysis {
        delta,
        revenue_impact: headline(SensitivityDimension::Revenue, SensitivityOutput::Npv),
        cost_impact: headline(SensitivityDimension::Cost, SensitivityOutput::TotalCost),
        project_scale: headline(
            SensitivityDimension::ProjectScale,
            SensitivityOutput::TotalCost,
        ),
        factors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{sample_spec, ProcessClass};
    use proptest::prelude::*;

    fn run(spec: &ProjectSpec) -> SensitivityAnalysis {
        analyze(
            spec,
            &FinancialConfig::default(),
            &SensitivityConfig::default(),
        )
    }

    #[test]
    fn test_cost_impact_is_linear() {
        let s = run(&sample_spec());
        let cost = s.cost_impact.unwrap();
        assert!((cost - 10.0).abs() < 1e-9, "cost impact was {cost}");
        let down = s
            .factor(SensitivityDimension::Cost, SensitivityOutput::TotalCost)
            .and_then(|f| f.decrease_pct)
            .unwrap();
        assert!((down + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_scale_impact_follows_exponent() {
        let s = run(&sample_spec());
        // semi-detached: effort ~ KLOC^1.12
        let expected = (1.1f64.powf(1.12) - 1.0) * 100.0;
        assert!((s.project_scale.unwrap() - expected).abs() < 1e-9);
        let duration = s
            .factor(SensitivityDimension::ProjectScale, SensitivityOutput::Duration)
            .unwrap();
        assert!(duration.increase_pct.unwrap() > 0.0);
        assert!(duration.decrease_pct.unwrap() < 0.0);
    }

    #[test]
    fn test_revenue_raises_npv_and_cost_lowers_it() {
        let s = run(&sample_spec());
        assert!(s.revenue_impact.unwrap() > 0.0);
        let cost_npv = s
            .factor(SensitivityDimension::Cost, SensitivityOutput::Npv)
            .unwrap();
        assert!(cost_npv.increase_pct.unwrap() < 0.0);
    }

    #[test]
    fn test_zero_revenue_is_zero_change_and_zero_baseline_is_undefined() {
        let mut spec = sample_spec();
        spec.expected_annual_revenue = 0.0;
        let s = run(&spec);
        let revenue = s
            .factor(SensitivityDimension::Revenue, SensitivityOutput::Npv)
            .unwrap();
        // Scaling zero revenue changes nothing, but the baseline NPV is non-zero.
        assert_eq!(revenue.increase_pct, Some(0.0));
        assert_eq!(pct_change(0.0, 5.0), None);
    }

    #[test]
    fn test_elasticity() {
        let s = run(&sample_spec());
        let cost = s
            .factor(SensitivityDimension::Cost, SensitivityOutput::TotalCost)
            .unwrap();
        assert!((cost.elasticity(s.delta).unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_serialized_headline_keys() {
        let json = serde_json::to_value(run(&sample_spec())).unwrap();
        assert!(json["revenue_impact"].is_number());
        assert!(json["cost_impact"].is_number());
        assert!(json["projectScale"].is_number());
        assert_eq!(json["factors"].as_array().unwrap().len(), 5);
    }

    proptest! {
        #[test]
        fn revenue_increase_never_weaker_than_decrease(
            revenue in 1.0f64..5e6,
            sloc in 1_000.0f64..500_000.0,
            rate in 0.0f64..0.5,
            class_idx in 0usize..3,
        ) {
            let spec = ProjectSpec {
                expected_annual_revenue: revenue,
                size_loc: sloc,
                discount_rate: rate,
                process_class: ProcessClass::ALL[class_idx],
                ..sample_spec()
            };
            let s = run(&spec);
            let f = s.factor(SensitivityDimension::Revenue, SensitivityOutput::Npv).unwrap();
            if let (Some(up), Some(down)) = (f.increase_pct, f.decrease_pct) {
                prop_assert!(up.abs() + 1e-6 >= down.abs());
                prop_assert!(up >= 0.0 && down <= 0.0);
            }
        }
    }
}
