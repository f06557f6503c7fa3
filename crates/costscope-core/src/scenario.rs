//! Alternative team configurations compared against the COCOMO baseline.
//!
//! The `accelerated` scenario is always present. `lean` and `balanced` are
//! listed only when their team differs from the baseline team and from every
//! team already listed.

use serde::{Deserialize, Serialize};

use crate::config::ScenarioConfig;
use crate::types::{EstimationModelResult, ProjectSpec};

pub const ACCELERATED: &str = "accelerated";
pub const LEAN: &str = "lean";
pub const BALANCED: &str = "balanced";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationScenario {
    pub scenario_name: String,
    pub team_size: u32,
    pub duration: f64,
    pub cost: f64,
    /// Negative when the scenario costs more than the baseline
    pub cost_saving: f64,
    /// Negative when the scenario takes longer than the baseline
    pub time_saving: f64,
}

impl OptimizationScenario {
    pub fn is_improvement(&self) -> bool {
        self.cost_saving > 0.0 || self.time_saving > 0.0
    }
}

/// Effort and duration of `baseline` re-staffed with `team` people.
///
/// Adding people shortens the schedule sub-linearly and inflates effort
/// (`r^brooks_exponent`). The schedule never drops below
/// `max_compression` of the baseline duration; the inflated effort is
/// kept when that floor applies.
pub fn restaff(
    baseline: &EstimationModelResult,
    baseline_team: u32,
    team: u32,
    config: &ScenarioConfig,
) -> (f64, f64) {
    let r = f64::from(team) / f64::from(baseline_team.max(1));
    let effort = baseline.effort_person_months * r.powf(config.brooks_exponent);
    let duration = baseline.duration_months * r.powf(config.brooks_exponent - 1.0);

    let floor = config.max_compression * baseline.duration_months;
    (effort, duration.max(floor))
}

fn scenario(
    name: &str,
    spec: &ProjectSpec,
    baseline: &EstimationModelResult,
    team: u32,
    config: &ScenarioConfig,
) -> OptimizationScenario {
    let (effort, duration) = restaff(baseline, spec.team_size(), team, config);
    let cost = effort * spec.cost_per_person_month;
    OptimizationScenario {
        scenario_name: name.to_string(),
        team_size: team,
        duration,
        cost,
        cost_saving: baseline.total_cost - cost,
        time_saving: baseline.duration_months - duration,
    }
}

fn scaled_team(team: u32, factor: f64) -> u32 {
    (f64::from(team) * factor).round() as u32
}

/// Build the scenario list. Never empty.
pub fn optimize(
    spec: &ProjectSpec,
    baseline: &EstimationModelResult,
    config: &ScenarioConfig,
) -> Vec<OptimizationScenario> {
    let team = spec.team_size();
    let candidates = [
        (LEAN, scaled_team(team, config.lean_factor).max(1)),
        (
            BALANCED,
            (baseline.nominal_staffing().round() as u32).max(1),
        ),
    ];

    let accelerated = scaled_team(team, config.accelerated_factor).max(team.saturating_add(1));
    let mut scenarios = vec![scenario(ACCELERATED, spec, baseline, accelerated, config)];
    for (name, size) in candidates {
        if size == team || scenarios.iter().any(|s| s.team_size == size) {
            tracing::debug!(scenario = name, team = size, "skipping scenario equal to a listed team");
            continue;
        }
        scenarios.push(scenario(name, spec, baseline, size, config));
    }
    scenarios
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cocomo;
    use crate::types::sample_spec;
    use proptest::prelude::*;

    fn baseline() -> EstimationModelResult {
        cocomo::estimate(&sample_spec())
    }

    fn named<'a>(list: &'a [OptimizationScenario], name: &str) -> Option<&'a OptimizationScenario> {
        list.iter().find(|s| s.scenario_name == name)
    }

    #[test]
    fn test_accelerated_always_first() {
        let list = optimize(&sample_spec(), &baseline(), &ScenarioConfig::default());
        assert_eq!(list[0].scenario_name, ACCELERATED);
        // 11 * 1.5 = 16.5 rounds to 17
        assert_eq!(list[0].team_size, 17);
    }

    #[test]
    fn test_accelerated_trades_cost_for_time() {
        let list = optimize(&sample_spec(), &baseline(), &ScenarioConfig::default());
        let acc = named(&list, ACCELERATED).unwrap();
        assert!(acc.time_saving > 0.0, "{acc:?}");
        assert!(acc.cost_saving < 0.0, "{acc:?}");
        assert!(acc.is_improvement());
    }

    #[test]
    fn test_lean_trades_time_for_cost() {
        let list = optimize(&sample_spec(), &baseline(), &ScenarioConfig::default());
        let lean = named(&list, LEAN).unwrap();
        // 11 * 0.75 = 8.25 rounds to 8
        assert_eq!(lean.team_size, 8);
        assert!(lean.time_saving < 0.0);
        assert!(lean.cost_saving > 0.0);
    }

    #[test]
    fn test_balanced_uses_nominal_staffing() {
        let base = baseline();
        let list = optimize(&sample_spec(), &base, &ScenarioConfig::default());
        // 239.87 PM over 17.02 months is about 14 people
        let balanced = named(&list, BALANCED).unwrap();
        assert_eq!(balanced.team_size, base.nominal_staffing().round() as u32);
    }

    #[test]
    fn test_single_person_team_still_has_a_scenario() {
        let mut spec = sample_spec();
        spec.developer_count = 1;
        spec.tester_count = 0;
        let base = EstimationModelResult {
            effort_person_months: 6.0,
            duration_months: 6.0,
            total_cost: 48_000.0,
        };
        let list = optimize(&spec, &base, &ScenarioConfig::default());
        assert_eq!(list[0].team_size, 2);
        assert!(named(&list, LEAN).is_none());
        // nominal staffing 1 equals the team
        assert!(named(&list, BALANCED).is_none());
    }

    #[test]
    fn test_maximal_team_does_not_overflow() {
        let mut spec = sample_spec();
        spec.developer_count = u32::MAX;
        spec.tester_count = u32::MAX;
        let list = optimize(&spec, &baseline(), &ScenarioConfig::default());
        assert_eq!(list[0].scenario_name, ACCELERATED);
        assert_eq!(list[0].team_size, u32::MAX);
        assert!(list[0].duration.is_finite());
    }

    #[test]
    fn test_compression_floor() {
        let config = ScenarioConfig::default();
        let base = EstimationModelResult {
            effort_person_months: 100.0,
            duration_months: 10.0,
            total_cost: 800_000.0,
        };
        let (effort, duration) = restaff(&base, 5, 50, &config);
        assert!((duration - 7.5).abs() < 1e-12);
        assert!((effort - 100.0 * 10f64.powf(0.25)).abs() < 1e-9);
    }

    #[test]
    fn test_same_team_reproduces_baseline() {
        let base = baseline();
        let (effort, duration) = restaff(&base, 11, 11, &ScenarioConfig::default());
        assert!((effort - base.effort_person_months).abs() < 1e-9);
        assert!((duration - base.duration_months).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn list_is_never_empty_and_teams_are_distinct(
            devs in 1u32..200,
            testers in 0u32..80,
            sloc in 500.0f64..2e6,
        ) {
            let mut spec = sample_spec().with_size(sloc);
            spec.developer_count = devs;
            spec.tester_count = testers;
            let base = cocomo::estimate(&spec);
            let list = optimize(&spec, &base, &ScenarioConfig::default());
            prop_assert!(!list.is_empty());
            prop_assert_eq!(list[0].scenario_name.as_str(), ACCELERATED);
            for (i, s) in list.iter().enumerate() {
                prop_assert!(s.team_size != spec.team_size());
                prop_assert!(list[i + 1..].iter().all(|o| o.team_size != s.team_size));
                prop_assert!(s.duration >= 0.75 * base.duration_months - 1e-9);
            }
        }
    }
}
