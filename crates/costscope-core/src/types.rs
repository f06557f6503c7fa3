use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ModelError;

/// Development mode of a project in the COCOMO sense.
/// Ordered from the least (Organic) to the most constrained (Embedded).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProcessClass {
    Organic,
    SemiDetached,
    Embedded,
}

impl ProcessClass {
    pub const ALL: [ProcessClass; 3] = [
        ProcessClass::Organic,
        ProcessClass::SemiDetached,
        ProcessClass::Embedded,
    ];

    /// Numeric complexity rank: 0 = organic, 2 = embedded.
    pub fn rank(&self) -> u8 {
        match self {
            ProcessClass::Organic => 0,
            ProcessClass::SemiDetached => 1,
            ProcessClass::Embedded => 2,
        }
    }
}

impl fmt::Display for ProcessClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessClass::Organic => write!(f, "organic"),
            ProcessClass::SemiDetached => write!(f, "semi-detached"),
            ProcessClass::Embedded => write!(f, "embedded"),
        }
    }
}

impl std::str::FromStr for ProcessClass {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "organic" => Ok(ProcessClass::Organic),
            "semi-detached" | "semidetached" | "semi_detached" => Ok(ProcessClass::SemiDetached),
            "embedded" => Ok(ProcessClass::Embedded),
            _ => Err(ModelError::UnknownProcessClass(s.to_string())),
        }
    }
}

/// Validated, immutable project description. Built once per request by
/// [`crate::validation::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    pub size_loc: f64,
    pub process_class: ProcessClass,
    pub effort_adjustment_factor: f64,
    pub discount_rate: f64,
    pub developer_count: u32,
    pub tester_count: u32,
    pub expected_annual_revenue: f64,
    pub project_duration_months: f64,
    pub cost_per_person_month: f64,
    pub revenue_period_years: u32,
}

impl ProjectSpec {
    pub fn kloc(&self) -> f64 {
        self.size_loc / 1000.0
    }

    /// Saturates for specs built outside the validator.
    pub fn team_size(&self) -> u32 {
        self.developer_count.saturating_add(self.tester_count)
    }

    /// Copy of this spec with a different size. Used by the perturbation stages.
    pub fn with_size(&self, size_loc: f64) -> Self {
        Self {
            size_loc,
            ..self.clone()
        }
    }

    pub fn with_eaf(&self, effort_adjustment_factor: f64) -> Self {
        Self {
            effort_adjustment_factor,
            ..self.clone()
        }
    }

    pub fn with_revenue(&self, expected_annual_revenue: f64) -> Self {
        Self {
            expected_annual_revenue,
            ..self.clone()
        }
    }

    pub fn with_cost_per_person_month(&self, cost_per_person_month: f64) -> Self {
        Self {
            cost_per_person_month,
            ..self.clone()
        }
    }
}

/// Effort, schedule and cost produced by one estimation model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimationModelResult {
    #[serde(rename = "effort")]
    pub effort_person_months: f64,
    #[serde(rename = "duration")]
    pub duration_months: f64,
    #[serde(rename = "cost")]
    pub total_cost: f64,
}

impl EstimationModelResult {
    /// Average number of people needed to deliver the effort over the duration.
    pub fn nominal_staffing(&self) -> f64 {
        if self.duration_months > 0.0 {
            self.effort_person_months / self.duration_months
        } else {
            0.0
        }
    }
}

/// Reference project used across the engine's unit tests.
#[cfg(test)]
pub(crate) fn sample_spec() -> ProjectSpec {
    ProjectSpec {
        project_name: Some("billing".to_string()),
        size_loc: 50_000.0,
        process_class: ProcessClass::SemiDetached,
        effort_adjustment_factor: 1.0,
        discount_rate: 0.1,
        developer_count: 8,
        tester_count: 3,
        expected_annual_revenue: 900_000.0,
        project_duration_months: 18.0,
        cost_per_person_month: 8000.0,
        revenue_period_years: 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_size_saturates() {
        let mut spec = sample_spec();
        spec.developer_count = u32::MAX;
        spec.tester_count = u32::MAX;
        assert_eq!(spec.team_size(), u32::MAX);
    }

    #[test]
    fn test_process_class_ordering() {
        assert!(ProcessClass::Organic < ProcessClass::SemiDetached);
        assert!(ProcessClass::SemiDetached < ProcessClass::Embedded);
        assert_eq!(ProcessClass::Embedded.rank(), 2);
    }

    #[test]
    fn test_process_class_parse() {
        assert_eq!(
            "organic".parse::<ProcessClass>().unwrap(),
            ProcessClass::Organic
        );
        assert_eq!(
            "Semi-Detached".parse::<ProcessClass>().unwrap(),
            ProcessClass::SemiDetached
        );
        assert_eq!(
            "embedded".parse::<ProcessClass>().unwrap(),
            ProcessClass::Embedded
        );
        assert!("mainframe".parse::<ProcessClass>().is_err());
    }

    #[test]
    fn test_process_class_serde_uses_kebab_case() {
        let json = serde_json::to_string(&ProcessClass::SemiDetached).unwrap();
        assert_eq!(json, "\"semi-detached\"");
        let back: ProcessClass = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ProcessClass::SemiDetached);
    }

    #[test]
    fn test_with_size_leaves_other_fields() {
        let spec = sample_spec();
        let bigger = spec.with_size(60_000.0);
        assert_eq!(bigger.size_loc, 60_000.0);
        assert_eq!(bigger.process_class, spec.process_class);
        assert_eq!(bigger.cost_per_person_month, spec.cost_per_person_month);
    }

    #[test]
    fn test_nominal_staffing() {
        let r = EstimationModelResult {
            effort_person_months: 120.0,
            duration_months: 12.0,
            total_cost: 0.0,
        };
        assert!((r.nominal_staffing() - 10.0).abs() < 1e-12);
    }
}
