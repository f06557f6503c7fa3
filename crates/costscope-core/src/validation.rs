//! Turns a raw request field map into a [`ProjectSpec`].
//!
//! All fields are checked before returning, so a failure lists every
//! offending field. Nothing is defaulted silently except the optional
//! `projectName` and `revenuePeriodYears`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{FieldViolation, ValidationFailure, ViolationKind};
use crate::types::{ProcessClass, ProjectSpec};

pub const FIELD_PROJECT_NAME: &str = "projectName";
pub const FIELD_SIZE: &str = "sloc";
pub const FIELD_PROCESS_CLASS: &str = "projectClass";
pub const FIELD_EAF: &str = "eaf";
pub const FIELD_DISCOUNT_RATE: &str = "discountRate";
pub const FIELD_DEVELOPERS: &str = "developers";
pub const FIELD_TESTERS: &str = "testers";
pub const FIELD_REVENUE: &str = "expectedRevenue";
pub const FIELD_DURATION: &str = "projectDuration";
pub const FIELD_COST_PER_PM: &str = "costPerPersonMonth";
pub const FIELD_REVENUE_YEARS: &str = "revenuePeriodYears";

/// Upper bound on `developers + testers`.
pub const MAX_TEAM_SIZE: u32 = 1_000_000;

/// Request payload as received from the boundary: an untyped field map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRequest(pub Map<String, Value>);

impl RawRequest {
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field).filter(|v| !v.is_null())
    }

    pub fn insert(&mut self, field: &str, value: impl Into<Value>) {
        self.0.insert(field.to_string(), value.into());
    }
}

impl From<Value> for RawRequest {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => RawRequest(map),
            _ => RawRequest::default(),
        }
    }
}

/// Collects violations while fields are read.
struct FieldReader<'a> {
    raw: &'a RawRequest,
    violations: Vec<FieldViolation>,
}

impl<'a> FieldReader<'a> {
    fn new(raw: &'a RawRequest) -> Self {
        Self {
            raw,
            violations: Vec::new(),
        }
    }

    fn reject(&mut self, field: &str, kind: ViolationKind, message: impl Into<String>) {
        self.violations.push(FieldViolation::new(field, kind, message));
    }

    fn number(&mut self, field: &str) -> Option<f64> {
        let Some(value) = self.raw.get(field) else {
            self.reject(field, ViolationKind::Missing, "field is required");
            return None;
        };
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            // Form inputs often arrive as strings.
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match parsed {
            Some(n) if n.is_finite() => Some(n),
            _ => {
                self.reject(
                    field,
                    ViolationKind::NotANumber,
                    format!("expected a number, got {value}"),
                );
                None
            }
        }
    }

    fn positive(&mut self, field: &str) -> Option<f64> {
        let n = self.number(field)?;
        if n > 0.0 {
            Some(n)
        } else {
            self.reject(field, ViolationKind::OutOfRange, format!("must be > 0, got {n}"));
            None
        }
    }

    fn non_negative(&mut self, field: &str) -> Option<f64> {
        let n = self.number(field)?;
        if n >= 0.0 {
            Some(n)
        } else {
            self.reject(field, ViolationKind::OutOfRange, format!("must be >= 0, got {n}"));
            None
        }
    }

    fn positive_integer(&mut self, field: &str) -> Option<u32> {
        let n = self.number(field)?;
        if n.fract() != 0.0 {
            self.reject(
                field,
                ViolationKind::NotAnInteger,
                format!("expected a whole number, got {n}"),
            );
            return None;
        }
        if n < 1.0 || n > f64::from(u32::MAX) {
            self.reject(field, ViolationKind::OutOfRange, format!("must be >= 1, got {n}"));
            return None;
        }
        Some(n as u32)
    }

    fn optional_positive_integer(&mut self, field: &str) -> Option<Option<u32>> {
        if self.raw.get(field).is_none() {
            return Some(None);
        }
        self.positive_integer(field).map(Some)
    }

    fn fraction(&mut self, field: &str) -> Option<f64> {
        let n = self.number(field)?;
        if (0.0..1.0).contains(&n) {
            Some(n)
        } else {
            self.reject(
                field,
                ViolationKind::OutOfRange,
                format!("must be in [0, 1), got {n}"),
            );
            None
        }
    }

    fn process_class(&mut self, field: &str) -> Option<ProcessClass> {
        let Some(value) = self.raw.get(field) else {
            self.reject(field, ViolationKind::Missing, "field is required");
            return None;
        };
        let Some(s) = value.as_str() else {
            self.reject(
                field,
                ViolationKind::WrongType,
                format!("expected a string, got {value}"),
            );
            return None;
        };
        match s.parse::<ProcessClass>() {
            Ok(class) => Some(class),
            Err(e) => {
                self.reject(field, ViolationKind::UnknownVariant, e.to_string());
                None
            }
        }
    }

    fn team_limit(&mut self, developers: Option<u32>, testers: Option<u32>) {
        let (Some(developers), Some(testers)) = (developers, testers) else {
            return;
        };
        let team = u64::from(developers) + u64::from(testers);
        if team > u64::from(MAX_TEAM_SIZE) {
            self.reject(
                FIELD_TESTERS,
                ViolationKind::OutOfRange,
                format!("developers + testers must be <= {MAX_TEAM_SIZE}, got {team}"),
            );
        }
    }

    fn into_failure(mut self) -> ValidationFailure {
        if self.violations.is_empty() {
            self.reject("request", ViolationKind::WrongType, "request could not be read");
        }
        ValidationFailure {
            violations: self.violations,
        }
    }

    fn optional_string(&mut self, field: &str) -> Option<String> {
        match self.raw.get(field) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Some(Value::String(_)) | None => None,
            Some(other) => {
                self.reject(
                    field,
                    ViolationKind::WrongType,
                    format!("expected a string, got {other}"),
                );
                None
            }
        }
    }
}

/// Validate a raw request into a [`ProjectSpec`], or report every bad field.
pub fn validate(raw: &RawRequest) -> Result<ProjectSpec, ValidationFailure> {
    let mut r = FieldReader::new(raw);

    let project_name = r.optional_string(FIELD_PROJECT_NAME);
    let size_loc = r.positive(FIELD_SIZE);
    let process_class = r.process_class(FIELD_PROCESS_CLASS);
    let eaf = r.positive(FIELD_EAF);
    let discount_rate = r.fraction(FIELD_DISCOUNT_RATE);
    let developers = r.positive_integer(FIELD_DEVELOPERS);
    let testers = r.positive_integer(FIELD_TESTERS);
    r.team_limit(developers, testers);
    let revenue = r.non_negative(FIELD_REVENUE);
    let duration = r.positive(FIELD_DURATION);
    let cost_per_pm = r.positive(FIELD_COST_PER_PM);
    let revenue_years = r.optional_positive_integer(FIELD_REVENUE_YEARS);

    let (
        Some(size_loc),
        Some(process_class),
        Some(effort_adjustment_factor),
        Some(discount_rate),
        Some(developer_count),
        Some(tester_count),
        Some(expected_annual_revenue),
        Some(project_duration_months),
        Some(cost_per_person_month),
        Some(revenue_years),
    ) = (
        size_loc,
        process_class,
        eaf,
        discount_rate,
        developers,
        testers,
        revenue,
        duration,
        cost_per_pm,
        revenue_years,
    )
    else {
        return Err(r.into_failure());
    };
    if !r.violations.is_empty() {
        return Err(r.into_failure());
    }

    Ok(ProjectSpec {
        project_name,
        size_loc,
        process_class,
        effort_adjustment_factor,
        discount_rate,
        developer_count,
        tester_count,
        expected_annual_revenue,
        project_duration_months,
        cost_per_person_month,
        revenue_period_years: revenue_years
            .unwrap_or_else(|| revenue_years_for(project_duration_months)),
    })
}

/// Financial horizon derived from the project duration: one period per started year.
pub fn revenue_years_for(duration_months: f64) -> u32 {
    ((duration_months / 12.0).ceil() as u32).max(1)
}
