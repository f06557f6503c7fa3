//! Error taxonomy of the estimation engine.
//!
//! Validation and configuration errors abort a request. Numeric
//! non-convergence never leaves the engine: it becomes a `null` metric.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Top-level failure of an estimation request.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    #[error("model error")]
    Model(#[from] ModelError),

    #[error("configuration error")]
    Configuration(#[from] ConfigError),
}

/// Contract violation between the validator and an estimation model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("unknown process class '{0}' (expected organic, semi-detached or embedded)")]
    UnknownProcessClass(String),

    #[error("unknown estimation model '{0}' (expected cocomo or functionPoint)")]
    UnknownModel(String),
}

/// Invalid engine tunables. Always fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Monte Carlo iteration count must be greater than zero")]
    ZeroIterations,

    #[error("investment curve must be non-empty, non-negative and sum to 1 (sum is {sum})")]
    InvalidInvestmentCurve { sum: f64 },

    #[error("triangular factor '{name}' needs 0 < low <= mode <= high (got {low}, {mode}, {high})")]
    InvalidTriangular {
        name: &'static str,
        low: f64,
        mode: f64,
        high: f64,
    },

    #[error("sensitivity delta must be in (0, 1), got {0}")]
    InvalidSensitivityDelta(f64),

    #[error("IRR search interval [{lower}, {upper}] is invalid")]
    InvalidIrrInterval { lower: f64, upper: f64 },

    #[error("scenario setting '{name}' is out of range: {value}")]
    InvalidScenarioSetting { name: &'static str, value: f64 },

    #[error("risk setting '{name}' must be positive, got {value}")]
    InvalidRiskSetting { name: &'static str, value: f64 },

    #[error("developer share must be in (0, 1), got {0}")]
    InvalidDeveloperShare(f64),
}

/// Failure of an iterative numeric solver.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum NumericError {
    #[error("no sign change of NPV in [{lower}, {upper}]; IRR is undefined")]
    NoConvergence { lower: f64, upper: f64 },
}

/// What was wrong with a single request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Missing,
    WrongType,
    NotANumber,
    NotAnInteger,
    OutOfRange,
    UnknownVariant,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::Missing => write!(f, "missing"),
            ViolationKind::WrongType => write!(f, "wrong type"),
            ViolationKind::NotANumber => write!(f, "not a number"),
            ViolationKind::NotAnInteger => write!(f, "not an integer"),
            ViolationKind::OutOfRange => write!(f, "out of range"),
            ViolationKind::UnknownVariant => write!(f, "unknown variant"),
        }
    }
}

/// One offending request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub kind: ViolationKind,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &str, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.field, self.kind, self.message)
    }
}

/// Every violation found in a request, never just the first one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub struct ValidationFailure {
    pub violations: Vec<FieldViolation>,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "request failed validation ({} field(s))", self.violations.len())?;
        for v in &self.violations {
            write!(f, "\n  - {v}")?;
        }
        Ok(())
    }
}

impl ValidationFailure {
    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_failure_lists_every_field() {
        let failure = ValidationFailure {
            violations: vec![
                FieldViolation::new("sloc", ViolationKind::OutOfRange, "must be > 0"),
                FieldViolation::new("eaf", ViolationKind::Missing, "field is required"),
            ],
        };
        let text = failure.to_string();
        assert!(text.contains("2 field(s)"), "{text}");
        assert!(text.contains("sloc (out of range)"), "{text}");
        assert!(text.contains("eaf (missing)"), "{text}");
        assert_eq!(failure.fields(), vec!["sloc", "eaf"]);
    }

    #[test]
    fn test_violation_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ViolationKind::NotAnInteger).unwrap();
        assert_eq!(json, "\"not_an_integer\"");
    }

    #[test]
    fn test_engine_error_wraps_config_error() {
        use std::error::Error as _;

        let err: EngineError = ConfigError::ZeroIterations.into();
        assert_eq!(err.to_string(), "configuration error");
        let source = err.source().map(|s| s.to_string()).unwrap_or_default();
        assert!(source.contains("iteration count"), "{source}");
    }

    #[test]
    fn test_wrapped_message_appears_once_in_chain() {
        let err: EngineError = ModelError::UnknownModel("putnam".into()).into();
        let chain = format!("{:#}", anyhow::Error::from(err));
        assert_eq!(chain.matches("putnam").count(), 1, "{chain}");
        assert!(chain.starts_with("model error: unknown estimation model"), "{chain}");
    }
}
