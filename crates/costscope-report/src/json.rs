use serde::Serialize;

use costscope_core::error::{EngineError, FieldViolation};
use costscope_core::EstimationReport;

fn to_json<T: Serialize>(value: &T, compact: bool) -> serde_json::Result<String> {
    if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
}

/// Format a full estimation report as JSON.
pub fn format_report(report: &EstimationReport, compact: bool) -> serde_json::Result<String> {
    to_json(report, compact)
}

/// Structured error payload for a failed request.
#[derive(Debug, Serialize)]
pub struct ErrorOutput<'a> {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<&'a [FieldViolation]>,
}

impl<'a> ErrorOutput<'a> {
    pub fn from_error(err: &'a EngineError) -> Self {
        match err {
            EngineError::Validation(failure) => Self {
                error: "validation",
                message: format!("{} invalid field(s)", failure.violations.len()),
                violations: Some(&failure.violations),
            },
            EngineError::Model(e) => Self {
                error: "model",
                message: e.to_string(),
                violations: None,
            },
            EngineError::Configuration(e) => Self {
                error: "configuration",
                message: e.to_string(),
                violations: None,
            },
        }
    }
}

pub fn format_error(err: &EngineError, compact: bool) -> serde_json::Result<String> {
    to_json(&ErrorOutput::from_error(err), compact)
}
