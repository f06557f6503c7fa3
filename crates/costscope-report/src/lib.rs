pub mod json;
pub mod markdown;
pub mod text;

use costscope_core::sensitivity::{SensitivityDimension, SensitivityOutput};

/// `$1,234,567.89`, with a leading minus for negative amounts.
pub fn money(value: f64) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }
    let cents = (value.abs() * 100.0).round() as u64;
    let digits = (cents / 100).to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}

/// Signed percentage, or `n/a` when undefined.
pub fn signed_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:+.2}%"),
        None => "n/a".to_string(),
    }
}

pub(crate) fn payback_label(payback: f64) -> String {
    if payback < 0.0 {
        "never (within horizon)".to_string()
    } else {
        format!("{payback:.2} years")
    }
}

pub(crate) fn dimension_label(dimension: SensitivityDimension) -> &'static str {
    match dimension {
        SensitivityDimension::Revenue => "revenue",
        SensitivityDimension::Cost => "cost per person-month",
        SensitivityDimension::ProjectScale => "project size",
    }
}

pub(crate) fn output_label(output: SensitivityOutput) -> &'static str {
    match output {
        SensitivityOutput::Npv => "NPV",
        SensitivityOutput::TotalCost => "total cost",
        SensitivityOutput::Duration => "duration",
    }
}

#[cfg(test)]
pub(crate) fn sample_report() -> costscope_core::EstimationReport {
    use costscope_core::{Config, EstimationOrchestrator, ProcessClass, ProjectSpec};

    let spec = ProjectSpec {
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
    };
    EstimationOrchestrator::new(Config::default())
        .run_spec(&spec)
        .expect("default config is valid")
}
