use colored::{ColoredString, Colorize};

use costscope_core::error::ValidationFailure;
use costscope_core::risk::RiskAssessment;
use costscope_core::{EstimationModelResult, EstimationReport};

use crate::{dimension_label, money, output_label, payback_label, signed_pct};

fn section(title: &str) -> String {
    format!("\n{}\n{}\n", title.bold(), "-".repeat(40))
}

fn signed_money(value: f64) -> ColoredString {
    let s = money(value);
    if value >= 0.0 {
        s.green()
    } else {
        s.red()
    }
}

fn risk_colored(score: f64) -> ColoredString {
    let s = format!("{score:.1}");
    if score < 35.0 {
        s.green()
    } else if score < 65.0 {
        s.yellow()
    } else {
        s.red()
    }
}

fn model_line(label: &str, r: &EstimationModelResult) -> String {
    format!(
        "  {label:<16} {:>9.1} PM  {:>6.1} months  {}\n",
        r.effort_person_months,
        r.duration_months,
        money(r.total_cost),
    )
}

fn format_risk(risk: &RiskAssessment) -> String {
    let mut out = section("Risk");
    out.push_str(&format!("  Technical:    {}/100\n", risk_colored(risk.technical)));
    out.push_str(&format!("  Human:        {}/100\n", risk_colored(risk.human)));
    out.push_str(&format!("  Budget:       {}/100\n", risk_colored(risk.budget)));
    out.push_str(&format!(
        "  {}: {:.1}/300 (overall {})\n",
        "Total Risk Score".bold(),
        risk.total_risk_score,
        risk_colored(risk.overall),
    ));
    out.push_str(&format!(
        "  Success probability: {:.1}%\n  Recommended contingency: {:.1}%\n",
        risk.success_probability, risk.contingency_percent,
    ));
    out
}

/// Format a full estimation report for terminal output.
pub fn format_report(report: &EstimationReport) -> String {
    let mut out = String::new();
    let project = &report.project;

    out.push_str(&format!("\n{}\n", "Costscope - Estimation Report".bold()));
    out.push_str(&format!("{}\n", "=".repeat(40)));
    if let Some(ref name) = project.project_name {
        out.push_str(&format!("{}: {name}\n", "Project".bold()));
    }
    out.push_str(&format!(
        "  {} LOC, {}, EAF {:.2}, team {} ({} dev / {} test)\n",
        project.size_loc,
        project.process_class,
        project.effort_adjustment_factor,
        project.team_size(),
        project.developer_count,
        project.tester_count,
    ));

    let models = &report.estimation_models;
    out.push_str(&section("Estimation Models"));
    out.push_str(&model_line("COCOMO", &models.cocomo));
    out.push_str(&model_line("Function Point", &models.function_point));
    out.push_str(&format!("  ({} function points)\n", models.function_points));

    let fin = &report.financials.metrics;
    out.push_str(&section("Financials"));
    out.push_str(&format!(
        "  NPV @ {:.1}%:   {}\n",
        project.discount_rate * 100.0,
        signed_money(fin.npv)
    ));
    out.push_str(&format!(
        "  IRR:          {}\n",
        fin.irr
            .map(|r| format!("{:.2}%", r * 100.0))
            .unwrap_or_else(|| "undefined".dimmed().to_string())
    ));
    out.push_str(&format!("  ROI:          {}\n", signed_pct(fin.roi)));
    out.push_str(&format!(
        "  Payback:      {}\n",
        payback_label(fin.payback_period)
    ));
    let flows: Vec<String> = report.financials.cash_flow.iter().map(|f| money(*f)).collect();
    out.push_str(&format!("  Cash flow:    [{}]\n", flows.join(", ")));

    let mc = &report.monte_carlo_simulation;
    out.push_str(&section(&format!(
        "Monte Carlo ({} trials, seed {})",
        mc.iterations, report.seed
    )));
    out.push_str(&format!("  Mean:    {}\n", money(mc.mean_cost)));
    out.push_str(&format!("  Std dev: {}\n", money(mc.std_dev)));
    out.push_str(&format!(
        "  P10-P90: {} .. {}\n",
        money(mc.p10_cost),
        money(mc.p90_cost)
    ));

    let sens = &report.sensitivity_analysis;
    out.push_str(&section(&format!(
        "Sensitivity (+/-{:.0}%)",
        sens.delta * 100.0
    )));
    for f in &sens.factors {
        out.push_str(&format!(
            "  {:<22} -> {:<10} {:>9} / {:>9}\n",
            dimension_label(f.dimension),
            output_label(f.output),
            signed_pct(f.increase_pct),
            signed_pct(f.decrease_pct),
        ));
    }

    out.push_str(&format_risk(&report.risk_analysis));

    let budget = &report.budget_tracking;
    out.push_str(&section("Budget"));
    out.push_str(&format!("  Planned:    {}\n", money(budget.planned)));
    out.push_str(&format!("  Forecasted: {}\n", money(budget.forecasted)));
    let variance = money(budget.variance);
    out.push_str(&format!(
        "  Variance:   {}\n",
        if budget.variance > 0.0 {
            variance.red()
        } else {
            variance.green()
        }
    ));
    for p in &report.phase_breakdown {
        out.push_str(&format!(
            "    {:<12} {:>4.0}%  {}\n",
            p.phase.to_string(),
            p.share_pct,
            money(p.amount)
        ));
    }

    out.push_str(&section("Scenarios"));
    for s in &report.optimization_scenarios {
        out.push_str(&format!(
            "  {:<12} team {:>3}  {:>6.1} months  {}  (saves {} / {:+.1} months)\n",
            s.scenario_name.bold(),
            s.team_size,
            s.duration,
            money(s.cost),
            signed_money(s.cost_saving),
            s.time_saving,
        ));
    }

    let util = &report.resource_utilization;
    out.push_str(&section("Resource Utilization"));
    for (label, load) in [("Developers", util.developers), ("Testers", util.testers)] {
        let s = format!("{load:.1}%");
        let s = if load > 100.0 { s.red() } else { s.normal() };
        out.push_str(&format!("  {label:<11} {s}\n"));
    }

    out.push('\n');
    out
}

/// Format a validation failure, one line per offending field.
pub fn format_validation_failure(failure: &ValidationFailure) -> String {
    let mut out = format!(
        "{} ({} field(s))\n",
        "Invalid request".red().bold(),
        failure.violations.len()
    );
    for v in &failure.violations {
        out.push_str(&format!(
            "  {} [{}] {}\n",
            v.field.bold(),
            v.kind,
            v.message
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample_report;
    use costscope_core::error::{FieldViolation, ViolationKind};

    #[test]
    fn test_report_sections() {
        colored::control::set_override(false);
        let out = format_report(&sample_report());
        for heading in [
            "Estimation Models",
            "Financials",
            "Monte Carlo (1000 trials, seed 42)",
            "Sensitivity (+/-10%)",
            "Total Risk Score",
            "Scenarios",
            "Resource Utilization",
        ] {
            assert!(out.contains(heading), "missing {heading}: {out}");
        }
        assert!(out.contains("$1,918,923.43"), "{out}");
        assert!(out.contains("accelerated"));
    }

    #[test]
    fn test_undefined_irr_is_not_zero() {
        colored::control::set_override(false);
        let mut report = sample_report();
        report.financials.metrics.irr = None;
        report.financials.metrics.payback_period = -1.0;
        let out = format_report(&report);
        assert!(out.contains("IRR:          undefined"), "{out}");
        assert!(out.contains("never"));
    }

    #[test]
    fn test_validation_failure_lists_every_field() {
        colored::control::set_override(false);
        let failure = ValidationFailure {
            violations: vec![
                FieldViolation::new("sloc", ViolationKind::OutOfRange, "must be positive"),
                FieldViolation::new("eaf", ViolationKind::Missing, "is required"),
            ],
        };
        let out = format_validation_failure(&failure);
        assert!(out.contains("2 field(s)"));
        assert!(out.contains("sloc"));
        assert!(out.contains("eaf"));
    }
}
