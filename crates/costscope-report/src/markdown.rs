use costscope_core::EstimationReport;

use crate::{dimension_label, money, output_label, payback_label, signed_pct};

/// Format a full estimation report as Markdown.
pub fn format_report(report: &EstimationReport) -> String {
    let mut out = String::new();
    let project = &report.project;

    match project.project_name {
        Some(ref name) => out.push_str(&format!("# Costscope - {name}\n\n")),
        None => out.push_str("# Costscope - Estimation Report\n\n"),
    }
    out.push_str(&format!(
        "- **Size:** {} LOC ({})\n- **Team:** {} developers, {} testers\n- **Monte Carlo seed:** {}\n",
        project.size_loc, project.process_class, project.developer_count, project.tester_count, report.seed,
    ));

    // Models
    let models = &report.estimation_models;
    out.push_str("\n## Estimation Models\n\n");
    out.push_str("| Model | Effort (PM) | Duration (months) | Cost |\n");
    out.push_str("|-------|-------------|-------------------|------|\n");
    for (label, r) in [
        ("COCOMO", &models.cocomo),
        ("Function Point", &models.function_point),
    ] {
        out.push_str(&format!(
            "| {label} | {:.1} | {:.1} | {} |\n",
            r.effort_person_months,
            r.duration_months,
            money(r.total_cost)
        ));
    }

    // Financials
    let fin = &report.financials.metrics;
    out.push_str("\n## Financials\n\n");
    out.push_str("| Metric | Value |\n|--------|-------|\n");
    out.push_str(&format!("| NPV | {} |\n", money(fin.npv)));
    out.push_str(&format!(
        "| IRR | {} |\n",
        fin.irr
            .map(|r| format!("{:.2}%", r * 100.0))
            .unwrap_or_else(|| "undefined".to_string())
    ));
    out.push_str(&format!("| ROI | {} |\n", signed_pct(fin.roi)));
    out.push_str(&format!(
        "| Payback | {} |\n",
        payback_label(fin.payback_period)
    ));

    out.push_str("\n| Period | Outflow | Inflow | Net |\n");
    out.push_str("|--------|---------|--------|-----|\n");
    for p in &report.financials.schedule.periods {
        out.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            p.period,
            money(p.outflow),
            money(p.inflow),
            money(p.net)
        ));
    }

    // Monte Carlo
    let mc = &report.monte_carlo_simulation;
    out.push_str(&format!(
        "\n## Monte Carlo ({} trials)\n\n- **Mean:** {}\n- **Std dev:** {}\n- **P10:** {}\n- **P90:** {}\n",
        mc.iterations,
        money(mc.mean_cost),
        money(mc.std_dev),
        money(mc.p10_cost),
        money(mc.p90_cost),
    ));

    // Sensitivity
    let sens = &report.sensitivity_analysis;
    out.push_str(&format!(
        "\n## Sensitivity (+/-{:.0}%)\n\n",
        sens.delta * 100.0
    ));
    out.push_str("| Input | Output | Increase | Decrease |\n");
    out.push_str("|-------|--------|----------|----------|\n");
    for f in &sens.factors {
        out.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            dimension_label(f.dimension),
            output_label(f.output),
            signed_pct(f.increase_pct),
            signed_pct(f.decrease_pct),
        ));
    }

    // Risk
    let risk = &report.risk_analysis;
    out.push_str("\n## Risk\n\n");
    out.push_str("| Factor | Score |\n|--------|-------|\n");
    out.push_str(&format!("| Technical | {:.1}/100 |\n", risk.technical));
    out.push_str(&format!("| Human | {:.1}/100 |\n", risk.human));
    out.push_str(&format!("| Budget | {:.1}/100 |\n", risk.budget));
    out.push_str(&format!(
        "| **Total** | **{:.1}/300** |\n",
        risk.total_risk_score
    ));
    out.push_str(&format!(
        "\nSuccess probability {:.1}%, recommended contingency {:.1}%.\n",
        risk.success_probability, risk.contingency_percent
    ));

    // Budget
    let budget = &report.budget_tracking;
    out.push_str(&format!(
        "\n## Budget\n\n- **Planned:** {}\n- **Forecasted:** {}\n- **Variance:** {}\n\n",
        money(budget.planned),
        money(budget.forecasted),
        money(budget.variance),
    ));
    out.push_str("| Phase | Share | Amount |\n|-------|-------|--------|\n");
    for p in &report.phase_breakdown {
        out.push_str(&format!(
            "| {} | {:.0}% | {} |\n",
            p.phase,
            p.share_pct,
            money(p.amount)
        ));
    }

    // Scenarios
    out.push_str("\n## Scenarios\n\n");
    out.push_str("| Scenario | Team | Duration | Cost | Cost saving | Time saving |\n");
    out.push_str("|----------|------|----------|------|-------------|-------------|\n");
    for s in &report.optimization_scenarios {
        out.push_str(&format!(
            "| {} | {} | {:.1} | {} | {} | {:+.1} |\n",
            s.scenario_name,
            s.team_size,
            s.duration,
            money(s.cost),
            money(s.cost_saving),
            s.time_saving,
        ));
    }

    let util = &report.resource_utilization;
    out.push_str(&format!(
        "\n## Resource Utilization\n\n- **Developers:** {:.1}%\n- **Testers:** {:.1}%\n",
        util.developers, util.testers
    ));

    out
}
