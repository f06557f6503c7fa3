use serde::{Deserialize, Serialize};

use crate::budget::{self, BudgetTracking, PhaseBudget, ResourceUtilization};
use crate::config::Config;
use crate::error::EngineError;
use crate::financial::{self, FinancialAnalysis};
use crate::model::{EstimationModel, EstimationModels};
use crate::monte_carlo::{self, MonteCarloResult};
use crate::risk::{self, RiskAssessment};
use crate::scenario::{self, OptimizationScenario};
use crate::sensitivity::{self, SensitivityAnalysis};
use crate::types::{EstimationModelResult, ProjectSpec};
use crate::validation::{self, RawRequest};

/// Everything the engine computes for one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimationReport {
    pub project: ProjectSpec,
    /// Seed the Monte Carlo stage ran with
    pub seed: u64,
    pub estimation_models: EstimationModels,
    pub financials: FinancialAnalysis,
    pub risk_analysis: RiskAssessment,
    pub monte_carlo_simulation: MonteCarloResult,
    pub sensitivity_analysis: SensitivityAnalysis,
    pub budget_tracking: BudgetTracking,
    pub phase_breakdown: Vec<PhaseBudget>,
    pub optimization_scenarios: Vec<OptimizationScenario>,
    #[serde(rename = "resourceUtilization")]
    pub resource_utilization: ResourceUtilization,
}

impl EstimationReport {
    /// The COCOMO result every downstream stage is based on.
    pub fn baseline(&self) -> &EstimationModelResult {
        &self.estimation_models.cocomo
    }
}

/// Runs the full estimation pipeline. Holds only configuration, so one
/// orchestrator can serve any number of requests.
pub struct EstimationOrchestrator {
    config: Config,
}

impl EstimationOrchestrator {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Validate the request, then the configuration, then run every stage.
    pub fn run(&self, raw: &RawRequest) -> Result<EstimationReport, EngineError> {
        let spec = validation::validate(raw)?;
        self.run_spec(&spec)
    }

    /// Run every stage on an already validated spec.
    pub fn run_spec(&self, spec: &ProjectSpec) -> Result<EstimationReport, EngineError> {
        self.config.validate()?;
        let config = &self.config;
        tracing::info!(
            project = spec.project_name.as_deref().unwrap_or("-"),
            sloc = spec.size_loc,
            class = %spec.process_class,
            "running estimation"
        );

        let models = EstimationModels::compute(spec);
        let baseline = models.cocomo;
        tracing::debug!(
            effort = baseline.effort_person_months,
            duration = baseline.duration_months,
            cost = baseline.total_cost,
            "cocomo baseline"
        );

        let financials = financial::analyze(spec, baseline.total_cost, &config.financial);
        let mc = monte_carlo::simulate(spec, &config.monte_carlo)?;
        let sensitivity = sensitivity::analyze(spec, &config.financial, &config.sensitivity);
        let risk = risk::assess(spec, &baseline, &mc, &config.risk);
        let scenarios = scenario::optimize(spec, &baseline, &config.scenarios);

        tracing::debug!(
            npv = financials.metrics.npv,
            total_risk = risk.total_risk_score,
            scenarios = scenarios.len(),
            "estimation stages finished"
        );

        Ok(EstimationReport {
            project: spec.clone(),
            seed: config.monte_carlo.seed,
            estimation_models: models,
            financials,
            risk_analysis: risk,
            monte_carlo_simulation: mc,
            sensitivity_analysis: sensitivity,
            budget_tracking: BudgetTracking::new(baseline.total_cost, &mc),
            phase_breakdown: budget::phase_breakdown(baseline.total_cost),
            optimization_scenarios: scenarios,
            resource_utilization: ResourceUtilization::compute(
                spec,
                &baseline,
                &config.resources,
            ),
        })
    }

    /// Run a single estimation model selected by name.
    pub fn estimate_with(
        &self,
        raw: &RawRequest,
        model: &str,
    ) -> Result<EstimationModelResult, EngineError> {
        let model: EstimationModel = model.parse()?;
        let spec = validation::validate(raw)?;
        Ok(model.estimate(&spec))
    }
}
