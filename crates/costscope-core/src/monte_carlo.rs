//! Monte Carlo simulation of total cost under size and EAF uncertainty.
//!
//! Trial `i` draws from its own `StdRng` seeded with `seed + i`, so the
//! samples are identical whether the trials run on one thread or many.
//!
//! Statistics:
//! - variance is the population variance (divides by N)
//! - percentiles use the nearest-rank method: `sorted[ceil(p * N) - 1]`

use rand::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cocomo;
use crate::config::{MonteCarloConfig, TriangularFactor};
use crate::error::ConfigError;
use crate::types::ProjectSpec;

/// Summary statistics of the simulated cost distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloResult {
    pub iterations: u64,
    pub mean_cost: f64,
    pub std_dev: f64,
    pub p10_cost: f64,
    pub p90_cost: f64,
    pub min_cost: f64,
    pub max_cost: f64,
}

impl MonteCarloResult {
    /// Width of the p10-p90 band relative to `planned_cost`.
    pub fn relative_spread(&self, planned_cost: f64) -> f64 {
        if planned_cost > 0.0 {
            (self.p90_cost - self.p10_cost) / planned_cost
        } else {
            0.0
        }
    }
}

/// Inverse-transform sample of a triangular distribution from `u` in [0, 1).
fn triangular(factor: &TriangularFactor, u: f64) -> f64 {
    let TriangularFactor { low, mode, high } = *factor;
    let range = high - low;
    if range <= 0.0 {
        return mode;
    }
    let fc = (mode - low) / range;
    if u < fc {
        low + (u * range * (mode - low)).sqrt()
    } else {
        high - ((1.0 - u) * range * (high - mode)).sqrt()
    }
}

/// Cost of one trial. Pure in `(spec, config, trial)`.
fn trial_cost(spec: &ProjectSpec, config: &MonteCarloConfig, trial: u64) -> f64 {
    let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(trial));
    let size_factor = triangular(&config.size_factor, rng.gen::<f64>());
    let eaf_factor = triangular(&config.eaf_factor, rng.gen::<f64>());
    let effort = cocomo::effort(
        spec.process_class,
        spec.kloc() * size_factor,
        spec.effort_adjustment_factor * eaf_factor,
    );
    effort * spec.cost_per_person_month
}

/// Draw `config.iterations` cost samples, in trial order.
pub fn sample_costs(
    spec: &ProjectSpec,
    config: &MonteCarloConfig,
) -> Result<Vec<f64>, ConfigError> {
    if config.iterations == 0 {
        return Err(ConfigError::ZeroIterations);
    }
    let n = config.iterations as usize;
    let samples = if config.parallel {
        (0..n)
            .into_par_iter()
            .map(|i| trial_cost(spec, config, i as u64))
            .collect()
    } else {
        (0..n).map(|i| trial_cost(spec, config, i as u64)).collect()
    };
    Ok(samples)
}

/// Nearest-rank percentile of an ascending slice. `p` is in (0, 1].
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = (p * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

/// Reduce samples to summary statistics. `samples` must be non-empty.
pub fn summarize(mut samples: Vec<f64>) -> MonteCarloResult {
    samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;

    MonteCarloResult {
        iterations: samples.len() as u64,
        mean_cost: mean,
        std_dev: variance.sqrt(),
        p10_cost: percentile(&samples, 0.10),
        p90_cost: percentile(&samples, 0.90),
        min_cost: samples.first().copied().unwrap_or(0.0),
        max_cost: samples.last().copied().unwrap_or(0.0),
    }
}

/// Run the simulation for `spec`.
pub fn simulate(
    spec: &ProjectSpec,
    config: &MonteCarloConfig,
) -> Result<MonteCarloResult, ConfigError> {
    let samples = sample_costs(spec, config)?;
    let result = summarize(samples);
    tracing::debug!(
        iterations = result.iterations,
        seed = config.seed,
        mean = result.mean_cost,
        p10 = result.p10_cost,
        p90 = result.p90_cost,
        "monte carlo finished"
    );
    Ok(result)
}
