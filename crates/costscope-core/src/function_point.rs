//! Function-point sizing, kept independent of COCOMO for cross-checking.
//!
//! Size is backfired from LOC at [`LOC_PER_FUNCTION_POINT`]. Effort uses a
//! per-class delivery rate (function points per person-month) scaled by
//! the EAF; the schedule follows the `FP^k` rule of thumb with a per-class
//! exponent. The two models are reported side by side, never blended.

use crate::types::{EstimationModelResult, ProcessClass, ProjectSpec};

pub const LOC_PER_FUNCTION_POINT: f64 = 100.0;

/// Function points delivered per person-month.
pub fn delivery_rate(class: ProcessClass) -> f64 {
    match class {
        ProcessClass::Organic => 5.0,
        ProcessClass::SemiDetached => 3.5,
        ProcessClass::Embedded => 2.5,
    }
}

/// Exponent of the `duration = FP^k` schedule rule.
pub fn schedule_exponent(class: ProcessClass) -> f64 {
    match class {
        ProcessClass::Organic => 0.36,
        ProcessClass::SemiDetached => 0.39,
        ProcessClass::Embedded => 0.42,
    }
}

/// Whole function points, as shown to the user.
pub fn function_points(spec: &ProjectSpec) -> u64 {
    (spec.size_loc / LOC_PER_FUNCTION_POINT).floor() as u64
}

pub fn estimate(spec: &ProjectSpec) -> EstimationModelResult {
    // Unrounded size keeps effort continuous in LOC.
    let fp = spec.size_loc / LOC_PER_FUNCTION_POINT;
    let class = spec.process_class;
    let effort = fp / delivery_rate(class) * spec.effort_adjustment_factor;
    let duration = fp.powf(schedule_exponent(class));
    EstimationModelResult {
        effort_person_months: effort,
        duration_months: duration,
        total_cost: effort * spec.cost_per_person_month,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::sample_spec;

    #[test]
    fn test_reference_project() {
        let spec = sample_spec();
        assert_eq!(function_points(&spec), 500);

        let r = estimate(&spec);
        assert!((r.effort_person_months - 142.857_142_857).abs() < 1e-6);
        assert!((r.duration_months - 11.287_514).abs() < 1e-5);
        assert!((r.total_cost - 1_142_857.142_857).abs() < 1e-3);
    }

    #[test]
    fn test_function_points_round_down() {
        let spec = sample_spec().with_size(1_299.0);
        assert_eq!(function_points(&spec), 12);
    }

    #[test]
    fn test_heavier_class_costs_more() {
        let spec = sample_spec();
        let mut last = 0.0;
        for class in ProcessClass::ALL {
            let r = estimate(&ProjectSpec {
                process_class: class,
                ..spec.clone()
            });
            assert!(r.total_cost > last, "{class} should cost more than the lighter class");
            last = r.total_cost;
        }
    }

    #[test]
    fn test_independent_of_cocomo() {
        let spec = sample_spec();
        let fp = estimate(&spec);
        let cocomo = crate::cocomo::estimate(&spec);
        assert!((fp.total_cost - cocomo.total_cost).abs() > 1.0);
    }
}
