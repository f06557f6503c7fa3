//! Basic COCOMO effort/schedule model.
//!
//! effort   = a * KLOC^b * EAF   (person-months)
//! duration = c * effort^d       (months)
//! cost     = effort * cost per person-month

use crate::types::{EstimationModelResult, ProcessClass, ProjectSpec};

/// Coefficient quadruple for one process class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Coefficients {
    pub fn for_class(class: ProcessClass) -> Self {
        match class {
            ProcessClass::Organic => Coefficients {
                a: 2.4,
                b: 1.05,
                c: 2.5,
                d: 0.38,
            },
            ProcessClass::SemiDetached => Coefficients {
                a: 3.0,
                b: 1.12,
                c: 2.5,
                d: 0.35,
            },
            ProcessClass::Embedded => Coefficients {
                a: 3.6,
                b: 1.20,
                c: 2.5,
                d: 0.32,
            },
        }
    }
}

pub fn effort(class: ProcessClass, kloc: f64, eaf: f64) -> f64 {
    let k = Coefficients::for_class(class);
    k.a * kloc.powf(k.b) * eaf
}

pub fn duration(class: ProcessClass, effort: f64) -> f64 {
    let k = Coefficients::for_class(class);
    k.c * effort.powf(k.d)
}

pub fn estimate(spec: &ProjectSpec) -> EstimationModelResult {
    let effort_pm = effort(spec.process_class, spec.kloc(), spec.effort_adjustment_factor);
    let duration_months = duration(spec.process_class, effort_pm);
    EstimationModelResult {
        effort_person_months: effort_pm,
        duration_months,
        total_cost: effort_pm * spec.cost_per_person_month,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::sample_spec;
    use proptest::prelude::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn test_semi_detached_regression_fixture() {
        let r = estimate(&sample_spec());
        assert!(
            close(r.effort_person_months, 239.8654, 1e-3),
            "effort was {}",
            r.effort_person_months
        );
        assert!(
            close(r.duration_months, 17.0188, 1e-3),
            "duration was {}",
            r.duration_months
        );
        assert!(
            close(r.total_cost, 1_918_923.43, 0.5),
            "cost was {}",
            r.total_cost
        );
    }

    #[test]
    fn test_organic_one_kloc() {
        let spec = sample_spec().with_size(1000.0);
        let spec = ProjectSpec {
            process_class: ProcessClass::Organic,
            ..spec
        };
        let r = estimate(&spec);
        assert!(close(r.effort_person_months, 2.4, 1e-12));
        assert!(close(r.duration_months, 2.5 * 2.4f64.powf(0.38), 1e-12));
    }

    #[test]
    fn test_eaf_scales_effort_linearly() {
        let base = estimate(&sample_spec());
        let doubled = estimate(&sample_spec().with_eaf(2.0));
        assert!(close(
            doubled.effort_person_months,
            2.0 * base.effort_person_months,
            1e-9
        ));
    }

    #[test]
    fn test_class_ordering_at_reference_size() {
        let spec = sample_spec();
        let by_class: Vec<_> = ProcessClass::ALL
            .iter()
            .map(|c| {
                estimate(&ProjectSpec {
                    process_class: *c,
                    ..spec.clone()
                })
            })
            .collect();
        assert!(by_class[0].effort_person_months <= by_class[1].effort_person_months);
        assert!(by_class[1].effort_person_months <= by_class[2].effort_person_months);
    }

    #[test]
    fn test_embedded_schedule_exponent_compresses_duration() {
        // Smaller d means embedded projects finish sooner for their effort.
        let spec = sample_spec();
        let semi = estimate(&spec);
        let embedded = estimate(&ProjectSpec {
            process_class: ProcessClass::Embedded,
            ..spec
        });
        assert!(embedded.effort_person_months > semi.effort_person_months);
        assert!(embedded.duration_months < semi.duration_months);
    }

    proptest! {
        #[test]
        fn effort_strictly_increases_with_size(
            kloc in 0.5f64..2000.0,
            bump in 1.001f64..3.0,
            eaf in 0.1f64..5.0,
            class_idx in 0usize..3,
        ) {
            let class = ProcessClass::ALL[class_idx];
            prop_assert!(effort(class, kloc * bump, eaf) > effort(class, kloc, eaf));
        }

        #[test]
        fn effort_strictly_increases_with_eaf(
            kloc in 0.5f64..2000.0,
            eaf in 0.1f64..5.0,
            bump in 1.001f64..3.0,
            class_idx in 0usize..3,
        ) {
            let class = ProcessClass::ALL[class_idx];
            prop_assert!(effort(class, kloc, eaf * bump) > effort(class, kloc, eaf));
        }

        #[test]
        fn embedded_effort_dominates_semi_detached_dominates_organic(
            kloc in 0.11f64..2000.0,
            eaf in 0.1f64..5.0,
        ) {
            let organic = effort(ProcessClass::Organic, kloc, eaf);
            let semi = effort(ProcessClass::SemiDetached, kloc, eaf);
            let embedded = effort(ProcessClass::Embedded, kloc, eaf);
            prop_assert!(embedded >= semi && semi >= organic);
        }
    }
}
