//! Property-based tests for scheduling and model fitting

use complexity_engine::config::SamplingConfig;
use complexity_engine::features::sampling::SampleScheduler;
use complexity_engine::{ComplexityClass, Measurement, ModelFitter};
use proptest::prelude::*;

fn sizes() -> Vec<u64> {
    SampleScheduler::new(&SamplingConfig::default())
        .generate(1000, 25)
        .into_inner()
}

proptest! {
    #[test]
    fn schedule_is_strictly_increasing_and_bounded(max_n in 0u64..5000, count in 0usize..200) {
        let scheduler = SampleScheduler::new(&SamplingConfig::default());
        let schedule = scheduler.generate(max_n, count);
        let sizes = schedule.sizes();

        prop_assert!(sizes.len() <= count);
        prop_assert!(sizes.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(sizes.iter().all(|n| *n <= max_n));
        if count > 1 {
            prop_assert!(sizes.iter().all(|n| *n >= scheduler.min_input_size()));
        }
        prop_assert_eq!(schedule.is_empty(), max_n < scheduler.min_input_size() || count == 0);
    }

    #[test]
    fn schedule_ends_at_max_n(max_n in 10u64..5000, count in 2usize..200) {
        let schedule = SampleScheduler::new(&SamplingConfig::default()).generate(max_n, count);
        prop_assert_eq!(schedule.sizes().last().copied(), Some(max_n));
        prop_assert_eq!(schedule.sizes().first().copied(), Some(10));
    }

    #[test]
    fn fit_error_and_confidence_are_bounded(times in prop::collection::vec(0.0f64..500.0, 25)) {
        let measurements: Vec<Measurement> = sizes()
            .into_iter()
            .zip(times)
            .map(|(n, t)| Measurement::new(n, t))
            .collect();
        let fit = ModelFitter::default().fit(&measurements).unwrap();

        prop_assert!((0.0..=1.0).contains(&fit.normalized_error));
        prop_assert!(fit.confidence <= 100);
        prop_assert!(fit.model.is_conclusive());
        prop_assert!(fit.ranking.windows(2).all(|w| w[0].normalized_error <= w[1].normalized_error));
        prop_assert!(fit.ranking.iter().all(|s| (0.0..=1.0).contains(&s.normalized_error)));
    }

    #[test]
    fn scaled_linear_is_linear_at_full_confidence(scale in 0.0001f64..100.0) {
        let measurements: Vec<Measurement> = sizes()
            .into_iter()
            .map(|n| Measurement::new(n, scale * n as f64))
            .collect();
        let fit = ModelFitter::default().fit(&measurements).unwrap();

        prop_assert_eq!(fit.model, ComplexityClass::Linear);
        prop_assert_eq!(fit.confidence, 100);
    }
}
