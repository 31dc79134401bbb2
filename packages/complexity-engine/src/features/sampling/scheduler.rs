//! Sample scheduler
//!
//! `n_i = min + (max_n - min) * (1 - (1 - t_i)^p)` with `t_i = i / (count - 1)`.
//! For `p > 1` consecutive gaps shrink as `t` grows, so the upper end of the
//! range is sampled more densely than uniform spacing would.

use serde::{Deserialize, Serialize};

use crate::config::SamplingConfig;

/// Strictly increasing, duplicate-free input sizes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SampleSchedule(Vec<u64>);

impl SampleSchedule {
    pub fn sizes(&self) -> &[u64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A curve needs at least two points
    pub fn is_sufficient(&self) -> bool {
        self.0.len() >= 2
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.0.iter().copied()
    }

    pub fn into_inner(self) -> Vec<u64> {
        self.0
    }
}

impl<'a> IntoIterator for &'a SampleSchedule {
    type Item = &'a u64;
    type IntoIter = std::slice::Iter<'a, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Generates sample schedules
#[derive(Debug, Clone)]
pub struct SampleScheduler {
    min_input_size: u64,
    spacing_exponent: f64,
}

impl SampleScheduler {
    pub fn new(config: &SamplingConfig) -> Self {
        Self {
            min_input_size: config.min_input_size.max(1),
            spacing_exponent: config.spacing_exponent,
        }
    }

    pub fn min_input_size(&self) -> u64 {
        self.min_input_size
    }

    /// Generate up to `count` sizes in `[min, max_n]`
    ///
    /// Rounded duplicates are dropped, so the schedule may be shorter than
    /// `count`. Empty when `max_n < min` or `count == 0`; `[max_n]` when
    /// `count == 1`.
    pub fn generate(&self, max_n: u64, count: usize) -> SampleSchedule {
        let min = self.min_input_size;
        if max_n < min || count == 0 {
            return SampleSchedule::default();
        }
        if count == 1 {
            return SampleSchedule(vec![max_n]);
        }

        let span = (max_n - min) as f64;
        let last = (count - 1) as f64;
        let mut sizes: Vec<u64> = Vec::with_capacity(count);

        for i in 0..count {
            let t = i as f64 / last;
            let offset = span * (1.0 - (1.0 - t).powf(self.spacing_exponent));
            let n = (min as f64 + offset).round().clamp(min as f64, max_n as f64) as u64;

            if sizes.last().map_or(true, |&prev| n > prev) {
                sizes.push(n);
            }
        }

        tracing::debug!(
            "Sample schedule: {} sizes in [{}, {}] (requested {})",
            sizes.len(),
            min,
            max_n,
            count
        );

        SampleSchedule(sizes)
    }
}

impl Default for SampleScheduler {
    fn default() -> Self {
        Self::new(&SamplingConfig::default())
    }
}
