use serde::{Deserialize, Serialize};

/// Mean wall-clock time of one input size
///
/// `time_ms` is the arithmetic mean of the raw runs at `n`. Timed-out runs
/// enter the mean as 0 and outliers are kept.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub n: u64,
    pub time_ms: f64,
}

impl Measurement {
    pub fn new(n: u64, time_ms: f64) -> Self {
        Self {
            n,
            time_ms: time_ms.max(0.0),
        }
    }

    /// Build from raw run timings (empty → 0)
    pub fn from_runs(n: u64, runs_ms: &[f64]) -> Self {
        if runs_ms.is_empty() {
            return Self::new(n, 0.0);
        }
        let mean = runs_ms.iter().sum::<f64>() / runs_ms.len() as f64;
        Self::new(n, mean)
    }
}
