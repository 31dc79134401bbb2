//! Profile collector
//!
//! Sizes are profiled in increasing order. Each size is prepared once (one
//! compile per size) and executed `runs_per_size` times; the mean is recorded.
//! A run that hits the per-run timeout counts as 0 ms. This biases large,
//! flaky sizes downward and is kept as-is pending tuning.
//!
//! The session budget is wall-clock and is checked before each size and after
//! each run. Crossing it fails the whole session; no partial series is
//! returned.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::{ProfilingConfig, SandboxConfig};
use crate::errors::{AnalysisError, Result};
use crate::features::sampling::SampleSchedule;
use crate::features::sandbox::LanguageRuntime;
use crate::shared::models::Measurement;

/// Measurements of one profiling session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSeries {
    pub measurements: Vec<Measurement>,
    /// Runs that hit the per-run timeout and were recorded as 0 ms
    pub timed_out_runs: usize,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone)]
pub struct ProfileCollector {
    runs_per_size: usize,
    per_run_timeout: Duration,
    session_budget: Duration,
}

impl ProfileCollector {
    pub fn new(profiling: &ProfilingConfig, sandbox: &SandboxConfig) -> Self {
        Self {
            runs_per_size: profiling.runs_per_size.max(1),
            per_run_timeout: Duration::from_millis(sandbox.per_run_timeout_ms),
            session_budget: Duration::from_millis(profiling.session_budget_ms),
        }
    }

    pub fn runs_per_size(&self) -> usize {
        self.runs_per_size
    }

    /// Profile `source_code` at every size in `schedule`
    ///
    /// Errors: `BudgetExceeded` when the session budget runs out, `Compile`
    /// from any size, `ExecutionFailed` from any run. Timeouts are absorbed.
    pub async fn collect<R>(
        &self,
        runtime: &R,
        source_code: &str,
        schedule: &SampleSchedule,
    ) -> Result<ProfileSeries>
    where
        R: LanguageRuntime + ?Sized,
    {
        let started = Instant::now();
        let mut measurements = Vec::with_capacity(schedule.len());
        let mut timed_out_runs = 0;

        info!(
            "Profiling {} at {} sizes x {} runs",
            runtime.language(),
            schedule.len(),
            self.runs_per_size
        );

        for n in schedule.iter() {
            self.check_budget(started, n)?;

            let prepared = runtime.prepare(source_code, n).await?;
            let mut timings = Vec::with_capacity(self.runs_per_size);

            for run in 0..self.runs_per_size {
                let remaining = self.session_budget.saturating_sub(started.elapsed());
                let limit = self.per_run_timeout.min(remaining);

                match runtime.execute(&prepared, limit).await {
                    Ok(ms) => timings.push(ms),
                    Err(e) if e.is_run_recoverable() => {
                        warn!("Run {} at n={} timed out, recorded as 0ms", run + 1, n);
                        timed_out_runs += 1;
                        timings.push(0.0);
                    }
                    Err(e) => return Err(e),
                }

                self.check_budget(started, n)?;
            }

            runtime.cleanup(prepared)?;

            let measurement = Measurement::from_runs(n, &timings);
            debug!("n={} → {:.4}ms", n, measurement.time_ms);
            measurements.push(measurement);
        }

        let elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            "Profiling complete: {} measurements in {}ms ({} timed out runs)",
            measurements.len(),
            elapsed_ms,
            timed_out_runs
        );

        Ok(ProfileSeries {
            measurements,
            timed_out_runs,
            elapsed_ms,
        })
    }

    fn check_budget(&self, started: Instant, n: u64) -> Result<()> {
        let elapsed = started.elapsed();
        if elapsed >= self.session_budget {
            warn!("Profiling budget exceeded at n={}", n);
            return Err(AnalysisError::BudgetExceeded {
                budget_ms: self.session_budget.as_millis() as u64,
                elapsed_ms: elapsed.as_millis() as u64,
                n,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::sandbox::PreparedRun;
    use crate::shared::models::Language;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Sleeps `ms_per_n * n` per run under paused time
    struct FakeRuntime {
        ms_per_n: u64,
        compile_error_at: Option<u64>,
        scratch_root: tempfile::TempDir,
        prepared: Mutex<Vec<PathBuf>>,
    }

    impl FakeRuntime {
        fn new(ms_per_n: u64) -> Self {
            Self {
                ms_per_n,
                compile_error_at: None,
                scratch_root: tempfile::tempdir().unwrap(),
                prepared: Mutex::new(Vec::new()),
            }
        }

        fn scratch_is_empty(&self) -> bool {
            std::fs::read_dir(self.scratch_root.path())
                .unwrap()
                .next()
                .is_none()
        }
    }

    #[async_trait]
    impl LanguageRuntime for FakeRuntime {
        fn language(&self) -> Language {
            Language::Python
        }

        async fn prepare(&self, _source_code: &str, n: u64) -> Result<PreparedRun> {
            if self.compile_error_at == Some(n) {
                return Err(AnalysisError::Compile {
                    diagnostic: "error: expected ';'".to_string(),
                });
            }
            let scratch = tempfile::Builder::new()
                .prefix("fake-")
                .tempdir_in(self.scratch_root.path())?;
            self.prepared.lock().unwrap().push(scratch.path().to_path_buf());
            Ok(PreparedRun::new(scratch, Language::Python, n, "fake", vec![]))
        }

        async fn execute(&self, run: &PreparedRun, timeout: Duration) -> Result<f64> {
            let cost = Duration::from_millis(self.ms_per_n * run.n());
            if cost > timeout {
                tokio::time::sleep(timeout).await;
                return Err(AnalysisError::ExecutionTimeout {
                    timeout_ms: timeout.as_millis() as u64,
                });
            }
            tokio::time::sleep(cost).await;
            Ok(cost.as_secs_f64() * 1000.0)
        }
    }

    fn collector(runs: usize, timeout_ms: u64, budget_ms: u64) -> ProfileCollector {
        ProfileCollector::new(
            &ProfilingConfig::default()
                .runs_per_size(runs)
                .session_budget_ms(budget_ms),
            &SandboxConfig::default().per_run_timeout_ms(timeout_ms),
        )
    }

    fn schedule(sizes: &[u64]) -> SampleSchedule {
        serde_json::from_value(serde_json::json!(sizes)).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_collects_means_in_order() {
        let runtime = FakeRuntime::new(1);
        let series = collector(3, 2_000, 60_000)
            .collect(&runtime, "", &schedule(&[10, 20, 40]))
            .await
            .unwrap();

        let ns: Vec<u64> = series.measurements.iter().map(|m| m.n).collect();
        assert_eq!(ns, vec![10, 20, 40]);
        assert_eq!(series.measurements[2].time_ms, 40.0);
        assert_eq!(series.timed_out_runs, 0);
        // one preparation per size
        assert_eq!(runtime.prepared.lock().unwrap().len(), 3);
        assert!(runtime.scratch_is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_counts_as_zero() {
        let runtime = FakeRuntime::new(10);
        let series = collector(2, 150, 60_000)
            .collect(&runtime, "", &schedule(&[10, 20]))
            .await
            .unwrap();

        assert_eq!(series.measurements[0].time_ms, 100.0);
        assert_eq!(series.measurements[1].time_ms, 0.0);
        assert_eq!(series.timed_out_runs, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_budget_exceeded_returns_no_partial_series() {
        let runtime = FakeRuntime::new(10);
        let err = collector(1, 2_000, 1_000)
            .collect(&runtime, "", &schedule(&[10, 20, 40, 80]))
            .await
            .unwrap_err();

        match err {
            AnalysisError::BudgetExceeded { budget_ms, n, .. } => {
                assert_eq!(budget_ms, 1_000);
                assert_eq!(n, 80);
            }
            other => panic!("expected BudgetExceeded, got {:?}", other),
        }
        assert!(runtime.scratch_is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_compile_error_aborts() {
        let mut runtime = FakeRuntime::new(1);
        runtime.compile_error_at = Some(20);
        let err = collector(1, 2_000, 60_000)
            .collect(&runtime, "", &schedule(&[10, 20, 40]))
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::Compile { .. }));
        assert_eq!(runtime.prepared.lock().unwrap().len(), 1);
        assert!(runtime.scratch_is_empty());
    }
}
