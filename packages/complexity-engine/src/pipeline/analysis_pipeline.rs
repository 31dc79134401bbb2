//! Analysis pipeline
//!
//! Wires the scheduler, sandbox, collector, fitter, static analyzer and
//! reconciler for one request. Holds no mutable state, so one pipeline can
//! serve concurrent requests.

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::{SamplingConfig, ValidatedConfig};
use crate::errors::{AnalysisError, PipelineError, Stage, StageContext};
use crate::features::cost_analysis::StaticAnalyzer;
use crate::features::model_fitting::{FitResult, ModelFitter};
use crate::features::profiling::ProfileCollector;
use crate::features::reconciliation::VerdictReconciler;
use crate::features::sampling::SampleScheduler;
use crate::features::sandbox::ExecutionSandbox;
use crate::pipeline::report::AnalysisReport;
use crate::pipeline::request::AnalysisRequest;
use crate::shared::models::{ComplexityClass, Measurement};

pub struct AnalysisPipeline {
    sampling: SamplingConfig,
    scheduler: SampleScheduler,
    sandbox: ExecutionSandbox,
    collector: ProfileCollector,
    fitter: ModelFitter,
    fallback_model: ComplexityClass,
    analyzer: StaticAnalyzer,
    reconciler: VerdictReconciler,
}

impl AnalysisPipeline {
    pub fn new(config: ValidatedConfig) -> Self {
        let sampling = config.sampling();
        let sandbox = config.sandbox();
        let fitting = config.fitting();

        info!("analysis_pipeline_initialized ({})", config.as_inner().describe());

        Self {
            scheduler: SampleScheduler::new(&sampling),
            sandbox: ExecutionSandbox::new(&sandbox),
            collector: ProfileCollector::new(&config.profiling(), &sandbox),
            fitter: ModelFitter::new(&fitting),
            fallback_model: fitting.fallback_model,
            analyzer: StaticAnalyzer::new(),
            reconciler: VerdictReconciler::new(&config.reconcile()),
            sampling,
        }
    }

    /// Run one request end to end
    ///
    /// Errors carry the stage they came from. `InsufficientData` is not an
    /// error here: it yields a fallback fit and a notice.
    pub async fn analyze(
        &self,
        request: &AnalysisRequest,
    ) -> Result<AnalysisReport, PipelineError> {
        let session_id = Uuid::new_v4();
        let mut timings = StageTimings::default();

        // 1. Validation
        let clock = Instant::now();
        let normalized = request.normalize(&self.sampling).at_stage(Stage::Validation)?;
        for notice in &normalized.notices {
            warn!("[{}] {}", session_id, notice);
        }
        let mut notices = normalized.notices;
        let submission = normalized.submission;
        let language = submission.language();
        timings.record(Stage::Validation, clock);

        info!(
            "[{}] Analyzing {} submission (max_n={}, samples={})",
            session_id, language, normalized.max_input_size, normalized.sample_count
        );

        // 2. Static analysis (a syntax error stops the request)
        let clock = Instant::now();
        let signal = self
            .analyzer
            .analyze(submission.source_code(), language)
            .at_stage(Stage::StaticAnalysis)?;
        timings.record(Stage::StaticAnalysis, clock);

        // 3. Scheduling
        let clock = Instant::now();
        let schedule = self
            .scheduler
            .generate(normalized.max_input_size, normalized.sample_count);
        timings.record(Stage::Scheduling, clock);

        // 4. Profiling
        let clock = Instant::now();
        let samples: Vec<Measurement> = if schedule.is_sufficient() {
            let series = self
                .collector
                .collect(
                    self.sandbox.runtime(language),
                    submission.source_code(),
                    &schedule,
                )
                .await
                .at_stage(Stage::Profiling)?;
            if let Some(notice) = self.sandbox.confinement_notice() {
                notices.push(notice);
            }
            if series.timed_out_runs > 0 {
                let notice = format!(
                    "{} run(s) hit the per-run timeout of {}ms and were recorded as 0ms",
                    series.timed_out_runs,
                    self.sandbox.per_run_timeout().as_millis()
                );
                warn!("[{}] {}", session_id, notice);
                notices.push(notice);
            }
            series.measurements
        } else {
            let notice = format!(
                "Schedule has {} size(s) between {} and {}; profiling skipped",
                schedule.len(),
                self.scheduler.min_input_size(),
                normalized.max_input_size
            );
            warn!("[{}] {}", session_id, notice);
            notices.push(notice);
            Vec::new()
        };
        timings.record(Stage::Profiling, clock);

        // 5. Model fitting
        let clock = Instant::now();
        let fit = match self.fitter.fit(&samples) {
            Ok(fit) => fit,
            Err(AnalysisError::InsufficientData { got, required }) => {
                let notice = format!(
                    "Insufficient data: {} measurement(s), {} required; falling back to {}",
                    got, required, self.fallback_model
                );
                warn!("[{}] {}", session_id, notice);
                notices.push(notice);
                FitResult::fallback(self.fallback_model, samples.len())
            }
            Err(e) => return Err(PipelineError::new(Stage::ModelFitting, e)),
        };
        timings.record(Stage::ModelFitting, clock);

        // 6. Reconciliation
        let clock = Instant::now();
        let verdict = self.reconciler.reconcile(&fit, &signal);
        timings.record(Stage::Reconciliation, clock);

        info!(
            "[{}] Verdict: {} ({}%), empirical {} ({}%), static {} ({}%)",
            session_id,
            verdict.complexity,
            verdict.confidence,
            fit.model,
            fit.confidence,
            signal.detected,
            signal.confidence
        );

        Ok(AnalysisReport {
            session_id,
            generated_at: Utc::now(),
            language,
            verdict,
            samples,
            notices,
            stage_timings_ms: timings.into_inner(),
        })
    }
}

impl Default for AnalysisPipeline {
    fn default() -> Self {
        Self::new(ValidatedConfig::default())
    }
}

#[derive(Default)]
struct StageTimings(BTreeMap<String, u64>);

impl StageTimings {
    fn record(&mut self, stage: Stage, started: Instant) {
        self.0
            .insert(stage.as_str().to_string(), started.elapsed().as_millis() as u64);
    }

    fn into_inner(self) -> BTreeMap<String, u64> {
        self.0
    }
}
