//! Integration tests for the analysis pipeline

mod common;

use complexity_engine::config::{AnalysisConfig, Preset};
use complexity_engine::{
    AnalysisPipeline, AnalysisRequest, ComplexityClass, ErrorKind, Language, Stage,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn fast_pipeline(root: &TempDir) -> AnalysisPipeline {
    let config = AnalysisConfig::preset(Preset::Fast)
        .sandbox(|c| c.scratch_dir(root.path()))
        .build()
        .unwrap();
    AnalysisPipeline::new(config)
}

#[tokio::test]
async fn test_python_quadratic_end_to_end() {
    if common::skip_without("python3") {
        return;
    }
    let root = TempDir::new().unwrap();
    let pipeline = fast_pipeline(&root);

    let report = pipeline
        .analyze(&AnalysisRequest::new(common::PY_QUADRATIC, "python", 200, 25))
        .await
        .unwrap();

    assert_eq!(report.language, Language::Python);
    assert_eq!(report.verdict.static_signal.detected, ComplexityClass::Quadratic);
    assert!(report.samples.len() >= 10);
    assert!(report.samples.windows(2).all(|w| w[0].n < w[1].n));
    assert!(report.samples.iter().all(|m| m.time_ms >= 0.0 && m.n <= 200));
    assert!(report.verdict.confidence <= 100);
    assert!(!report.verdict.reason.is_empty());
    assert!(!report.verdict.empirical.is_fallback());
    assert_eq!(report.stage_timings_ms.len(), 6);
    assert_eq!(common::entries(root.path()), 0);

    let json = report.to_json().unwrap();
    assert!(json.contains("\"static\""));
    assert!(json.contains(&report.session_id.to_string()));
}

#[tokio::test]
async fn test_cpp_quiz_snippet_end_to_end() {
    if common::skip_without("g++") {
        return;
    }
    // one compile per size, so the session gets room for 25 compiles
    let root = TempDir::new().unwrap();
    let config = AnalysisConfig::preset(Preset::Fast)
        .sandbox(|c| c.scratch_dir(root.path()))
        .profiling(|c| c.session_budget_ms(300_000))
        .build()
        .unwrap();
    let pipeline = AnalysisPipeline::new(config);

    let report = pipeline
        .analyze(&AnalysisRequest::new(common::CPP_PUSH_BACK, "cpp", 5000, 25))
        .await
        .unwrap();

    assert_eq!(report.language, Language::Cpp);
    assert_eq!(report.verdict.static_signal.detected, ComplexityClass::Linear);
    assert!(report.samples.len() >= 10);
    assert!(report.samples.iter().all(|m| m.time_ms >= 0.0 && m.n <= 5000));
    assert!(!report.verdict.empirical.is_fallback());
    assert!(!report.verdict.reason.is_empty());
    assert_eq!(common::entries(root.path()), 0);

    let report = pipeline
        .analyze(&AnalysisRequest::new(common::CPP_HELPER, "cpp", 2000, 25))
        .await
        .unwrap();
    assert!(!report.samples.is_empty());
    assert!(!report.verdict.empirical.is_fallback());
}

#[tokio::test]
async fn test_clamp_and_fallback_notices() {
    // max_n below the minimum input size: nothing runs, no toolchain needed
    let root = TempDir::new().unwrap();
    let pipeline = fast_pipeline(&root);

    let report = pipeline
        .analyze(&AnalysisRequest::new("x = n * 2\n", "python", 8, 3))
        .await
        .unwrap();

    assert_eq!(
        report.notices,
        vec![
            "sample_count 3 raised to the floor 25".to_string(),
            "Schedule has 0 size(s) between 10 and 8; profiling skipped".to_string(),
            "Insufficient data: 0 measurement(s), 10 required; falling back to O(n)".to_string(),
        ]
    );
    assert_eq!(report.verdict.empirical.confidence, 0);
    assert_eq!(report.verdict.empirical.normalized_error, 1.0);
    assert_eq!(report.verdict.complexity, ComplexityClass::Constant);
    assert!(report.samples.is_empty());
}

#[tokio::test]
async fn test_syntax_error_stops_before_profiling() {
    let root = TempDir::new().unwrap();
    let pipeline = fast_pipeline(&root);

    let err = pipeline
        .analyze(&AnalysisRequest::new("for (int i = 0; i < n; i++) {", "cpp", 100, 25))
        .await
        .unwrap_err();

    assert_eq!(err.stage, Stage::StaticAnalysis);
    assert_eq!(err.kind(), ErrorKind::SyntaxError);
    assert!(err.to_string().starts_with("static_analysis stage failed"));
    assert_eq!(common::entries(root.path()), 0);
}

#[tokio::test]
async fn test_invalid_requests() {
    let root = TempDir::new().unwrap();
    let pipeline = fast_pipeline(&root);

    let err = pipeline
        .analyze(&AnalysisRequest::new("x = 1", "python", 100, 0))
        .await
        .unwrap_err();
    assert_eq!((err.stage, err.kind()), (Stage::Validation, ErrorKind::InvalidRequest));

    let err = pipeline
        .analyze(&AnalysisRequest::new("x = 1", "rust", 100, 25))
        .await
        .unwrap_err();
    assert_eq!(
        (err.stage, err.kind()),
        (Stage::Validation, ErrorKind::UnsupportedLanguage)
    );
}

#[tokio::test]
async fn test_budget_exceeded_is_fatal() {
    if common::skip_without("python3") {
        return;
    }
    let root = TempDir::new().unwrap();
    let config = AnalysisConfig::preset(Preset::Fast)
        .sandbox(|c| c.scratch_dir(root.path()).per_run_timeout_ms(200))
        .profiling(|c| c.session_budget_ms(500))
        .build()
        .unwrap();
    let pipeline = AnalysisPipeline::new(config);

    let err = pipeline
        .analyze(&AnalysisRequest::new("import time\ntime.sleep(1)\n", "python", 100, 25))
        .await
        .unwrap_err();
    assert_eq!(err.stage, Stage::Profiling);
    assert_eq!(err.kind(), ErrorKind::BudgetExceeded);
    assert_eq!(common::entries(root.path()), 0);
}
