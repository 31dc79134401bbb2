/*
 * Complexity Engine - Hybrid Time-Complexity Inference
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Common models (ComplexityClass, Language, Submission)
 * - features/    : Vertical slices (sampling → sandbox → profiling → fitting,
 *                  cost_analysis, reconciliation)
 * - pipeline/    : Request orchestration
 * - config/      : Preset/YAML/env configuration
 *
 * Two independent estimators:
 * - Empirical: run the submission at growing n, fit canonical growth models
 * - Static: heuristic loop/recursion pattern matching on the source text
 */

#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::should_implement_trait)] // from_str naming intentional

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models and utilities
pub mod shared;

/// Feature modules (scheduler, sandbox, profiler, fitter, static analyzer, reconciler)
pub mod features;

/// Request orchestration
pub mod pipeline;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use errors::{AnalysisError, ErrorKind, PipelineError, Result, Stage};
pub use features::cost_analysis::{StaticAnalyzer, StaticSignal};
pub use features::model_fitting::{FitResult, ModelFitter};
pub use features::reconciliation::{Verdict, VerdictReconciler};
pub use pipeline::{AnalysisPipeline, AnalysisReport, AnalysisRequest};
pub use shared::models::{ComplexityClass, Language, Measurement, Submission};
