//! Error types for complexity-engine
//!
//! Provides unified error handling across the crate. Domain failures are
//! `AnalysisError`; at the request boundary they are wrapped in a
//! `PipelineError` that names the stage which produced them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;

/// Main error type for analysis operations
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Request rejected before any work (zero input size, zero samples)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Language outside {python, cpp}
    #[error("Unsupported language '{0}'. Supported languages: python, cpp")]
    UnsupportedLanguage(String),

    /// Source failed the syntax sanity check
    #[error("Syntax error: {0}")]
    Syntax(String),

    /// Compiler rejected the harness
    #[error("Compile error:\n{diagnostic}")]
    Compile { diagnostic: String },

    /// One execution exceeded the per-run timeout
    #[error("Execution timed out after {timeout_ms}ms")]
    ExecutionTimeout { timeout_ms: u64 },

    /// Whole profiling session exceeded its wall-clock budget
    #[error("Profiling budget of {budget_ms}ms exceeded after {elapsed_ms}ms (n={n})")]
    BudgetExceeded {
        budget_ms: u64,
        elapsed_ms: u64,
        n: u64,
    },

    /// Program crashed, exited non-zero or printed no timing
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    /// Too few measurements to fit
    #[error("Insufficient data: {got} measurement(s), at least {required} required")]
    InsufficientData { got: usize, required: usize },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Machine-readable error kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidRequest,
    UnsupportedLanguage,
    SyntaxError,
    CompileError,
    ExecutionTimeout,
    BudgetExceeded,
    ExecutionFailed,
    InsufficientData,
    Io,
    Config,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::UnsupportedLanguage => "unsupported_language",
            Self::SyntaxError => "syntax_error",
            Self::CompileError => "compile_error",
            Self::ExecutionTimeout => "execution_timeout",
            Self::BudgetExceeded => "budget_exceeded",
            Self::ExecutionFailed => "execution_failed",
            Self::InsufficientData => "insufficient_data",
            Self::Io => "io",
            Self::Config => "config",
        }
    }
}

impl AnalysisError {
    /// Create a syntax error
    pub fn syntax(msg: impl Into<String>) -> Self {
        AnalysisError::Syntax(msg.into())
    }

    /// Create an execution failure
    pub fn execution_failed(msg: impl Into<String>) -> Self {
        AnalysisError::ExecutionFailed(msg.into())
    }

    /// Create an invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        AnalysisError::InvalidRequest(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::UnsupportedLanguage(_) => ErrorKind::UnsupportedLanguage,
            Self::Syntax(_) => ErrorKind::SyntaxError,
            Self::Compile { .. } => ErrorKind::CompileError,
            Self::ExecutionTimeout { .. } => ErrorKind::ExecutionTimeout,
            Self::BudgetExceeded { .. } => ErrorKind::BudgetExceeded,
            Self::ExecutionFailed(_) => ErrorKind::ExecutionFailed,
            Self::InsufficientData { .. } => ErrorKind::InsufficientData,
            Self::Io(_) => ErrorKind::Io,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Recoverable at single-run granularity (the profiler degrades the sample)
    pub fn is_run_recoverable(&self) -> bool {
        matches!(self, Self::ExecutionTimeout { .. })
    }
}

/// Pipeline stage that produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Validation,
    StaticAnalysis,
    Scheduling,
    Profiling,
    ModelFitting,
    Reconciliation,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::StaticAnalysis => "static_analysis",
            Self::Scheduling => "scheduling",
            Self::Profiling => "profiling",
            Self::ModelFitting => "model_fitting",
            Self::Reconciliation => "reconciliation",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error surfaced at the request boundary
#[derive(Debug, Error)]
#[error("{stage} stage failed: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: AnalysisError,
}

impl PipelineError {
    pub fn new(stage: Stage, source: AnalysisError) -> Self {
        Self { stage, source }
    }

    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }
}

/// Extension for tagging a result with its stage
pub trait StageContext<T> {
    fn at_stage(self, stage: Stage) -> std::result::Result<T, PipelineError>;
}

impl<T> StageContext<T> for std::result::Result<T, AnalysisError> {
    fn at_stage(self, stage: Stage) -> std::result::Result<T, PipelineError> {
        self.map_err(|e| PipelineError::new(stage, e))
    }
}

/// Result type alias for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            AnalysisError::UnsupportedLanguage("java".into()).kind(),
            ErrorKind::UnsupportedLanguage
        );
        assert_eq!(
            AnalysisError::BudgetExceeded {
                budget_ms: 10,
                elapsed_ms: 12,
                n: 500
            }
            .kind(),
            ErrorKind::BudgetExceeded
        );
        assert_ne!(
            AnalysisError::ExecutionTimeout { timeout_ms: 5 }.kind(),
            ErrorKind::BudgetExceeded
        );
    }

    #[test]
    fn test_only_timeout_is_run_recoverable() {
        assert!(AnalysisError::ExecutionTimeout { timeout_ms: 5 }.is_run_recoverable());
        assert!(!AnalysisError::Compile {
            diagnostic: "x".into()
        }
        .is_run_recoverable());
        assert!(!AnalysisError::BudgetExceeded {
            budget_ms: 1,
            elapsed_ms: 2,
            n: 3
        }
        .is_run_recoverable());
    }

    #[test]
    fn test_pipeline_error_names_stage() {
        let err: std::result::Result<(), _> =
            Err(AnalysisError::syntax("line 2: unexpected indent"));
        let err = err.at_stage(Stage::StaticAnalysis).unwrap_err();

        assert_eq!(err.stage, Stage::StaticAnalysis);
        assert_eq!(err.kind(), ErrorKind::SyntaxError);
        let msg = err.to_string();
        assert!(msg.starts_with("static_analysis stage failed"));
        assert!(msg.contains("unexpected indent"));
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::BudgetExceeded).unwrap();
        assert_eq!(json, "\"budget_exceeded\"");
        assert_eq!(ErrorKind::CompileError.as_str(), "compile_error");
    }
}
