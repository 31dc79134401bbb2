//! Request orchestration
//!
//! validation → static_analysis → scheduling → profiling → model_fitting →
//! reconciliation. A syntax error stops the request before anything runs.

pub mod analysis_pipeline;
pub mod report;
pub mod request;

pub use analysis_pipeline::AnalysisPipeline;
pub use report::AnalysisReport;
pub use request::{AnalysisRequest, NormalizedRequest};
