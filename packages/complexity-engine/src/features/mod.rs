//! Feature modules (vertical slices)
//!
//! Empirical path: sampling → sandbox → profiling → model_fitting
//! Static path: cost_analysis
//! Merge: reconciliation

pub mod cost_analysis;
pub mod model_fitting;
pub mod profiling;
pub mod reconciliation;
pub mod sampling;
pub mod sandbox;
