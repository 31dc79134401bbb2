//! Profiling
//!
//! Drives a language runtime across a sample schedule and produces the
//! measurement series the model fitter consumes.

pub mod collector;

pub use collector::{ProfileCollector, ProfileSeries};
