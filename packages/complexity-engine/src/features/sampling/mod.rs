//! Sample-size scheduling
//!
//! Produces the input sizes the profiler runs a submission at. Sizes are
//! packed toward the upper bound, where growth curves separate best.

pub mod scheduler;

pub use scheduler::{SampleSchedule, SampleScheduler};
