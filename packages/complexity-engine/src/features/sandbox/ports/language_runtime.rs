//! Language runtime port
//!
//! One implementation per supported language. The profiler drives any
//! implementation through this trait, which keeps it testable with fakes.

use std::time::Duration;

use async_trait::async_trait;

use crate::errors::Result;
use crate::features::sandbox::domain::PreparedRun;
use crate::shared::models::Language;

#[async_trait]
pub trait LanguageRuntime: Send + Sync {
    /// Language this runtime executes
    fn language(&self) -> Language;

    /// Write the harness for `n` into a fresh scratch directory and compile it
    /// when the language needs it
    ///
    /// Fails with `Compile` carrying the compiler diagnostic.
    async fn prepare(&self, source_code: &str, n: u64) -> Result<PreparedRun>;

    /// Run a prepared harness once and return the elapsed milliseconds it reports
    ///
    /// Fails with `ExecutionTimeout` when the run is killed at `timeout`, and
    /// with `ExecutionFailed` on a non-zero exit or unparseable output.
    async fn execute(&self, run: &PreparedRun, timeout: Duration) -> Result<f64>;

    /// Remove the scratch directory
    fn cleanup(&self, run: PreparedRun) -> Result<()> {
        run.cleanup()
    }
}
