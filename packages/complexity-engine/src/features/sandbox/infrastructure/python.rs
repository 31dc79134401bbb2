//! Python runtime
//!
//! Interpreted: `prepare` only writes `harness.py`; every execution starts
//! the interpreter in isolated mode (`-I`: no user site, no PYTHON* env vars,
//! script directory not on `sys.path`).

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::harness::python_harness;
use super::{create_scratch, elapsed_from_output, Confiner, ProcessRunner};
use crate::config::SandboxConfig;
use crate::errors::Result;
use crate::features::sandbox::domain::PreparedRun;
use crate::features::sandbox::ports::LanguageRuntime;
use crate::shared::models::Language;

const HARNESS_FILE: &str = "harness.py";

#[derive(Debug, Clone)]
pub struct PythonRuntime {
    interpreter: String,
    entry_point: String,
    scratch_root: Option<PathBuf>,
    runner: ProcessRunner,
}

impl PythonRuntime {
    pub fn new(config: &SandboxConfig) -> Self {
        Self {
            interpreter: config.python_interpreter.clone(),
            entry_point: config.entry_point.clone(),
            scratch_root: config.scratch_dir.clone(),
            runner: ProcessRunner::new(Confiner::resolve(config), config.max_output_bytes),
        }
    }

    pub fn confiner(&self) -> &Confiner {
        self.runner.confiner()
    }
}

#[async_trait]
impl LanguageRuntime for PythonRuntime {
    fn language(&self) -> Language {
        Language::Python
    }

    async fn prepare(&self, source_code: &str, n: u64) -> Result<PreparedRun> {
        let scratch = create_scratch(self.scratch_root.as_deref(), "complexity-py-")?;
        let script = scratch.path().join(HARNESS_FILE);
        tokio::fs::write(&script, python_harness(source_code, n, &self.entry_point)).await?;
        debug!("Prepared python harness for n={} in {}", n, scratch.path().display());

        Ok(PreparedRun::new(
            scratch,
            Language::Python,
            n,
            &self.interpreter,
            vec!["-I".to_string(), script.to_string_lossy().into_owned()],
        ))
    }

    async fn execute(&self, run: &PreparedRun, timeout: Duration) -> Result<f64> {
        let output = self
            .runner
            .run(run.program(), run.args(), run.scratch_path(), timeout, true)
            .await?;
        elapsed_from_output(&output)
    }
}
