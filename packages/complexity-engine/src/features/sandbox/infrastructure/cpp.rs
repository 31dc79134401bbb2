//! C++ runtime
//!
//! `prepare` writes `harness.cpp` and compiles it once; executions run the
//! binary. Confinement applies to executions, not to the compiler.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::harness::cpp_harness;
use super::{create_scratch, elapsed_from_output, Confiner, ProcessRunner};
use crate::config::SandboxConfig;
use crate::errors::{AnalysisError, Result};
use crate::features::sandbox::domain::PreparedRun;
use crate::features::sandbox::ports::LanguageRuntime;
use crate::shared::models::Language;

const SOURCE_FILE: &str = "harness.cpp";
const BINARY_FILE: &str = "harness";

#[derive(Debug, Clone)]
pub struct CppRuntime {
    compiler: String,
    flags: Vec<String>,
    entry_point: String,
    compile_timeout: Duration,
    scratch_root: Option<PathBuf>,
    runner: ProcessRunner,
}

impl CppRuntime {
    pub fn new(config: &SandboxConfig) -> Self {
        Self {
            compiler: config.cpp_compiler.clone(),
            flags: config.cpp_flags.clone(),
            entry_point: config.entry_point.clone(),
            compile_timeout: Duration::from_millis(config.compile_timeout_ms),
            scratch_root: config.scratch_dir.clone(),
            runner: ProcessRunner::new(Confiner::resolve(config), config.max_output_bytes),
        }
    }

    fn compile_args(&self) -> Vec<String> {
        let mut args = self.flags.clone();
        args.extend(
            ["-o", BINARY_FILE, SOURCE_FILE]
                .iter()
                .map(|s| s.to_string()),
        );
        args
    }
}

#[async_trait]
impl LanguageRuntime for CppRuntime {
    fn language(&self) -> Language {
        Language::Cpp
    }

    async fn prepare(&self, source_code: &str, n: u64) -> Result<PreparedRun> {
        let scratch = create_scratch(self.scratch_root.as_deref(), "complexity-cpp-")?;
        let dir = scratch.path();
        tokio::fs::write(
            dir.join(SOURCE_FILE),
            cpp_harness(source_code, n, &self.entry_point),
        )
        .await?;

        let compiled = self
            .runner
            .run(
                Path::new(&self.compiler),
                &self.compile_args(),
                dir,
                self.compile_timeout,
                false,
            )
            .await;

        let output = match compiled {
            Ok(output) => output,
            Err(AnalysisError::ExecutionTimeout { timeout_ms }) => {
                warn!("Compiler timed out after {}ms", timeout_ms);
                return Err(AnalysisError::Compile {
                    diagnostic: format!("compiler timed out after {}ms", timeout_ms),
                });
            }
            Err(e) => return Err(e),
        };

        if !output.success() {
            return Err(AnalysisError::Compile {
                diagnostic: output.stderr.trim_end().to_string(),
            });
        }
        debug!(
            "Compiled C++ harness for n={} in {:?}",
            n, output.wall_time
        );

        let binary = dir.join(BINARY_FILE);
        Ok(PreparedRun::new(scratch, Language::Cpp, n, binary, Vec::new()))
    }

    async fn execute(&self, run: &PreparedRun, timeout: Duration) -> Result<f64> {
        let output = self
            .runner
            .run(run.program(), run.args(), run.scratch_path(), timeout, true)
            .await?;
        elapsed_from_output(&output)
    }
}
