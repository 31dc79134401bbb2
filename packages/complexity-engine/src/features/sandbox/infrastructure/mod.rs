//! Sandbox infrastructure

pub mod confinement;
pub mod cpp;
pub mod harness;
pub mod process;
pub mod python;

pub use confinement::Confiner;
pub use cpp::CppRuntime;
pub use process::{parse_elapsed_ms, ProcessOutput, ProcessRunner};
pub use python::PythonRuntime;

use std::path::Path;

use tempfile::TempDir;

use crate::errors::{AnalysisError, Result};

/// Create a uniquely named scratch directory under `root` (system temp dir when unset)
pub(crate) fn create_scratch(root: Option<&Path>, prefix: &str) -> Result<TempDir> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(prefix);
    let dir = match root {
        Some(root) => {
            std::fs::create_dir_all(root)?;
            builder.tempdir_in(root)?
        }
        None => builder.tempdir()?,
    };
    Ok(dir)
}

/// Turn a finished harness run into its reported timing
pub(crate) fn elapsed_from_output(output: &ProcessOutput) -> Result<f64> {
    if !output.success() {
        return Err(AnalysisError::execution_failed(format!(
            "{}\n{}",
            output.status_line(),
            output.stderr.trim_end()
        )));
    }
    parse_elapsed_ms(&output.stdout).ok_or_else(|| {
        AnalysisError::execution_failed(format!(
            "no timing line in program output\n{}",
            output.stderr.trim_end()
        ))
    })
}
