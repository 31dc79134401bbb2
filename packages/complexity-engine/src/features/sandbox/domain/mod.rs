//! Sandbox domain models

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::errors::Result;
use crate::shared::models::Language;

/// A harness ready to run at one input size
///
/// Owns the scratch directory; dropping the value removes it, so every exit
/// path (success, compile failure, runtime failure, timeout) cleans up.
#[derive(Debug)]
pub struct PreparedRun {
    scratch: TempDir,
    language: Language,
    n: u64,
    program: PathBuf,
    args: Vec<String>,
}

impl PreparedRun {
    pub fn new(
        scratch: TempDir,
        language: Language,
        n: u64,
        program: impl Into<PathBuf>,
        args: Vec<String>,
    ) -> Self {
        Self {
            scratch,
            language,
            n,
            program: program.into(),
            args,
        }
    }

    pub fn scratch_path(&self) -> &Path {
        self.scratch.path()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn n(&self) -> u64 {
        self.n
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Remove the scratch directory, reporting removal errors
    pub fn cleanup(self) -> Result<()> {
        let path = self.scratch.path().to_path_buf();
        self.scratch.close()?;
        tracing::trace!("Removed scratch directory {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_removes_scratch() {
        let root = tempfile::tempdir().unwrap();
        let scratch = tempfile::Builder::new()
            .prefix("run-")
            .tempdir_in(root.path())
            .unwrap();
        let run = PreparedRun::new(scratch, Language::Python, 10, "python3", vec![]);
        let path = run.scratch_path().to_path_buf();
        assert!(path.exists());

        run.cleanup().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_drop_removes_scratch() {
        let root = tempfile::tempdir().unwrap();
        let scratch = tempfile::Builder::new()
            .prefix("run-")
            .tempdir_in(root.path())
            .unwrap();
        let path = {
            let run = PreparedRun::new(scratch, Language::Cpp, 10, "./harness", vec![]);
            run.scratch_path().to_path_buf()
        };
        assert!(!path.exists());
    }
}
