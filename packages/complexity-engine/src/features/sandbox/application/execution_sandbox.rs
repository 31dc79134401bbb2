//! Execution sandbox
//!
//! Selects the runtime for a submission's language and offers a one-shot
//! prepare → execute → cleanup helper.

use std::time::Duration;

use tracing::{debug, warn};

use crate::config::{Confinement, SandboxConfig};
use crate::errors::Result;
use crate::features::sandbox::infrastructure::{CppRuntime, PythonRuntime};
use crate::features::sandbox::ports::LanguageRuntime;
use crate::shared::models::Language;

#[derive(Debug, Clone)]
pub struct ExecutionSandbox {
    python: PythonRuntime,
    cpp: CppRuntime,
    per_run_timeout: Duration,
    confinement: Confinement,
}

impl ExecutionSandbox {
    pub fn new(config: &SandboxConfig) -> Self {
        let sandbox = Self {
            python: PythonRuntime::new(config),
            cpp: CppRuntime::new(config),
            per_run_timeout: Duration::from_millis(config.per_run_timeout_ms),
            confinement: config.confinement,
        };
        match sandbox.confinement_notice() {
            Some(notice) => warn!("{}", notice),
            None => debug!("Executions confined by {}", sandbox.python.confiner().describe()),
        }
        sandbox
    }

    pub fn is_confined(&self) -> bool {
        self.python.confiner().is_confined()
    }

    /// Report notice for executions that run without filesystem confinement
    pub fn confinement_notice(&self) -> Option<String> {
        if self.is_confined() {
            return None;
        }
        let cause = match self.confinement {
            Confinement::Off => "sandbox.confinement is off",
            _ => "bubblewrap is unavailable and no wrapper is set",
        };
        Some(format!("Runs were not filesystem-confined: {}", cause))
    }

    /// Runtime for `language`
    pub fn runtime(&self, language: Language) -> &dyn LanguageRuntime {
        match language {
            Language::Python => &self.python,
            Language::Cpp => &self.cpp,
        }
    }

    pub fn per_run_timeout(&self) -> Duration {
        self.per_run_timeout
    }

    /// Prepare, execute once and clean up
    ///
    /// The scratch directory is removed whether or not the run succeeds.
    pub async fn run_once(&self, source_code: &str, language: Language, n: u64) -> Result<f64> {
        let runtime = self.runtime(language);
        let prepared = runtime.prepare(source_code, n).await?;
        let outcome = runtime.execute(&prepared, self.per_run_timeout).await;
        runtime.cleanup(prepared)?;
        outcome
    }
}

impl Default for ExecutionSandbox {
    fn default() -> Self {
        Self::new(&SandboxConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_selection() {
        let sandbox = ExecutionSandbox::default();
        assert_eq!(sandbox.runtime(Language::Python).language(), Language::Python);
        assert_eq!(sandbox.runtime(Language::Cpp).language(), Language::Cpp);
        assert_eq!(sandbox.per_run_timeout(), Duration::from_millis(2_000));
    }

    #[test]
    fn test_confinement_notice() {
        let off = ExecutionSandbox::new(&SandboxConfig::default().confinement(Confinement::Off));
        assert!(!off.is_confined());
        assert_eq!(
            off.confinement_notice().as_deref(),
            Some("Runs were not filesystem-confined: sandbox.confinement is off")
        );

        let wrapped = ExecutionSandbox::new(
            &SandboxConfig::default().wrapper(vec!["unshare".into(), "-rn".into()]),
        );
        assert!(wrapped.is_confined());
        assert_eq!(wrapped.confinement_notice(), None);

        let forced =
            ExecutionSandbox::new(&SandboxConfig::default().confinement(Confinement::Bubblewrap));
        assert_eq!(forced.confinement_notice(), None);
    }
}
