//! Section-specific configuration types
//!
//! Each pipeline component has its own configuration struct with validation.

use std::path::PathBuf;

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use super::validation::Validatable;
use crate::shared::models::ComplexityClass;
use serde::{Deserialize, Serialize};

// ============================================================================
// Sampling (SampleScheduler + request clamping)
// ============================================================================

/// Sample-size scheduling and request clamping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SamplingConfig {
    /// Smallest input size profiled (1..=1000)
    pub min_input_size: u64,

    /// Interpolation exponent, > 1 packs sizes toward the upper bound (1.0 exclusive ..= 4.0)
    pub spacing_exponent: f64,

    /// Hard cap on the requested max input size; larger requests are clamped
    pub max_input_cap: u64,

    /// Requested sample counts below this are raised to it
    pub sample_count_floor: usize,

    /// Requested sample counts above this are lowered to it
    pub sample_count_cap: usize,
}

impl SamplingConfig {
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Fast | Preset::Balanced => Self {
                min_input_size: 10,
                spacing_exponent: 1.5,
                max_input_cap: 1000,
                sample_count_floor: 25,
                sample_count_cap: 100,
            },
            Preset::Thorough => Self {
                min_input_size: 10,
                spacing_exponent: 1.5,
                max_input_cap: 1000,
                sample_count_floor: 40,
                sample_count_cap: 200,
            },
        }
    }

    pub fn min_input_size(mut self, value: u64) -> Self {
        self.min_input_size = value;
        self
    }

    pub fn spacing_exponent(mut self, value: f64) -> Self {
        self.spacing_exponent = value;
        self
    }

    pub fn max_input_cap(mut self, value: u64) -> Self {
        self.max_input_cap = value;
        self
    }

    pub fn sample_count_floor(mut self, value: usize) -> Self {
        self.sample_count_floor = value;
        self
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self::from_preset(Preset::default())
    }
}

impl Validatable for SamplingConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.min_input_size == 0 || self.min_input_size > 1000 {
            return Err(ConfigError::range_with_hint(
                "sampling.min_input_size",
                self.min_input_size,
                1,
                1000,
                "Input sizes must be positive",
            ));
        }
        if !(self.spacing_exponent > 1.0 && self.spacing_exponent <= 4.0) {
            return Err(ConfigError::range_with_hint(
                "sampling.spacing_exponent",
                self.spacing_exponent,
                "1.0 (exclusive)",
                4.0,
                "A super-linear exponent is required to favour large sizes",
            ));
        }
        if self.max_input_cap < self.min_input_size || self.max_input_cap > 1_000_000 {
            return Err(ConfigError::range_with_hint(
                "sampling.max_input_cap",
                self.max_input_cap,
                self.min_input_size,
                1_000_000,
                "The cap must not be below the minimum input size",
            ));
        }
        if self.sample_count_floor < 2 || self.sample_count_floor > self.sample_count_cap {
            return Err(ConfigError::range_with_hint(
                "sampling.sample_count_floor",
                self.sample_count_floor,
                2,
                self.sample_count_cap,
                "A curve needs at least two sizes",
            ));
        }
        if self.sample_count_cap > 1000 {
            return Err(ConfigError::range_with_hint(
                "sampling.sample_count_cap",
                self.sample_count_cap,
                self.sample_count_floor,
                1000,
                "Every sample is at least one process launch",
            ));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "sampling"
    }
}

// ============================================================================
// Sandbox (ExecutionSandbox)
// ============================================================================

/// Toolchains, limits and confinement of harness execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SandboxConfig {
    /// Python interpreter executable
    pub python_interpreter: String,

    /// C++ compiler executable
    pub cpp_compiler: String,

    /// Extra compiler flags
    pub cpp_flags: Vec<String>,

    /// Entry point called with `n` when the submission defines it
    pub entry_point: String,

    /// Per-run timeout in milliseconds (1..=600000)
    pub per_run_timeout_ms: u64,

    /// Compile timeout in milliseconds (1..=600000)
    pub compile_timeout_ms: u64,

    /// Parent directory for scratch directories (system temp dir when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scratch_dir: Option<PathBuf>,

    /// Filesystem and process confinement for executions
    pub confinement: Confinement,

    /// Command prefix for confinement, e.g. ["unshare", "-rn"]; used in
    /// place of bubblewrap when set and confinement is `auto`
    pub wrapper: Vec<String>,

    /// Captured stdout/stderr limit per stream in bytes
    pub max_output_bytes: usize,
}

impl SandboxConfig {
    pub fn from_preset(preset: Preset) -> Self {
        let (per_run_timeout_ms, compile_timeout_ms) = match preset {
            Preset::Fast => (1_000, 20_000),
            Preset::Balanced => (2_000, 30_000),
            Preset::Thorough => (5_000, 60_000),
        };
        Self {
            python_interpreter: "python3".to_string(),
            cpp_compiler: "g++".to_string(),
            cpp_flags: vec!["-O2".to_string(), "-std=c++17".to_string()],
            entry_point: "solve".to_string(),
            per_run_timeout_ms,
            compile_timeout_ms,
            scratch_dir: None,
            confinement: Confinement::Auto,
            wrapper: Vec::new(),
            max_output_bytes: 64 * 1024,
        }
    }

    pub fn per_run_timeout_ms(mut self, value: u64) -> Self {
        self.per_run_timeout_ms = value;
        self
    }

    pub fn compile_timeout_ms(mut self, value: u64) -> Self {
        self.compile_timeout_ms = value;
        self
    }

    pub fn python_interpreter(mut self, value: impl Into<String>) -> Self {
        self.python_interpreter = value.into();
        self
    }

    pub fn cpp_compiler(mut self, value: impl Into<String>) -> Self {
        self.cpp_compiler = value.into();
        self
    }

    pub fn entry_point(mut self, value: impl Into<String>) -> Self {
        self.entry_point = value.into();
        self
    }

    pub fn scratch_dir(mut self, value: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(value.into());
        self
    }

    pub fn wrapper(mut self, value: Vec<String>) -> Self {
        self.wrapper = value;
        self
    }

    pub fn confinement(mut self, value: Confinement) -> Self {
        self.confinement = value;
        self
    }
}

/// How executions are confined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confinement {
    /// The wrapper when set, else bubblewrap when it works on this host,
    /// else unconfined with a warning
    #[default]
    Auto,
    /// Always bubblewrap; runs fail when it is unavailable
    Bubblewrap,
    /// No confinement beyond the cleared environment
    Off,
}

impl Confinement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Bubblewrap => "bubblewrap",
            Self::Off => "off",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "bubblewrap" | "bwrap" => Ok(Self::Bubblewrap),
            "off" | "none" => Ok(Self::Off),
            _ => Err(format!(
                "Unknown confinement '{}' (expected auto, bubblewrap or off)",
                s
            )),
        }
    }
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self::from_preset(Preset::default())
    }
}

impl Validatable for SandboxConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.per_run_timeout_ms == 0 || self.per_run_timeout_ms > 600_000 {
            return Err(ConfigError::range_with_hint(
                "sandbox.per_run_timeout_ms",
                self.per_run_timeout_ms,
                1,
                600_000,
                "Every run must be time-bounded",
            ));
        }
        if self.compile_timeout_ms == 0 || self.compile_timeout_ms > 600_000 {
            return Err(ConfigError::range_with_hint(
                "sandbox.compile_timeout_ms",
                self.compile_timeout_ms,
                1,
                600_000,
                "The compiler must be time-bounded",
            ));
        }
        if self.python_interpreter.trim().is_empty() || self.cpp_compiler.trim().is_empty() {
            return Err(ConfigError::Custom(
                "sandbox toolchain executables must not be empty".to_string(),
            ));
        }
        let valid_entry = self
            .entry_point
            .chars()
            .next()
            .map_or(false, |c| c.is_ascii_alphabetic() || c == '_')
            && self
                .entry_point
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid_entry {
            return Err(ConfigError::invalid_value(
                "sandbox.entry_point",
                self.entry_point.clone(),
                "must be a plain identifier",
            ));
        }
        if self.max_output_bytes < 64 {
            return Err(ConfigError::range_with_hint(
                "sandbox.max_output_bytes",
                self.max_output_bytes,
                64,
                usize::MAX,
                "The timing line must fit in the captured output",
            ));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "sandbox"
    }
}

// ============================================================================
// Profiling (ProfileCollector)
// ============================================================================

/// Repetitions and session budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfilingConfig {
    /// Runs averaged per input size (1..=50)
    pub runs_per_size: usize,

    /// Wall-clock budget of the whole profiling session in milliseconds
    pub session_budget_ms: u64,
}

impl ProfilingConfig {
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Fast => Self {
                runs_per_size: 1,
                session_budget_ms: 20_000,
            },
            Preset::Balanced => Self {
                runs_per_size: 3,
                session_budget_ms: 60_000,
            },
            Preset::Thorough => Self {
                runs_per_size: 5,
                session_budget_ms: 180_000,
            },
        }
    }

    pub fn runs_per_size(mut self, value: usize) -> Self {
        self.runs_per_size = value;
        self
    }

    pub fn session_budget_ms(mut self, value: u64) -> Self {
        self.session_budget_ms = value;
        self
    }
}

impl Default for ProfilingConfig {
    fn default() -> Self {
        Self::from_preset(Preset::default())
    }
}

impl Validatable for ProfilingConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.runs_per_size == 0 || self.runs_per_size > 50 {
            return Err(ConfigError::range_with_hint(
                "profiling.runs_per_size",
                self.runs_per_size,
                1,
                50,
                "At least one run per input size is required",
            ));
        }
        if self.session_budget_ms == 0 || self.session_budget_ms > 3_600_000 {
            return Err(ConfigError::range_with_hint(
                "profiling.session_budget_ms",
                self.session_budget_ms,
                1,
                3_600_000,
                "The session budget bounds request latency",
            ));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "profiling"
    }
}

// ============================================================================
// Fitting (ModelFitter)
// ============================================================================

/// Curve fitting settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FittingConfig {
    /// Measurements required before fitting (2..=1000)
    pub min_measurements: usize,

    /// Exponent cap of the exponential model, 2^min(n, cap)
    pub exponential_cap: f64,

    /// Model reported when there is too little data to fit
    pub fallback_model: ComplexityClass,
}

impl FittingConfig {
    pub fn from_preset(_preset: Preset) -> Self {
        Self {
            min_measurements: 10,
            exponential_cap: 50.0,
            fallback_model: ComplexityClass::Linear,
        }
    }

    pub fn min_measurements(mut self, value: usize) -> Self {
        self.min_measurements = value;
        self
    }
}

impl Default for FittingConfig {
    fn default() -> Self {
        Self::from_preset(Preset::default())
    }
}

impl Validatable for FittingConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.min_measurements < 2 || self.min_measurements > 1000 {
            return Err(ConfigError::range_with_hint(
                "fitting.min_measurements",
                self.min_measurements,
                2,
                1000,
                "A scale factor needs at least two points to be judged",
            ));
        }
        if !(self.exponential_cap >= 1.0 && self.exponential_cap <= 500.0) {
            return Err(ConfigError::range_with_hint(
                "fitting.exponential_cap",
                self.exponential_cap,
                1.0,
                500.0,
                "2^cap squared must stay finite",
            ));
        }
        if !self.fallback_model.is_conclusive() {
            return Err(ConfigError::invalid_value(
                "fitting.fallback_model",
                self.fallback_model.name(),
                "must be one of the canonical models",
            ));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "fitting"
    }
}

// ============================================================================
// Reconciliation (VerdictReconciler)
// ============================================================================

/// Thresholds used to merge the two estimates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconcileConfig {
    /// Weight of the empirical confidence when both agree (0.0..=1.0)
    pub empirical_weight: f64,

    /// Confidence at which one side overrides the other
    pub strong_threshold: u8,

    /// Confidence at which a disagreement is reported as inconclusive
    pub moderate_threshold: u8,
}

impl ReconcileConfig {
    pub fn from_preset(_preset: Preset) -> Self {
        Self {
            empirical_weight: 0.6,
            strong_threshold: 85,
            moderate_threshold: 60,
        }
    }
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self::from_preset(Preset::default())
    }
}

impl Validatable for ReconcileConfig {
    fn validate(&self) -> ConfigResult<()> {
        if !(0.0..=1.0).contains(&self.empirical_weight) {
            return Err(ConfigError::range_with_hint(
                "reconcile.empirical_weight",
                self.empirical_weight,
                0.0,
                1.0,
                "Weights are fractions",
            ));
        }
        if self.strong_threshold > 100 {
            return Err(ConfigError::range_with_hint(
                "reconcile.strong_threshold",
                self.strong_threshold,
                self.moderate_threshold,
                100,
                "Confidences are percentages",
            ));
        }
        if self.moderate_threshold > self.strong_threshold {
            return Err(ConfigError::CrossSectionConflict {
                issue: format!(
                    "moderate_threshold {} is above strong_threshold {}",
                    self.moderate_threshold, self.strong_threshold
                ),
                fix: "Keep moderate_threshold <= strong_threshold".to_string(),
            });
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "reconcile"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        for preset in [Preset::Fast, Preset::Balanced, Preset::Thorough] {
            SamplingConfig::from_preset(preset).validate().unwrap();
            SandboxConfig::from_preset(preset).validate().unwrap();
            ProfilingConfig::from_preset(preset).validate().unwrap();
            FittingConfig::from_preset(preset).validate().unwrap();
            ReconcileConfig::from_preset(preset).validate().unwrap();
        }
    }

    #[test]
    fn test_balanced_defaults() {
        let sampling = SamplingConfig::default();
        assert_eq!(sampling.min_input_size, 10);
        assert_eq!(sampling.max_input_cap, 1000);
        assert_eq!(sampling.sample_count_floor, 25);

        let profiling = ProfilingConfig::default();
        assert_eq!(profiling.runs_per_size, 3);

        let fitting = FittingConfig::default();
        assert_eq!(fitting.min_measurements, 10);
    }

    #[test]
    fn test_linear_exponent_rejected() {
        let err = SamplingConfig::default()
            .spacing_exponent(1.0)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("spacing_exponent"));
    }

    #[test]
    fn test_zero_runs_rejected() {
        let err = ProfilingConfig::default()
            .runs_per_size(0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Range { .. }));
    }

    #[test]
    fn test_entry_point_must_be_identifier() {
        assert!(SandboxConfig::default().entry_point("main_2").validate().is_ok());
        assert!(SandboxConfig::default().entry_point("2main").validate().is_err());
        assert!(SandboxConfig::default().entry_point("a;b").validate().is_err());
    }

    #[test]
    fn test_inconclusive_fallback_rejected() {
        let mut fitting = FittingConfig::default();
        fitting.fallback_model = ComplexityClass::Inconclusive;
        assert!(fitting.validate().is_err());
    }

    #[test]
    fn test_threshold_conflict() {
        let mut reconcile = ReconcileConfig::default();
        reconcile.moderate_threshold = 90;
        let err = reconcile.validate().unwrap_err();
        assert!(matches!(err, ConfigError::CrossSectionConflict { .. }));
    }
}
