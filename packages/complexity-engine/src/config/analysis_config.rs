//! Analysis configuration
//!
//! Main configuration struct with preset-based defaults and override support.

use std::str::FromStr;

use super::{
    error::{ConfigError, ConfigResult},
    io::{ConfigExportV1, ConfigOverrides},
    preset::Preset,
    provenance::{ConfigProvenance, ConfigSource},
    section_configs::*,
    validation::Validatable,
};
use crate::shared::models::ComplexityClass;

/// Environment variable prefix (`COMPLEXITY__SECTION__FIELD`)
pub const ENV_PREFIX: &str = "COMPLEXITY__";

const SUPPORTED_VERSIONS: [u32; 1] = [1];

/// Analysis configuration (builder)
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Base preset
    pub(crate) preset: Preset,

    /// Section overrides
    pub(crate) sampling: Option<SamplingConfig>,
    pub(crate) sandbox: Option<SandboxConfig>,
    pub(crate) profiling: Option<ProfilingConfig>,
    pub(crate) fitting: Option<FittingConfig>,
    pub(crate) reconcile: Option<ReconcileConfig>,

    /// Provenance tracking (field-level)
    pub(crate) provenance: ConfigProvenance,
}

impl AnalysisConfig {
    /// Level 1: Create from preset
    pub fn preset(preset: Preset) -> Self {
        Self {
            preset,
            sampling: None,
            sandbox: None,
            profiling: None,
            fitting: None,
            reconcile: None,
            provenance: ConfigProvenance::from_preset(preset),
        }
    }

    /// Level 2: Override sampling section
    pub fn sampling<F>(mut self, f: F) -> Self
    where
        F: FnOnce(SamplingConfig) -> SamplingConfig,
    {
        let base = self.sampling_or_preset();
        self.sampling = Some(f(base));
        self.provenance.track_field("sampling.*", ConfigSource::Builder);
        self
    }

    /// Level 2: Override sandbox section
    pub fn sandbox<F>(mut self, f: F) -> Self
    where
        F: FnOnce(SandboxConfig) -> SandboxConfig,
    {
        let base = self.sandbox_or_preset();
        self.sandbox = Some(f(base));
        self.provenance.track_field("sandbox.*", ConfigSource::Builder);
        self
    }

    /// Level 2: Override profiling section
    pub fn profiling<F>(mut self, f: F) -> Self
    where
        F: FnOnce(ProfilingConfig) -> ProfilingConfig,
    {
        let base = self.profiling_or_preset();
        self.profiling = Some(f(base));
        self.provenance.track_field("profiling.*", ConfigSource::Builder);
        self
    }

    /// Level 2: Override fitting section
    pub fn fitting<F>(mut self, f: F) -> Self
    where
        F: FnOnce(FittingConfig) -> FittingConfig,
    {
        let base = self.fitting_or_preset();
        self.fitting = Some(f(base));
        self.provenance.track_field("fitting.*", ConfigSource::Builder);
        self
    }

    /// Level 2: Override reconcile section
    pub fn reconcile<F>(mut self, f: F) -> Self
    where
        F: FnOnce(ReconcileConfig) -> ReconcileConfig,
    {
        let base = self.reconcile_or_preset();
        self.reconcile = Some(f(base));
        self.provenance.track_field("reconcile.*", ConfigSource::Builder);
        self
    }

    fn sampling_or_preset(&self) -> SamplingConfig {
        self.sampling
            .clone()
            .unwrap_or_else(|| SamplingConfig::from_preset(self.preset))
    }

    fn sandbox_or_preset(&self) -> SandboxConfig {
        self.sandbox
            .clone()
            .unwrap_or_else(|| SandboxConfig::from_preset(self.preset))
    }

    fn profiling_or_preset(&self) -> ProfilingConfig {
        self.profiling
            .clone()
            .unwrap_or_else(|| ProfilingConfig::from_preset(self.preset))
    }

    fn fitting_or_preset(&self) -> FittingConfig {
        self.fitting
            .clone()
            .unwrap_or_else(|| FittingConfig::from_preset(self.preset))
    }

    fn reconcile_or_preset(&self) -> ReconcileConfig {
        self.reconcile
            .clone()
            .unwrap_or_else(|| ReconcileConfig::from_preset(self.preset))
    }

    /// Build and validate
    pub fn build(self) -> ConfigResult<ValidatedConfig> {
        self.sampling_or_preset().validate()?;
        self.sandbox_or_preset().validate()?;
        self.profiling_or_preset().validate()?;
        self.fitting_or_preset().validate()?;
        self.reconcile_or_preset().validate()?;
        self.validate_cross_section()?;

        tracing::debug!("Configuration built: {}", self.describe());
        Ok(ValidatedConfig(self))
    }

    fn validate_cross_section(&self) -> ConfigResult<()> {
        let sandbox = self.sandbox_or_preset();
        let profiling = self.profiling_or_preset();
        if sandbox.per_run_timeout_ms > profiling.session_budget_ms {
            return Err(ConfigError::CrossSectionConflict {
                issue: format!(
                    "per-run timeout {}ms exceeds the session budget {}ms",
                    sandbox.per_run_timeout_ms, profiling.session_budget_ms
                ),
                fix: "Lower sandbox.per_run_timeout_ms or raise profiling.session_budget_ms"
                    .to_string(),
            });
        }

        let sampling = self.sampling_or_preset();
        let fitting = self.fitting_or_preset();
        if fitting.min_measurements > sampling.sample_count_cap {
            return Err(ConfigError::CrossSectionConflict {
                issue: format!(
                    "fitting needs {} measurements but at most {} sizes are scheduled",
                    fitting.min_measurements, sampling.sample_count_cap
                ),
                fix: "Lower fitting.min_measurements or raise sampling.sample_count_cap"
                    .to_string(),
            });
        }
        Ok(())
    }

    /// Get base preset
    pub fn get_preset(&self) -> Preset {
        self.preset
    }

    /// Get provenance
    pub fn provenance(&self) -> &ConfigProvenance {
        &self.provenance
    }

    /// Load from YAML file (v1 schema), then apply environment overrides
    pub fn from_yaml(path: &str) -> ConfigResult<ValidatedConfig> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content, path)?
            .with_env_overrides(std::env::vars())?
            .build()
    }

    /// Parse YAML content (v1 schema) without building
    pub fn from_yaml_str(content: &str, origin: &str) -> ConfigResult<Self> {
        let export: ConfigExportV1 = serde_yaml::from_str(content)?;

        if !SUPPORTED_VERSIONS.contains(&export.version) {
            return Err(ConfigError::UnsupportedVersion {
                found: export.version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let preset = Preset::from_str(&export.preset)
            .map_err(|_| ConfigError::UnknownPreset(export.preset.clone()))?;

        let mut config = Self::preset(preset);
        let source = ConfigSource::Yaml {
            path: origin.to_string(),
        };

        if let Some(overrides) = export.overrides {
            if let Some(sampling) = overrides.sampling {
                config.sampling = Some(sampling);
                config.provenance.track_field("sampling.*", source.clone());
            }
            if let Some(sandbox) = overrides.sandbox {
                config.sandbox = Some(sandbox);
                config.provenance.track_field("sandbox.*", source.clone());
            }
            if let Some(profiling) = overrides.profiling {
                config.profiling = Some(profiling);
                config.provenance.track_field("profiling.*", source.clone());
            }
            if let Some(fitting) = overrides.fitting {
                config.fitting = Some(fitting);
                config.provenance.track_field("fitting.*", source.clone());
            }
            if let Some(reconcile) = overrides.reconcile {
                config.reconcile = Some(reconcile);
                config.provenance.track_field("reconcile.*", source);
            }
        }

        Ok(config)
    }

    /// Preset defaults plus process environment overrides
    pub fn from_env(preset: Preset) -> ConfigResult<ValidatedConfig> {
        Self::preset(preset)
            .with_env_overrides(std::env::vars())?
            .build()
    }

    /// Apply `COMPLEXITY__SECTION__FIELD=value` overrides
    ///
    /// Variables without the prefix are ignored; unknown keys under the prefix
    /// are rejected with a suggestion.
    pub fn with_env_overrides<I>(mut self, vars: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut scoped: Vec<(String, String)> = vars
            .into_iter()
            .filter(|(k, _)| k.starts_with(ENV_PREFIX))
            .collect();
        // Preset first so section overrides land on the right base
        scoped.sort_by_key(|(k, _)| k != "COMPLEXITY__PRESET");

        for (key, value) in scoped {
            self.apply_env_var(&key, &value)?;
        }
        Ok(self)
    }

    fn apply_env_var(&mut self, key: &str, value: &str) -> ConfigResult<()> {
        let path = key[ENV_PREFIX.len()..].to_lowercase();

        if path == "preset" {
            let preset = Preset::from_str(value)
                .map_err(|_| ConfigError::UnknownPreset(value.to_string()))?;
            self.preset = preset;
            self.provenance.set_preset(preset);
            return Ok(());
        }

        let (section, field) = path.split_once("__").ok_or_else(|| {
            ConfigError::unknown_field_with_suggestion(
                path.clone(),
                "environment",
                SECTIONS.iter().map(|s| s.to_string()).collect(),
            )
        })?;

        match section {
            "sampling" => {
                let mut c = self.sampling_or_preset();
                match field {
                    "min_input_size" => c.min_input_size = parse_env(key, value)?,
                    "spacing_exponent" => c.spacing_exponent = parse_env(key, value)?,
                    "max_input_cap" => c.max_input_cap = parse_env(key, value)?,
                    "sample_count_floor" => c.sample_count_floor = parse_env(key, value)?,
                    "sample_count_cap" => c.sample_count_cap = parse_env(key, value)?,
                    _ => return Err(unknown(field, section, SAMPLING_FIELDS)),
                }
                self.sampling = Some(c);
            }
            "sandbox" => {
                let mut c = self.sandbox_or_preset();
                match field {
                    "python_interpreter" => c.python_interpreter = value.to_string(),
                    "cpp_compiler" => c.cpp_compiler = value.to_string(),
                    "cpp_flags" => c.cpp_flags = split_words(value),
                    "entry_point" => c.entry_point = value.to_string(),
                    "per_run_timeout_ms" => c.per_run_timeout_ms = parse_env(key, value)?,
                    "compile_timeout_ms" => c.compile_timeout_ms = parse_env(key, value)?,
                    "scratch_dir" => c.scratch_dir = Some(value.into()),
                    "wrapper" => c.wrapper = split_words(value),
                    "confinement" => {
                        c.confinement = Confinement::from_str(value)
                            .map_err(|e| ConfigError::invalid_value(key, value, e))?
                    }
                    "max_output_bytes" => c.max_output_bytes = parse_env(key, value)?,
                    _ => return Err(unknown(field, section, SANDBOX_FIELDS)),
                }
                self.sandbox = Some(c);
            }
            "profiling" => {
                let mut c = self.profiling_or_preset();
                match field {
                    "runs_per_size" => c.runs_per_size = parse_env(key, value)?,
                    "session_budget_ms" => c.session_budget_ms = parse_env(key, value)?,
                    _ => return Err(unknown(field, section, PROFILING_FIELDS)),
                }
                self.profiling = Some(c);
            }
            "fitting" => {
                let mut c = self.fitting_or_preset();
                match field {
                    "min_measurements" => c.min_measurements = parse_env(key, value)?,
                    "exponential_cap" => c.exponential_cap = parse_env(key, value)?,
                    "fallback_model" => {
                        c.fallback_model = ComplexityClass::from_str(value)
                            .map_err(|e| ConfigError::invalid_value(key, value, e))?
                    }
                    _ => return Err(unknown(field, section, FITTING_FIELDS)),
                }
                self.fitting = Some(c);
            }
            "reconcile" => {
                let mut c = self.reconcile_or_preset();
                match field {
                    "empirical_weight" => c.empirical_weight = parse_env(key, value)?,
                    "strong_threshold" => c.strong_threshold = parse_env(key, value)?,
                    "moderate_threshold" => c.moderate_threshold = parse_env(key, value)?,
                    _ => return Err(unknown(field, section, RECONCILE_FIELDS)),
                }
                self.reconcile = Some(c);
            }
            _ => {
                return Err(ConfigError::unknown_field_with_suggestion(
                    section,
                    "environment",
                    SECTIONS.iter().map(|s| s.to_string()).collect(),
                ))
            }
        }

        self.provenance.track_field(
            &format!("{}.{}", section, field),
            ConfigSource::Env(key.to_string()),
        );
        Ok(())
    }

    /// Export to YAML
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let export = ConfigExportV1 {
            version: 1,
            preset: self.preset.to_string(),
            overrides: Some(ConfigOverrides {
                sampling: self.sampling.clone(),
                sandbox: self.sandbox.clone(),
                profiling: self.profiling.clone(),
                fitting: self.fitting.clone(),
                reconcile: self.reconcile.clone(),
            }),
        };

        serde_yaml::to_string(&export).map_err(ConfigError::Yaml)
    }

    /// Get a human-readable description of the configuration
    pub fn describe(&self) -> String {
        let overridden: Vec<&str> = [
            (self.sampling.is_some(), "sampling"),
            (self.sandbox.is_some(), "sandbox"),
            (self.profiling.is_some(), "profiling"),
            (self.fitting.is_some(), "fitting"),
            (self.reconcile.is_some(), "reconcile"),
        ]
        .into_iter()
        .filter_map(|(set, name)| set.then_some(name))
        .collect();

        if overridden.is_empty() {
            format!("{} (preset defaults)", self.preset)
        } else {
            format!("{} [overrides: {}]", self.preset, overridden.join(", "))
        }
    }
}

const SECTIONS: &[&str] = &["sampling", "sandbox", "profiling", "fitting", "reconcile"];
const SAMPLING_FIELDS: &[&str] = &[
    "min_input_size",
    "spacing_exponent",
    "max_input_cap",
    "sample_count_floor",
    "sample_count_cap",
];
const SANDBOX_FIELDS: &[&str] = &[
    "python_interpreter",
    "cpp_compiler",
    "cpp_flags",
    "entry_point",
    "per_run_timeout_ms",
    "compile_timeout_ms",
    "scratch_dir",
    "confinement",
    "wrapper",
    "max_output_bytes",
];
const PROFILING_FIELDS: &[&str] = &["runs_per_size", "session_budget_ms"];
const FITTING_FIELDS: &[&str] = &["min_measurements", "exponential_cap", "fallback_model"];
const RECONCILE_FIELDS: &[&str] = &["empirical_weight", "strong_threshold", "moderate_threshold"];

fn unknown(field: &str, section: &str, valid: &[&str]) -> ConfigError {
    ConfigError::unknown_field_with_suggestion(
        field,
        section,
        valid.iter().map(|s| s.to_string()).collect(),
    )
}

fn parse_env<T>(key: &str, value: &str) -> ConfigResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::invalid_value(key, value, e.to_string()))
}

fn split_words(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}

/// Validated configuration (immutable, safe to use)
#[derive(Debug, Clone)]
pub struct ValidatedConfig(AnalysisConfig);

impl ValidatedConfig {
    /// Unwrap the validated config to get the inner AnalysisConfig
    pub fn into_inner(self) -> AnalysisConfig {
        self.0
    }

    /// Get reference to inner config
    pub fn as_inner(&self) -> &AnalysisConfig {
        &self.0
    }

    pub fn preset(&self) -> Preset {
        self.0.preset
    }

    pub fn sampling(&self) -> SamplingConfig {
        self.0.sampling_or_preset()
    }

    pub fn sandbox(&self) -> SandboxConfig {
        self.0.sandbox_or_preset()
    }

    pub fn profiling(&self) -> ProfilingConfig {
        self.0.profiling_or_preset()
    }

    pub fn fitting(&self) -> FittingConfig {
        self.0.fitting_or_preset()
    }

    pub fn reconcile(&self) -> ReconcileConfig {
        self.0.reconcile_or_preset()
    }

    pub fn provenance_summary(&self) -> String {
        self.0.provenance.summary()
    }

    /// Export the effective configuration (every section materialised)
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let export = ConfigExportV1 {
            version: 1,
            preset: self.0.preset.to_string(),
            overrides: Some(ConfigOverrides {
                sampling: Some(self.sampling()),
                sandbox: Some(self.sandbox()),
                profiling: Some(self.profiling()),
                fitting: Some(self.fitting()),
                reconcile: Some(self.reconcile()),
            }),
        };
        serde_yaml::to_string(&export).map_err(ConfigError::Yaml)
    }
}

impl Default for ValidatedConfig {
    fn default() -> Self {
        ValidatedConfig(AnalysisConfig::preset(Preset::default()))
    }
}
