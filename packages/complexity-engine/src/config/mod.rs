//! Configuration System
//!
//! This module provides a 3-tier configuration system:
//! - Level 1: Preset - Simple one-liner
//! - Level 2: Section Override - Partial adjustment via closures
//! - Level 3: YAML / environment - Complete control
//!
//! # Examples
//!
//! ```rust,ignore
//! use complexity_engine::config::{AnalysisConfig, Preset};
//!
//! // Level 1: Simple preset
//! let config = AnalysisConfig::preset(Preset::Fast).build()?;
//!
//! // Level 2: Override specific section
//! let config = AnalysisConfig::preset(Preset::Balanced)
//!     .sandbox(|c| c.per_run_timeout_ms(500))
//!     .build()?;
//!
//! // Level 3: YAML file, then COMPLEXITY__* environment overrides
//! let config = AnalysisConfig::from_yaml("grading.yaml")?;
//! ```

pub mod analysis_config;
pub mod error;
pub mod io;
pub mod preset;
pub mod provenance;
pub mod section_configs;
pub mod validation;

// Re-exports
pub use analysis_config::{AnalysisConfig, ValidatedConfig, ENV_PREFIX};
pub use error::{ConfigError, ConfigResult};
pub use io::{ConfigExportV1, ConfigOverrides};
pub use preset::Preset;
pub use provenance::{ConfigProvenance, ConfigSource};
pub use section_configs::{
    Confinement, FittingConfig, ProfilingConfig, ReconcileConfig, SamplingConfig, SandboxConfig,
};
pub use validation::Validatable;
