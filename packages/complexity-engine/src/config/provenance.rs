//! Configuration provenance tracking
//!
//! Track where each configuration value came from (preset, YAML, env, builder)

use super::preset::Preset;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration provenance tracking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigProvenance {
    /// Base preset used
    preset: Preset,

    /// Field-level tracking: field path → source
    /// Example: "sandbox.per_run_timeout_ms" → ConfigSource::Env("COMPLEXITY__SANDBOX__PER_RUN_TIMEOUT_MS")
    field_sources: BTreeMap<String, ConfigSource>,
}

/// Configuration source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// From preset defaults
    Preset(Preset),

    /// From YAML file
    Yaml { path: String },

    /// From environment variable
    Env(String),

    /// From builder API
    Builder,
}

impl ConfigProvenance {
    /// Create from preset
    pub fn from_preset(preset: Preset) -> Self {
        Self {
            preset,
            field_sources: BTreeMap::new(),
        }
    }

    /// Record field-level override
    pub fn track_field(&mut self, field_path: &str, source: ConfigSource) {
        self.field_sources.insert(field_path.to_string(), source);
    }

    /// Get source for a specific field
    ///
    /// Falls back to the section wildcard ("sandbox.*") and then the preset.
    pub fn get_source(&self, field_path: &str) -> ConfigSource {
        if let Some(source) = self.field_sources.get(field_path) {
            return source.clone();
        }
        let section = field_path.split('.').next().unwrap_or(field_path);
        self.field_sources
            .get(&format!("{}.*", section))
            .cloned()
            .unwrap_or(ConfigSource::Preset(self.preset))
    }

    /// Get base preset
    pub fn preset(&self) -> Preset {
        self.preset
    }

    pub fn set_preset(&mut self, preset: Preset) {
        self.preset = preset;
    }

    /// Get all field sources
    pub fn field_sources(&self) -> &BTreeMap<String, ConfigSource> {
        &self.field_sources
    }

    /// Get human-readable summary
    pub fn summary(&self) -> String {
        let mut lines = vec![format!("Base preset: {}", self.preset)];

        if !self.field_sources.is_empty() {
            lines.push("Overridden fields:".to_string());
            for (field, source) in &self.field_sources {
                lines.push(format!("  {} ← {}", field, source.describe()));
            }
        }

        lines.join("\n")
    }
}

impl ConfigSource {
    /// Get a short description
    pub fn describe(&self) -> String {
        match self {
            ConfigSource::Preset(p) => format!("preset:{}", p),
            ConfigSource::Yaml { path } => format!("yaml:{}", path),
            ConfigSource::Env(var) => format!("env:{}", var),
            ConfigSource::Builder => "builder".to_string(),
        }
    }
}
