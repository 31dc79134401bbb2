//! Configuration validation
//!
//! Components depend on the `Validatable` trait, not on concrete config types.

use super::error::ConfigResult;

/// Trait for validatable configuration objects
///
/// # Example
/// ```rust,ignore
/// use complexity_engine::config::Validatable;
///
/// fn build_component<C: Validatable>(config: C) -> Result<Component, ConfigError> {
///     config.validate()?;
///     // ... build component
/// }
/// ```
pub trait Validatable {
    /// Validate the configuration
    ///
    /// Returns `Ok(())` if valid, `Err(ConfigError)` with details if invalid.
    fn validate(&self) -> ConfigResult<()>;

    /// Get the configuration name for error messages
    fn config_name(&self) -> &'static str {
        "Config"
    }
}

impl<T: Validatable> Validatable for Option<T> {
    fn validate(&self) -> ConfigResult<()> {
        match self {
            Some(config) => config.validate(),
            None => Ok(()),
        }
    }

    fn config_name(&self) -> &'static str {
        self.as_ref().map_or("Config", |c| c.config_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigError, ProfilingConfig};

    #[test]
    fn test_option_validation() {
        let none: Option<ProfilingConfig> = None;
        assert!(none.validate().is_ok());

        let bad = Some(ProfilingConfig::default().runs_per_size(0));
        assert!(matches!(bad.validate(), Err(ConfigError::Range { .. })));
        assert_eq!(bad.config_name(), "profiling");
    }
}
