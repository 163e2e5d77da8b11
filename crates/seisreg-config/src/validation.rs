// SPDX-FileCopyrightText: 2026 Seisreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::SeisregConfig;

/// Log levels accepted by `log.level`.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &SeisregConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.registry.detect_prefix_bytes == 0 {
        errors.push(ConfigError::Validation {
            message: "registry.detect_prefix_bytes must be greater than 0".to_string(),
        });
    }

    if config.registry.default_category.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "registry.default_category must not be empty".to_string(),
        });
    }

    if let Some(path) = &config.registry.entry_points
        && path.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "registry.entry_points must not be an empty path".to_string(),
        });
    }

    let level = config.log.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level `{}` is not one of: {}",
                config.log.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&SeisregConfig::default()).is_ok());
    }

    #[test]
    fn zero_prefix_is_rejected() {
        let mut config = SeisregConfig::default();
        config.registry.detect_prefix_bytes = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("detect_prefix_bytes"));
    }

    #[test]
    fn collects_all_failures() {
        let mut config = SeisregConfig::default();
        config.registry.detect_prefix_bytes = 0;
        config.registry.default_category = "  ".to_string();
        config.registry.entry_points = Some(String::new());
        config.log.level = "verbose".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let mut config = SeisregConfig::default();
        config.log.level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
