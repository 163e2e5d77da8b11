// SPDX-FileCopyrightText: 2026 Seisreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for seisreg.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of being silently ignored.

use seisreg_core::DuplicatePolicy;
use serde::{Deserialize, Serialize};

/// Top-level seisreg configuration.
///
/// Every section is optional and defaults to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SeisregConfig {
    /// Plugin registry behavior.
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// Plugin registry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Policy applied when an entry-point table registers the same
    /// `(category, name, role)` twice.
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,

    /// Number of leading bytes handed to `isFormat` detectors.
    #[serde(default = "default_detect_prefix_bytes")]
    pub detect_prefix_bytes: usize,

    /// Skip detectors whose module fails to load instead of failing detection.
    #[serde(default = "default_skip_unloadable_detectors")]
    pub skip_unloadable_detectors: bool,

    /// Additional entry-point table merged after the built-in catalog.
    #[serde(default)]
    pub entry_points: Option<String>,

    /// Category used by the CLI when `--category` is not given.
    #[serde(default = "default_category")]
    pub default_category: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::default(),
            detect_prefix_bytes: default_detect_prefix_bytes(),
            skip_unloadable_detectors: default_skip_unloadable_detectors(),
            entry_points: None,
            default_category: default_category(),
        }
    }
}

fn default_detect_prefix_bytes() -> usize {
    4096
}

fn default_skip_unloadable_detectors() -> bool {
    true
}

fn default_category() -> String {
    "waveform".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
