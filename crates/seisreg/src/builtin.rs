// SPDX-FileCopyrightText: 2026 Seisreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry construction from the compiled-in catalog and configuration.

use std::sync::Arc;

use seisreg_config::{RegistryConfig, SeisregConfig};
use seisreg_core::SeisregError;
use seisreg_plugin::{
    EntryPointTable, ModuleTable, PluginRegistry, RegistryOptions, builtin_entry_points,
    declare_optional_backends, parse_entry_points,
};
use tracing::debug;

/// Module table with the bundled codecs installed and every optional
/// backend declared.
pub fn builtin_modules() -> ModuleTable {
    let mut modules = ModuleTable::new();
    seisreg_ascii::install(&mut modules);
    declare_optional_backends(&mut modules);
    modules
}

pub fn registry_options(config: &RegistryConfig) -> RegistryOptions {
    RegistryOptions {
        duplicate_policy: config.duplicate_policy,
        detect_prefix_bytes: config.detect_prefix_bytes,
        skip_unloadable_detectors: config.skip_unloadable_detectors,
    }
}

/// The built-in table followed by the configured extra table, if any.
pub fn entry_points(config: &RegistryConfig) -> Result<EntryPointTable, SeisregError> {
    let mut table = builtin_entry_points()?;
    if let Some(path) = &config.entry_points {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SeisregError::Config(format!("cannot read entry points `{path}`: {e}"))
        })?;
        let extra = parse_entry_points(&content)?;
        debug!(path = %path, entries = extra.len(), "loaded extra entry points");
        table.extend(extra);
    }
    Ok(table)
}

/// Build and validate the registry. Any error is fatal to startup.
pub fn build_registry(config: &SeisregConfig) -> Result<PluginRegistry, Vec<SeisregError>> {
    let table = entry_points(&config.registry).map_err(|e| vec![e])?;
    PluginRegistry::from_entry_points(
        &table,
        Arc::new(builtin_modules()),
        registry_options(&config.registry),
    )
}
