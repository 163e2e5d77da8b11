// SPDX-FileCopyrightText: 2026 Seisreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `categories`, `formats`, `detect` and `convert` command implementations.

use std::io::Write;
use std::path::Path;

use seisreg_core::{CategoryKind, Role, SeisregError};
use seisreg_plugin::PluginRegistry;
use tracing::info;

pub fn run_categories(registry: &PluginRegistry, out: &mut impl Write) -> Result<(), SeisregError> {
    for category in registry.list_categories() {
        let kind = registry.category_kind(category)?;
        let count = registry.list_formats(category)?.len();
        writeln!(out, "{category:<16} {:<10} {count}", kind.to_string())?;
    }
    Ok(())
}

/// List the names of a category with their roles (formats) or locators
/// (algorithms).
pub fn run_formats(
    registry: &PluginRegistry,
    category: &str,
    out: &mut impl Write,
) -> Result<(), SeisregError> {
    let kind = registry.category_kind(category)?;
    for entry in registry.entries(category)? {
        let detail = match kind {
            CategoryKind::Format => entry
                .roles()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join(", "),
            CategoryKind::Algorithm => entry
                .locator(Role::Function)
                .map(|l| l.to_string())
                .unwrap_or_default(),
        };
        writeln!(out, "{:<16} {detail}", entry.name())?;
    }
    Ok(())
}

pub fn run_detect(
    registry: &PluginRegistry,
    category: &str,
    input: &Path,
    out: &mut impl Write,
) -> Result<(), SeisregError> {
    let data = std::fs::read(input)?;
    let name = registry.detect(category, &data)?;
    writeln!(out, "{name}")?;
    Ok(())
}

/// Read `input` (detecting its format unless `from` is given) and write it
/// to `output` as `to`.
pub fn run_convert(
    registry: &PluginRegistry,
    category: &str,
    input: &Path,
    output: &Path,
    from: Option<&str>,
    to: &str,
) -> Result<(), SeisregError> {
    let data = std::fs::read(input)?;
    let stream = registry.read(category, &data, from)?;
    let encoded = registry.write(category, &stream, to)?;
    std::fs::write(output, &encoded)?;
    info!(
        input = %input.display(),
        output = %output.display(),
        traces = stream.len(),
        bytes = encoded.len(),
        format = to,
        "converted"
    );
    Ok(())
}
