// SPDX-FileCopyrightText: 2026 Seisreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `seisreg doctor` command implementation.
//!
//! Checks that the configuration loads, the entry-point tables parse, and
//! every locator validates. With `--deep`, every registered operation is
//! resolved as well.

use std::io::IsTerminal;
use std::sync::Arc;
use std::time::{Duration, Instant};

use seisreg_config::SeisregConfig;
use seisreg_plugin::PluginRegistry;

use crate::builtin;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: impl Into<String>, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.into(),
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Run `seisreg doctor`. Returns the number of failed checks.
pub fn run_doctor(config: &SeisregConfig, deep: bool, plain: bool) -> usize {
    let use_color = !plain && std::io::stdout().is_terminal();
    let results = collect_checks(config, deep);
    print!("{}", render(&results, use_color, deep));
    results
        .iter()
        .filter(|r| r.status == CheckStatus::Fail)
        .count()
}

pub fn collect_checks(config: &SeisregConfig, deep: bool) -> Vec<CheckResult> {
    let mut results = Vec::new();

    let start = Instant::now();
    results.push(CheckResult::new(
        "Configuration",
        CheckStatus::Pass,
        format!("duplicate_policy={}", config.registry.duplicate_policy),
        start,
    ));

    let start = Instant::now();
    let table = match builtin::entry_points(&config.registry) {
        Ok(table) => {
            results.push(CheckResult::new(
                "Entry points",
                CheckStatus::Pass,
                format!("{} entries", table.len()),
                start,
            ));
            table
        }
        Err(e) => {
            results.push(CheckResult::new("Entry points", CheckStatus::Fail, e.to_string(), start));
            return results;
        }
    };

    let start = Instant::now();
    let registry = match PluginRegistry::from_entry_points(
        &table,
        Arc::new(builtin::builtin_modules()),
        builtin::registry_options(&config.registry),
    ) {
        Ok(registry) => {
            results.push(CheckResult::new(
                "Registry",
                CheckStatus::Pass,
                format!(
                    "{} categories, {} entries",
                    registry.list_categories().len(),
                    registry.len()
                ),
                start,
            ));
            registry
        }
        Err(errors) => {
            let first = errors.first().map(|e| e.to_string()).unwrap_or_default();
            results.push(CheckResult::new(
                "Registry",
                CheckStatus::Fail,
                format!("{} error(s); first: {first}", errors.len()),
                start,
            ));
            return results;
        }
    };

    if deep {
        for category in registry.list_categories() {
            results.push(check_category(&registry, category));
        }
    }

    results
}

/// Resolve every role in `category`. Uninstalled backends are a warning;
/// anything else that fails to resolve is a failure.
fn check_category(registry: &PluginRegistry, category: &str) -> CheckResult {
    let start = Instant::now();
    let mut resolved = 0;
    let mut missing = 0;
    let mut failures = Vec::new();

    if let Ok(entries) = registry.entries(category) {
        for entry in entries {
            for role in entry.roles() {
                let uninstalled = entry.locator(role).is_some_and(|locator| {
                    let modules = registry.modules();
                    modules.is_declared(locator.module()) && !modules.is_installed(locator.module())
                });
                if uninstalled {
                    missing += 1;
                    continue;
                }
                match registry.resolve(category, entry.name(), role) {
                    Ok(_) => resolved += 1,
                    Err(e) => failures.push(format!("{}/{role}: {e}", entry.name())),
                }
            }
        }
    }

    let (status, message) = if !failures.is_empty() {
        (CheckStatus::Fail, failures.join("; "))
    } else if missing > 0 {
        (
            CheckStatus::Warn,
            format!("{resolved} resolved, {missing} backend operations not installed"),
        )
    } else {
        (CheckStatus::Pass, format!("{resolved} resolved"))
    };
    CheckResult::new(category, status, message, start)
}

pub fn render(results: &[CheckResult], use_color: bool, deep: bool) -> String {
    use colored::Colorize;

    let mut out = String::new();
    out.push_str("\n  seisreg doctor\n");
    out.push_str(&format!("  {}\n", "-".repeat(50)));

    let mut issues = 0;
    for result in results {
        let ms = result.duration.as_millis();
        let (tag, message) = match (result.status, use_color) {
            (CheckStatus::Pass, true) => ("✓".green().to_string(), result.message.normal().to_string()),
            (CheckStatus::Warn, true) => ("!".yellow().to_string(), result.message.yellow().to_string()),
            (CheckStatus::Fail, true) => ("✗".red().to_string(), result.message.red().to_string()),
            (CheckStatus::Pass, false) => ("[OK]  ".to_string(), result.message.clone()),
            (CheckStatus::Warn, false) => ("[WARN]".to_string(), result.message.clone()),
            (CheckStatus::Fail, false) => ("[FAIL]".to_string(), result.message.clone()),
        };
        if result.status != CheckStatus::Pass {
            issues += 1;
        }
        out.push_str(&format!("    {tag} {:<16} {message} ({ms}ms)\n", result.name));
    }

    out.push('\n');
    if issues > 0 {
        let word = if issues == 1 { "issue" } else { "issues" };
        out.push_str(&format!("  {issues} {word} found.\n"));
        if !deep {
            out.push_str("  Run with --deep to resolve every operation.\n");
        }
    } else {
        out.push_str("  All checks passed.\n");
    }
    out.push('\n');
    out
}
