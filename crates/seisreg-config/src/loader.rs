// SPDX-FileCopyrightText: 2026 Seisreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `./seisreg.toml` > `~/.config/seisreg/seisreg.toml` >
//! `/etc/seisreg/seisreg.toml`, with `SEISREG_` environment overrides on top.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::SeisregConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG: &str = "/etc/seisreg/seisreg.toml";

/// Local configuration file, relative to the working directory.
pub const LOCAL_CONFIG: &str = "seisreg.toml";

/// Per-user configuration file under the XDG config directory.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("seisreg").join("seisreg.toml"))
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/seisreg/seisreg.toml`
/// 3. `~/.config/seisreg/seisreg.toml`
/// 4. `./seisreg.toml`
/// 5. `SEISREG_*` environment variables
pub fn load_config() -> Result<SeisregConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<SeisregConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SeisregConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from an explicit file path with env var overrides.
///
/// Used for `--config`; the XDG hierarchy is skipped.
pub fn load_config_from_path(path: &Path) -> Result<SeisregConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SeisregConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the layered Figment before extraction.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new()
        .merge(Serialized::defaults(SeisregConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG));
    if let Some(user) = user_config_path() {
        figment = figment.merge(Toml::file(user));
    }
    figment.merge(Toml::file(LOCAL_CONFIG)).merge(env_provider())
}

/// Environment provider mapping `SEISREG_<SECTION>_<KEY>` to `section.key`.
///
/// Uses `Env::map()` rather than `split("_")` because keys such as
/// `duplicate_policy` contain underscores themselves. Only the first
/// underscore after a known section name becomes a dot.
fn env_provider() -> Env {
    Env::prefixed("SEISREG_").map(|key| {
        let key = key.as_str();
        for section in SECTIONS {
            if let Some(rest) = key
                .strip_prefix(section)
                .and_then(|rest| rest.strip_prefix('_'))
            {
                return format!("{section}.{rest}").into();
            }
        }
        key.to_string().into()
    })
}

/// Top-level sections addressable through environment variables.
const SECTIONS: [&str; 2] = ["registry", "log"];
