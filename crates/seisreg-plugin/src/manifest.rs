// SPDX-FileCopyrightText: 2026 Seisreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Entry-point table parsing.
//!
//! The table maps category → name → role → locator. Format entries are TOML
//! tables keyed by role; algorithm entries are a single locator string:
//!
//! ```toml
//! [waveform.SLIST]
//! isFormat = "seisreg.ascii:is_slist"
//! readFormat = "seisreg.ascii:read_slist"
//!
//! [taper]
//! hann = "seisreg.signal.taper:hann"
//! ```
//!
//! Order is preserved so registration order (and therefore listing order)
//! follows the file.

use std::str::FromStr;

use seisreg_core::{Role, SeisregError};
use toml::Value;

use crate::locator::Locator;

/// One `(category, name, role, locator)` row of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    pub category: String,
    pub name: String,
    pub role: Role,
    pub locator: Locator,
}

/// An ordered list of entry points.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPointTable {
    entries: Vec<EntryPoint>,
}

impl EntryPointTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, category: &str, name: &str, role: Role, locator: Locator) {
        self.entries.push(EntryPoint {
            category: category.to_string(),
            name: name.to_string(),
            role,
            locator,
        });
    }

    /// Append all rows of `other` after this table's rows.
    pub fn extend(&mut self, other: EntryPointTable) {
        self.entries.extend(other.entries);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EntryPoint> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a EntryPointTable {
    type Item = &'a EntryPoint;
    type IntoIter = std::slice::Iter<'a, EntryPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromStr for EntryPointTable {
    type Err = SeisregError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_entry_points(s)
    }
}

/// Parse an entry-point table from TOML content.
pub fn parse_entry_points(toml_content: &str) -> Result<EntryPointTable, SeisregError> {
    let doc: toml::Table = toml_content
        .parse()
        .map_err(|e| SeisregError::EntryPoints(format!("{e}")))?;

    let mut table = EntryPointTable::new();
    for (category, entries) in &doc {
        let Value::Table(entries) = entries else {
            return Err(SeisregError::EntryPoints(format!(
                "category `{category}` must be a table, found {}",
                entries.type_str()
            )));
        };
        for (name, value) in entries {
            match value {
                Value::String(locator) => {
                    table.push(category, name, Role::Function, parse_locator(locator, category, name)?);
                }
                Value::Table(roles) => {
                    if roles.is_empty() {
                        return Err(SeisregError::EntryPoints(format!(
                            "{category}/{name} declares no roles"
                        )));
                    }
                    for (role, locator) in roles {
                        let role = parse_format_role(role, category, name)?;
                        let Value::String(locator) = locator else {
                            return Err(SeisregError::EntryPoints(format!(
                                "{category}/{name}.{role} must be a locator string, found {}",
                                locator.type_str()
                            )));
                        };
                        table.push(category, name, role, parse_locator(locator, category, name)?);
                    }
                }
                other => {
                    return Err(SeisregError::EntryPoints(format!(
                        "{category}/{name} must be a locator string or a role table, found {}",
                        other.type_str()
                    )));
                }
            }
        }
    }
    Ok(table)
}

fn parse_format_role(role: &str, category: &str, name: &str) -> Result<Role, SeisregError> {
    match Role::from_str(role) {
        Ok(role) if Role::FORMAT_ROLES.contains(&role) => Ok(role),
        _ => Err(SeisregError::EntryPoints(format!(
            "{category}/{name}: unknown role `{role}`; expected one of: {}",
            Role::FORMAT_ROLES.map(|r| r.to_string()).join(", ")
        ))),
    }
}

fn parse_locator(locator: &str, category: &str, name: &str) -> Result<Locator, SeisregError> {
    locator.parse().map_err(|e| {
        SeisregError::EntryPoints(format!("{category}/{name}: {e}"))
    })
}
