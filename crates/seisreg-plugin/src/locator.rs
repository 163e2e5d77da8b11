// SPDX-FileCopyrightText: 2026 Seisreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `module.path:symbol` references stored at registration time.

use std::fmt;
use std::str::FromStr;

use seisreg_core::SeisregError;

/// Where an operation lives: a module path and a symbol inside it.
///
/// A locator is only a reference; nothing is loaded until the registry
/// resolves it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    module: String,
    symbol: String,
}

impl Locator {
    pub fn new(module: impl Into<String>, symbol: impl Into<String>) -> Result<Self, SeisregError> {
        let module = module.into();
        let symbol = symbol.into();
        let invalid = |reason: &str| SeisregError::InvalidLocator {
            locator: format!("{module}:{symbol}"),
            reason: reason.to_string(),
        };

        if module.is_empty() {
            return Err(invalid("module path is empty"));
        }
        if module.split('.').any(|part| !is_identifier(part)) {
            return Err(invalid("module path must be dot-separated identifiers"));
        }
        if !is_identifier(&symbol) {
            return Err(invalid("symbol must be an identifier"));
        }
        Ok(Self { module, symbol })
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl FromStr for Locator {
    type Err = SeisregError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (module, symbol) = s.trim().split_once(':').ok_or_else(|| SeisregError::InvalidLocator {
            locator: s.to_string(),
            reason: "expected `module.path:symbol`".to_string(),
        })?;
        Locator::new(module.trim(), symbol.trim())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module, self.symbol)
    }
}
