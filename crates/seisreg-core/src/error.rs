// SPDX-FileCopyrightText: 2026 Seisreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the seisreg plugin registry.

use thiserror::Error;

use crate::types::{CategoryKind, Role};

/// The primary error type used by the registry, its module table, and the
/// codec/algorithm contracts.
#[derive(Debug, Error)]
pub enum SeisregError {
    /// A `(category, name, role)` triple was registered twice without overwrite.
    #[error("duplicate registration: {category}/{name} already has `{role}` -> {existing}")]
    DuplicateRegistration {
        category: String,
        name: String,
        role: Role,
        existing: String,
    },

    /// The category was never registered.
    #[error("unknown category `{category}`{}", list_suffix("known categories", .known))]
    UnknownCategory { category: String, known: Vec<String> },

    /// The name is not registered within a known category.
    #[error(
        "unknown format `{name}` in category `{category}`{}",
        format_hint(.suggestion.as_deref(), .known)
    )]
    UnknownFormat {
        category: String,
        name: String,
        suggestion: Option<String>,
        known: Vec<String>,
    },

    /// The role is not registered for this name (e.g. writing a read-only format).
    #[error("{category}/{name} has no `{role}` operation{}", list_suffix("available", .available))]
    UnknownRole {
        category: String,
        name: String,
        role: Role,
        available: Vec<String>,
    },

    /// Auto-detection matched zero or several formats.
    #[error("{}", detection_message(.category, .matches))]
    FormatDetection {
        category: String,
        matches: Vec<String>,
    },

    /// The module behind a locator could not be loaded, or the symbol is
    /// missing or of the wrong kind.
    #[error("failed to load `{locator}`: {reason}")]
    PluginLoad { locator: String, reason: String },

    /// A role does not fit the kind of its category.
    #[error("role `{role}` is not allowed in {kind} category `{category}`")]
    InvalidRole {
        category: String,
        role: Role,
        kind: CategoryKind,
    },

    /// A locator string is malformed.
    #[error("invalid locator `{locator}`: {reason}")]
    InvalidLocator { locator: String, reason: String },

    /// A registered entry failed startup validation.
    #[error("invalid entry {category}/{name}: {reason}")]
    InvalidEntry {
        category: String,
        name: String,
        reason: String,
    },

    /// The entry-point table could not be parsed.
    #[error("invalid entry-point table: {0}")]
    EntryPoints(String),

    /// A format reader or writer rejected its input.
    #[error("{format} codec error: {message}")]
    Codec { format: String, message: String },

    /// A sample algorithm rejected its input or parameters.
    #[error("algorithm `{name}` failed: {message}")]
    Algorithm { name: String, message: String },

    /// Configuration errors surfaced outside the config crate's diagnostics.
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem errors while reading inputs or writing outputs.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SeisregError {
    /// Shorthand for a codec error.
    pub fn codec(format: &str, message: impl Into<String>) -> Self {
        SeisregError::Codec {
            format: format.to_string(),
            message: message.into(),
        }
    }
}

fn list_suffix(label: &str, items: &[String]) -> String {
    if items.is_empty() {
        String::new()
    } else {
        format!("; {label}: {}", items.join(", "))
    }
}

fn format_hint(suggestion: Option<&str>, known: &[String]) -> String {
    let known = if known.is_empty() {
        "; no formats are registered".to_string()
    } else {
        format!("; known formats: {}", known.join(", "))
    };
    match suggestion {
        Some(s) => format!("; did you mean `{s}`?{}", known.trim_start_matches(';')),
        None => known,
    }
}

fn detection_message(category: &str, matches: &[String]) -> String {
    if matches.is_empty() {
        format!("unknown format in category `{category}`: no detector matched")
    } else {
        format!(
            "ambiguous format in category `{category}`: {} detectors matched ({})",
            matches.len(),
            matches.join(", ")
        )
    }
}
