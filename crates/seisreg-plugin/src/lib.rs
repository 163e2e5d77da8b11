// SPDX-FileCopyrightText: 2026 Seisreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin registry, module table, entry-point parser, and built-in catalog.
//!
//! Plugins are registered by `(category, name, role)` against a locator
//! (`module.path:symbol`). The registry validates every locator against the
//! [`ModuleTable`] at startup but only loads a module when one of its
//! operations is first resolved.

pub mod catalog;
pub mod locator;
pub mod manifest;
pub mod module;
pub mod registry;
pub mod shared;

pub use catalog::{Backend, OPTIONAL_BACKENDS, builtin_entry_points, declare_optional_backends};
pub use locator::Locator;
pub use manifest::{EntryPoint, EntryPointTable, parse_entry_points};
pub use module::{Module, ModuleInit, ModuleTable};
pub use registry::{PluginEntry, PluginRegistry, RegistryOptions};
pub use shared::SharedRegistry;
