// SPDX-FileCopyrightText: 2026 Seisreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the seisreg plugin registry.
//!
//! This crate provides the error taxonomy, the role and time-series types,
//! and the operation contracts (detector, reader, writer, algorithm) shared
//! by the registry and every plugin module.

pub mod error;
pub mod operation;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::SeisregError;
pub use operation::Operation;
pub use traits::{FormatDetector, FormatReader, FormatWriter, SampleAlgorithm};
pub use types::{
    CategoryKind, DuplicatePolicy, OperationKind, Params, Role, SampleType, Stats, Stream, Trace,
};
