// SPDX-FileCopyrightText: 2026 Seisreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operation contracts the registry dispatches to.
//!
//! Format plugins implement [`FormatDetector`], [`FormatReader`], and
//! optionally [`FormatWriter`]. Algorithm plugins implement
//! [`SampleAlgorithm`]. Plain functions and closures of the matching shape
//! implement these traits through blanket impls.

pub mod algorithm;
pub mod format;

pub use algorithm::SampleAlgorithm;
pub use format::{FormatDetector, FormatReader, FormatWriter};
