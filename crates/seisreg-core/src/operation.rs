// SPDX-FileCopyrightText: 2026 Seisreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resolved operations handed out by the registry.

use std::sync::Arc;

use crate::error::SeisregError;
use crate::traits::{FormatDetector, FormatReader, FormatWriter, SampleAlgorithm};
use crate::types::{OperationKind, Params, Stream};

/// A loaded, callable operation.
///
/// Cloning is cheap: clones share the same underlying implementation, which
/// [`Operation::same_symbol`] can check.
#[derive(Clone)]
pub enum Operation {
    Detector(Arc<dyn FormatDetector>),
    Reader(Arc<dyn FormatReader>),
    Writer(Arc<dyn FormatWriter>),
    Algorithm(Arc<dyn SampleAlgorithm>),
}

impl Operation {
    /// Wrap a detection function.
    pub fn detector<F>(f: F) -> Self
    where
        F: Fn(&[u8]) -> bool + Send + Sync + 'static,
    {
        Operation::Detector(Arc::new(f))
    }

    /// Wrap a reader function.
    pub fn reader<F>(f: F) -> Self
    where
        F: Fn(&[u8]) -> Result<Stream, SeisregError> + Send + Sync + 'static,
    {
        Operation::Reader(Arc::new(f))
    }

    /// Wrap a writer function.
    pub fn writer<F>(f: F) -> Self
    where
        F: Fn(&Stream) -> Result<Vec<u8>, SeisregError> + Send + Sync + 'static,
    {
        Operation::Writer(Arc::new(f))
    }

    /// Wrap an algorithm function.
    pub fn algorithm<F>(f: F) -> Self
    where
        F: Fn(&[f64], &Params) -> Result<Vec<f64>, SeisregError> + Send + Sync + 'static,
    {
        Operation::Algorithm(Arc::new(f))
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Detector(_) => OperationKind::Detector,
            Operation::Reader(_) => OperationKind::Reader,
            Operation::Writer(_) => OperationKind::Writer,
            Operation::Algorithm(_) => OperationKind::Algorithm,
        }
    }

    /// True when both operations point at the same implementation.
    pub fn same_symbol(&self, other: &Operation) -> bool {
        self.data_ptr() == other.data_ptr()
    }

    fn data_ptr(&self) -> *const () {
        match self {
            Operation::Detector(op) => Arc::as_ptr(op) as *const (),
            Operation::Reader(op) => Arc::as_ptr(op) as *const (),
            Operation::Writer(op) => Arc::as_ptr(op) as *const (),
            Operation::Algorithm(op) => Arc::as_ptr(op) as *const (),
        }
    }

    pub fn as_detector(&self) -> Option<&Arc<dyn FormatDetector>> {
        match self {
            Operation::Detector(op) => Some(op),
            _ => None,
        }
    }

    pub fn as_reader(&self) -> Option<&Arc<dyn FormatReader>> {
        match self {
            Operation::Reader(op) => Some(op),
            _ => None,
        }
    }

    pub fn as_writer(&self) -> Option<&Arc<dyn FormatWriter>> {
        match self {
            Operation::Writer(op) => Some(op),
            _ => None,
        }
    }

    pub fn as_algorithm(&self) -> Option<&Arc<dyn SampleAlgorithm>> {
        match self {
            Operation::Algorithm(op) => Some(op),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Operation").field(&self.kind()).finish()
    }
}
