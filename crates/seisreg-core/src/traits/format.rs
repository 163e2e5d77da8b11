// SPDX-FileCopyrightText: 2026 Seisreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Detector, reader, and writer traits for format plugins.

use crate::error::SeisregError;
use crate::types::Stream;

/// Decides whether a byte prefix belongs to a format.
///
/// Detectors only see a bounded prefix of the input and must not fail:
/// unreadable input is simply "not this format".
pub trait FormatDetector: Send + Sync {
    fn is_format(&self, prefix: &[u8]) -> bool;
}

/// Decodes raw bytes into an in-memory [`Stream`].
pub trait FormatReader: Send + Sync {
    fn read(&self, data: &[u8]) -> Result<Stream, SeisregError>;
}

/// Encodes a [`Stream`] into raw bytes.
pub trait FormatWriter: Send + Sync {
    fn write(&self, stream: &Stream) -> Result<Vec<u8>, SeisregError>;
}

impl<F> FormatDetector for F
where
    F: Fn(&[u8]) -> bool + Send + Sync,
{
    fn is_format(&self, prefix: &[u8]) -> bool {
        self(prefix)
    }
}

impl<F> FormatReader for F
where
    F: Fn(&[u8]) -> Result<Stream, SeisregError> + Send + Sync,
{
    fn read(&self, data: &[u8]) -> Result<Stream, SeisregError> {
        self(data)
    }
}

impl<F> FormatWriter for F
where
    F: Fn(&Stream) -> Result<Vec<u8>, SeisregError> + Send + Sync,
{
    fn write(&self, stream: &Stream) -> Result<Vec<u8>, SeisregError> {
        self(stream)
    }
}
