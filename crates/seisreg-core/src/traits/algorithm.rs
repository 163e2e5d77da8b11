// SPDX-FileCopyrightText: 2026 Seisreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait for algorithm plugins (filters, tapers, triggers, detrending, ...).

use crate::error::SeisregError;
use crate::types::Params;

/// Transforms a sample array according to named parameters.
pub trait SampleAlgorithm: Send + Sync {
    fn apply(&self, samples: &[f64], params: &Params) -> Result<Vec<f64>, SeisregError>;
}

impl<F> SampleAlgorithm for F
where
    F: Fn(&[f64], &Params) -> Result<Vec<f64>, SeisregError> + Send + Sync,
{
    fn apply(&self, samples: &[f64], params: &Params) -> Result<Vec<f64>, SeisregError> {
        self(samples, params)
    }
}
