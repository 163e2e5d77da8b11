// SPDX-FileCopyrightText: 2026 Seisreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the registry and the operations it dispatches to.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Named algorithm parameters, passed to [`crate::SampleAlgorithm`] as a JSON object.
pub type Params = serde_json::Map<String, serde_json::Value>;

/// The operation role a locator fills within a plugin entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum Role {
    /// Detection predicate over a byte prefix.
    #[strum(serialize = "isFormat")]
    #[serde(rename = "isFormat")]
    IsFormat,
    /// Deserializer producing a [`Stream`].
    #[strum(serialize = "readFormat")]
    #[serde(rename = "readFormat")]
    ReadFormat,
    /// Serializer consuming a [`Stream`]. Optional per format.
    #[strum(serialize = "writeFormat")]
    #[serde(rename = "writeFormat")]
    WriteFormat,
    /// The single operation of an algorithm entry.
    #[strum(serialize = "function")]
    #[serde(rename = "function")]
    Function,
}

impl Role {
    /// Roles recognized in format categories, in canonical order.
    pub const FORMAT_ROLES: [Role; 3] = [Role::IsFormat, Role::ReadFormat, Role::WriteFormat];

    /// The operation kind a locator in this role must resolve to.
    pub fn kind(self) -> OperationKind {
        match self {
            Role::IsFormat => OperationKind::Detector,
            Role::ReadFormat => OperationKind::Reader,
            Role::WriteFormat => OperationKind::Writer,
            Role::Function => OperationKind::Algorithm,
        }
    }

    /// The kind of category this role belongs to.
    pub fn category_kind(self) -> CategoryKind {
        match self {
            Role::Function => CategoryKind::Algorithm,
            _ => CategoryKind::Format,
        }
    }
}

/// What `register` does when a `(category, name, role)` triple already exists.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Fail with `DuplicateRegistration`; the first locator stays.
    #[default]
    Reject,
    /// Replace the existing locator (last registration wins).
    Overwrite,
}

/// Whether a category holds formats (detect/read/write) or algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum CategoryKind {
    Format,
    Algorithm,
}

/// The callable shape behind a resolved operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum OperationKind {
    Detector,
    Reader,
    Writer,
    Algorithm,
}

/// Storage type of trace samples as declared by text formats.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "UPPERCASE")]
pub enum SampleType {
    Integer,
    #[default]
    Float,
}

/// Header metadata of a single trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub network: String,
    pub station: String,
    pub location: String,
    pub channel: String,
    /// Data quality code (e.g. `D`, `R`), if the source carried one.
    pub quality: Option<char>,
    pub starttime: DateTime<Utc>,
    /// Samples per second.
    pub sampling_rate: f64,
}

impl Stats {
    /// SEED-style identifier `NET.STA.LOC.CHA`.
    pub fn id(&self) -> String {
        format!(
            "{}.{}.{}.{}",
            self.network, self.station, self.location, self.channel
        )
    }

    /// Time offset of sample `index` from the start time.
    ///
    /// Returns zero when the sampling rate is not positive.
    pub fn offset(&self, index: usize) -> Duration {
        if self.sampling_rate <= 0.0 {
            return Duration::zero();
        }
        let micros = (index as f64 / self.sampling_rate * 1_000_000.0).round() as i64;
        Duration::microseconds(micros)
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            network: String::new(),
            station: String::new(),
            location: String::new(),
            channel: String::new(),
            quality: None,
            starttime: DateTime::<Utc>::UNIX_EPOCH,
            sampling_rate: 1.0,
        }
    }
}

/// A contiguous time series with its header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub stats: Stats,
    pub data: Vec<f64>,
    pub sample_type: SampleType,
}

impl Trace {
    pub fn new(stats: Stats, data: Vec<f64>, sample_type: SampleType) -> Self {
        Self {
            stats,
            data,
            sample_type,
        }
    }

    /// Number of samples.
    pub fn npts(&self) -> usize {
        self.data.len()
    }

    /// Time of the last sample (the start time for an empty trace).
    ///
    /// `None` when the last sample falls outside the representable range.
    pub fn endtime(&self) -> Option<DateTime<Utc>> {
        let last = self.npts().saturating_sub(1);
        self.stats.starttime.checked_add_signed(self.stats.offset(last))
    }
}

/// An ordered collection of traces, as produced by readers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stream {
    pub traces: Vec<Trace>,
}

impl Stream {
    pub fn new(traces: Vec<Trace>) -> Self {
        Self { traces }
    }

    pub fn len(&self) -> usize {
        self.traces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }
}

impl FromIterator<Trace> for Stream {
    fn from_iter<I: IntoIterator<Item = Trace>>(iter: I) -> Self {
        Self {
            traces: iter.into_iter().collect(),
        }
    }
}
