// SPDX-FileCopyrightText: 2026 Seisreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `TIMESERIES` header line shared by both ASCII layouts.
//!
//! ```text
//! TIMESERIES BW_RJOB__EHZ_D, 6001 samples, 200 sps, 2009-08-24T00:20:03.000000, SLIST, INTEGER, Counts
//! ```

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use seisreg_core::{SampleType, SeisregError, Stats};

pub(crate) const MAGIC: &str = "TIMESERIES";
pub(crate) const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";
const DEFAULT_UNIT: &str = "Counts";

/// Parsed header of one trace block.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub stats: Stats,
    pub npts: usize,
    pub layout: String,
    pub sample_type: SampleType,
    pub unit: String,
}

impl Header {
    /// Parse a header line. `format` names the layout in error messages.
    pub fn parse(line: &str, format: &str) -> Result<Self, SeisregError> {
        let cleaned = line.replace(',', "");
        let parts: Vec<&str> = cleaned.split_whitespace().collect();
        if parts.first() != Some(&MAGIC) {
            return Err(SeisregError::codec(format, format!("expected `{MAGIC}` header, found `{line}`")));
        }
        if parts.len() < 9 {
            return Err(SeisregError::codec(format, format!("truncated header `{line}`")));
        }

        let id: Vec<&str> = parts[1].split('_').collect();
        if id.len() != 5 {
            return Err(SeisregError::codec(
                format,
                format!("trace id `{}` must be NET_STA_LOC_CHA_Q", parts[1]),
            ));
        }
        let npts = parts[2]
            .parse()
            .map_err(|_| SeisregError::codec(format, format!("invalid sample count `{}`", parts[2])))?;
        let sampling_rate: f64 = parts[4]
            .parse()
            .map_err(|_| SeisregError::codec(format, format!("invalid sampling rate `{}`", parts[4])))?;
        if !sampling_rate.is_finite() || sampling_rate <= 0.0 {
            return Err(SeisregError::codec(
                format,
                format!("sampling rate must be positive, found `{}`", parts[4]),
            ));
        }
        let starttime = parse_time(parts[6], format)?;
        let sample_type = SampleType::from_str(parts[8])
            .map_err(|_| SeisregError::codec(format, format!("unknown sample type `{}`", parts[8])))?;
        let unit = if parts.len() > 9 {
            parts[9..].join(" ")
        } else {
            DEFAULT_UNIT.to_string()
        };

        Ok(Self {
            stats: Stats {
                network: id[0].to_string(),
                station: id[1].to_string(),
                location: id[2].to_string(),
                channel: id[3].to_string(),
                quality: id[4].chars().next(),
                starttime,
                sampling_rate,
            },
            npts,
            layout: parts[7].to_string(),
            sample_type,
            unit,
        })
    }

    /// Render the header line (without newline) for `layout`.
    pub fn render(stats: &Stats, npts: usize, layout: &str, sample_type: SampleType) -> String {
        let quality = stats.quality.map(String::from).unwrap_or_default();
        format!(
            "{MAGIC} {}_{}_{}_{}_{}, {npts} samples, {} sps, {}, {layout}, {sample_type}, {DEFAULT_UNIT}",
            stats.network,
            stats.station,
            stats.location,
            stats.channel,
            quality,
            stats.sampling_rate,
            stats.starttime.format(TIME_FORMAT),
        )
    }
}

pub(crate) fn parse_time(s: &str, format: &str) -> Result<DateTime<Utc>, SeisregError> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|t| t.and_utc())
        .map_err(|e| SeisregError::codec(format, format!("invalid timestamp `{s}`: {e}")))
}

/// True when the first line of `prefix` is a header for `layout`.
pub(crate) fn first_line_declares(prefix: &[u8], layout: &str) -> bool {
    let end = prefix.iter().position(|&b| b == b'\n').unwrap_or(prefix.len());
    let line = String::from_utf8_lossy(&prefix[..end]);
    line.starts_with(MAGIC) && line.contains(layout)
}

/// Format one sample the way the header's sample type declares it.
pub(crate) fn format_sample(value: f64, sample_type: SampleType) -> String {
    match sample_type {
        SampleType::Integer => format!("{}", value.round() as i64),
        SampleType::Float => format_float(value),
    }
}

/// `%+.10e` with a signed, two-digit exponent (`+1.5000000000e+02`).
fn format_float(value: f64) -> String {
    let raw = format!("{value:+.10e}");
    match raw.split_once('e') {
        Some((mantissa, exp)) => match exp.parse::<i32>() {
            Ok(exp) => {
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{mantissa}e{sign}{:02}", exp.abs())
            }
            Err(_) => raw,
        },
        None => raw,
    }
}

/// Split input into `(header, body lines)` blocks.
pub(crate) fn blocks<'a>(text: &'a str, format: &str) -> Result<Vec<(&'a str, Vec<&'a str>)>, SeisregError> {
    let mut blocks: Vec<(&str, Vec<&str>)> = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with(MAGIC) {
            blocks.push((trimmed, Vec::new()));
        } else if let Some((_, body)) = blocks.last_mut() {
            body.push(trimmed);
        } else {
            return Err(SeisregError::codec(format, format!("data before `{MAGIC}` header")));
        }
    }
    if blocks.is_empty() {
        return Err(SeisregError::codec(format, format!("missing `{MAGIC}` header")));
    }
    Ok(blocks)
}
