// SPDX-FileCopyrightText: 2026 Seisreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! TSPAIR: a header followed by one `timestamp  value` pair per line.
//!
//! Timestamps are informational on read; sample times are derived from the
//! header's start time and sampling rate.

use seisreg_core::{SeisregError, Stream, Trace};

use crate::header::{Header, TIME_FORMAT, blocks, first_line_declares, format_sample};

pub const FORMAT: &str = "TSPAIR";

pub fn is_tspair(prefix: &[u8]) -> bool {
    first_line_declares(prefix, FORMAT)
}

pub fn read_tspair(data: &[u8]) -> Result<Stream, SeisregError> {
    let text = std::str::from_utf8(data)
        .map_err(|e| SeisregError::codec(FORMAT, format!("input is not UTF-8: {e}")))?;

    let mut traces = Vec::new();
    for (line, body) in blocks(text, FORMAT)? {
        let header = Header::parse(line, FORMAT)?;
        let mut samples = Vec::with_capacity(header.npts);
        for pair in body {
            let mut fields = pair.split_whitespace();
            let (Some(_time), Some(value), None) = (fields.next(), fields.next(), fields.next()) else {
                return Err(SeisregError::codec(
                    FORMAT,
                    format!("expected `timestamp value`, found `{pair}`"),
                ));
            };
            let value = value
                .parse::<f64>()
                .map_err(|_| SeisregError::codec(FORMAT, format!("invalid sample `{value}`")))?;
            samples.push(value);
        }
        if samples.len() != header.npts {
            return Err(SeisregError::codec(
                FORMAT,
                format!(
                    "{} declares {} samples but {} were read",
                    header.stats.id(),
                    header.npts,
                    samples.len()
                ),
            ));
        }
        traces.push(Trace::new(header.stats, samples, header.sample_type));
    }
    Ok(Stream::new(traces))
}

pub fn write_tspair(stream: &Stream) -> Result<Vec<u8>, SeisregError> {
    let mut out = String::new();
    for trace in &stream.traces {
        out.push_str(&Header::render(&trace.stats, trace.npts(), FORMAT, trace.sample_type));
        out.push('\n');
        for (i, &value) in trace.data.iter().enumerate() {
            let time = trace
                .stats
                .starttime
                .checked_add_signed(trace.stats.offset(i))
                .ok_or_else(|| {
                    SeisregError::codec(
                        FORMAT,
                        format!("sample {i} of {} is outside the representable time range", trace.stats.id()),
                    )
                })?;
            out.push_str(&format!(
                "{}  {}\n",
                time.format(TIME_FORMAT),
                format_sample(value, trace.sample_type)
            ));
        }
    }
    Ok(out.into_bytes())
}
