// SPDX-FileCopyrightText: 2026 Seisreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SLIST: a header followed by sample values, six per line, tab separated.

use seisreg_core::{SeisregError, Stream, Trace};

use crate::header::{Header, blocks, first_line_declares, format_sample};

pub const FORMAT: &str = "SLIST";
const VALUES_PER_LINE: usize = 6;

pub fn is_slist(prefix: &[u8]) -> bool {
    first_line_declares(prefix, FORMAT)
}

pub fn read_slist(data: &[u8]) -> Result<Stream, SeisregError> {
    let text = std::str::from_utf8(data)
        .map_err(|e| SeisregError::codec(FORMAT, format!("input is not UTF-8: {e}")))?;

    let mut traces = Vec::new();
    for (line, body) in blocks(text, FORMAT)? {
        let header = Header::parse(line, FORMAT)?;
        let samples = body
            .iter()
            .flat_map(|l| l.split_whitespace())
            .map(|v| {
                v.parse::<f64>()
                    .map_err(|_| SeisregError::codec(FORMAT, format!("invalid sample `{v}`")))
            })
            .collect::<Result<Vec<f64>, _>>()?;
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

pub fn write_slist(stream: &Stream) -> Result<Vec<u8>, SeisregError> {
    let mut out = String::new();
    for trace in &stream.traces {
        out.push_str(&Header::render(&trace.stats, trace.npts(), FORMAT, trace.sample_type));
        out.push('\n');
        for row in trace.data.chunks(VALUES_PER_LINE) {
            let line: Vec<String> = row
                .iter()
                .map(|&v| format_sample(v, trace.sample_type))
                .collect();
            out.push_str(&line.join("\t"));
            out.push('\n');
        }
    }
    Ok(out.into_bytes())
}
