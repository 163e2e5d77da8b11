// SPDX-FileCopyrightText: 2026 Seisreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in catalog.
//!
//! The entry-point table compiled into the binary, plus declarations for the
//! optional backend modules it points into. Backends are declared only: their
//! entries are listed and validated, and resolving them reports the module as
//! not installed. The bundled `seisreg.ascii` module is installed separately
//! by its own crate.

use seisreg_core::{OperationKind, SeisregError};

use crate::manifest::{EntryPointTable, parse_entry_points};
use crate::module::ModuleTable;

const BUILTIN_ENTRY_POINTS: &str = include_str!("../entry_points.toml");

/// An optional backend module and the symbols it exports.
#[derive(Debug, Clone, Copy)]
pub struct Backend {
    pub module: &'static str,
    /// Format stems with whether the format is writable; each stem `x`
    /// exports `is_x`, `read_x` and, if writable, `write_x`.
    pub formats: &'static [(&'static str, bool)],
    pub functions: &'static [&'static str],
}

impl Backend {
    /// Exported symbols with their kinds.
    pub fn exports(&self) -> Vec<(String, OperationKind)> {
        let mut exports = Vec::new();
        for &(stem, writable) in self.formats {
            exports.push((format!("is_{stem}"), OperationKind::Detector));
            exports.push((format!("read_{stem}"), OperationKind::Reader));
            if writable {
                exports.push((format!("write_{stem}"), OperationKind::Writer));
            }
        }
        exports.extend(
            self.functions
                .iter()
                .map(|f| (f.to_string(), OperationKind::Algorithm)),
        );
        exports
    }
}

/// Optional backends referenced by the built-in table.
pub const OPTIONAL_BACKENDS: &[Backend] = &[
    Backend {
        module: "seisreg.io.datamark",
        formats: &[("datamark", false)],
        functions: &[],
    },
    Backend {
        module: "seisreg.io.gse2",
        formats: &[("gse1", false), ("gse2", true)],
        functions: &[],
    },
    Backend {
        module: "seisreg.io.mseed",
        formats: &[("mseed", true)],
        functions: &[],
    },
    Backend {
        module: "seisreg.io.sac",
        formats: &[("sac", true), ("sacxy", true)],
        functions: &[],
    },
    Backend {
        module: "seisreg.io.seg2",
        formats: &[("seg2", true)],
        functions: &[],
    },
    Backend {
        module: "seisreg.io.segy",
        formats: &[("segy", true), ("su", true)],
        functions: &[],
    },
    Backend {
        module: "seisreg.io.seisan",
        formats: &[("seisan", false)],
        functions: &[],
    },
    Backend {
        module: "seisreg.io.sh",
        formats: &[("q", true), ("asc", true)],
        functions: &[],
    },
    Backend {
        module: "seisreg.io.wav",
        formats: &[("wav", true)],
        functions: &[],
    },
    Backend {
        module: "seisreg.io.quakeml",
        formats: &[("quakeml", true)],
        functions: &[],
    },
    Backend {
        module: "seisreg.signal.detrend",
        formats: &[],
        functions: &["linear", "constant", "simple"],
    },
    Backend {
        module: "seisreg.signal.calculus",
        formats: &[],
        functions: &["gradient", "trapz", "cumtrapz", "simps", "romb"],
    },
    Backend {
        module: "seisreg.signal.filter",
        formats: &[],
        functions: &[
            "bandpass",
            "bandstop",
            "lowpass",
            "highpass",
            "lowpassCheby2",
            "lowpassFIR",
            "remezFIR",
        ],
    },
    Backend {
        module: "seisreg.signal.taper",
        formats: &[],
        functions: &[
            "cosine",
            "barthann",
            "bartlett",
            "blackman",
            "blackmanharris",
            "bohman",
            "boxcar",
            "chebwin",
            "flattop",
            "gaussian",
            "general_gaussian",
            "hamming",
            "hann",
            "kaiser",
            "nuttall",
            "parzen",
            "slepian",
            "triang",
        ],
    },
    Backend {
        module: "seisreg.signal.trigger",
        formats: &[],
        functions: &[
            "recstalta",
            "carlstatrig",
            "classicstalta",
            "delayedstalta",
            "zdetect",
        ],
    },
];

/// Parse the compiled-in entry-point table.
pub fn builtin_entry_points() -> Result<EntryPointTable, SeisregError> {
    parse_entry_points(BUILTIN_ENTRY_POINTS)
}

/// Declare every optional backend in `modules`.
///
/// Modules that are already present (e.g. installed by the caller) are left
/// untouched.
pub fn declare_optional_backends(modules: &mut ModuleTable) {
    for backend in OPTIONAL_BACKENDS {
        if !modules.is_declared(backend.module) {
            modules.declare(backend.module, backend.exports());
        }
    }
}
