// SPDX-FileCopyrightText: 2026 Seisreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! ASCII time-series codecs (`TSPAIR`, `SLIST`), the bundled `seisreg.ascii`
//! plugin module.

pub mod header;
pub mod slist;
pub mod tspair;

use seisreg_core::{Operation, OperationKind};
use seisreg_plugin::{Module, ModuleTable};
use tracing::debug;

pub use header::Header;
pub use slist::{is_slist, read_slist, write_slist};
pub use tspair::{is_tspair, read_tspair, write_tspair};

/// Module path under which the codecs are installed.
pub const MODULE: &str = "seisreg.ascii";

const EXPORTS: [(&str, OperationKind); 6] = [
    ("is_tspair", OperationKind::Detector),
    ("read_tspair", OperationKind::Reader),
    ("write_tspair", OperationKind::Writer),
    ("is_slist", OperationKind::Detector),
    ("read_slist", OperationKind::Reader),
    ("write_slist", OperationKind::Writer),
];

/// Build the module with all six operations.
pub fn module() -> Module {
    Module::new()
        .with("is_tspair", Operation::detector(is_tspair))
        .with("read_tspair", Operation::reader(read_tspair))
        .with("write_tspair", Operation::writer(write_tspair))
        .with("is_slist", Operation::detector(is_slist))
        .with("read_slist", Operation::reader(read_slist))
        .with("write_slist", Operation::writer(write_slist))
}

/// Install `seisreg.ascii` into `modules`; it is built on first use.
pub fn install(modules: &mut ModuleTable) {
    modules.install(MODULE, EXPORTS, || {
        debug!(module = MODULE, "building ascii codec module");
        Ok(module())
    });
}
