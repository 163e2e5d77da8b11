// SPDX-FileCopyrightText: 2026 Seisreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests driving the `seisreg` binary.
//!
//! Every test passes an explicit `--config` from a temp directory so the
//! host's configuration files are never consulted.

use std::path::Path;
use std::process::{Command, Output};

const SLIST: &str = "\
TIMESERIES BW_RJOB__EHZ_D, 7 samples, 200 sps, 2009-08-24T00:20:03.000000, SLIST, INTEGER, Counts
288\t300\t292\t285\t265\t287
297
";

fn seisreg(dir: &Path, args: &[&str]) -> Output {
    let config = dir.join("seisreg.toml");
    if !config.exists() {
        std::fs::write(&config, "").unwrap();
    }
    Command::new(env!("CARGO_BIN_EXE_seisreg"))
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(&config)
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn lists_categories_and_formats() {
    let dir = tempfile::tempdir().unwrap();
    let out = seisreg(dir.path(), &["categories"]);
    assert!(out.status.success(), "{}", stderr(&out));
    assert!(stdout(&out).lines().next().unwrap().starts_with("waveform"));

    let out = seisreg(dir.path(), &["formats"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("TSPAIR"));
    assert!(text.contains("MSEED"));
}

#[test]
fn detects_and_converts_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("in.txt"), SLIST).unwrap();

    let out = seisreg(dir.path(), &["detect", "in.txt"]);
    assert!(out.status.success(), "{}", stderr(&out));
    assert_eq!(stdout(&out), "SLIST\n");

    let out = seisreg(dir.path(), &["convert", "in.txt", "out.txt", "--to", "TSPAIR"]);
    assert!(out.status.success(), "{}", stderr(&out));
    let converted = std::fs::read_to_string(dir.path().join("out.txt")).unwrap();
    assert!(converted.starts_with("TIMESERIES BW_RJOB__EHZ_D, 7 samples"));
    assert!(converted.contains("TSPAIR"));
    assert_eq!(converted.lines().count(), 8);

    let out = seisreg(dir.path(), &["detect", "out.txt"]);
    assert_eq!(stdout(&out), "TSPAIR\n");
}

#[test]
fn unknown_format_lists_known_names() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("in.txt"), SLIST).unwrap();
    let out = seisreg(dir.path(), &["convert", "in.txt", "out.txt", "--to", "slst"]);
    assert!(!out.status.success());
    let err = stderr(&out);
    assert!(err.contains("unknown format `slst`"), "{err}");
    assert!(err.contains("TSPAIR, SLIST"), "{err}");
}

#[test]
fn undetectable_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("blob.bin"), [0u8, 1, 2, 3]).unwrap();
    let out = seisreg(dir.path(), &["detect", "blob.bin"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("no detector matched"));
}

#[test]
fn doctor_passes_and_deep_warns() {
    let dir = tempfile::tempdir().unwrap();
    let out = seisreg(dir.path(), &["doctor", "--plain"]);
    assert!(out.status.success(), "{}", stdout(&out));
    assert!(stdout(&out).contains("All checks passed."));

    let out = seisreg(dir.path(), &["doctor", "--deep", "--plain"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("[WARN] waveform"));
}

#[test]
fn config_typo_is_rendered_and_fatal() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("seisreg.toml"),
        "[registry]\nduplicate_polcy = \"overwrite\"\n",
    )
    .unwrap();
    let out = seisreg(dir.path(), &["categories"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("duplicate_policy"));
}

#[test]
fn broken_extra_table_fails_doctor() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("extra.toml"),
        "[waveform.FOO]\nisFormat = \"seisreg.nowhere:is_foo\"\nreadFormat = \"seisreg.nowhere:read_foo\"\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("seisreg.toml"),
        "[registry]\nentry_points = \"extra.toml\"\n",
    )
    .unwrap();
    let out = seisreg(dir.path(), &["doctor", "--plain"]);
    assert!(!out.status.success());
    assert!(stdout(&out).contains("[FAIL] Registry"));

    let out = seisreg(dir.path(), &["formats"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("not declared"));
}
