//! Integration tests for tracknet-cli.
//!
//! Run the `tracknet` binary against layout files written to a temp dir.

use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Helper to get the path to the `tracknet` binary built by cargo.
fn tracknet_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_tracknet"))
}

/// Bumper, rail 1-2, turnout 2 -> 3/4, rails 3-5 and 4-6, bumpers at 5 and 6.
const SIDING: &str = r#"{
    "layout": { "name": "Siding", "version": "2", "author": "tests" },
    "modules": [{ "name": "yard", "trackplan": "siding" }],
    "trackplans": [{
        "name": "siding",
        "tracksections": [{
            "name": "main",
            "trackelements": [
                { "bumper": { "path": 1 } },
                { "rail": { "length": 100, "path": [1, 2] } },
                { "turnout": { "narrow": 2, "wide": [3, 4] } },
                { "rail": { "path": [3, 5] } },
                { "rail": { "path": [4, 6] } },
                { "bumper": { "path": 5 } },
                { "bumper": { "path": 6 } }
            ]
        }]
    }]
}"#;

fn write_layout(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("failed to write layout");
    path
}

fn run(args: &[&str]) -> Output {
    tracknet_bin()
        .args(args)
        .output()
        .expect("failed to run tracknet")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn cli_validate_accepts_good_layout() {
    let dir = TempDir::new().unwrap();
    let path = write_layout(&dir, "siding.json", SIDING);

    let output = run(&["validate", path.to_str().unwrap()]);
    assert!(output.status.success(), "validate failed: {output:?}");
    assert!(stdout(&output).contains("OK (1 modules, 1 trackplans, 0 junctions)"));
}

#[test]
fn cli_validate_reports_every_problem() {
    let dir = TempDir::new().unwrap();
    let bad = SIDING
        .replace(r#""name": "Siding""#, r#""name": """#)
        .replace("[3, 4]", "[3]");
    let path = write_layout(&dir, "bad.json", &bad);

    let output = run(&["validate", path.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("2 problem(s)"), "got: {stderr}");
    assert!(stderr.contains("layout name is empty"), "got: {stderr}");
    assert!(stderr.contains("needs at least 2 wide ends"), "got: {stderr}");
}

#[test]
fn cli_info_prints_summary() {
    let dir = TempDir::new().unwrap();
    let path = write_layout(&dir, "siding.json", SIDING);

    let output = run(&["info", path.to_str().unwrap(), "--vertices"]);
    assert!(output.status.success(), "info failed: {output:?}");
    let out = stdout(&output);
    assert!(out.contains("Layout:    Siding"));
    assert!(out.contains("Elements:  7"), "got: {out}");
    assert!(out.contains("turnout: 1"), "got: {out}");
    assert!(out.contains("V0"), "vertex listing missing: {out}");
    // Rail 1-2 is the first element with two ends.
    assert!(out.contains("V1 <-> V2"), "pair listing missing: {out}");
    assert_eq!(out.lines().filter(|l| l.contains("<->")).count(), 5);
}

#[test]
fn cli_paths_from_one_node() {
    let dir = TempDir::new().unwrap();
    let path = write_layout(&dir, "siding.json", SIDING);

    let output = run(&["paths", path.to_str().unwrap(), "--node", "1.1"]);
    assert!(output.status.success(), "paths failed: {output:?}");
    let out = stdout(&output);
    assert!(out.contains("From 1.1 (2 paths):"), "got: {out}");
    assert!(out.contains("[ 1.1  1.2  1.3  1.5 ]"), "got: {out}");
    assert!(out.contains("[ 1.1  1.2  1.4  1.6 ]"), "got: {out}");
}

#[test]
fn cli_paths_all_nodes_quiet() {
    let dir = TempDir::new().unwrap();
    let path = write_layout(&dir, "siding.json", SIDING);

    let output = run(&["paths", path.to_str().unwrap(), "--quiet", "--count"]);
    assert!(output.status.success(), "paths failed: {output:?}");
    let out = stdout(&output);
    assert!(out.contains("1.1: 2"), "got: {out}");
    assert!(out.contains("Total:"), "got: {out}");
}

#[test]
fn cli_route_between_nodes() {
    let dir = TempDir::new().unwrap();
    let path = write_layout(&dir, "siding.json", SIDING);

    let output = run(&["route", path.to_str().unwrap(), "1.1", "1.6"]);
    assert!(output.status.success(), "route failed: {output:?}");
    let out = stdout(&output);
    assert!(out.contains("Routes 1.1 -> 1.6 (1):"), "got: {out}");
    assert!(out.contains("[ 1.1  1.2  1.4  1.6 ]"), "got: {out}");
}

#[test]
fn cli_route_rejects_unknown_node() {
    let dir = TempDir::new().unwrap();
    let path = write_layout(&dir, "siding.json", SIDING);

    let output = run(&["route", path.to_str().unwrap(), "1.1", "3.3"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("node 3.3 not found"), "got: {stderr}");
}

#[test]
fn cli_rejects_malformed_node_reference() {
    let dir = TempDir::new().unwrap();
    let path = write_layout(&dir, "siding.json", SIDING);

    let output = run(&["route", path.to_str().unwrap(), "1-1", "1.6"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid node reference"), "got: {stderr}");
}

#[test]
fn cli_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.json");

    let output = run(&["info", missing.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot load layout"), "got: {stderr}");
}
