//! End-to-end coverage of the `sermo` subcommands against a real
//! temporary project on disk, exercised the way `largo`'s test suite
//! drives `project::build` directly rather than spawning a subprocess.

use std::fs;

use clap::Parser;
use tempfile::tempdir;

use sermo_cli::cli::{dispatch, Cli};

fn run(args: &[&str]) -> i32 {
    let mut full = vec!["sermo"];
    full.extend_from_slice(args);
    let cli = Cli::parse_from(full);
    dispatch(cli.command)
}

#[test]
fn check_passes_on_valid_source() {
    let temp = tempdir().unwrap();
    let entry = temp.path().join("main.srm");
    fs::write(&entry, "munus adde(a: numerus, b: numerus) fit numerus { redde a }").unwrap();

    let code = run(&["check", entry.to_str().unwrap()]);
    assert_eq!(code, 0);
}

#[test]
fn check_fails_on_missing_entry() {
    let temp = tempdir().unwrap();
    let missing = temp.path().join("nowhere.srm");

    let code = run(&["check", missing.to_str().unwrap()]);
    assert_eq!(code, 1);
}

#[test]
fn emit_writes_ferrum_source_to_the_requested_output() {
    let temp = tempdir().unwrap();
    let entry = temp.path().join("main.srm");
    let output = temp.path().join("main.rs");
    fs::write(&entry, "munus adde(a: numerus, b: numerus) fit numerus { redde a }").unwrap();

    let code = run(&["emit", entry.to_str().unwrap(), "--target", "ferrum", "--output", output.to_str().unwrap()]);
    assert_eq!(code, 0);
    let generated = fs::read_to_string(&output).unwrap();
    assert!(generated.contains("fn adde"));
}

#[test]
fn emit_rejects_an_unknown_target() {
    let temp = tempdir().unwrap();
    let entry = temp.path().join("main.srm");
    fs::write(&entry, "munus f() fit { }").unwrap();

    let code = run(&["emit", entry.to_str().unwrap(), "--target", "cobol"]);
    assert_eq!(code, 1);
}

#[test]
fn build_walks_imports_and_writes_one_file_per_module() {
    let temp = tempdir().unwrap();
    let src_dir = temp.path().join("src");
    fs::create_dir_all(&src_dir).unwrap();
    fs::write(src_dir.join("lib.srm"), "munus adde(a: numerus, b: numerus) fit numerus { redde a }").unwrap();
    fs::write(
        src_dir.join("main.srm"),
        r#"importa { adde } ex "./lib" munus entry() fit numerus { redde adde(1, 2) }"#,
    )
    .unwrap();

    let entry = src_dir.join("main.srm");
    let output = temp.path().join("out");

    let code = run(&["build", entry.to_str().unwrap(), "--target", "nebula", "--output", output.to_str().unwrap()]);
    assert_eq!(code, 0);
    assert!(output.join("main.js").exists());
    assert!(output.join("lib.js").exists());
}
