// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Integration tests for the `vela` commands.
//! Binary tests run the built executable against fixtures; the rest call
//! `vela_cli::run` directly with a buffer for output.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::tempdir;
use vela_cli::{run, Args, Command as VelaCommand, Format};

fn vela_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_vela"))
}

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Run `vela` with the given arguments, returning (stdout, stderr, exit code).
fn vela(args: &[&str]) -> (String, String, i32) {
    let out = Command::new(vela_binary())
        .args(args)
        .env("NO_COLOR", "1")
        .output()
        .expect("failed to run vela");
    (
        String::from_utf8_lossy(&out.stdout).to_string(),
        String::from_utf8_lossy(&out.stderr).to_string(),
        out.status.code().unwrap_or(-1),
    )
}

fn path_arg(name: &str) -> String {
    fixture(name).to_string_lossy().to_string()
}

fn run_in_process(command: VelaCommand, config: Option<PathBuf>, format: Format) -> (bool, String) {
    colored::control::set_override(false);
    let args = Args { command, config, format, log_level: "off".to_string() };
    let mut out = Vec::new();
    let ok = run(&args, &mut out).expect("command failed");
    (ok, String::from_utf8(out).unwrap())
}

#[test]
fn check_passes_with_valid_example() {
    let (stdout, stderr, code) = vela(&["check", &path_arg("flip.vl")]);
    assert_eq!(code, 0, "stdout: {}\nstderr: {}", stdout, stderr);
    assert!(stdout.contains("Check OK: 1 doc-test(s)"), "{}", stdout);
}

#[test]
fn check_without_examples() {
    let (stdout, _, code) = vela(&["check", &path_arg("plain.vl")]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Check OK: no examples"), "{}", stdout);
}

#[test]
fn check_fails_on_broken_example() {
    let (stdout, _, code) = vela(&["check", &path_arg("broken_example.vl")]);
    assert_eq!(code, 1);
    assert!(stdout.contains("error[E0100]"), "{}", stdout);
    assert!(stdout.contains("Demo.doctest.vl"), "{}", stdout);
    assert!(stdout.contains("Check FAILED: "), "{}", stdout);
}

#[test]
fn host_errors_stop_before_doc_tests() {
    let (stdout, _, code) = vela(&["check", &path_arg("host_error.vl")]);
    assert_eq!(code, 1);
    assert!(stdout.contains("error[E0200]"), "{}", stdout);
    assert!(stdout.contains("Compile FAILED: 1 error"), "{}", stdout);
}

#[test]
fn check_json_report() {
    let (stdout, _, code) = vela(&["check", &path_arg("broken_example.vl"), "--format", "json"]);
    assert_eq!(code, 1);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["command"], "check");
    assert_eq!(report["success"], false);
    assert_eq!(report["diagnostics"][0]["source"]["role"], "synthetic");
    assert_eq!(report["diagnostics"][0]["source"]["name"], "Demo.doctest.vl");
}

#[test]
fn tests_lists_backends() {
    let (stdout, _, code) = vela(&["tests", &path_arg("flip.vl"), "--format", "json"]);
    assert_eq!(code, 0);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["status"], "merged");
    assert_eq!(report["tests"][0]["name"], "Demo.FlipTwice");
    assert_eq!(report["tests"][0]["backends"], serde_json::json!(["Simulator", "ResourcesEstimator"]));
}

#[test]
fn missing_input_is_fatal() {
    let (_, stderr, code) = vela(&["check", "does-not-exist.vl"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("does-not-exist.vl"), "{}", stderr);
}

#[test]
fn extract_prints_snippets_per_namespace() {
    let (ok, out) = run_in_process(VelaCommand::Extract { files: vec![fixture("unterminated.vl")] }, None, Format::Text);
    assert!(ok);
    assert!(out.starts_with("Vela.DocTests\n    function UsesHelper() : Unit { Helper(); }\n"), "{}", out);
    assert!(out.ends_with("1 snippet(s)\n"), "{}", out);
    assert!(!out.contains("W0100"));
}

#[test]
fn config_file_controls_policy_and_backends() {
    let dir = tempdir().expect("Failed to create temp directory");
    let config = dir.path().join("vela.toml");
    fs::write(&config, "[doctest]\nbackends = [\"Simulator\"]\nfence_policy = \"warn\"\n").unwrap();

    let (ok, out) = run_in_process(
        VelaCommand::Extract { files: vec![fixture("unterminated.vl")] },
        Some(config.clone()),
        Format::Text,
    );
    assert!(ok);
    assert!(out.contains("warning[W0100]"), "{}", out);

    let (ok, out) = run_in_process(VelaCommand::Tests { files: vec![fixture("flip.vl")] }, Some(config), Format::Text);
    assert!(ok);
    assert!(out.contains("Demo.FlipTwice (Simulator)\n"), "{}", out);
}

#[test]
fn malformed_config_is_an_error() {
    let dir = tempdir().expect("Failed to create temp directory");
    let config = dir.path().join("vela.toml");
    fs::write(&config, "[doctest]\nbackends = 3\n").unwrap();

    let args = Args {
        command: VelaCommand::Check { files: vec![fixture("flip.vl")] },
        config: Some(config),
        format: Format::Text,
        log_level: "off".to_string(),
    };
    let err = run(&args, &mut Vec::new()).unwrap_err();
    assert!(err.to_string().contains("failed to parse TOML configuration"), "{}", err);
}
