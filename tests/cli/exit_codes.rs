//! Exit status of the built binary for failures that need no broker

use std::process::{Command, Output};
use tempfile::TempDir;

fn run(args: &[&str]) -> Output {
    // Keep any real user configuration out of the way
    let home = TempDir::new().unwrap();
    Command::new(env!("CARGO_BIN_EXE_streamlag"))
        .args(args)
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .output()
        .unwrap()
}

#[test]
fn test_help_exits_zero() {
    let output = run(&["--help"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("--stream"));
}

#[test]
fn test_unknown_flag_exits_two() {
    assert_eq!(run(&["--bogus"]).status.code(), Some(2));
}

#[test]
fn test_missing_stream_exits_two() {
    let output = run(&["-u", "nats://127.0.0.1:1", "--no-color"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--stream"));
}

#[test]
fn test_missing_config_file_exits_two() {
    let output = run(&["-s", "ORDERS", "-c", "/nonexistent/streamlag.toml"]);
    assert_eq!(output.status.code(), Some(2));
}
