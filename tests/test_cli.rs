// CLI integration tests for exprbridge

use std::io::Write;
use std::process::Command;

use tempfile::{NamedTempFile, TempDir};

fn exprbridge(config_home: &TempDir) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_exprbridge"));
    command
        .env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("RUST_LOG");
    command
}

/// Test that --help lists the subcommands
#[test]
fn test_help_lists_subcommands() {
    let home = TempDir::new().unwrap();
    let output = exprbridge(&home).arg("--help").output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Help should exit with success");
    for subcommand in ["tokens", "tree", "lint", "format", "hover", "complete", "functions"] {
        assert!(
            stdout.contains(subcommand),
            "Help should mention {}. Got: {}",
            subcommand,
            stdout
        );
    }
}

/// The function catalog needs no analyzer library
#[test]
fn test_functions_prints_catalog() {
    let home = TempDir::new().unwrap();
    let output = exprbridge(&home).arg("functions").output().unwrap();
    assert!(output.status.success());

    let functions: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<_> = functions
        .as_array()
        .unwrap()
        .iter()
        .map(|function| function["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names.len(), 24);
    assert_eq!(names[0], "UPPER");
    assert!(names.contains(&"MAX".to_string()));
}

/// Completion works from the catalog alone
#[test]
fn test_complete_without_library() {
    let home = TempDir::new().unwrap();
    let mut input = NamedTempFile::new().unwrap();
    write!(input, "MA").unwrap();

    let output = exprbridge(&home)
        .args(["complete", input.path().to_str().unwrap(), "2"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let list: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(list["from"], 0);
    assert_eq!(list["items"][0]["label"], "MAX");
}

/// Analyzer-backed commands fail cleanly when no library is configured
#[test]
fn test_lint_without_library_fails_with_hint() {
    let home = TempDir::new().unwrap();
    let mut input = NamedTempFile::new().unwrap();
    write!(input, "1 + 2").unwrap();

    let output = exprbridge(&home)
        .args(["lint", input.path().to_str().unwrap()])
        .output()
        .unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("--library"), "Got: {}", stderr);
}

/// Extra functions from the config file show up in the catalog
#[test]
fn test_config_file_extends_catalog() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("extra.toml");
    std::fs::write(
        &config,
        "[[functions]]\nname = \"PI\"\nsyntax = \"PI()\"\ndescription = \"The constant pi.\"\n",
    )
    .unwrap();

    let output = exprbridge(&home)
        .args(["--config", config.to_str().unwrap(), "functions"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let functions: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let last = functions.as_array().unwrap().last().unwrap();
    assert_eq!(last["name"], "PI");
}
