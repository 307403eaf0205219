//! CLI Integration Tests
//!
//! Tests the command-line interface end-to-end.

use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

/// Get the binary to test.
fn cycles() -> Command {
    let mut cmd = Command::cargo_bin("cycles-mcp").unwrap();
    cmd.env_remove("CYCLES_CONFIG").env_remove("RUST_LOG");
    cmd
}

// ============================================================================
// Help & Version Tests
// ============================================================================

#[test]
fn test_help_flag() {
    cycles()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("cycle-based development workflows"));
}

#[test]
fn test_version_flag() {
    cycles()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_invalid_subcommand() {
    cycles().arg("invalid-command-that-does-not-exist").assert().failure();
}

// ============================================================================
// Tools Command Tests
// ============================================================================

#[test]
fn test_tools_lists_every_tool_and_resource() {
    cycles()
        .arg("tools")
        .assert()
        .success()
        .stdout(predicate::str::contains("init-workflow"))
        .stdout(predicate::str::contains("update-progress"))
        .stdout(predicate::str::contains("template://pr"));
}

// ============================================================================
// Call Command Tests
// ============================================================================

#[test]
fn test_call_runs_workflow() {
    let temp = assert_fs::TempDir::new().unwrap();
    let root = temp.path().to_str().unwrap();

    cycles()
        .args(["call", "init-workflow", "--args"])
        .arg(format!(
            r#"{{"workspaceRoot": "{root}", "sizing_mode": "simple", "simple_tier": "senior",
                "cycle_duration_unit": "quarters", "cycle_duration_value": 1, "hours_per_cycle": 120}}"#
        ))
        .assert()
        .success()
        .stdout(predicate::str::contains("✅ Workflow initialized successfully!"))
        .stdout(predicate::str::contains("- Cycle Duration: 1 quarter (3 months)"));

    cycles()
        .args(["call", "create-cycle", "--args"])
        .arg(format!(r#"{{"workspaceRoot": "{root}", "cycleName": "Foundations"}}"#))
        .assert()
        .success();

    temp.child(".cycles-config.json").assert(predicate::path::exists());
    temp.child("WORKFLOW.md").assert(predicate::path::exists());
    temp.child("docs/cycles/01-foundations/README.md")
        .assert(predicate::str::contains("# Cycle 01: Foundations"));
    temp.child("docs/cycles.md").assert(predicate::str::contains("**Total Cycles Planned**: 1"));
}

#[test]
fn test_call_error_exits_nonzero() {
    let temp = assert_fs::TempDir::new().unwrap();
    let root = temp.path().to_str().unwrap();

    cycles()
        .args(["call", "create-cycle", "--args"])
        .arg(format!(r#"{{"workspaceRoot": "{root}", "cycleName": "Early"}}"#))
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::starts_with("❌ Workflow not properly initialized."));
}

#[test]
fn test_call_rejects_malformed_json() {
    cycles()
        .args(["call", "init-workflow", "--args", "{not json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid JSON in --args"));
}

// ============================================================================
// Serve Tests
// ============================================================================

#[test]
fn test_serve_answers_on_stdout() {
    cycles()
        .write_stdin("{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n")
        .assert()
        .success()
        .stdout("{\"jsonrpc\":\"2.0\",\"id\":1,\"result\":{}}\n");
}

#[test]
fn test_serve_with_config_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config = temp.child("cycles.toml");
    config.write_str("[git]\nbase_branch = \"develop\"\n").unwrap();

    cycles()
        .arg("--config")
        .arg(config.path())
        .arg("serve")
        .write_stdin("{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"initialize\"}\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"protocolVersion\":\"2024-11-05\""));
}

#[test]
fn test_serve_with_broken_config_fails() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config = temp.child("cycles.toml");
    config.write_str("[git\n").unwrap();

    cycles()
        .arg("--config")
        .arg(config.path())
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config file"));
}

// ============================================================================
// Completions Tests
// ============================================================================

#[test]
fn test_bash_completions() {
    cycles()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cycles-mcp"));
}
