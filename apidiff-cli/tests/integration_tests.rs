//! Integration tests for the apidiff CLI
//!
//! Tests end-to-end behavior using the CLI binary.
//! Uses tempfile for isolated test directories.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// Get the path to the apidiff binary (built by cargo)
fn apidiff_binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_apidiff"))
}

/// Run apidiff with the given args in the specified directory
fn run_apidiff(dir: &Path, args: &[&str]) -> Output {
    apidiff_binary()
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute apidiff")
}

/// Get stdout as string
fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Get stderr as string
fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write test file");
    path
}

const BASE_JSON: &str = r#"{
  "openapi": "3.0.3",
  "info": {"title": "Items", "version": "1.0.0"},
  "paths": {
    "/items": {
      "get": {
        "parameters": [
          {"name": "name", "in": "query", "schema": {"type": "string"}}
        ],
        "responses": {"200": {"description": "ok"}}
      }
    }
  }
}"#;

/// Same API as `BASE_JSON`, in YAML.
const BASE_YAML: &str = r#"openapi: 3.0.3
info:
  title: Items
  version: 1.0.0
paths:
  /items:
    get:
      parameters:
        - name: name
          in: query
          schema:
            type: string
      responses:
        "200":
          description: ok
"#;

/// Adds `/widgets`; nothing breaking.
const ADDED_PATH_YAML: &str = r#"openapi: 3.0.3
info:
  title: Items
  version: 1.0.0
paths:
  /items:
    get:
      parameters:
        - name: name
          in: query
          schema:
            type: string
      responses:
        "200":
          description: ok
  /widgets:
    get:
      responses:
        "200":
          description: ok
"#;

/// Makes the `name` parameter required and adds `/widgets`.
const REQUIRED_PARAM_YAML: &str = r#"openapi: 3.0.3
info:
  title: Items
  version: 1.0.0
paths:
  /items:
    get:
      parameters:
        - name: name
          in: query
          required: true
          schema:
            type: string
      responses:
        "200":
          description: ok
  /widgets:
    get:
      responses:
        "200":
          description: ok
"#;

/// Sets up a directory holding `base.json` plus `revision.yaml`.
fn setup(revision: &str) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write_file(temp_dir.path(), "base.json", BASE_JSON);
    write_file(temp_dir.path(), "revision.yaml", revision);
    temp_dir
}

fn compare(dir: &Path, extra: &[&str]) -> Output {
    let mut args = vec!["--base", "base.json", "--revision", "revision.yaml"];
    args.extend_from_slice(extra);
    run_apidiff(dir, &args)
}

// ============================================================================
// Basic Behavior
// ============================================================================

#[test]
fn test_identical_documents() {
    let temp_dir = setup(BASE_YAML);
    let output = compare(temp_dir.path(), &["--fail-on-diff"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "{}");
}

#[test]
fn test_diff_found_without_fail_flag() {
    let temp_dir = setup(ADDED_PATH_YAML);
    let output = compare(temp_dir.path(), &[]);

    assert_eq!(output.status.code(), Some(0));
    let stdout_str = stdout(&output);
    assert!(stdout_str.contains("paths_diff"), "got: {}", stdout_str);
    assert!(stdout_str.contains("/widgets"), "got: {}", stdout_str);
}

#[test]
fn test_fail_on_diff() {
    let temp_dir = setup(ADDED_PATH_YAML);
    let output = compare(temp_dir.path(), &["--fail-on-diff"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_help_exits_successfully() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = run_apidiff(temp_dir.path(), &["--help"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("--breaking-only"));
}

// ============================================================================
// Options
// ============================================================================

#[test]
fn test_prefix() {
    let temp_dir = setup(&BASE_YAML.replace("/items:", "/v2/items:"));

    let output = compare(temp_dir.path(), &[]);
    assert!(stdout(&output).contains("/v2/items"));

    let output = compare(temp_dir.path(), &["--prefix", "/v2", "--fail-on-diff"]);
    assert_eq!(output.status.code(), Some(0), "stdout: {}", stdout(&output));
    assert_eq!(stdout(&output).trim(), "{}");
}

#[test]
fn test_filter() {
    let temp_dir = setup(ADDED_PATH_YAML);
    let output = compare(temp_dir.path(), &["--filter", "^/items", "--fail-on-diff"]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output).trim(), "{}");
}

#[test]
fn test_breaking_only() {
    let temp_dir = setup(ADDED_PATH_YAML);
    let output = compare(temp_dir.path(), &["--breaking-only", "--fail-on-diff"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output).trim(), "{}");

    let temp_dir = setup(REQUIRED_PARAM_YAML);
    let output = compare(temp_dir.path(), &["--breaking-only", "--format", "json"]);
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let paths = &json["paths_diff"];
    assert!(paths.get("added").is_none(), "added paths are not breaking");
    assert!(paths["modified"]["/items"].is_object());
}

#[test]
fn test_config_file_defaults() {
    let temp_dir = setup(ADDED_PATH_YAML);
    write_file(
        temp_dir.path(),
        ".apidiff.toml",
        "[diff]\nfilter = \"^/items\"\n\n[output]\nformat = \"json\"\n",
    );

    let output = compare(temp_dir.path(), &[]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output).trim(), "{}");

    // Flags win over the file
    let output = compare(temp_dir.path(), &["--filter", "^/widgets"]);
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["paths_diff"]["added"][0], "/widgets");
}

// ============================================================================
// Output Formats
// ============================================================================

#[test]
fn test_json_format() {
    let temp_dir = setup(ADDED_PATH_YAML);
    let output = compare(temp_dir.path(), &["--format", "json"]);

    let json: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("output should be valid JSON");
    assert_eq!(json["paths_diff"]["added"][0], "/widgets");
}

#[test]
fn test_text_format() {
    let temp_dir = setup(REQUIRED_PARAM_YAML);
    let output = compare(temp_dir.path(), &["--format", "text"]);

    let stdout_str = stdout(&output);
    assert!(stdout_str.starts_with("# API Changelog"));
    assert!(stdout_str.contains("## Breaking Changes: 1"), "got: {}", stdout_str);
    assert!(stdout_str.contains("## New Paths: 1"));
    assert!(stdout_str.contains("- `/widgets`"));
}

#[test]
fn test_html_format() {
    let temp_dir = setup(ADDED_PATH_YAML);
    let output = compare(temp_dir.path(), &["--format", "html"]);

    let stdout_str = stdout(&output);
    assert!(stdout_str.starts_with("<!DOCTYPE html>"));
    assert!(stdout_str.contains("<h1>API Changelog</h1>"));
    assert!(stdout_str.contains("<code>/widgets</code>"));
}

#[test]
fn test_summary() {
    let temp_dir = setup(REQUIRED_PARAM_YAML);
    let output = compare(temp_dir.path(), &["--summary", "--format", "json"]);

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["diff"], true);
    assert_eq!(json["breaking"], true);
    assert_eq!(json["details"]["paths"]["added"], 1);
    assert_eq!(json["details"]["paths"]["modified"], 1);
    assert_eq!(json["details"]["endpoints"]["modified"], 1);
}

// ============================================================================
// Exit Statuses
// ============================================================================

#[test]
fn test_invalid_flag() {
    let temp_dir = setup(BASE_YAML);
    let output = compare(temp_dir.path(), &["--no-such-flag"]);
    assert_eq!(output.status.code(), Some(101));
}

#[test]
fn test_missing_base() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write_file(temp_dir.path(), "revision.yaml", BASE_YAML);
    let output = compare(temp_dir.path(), &[]);

    assert_eq!(output.status.code(), Some(102));
    assert!(stderr(&output).contains("failed to load base document"));
}

#[test]
fn test_missing_revision() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write_file(temp_dir.path(), "base.json", BASE_JSON);
    let output = compare(temp_dir.path(), &[]);

    assert_eq!(output.status.code(), Some(103));
    assert!(stderr(&output).contains("failed to load revision document"));
}

#[test]
fn test_malformed_revision() {
    let temp_dir = setup("openapi: [unclosed\n");
    let output = compare(temp_dir.path(), &[]);
    assert_eq!(output.status.code(), Some(103));
}

#[test]
fn test_invalid_filter() {
    let temp_dir = setup(BASE_YAML);
    let output = compare(temp_dir.path(), &["--filter", "("]);

    assert_eq!(output.status.code(), Some(104));
    assert!(stderr(&output).contains("Invalid path filter"));
}

#[test]
fn test_unsupported_config_format() {
    let temp_dir = setup(BASE_YAML);
    write_file(temp_dir.path(), ".apidiff.toml", "[output]\nformat = \"pdf\"\n");
    let output = compare(temp_dir.path(), &[]);

    assert_eq!(output.status.code(), Some(108));
    assert!(stderr(&output).contains("Unknown output format"));
}
