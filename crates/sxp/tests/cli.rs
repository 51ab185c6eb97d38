//! End-to-end tests for the `sxp` binary.
//!
//! Every invocation points `SXP_CONFIG` into a temporary directory so the
//! user's own configuration never leaks into the results.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use serde_json::{json, Value};
use tempfile::TempDir;

const USERS: &str = r#"[
  {"name": "John Smith", "status": "active", "age": 50},
  {"name": "Alice", "status": "inactive", "age": 31},
  {"name": "Bob", "status": "active", "age": 42}
]"#;

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    fn write_users(&self) -> PathBuf {
        let path = self.dir.path().join("users.json");
        fs::write(&path, USERS).unwrap();
        path
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_sxp"));
        cmd.env("SXP_CONFIG", self.config_path())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command().args(args).output().unwrap()
    }

    fn run_with_stdin(&self, args: &[&str], stdin: &str) -> Output {
        let mut child = self
            .command()
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap();
        child
            .stdin
            .take()
            .unwrap()
            .write_all(stdin.as_bytes())
            .unwrap();
        child.wait_with_output().unwrap()
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

fn names(output: &Output) -> Vec<String> {
    stdout(output)
        .lines()
        .map(|line| {
            let record: Value = serde_json::from_str(line).unwrap();
            record["name"].as_str().unwrap().to_string()
        })
        .collect()
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

// ============================================================================
// parse
// ============================================================================

#[test]
fn test_parse_prints_tree() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["parse", "name:john OR name:bob"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "OR [0, 21] name:john OR name:bob\n  KEY-VALUE [0, 9] name = john\n  KEY-VALUE [13, 21] name = bob\n"
    );
}

#[test]
fn test_parse_json_output() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["--json", "parse", "NOT a"]);

    assert!(output.status.success());
    let tree: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(tree["type"], "NOT");
    assert_eq!(tree["range"], json!([0, 5]));
    assert_eq!(tree["child"]["type"], "VALUE");
    assert_eq!(tree["child"]["value"]["content"], "a");
    assert_eq!(tree["child"]["value"]["hasQuotes"], false);
}

#[test]
fn test_parse_invalid_query() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["parse", "a AND"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert_eq!(stderr(&output).trim(), "Error: invalid search expression");
}

#[test]
fn test_parse_invalid_query_json_error() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["--json", "parse", "(a"]);

    assert_eq!(output.status.code(), Some(1));
    let error: Value = serde_json::from_str(&stderr(&output)).unwrap();
    assert_eq!(error["error"]["code"], "PARSE_ERROR");
    assert_eq!(error["error"]["message"], "invalid search expression");
}

// ============================================================================
// filter
// ============================================================================

#[test]
fn test_filter_from_file() {
    let sandbox = Sandbox::new();
    let users = sandbox.write_users();
    let output = sandbox.run(&["filter", "status:active", "--input", path_arg(&users)]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(names(&output), ["John Smith", "Bob"]);
}

#[test]
fn test_filter_from_stdin() {
    let sandbox = Sandbox::new();
    let output = sandbox.run_with_stdin(&["filter", "NOT status:active"], USERS);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(names(&output), ["Alice"]);
}

#[test]
fn test_filter_contains_mode_and_count() {
    let sandbox = Sandbox::new();
    let users = sandbox.write_users();
    let output = sandbox.run(&[
        "--json",
        "filter",
        "name:o",
        "--mode",
        "contains",
        "--count",
        "--input",
        path_arg(&users),
    ]);

    assert!(output.status.success());
    let count: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(count, json!({"count": 2}));
}

#[test]
fn test_filter_limit() {
    let sandbox = Sandbox::new();
    let users = sandbox.write_users();
    let output = sandbox.run(&["filter", "age:50 OR age:42 OR age:31", "--limit", "1", "-i", path_arg(&users)]);

    assert!(output.status.success());
    assert_eq!(names(&output), ["John Smith"]);
}

#[test]
fn test_filter_unknown_key_suggests() {
    let sandbox = Sandbox::new();
    let users = sandbox.write_users();
    let output = sandbox.run(&["filter", "stauts:active", "--input", path_arg(&users)]);

    assert_eq!(output.status.code(), Some(2));
    let message = stderr(&output);
    assert!(message.contains("unknown key 'stauts'"), "stderr: {message}");
    assert!(message.contains("Did you mean 'status'?"), "stderr: {message}");
}

#[test]
fn test_filter_rejects_non_array_input() {
    let sandbox = Sandbox::new();
    let output = sandbox.run_with_stdin(&["--json", "filter", "a"], r#"{"name": "x"}"#);

    assert_eq!(output.status.code(), Some(4));
    let error: Value = serde_json::from_str(&stderr(&output)).unwrap();
    assert_eq!(error["error"]["code"], "INPUT_ERROR");
}

#[test]
fn test_filter_respects_config_file() {
    let sandbox = Sandbox::new();
    fs::write(sandbox.config_path(), "[filter]\nallow_bare_values = false\n").unwrap();
    let users = sandbox.write_users();

    let output = sandbox.run(&["filter", "alice", "--input", path_arg(&users)]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("bare value 'alice' is not allowed"));

    let output = sandbox.run(&["filter", "name:alice", "--input", path_arg(&users)]);
    assert!(output.status.success());
    assert_eq!(names(&output), ["Alice"]);
}

#[test]
fn test_broken_config_is_reported() {
    let sandbox = Sandbox::new();
    fs::write(sandbox.config_path(), "[filter\n").unwrap();

    let output = sandbox.run(&["parse", "a"]);
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("configuration error"));
}

// ============================================================================
// config and completions
// ============================================================================

#[test]
fn test_config_path_and_init() {
    let sandbox = Sandbox::new();

    let output = sandbox.run(&["config", "path"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), sandbox.config_path().display().to_string());

    let output = sandbox.run(&["config", "init"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(sandbox.config_path().exists());

    let output = sandbox.run(&["config", "init"]);
    assert_eq!(output.status.code(), Some(5));

    let output = sandbox.run(&["--json", "config", "show"]);
    assert!(output.status.success());
    let shown: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(shown["exists"], true);
    assert_eq!(shown["config"]["version"], 1);
}

#[test]
fn test_completions_bash() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["completions", "bash"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("sxp"));
}
