use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const DEFINITIONS: &str = r#"
settings:
  platform_types: true
commands:
  - path: [command, foo]
    scope: { guilds: [1] }
    arguments:
      - { name: integer, parser: integer, min: 1, max: 10 }
  - path: [command, bar]
    scope: { guilds: [2] }
    arguments:
      - { name: string, parser: string, choices: [cat, dog] }
  - path: [ping]
    description: Ping the bot
"#;

const BROKEN: &str = r#"
commands:
  - path: [ok]
  - path: [mixed, sub]
  - path: [mixed]
    arguments:
      - { name: value, parser: string }
"#;

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("failed to write test file");
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_slash-schema"))
        .args(args)
        .output()
        .expect("failed to run slash-schema")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn compile_global_prints_json_package() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "commands.yaml", DEFINITIONS);

    let output = run(&["compile", "--input", path_arg(&input)]);
    assert!(output.status.success(), "{output:?}");

    let package: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(package["scope"], "global");
    let commands = package["commands"].as_array().unwrap();
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0]["name"], "ping");
    assert_eq!(commands[0]["description"], "Ping the bot");
}

#[test]
fn compile_guild_scope_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "commands.yaml", DEFINITIONS);
    let out = dir.path().join("nested").join("guild-2.json");

    let output = run(&[
        "compile",
        "--input",
        path_arg(&input),
        "--scope",
        "2",
        "--output",
        path_arg(&out),
    ]);
    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Compiled 1 command(s)"), "stdout: {stdout}");

    let raw = fs::read_to_string(&out).unwrap();
    let package: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let command = &package["commands"][0];
    assert_eq!(command["name"], "command");
    let names: Vec<&str> = command["options"]
        .as_array()
        .unwrap()
        .iter()
        .map(|option| option["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["foo", "bar"]);
    assert_eq!(command["options"][1]["options"][0]["choices"][1]["value"], "dog");
}

#[test]
fn compile_reports_failed_roots_and_exits_non_zero() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "broken.yaml", BROKEN);

    let output = run(&["compile", "--input", path_arg(&input)]);
    assert!(!output.status.success());

    let package: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(package["commands"].as_array().unwrap().len(), 1);
    assert_eq!(package["commands"][0]["name"], "ok");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("mixed"), "stderr: {stderr}");
    assert!(stderr.contains("1 command(s) failed to compile"), "stderr: {stderr}");
}

#[test]
fn compile_markdown_format() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "commands.yaml", DEFINITIONS);

    let output = run(&[
        "compile",
        "--input",
        path_arg(&input),
        "--scope",
        "1",
        "--format",
        "markdown",
    ]);
    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("## /command"), "stdout: {stdout}");
    assert!(stdout.contains("range: 1..=10"), "stdout: {stdout}");
}

#[test]
fn scopes_lists_each_root() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "commands.yaml", DEFINITIONS);

    let output = run(&["scopes", "--input", path_arg(&input)]);
    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("command  guilds(1, 2)"), "stdout: {stdout}");
    assert!(stdout.contains("ping     global"), "stdout: {stdout}");
}

#[test]
fn validate_accepts_compiled_package_and_rejects_bad_one() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "commands.yaml", DEFINITIONS);
    let good = dir.path().join("good.json");

    let output = run(&[
        "compile",
        "--input",
        path_arg(&input),
        "--scope",
        "1",
        "--output",
        path_arg(&good),
    ]);
    assert!(output.status.success(), "{output:?}");

    let output = run(&["validate", path_arg(&good)]);
    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Validated 1 package file(s) with 1 command(s)."),
        "stdout: {stdout}"
    );

    let bad_package = serde_json::json!({
        "scope": "global",
        "commands": [{
            "name": "bad",
            "description": "bad",
            "options": [{
                "kind": "variable",
                "name": "value",
                "description": "value",
                "type": { "name": "BOOLEAN", "code": 5 },
                "required": true,
                "autocomplete": true
            }]
        }]
    });
    let bad = write_file(&dir, "bad.json", &bad_package.to_string());
    let output = run(&["validate", path_arg(&bad)]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("autocomplete not supported"), "stderr: {stderr}");
}

#[test]
fn types_lists_platform_codes() {
    let output = run(&["types"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("  3  STRING"));
    assert!(!stdout.contains("USER"));

    let output = run(&["types", "--platform"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("  6  USER"));
    assert!(stdout.contains(" 11  ATTACHMENT"));
}

#[test]
fn missing_input_is_reported() {
    let output = run(&["compile", "--input", "/nonexistent/commands.yaml"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("error: Failed to load"), "stderr: {stderr}");
}
