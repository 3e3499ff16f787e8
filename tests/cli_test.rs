//! Command-line behavior of the `sitegen` binary that needs no network.

use std::process::{Command, Output};

fn sitegen(args: &[&str], dir: &std::path::Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sitegen"))
        .args(args)
        .current_dir(dir)
        .env_remove("GEMINI_API_KEY")
        .env_remove("GOOGLE_API_KEY")
        .env_remove("SITEGEN_LOG_FILE")
        .output()
        .unwrap()
}

#[test]
fn test_empty_prompt_exits_before_connecting() {
    let dir = tempfile::tempdir().unwrap();
    let output = sitegen(&["generate", "--prompt", "", "--output", "out.jpg"], dir.path());

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("prompt is empty"));
    assert!(!stderr.contains("Configuration loaded"));
    assert!(!dir.path().join("out.jpg").exists());
}

#[test]
fn test_missing_api_key_exits_with_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = sitegen(&["generate", "--prompt", "A roof", "--output", "out.jpg"], dir.path());

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("GEMINI_API_KEY"));
}

#[test]
fn test_log_file_receives_log_lines() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("sitegen.log");
    let output = sitegen(
        &["--log-file", log_path.to_str().unwrap(), "list"],
        dir.path(),
    );

    assert!(output.status.success());
    let contents = std::fs::read_to_string(&log_path).unwrap();
    assert!(contents.contains("Starting sitegen"));
    assert!(String::from_utf8_lossy(&output.stdout).contains("backgrounds"));
}

#[test]
fn test_log_file_from_environment() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("from-env.log");
    let output = Command::new(env!("CARGO_BIN_EXE_sitegen"))
        .args(["--json-logs", "--verbose", "list"])
        .current_dir(dir.path())
        .env("SITEGEN_LOG_FILE", &log_path)
        .output()
        .unwrap();

    assert!(output.status.success());
    let contents = std::fs::read_to_string(&log_path).unwrap();
    let first: serde_json::Value = serde_json::from_str(contents.lines().next().unwrap()).unwrap();
    assert_eq!(first["level"], "Info");
    assert!(first["message"].as_str().unwrap().contains("Starting sitegen"));
}
