//! Basic CLI E2E tests.
//!
//! Tests invoke the built `pomodoro` binary with an isolated config
//! directory and verify outputs.

use std::io::Write;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(config_dir: &std::path::Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_pomodoro"))
        .args(args)
        .env("POMODORO_CONFIG_DIR", config_dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

#[test]
fn test_format_seconds() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["format", "125"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "02:05");
}

#[test]
fn test_config_set_then_get() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "set", "timer.work_minutes", "45"]);
    assert_eq!(code, 0, "config set failed");
    assert_eq!(stdout.trim(), "timer.work_minutes = 45");

    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "timer.work_minutes"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "45");
    assert!(dir.path().join("config.toml").exists());
}

#[test]
fn test_config_set_rejects_zero_duration() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["config", "set", "timer.break_minutes", "0"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"), "stderr: {stderr}");
}

#[test]
fn test_config_get_unknown_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["config", "get", "timer.nope"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Unknown configuration key: timer.nope"), "stderr: {stderr}");
}

#[test]
fn test_config_list_matches_file() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("[timer]"));
    assert!(stdout.contains("work_minutes = 25"));
    assert!(stdout.contains("bell = true"));
    let on_disk = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert_eq!(stdout, on_disk);
}

#[test]
fn test_run_one_cycle_with_auto_start() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, stderr) = run_cli(
        dir.path(),
        &[
            "run", "--work", "1", "--break", "1", "--cycles", "1", "--auto-start", "--tick-ms", "1",
            "--json",
        ],
    );
    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stdout.contains("Time's up! Take a break."));
    assert!(stdout.contains("Work session 1 started!"));
    assert!(stdout.contains("Session 1 complete!"));
    assert!(!stdout.contains("Work session 2 started!"));
    assert!(stdout.contains("Pomodoro session complete!"));
    assert!(stdout.contains("Completed sessions: 1"));
    assert!(stdout.contains("\"phase\": \"work\""));
}

#[test]
fn test_run_stops_when_idle_without_input() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(
        dir.path(),
        &["run", "--work", "1", "--break", "1", "--tick-ms", "1"],
    );
    assert_eq!(code, 0);
    assert!(stdout.contains("Time's up! Take a break."));
    assert!(stdout.contains("Timer idle and input closed; stopping."));
    assert!(stdout.contains("Completed sessions: 0"));
}

#[test]
fn test_run_rejects_zero_work_flag() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["run", "--work", "0", "--tick-ms", "1"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Invalid work duration '0'"), "stderr: {stderr}");
}

#[test]
fn test_run_prompt_reasks_after_invalid_input() {
    let dir = tempfile::tempdir().unwrap();
    let mut child = Command::new(env!("CARGO_BIN_EXE_pomodoro"))
        .args(["run", "--prompt", "--cycles", "1", "--auto-start", "--tick-ms", "1"])
        .env("POMODORO_CONFIG_DIR", dir.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn CLI");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"abc\n5\n1\n1\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("Invalid work duration 'abc'"));
    assert!(stdout.contains("Completed sessions: 1"));
}

#[test]
fn test_run_announces_each_work_session() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(
        dir.path(),
        &["run", "--work", "1", "--break", "1", "--cycles", "2", "--auto-start", "--tick-ms", "1"],
    );
    assert_eq!(code, 0);
    assert!(stdout.contains("Work session 1 started!"));
    assert!(stdout.contains("Work session 2 started!"));
    assert!(!stdout.contains("Work session 3 started!"));
    assert!(stdout.contains("Completed sessions: 2"));
}

#[test]
fn test_run_exits_after_cycles_with_input_still_open() {
    let dir = tempfile::tempdir().unwrap();
    let mut child = Command::new(env!("CARGO_BIN_EXE_pomodoro"))
        .args(["run", "--work", "1", "--break", "1", "--cycles", "1", "--auto-start", "--tick-ms", "1"])
        .env("POMODORO_CONFIG_DIR", dir.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("Failed to spawn CLI");
    // Held open for the whole run, as a terminal would be.
    let _stdin = child.stdin.take().unwrap();

    let deadline = Instant::now() + Duration::from_secs(20);
    let status = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break status;
        }
        if Instant::now() > deadline {
            let _ = child.kill();
            panic!("pomodoro run did not exit after its last cycle");
        }
        std::thread::sleep(Duration::from_millis(50));
    };
    assert!(status.success());

    let output = child.wait_with_output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Pomodoro session complete!"));
}
