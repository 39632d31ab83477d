//! Basic CLI E2E tests.
//!
//! Tests invoke the built `tasbih` binary with HOME pointed at a temp
//! directory, so every test starts from an empty database and config.

use std::process::Command;

use serde_json::Value;
use tempfile::TempDir;

/// Run a CLI command against `home` and return (stdout, stderr, code).
fn run_cli(home: &TempDir, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_tasbih"))
        .args(args)
        .env("HOME", home.path())
        .env("TASBIH_ENV", "dev")
        .env_remove("TASBIH_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(home: &TempDir, args: &[&str]) -> Value {
    let (stdout, stderr, code) = run_cli(home, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

/// Fresh home with sound off so phrase switches do not wait on cues.
fn quiet_home() -> TempDir {
    let home = TempDir::new().unwrap();
    run_json(&home, &["prefs", "sound", "off"]);
    home
}

#[test]
fn test_status_on_fresh_install() {
    let home = TempDir::new().unwrap();
    let status = run_json(&home, &["count", "status"]);
    assert_eq!(status["type"], "StateSnapshot");
    assert_eq!(status["phrase_id"], "subhanallah");
    assert_eq!(status["count"], 0);
    assert_eq!(status["target"], 33);
}

#[test]
fn test_tap_persists_between_runs() {
    let home = quiet_home();
    let events = run_json(&home, &["count", "tap", "--times", "3"]);
    assert_eq!(events.as_array().unwrap().len(), 3);
    assert_eq!(events[2]["type"], "Counted");
    assert_eq!(events[2]["count"], 3);

    let status = run_json(&home, &["count", "status"]);
    assert_eq!(status["count"], 3);
}

#[test]
fn test_reaching_target_advances_phrase() {
    let home = quiet_home();
    run_json(&home, &["target", "set", "2"]);
    let events = run_json(&home, &["count", "tap", "--times", "2"]);
    assert_eq!(events[1]["type"], "PhraseAdvanced");
    assert_eq!(events[1]["to_phrase"], "alhamdulillah");

    let status = run_json(&home, &["count", "status"]);
    assert_eq!(status["phrase_id"], "alhamdulillah");
    assert_eq!(status["count"], 0);
    assert_eq!(status["target"], 33);
}

#[test]
fn test_reset() {
    let home = quiet_home();
    run_json(&home, &["count", "tap", "--times", "5"]);
    let event = run_json(&home, &["count", "reset"]);
    assert_eq!(event["type"], "CountReset");
    assert_eq!(event["previous_count"], 5);
    assert_eq!(run_json(&home, &["count", "status"])["count"], 0);
}

#[test]
fn test_phrase_list_and_select() {
    let home = quiet_home();
    let phrases = run_json(&home, &["phrase", "list"]);
    let phrases = phrases.as_array().unwrap();
    assert_eq!(phrases.len(), 7);
    assert_eq!(phrases[0]["current"], true);
    assert_eq!(phrases[6]["id"], "salawat");

    let event = run_json(&home, &["phrase", "select", "salawat"]);
    assert_eq!(event["type"], "PhraseSelected");
    assert_eq!(event["target"], 10);

    let (_, stderr, code) = run_cli(&home, &["phrase", "select", "nonexistent"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_target_validation() {
    let home = quiet_home();
    for bad in ["0", "-1", "100000", "lots"] {
        let (_, stderr, code) = run_cli(&home, &["target", "set", bad]);
        assert_eq!(code, 1, "target {bad} should be rejected");
        assert!(stderr.contains("error:"));
    }
    let shown = run_json(&home, &["target", "show"]);
    assert_eq!(shown["target"], 33);
    assert_eq!(shown["custom"], false);

    let event = run_json(&home, &["target", "set", "99999"]);
    assert_eq!(event["target"], 99999);
    assert_eq!(run_json(&home, &["target", "show"])["custom"], true);

    let cleared = run_json(&home, &["target", "clear"]);
    assert_eq!(cleared["target"], 33);
    assert_eq!(cleared["custom"], false);
}

#[test]
fn test_prefs() {
    let home = quiet_home();
    let event = run_json(&home, &["prefs", "delay", "400"]);
    assert_eq!(event["type"], "PreferencesChanged");
    assert_eq!(event["transition_delay_ms"], 400);
    assert_eq!(event["sound_enabled"], false);

    let (_, _, code) = run_cli(&home, &["prefs", "delay", "20000"]);
    assert_eq!(code, 1);

    let event = run_json(&home, &["prefs", "vibration", "off"]);
    assert_eq!(event["vibration_enabled"], false);
    assert_eq!(run_json(&home, &["count", "status"])["vibration_enabled"], false);
}

#[test]
fn test_reminder_lifecycle() {
    let home = quiet_home();
    let event = run_json(&home, &["reminder", "set", "05:30"]);
    assert_eq!(event["type"], "ReminderScheduled");
    assert_eq!(event["hour"], 5);

    let status = run_json(&home, &["reminder", "status"]);
    assert_eq!(status["enabled"], true);
    assert_eq!(status["time"], "05:30");
    assert!(status["next_fire_at"].is_string());

    run_json(&home, &["reminder", "off"]);
    let status = run_json(&home, &["reminder", "status"]);
    assert_eq!(status["enabled"], false);
    assert!(status["next_fire_at"].is_null());

    let (_, _, code) = run_cli(&home, &["reminder", "set", "25:00"]);
    assert_ne!(code, 0);
}

#[test]
fn test_config_get_set() {
    let home = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(&home, &["config", "get", "session.transition_delay_ms"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "1500");

    let (_, _, code) = run_cli(&home, &["config", "set", "session.sound", "false"]);
    assert_eq!(code, 0);
    let status = run_json(&home, &["count", "status"]);
    assert_eq!(status["sound_enabled"], false);

    let (_, _, code) = run_cli(&home, &["config", "get", "no.such.key"]);
    assert_eq!(code, 1);

    let list = run_json(&home, &["config", "list"]);
    assert!(list["feedback"]["watchdog_ms"].is_number());
}
