// Command-line tests for resolve, replay and status

use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const EVENTS: &str = r#"{"event":"navigation_started","navigation_id":1,"url":"https://news.example/","at":"2026-03-02T09:00:00Z"}
{"event":"ready_to_commit","navigation_id":1,"url":"https://news.example/"}
{"event":"navigation_finished","navigation_id":1,"url":"https://news.example/"}
{"event":"resource_loaded","url":"https://news.example/app.js","resource_type":"script","total_received_bytes":52000}
{"event":"subresource_blocked","url":"https://securepubads.g.doubleclick.net/tag/js/gpt.js"}
{"event":"timing","first_contentful_paint":420.0}
{"event":"navigation_started","navigation_id":2,"url":"https://news.example/story","at":"2026-03-02T09:05:00Z"}
{"event":"ready_to_commit","navigation_id":2,"url":"https://news.example/story"}
{"event":"navigation_finished","navigation_id":2,"url":"https://news.example/story"}
{"event":"subresource_blocked","url":"https://www.google-analytics.com/analytics.js"}
{"event":"tab_closed"}
"#;

fn write_events(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("events.jsonl");
    fs::write(&path, EVENTS).unwrap();
    path
}

/// Known trackers resolve; unknown domains print a dash
#[test]
fn test_resolve_text() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("savings-predictor");
    cmd.arg("resolve")
        .arg("https://www.google-analytics.com/analytics.js")
        .arg("connect.facebook.net")
        .arg("https://example.com/");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "https://www.google-analytics.com/analytics.js\tGoogle Analytics",
        ))
        .stdout(predicate::str::contains("connect.facebook.net\tFacebook"))
        .stdout(predicate::str::contains("https://example.com/\t-"));
}

#[test]
fn test_resolve_json() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("savings-predictor");
    cmd.arg("--format")
        .arg("json")
        .arg("resolve")
        .arg("https://static.criteo.net/js/ld.js")
        .arg("https://example.com/");

    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let results: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(results[0]["entity"], "Criteo");
    assert!(results[1]["entity"].is_null());
}

/// A custom entity list replaces the packaged one
#[test]
fn test_resolve_custom_entities() {
    let temp_dir = TempDir::new().unwrap();
    let entities = temp_dir.path().join("entities.json");
    fs::write(
        &entities,
        r#"[{"name": "Hotjar", "domains": ["static.hotjar.example"]}]"#,
    )
    .unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("savings-predictor");
    cmd.arg("--entities")
        .arg(&entities)
        .arg("resolve")
        .arg("https://vars.hotjar.example/x")
        .arg("https://www.google-analytics.com/");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("https://vars.hotjar.example/x\tHotjar"))
        .stdout(predicate::str::contains("https://www.google-analytics.com/\t-"));
}

/// A malformed entity list degrades to no classification
#[test]
fn test_resolve_malformed_entities() {
    let temp_dir = TempDir::new().unwrap();
    let entities = temp_dir.path().join("entities.json");
    fs::write(&entities, "{ not a list").unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("savings-predictor");
    cmd.arg("--entities")
        .arg(&entities)
        .arg("resolve")
        .arg("https://www.google-analytics.com/");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("https://www.google-analytics.com/\t-"));
}

#[test]
fn test_replay_records_savings() {
    let temp_dir = TempDir::new().unwrap();
    let events = write_events(temp_dir.path());
    let state = temp_dir.path().join("state.json");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("savings-predictor");
    cmd.arg("--state").arg(&state).arg("replay").arg(&events);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Events: 11"))
        .stdout(predicate::str::contains("Navigation 1:"))
        .stdout(predicate::str::contains("Navigation 2:"))
        .stdout(predicate::str::contains("Buckets reported: [0, 0]"));

    let stored: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&state).unwrap()).unwrap();
    assert!(stored["savings.bandwidth_saved_bytes"].as_u64().unwrap() > 0);
    assert_eq!(
        stored["savings.bandwidth_saved_daily_bytes"]
            .as_array()
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn test_replay_json_matches_status() {
    let temp_dir = TempDir::new().unwrap();
    let events = write_events(temp_dir.path());
    let state = temp_dir.path().join("state.json");

    let mut replay = assert_cmd::cargo::cargo_bin_cmd!("savings-predictor");
    replay
        .arg("--state")
        .arg(&state)
        .arg("--format")
        .arg("json")
        .arg("replay")
        .arg(&events);
    let output = replay.output().unwrap();
    assert!(output.status.success());
    let replayed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(replayed["recorded"].as_array().unwrap().len(), 2);
    let total = replayed["total_recorded"].as_u64().unwrap();
    assert_eq!(replayed["cumulative_bytes"].as_u64(), Some(total));

    let mut status = assert_cmd::cargo::cargo_bin_cmd!("savings-predictor");
    status
        .arg("--state")
        .arg(&state)
        .arg("--format")
        .arg("json")
        .arg("status");
    let output = status.output().unwrap();
    assert!(output.status.success());
    let reported: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(reported["cumulative_bytes"].as_u64(), Some(total));
    assert_eq!(reported["bucket"].as_u64(), Some(0));
    assert_eq!(reported["daily"].as_array().unwrap().len(), 1);
}

/// Replays accumulate into an existing state file
#[test]
fn test_replay_twice_accumulates() {
    let temp_dir = TempDir::new().unwrap();
    let events = write_events(temp_dir.path());
    let state = temp_dir.path().join("state.json");

    let mut totals = Vec::new();
    for _ in 0..2 {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("savings-predictor");
        cmd.arg("--state")
            .arg(&state)
            .arg("--format")
            .arg("json")
            .arg("replay")
            .arg(&events);
        let output = cmd.output().unwrap();
        assert!(output.status.success());
        let replayed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        totals.push(replayed["cumulative_bytes"].as_u64().unwrap());
    }
    assert_eq!(totals[1], totals[0] * 2);
}

#[test]
fn test_replay_off_the_record_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let events = write_events(temp_dir.path());
    let state = temp_dir.path().join("state.json");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("savings-predictor");
    cmd.arg("--state")
        .arg(&state)
        .arg("replay")
        .arg(&events)
        .arg("--off-the-record");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Recorded: 0 bytes"));
    assert!(!state.exists());
}

/// Config can opt off-the-record tabs back in
#[test]
fn test_config_keeps_off_the_record() {
    let temp_dir = TempDir::new().unwrap();
    let events = write_events(temp_dir.path());
    let state = temp_dir.path().join("state.json");
    let config = temp_dir.path().join("savings.toml");
    fs::write(
        &config,
        format!(
            "state_path = {:?}\nskip_off_the_record = false\n",
            state.display().to_string()
        ),
    )
    .unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("savings-predictor");
    cmd.arg("--config")
        .arg(&config)
        .arg("replay")
        .arg(&events)
        .arg("--off-the-record");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Navigation 1:"));
    assert!(state.exists());
}

#[test]
fn test_invalid_config_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("savings.toml");
    fs::write(&config, "state_path = \"\"\n").unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("savings-predictor");
    cmd.arg("--config").arg(&config).arg("status");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("state_path"));
}

#[test]
fn test_replay_bad_event_reports_line() {
    let temp_dir = TempDir::new().unwrap();
    let events = temp_dir.path().join("events.jsonl");
    fs::write(&events, "{\"event\":\"tab_closed\"}\n{\"event\":\"warp\"}\n").unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("savings-predictor");
    cmd.arg("--state")
        .arg(temp_dir.path().join("state.json"))
        .arg("replay")
        .arg(&events);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn test_replay_missing_log() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("savings-predictor");
    cmd.arg("--state")
        .arg(temp_dir.path().join("state.json"))
        .arg("replay")
        .arg(temp_dir.path().join("missing.jsonl"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open event log"));
}

#[test]
fn test_status_without_state() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("savings-predictor");
    cmd.arg("--state")
        .arg(temp_dir.path().join("state.json"))
        .arg("status");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Cumulative: 0 bytes"))
        .stdout(predicate::str::contains("Last 7 days: 0 bytes"))
        .stdout(predicate::str::contains("Bucket: 0"));
}
