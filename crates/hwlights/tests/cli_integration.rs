//! Integration tests for the `hwlights-cli` binary.
//!
//! These run the binary via `assert_cmd` with `--dry-run` (writes recorded and
//! reported on stdout) or against a temporary LED class directory, and with an explicit
//! `--config` so the host's own config never leaks in.

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

fn cli(config_dir: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("hwlights-cli");
    cmd.arg("--config").arg(config_dir.join("config.toml"));
    cmd
}

#[test]
fn cli_help_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    cli(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("hwlights-cli"));
}

#[test]
fn cli_version_prints_version() {
    let dir = tempfile::tempdir().unwrap();
    cli(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

// ── --verbose flag ──

#[test]
fn cli_verbose_flag_accepted() {
    let dir = tempfile::tempdir().unwrap();
    cli(dir.path()).args(["-v", "config"]).assert().success();
}

// ── list ──

#[test]
fn cli_list_human() {
    let dir = tempfile::tempdir().unwrap();
    cli(dir.path())
        .args(["--dry-run", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("attention").and(predicate::str::contains("buttons")));
}

#[test]
fn cli_list_json_in_priority_order() {
    let dir = tempfile::tempdir().unwrap();
    let output = cli(dir.path())
        .args(["--json", "--dry-run", "list"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value =
        serde_json::from_slice(&output).expect("list --json should produce valid JSON");
    assert_eq!(json["count"], 5);
    let kinds: Vec<&str> = json["lights"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["kind"].as_str().unwrap())
        .collect();
    assert_eq!(
        kinds,
        vec!["attention", "notifications", "battery", "backlight", "buttons"]
    );
    assert_eq!(json["lights"][3]["id"], 0);
    assert_eq!(json["lights"][3]["ordinal"], 3);
}

// ── set ──

#[test]
fn cli_set_timed_attention_dry_run() {
    let dir = tempfile::tempdir().unwrap();
    cli(dir.path())
        .args([
            "--dry-run",
            "set",
            "attention",
            "#FF00FF00",
            "--flash",
            "timed",
            "--on-ms",
            "1000",
            "--off-ms",
            "500",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "white/blink=0\n\
             white/start_idx=0\n\
             white/duty_pcts=0,7,14,21,29,42,49,58\n\
             white/pause_lo=500\n\
             white/pause_hi=200\n\
             white/ramp_step_ms=50\n\
             white/blink=1\n",
        ));
}

#[test]
fn cli_set_numeric_id() {
    let dir = tempfile::tempdir().unwrap();
    cli(dir.path())
        .args(["--dry-run", "set", "0", "white"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lcd-backlight/brightness=4095"));
}

#[test]
fn cli_set_unsupported_channel_fails() {
    let dir = tempfile::tempdir().unwrap();
    cli(dir.path())
        .args(["--dry-run", "set", "keyboard", "white"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Unsupported light channel: 1"));
}

#[test]
fn cli_set_bad_color_fails() {
    let dir = tempfile::tempdir().unwrap();
    cli(dir.path())
        .args(["--dry-run", "set", "buttons", "chartreuse"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Color error"));
}

#[test]
fn cli_set_writes_sysfs_root() {
    let dir = tempfile::tempdir().unwrap();
    let leds = dir.path().join("leds");
    for group in ["button-backlight", "button-backlight1"] {
        std::fs::create_dir_all(leds.join(group)).unwrap();
        std::fs::write(leds.join(group).join("brightness"), "0").unwrap();
    }

    cli(dir.path())
        .arg("--root")
        .arg(&leds)
        .args(["set", "buttons", "#80FFFFFF"])
        .assert()
        .success();

    for group in ["button-backlight", "button-backlight1"] {
        let v = std::fs::read_to_string(leds.join(group).join("brightness")).unwrap();
        assert_eq!(v, "128");
    }
}

#[test]
fn cli_set_json_reports_state() {
    let dir = tempfile::tempdir().unwrap();
    let output = cli(dir.path())
        .args(["--json", "set", "battery", "red"])
        .arg("--root")
        .arg(dir.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["ok"], true);
    assert_eq!(json["id"], 3);
    assert_eq!(json["color"], "#FFFF0000");
    assert_eq!(json["state"]["flash_mode"], "none");
}

#[test]
fn cli_set_json_dry_run_is_pure_json() {
    let dir = tempfile::tempdir().unwrap();
    let output = cli(dir.path())
        .args(["--json", "--dry-run", "set", "attention", "green"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value =
        serde_json::from_slice(&output).expect("set --json --dry-run should produce valid JSON");
    assert_eq!(json["ok"], true);
    assert_eq!(json["id"], 5);
    assert_eq!(
        json["writes"],
        serde_json::json!(["white/blink=0", "white/brightness=149"])
    );
}

#[test]
fn cli_set_json_without_dry_run_omits_writes() {
    let dir = tempfile::tempdir().unwrap();
    let output = cli(dir.path())
        .args(["--json", "set", "backlight", "white"])
        .arg("--root")
        .arg(dir.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert!(json.get("writes").is_none());
}

// ── serve ──

#[test]
fn cli_serve_arbitrates_across_lines() {
    let dir = tempfile::tempdir().unwrap();
    let input = concat!(
        r##"{"channel":"battery","color":"#FFFF0000"}"##,
        "\n",
        r#"{"channel":"attention","color":"white"}"#,
        "\n",
        r#"{"channel":"battery","color":"green"}"#,
        "\n",
        r#"{"channel":"keyboard","color":"white"}"#,
        "\n",
    );
    let output = cli(dir.path())
        .args(["--dry-run", "serve"])
        .write_stdin(input)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            r#"{"ok":true,"writes":["white/blink=0","white/brightness=76"]}"#,
            r#"{"ok":true,"writes":["white/blink=0","white/brightness=255"]}"#,
            // attention still lit: battery update re-asserts it
            r#"{"ok":true,"writes":["white/blink=0","white/brightness=255"]}"#,
            r#"{"ok":false,"error":"Unsupported light channel: 1"}"#,
        ]
    );
}

// ── config ──

#[test]
fn cli_config_json_produces_valid_json() {
    let dir = tempfile::tempdir().unwrap();
    let output = cli(dir.path())
        .args(["--json", "config"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value =
        serde_json::from_slice(&output).expect("config --json should produce valid JSON");
    assert!(json["settings"].is_object());
    assert_eq!(json["config_file_exists"], false);
    assert_eq!(json["settings"]["notification_group"], "white");
    assert_eq!(json["problems"].as_array().unwrap().len(), 0);
}

#[test]
fn cli_config_reports_problems_and_set_refuses() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.toml"), "max_led_brightness = 0\n").unwrap();

    cli(dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("max_led_brightness must be non-zero"));

    cli(dir.path())
        .args(["--dry-run", "set", "buttons", "white"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config error"));
}
