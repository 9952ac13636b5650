//! Integration tests: end-to-end arbitration through the public API.
//!
//! These drive an `Arbiter` built from the default configuration and check
//! the exact parameter writes that reach the sink, in order.

use std::sync::Arc;
use std::thread;

use hwlights_lib::config::Config;
use hwlights_lib::registry::Registry;
use hwlights_lib::sink::SysfsSink;
use hwlights_lib::sink::mock::RecordingSink;
use hwlights_lib::{Arbiter, ChannelKind, LightRequest, LightsError};

fn arbiter() -> Arbiter<RecordingSink> {
    let registry = Registry::from_config(&Config::default()).unwrap();
    Arbiter::new(registry, RecordingSink::new())
}

fn id(kind: ChannelKind) -> i32 {
    kind.id()
}

// ── Test: timed attention blink on an idle registry ──

#[test]
fn attention_timed_blink_end_to_end() {
    let arb = arbiter();
    arb.set_state(
        id(ChannelKind::Attention),
        LightRequest::timed(0xFF00_FF00, 1000, 500),
    )
    .unwrap();

    assert_eq!(
        arb.sink().lines(),
        vec![
            "white/blink=0",
            "white/start_idx=0",
            "white/duty_pcts=0,7,14,21,29,42,49,58",
            "white/pause_lo=500",
            "white/pause_hi=200",
            "white/ramp_step_ms=50",
            "white/blink=1",
        ]
    );
}

// ── Test: indicator priority across attention/notifications/battery ──

#[test]
fn battery_then_attention_attention_wins() {
    let arb = arbiter();
    arb.set_state(id(ChannelKind::Battery), LightRequest::solid(0xFFFF_0000)).unwrap();
    assert_eq!(
        arb.sink().take(),
        arb_lines(&["white/blink=0", "white/brightness=76"])
    );

    arb.set_state(
        id(ChannelKind::Attention),
        LightRequest::timed(0xFFFF_FFFF, 2000, 1000),
    )
    .unwrap();
    let lines: Vec<String> = arb.sink().take().iter().map(ToString::to_string).collect();
    assert_eq!(lines.first().map(String::as_str), Some("white/blink=0"));
    assert_eq!(lines.last().map(String::as_str), Some("white/blink=1"));
    assert!(lines.contains(&"white/pause_hi=1200".to_string()));

    // Battery changes while attention is lit: attention's blink is re-asserted.
    arb.set_state(id(ChannelKind::Battery), LightRequest::solid(0xFF00_FF00)).unwrap();
    let lines = arb.sink().lines();
    assert!(lines.contains(&"white/duty_pcts=0,12,25,37,50,72,85,100".to_string()));
    assert!(!lines.iter().any(|l| l == "white/brightness=149"));
}

#[test]
fn attention_cleared_falls_back_to_battery() {
    let arb = arbiter();
    arb.set_state(id(ChannelKind::Battery), LightRequest::solid(0xFF00_FF00)).unwrap();
    arb.set_state(id(ChannelKind::Attention), LightRequest::solid(0xFFFF_FFFF)).unwrap();
    arb.sink().take();

    arb.set_state(id(ChannelKind::Attention), LightRequest::default()).unwrap();
    assert_eq!(
        arb.sink().lines(),
        vec!["white/blink=0", "white/brightness=149"]
    );
}

#[test]
fn all_indicator_channels_dark_turns_off_with_callers_state() {
    let arb = arbiter();
    arb.set_state(
        id(ChannelKind::Notifications),
        LightRequest::timed(0xFF00_00FF, 500, 500),
    )
    .unwrap();
    arb.sink().take();

    // The off request is applied as sent, including its flash settings.
    arb.set_state(
        id(ChannelKind::Notifications),
        LightRequest::timed(0xFF00_0000, 500, 500),
    )
    .unwrap();
    assert_eq!(
        arb.sink().lines(),
        vec![
            "white/blink=0",
            "white/start_idx=0",
            "white/duty_pcts=0,0,0,0,0,0,0,0",
            "white/pause_lo=500",
            "white/pause_hi=0",
            "white/ramp_step_ms=31",
            "white/blink=1",
        ]
    );
}

// ── Test: buttons and backlight ──

#[test]
fn buttons_drive_both_groups() {
    let arb = arbiter();
    arb.set_state(id(ChannelKind::Buttons), LightRequest::solid(0x80FF_FFFF)).unwrap();
    assert_eq!(
        arb.sink().lines(),
        vec![
            "button-backlight/brightness=128",
            "button-backlight1/brightness=128",
        ]
    );
}

#[test]
fn backlight_scales_to_lcd_range() {
    let arb = arbiter();
    arb.set_state(id(ChannelKind::Backlight), LightRequest::solid(0xFF64_6464)).unwrap();
    // luminance 100 → 100 * 4095 / 255
    assert_eq!(arb.sink().lines(), vec!["lcd-backlight/brightness=1605"]);
}

// ── Test: unsupported channels ──

#[test]
fn unregistered_channel_is_rejected_without_writes() {
    let arb = arbiter();
    let err = arb
        .set_state(id(ChannelKind::Microphone), LightRequest::solid(0xFFFF_FFFF))
        .unwrap_err();
    assert!(matches!(err, LightsError::UnsupportedChannel(8)));
    assert!(arb.sink().writes().is_empty());
    assert_eq!(arb.state(ChannelKind::Microphone), None);
}

// ── Test: enumeration ──

#[test]
fn list_channels_is_stable() {
    let arb = arbiter();
    let before = arb.list_channels();
    arb.set_state(id(ChannelKind::Buttons), LightRequest::solid(1)).unwrap();
    assert_eq!(arb.list_channels(), before);
    let ids: Vec<i32> = before.iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![5, 4, 3, 0, 2]);
}

// ── Test: concurrent callers ──

#[test]
fn concurrent_requests_are_serialized() {
    let arb = Arc::new(arbiter());
    let handles: Vec<_> = [ChannelKind::Attention, ChannelKind::Notifications, ChannelKind::Battery]
        .into_iter()
        .map(|kind| {
            let arb = Arc::clone(&arb);
            thread::spawn(move || {
                for _ in 0..50 {
                    arb.set_state(kind.id(), LightRequest::timed(0xFFFF_FFFF, 1000, 500)).unwrap();
                }
            })
        }).collect();
    for h in handles {
        h.join().unwrap();
    }

    // Each timed application is 7 writes; interleaving would break the
    // disable ... enable framing.
    let writes = arb.sink().lines();
    assert_eq!(writes.len(), 150 * 7);
    for chunk in writes.chunks(7) {
        assert_eq!(chunk[0], "white/blink=0");
        assert_eq!(chunk[6], "white/blink=1");
    }
}

// ── Test: sysfs backend ──

#[test]
fn sysfs_end_to_end_with_missing_node() {
    let dir = tempfile::tempdir().unwrap();
    let white = dir.path().join("white");
    std::fs::create_dir(&white).unwrap();
    for param in ["blink", "brightness"] {
        std::fs::write(white.join(param), "").unwrap();
    }

    let registry = Registry::from_config(&Config::default()).unwrap();
    let arb = Arbiter::new(registry, SysfsSink::new(dir.path()));

    arb.set_state(id(ChannelKind::Battery), LightRequest::solid(0xFFFF_FFFF)).unwrap();
    assert_eq!(std::fs::read_to_string(white.join("blink")).unwrap(), "0");
    assert_eq!(
        std::fs::read_to_string(white.join("brightness")).unwrap(),
        "255"
    );

    // No ramp nodes exist: the writes fail, get logged, and the call succeeds.
    arb.set_state(
        id(ChannelKind::Battery),
        LightRequest::timed(0xFFFF_FFFF, 1000, 1000),
    )
    .unwrap();
    assert_eq!(std::fs::read_to_string(white.join("blink")).unwrap(), "1");
    assert!(!white.join("duty_pcts").exists());
}

fn arb_lines(lines: &[&str]) -> Vec<hwlights_lib::sink::mock::ParamWrite> {
    lines
        .iter()
        .map(|l| {
            let (dest, value) = l.split_once('=').unwrap();
            let (group, param) = dest.split_once('/').unwrap();
            hwlights_lib::sink::mock::ParamWrite::new(group, param, value)
        })
        .collect()
}
