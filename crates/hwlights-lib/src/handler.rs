//! Output handlers — turn one light request into parameter writes.

use crate::brightness::scaled_brightness;
use crate::ramp::{self, RAMP_STEPS};
use crate::request::{FlashMode, LightRequest};
use crate::sink::{
    BLINK, BRIGHTNESS, DUTY_PCTS, OutputSink, PAUSE_HI, PAUSE_LO, RAMP_STEP_MS, START_IDX,
    set_param,
};

/// Behavior bound to one physical output group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputHandler {
    /// Steady brightness only. The same value goes to every group.
    SimpleBrightness {
        groups: Vec<String>,
        max_brightness: u32,
    },
    /// Brightness or a timed blink ramp on one group.
    BlinkCapable {
        group: String,
        max_brightness: u32,
        ramp_step_ms: i32,
    },
}

impl OutputHandler {
    /// Groups this handler writes to.
    pub fn groups(&self) -> Vec<&str> {
        match self {
            OutputHandler::SimpleBrightness { groups, .. } => {
                groups.iter().map(String::as_str).collect()
            }
            OutputHandler::BlinkCapable { group, .. } => vec![group.as_str()],
        }
    }

    /// Drive the output to show `state`.
    pub fn apply(&self, sink: &impl OutputSink, state: &LightRequest) {
        match self {
            OutputHandler::SimpleBrightness {
                groups,
                max_brightness,
            } => {
                let brightness = scaled_brightness(state.color, *max_brightness);
                for group in groups {
                    set_param(sink, group, BRIGHTNESS, brightness);
                }
            }
            OutputHandler::BlinkCapable {
                group,
                max_brightness,
                ramp_step_ms,
            } => apply_blink(sink, group, *max_brightness, *ramp_step_ms, state),
        }
    }
}

fn apply_blink(
    sink: &impl OutputSink,
    group: &str,
    max_brightness: u32,
    ramp_step_ms: i32,
    state: &LightRequest,
) {
    let brightness = scaled_brightness(state.color, max_brightness);

    // Blink must be off while the pattern is rewritten.
    set_param(sink, group, BLINK, 0);

    if state.flash_mode != FlashMode::Timed {
        set_param(sink, group, BRIGHTNESS, brightness);
        return;
    }

    let timing = ramp::compute_timing(
        state.flash_on_ms,
        state.flash_off_ms,
        RAMP_STEPS,
        ramp_step_ms,
    );
    let duty = ramp::format_ramp(&ramp::scaled_ramp(brightness));

    set_param(sink, group, START_IDX, 0);
    set_param(sink, group, DUTY_PCTS, duty);
    set_param(sink, group, PAUSE_LO, timing.pause_lo);
    set_param(sink, group, PAUSE_HI, timing.pause_hi);
    set_param(sink, group, RAMP_STEP_MS, timing.step_ms);
    set_param(sink, group, BLINK, 1);
}
