//! Blink ramp generation — duty-cycle steps and pause/step timing.
//!
//! A timed blink ramps up through [`BRIGHTNESS_RAMP`], holds for `pause_hi`,
//! ramps back down and stays dark for `pause_lo`.

/// Number of duty-cycle steps in one ramp.
pub const RAMP_STEPS: i32 = 8;

/// Default time each step stays on, in milliseconds.
pub const RAMP_STEP_DURATION_MS: i32 = 50;

/// Duty percent (0-100) of the LED PWM at each step.
pub const BRIGHTNESS_RAMP: [u32; RAMP_STEPS as usize] = [0, 12, 25, 37, 50, 72, 85, 100];

/// Step duration and hold times for a timed blink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkTiming {
    pub step_ms: i32,
    pub pause_hi: i32,
    pub pause_lo: i32,
}

/// Scale each ramp step by `brightness / 255`.
pub fn scaled_ramp(brightness: u32) -> [u32; RAMP_STEPS as usize] {
    BRIGHTNESS_RAMP.map(|step| (u64::from(step) * u64::from(brightness) / 0xFF) as u32)
}

/// Serialize a ramp the way the LED driver expects it: `"0,7,14"`.
pub fn format_ramp(ramp: &[u32]) -> String {
    ramp.iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Compute blink timing for the requested on/off durations.
///
/// If `flash_on_ms` cannot fit a ramp up and down at `default_step_ms`, the
/// step duration shrinks so the ramp fills the on-time exactly and there is
/// no hold at the peak. The shrunk step may round down to 0.
pub fn compute_timing(
    flash_on_ms: i32,
    flash_off_ms: i32,
    step_count: i32,
    default_step_ms: i32,
) -> BlinkTiming {
    let pause_lo = flash_off_ms;

    if step_count <= 0 {
        return BlinkTiming {
            step_ms: default_step_ms,
            pause_hi: flash_on_ms.max(0),
            pause_lo,
        };
    }

    let on = i64::from(flash_on_ms);
    let passes = i64::from(step_count) * 2;
    let pause_hi = on - i64::from(default_step_ms) * passes;

    if pause_hi < 0 {
        BlinkTiming {
            step_ms: clamp_i32(on / passes),
            pause_hi: 0,
            pause_lo,
        }
    } else {
        BlinkTiming {
            step_ms: default_step_ms,
            pause_hi: clamp_i32(pause_hi),
            pause_lo,
        }
    }
}

fn clamp_i32(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
