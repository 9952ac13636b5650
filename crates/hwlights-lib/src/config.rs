//! Service configuration — TOML-based, platform-aware paths.
//!
//! Output group names and maximum raw brightness values differ between
//! devices, so they live here rather than in the arbiter.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Header comment prepended to saved config files.
const CONFIG_HEADER: &str = "# hwlights configuration\n\n";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory containing one subdirectory per LED. Default: "/sys/class/leds".
    #[serde(default = "default_leds_root")]
    pub leds_root: PathBuf,

    /// LED driving the display backlight.
    #[serde(default = "default_lcd_group")]
    pub lcd_group: String,

    /// LEDs behind the capacitive buttons. All receive the same brightness.
    #[serde(default = "default_button_groups")]
    pub button_groups: Vec<String>,

    /// Blink-capable LED shared by attention, notifications and battery.
    #[serde(default = "default_notification_group")]
    pub notification_group: String,

    /// Raw brightness the LCD backlight accepts at full scale.
    #[serde(default = "default_max_lcd_brightness")]
    pub max_lcd_brightness: u32,

    /// Raw brightness the button and notification LEDs accept at full scale.
    #[serde(default = "default_max_led_brightness")]
    pub max_led_brightness: u32,

    /// Time each ramp step stays on during a timed blink, in milliseconds.
    #[serde(default = "default_ramp_step_ms")]
    pub ramp_step_ms: i32,
}

fn default_leds_root() -> PathBuf {
    PathBuf::from("/sys/class/leds")
}
fn default_lcd_group() -> String {
    "lcd-backlight".into()
}
fn default_button_groups() -> Vec<String> {
    vec!["button-backlight".into(), "button-backlight1".into()]
}
fn default_notification_group() -> String {
    "white".into()
}
fn default_max_lcd_brightness() -> u32 {
    4095
}
fn default_max_led_brightness() -> u32 {
    255
}
fn default_ramp_step_ms() -> i32 {
    crate::ramp::RAMP_STEP_DURATION_MS
}

impl Default for Config {
    fn default() -> Self {
        Config {
            leds_root: default_leds_root(),
            lcd_group: default_lcd_group(),
            button_groups: default_button_groups(),
            notification_group: default_notification_group(),
            max_lcd_brightness: default_max_lcd_brightness(),
            max_led_brightness: default_max_led_brightness(),
            ramp_step_ms: default_ramp_step_ms(),
        }
    }
}

/// Validation errors that [`Config::validate`] can return.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A group name is empty or contains a path separator.
    InvalidGroup { field: &'static str, value: String },
    /// `button_groups` has no entries.
    NoButtonGroups,
    /// A maximum brightness is zero.
    ZeroMaxBrightness(&'static str),
    /// `ramp_step_ms` is zero or negative.
    InvalidRampStep(i32),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidGroup { field, value } => {
                write!(f, "Invalid {field}: \"{value}\"")
            }
            ValidationError::NoButtonGroups => write!(f, "button_groups cannot be empty"),
            ValidationError::ZeroMaxBrightness(field) => write!(f, "{field} must be non-zero"),
            ValidationError::InvalidRampStep(ms) => {
                write!(f, "ramp_step_ms must be positive, got {ms}")
            }
        }
    }
}

fn valid_group(name: &str) -> bool {
    let name = name.trim();
    !name.is_empty() && !name.contains('/') && name != "." && name != ".."
}

impl Config {
    /// Platform-specific config directory.
    pub fn dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("hwlights"))
    }

    /// Full path to config file.
    pub fn path() -> Option<PathBuf> {
        Self::dir().map(|d| d.join("config.toml"))
    }

    /// Load config from disk, or return defaults if not found.
    pub fn load() -> Self {
        let (config, warnings) = Self::load_with_warnings();
        for w in &warnings {
            log::warn!("{w}");
        }
        config
    }

    /// Load config from an arbitrary path, returning the config and any parse warnings.
    ///
    /// Returns `(defaults, [])` if the file doesn't exist.
    /// Returns `(defaults, [warning])` if the file exists but can't be parsed.
    pub fn load_from(path: &Path) -> (Self, Vec<String>) {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => (config, vec![]),
                Err(e) => {
                    let warning = format!(
                        "config parse error ({}), using defaults: {e}",
                        path.display()
                    );
                    (Self::default(), vec![warning])
                }
            },
            Err(_) => (Self::default(), vec![]),
        }
    }

    /// Load config from the default path, returning the config and any parse warnings.
    pub fn load_with_warnings() -> (Self, Vec<String>) {
        let Some(path) = Self::path() else {
            return (Self::default(), vec![]);
        };
        Self::load_from(&path)
    }

    /// Save config to an arbitrary path atomically (write to temp file, then rename).
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let serialized = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        let contents = format!("{CONFIG_HEADER}{serialized}");
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, &contents)?;
        match std::fs::rename(&tmp, path) {
            Ok(()) => Ok(()),
            Err(_) => {
                // Rename can fail across filesystems; fall back to direct write + cleanup
                let result = std::fs::write(path, &contents);
                let _ = std::fs::remove_file(&tmp);
                result
            }
        }
    }

    /// Validate the entire config, collecting all errors.
    pub fn validate(&self) -> std::result::Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        let mut check_group = |field: &'static str, value: &str| {
            if !valid_group(value) {
                errors.push(ValidationError::InvalidGroup {
                    field,
                    value: value.to_string(),
                });
            }
        };
        check_group("lcd_group", &self.lcd_group);
        check_group("notification_group", &self.notification_group);
        for g in &self.button_groups {
            check_group("button_groups", g);
        }

        if self.button_groups.is_empty() {
            errors.push(ValidationError::NoButtonGroups);
        }
        if self.max_lcd_brightness == 0 {
            errors.push(ValidationError::ZeroMaxBrightness("max_lcd_brightness"));
        }
        if self.max_led_brightness == 0 {
            errors.push(ValidationError::ZeroMaxBrightness("max_led_brightness"));
        }
        if self.ramp_step_ms <= 0 {
            errors.push(ValidationError::InvalidRampStep(self.ramp_step_ms));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
