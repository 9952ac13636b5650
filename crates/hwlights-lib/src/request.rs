//! Light request types, channel identities and their textual forms.
//!
//! Colors are packed `0xAARRGGBB`. A request is "lit" when any of its RGB
//! bits are set; alpha does not count.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::LightsError;

/// Logical light channel. The discriminant is the id used on the request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Backlight = 0,
    Keyboard = 1,
    Buttons = 2,
    Battery = 3,
    Notifications = 4,
    Attention = 5,
    Bluetooth = 6,
    Wifi = 7,
    Microphone = 8,
    Camera = 9,
}

impl ChannelKind {
    pub const ALL: [ChannelKind; 10] = [
        ChannelKind::Backlight,
        ChannelKind::Keyboard,
        ChannelKind::Buttons,
        ChannelKind::Battery,
        ChannelKind::Notifications,
        ChannelKind::Attention,
        ChannelKind::Bluetooth,
        ChannelKind::Wifi,
        ChannelKind::Microphone,
        ChannelKind::Camera,
    ];

    /// Map a raw channel id to its kind.
    pub fn from_id(id: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.id() == id)
    }

    pub fn id(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            ChannelKind::Backlight => "backlight",
            ChannelKind::Keyboard => "keyboard",
            ChannelKind::Buttons => "buttons",
            ChannelKind::Battery => "battery",
            ChannelKind::Notifications => "notifications",
            ChannelKind::Attention => "attention",
            ChannelKind::Bluetooth => "bluetooth",
            ChannelKind::Wifi => "wifi",
            ChannelKind::Microphone => "microphone",
            ChannelKind::Camera => "camera",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChannelKind {
    type Err = LightsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| LightsError::Request(format!("Unknown light channel: {s}")))
    }
}

/// Resolve a channel argument given either by name or by numeric id.
///
/// Numeric ids are passed through unchecked so the arbiter can report them
/// as unsupported.
pub fn parse_channel_id(s: &str) -> crate::error::Result<i32> {
    let s = s.trim();
    if let Ok(id) = s.parse::<i32>() {
        return Ok(id);
    }
    s.parse::<ChannelKind>().map(ChannelKind::id)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashMode {
    #[default]
    None,
    Timed,
    Hardware,
}

impl FromStr for FlashMode {
    type Err = LightsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(FlashMode::None),
            "timed" => Ok(FlashMode::Timed),
            "hardware" => Ok(FlashMode::Hardware),
            other => Err(LightsError::Request(format!("Unknown flash mode: {other}"))),
        }
    }
}

/// Carried with each request; the arithmetic ignores it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BrightnessMode {
    #[default]
    User,
    Sensor,
    LowPersistence,
}

impl FromStr for BrightnessMode {
    type Err = LightsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "user" => Ok(BrightnessMode::User),
            "sensor" => Ok(BrightnessMode::Sensor),
            "low-persistence" => Ok(BrightnessMode::LowPersistence),
            other => Err(LightsError::Request(format!(
                "Unknown brightness mode: {other}"
            ))),
        }
    }
}

/// Requested state of one light channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightRequest {
    /// Packed `0xAARRGGBB`.
    pub color: u32,
    pub flash_mode: FlashMode,
    pub flash_on_ms: i32,
    pub flash_off_ms: i32,
    pub brightness_mode: BrightnessMode,
}

impl LightRequest {
    /// A steady request for `color`.
    pub fn solid(color: u32) -> Self {
        LightRequest {
            color,
            ..Default::default()
        }
    }

    /// A timed blink request for `color`.
    pub fn timed(color: u32, flash_on_ms: i32, flash_off_ms: i32) -> Self {
        LightRequest {
            color,
            flash_mode: FlashMode::Timed,
            flash_on_ms,
            flash_off_ms,
            brightness_mode: BrightnessMode::User,
        }
    }

    /// True when any RGB bit is set. Alpha is ignored.
    pub fn is_lit(&self) -> bool {
        self.color & 0x00FF_FFFF != 0
    }
}

/// Parse a color string into packed `0xAARRGGBB`.
///
/// Accepts:
/// - Hex: `"#AARRGGBB"`, `"#RRGGBB"` (opaque), with `#`, `0x` or no prefix
/// - Named: `"red"`, `"green"`, `"blue"`, `"white"`, `"orange"`, `"yellow"`,
///   `"purple"`, `"cyan"`, `"black"`, `"off"`
pub fn parse_color(s: &str) -> crate::error::Result<u32> {
    let s = s.trim();

    match s.to_lowercase().as_str() {
        "red" => return Ok(0xFFFF_0000),
        "green" => return Ok(0xFF00_FF00),
        "blue" => return Ok(0xFF00_00FF),
        "white" => return Ok(0xFFFF_FFFF),
        "orange" => return Ok(0xFFFF_8000),
        "yellow" => return Ok(0xFFFF_FF00),
        "purple" => return Ok(0xFF80_00FF),
        "cyan" => return Ok(0xFF00_FFFF),
        "black" => return Ok(0xFF00_0000),
        "off" => return Ok(0x0000_0000),
        _ => {}
    }

    let hex = s
        .strip_prefix('#')
        .or_else(|| s.strip_prefix("0x"))
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    if (hex.len() != 6 && hex.len() != 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(LightsError::Color(format!(
            "Invalid color: {s} (use #AARRGGBB, #RRGGBB or a color name)"
        )));
    }
    let val = u32::from_str_radix(hex, 16)
        .map_err(|_| LightsError::Color(format!("Invalid hex color: {s}")))?;
    if hex.len() == 6 {
        Ok(0xFF00_0000 | val)
    } else {
        Ok(val)
    }
}

/// Format a packed color as `#AARRGGBB`.
pub fn format_color(color: u32) -> String {
    format!("#{color:08X}")
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ChannelRef {
    Id(i32),
    Name(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorValue {
    Packed(u32),
    Text(String),
}

impl Default for ColorValue {
    fn default() -> Self {
        ColorValue::Packed(0)
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RequestLine {
    channel: ChannelRef,
    #[serde(default)]
    color: ColorValue,
    #[serde(default)]
    flash_mode: FlashMode,
    #[serde(default)]
    flash_on_ms: i32,
    #[serde(default)]
    flash_off_ms: i32,
    #[serde(default)]
    brightness_mode: BrightnessMode,
}

/// Parse one JSON request line into a channel id and request.
///
/// `{"channel": "attention", "color": "#FF00FF00", "flash_mode": "timed",
/// "flash_on_ms": 1000, "flash_off_ms": 500}`. `channel` may be a name or a
/// numeric id, `color` a string or a packed integer. Missing fields default
/// to an off, non-flashing request.
pub fn parse_request_line(line: &str) -> crate::error::Result<(i32, LightRequest)> {
    let raw: RequestLine = serde_json::from_str(line)
        .map_err(|e| LightsError::Request(format!("Invalid request line: {e}")))?;
    let id = match raw.channel {
        ChannelRef::Id(id) => id,
        ChannelRef::Name(name) => parse_channel_id(&name)?,
    };
    let color = match raw.color {
        ColorValue::Packed(c) => c,
        ColorValue::Text(s) => parse_color(&s)?,
    };
    Ok((
        id,
        LightRequest {
            color,
            flash_mode: raw.flash_mode,
            flash_on_ms: raw.flash_on_ms,
            flash_off_ms: raw.flash_off_ms,
            brightness_mode: raw.brightness_mode,
        },
    ))
}
