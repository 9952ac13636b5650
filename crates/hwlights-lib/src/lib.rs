//! hwlights — priority arbitration for LEDs shared between light channels.
//!
//! Channels such as attention, notifications and battery share one physical
//! indicator. The [`arbiter::Arbiter`] keeps the last request per channel,
//! picks the highest-priority lit one for each output and translates it into
//! brightness and blink-ramp parameter writes on an [`sink::OutputSink`].

pub mod arbiter;
pub mod brightness;
pub mod config;
pub mod error;
pub mod handler;
pub mod ramp;
pub mod registry;
pub mod request;
pub mod sink;

pub use arbiter::Arbiter;
pub use error::LightsError;
pub use request::{BrightnessMode, ChannelKind, FlashMode, LightRequest};
