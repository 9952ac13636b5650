//! Unified error type for the hwlights-lib crate.
//!
//! [`LightsError`] is what callers of the arbiter and the ambient layers
//! (config loading, color and request parsing) see. Sink write failures have
//! their own [`SinkError`](crate::sink::SinkError) and never reach this type:
//! the arbiter logs them.

use std::fmt;

/// Unified error type for hwlights-lib operations.
#[derive(Debug)]
pub enum LightsError {
    /// The channel id does not map to a registered channel.
    UnsupportedChannel(i32),
    /// Standard I/O error (config persistence).
    Io(std::io::Error),
    /// Configuration validation or construction error.
    Config(String),
    /// Color parsing error.
    Color(String),
    /// Malformed light request (unknown flash mode, bad JSON line, ...).
    Request(String),
}

impl fmt::Display for LightsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightsError::UnsupportedChannel(id) => write!(f, "Unsupported light channel: {id}"),
            LightsError::Io(e) => write!(f, "I/O error: {e}"),
            LightsError::Config(e) => write!(f, "Config error: {e}"),
            LightsError::Color(e) => write!(f, "Color error: {e}"),
            LightsError::Request(e) => write!(f, "Request error: {e}"),
        }
    }
}

impl std::error::Error for LightsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LightsError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LightsError {
    fn from(e: std::io::Error) -> Self {
        LightsError::Io(e)
    }
}

/// Crate-level Result alias using [`LightsError`].
pub type Result<T> = std::result::Result<T, LightsError>;
