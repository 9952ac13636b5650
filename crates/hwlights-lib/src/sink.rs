//! Output sink — trait + sysfs LED class backend.
//!
//! Every hardware effect of the arbiter is a named parameter write to a named
//! output group (`white/blink = 1`). Sinks may fail; the arbiter logs the
//! failure through [`set_param`] and carries on.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

// ── Error type ──

/// Sink write errors.
#[derive(Debug)]
pub enum SinkError {
    /// The parameter node could not be opened for writing.
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The node opened but the write itself failed.
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The sink refused the write without touching I/O.
    Rejected(String),
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkError::Open { path, source } => {
                write!(f, "Failed to open {}: {source}", path.display())
            }
            SinkError::Write { path, source } => {
                write!(f, "Failed to write {}: {source}", path.display())
            }
            SinkError::Rejected(dest) => write!(f, "Write rejected: {dest}"),
        }
    }
}

impl std::error::Error for SinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SinkError::Open { source, .. } | SinkError::Write { source, .. } => Some(source),
            SinkError::Rejected(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SinkError>;

// ── Parameter names ──

pub const BLINK: &str = "blink";
pub const BRIGHTNESS: &str = "brightness";
pub const DUTY_PCTS: &str = "duty_pcts";
pub const PAUSE_HI: &str = "pause_hi";
pub const PAUSE_LO: &str = "pause_lo";
pub const RAMP_STEP_MS: &str = "ramp_step_ms";
pub const START_IDX: &str = "start_idx";

// ── Trait ──

pub trait OutputSink {
    /// Write `value` to `parameter` of output `group`.
    fn write(&self, group: &str, parameter: &str, value: &str) -> Result<()>;
}

impl<T: OutputSink + ?Sized> OutputSink for &T {
    fn write(&self, group: &str, parameter: &str, value: &str) -> Result<()> {
        (**self).write(group, parameter, value)
    }
}

/// Write a parameter, logging instead of returning a failure.
pub fn set_param(sink: &impl OutputSink, group: &str, parameter: &str, value: impl fmt::Display) {
    let value = value.to_string();
    log::debug!("{group}/{parameter} = {value}");
    if let Err(e) = sink.write(group, parameter, &value) {
        log::warn!("failed to write {value} to {group}/{parameter}: {e}");
    }
}

// ── sysfs backend ──

/// Writes parameters as files under an LED class directory:
/// `<root>/<group>/<parameter>`.
///
/// Nodes are never created; a missing LED or attribute is a write failure.
#[derive(Debug, Clone)]
pub struct SysfsSink {
    root: PathBuf,
}

impl SysfsSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        SysfsSink { root: root.into() }
    }

    /// Path of a parameter node.
    pub fn node_path(&self, group: &str, parameter: &str) -> PathBuf {
        self.root.join(group).join(parameter)
    }
}

impl OutputSink for SysfsSink {
    fn write(&self, group: &str, parameter: &str, value: &str) -> Result<()> {
        let path = self.node_path(group, parameter);
        let mut file = match OpenOptions::new().write(true).truncate(true).open(&path) {
            Ok(f) => f,
            Err(source) => return Err(SinkError::Open { path, source }),
        };
        file.write_all(value.as_bytes())
            .map_err(|source| SinkError::Write { path, source })
    }
}

// ── Recording sink ──

pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// One recorded parameter write.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ParamWrite {
        pub group: String,
        pub parameter: String,
        pub value: String,
    }

    impl ParamWrite {
        pub fn new(group: &str, parameter: &str, value: &str) -> Self {
            ParamWrite {
                group: group.into(),
                parameter: parameter.into(),
                value: value.into(),
            }
        }
    }

    impl fmt::Display for ParamWrite {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}/{}={}", self.group, self.parameter, self.value)
        }
    }

    /// In-memory sink that keeps every write in order.
    ///
    /// With `fail_writes` set, every write is still recorded and then
    /// rejected, so tests can check that failures are swallowed.
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        writes: Mutex<Vec<ParamWrite>>,
        pub fail_writes: AtomicBool,
    }

    impl RecordingSink {
        pub fn new() -> Self {
            Self::default()
        }

        /// Snapshot of all writes so far.
        pub fn writes(&self) -> Vec<ParamWrite> {
            self.lock().clone()
        }

        /// Drain and return all writes so far.
        pub fn take(&self) -> Vec<ParamWrite> {
            std::mem::take(&mut *self.lock())
        }

        /// Writes rendered as `group/parameter=value`.
        pub fn lines(&self) -> Vec<String> {
            self.lock().iter().map(ToString::to_string).collect()
        }

        pub fn set_fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ParamWrite>> {
            self.writes
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
        }
    }

    impl OutputSink for RecordingSink {
        fn write(&self, group: &str, parameter: &str, value: &str) -> Result<()> {
            self.lock().push(ParamWrite::new(group, parameter, value));
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(SinkError::Rejected(format!("{group}/{parameter}")));
            }
            Ok(())
        }
    }
}
