//! CLI subcommands — channel listing, one-shot requests, request stream.

mod config_cmd;
mod list;
mod serve;
mod set;

use std::path::{Path, PathBuf};

use clap::Subcommand;
use serde::Serialize;

pub(super) use hwlights_lib::config::Config;
pub(super) use hwlights_lib::error::Result;
pub(super) use hwlights_lib::registry::{HwLight, Registry};
pub(super) use hwlights_lib::request;
pub(super) use hwlights_lib::sink::mock::RecordingSink;
pub(super) use hwlights_lib::sink::{OutputSink, SysfsSink};
pub(super) use hwlights_lib::{Arbiter, BrightnessMode, FlashMode, LightRequest, LightsError};

const PADDING: usize = 2;

/// Options shared by every subcommand.
pub struct Options {
    pub json: bool,
    pub config_path: Option<PathBuf>,
    pub root: Option<PathBuf>,
    pub dry_run: bool,
}

/// Compute alignment width for a command's key-value output.
///
/// `indented` keys are printed under a two-space prefix, so they need two
/// more columns to end in the same place as `top` keys.
pub(super) fn kv_width(top: &[&str], indented: &[&str]) -> usize {
    let top_need = top.iter().map(|k| k.len() + PADDING).max().unwrap_or(0);
    let indent_need = indented
        .iter()
        .map(|k| k.len() + PADDING + 2)
        .max()
        .unwrap_or(0);
    top_need.max(indent_need)
}

pub(super) fn format_kv(key: &str, value: impl std::fmt::Display, w: usize) -> String {
    format!("{key:<width$}{value}", width = w)
}

pub(super) fn kv(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("{}", format_kv(key, value, w));
}

pub(super) fn format_kv_indent(key: &str, value: impl std::fmt::Display, w: usize) -> String {
    format!("  {}", format_kv(key, value, w.saturating_sub(2)))
}

pub(super) fn kv_indent(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("{}", format_kv_indent(key, value, w));
}

pub(super) fn print_json(value: &impl Serialize) -> Result<()> {
    let s = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
    println!("{s}");
    Ok(())
}

/// Drain the dry-run recorder as `group/parameter=value` lines.
///
/// `None` when writes went to real hardware.
pub(super) fn drain_writes(recorder: Option<&RecordingSink>) -> Option<Vec<String>> {
    recorder.map(|r| r.take().iter().map(ToString::to_string).collect())
}

/// Load the config from `custom_path` or the platform default, logging parse warnings.
pub(super) fn load_config(custom_path: Option<&Path>) -> Config {
    match custom_path {
        Some(path) => {
            let (config, warnings) = Config::load_from(path);
            for w in &warnings {
                log::warn!("{w}");
            }
            config
        }
        None => Config::load(),
    }
}

/// Effective config: loaded, `--root` applied, validated.
fn effective_config(opts: &Options) -> Result<Config> {
    let mut config = load_config(opts.config_path.as_deref());
    if let Some(root) = &opts.root {
        config.leds_root = root.clone();
    }
    if let Err(errors) = config.validate() {
        let msg = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(LightsError::Config(msg));
    }
    Ok(config)
}

/// Build the arbiter over the configured sink and hand it to `f`.
///
/// With `--dry-run` the arbiter writes into a [`RecordingSink`], which is
/// also passed to `f` so the command can report the writes itself.
fn with_arbiter<T>(
    opts: &Options,
    f: impl FnOnce(&Arbiter<&dyn OutputSink>, Option<&RecordingSink>) -> Result<T>,
) -> Result<T> {
    let config = effective_config(opts)?;
    let registry = Registry::from_config(&config)?;
    let sysfs = SysfsSink::new(&config.leds_root);
    let recording = RecordingSink::new();
    let (sink, recorder): (&dyn OutputSink, _) = if opts.dry_run {
        log::debug!("dry run: recording writes instead of touching sysfs");
        (&recording, Some(&recording))
    } else {
        log::debug!("using sysfs sink at {}", config.leds_root.display());
        (&sysfs, None)
    };
    let arbiter = Arbiter::new(registry, sink);
    f(&arbiter, recorder)
}

#[derive(Subcommand)]
pub enum Command {
    /// List registered light channels in priority order
    List,

    /// Apply one light request
    Set {
        /// Channel name (attention, notifications, battery, backlight, buttons) or numeric id
        channel: String,
        /// Color: #AARRGGBB, #RRGGBB or a name (red, white, off, ...)
        color: String,
        /// Flash mode: none, timed or hardware
        #[arg(long, default_value = "none")]
        flash: FlashMode,
        /// Flash on-time in milliseconds (timed flash)
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        on_ms: i32,
        /// Flash off-time in milliseconds (timed flash)
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        off_ms: i32,
        /// Brightness mode: user, sensor or low-persistence
        #[arg(long, default_value = "user")]
        brightness_mode: BrightnessMode,
    },

    /// Read JSON light requests from stdin, one per line, until EOF
    Serve,

    /// Show current configuration and file paths
    Config,
}

pub fn run(cmd: Command, opts: &Options) -> Result<()> {
    match cmd {
        Command::List => with_arbiter(opts, |arb, _| list::cmd_list(arb, opts.json)),
        Command::Set {
            channel,
            color,
            flash,
            on_ms,
            off_ms,
            brightness_mode,
        } => {
            let id = request::parse_channel_id(&channel)?;
            let req = LightRequest {
                color: request::parse_color(&color)?,
                flash_mode: flash,
                flash_on_ms: on_ms,
                flash_off_ms: off_ms,
                brightness_mode,
            };
            with_arbiter(opts, |arb, recorder| {
                set::cmd_set(arb, recorder, id, req, opts.json)
            })
        }
        Command::Serve => {
            if opts.json {
                log::warn!("--json is implied for `serve` (ignored)");
            }
            with_arbiter(opts, |arb, recorder| {
                let stdin = std::io::stdin();
                serve::cmd_serve(arb, recorder, stdin.lock())
            })
        }
        Command::Config => config_cmd::cmd_config(opts),
    }
}
