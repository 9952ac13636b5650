//! hwlights CLI — host the light arbiter against sysfs LEDs.

use std::path::PathBuf;

use clap::Parser;

mod cli;

#[derive(Parser)]
#[command(
    name = "hwlights-cli",
    version,
    about = "Priority arbitration for shared indicator LEDs"
)]
struct Args {
    /// Output as JSON (for list, set, config)
    #[arg(long, global = true)]
    json: bool,

    /// Use this config file instead of the platform default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the LED class directory from the config
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Print parameter writes instead of touching the LEDs
    #[arg(long, global = true)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: cli::Command,
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let opts = cli::Options {
        json: args.json,
        config_path: args.config,
        root: args.root,
        dry_run: args.dry_run,
    };

    if let Err(e) = cli::run(args.command, &opts) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
