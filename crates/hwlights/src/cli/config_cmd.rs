//! `config` subcommand — show current configuration and file paths.

use serde::Serialize;

use super::{Config, Options, Result, kv, kv_indent, kv_width, load_config, print_json};

#[derive(Serialize)]
pub(super) struct ConfigOutput {
    pub config_file: Option<String>,
    pub config_file_exists: bool,
    pub settings: Config,
    pub problems: Vec<String>,
}

pub(super) fn cmd_config(opts: &Options) -> Result<()> {
    let mut config = load_config(opts.config_path.as_deref());
    if let Some(root) = &opts.root {
        config.leds_root = root.clone();
    }
    let config_path = opts.config_path.clone().or_else(Config::path);
    let config_exists = config_path.as_ref().is_some_and(|p| p.exists());
    let problems: Vec<String> = match config.validate() {
        Ok(()) => vec![],
        Err(errors) => errors.iter().map(ToString::to_string).collect(),
    };

    if opts.json {
        return print_json(&ConfigOutput {
            config_file: config_path.as_ref().map(|p| p.display().to_string()),
            config_file_exists: config_exists,
            settings: config,
            problems,
        });
    }

    let w = kv_width(
        &["Config file:"],
        &[
            "leds_root:",
            "lcd_group:",
            "button_groups:",
            "notification_group:",
            "max_lcd_brightness:",
            "max_led_brightness:",
            "ramp_step_ms:",
        ],
    );

    match &config_path {
        Some(p) if config_exists => kv("Config file:", format_args!("{} (loaded)", p.display()), w),
        Some(p) => kv(
            "Config file:",
            format_args!("{} (not found, using defaults)", p.display()),
            w,
        ),
        None => kv("Config file:", "(no config directory)", w),
    }
    println!();

    println!("Settings:");
    kv_indent("leds_root:", config.leds_root.display(), w);
    kv_indent("lcd_group:", &config.lcd_group, w);
    kv_indent("button_groups:", config.button_groups.join(", "), w);
    kv_indent("notification_group:", &config.notification_group, w);
    kv_indent("max_lcd_brightness:", config.max_lcd_brightness, w);
    kv_indent("max_led_brightness:", config.max_led_brightness, w);
    kv_indent("ramp_step_ms:", config.ramp_step_ms, w);

    if !problems.is_empty() {
        println!();
        println!("Problems:");
        for p in &problems {
            println!("  {p}");
        }
    }
    Ok(())
}
