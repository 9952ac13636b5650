//! `list` subcommand — registered channels in priority order.

use serde::Serialize;

use super::{Arbiter, HwLight, OutputSink, Result, print_json};

#[derive(Serialize)]
pub(super) struct ListOutput {
    pub count: usize,
    pub lights: Vec<HwLight>,
}

pub(super) fn cmd_list(arbiter: &Arbiter<impl OutputSink>, json: bool) -> Result<()> {
    let lights = arbiter.list_channels();

    if json {
        return print_json(&ListOutput {
            count: lights.len(),
            lights,
        });
    }

    println!("{:<9}{:<4}Channel", "Ordinal", "Id");
    for light in &lights {
        println!("{:<9}{:<4}{}", light.ordinal, light.id, light.kind);
    }
    Ok(())
}
