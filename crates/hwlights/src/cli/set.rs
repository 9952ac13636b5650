//! `set` subcommand — apply a single light request.

use serde::Serialize;

use super::{
    Arbiter, FlashMode, LightRequest, OutputSink, RecordingSink, Result, drain_writes, print_json,
    request,
};

#[derive(Serialize)]
pub(super) struct SetOutput {
    pub ok: bool,
    pub id: i32,
    pub color: String,
    pub state: LightRequest,
    /// Writes the request produced; only present with `--dry-run`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub writes: Option<Vec<String>>,
}

pub(super) fn cmd_set(
    arbiter: &Arbiter<impl OutputSink>,
    recorder: Option<&RecordingSink>,
    id: i32,
    req: LightRequest,
    json: bool,
) -> Result<()> {
    arbiter.set_state(id, req)?;
    let writes = drain_writes(recorder);

    if json {
        return print_json(&SetOutput {
            ok: true,
            id,
            color: request::format_color(req.color),
            state: req,
            writes,
        });
    }

    for line in writes.iter().flatten() {
        println!("{line}");
    }
    println!("{}", describe(id, &req));
    Ok(())
}

/// One-line summary of an applied request.
pub(super) fn describe(id: i32, req: &LightRequest) -> String {
    let name = request::ChannelKind::from_id(id)
        .map(|k| k.to_string())
        .unwrap_or_else(|| id.to_string());
    let color = request::format_color(req.color);
    match req.flash_mode {
        FlashMode::Timed => format!(
            "{name}: {color} blinking {}ms on / {}ms off",
            req.flash_on_ms, req.flash_off_ms
        ),
        FlashMode::Hardware => format!("{name}: {color} (hardware flash)"),
        FlashMode::None => format!("{name}: {color}"),
    }
}
