//! `serve` subcommand — apply newline-delimited JSON requests from a reader.
//!
//! Each input line yields exactly one JSON reply line. Bad lines are
//! reported and skipped; the loop ends at EOF.

use std::io::BufRead;

use serde::Serialize;

use super::{Arbiter, OutputSink, RecordingSink, Result, drain_writes, request};

#[derive(Debug, Serialize, PartialEq)]
pub(super) struct Reply {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub writes: Option<Vec<String>>,
}

/// Handle one request line.
///
/// With a `recorder`, a successful reply carries the writes the request
/// produced.
pub(super) fn handle_line(
    arbiter: &Arbiter<impl OutputSink>,
    recorder: Option<&RecordingSink>,
    line: &str,
) -> Reply {
    let result = request::parse_request_line(line).and_then(|(id, req)| {
        log::debug!("{}", super::set::describe(id, &req));
        arbiter.set_state(id, req)
    });
    let writes = drain_writes(recorder);
    match result {
        Ok(()) => Reply {
            ok: true,
            error: None,
            writes,
        },
        Err(e) => {
            log::warn!("request failed: {e}");
            Reply {
                ok: false,
                error: Some(e.to_string()),
                writes: None,
            }
        }
    }
}

pub(super) fn cmd_serve(
    arbiter: &Arbiter<impl OutputSink>,
    recorder: Option<&RecordingSink>,
    input: impl BufRead,
) -> Result<()> {
    let mut handled = 0usize;
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let reply = handle_line(arbiter, recorder, &line);
        let out = serde_json::to_string(&reply).map_err(std::io::Error::other)?;
        println!("{out}");
        handled += 1;
    }
    log::debug!("input closed after {handled} request(s)");
    Ok(())
}
