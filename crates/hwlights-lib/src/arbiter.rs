//! Arbiter — decides which channel drives each shared output.
//!
//! Every request runs update, selection and the handler's writes inside one
//! critical section, so no caller ever observes a half-applied registry.
//! The highest-priority lit channel on a handler owns that output; when none
//! is lit the handler gets the caller's own request, which turns it off.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{LightsError, Result};
use crate::registry::{HwLight, Registry};
use crate::request::{ChannelKind, LightRequest};
use crate::sink::OutputSink;

pub struct Arbiter<S> {
    registry: Mutex<Registry>,
    sink: S,
}

impl<S: OutputSink> Arbiter<S> {
    pub fn new(registry: Registry, sink: S) -> Self {
        Arbiter {
            registry: Mutex::new(registry),
            sink,
        }
    }

    /// Apply a light request for channel `id`.
    ///
    /// Fails only when `id` is not a registered channel; sink write failures
    /// are logged and the request still counts as handled.
    pub fn set_state(&self, id: i32, request: LightRequest) -> Result<()> {
        let kind = ChannelKind::from_id(id).ok_or(LightsError::UnsupportedChannel(id))?;

        let mut registry = self.lock();
        let handler_id = registry
            .update(kind, request)
            .ok_or(LightsError::UnsupportedChannel(id))?;
        let handler = registry.handler(handler_id);

        match registry.lit_winner(handler_id) {
            Some(winner) => {
                log::debug!("{kind} updated, {} drives {:?}", winner.kind, handler.groups());
                handler.apply(&self.sink, &winner.last_state);
            }
            None => {
                log::debug!("{kind} updated, nothing lit on {:?}", handler.groups());
                handler.apply(&self.sink, &request);
            }
        }
        Ok(())
    }

    /// Registered channels in priority order.
    pub fn list_channels(&self) -> Vec<HwLight> {
        self.lock().enumerate()
    }

    /// Last stored request for `kind`, if registered.
    pub fn state(&self, kind: ChannelKind) -> Option<LightRequest> {
        self.lock().state(kind)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    // The registry only holds plain values and is consistent between
    // requests, so a panic elsewhere cannot leave it torn.
    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
