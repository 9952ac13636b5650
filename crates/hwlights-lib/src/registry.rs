//! Channel registry — priority-ordered channels and the handlers they drive.
//!
//! Channels are kept in descending priority. Several channels may point at the
//! same [`HandlerId`]; those channels compete for one physical output.

use serde::Serialize;

use crate::LightsError;
use crate::config::Config;
use crate::handler::OutputHandler;
use crate::request::{ChannelKind, LightRequest};

/// Index of a handler in the registry's handler arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(usize);

/// One registered channel and its last requested state.
#[derive(Debug, Clone)]
pub struct ChannelDescriptor {
    pub kind: ChannelKind,
    pub handler: HandlerId,
    pub last_state: LightRequest,
}

/// Public listing entry for a registered channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HwLight {
    pub id: i32,
    pub kind: ChannelKind,
    /// Position in priority order, 0 = highest.
    pub ordinal: usize,
}

#[derive(Debug, Clone)]
pub struct Registry {
    handlers: Vec<OutputHandler>,
    channels: Vec<ChannelDescriptor>,
}

/// Builds a [`Registry`]. Channels are added highest priority first.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    handlers: Vec<OutputHandler>,
    channels: Vec<(ChannelKind, HandlerId)>,
}

impl RegistryBuilder {
    /// Add a handler and return its id for use by [`channel`](Self::channel).
    pub fn handler(&mut self, handler: OutputHandler) -> HandlerId {
        self.handlers.push(handler);
        HandlerId(self.handlers.len() - 1)
    }

    /// Append a channel at the next lower priority.
    pub fn channel(&mut self, kind: ChannelKind, handler: HandlerId) -> &mut Self {
        self.channels.push((kind, handler));
        self
    }

    pub fn build(self) -> crate::error::Result<Registry> {
        let mut channels: Vec<ChannelDescriptor> = Vec::with_capacity(self.channels.len());
        for (kind, handler) in self.channels {
            if channels.iter().any(|c| c.kind == kind) {
                return Err(LightsError::Config(format!(
                    "channel {kind} registered more than once"
                )));
            }
            if handler.0 >= self.handlers.len() {
                return Err(LightsError::Config(format!(
                    "channel {kind} bound to unknown handler {}",
                    handler.0
                )));
            }
            channels.push(ChannelDescriptor {
                kind,
                handler,
                last_state: LightRequest::default(),
            });
        }
        Ok(Registry {
            handlers: self.handlers,
            channels,
        })
    }
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// The standard layout: the notification indicator shared by attention,
    /// notifications and battery (in that priority), then the LCD backlight,
    /// then the button LEDs.
    pub fn from_config(config: &Config) -> crate::error::Result<Self> {
        let mut b = Self::builder();
        let indicator = b.handler(OutputHandler::BlinkCapable {
            group: config.notification_group.clone(),
            max_brightness: config.max_led_brightness,
            ramp_step_ms: config.ramp_step_ms,
        });
        let lcd = b.handler(OutputHandler::SimpleBrightness {
            groups: vec![config.lcd_group.clone()],
            max_brightness: config.max_lcd_brightness,
        });
        let buttons = b.handler(OutputHandler::SimpleBrightness {
            groups: config.button_groups.clone(),
            max_brightness: config.max_led_brightness,
        });
        b.channel(ChannelKind::Attention, indicator)
            .channel(ChannelKind::Notifications, indicator)
            .channel(ChannelKind::Battery, indicator)
            .channel(ChannelKind::Backlight, lcd)
            .channel(ChannelKind::Buttons, buttons);
        b.build()
    }

    /// Store `request` for `kind` and return the handler it is bound to.
    ///
    /// Returns `None` if `kind` is not registered.
    pub fn update(&mut self, kind: ChannelKind, request: LightRequest) -> Option<HandlerId> {
        let channel = self.channels.iter_mut().find(|c| c.kind == kind)?;
        channel.last_state = request;
        Some(channel.handler)
    }

    /// Channels bound to `handler`, highest priority first.
    pub fn channels_sharing(
        &self,
        handler: HandlerId,
    ) -> impl Iterator<Item = &ChannelDescriptor> + '_ {
        self.channels.iter().filter(move |c| c.handler == handler)
    }

    /// Highest-priority lit channel bound to `handler`.
    pub fn lit_winner(&self, handler: HandlerId) -> Option<&ChannelDescriptor> {
        self.channels_sharing(handler).find(|c| c.last_state.is_lit())
    }

    /// Handler behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by the builder of this registry. Ids
    /// returned by [`update`](Self::update) are always valid.
    pub fn handler(&self, id: HandlerId) -> &OutputHandler {
        &self.handlers[id.0]
    }

    /// Last stored request for `kind`.
    pub fn state(&self, kind: ChannelKind) -> Option<LightRequest> {
        self.channels
            .iter()
            .find(|c| c.kind == kind)
            .map(|c| c.last_state)
    }

    pub fn enumerate(&self) -> Vec<HwLight> {
        self.channels
            .iter()
            .enumerate()
            .map(|(ordinal, c)| HwLight {
                id: c.kind.id(),
                kind: c.kind,
                ordinal,
            })
            .collect()
    }
}
