//! Input Listener Router
//!
//! Controllers attach a listener when enabled and detach it when disabled.
//! The router is the single owner of those registrations, so a leaked
//! listener shows up as a non-zero `listener_count()` after teardown.

use std::collections::BTreeMap;

use super::{InputChannel, InputEvent};

/// Opaque handle returned by [`InputRouter::attach`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u32);

/// Set of channels a listener wants to receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelSet {
    pub keyboard: bool,
    pub pointer: bool,
    pub wheel: bool,
    pub touch: bool,
}

impl ChannelSet {
    pub const ALL: ChannelSet = ChannelSet {
        keyboard: true,
        pointer: true,
        wheel: true,
        touch: true,
    };

    pub const KEYBOARD: ChannelSet = ChannelSet {
        keyboard: true,
        pointer: false,
        wheel: false,
        touch: false,
    };

    pub const KEYBOARD_AND_POINTER: ChannelSet = ChannelSet {
        keyboard: true,
        pointer: true,
        wheel: false,
        touch: false,
    };

    pub const POINTER: ChannelSet = ChannelSet {
        keyboard: false,
        pointer: true,
        wheel: false,
        touch: false,
    };

    pub fn contains(&self, channel: InputChannel) -> bool {
        match channel {
            InputChannel::Keyboard => self.keyboard,
            InputChannel::Pointer => self.pointer,
            InputChannel::Wheel => self.wheel,
            InputChannel::Touch => self.touch,
        }
    }
}

#[derive(Debug, Clone)]
struct Listener {
    owner: &'static str,
    channels: ChannelSet,
}

/// Registry of active input listeners.
#[derive(Debug, Default)]
pub struct InputRouter {
    next_id: u32,
    listeners: BTreeMap<ListenerId, Listener>,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for the given channels.
    pub fn attach(&mut self, owner: &'static str, channels: ChannelSet) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.listeners.insert(id, Listener { owner, channels });
        log::debug!("input listener {:?} attached for {}", id, owner);
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn detach(&mut self, id: ListenerId) -> bool {
        match self.listeners.remove(&id) {
            Some(listener) => {
                log::debug!("input listener {:?} detached for {}", id, listener.owner);
                true
            }
            None => false,
        }
    }

    pub fn is_attached(&self, id: ListenerId) -> bool {
        self.listeners.contains_key(&id)
    }

    /// Whether the listener exists and subscribes to this event's channel.
    /// Focus loss reaches every listener so held buttons and keys are released.
    pub fn accepts(&self, id: ListenerId, event: &InputEvent) -> bool {
        self.listeners.get(&id).is_some_and(|l| {
            matches!(event, InputEvent::FocusLost) || l.channels.contains(event.channel())
        })
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Owners of the listeners still attached, for leak diagnostics.
    pub fn owners(&self) -> Vec<&'static str> {
        self.listeners.values().map(|l| l.owner).collect()
    }
}
