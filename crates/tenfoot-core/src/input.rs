#![forbid(unsafe_code)]

//! Key-down input source.
//!
//! The host's key capture (a DOM listener, a TV platform callback) forwards
//! raw key codes to [`InputService::on_key_down`]. Handlers subscribe to
//! [`ON_KEY_DOWN`] while they hold input focus.

use std::fmt;

use crate::event::{KeyDown, KeyMap};
use crate::event_target::{Event, EventTarget, Listener};

/// Event type fired for every key press.
pub const ON_KEY_DOWN: &str = "onKeyDown";

/// Target name carried by input events.
pub const INPUT_SERVICE: &str = "InputService";

/// Publishes raw key presses to subscribed handlers.
pub struct InputService {
    events: EventTarget<KeyDown>,
    key_map: KeyMap,
}

impl fmt::Debug for InputService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputService")
            .field("listeners", &self.events.size(ON_KEY_DOWN))
            .field("key_map", &self.key_map)
            .finish()
    }
}

impl Default for InputService {
    fn default() -> Self {
        Self::with_key_map(KeyMap::default())
    }
}

impl InputService {
    /// Create an input source using the default key table for diagnostics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an input source labelling key codes with `key_map`.
    #[must_use]
    pub fn with_key_map(key_map: KeyMap) -> Self {
        Self {
            events: EventTarget::named(INPUT_SERVICE),
            key_map,
        }
    }

    /// Key table used to label incoming codes.
    #[must_use]
    pub fn key_map(&self) -> &KeyMap {
        &self.key_map
    }

    /// Forward a key press to every subscriber.
    ///
    /// Unknown codes are forwarded too; subscribers decide what to ignore.
    pub fn on_key_down(&self, key_code: u32) -> Option<Event<KeyDown>> {
        let _label = self.key_map.label(key_code);
        #[cfg(feature = "tracing")]
        tracing::info!(key_code, key_char = _label, "input.on_key_down");

        self.events.fire(ON_KEY_DOWN, KeyDown::new(key_code), None)
    }

    /// Subscribe to an input event type.
    pub fn add_listener(&self, kind: &str, listener: Listener<KeyDown>, exclusive: bool) -> bool {
        self.events.add_listener(kind, listener, exclusive)
    }

    /// Unsubscribe `listener` (or every listener of `kind` with `None`).
    pub fn remove_listener(&self, kind: &str, listener: Option<&Listener<KeyDown>>) -> bool {
        self.events.remove_listener(kind, listener)
    }

    /// Whether `listener` is subscribed to `kind`.
    #[must_use]
    pub fn has_listener(&self, kind: &str, listener: &Listener<KeyDown>) -> bool {
        self.events.contains(kind, listener)
    }

    /// Number of subscribers for `kind`.
    #[must_use]
    pub fn size(&self, kind: &str) -> usize {
        self.events.size(kind)
    }
}
