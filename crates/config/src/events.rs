//! Event types for settings change notifications.
//!
//! A subset of the store's setters announce their change to the rest of
//! the application (server list edits re-bootstrap the DHT, smiley pack
//! and emoji font edits re-render open chats). Subscribers register a
//! callback on the store; events are delivered synchronously after the
//! field assignment.

/// Events emitted by [`crate::SettingsStore`] setters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsEvent {
    /// The bootstrap server list was replaced.
    ServerListChanged,
    /// The smiley pack identifier was replaced.
    SmileyPackChanged,
    /// Any of the emoji font properties changed (custom-font toggle,
    /// family, point size).
    EmojiFontChanged,
}

/// Callback type for receiving settings events.
pub type EventCallback = Box<dyn FnMut(SettingsEvent) + Send>;

/// Simple event collector for testing.
#[derive(Debug, Default)]
pub struct EventCollector {
    events: Vec<SettingsEvent>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: SettingsEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[SettingsEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of collected events equal to `event`.
    pub fn count(&self, event: SettingsEvent) -> usize {
        self.events.iter().filter(|e| **e == event).count()
    }
}
