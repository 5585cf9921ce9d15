//! The settings store
//!
//! One store instance owns the in-memory mirror of every persisted
//! preference: the bootstrap server list, the window-layout map and the
//! scalar fields. It is constructed explicitly and handed to whoever
//! needs it; there is no process-wide global.
//!
//! Lifecycle: `load()` runs once (later calls are no-ops), `save()` may
//! run any number of times, and dropping a loaded store saves a final
//! time. Single-threaded use is assumed; the store has no internal
//! locking.

use std::collections::BTreeMap;

use crate::dialog::{DialogOutcome, SettingsDialog};
use crate::events::{EventCallback, SettingsEvent};
use crate::persistence::{self, StoreLocation};
use crate::settings::{Preferences, ServerEntry, WindowLayout};
use crate::window::WindowAdapter;

pub struct SettingsStore {
    location: StoreLocation,
    loaded: bool,
    servers: Vec<ServerEntry>,
    windows: BTreeMap<String, WindowLayout>,
    prefs: Preferences,
    observers: Vec<EventCallback>,
}

impl SettingsStore {
    /// Store backed by the real user settings file and the bundled
    /// defaults. Fields hold their hard-coded defaults until `load`.
    pub fn new() -> Self {
        Self::with_location(StoreLocation::default_location())
    }

    /// Store backed by an explicit location (tests, portable installs).
    pub fn with_location(location: StoreLocation) -> Self {
        Self {
            location,
            loaded: false,
            servers: Vec::new(),
            windows: BTreeMap::new(),
            prefs: Preferences::default(),
            observers: Vec::new(),
        }
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Populate every field from the settings file; no-op when already
    /// loaded. A missing file leaves the defaults in effect, and the
    /// store still counts as loaded afterwards.
    pub fn load(&mut self) {
        if self.loaded {
            return;
        }

        let doc = persistence::read_document(&self.location);
        let state = persistence::state_from_document(&doc);
        self.servers = state.servers;
        self.windows = state.windows;
        self.prefs = state.prefs;
        self.loaded = true;
    }

    /// Serialize the full in-memory state to the user settings file,
    /// replacing whatever is on disk. Failures are logged and
    /// swallowed; settings are not critical enough to take the app
    /// down.
    pub fn save(&self) {
        let doc =
            persistence::document_from_state(&self.servers, &self.windows, &self.prefs);
        if let Err(e) = persistence::write_document(&self.location, &doc) {
            log::warn!("settings not saved: {e}");
        }
    }

    /// Register a change observer. Events fire synchronously from the
    /// notifying setters, after the field assignment.
    pub fn subscribe(&mut self, callback: EventCallback) {
        self.observers.push(callback);
    }

    fn emit(&mut self, event: SettingsEvent) {
        for observer in &mut self.observers {
            observer(event);
        }
    }

    // ── DHT Server ───────────────────────────────────────────────────────

    pub fn server_list(&self) -> &[ServerEntry] {
        &self.servers
    }

    /// Replace the bootstrap server list. Emits
    /// [`SettingsEvent::ServerListChanged`].
    pub fn set_server_list(&mut self, servers: Vec<ServerEntry>) {
        self.servers = servers;
        self.emit(SettingsEvent::ServerListChanged);
    }

    // ── General ──────────────────────────────────────────────────────────

    pub fn username(&self) -> &str {
        &self.prefs.username
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.prefs.username = username.into();
    }

    pub fn status_message(&self) -> &str {
        &self.prefs.status_message
    }

    pub fn set_status_message(&mut self, message: impl Into<String>) {
        self.prefs.status_message = message.into();
    }

    // Logging flags are carried but inert until the logging feature
    // lands; they are never persisted.

    pub fn logging_enabled(&self) -> bool {
        self.prefs.enable_logging
    }

    pub fn set_logging_enabled(&mut self, value: bool) {
        self.prefs.enable_logging = value;
    }

    pub fn logs_encrypted(&self) -> bool {
        self.prefs.encrypt_logs
    }

    pub fn set_logs_encrypted(&mut self, value: bool) {
        self.prefs.encrypt_logs = value;
    }

    // ── GUI ──────────────────────────────────────────────────────────────

    pub fn animation_enabled(&self) -> bool {
        self.prefs.animation_enabled
    }

    pub fn set_animation_enabled(&mut self, value: bool) {
        self.prefs.animation_enabled = value;
    }

    pub fn smiley_pack(&self) -> &[u8] {
        &self.prefs.smiley_pack
    }

    /// Replace the smiley pack identifier. Emits
    /// [`SettingsEvent::SmileyPackChanged`].
    pub fn set_smiley_pack(&mut self, pack: Vec<u8>) {
        self.prefs.smiley_pack = pack;
        self.emit(SettingsEvent::SmileyPackChanged);
    }

    pub fn custom_emoji_font(&self) -> bool {
        self.prefs.custom_emoji_font
    }

    /// Emits [`SettingsEvent::EmojiFontChanged`].
    pub fn set_custom_emoji_font(&mut self, value: bool) {
        self.prefs.custom_emoji_font = value;
        self.emit(SettingsEvent::EmojiFontChanged);
    }

    pub fn emoji_font_family(&self) -> &str {
        &self.prefs.emoji_font_family
    }

    /// Emits [`SettingsEvent::EmojiFontChanged`].
    pub fn set_emoji_font_family(&mut self, family: impl Into<String>) {
        self.prefs.emoji_font_family = family.into();
        self.emit(SettingsEvent::EmojiFontChanged);
    }

    pub fn emoji_font_point_size(&self) -> i32 {
        self.prefs.emoji_font_point_size
    }

    /// Emits [`SettingsEvent::EmojiFontChanged`].
    pub fn set_emoji_font_point_size(&mut self, size: i32) {
        self.prefs.emoji_font_point_size = size;
        self.emit(SettingsEvent::EmojiFontChanged);
    }

    // ── Window layouts ───────────────────────────────────────────────────

    /// Capture the window's current geometry and state blobs under its
    /// id, creating the map entry if absent. Other windows' entries are
    /// untouched.
    pub fn save_window(&mut self, window: &dyn WindowAdapter) {
        let layout = self.windows.entry(window.id().to_string()).or_default();
        layout.geometry = window.save_geometry();
        layout.state = window.save_state();
    }

    /// Apply the saved layout for the window's id. Unknown ids leave
    /// the window exactly as it is.
    pub fn load_window(&self, window: &mut dyn WindowAdapter) {
        let Some(layout) = self.windows.get(window.id()) else {
            return;
        };
        window.restore_geometry(&layout.geometry);
        window.restore_state(&layout.state);
    }

    pub fn window_layout(&self, id: &str) -> Option<&WindowLayout> {
        self.windows.get(id)
    }

    // ── Dialog glue ──────────────────────────────────────────────────────

    /// Run the modal preference dialog; persist when the user confirms.
    pub fn execute_settings_dialog(
        &mut self,
        dialog: &mut dyn SettingsDialog,
    ) -> DialogOutcome {
        let outcome = dialog.run(self);
        if outcome == DialogOutcome::Accepted {
            self.save();
        }
        outcome
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SettingsStore {
    fn drop(&mut self) {
        // Final save at process teardown. A store that never loaded has
        // nothing worth persisting.
        if self.loaded {
            self.save();
        }
    }
}
