//! Settings persistence (paths, bundled defaults, field mapping)
//!
//! The user's file is `settings.ini` under the platform config
//! directory. When it does not exist yet, loading falls back to a
//! read-only bundled copy compiled into the binary (it ships the stock
//! bootstrap nodes). Saving always targets the user path.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::ini::IniDocument;
use crate::settings::{Preferences, ServerEntry, WindowLayout};

pub const SETTINGS_FILENAME: &str = "settings.ini";

const APP_DIR: &str = "flit";

/// Read-only defaults shipped inside the binary. Only consulted when no
/// user settings file exists yet; scalar keys it omits fall back to the
/// hard-coded field defaults.
const BUNDLED_DEFAULTS: &str = r#"; Bundled defaults, used until the user saves their own settings file.
[DHT Server]
dhtServerList\size=2
dhtServerList\1\name=node-eu-1
dhtServerList\1\userId=951C88B7E75C867418ACDB5D273821372BB5BD652740BCDF623A4FA293E75D2F
dhtServerList\1\address=bootstrap1.flit.im
dhtServerList\1\port=33445
dhtServerList\2\name=node-us-1
dhtServerList\2\userId=2C289F9F37C20D09DA83565588BF496FAB3764853FA38141817A72E3F18ACA0B
dhtServerList\2\address=bootstrap2.flit.im
dhtServerList\2\port=33445
"#;

/// Path of the user settings file, `None` when the platform config
/// directory cannot be resolved.
pub fn settings_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_DIR).join(SETTINGS_FILENAME))
}

/// Where a store reads and writes its file.
///
/// The default location is the real user path plus the bundled
/// fallback. Tests and embedders point stores elsewhere so they never
/// touch the user's configuration.
#[derive(Debug, Clone)]
pub struct StoreLocation {
    pub(crate) user_file: Option<PathBuf>,
    pub(crate) bundled: Option<String>,
}

impl StoreLocation {
    pub fn default_location() -> Self {
        Self {
            user_file: settings_file_path(),
            bundled: Some(BUNDLED_DEFAULTS.to_string()),
        }
    }

    /// A location with the given user file and no bundled fallback.
    pub fn at(user_file: impl Into<PathBuf>) -> Self {
        Self {
            user_file: Some(user_file.into()),
            bundled: None,
        }
    }

    /// Replace the bundled fallback text.
    pub fn with_bundled(mut self, text: impl Into<String>) -> Self {
        self.bundled = Some(text.into());
        self
    }

    pub fn user_file(&self) -> Option<&Path> {
        self.user_file.as_deref()
    }
}

impl Default for StoreLocation {
    fn default() -> Self {
        Self::default_location()
    }
}

/// Everything `load` produces: the three aggregates of the store.
#[derive(Debug, Default)]
pub(crate) struct LoadedState {
    pub servers: Vec<ServerEntry>,
    pub windows: BTreeMap<String, WindowLayout>,
    pub prefs: Preferences,
}

/// Read the document for a location: the user file when present, else
/// the bundled defaults, else an empty document. Never fails; a
/// missing or unreadable file means defaults take effect.
pub(crate) fn read_document(location: &StoreLocation) -> IniDocument {
    if let Some(path) = &location.user_file {
        match fs::read_to_string(path) {
            Ok(text) => {
                log::debug!("loading settings from {}", path.display());
                return IniDocument::parse(&text);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("cannot read {}: {e}", path.display()),
        }
    }
    match &location.bundled {
        Some(text) => {
            log::debug!("no user settings file, using bundled defaults");
            IniDocument::parse(text)
        }
        None => IniDocument::new(),
    }
}

/// Write the document to the location's user file, creating the config
/// directory first. The bundled copy is never a write target.
pub(crate) fn write_document(
    location: &StoreLocation,
    doc: &IniDocument,
) -> Result<(), ConfigError> {
    let path = location.user_file.as_ref().ok_or(ConfigError::NoConfigDir)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
            path: parent.to_path_buf(),
            message: e.to_string(),
        })?;
    }
    fs::write(path, doc.render()).map_err(|e| ConfigError::Io {
        path: path.clone(),
        message: e.to_string(),
    })
}

/// Field table, read direction. Missing sections or keys never error:
/// scalars keep their defaults, collections stay empty.
pub(crate) fn state_from_document(doc: &IniDocument) -> LoadedState {
    let mut state = LoadedState::default();

    if let Some(section) = doc.section("DHT Server") {
        let len = section.array_len("dhtServerList");
        for i in 1..=len {
            state.servers.push(ServerEntry {
                name: section
                    .array_get("dhtServerList", i, "name")
                    .unwrap_or_default()
                    .to_string(),
                user_id: section
                    .array_get("dhtServerList", i, "userId")
                    .unwrap_or_default()
                    .to_string(),
                address: section
                    .array_get("dhtServerList", i, "address")
                    .unwrap_or_default()
                    .to_string(),
                port: section
                    .array_get("dhtServerList", i, "port")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(0),
            });
        }
    }

    if let Some(section) = doc.section("General") {
        state.prefs.username = section.get_str("username", &state.prefs.username);
        state.prefs.status_message =
            section.get_str("statusMessage", &state.prefs.status_message);
    }

    if let Some(section) = doc.section("WindowSettings") {
        for name in section.child_groups() {
            state.windows.insert(
                name.clone(),
                WindowLayout {
                    geometry: section.child_blob(&name, "geometry"),
                    state: section.child_blob(&name, "state"),
                },
            );
        }
    }

    if let Some(section) = doc.section("GUI") {
        state.prefs.animation_enabled =
            section.get_bool("smoothAnimation", state.prefs.animation_enabled);
        state.prefs.smiley_pack = section.get_blob("smileyPack");
        state.prefs.custom_emoji_font =
            section.get_bool("customEmojiFont", state.prefs.custom_emoji_font);
        state.prefs.emoji_font_family =
            section.get_str("emojiFontFamily", &state.prefs.emoji_font_family);
        state.prefs.emoji_font_point_size =
            section.get_i32("emojiFontPointSize", state.prefs.emoji_font_point_size);
    }

    // [Logging] is reserved and stays untouched until logging lands.

    state
}

/// Field table, write direction. Section order matches the files the
/// client has always produced.
pub(crate) fn document_from_state(
    servers: &[ServerEntry],
    windows: &BTreeMap<String, WindowLayout>,
    prefs: &Preferences,
) -> IniDocument {
    let mut doc = IniDocument::new();

    let section = doc.section_mut("DHT Server");
    section.set_array_len("dhtServerList", servers.len());
    for (i, server) in servers.iter().enumerate() {
        let index = i + 1;
        section.array_set("dhtServerList", index, "name", server.name.clone());
        section.array_set("dhtServerList", index, "userId", server.user_id.clone());
        section.array_set("dhtServerList", index, "address", server.address.clone());
        section.array_set("dhtServerList", index, "port", server.port.to_string());
    }

    let section = doc.section_mut("General");
    section.set("username", prefs.username.clone());
    section.set("statusMessage", prefs.status_message.clone());

    let section = doc.section_mut("WindowSettings");
    for (name, layout) in windows {
        section.set_child_blob(name, "geometry", &layout.geometry);
        section.set_child_blob(name, "state", &layout.state);
    }

    let section = doc.section_mut("GUI");
    section.set_bool("smoothAnimation", prefs.animation_enabled);
    section.set_blob("smileyPack", &prefs.smiley_pack);
    section.set_bool("customEmojiFont", prefs.custom_emoji_font);
    section.set("emojiFontFamily", prefs.emoji_font_family.clone());
    section.set_i32("emojiFontPointSize", prefs.emoji_font_point_size);

    // [Logging] is reserved and never written.

    doc
}
