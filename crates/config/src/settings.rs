//! Preference field table
//!
//! Every field the store persists lives in one of three shapes:
//! - `ServerEntry`: one record of the repeated `[DHT Server]` group
//! - `WindowLayout`: per-window opaque geometry/state blobs
//! - `Preferences`: the scalar fields with their hard-coded defaults
//!
//! Defaults are the values in effect when the key is absent from the
//! settings file. Existing files only ever gain keys, so a missing key
//! means "never set", not "corrupt".

/// Point size used for the emoji font when the user never picked one.
/// The stock UI font size; there is no toolkit to query at this layer.
pub const DEFAULT_FONT_POINT_SIZE: i32 = 12;

/// One bootstrap node of the DHT.
///
/// The list is ordered and may contain duplicates; the connection layer
/// walks it top to bottom.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerEntry {
    /// Display name shown in the server list editor.
    pub name: String,
    /// Hex public key of the node.
    pub user_id: String,
    /// Hostname or IP address.
    pub address: String,
    pub port: u16,
}

/// Saved placement of one top-level window.
///
/// Both blobs are opaque to this crate: the windowing layer produces
/// and consumes them, the store only persists the bytes verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowLayout {
    pub geometry: Vec<u8>,
    pub state: Vec<u8>,
}

/// Scalar user preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    // General
    pub username: String,
    pub status_message: String,

    // Logging (reserved: fields exist but the section is never persisted)
    pub enable_logging: bool,
    pub encrypt_logs: bool,

    // GUI
    pub animation_enabled: bool,
    /// Identifier blob of the chosen smiley pack; resolved elsewhere.
    pub smiley_pack: Vec<u8>,
    pub custom_emoji_font: bool,
    pub emoji_font_family: String,
    pub emoji_font_point_size: i32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            username: "My name".to_string(),
            status_message: "My status".to_string(),
            enable_logging: false,
            encrypt_logs: true,
            animation_enabled: true,
            smiley_pack: Vec::new(),
            custom_emoji_font: true,
            emoji_font_family: "DejaVu Sans".to_string(),
            emoji_font_point_size: DEFAULT_FONT_POINT_SIZE,
        }
    }
}
