//! Configuration persistence for the Flit desktop client
//!
//! This crate owns the in-memory mirror of all user preferences and
//! maps it to the INI settings file:
//! - `SettingsStore`: typed accessors, load-once/save-many lifecycle
//! - `IniDocument`: the fixed on-disk INI dialect (repeated groups,
//!   window subgroups, base64 blobs)
//! - `SettingsEvent`: change notifications for the setters other
//!   components react to live
//!
//! UI code, networking and smiley-pack resolution live elsewhere; this
//! crate only talks to them through the `WindowAdapter` and
//! `SettingsDialog` seams.

mod dialog;
mod error;
mod events;
mod ini;
mod persistence;
mod settings;
mod store;
mod window;

pub use dialog::*;
pub use error::*;
pub use events::*;
pub use ini::*;
pub use persistence::*;
pub use settings::*;
pub use store::*;
pub use window::*;
