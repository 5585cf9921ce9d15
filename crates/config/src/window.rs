//! Window abstraction consumed by the store.
//!
//! The store never talks to the windowing toolkit directly. Top-level
//! windows implement [`WindowAdapter`] so their placement can be
//! captured into and restored from [`crate::WindowLayout`] blobs.

/// Interface the store needs from a top-level window.
///
/// `id` must be stable across runs (it keys the saved layout). The
/// geometry and state blobs are toolkit-defined; the store persists
/// them without interpretation.
pub trait WindowAdapter {
    /// Stable identifier of this window (e.g. `"MainWindow"`).
    fn id(&self) -> &str;

    /// Capture the current outer geometry (position + size).
    fn save_geometry(&self) -> Vec<u8>;

    /// Capture the current widget state (toolbars, docks, splitters).
    fn save_state(&self) -> Vec<u8>;

    /// Apply a previously captured geometry blob.
    fn restore_geometry(&mut self, blob: &[u8]);

    /// Apply a previously captured state blob.
    fn restore_state(&mut self, blob: &[u8]);
}
