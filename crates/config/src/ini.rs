//! INI document model for the settings file.
//!
//! The on-disk format predates this crate and is fixed: plain
//! `key=value` lines grouped under `[Section]` headers, with two
//! compound shapes layered on top of the key namespace:
//!
//! - repeated groups (arrays): `list\size=N` plus 1-based
//!   `list\1\key=value` entries
//! - child groups: `Child\key=value`, one level deep
//!
//! Parsing is best-effort: unreadable lines are skipped with a warning
//! and never abort the load. Rendering always produces a file this
//! parser reads back losslessly. Binary values are stored as base64
//! text; arbitrary child-group names are percent-encoded per path
//! segment so they cannot collide with the `\` separator.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

/// Separator between key path segments.
const SEP: char = '\\';

/// One `[name]` section: an ordered list of key/value entries.
///
/// Keys are kept in their on-disk (encoded) form; the `child_*`
/// accessors translate to and from decoded group names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniSection {
    name: String,
    entries: Vec<(String, String)>,
}

impl IniSection {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw value for an exact key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Insert or replace a key, preserving entry order.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    // ── Typed reads: value if present and coercible, else default ────────

    pub fn get_str(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(v) => match v.to_ascii_lowercase().as_str() {
                "true" | "1" => true,
                "false" | "0" => false,
                _ => default,
            },
            None => default,
        }
    }

    pub fn get_i32(&self, key: &str, default: i32) -> i32 {
        self.get(key).and_then(|v| v.parse().ok()).unwrap_or(default)
    }

    pub fn get_u16(&self, key: &str, default: u16) -> u16 {
        self.get(key).and_then(|v| v.parse().ok()).unwrap_or(default)
    }

    /// Binary value; absent or undecodable keys read as empty.
    pub fn get_blob(&self, key: &str) -> Vec<u8> {
        self.get(key).map(decode_blob).unwrap_or_default()
    }

    pub fn set_bool(&mut self, key: impl Into<String>, value: bool) {
        self.set(key, if value { "true" } else { "false" });
    }

    pub fn set_i32(&mut self, key: impl Into<String>, value: i32) {
        self.set(key, value.to_string());
    }

    pub fn set_u16(&mut self, key: impl Into<String>, value: u16) {
        self.set(key, value.to_string());
    }

    pub fn set_blob(&mut self, key: impl Into<String>, bytes: &[u8]) {
        self.set(key, encode_blob(bytes));
    }

    // ── Repeated groups (arrays) ─────────────────────────────────────────

    /// Declared length of the repeated group `name` (its `size` key).
    pub fn array_len(&self, name: &str) -> usize {
        self.get(&format!("{name}{SEP}size"))
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    /// Value of `key` in the `index`-th record of the group (1-based).
    pub fn array_get(&self, name: &str, index: usize, key: &str) -> Option<&str> {
        self.get(&format!("{name}{SEP}{index}{SEP}{key}"))
    }

    pub fn set_array_len(&mut self, name: &str, len: usize) {
        self.set(format!("{name}{SEP}size"), len.to_string());
    }

    pub fn array_set(
        &mut self,
        name: &str,
        index: usize,
        key: &str,
        value: impl Into<String>,
    ) {
        self.set(format!("{name}{SEP}{index}{SEP}{key}"), value);
    }

    // ── Child groups (one level) ─────────────────────────────────────────

    /// Distinct child group names, decoded, in first-seen order.
    pub fn child_groups(&self) -> Vec<String> {
        let mut names = Vec::new();
        for (key, _) in &self.entries {
            if let Some((head, _)) = key.split_once(SEP) {
                let name = decode_segment(head);
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    pub fn child_get(&self, group: &str, key: &str) -> Option<&str> {
        self.get(&format!("{}{SEP}{key}", encode_segment(group)))
    }

    pub fn child_set(&mut self, group: &str, key: &str, value: impl Into<String>) {
        self.set(format!("{}{SEP}{key}", encode_segment(group)), value);
    }

    pub fn child_blob(&self, group: &str, key: &str) -> Vec<u8> {
        self.child_get(group, key).map(decode_blob).unwrap_or_default()
    }

    pub fn set_child_blob(&mut self, group: &str, key: &str, bytes: &[u8]) {
        self.child_set(group, key, encode_blob(bytes));
    }
}

/// A whole settings file: ordered sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: Vec<IniSection>,
}

impl IniDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Best-effort parse. Unreadable lines are skipped with a warning;
    /// keys appearing before any section header belong to `General`.
    pub fn parse(text: &str) -> Self {
        let mut doc = Self::new();
        let mut current: Option<usize> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            if let Some(rest) = line.strip_prefix('[') {
                match rest.find(']') {
                    Some(end) if !rest[..end].trim().is_empty() => {
                        let name = rest[..end].trim().to_string();
                        current = Some(doc.index_of_or_insert(&name));
                    }
                    _ => {
                        log::warn!("settings line {}: bad section header, skipped", idx + 1);
                    }
                }
                continue;
            }

            match line.split_once('=') {
                Some((key, value)) if !key.trim().is_empty() => {
                    let section = match current {
                        Some(i) => i,
                        None => doc.index_of_or_insert("General"),
                    };
                    doc.sections[section].set(key.trim().to_string(), parse_value(value));
                }
                _ => {
                    log::warn!("settings line {}: not a key=value pair, skipped", idx + 1);
                }
            }
        }

        doc
    }

    pub fn section(&self, name: &str) -> Option<&IniSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Section by name, created at the end of the document if absent.
    pub fn section_mut(&mut self, name: &str) -> &mut IniSection {
        let idx = self.index_of_or_insert(name);
        &mut self.sections[idx]
    }

    fn index_of_or_insert(&mut self, name: &str) -> usize {
        match self.sections.iter().position(|s| s.name == name) {
            Some(idx) => idx,
            None => {
                self.sections.push(IniSection::new(name));
                self.sections.len() - 1
            }
        }
    }

    /// Serialize back to INI text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push('[');
            out.push_str(&section.name);
            out.push_str("]\n");
            for (key, value) in &section.entries {
                out.push_str(key);
                out.push('=');
                write_value(&mut out, value);
                out.push('\n');
            }
        }
        out
    }
}

// ── Value escaping ───────────────────────────────────────────────────────

/// A raw value survives a trim-and-split parse unless it carries edge
/// whitespace, line breaks, a leading quote, or a comment character.
fn needs_quotes(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    value != value.trim()
        || value.starts_with('"')
        || value.contains(['\n', '\r', ';', '#'])
}

fn write_value(out: &mut String, value: &str) {
    if !needs_quotes(value) {
        out.push_str(value);
        return;
    }
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
}

fn parse_value(raw: &str) -> String {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix('"') else {
        return trimmed.to_string();
    };

    let mut out = String::new();
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => break,
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => break,
            },
            _ => out.push(c),
        }
    }
    out
}

// ── Key segment encoding ─────────────────────────────────────────────────

fn is_plain(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'-' | b'.')
}

/// Percent-encode one key path segment (used for child group names,
/// which are arbitrary strings).
pub(crate) fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for &byte in segment.as_bytes() {
        if is_plain(byte) {
            out.push(byte as char);
        } else {
            out.push('%');
            out.push_str(&format!("{byte:02X}"));
        }
    }
    out
}

/// Inverse of [`encode_segment`]; malformed escapes pass through.
pub(crate) fn decode_segment(segment: &str) -> String {
    let bytes = segment.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && bytes[i + 1].is_ascii_hexdigit()
            && bytes[i + 2].is_ascii_hexdigit()
        {
            // both hex digits are ASCII, so the str slice is in bounds
            if let Ok(byte) = u8::from_str_radix(&segment[i + 1..i + 3], 16) {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

// ── Blob encoding ────────────────────────────────────────────────────────

pub(crate) fn encode_blob(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

pub(crate) fn decode_blob(text: &str) -> Vec<u8> {
    match BASE64.decode(text.trim()) {
        Ok(bytes) => bytes,
        Err(_) => {
            log::warn!("discarding undecodable binary value");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sections_and_keys() {
        let doc = IniDocument::parse(
            "[General]\nusername=Alice\n\n[GUI]\nsmoothAnimation=false\n",
        );

        assert_eq!(doc.section("General").unwrap().get("username"), Some("Alice"));
        assert!(!doc.section("GUI").unwrap().get_bool("smoothAnimation", true));
        assert!(doc.section("Missing").is_none());
    }

    #[test]
    fn test_keys_before_header_belong_to_general() {
        let doc = IniDocument::parse("username=Bob\n[General]\nstatusMessage=hi\n");

        let general = doc.section("General").unwrap();
        assert_eq!(general.get("username"), Some("Bob"));
        assert_eq!(general.get("statusMessage"), Some("hi"));
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let doc = IniDocument::parse(
            "[General]\n; comment\n# comment\ngarbage line\n=nokey\nusername=Eve\n[broken\n",
        );

        let general = doc.section("General").unwrap();
        assert_eq!(general.get("username"), Some("Eve"));
        assert_eq!(general.entries.len(), 1);
    }

    #[test]
    fn test_quoted_value_round_trip() {
        let mut doc = IniDocument::new();
        doc.section_mut("General")
            .set("statusMessage", "  spaced; \"quoted\"\nsecond line\t");

        let reparsed = IniDocument::parse(&doc.render());
        assert_eq!(
            reparsed.section("General").unwrap().get("statusMessage"),
            Some("  spaced; \"quoted\"\nsecond line\t"),
        );
    }

    #[test]
    fn test_plain_values_stay_unquoted() {
        let mut doc = IniDocument::new();
        doc.section_mut("General").set("username", "My name");

        assert!(doc.render().contains("username=My name\n"));
    }

    #[test]
    fn test_array_round_trip() {
        let mut doc = IniDocument::new();
        let section = doc.section_mut("DHT Server");
        section.set_array_len("dhtServerList", 2);
        section.array_set("dhtServerList", 1, "name", "first");
        section.array_set("dhtServerList", 2, "name", "second");

        let reparsed = IniDocument::parse(&doc.render());
        let section = reparsed.section("DHT Server").unwrap();
        assert_eq!(section.array_len("dhtServerList"), 2);
        assert_eq!(section.array_get("dhtServerList", 1, "name"), Some("first"));
        assert_eq!(section.array_get("dhtServerList", 2, "name"), Some("second"));
    }

    #[test]
    fn test_missing_array_reads_as_empty() {
        let doc = IniDocument::parse("[DHT Server]\n");
        assert_eq!(doc.section("DHT Server").unwrap().array_len("dhtServerList"), 0);
    }

    #[test]
    fn test_child_groups_with_awkward_names() {
        let mut doc = IniDocument::new();
        let section = doc.section_mut("WindowSettings");
        section.set_child_blob("Main Window", "geometry", b"\x01\x02");
        section.set_child_blob("chat\\peer=7", "geometry", b"\x03");

        let reparsed = IniDocument::parse(&doc.render());
        let section = reparsed.section("WindowSettings").unwrap();
        assert_eq!(
            section.child_groups(),
            vec!["Main Window".to_string(), "chat\\peer=7".to_string()],
        );
        assert_eq!(section.child_blob("Main Window", "geometry"), vec![1, 2]);
        assert_eq!(section.child_blob("chat\\peer=7", "geometry"), vec![3]);
    }

    #[test]
    fn test_bool_and_int_coercion() {
        let doc = IniDocument::parse(
            "[GUI]\na=1\nb=0\nc=TRUE\nd=maybe\nsize=14\nbadSize=tall\nport=33445\n",
        );
        let gui = doc.section("GUI").unwrap();

        assert!(gui.get_bool("a", false));
        assert!(!gui.get_bool("b", true));
        assert!(gui.get_bool("c", false));
        assert!(gui.get_bool("d", true));
        assert!(!gui.get_bool("d", false));
        assert_eq!(gui.get_i32("size", 12), 14);
        assert_eq!(gui.get_i32("badSize", 12), 12);
        assert_eq!(gui.get_u16("port", 0), 33445);
        assert_eq!(gui.get_u16("missing", 7), 7);
    }

    #[test]
    fn test_blob_round_trip_and_bad_base64() {
        let mut doc = IniDocument::new();
        doc.section_mut("GUI").set_blob("smileyPack", &[0, 159, 146, 150]);
        doc.section_mut("GUI").set("broken", "!!not base64!!");

        let reparsed = IniDocument::parse(&doc.render());
        let gui = reparsed.section("GUI").unwrap();
        assert_eq!(gui.get_blob("smileyPack"), vec![0, 159, 146, 150]);
        assert!(gui.get_blob("broken").is_empty());
        assert!(gui.get_blob("absent").is_empty());
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut doc = IniDocument::new();
        let section = doc.section_mut("General");
        section.set("username", "one");
        section.set("statusMessage", "hi");
        section.set("username", "two");

        assert_eq!(section.get("username"), Some("two"));
        assert_eq!(section.entries[0].0, "username");
    }
}
