//! A single named block of key-value entries.

use std::fmt;

/// A section of key-value entries.
///
/// Sections are identified by a type and a name, written `type:name` in the
/// file header. The root section holds the keys that appear before the first
/// header and has an empty type and name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSection {
    type_name: String,
    name: String,
    entries: Vec<(String, String)>,
}

impl ConfigSection {
    /// Create an empty section with the given type and name.
    pub fn new(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Create the empty root section.
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a section from a `type:name` header.
    ///
    /// A header without a colon is taken as a bare type with an empty name.
    pub fn from_header(header: &str) -> Self {
        match header.split_once(':') {
            Some((type_name, name)) => Self::new(type_name.trim(), name.trim()),
            None => Self::new(header.trim(), ""),
        }
    }

    /// The section type (`world`, `map`, `global`, ...).
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The section name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True for the root section.
    pub fn is_root(&self) -> bool {
        self.type_name.is_empty() && self.name.is_empty()
    }

    /// The header text this section is written under.
    pub fn header(&self) -> String {
        if self.name.is_empty() {
            self.type_name.clone()
        } else {
            format!("{}:{}", self.type_name, self.name)
        }
    }

    /// Check whether a key is present.
    pub fn has(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Get the raw value of a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set a key, replacing an existing value in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Entries in file order.
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }
}

impl fmt::Display for ConfigSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "root section")
        } else {
            write!(f, "section '{}'", self.header())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_header() {
        let section = ConfigSection::from_header("map:world_day");
        assert_eq!(section.type_name(), "map");
        assert_eq!(section.name(), "world_day");
        assert_eq!(section.header(), "map:world_day");

        let bare = ConfigSection::from_header("output");
        assert_eq!(bare.type_name(), "output");
        assert_eq!(bare.name(), "");
        assert_eq!(bare.header(), "output");
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut section = ConfigSection::new("world", "main");
        section.set("input_dir", "a");
        section.set("other", "b");
        section.set("input_dir", "c");

        assert_eq!(section.get("input_dir"), Some("c"));
        let keys: Vec<&str> = section.entries().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["input_dir", "other"]);
    }

    #[test]
    fn test_root() {
        let root = ConfigSection::root();
        assert!(root.is_root());
        assert_eq!(root.to_string(), "root section");
        assert_eq!(
            ConfigSection::new("map", "x").to_string(),
            "section 'map:x'"
        );
    }
}
