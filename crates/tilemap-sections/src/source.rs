//! Section source backed by a TOML document.
//!
//! Top-level scalar keys form the root section; every top-level table is a
//! section whose key is its `type:name` header:
//!
//! ```toml
//! output_dir = "output"
//! template_dir = "templates"
//!
//! ["world:main"]
//! input_dir = "worlds/main"
//!
//! ["map:main_day"]
//! world = "main"
//! rotations = "top-left bottom-right"
//! ```

use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

use crate::error::SourceError;
use crate::section::ConfigSection;

/// A parsed configuration document: one root section and the named
/// sections in file order.
#[derive(Debug, Clone, Default)]
pub struct ConfigSource {
    root: ConfigSection,
    sections: Vec<ConfigSection>,
    digest: Option<String>,
}

impl ConfigSource {
    /// Create an empty source, used to assemble a document for writing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and tokenize a file.
    pub fn load(path: &Path) -> Result<Self, SourceError> {
        let bytes = fs::read(path)?;
        let contents = String::from_utf8(bytes).map_err(|e| {
            SourceError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Invalid UTF-8: {}", e),
            ))
        })?;
        Self::parse(&contents)
    }

    /// Tokenize a document from a string.
    pub fn parse(contents: &str) -> Result<Self, SourceError> {
        let mut hasher = Sha256::new();
        hasher.update(contents.as_bytes());
        let digest = hex::encode(hasher.finalize());

        let document: toml::Table = toml::from_str(contents)?;

        let mut root = ConfigSection::root();
        let mut sections = Vec::new();

        for (key, value) in document {
            match value {
                toml::Value::Table(table) => {
                    let mut section = ConfigSection::from_header(&key);
                    for (entry_key, entry_value) in table {
                        let raw = scalar_to_string(&key, &entry_key, entry_value)?;
                        section.set(entry_key, raw);
                    }
                    sections.push(section);
                }
                other => {
                    let raw = scalar_to_string("", &key, other)?;
                    root.set(key, raw);
                }
            }
        }

        Ok(Self {
            root,
            sections,
            digest: Some(digest),
        })
    }

    /// The root section.
    pub fn root(&self) -> &ConfigSection {
        &self.root
    }

    /// Mutable access to the root section.
    pub fn root_mut(&mut self) -> &mut ConfigSection {
        &mut self.root
    }

    /// Named sections in file order.
    pub fn sections(&self) -> &[ConfigSection] {
        &self.sections
    }

    /// Find a section by type and name.
    pub fn section(&self, type_name: &str, name: &str) -> Option<&ConfigSection> {
        self.sections
            .iter()
            .find(|s| s.type_name() == type_name && s.name() == name)
    }

    /// Append a section.
    pub fn push_section(&mut self, section: ConfigSection) {
        self.sections.push(section);
    }

    /// SHA-256 of the document text (None for assembled sources).
    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    /// Render the document as TOML with every value written as a string.
    pub fn to_toml_string(&self) -> Result<String, SourceError> {
        self.to_toml_string_with(|_, _| ValueKind::String)
    }

    /// Render the document as TOML, typing each value by `kind(section, key)`.
    ///
    /// A value whose text does not fit its kind is written as a string.
    /// Parsing the output yields the same sections and the same raw values.
    pub fn to_toml_string_with(
        &self,
        kind: impl Fn(&ConfigSection, &str) -> ValueKind,
    ) -> Result<String, SourceError> {
        let mut document = toml::Table::new();
        for (key, value) in self.root.entries() {
            document.insert(key.clone(), typed_value(kind(&self.root, key), value));
        }
        for section in &self.sections {
            let mut table = toml::Table::new();
            for (key, value) in section.entries() {
                table.insert(key.clone(), typed_value(kind(section, key), value));
            }
            document.insert(section.header(), toml::Value::Table(table));
        }
        Ok(toml::to_string(&document)?)
    }
}

/// TOML type a raw value is written as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Integer,
    Boolean,
}

/// Flatten a TOML value to the raw string handed to section parsers.
///
/// Arrays of scalars are joined with spaces so that list-valued options
/// (rotations) can be written either way.
fn scalar_to_string(section: &str, key: &str, value: toml::Value) -> Result<String, SourceError> {
    match value {
        toml::Value::String(s) => Ok(s),
        toml::Value::Integer(i) => Ok(i.to_string()),
        toml::Value::Float(f) => Ok(f.to_string()),
        toml::Value::Boolean(b) => Ok(b.to_string()),
        toml::Value::Datetime(dt) => Ok(dt.to_string()),
        toml::Value::Array(items) => {
            let parts = items
                .into_iter()
                .map(|item| scalar_to_string(section, key, item))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(parts.join(" "))
        }
        toml::Value::Table(_) => Err(SourceError::UnsupportedValue {
            section: section.to_string(),
            key: key.to_string(),
            kind: "table",
        }),
    }
}

fn typed_value(kind: ValueKind, raw: &str) -> toml::Value {
    match kind {
        // Only canonical integers; "007" or "+5" would not read back unchanged.
        ValueKind::Integer => match raw.parse::<i64>() {
            Ok(i) if i.to_string() == raw => toml::Value::Integer(i),
            _ => toml::Value::String(raw.to_string()),
        },
        ValueKind::Boolean => match raw {
            "true" => toml::Value::Boolean(true),
            "false" => toml::Value::Boolean(false),
            _ => toml::Value::String(raw.to_string()),
        },
        ValueKind::String => toml::Value::String(raw.to_string()),
    }
}
