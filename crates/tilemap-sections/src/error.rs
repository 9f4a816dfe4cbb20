//! Error types for loading a section source.

use std::io;

/// Errors raised while reading or writing a section source.
///
/// These are unrecoverable for a parse: the file could not be read, or its
/// text is not a well-formed document. Problems with individual values are
/// reported through the validation collector instead.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Section '{section}': value of '{key}' is a {kind}, expected a scalar")]
    UnsupportedValue {
        section: String,
        key: String,
        kind: &'static str,
    },
}
