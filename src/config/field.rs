//! Optional-with-fallback configuration values.
//!
//! A [`Field`] resolves in a fixed order:
//! 1. the value set by the section itself
//! 2. the value inherited from the global template of the same kind
//! 3. the built-in default
//! 4. the type's zero value
//!
//! Reading never fails. Whether a mandatory value is present is checked
//! while parsing, not when reading.

use std::path::{Path, PathBuf};

/// A configuration value with global-template inheritance and a default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field<T> {
    local: Option<T>,
    inherited: Option<T>,
    default: Option<T>,
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Self {
            local: None,
            inherited: None,
            default: None,
        }
    }
}

impl<T: Clone + Default> Field<T> {
    /// A field without default.
    pub fn new() -> Self {
        Self::default()
    }

    /// A field with a built-in default.
    pub fn with_default(default: T) -> Self {
        Self {
            default: Some(default),
            ..Self::default()
        }
    }

    /// Set the section's own value.
    pub fn set_value(&mut self, value: T) {
        self.local = Some(value);
    }

    /// Take the explicitly configured value of the global template.
    ///
    /// Only values the template actually configured are inherited; its
    /// built-in default is not, since every field carries its own.
    pub fn inherit_from(&mut self, global: &Field<T>) {
        self.inherited = global.local.clone().or_else(|| global.inherited.clone());
    }

    /// True if a value was configured, locally or through the template.
    pub fn is_loaded(&self) -> bool {
        self.local.is_some() || self.inherited.is_some()
    }

    /// True if the section itself configured the value.
    pub fn has_local(&self) -> bool {
        self.local.is_some()
    }

    /// The resolved value, if any level provides one.
    pub fn get(&self) -> Option<&T> {
        self.local
            .as_ref()
            .or(self.inherited.as_ref())
            .or(self.default.as_ref())
    }

    /// The resolved value, falling back to the type's zero value.
    pub fn value(&self) -> T {
        self.get().cloned().unwrap_or_default()
    }
}

/// Join a configured path onto the configuration directory unless absolute.
pub(crate) fn resolve_path(config_dir: &Path, raw: &str) -> PathBuf {
    let path = PathBuf::from(raw);
    if path.is_absolute() {
        path
    } else {
        config_dir.join(path)
    }
}

/// Parse a boolean option value.
pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}
