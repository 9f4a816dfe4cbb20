//! World sections (`["world:<name>"]`, `["global:world"]`).

use std::path::{Path, PathBuf};

use tilemap_sections::{ConfigSection, ValidationList};
use tracing::debug;

use super::field::{resolve_path, Field};
use super::issue::ConfigIssue;

/// Configuration of one input world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldSection {
    global: bool,
    name: String,
    input_dir: Field<PathBuf>,
}

impl WorldSection {
    pub fn new(global: bool) -> Self {
        Self {
            global,
            name: String::new(),
            input_dir: Field::new(),
        }
    }

    /// The template every named world falls back to.
    pub fn global() -> Self {
        Self::new(true)
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::new(false)
        }
    }

    pub fn set_global(&mut self, global: bool) {
        self.global = global;
    }

    pub fn is_global(&self) -> bool {
        self.global
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the input directory directly. Used on the global template before
    /// named worlds are parsed.
    pub fn set_input_dir(&mut self, input_dir: PathBuf) {
        self.input_dir.set_value(input_dir);
    }

    pub fn input_dir(&self) -> PathBuf {
        self.input_dir.value()
    }

    /// True if every mandatory option resolved to a value.
    pub fn has_mandatory_fields(&self) -> bool {
        self.global || self.input_dir.is_loaded()
    }

    /// Parse the section's options, falling back to `global` for anything
    /// the section leaves out.
    ///
    /// Problems are recorded into `validation`. Returns true iff no error
    /// was recorded for this section.
    pub fn parse(
        &mut self,
        section: &ConfigSection,
        config_dir: &Path,
        global: Option<&WorldSection>,
        validation: &mut ValidationList,
    ) -> bool {
        let errors_before = validation.error_count();

        for (key, raw) in section.entries() {
            match key.as_str() {
                "input_dir" => {
                    if raw.trim().is_empty() {
                        validation.push(ConfigIssue::mismatch(key, raw, "a non-empty path"));
                    } else {
                        self.input_dir.set_value(resolve_path(config_dir, raw));
                    }
                }
                _ => validation.push(ConfigIssue::unknown_option(key)),
            }
        }

        if let Some(global) = global {
            self.input_dir.inherit_from(&global.input_dir);
        }

        if !self.global && !self.input_dir.is_loaded() && !section.has("input_dir") {
            validation.push(ConfigIssue::missing("input_dir"));
        }

        debug!(world = %self.name, global = self.global, "parsed world section");
        validation.error_count() == errors_before
    }

    /// The resolved options as a section.
    pub fn to_section(&self) -> ConfigSection {
        let mut section = if self.global {
            ConfigSection::new("global", "world")
        } else {
            ConfigSection::new("world", self.name.as_str())
        };
        if let Some(input_dir) = self.input_dir.get() {
            section.set("input_dir", input_dir.to_string_lossy());
        }
        section
    }
}

impl Default for WorldSection {
    fn default() -> Self {
        Self::new(false)
    }
}
