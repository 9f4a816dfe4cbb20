//! Map sections (`["map:<name>"]`, `["global:map"]`).

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tilemap_sections::{ConfigSection, ValidationList};
use tracing::debug;

use super::field::{parse_bool, resolve_path, Field};
use super::issue::ConfigIssue;
use super::rotation::{format_rotations, parse_rotations, Rotation};

/// Rendermodes the renderer knows.
pub const RENDERMODES: &[&str] = &["normal", "daylight", "nightlight", "cave"];

/// Options holding a boolean.
pub const BOOL_OPTIONS: &[&str] = &[
    "render_unknown_blocks",
    "render_leaves_transparent",
    "render_biomes",
    "use_image_timestamps",
];

pub const DEFAULT_ROTATIONS: &str = "top-left";
pub const DEFAULT_RENDERMODE: &str = "normal";
pub const DEFAULT_TEXTURE_SIZE: u32 = 12;

/// Valid texture sizes in pixels.
pub const TEXTURE_SIZE_RANGE: std::ops::RangeInclusive<u32> = 1..=32;

/// Configuration of one rendered map view over a world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapSection {
    global: bool,

    name_short: String,
    name_long: String,
    world: Field<String>,

    texture_dir: Field<PathBuf>,
    rotations: Field<String>,
    rotations_set: BTreeSet<Rotation>,
    rendermode: Field<String>,
    texture_size: Field<u32>,

    render_unknown_blocks: Field<bool>,
    render_leaves_transparent: Field<bool>,
    render_biomes: Field<bool>,
    use_image_timestamps: Field<bool>,
}

impl MapSection {
    pub fn new(global: bool) -> Self {
        let (rotations_set, _) = parse_rotations(DEFAULT_ROTATIONS);
        Self {
            global,
            name_short: String::new(),
            name_long: String::new(),
            world: Field::new(),
            texture_dir: Field::new(),
            rotations: Field::with_default(DEFAULT_ROTATIONS.to_string()),
            rotations_set,
            rendermode: Field::with_default(DEFAULT_RENDERMODE.to_string()),
            texture_size: Field::with_default(DEFAULT_TEXTURE_SIZE),
            render_unknown_blocks: Field::with_default(false),
            render_leaves_transparent: Field::with_default(false),
            render_biomes: Field::with_default(false),
            use_image_timestamps: Field::new(),
        }
    }

    /// The template every named map falls back to.
    pub fn global() -> Self {
        Self::new(true)
    }

    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            name_long: name.clone(),
            name_short: name,
            ..Self::new(false)
        }
    }

    pub fn set_global(&mut self, global: bool) {
        self.global = global;
    }

    pub fn is_global(&self) -> bool {
        self.global
    }

    /// True if every mandatory option resolved to a value.
    pub fn has_mandatory_fields(&self) -> bool {
        self.global || self.world.get().is_some_and(|w| !w.is_empty())
    }

    /// Parse the section's options, falling back to `global` for anything
    /// the section leaves out.
    ///
    /// Each option is extracted on its own: a malformed value is recorded
    /// and the option keeps its fallback, then parsing moves on. Returns
    /// true iff no error was recorded for this section.
    pub fn parse(
        &mut self,
        section: &ConfigSection,
        config_dir: &Path,
        global: Option<&MapSection>,
        validation: &mut ValidationList,
    ) -> bool {
        let errors_before = validation.error_count();

        if !self.global && self.name_short.is_empty() {
            self.name_short = section.name().to_string();
            self.name_long = self.name_short.clone();
        }

        for (key, raw) in section.entries() {
            let key = key.as_str();
            match key {
                "name" | "world" if self.global => {
                    validation.push(ConfigIssue::IgnoredInGlobal {
                        key: key.to_string(),
                    });
                }
                "name" => self.name_long = raw.clone(),
                "world" => {
                    if raw.trim().is_empty() {
                        validation.push(ConfigIssue::mismatch(key, raw, "a world name"));
                    } else {
                        self.world.set_value(raw.trim().to_string());
                    }
                }
                "texture_dir" => {
                    if raw.trim().is_empty() {
                        validation.push(ConfigIssue::mismatch(key, raw, "a non-empty path"));
                    } else {
                        self.texture_dir.set_value(resolve_path(config_dir, raw));
                    }
                }
                "rotations" => {
                    if raw.split(|c: char| c == ',' || c.is_whitespace()).all(str::is_empty) {
                        validation.push(ConfigIssue::mismatch(key, raw, "at least one rotation"));
                    } else {
                        self.rotations.set_value(raw.clone());
                    }
                }
                "rendermode" => {
                    let mode = raw.trim();
                    if RENDERMODES.contains(&mode) {
                        self.rendermode.set_value(mode.to_string());
                    } else {
                        validation.push(ConfigIssue::unknown_token(key, "rendermode", mode, RENDERMODES));
                    }
                }
                "texture_size" => match raw.trim().parse::<i64>() {
                    Ok(size) => match u32::try_from(size) {
                        Ok(size) if TEXTURE_SIZE_RANGE.contains(&size) => {
                            self.texture_size.set_value(size)
                        }
                        _ => validation.push(ConfigIssue::OutOfRange {
                            key: key.to_string(),
                            value: raw.clone(),
                            reason: format!(
                                "must be between {} and {}",
                                TEXTURE_SIZE_RANGE.start(),
                                TEXTURE_SIZE_RANGE.end()
                            ),
                        }),
                    },
                    Err(_) => validation.push(ConfigIssue::mismatch(key, raw, "an integer")),
                },
                _ if BOOL_OPTIONS.contains(&key) => match parse_bool(raw) {
                    Some(value) => self.bool_field_mut(key).set_value(value),
                    None => validation.push(ConfigIssue::mismatch(key, raw, "a boolean")),
                },
                _ => validation.push(ConfigIssue::unknown_option(key)),
            }
        }

        if let Some(global) = global {
            self.inherit_from(global);
        }

        // Tokens of an inherited value were already reported for the template.
        let (rotations_set, unknown) = parse_rotations(&self.rotations.value());
        if self.rotations.has_local() || self.global {
            for token in &unknown {
                validation.push(ConfigIssue::unknown_token(
                    "rotations",
                    "rotation",
                    token,
                    Rotation::names(),
                ));
            }
        }
        self.rotations_set = rotations_set;

        if !self.global && !self.world.is_loaded() && !section.has("world") {
            validation.push(ConfigIssue::missing("world"));
        }

        debug!(
            map = %self.name_short,
            global = self.global,
            rotations = %format_rotations(&self.rotations_set),
            "parsed map section"
        );
        validation.error_count() == errors_before
    }

    /// Take every option the template configured, except the world.
    fn inherit_from(&mut self, global: &MapSection) {
        self.texture_dir.inherit_from(&global.texture_dir);
        self.rotations.inherit_from(&global.rotations);
        self.rendermode.inherit_from(&global.rendermode);
        self.texture_size.inherit_from(&global.texture_size);
        self.render_unknown_blocks
            .inherit_from(&global.render_unknown_blocks);
        self.render_leaves_transparent
            .inherit_from(&global.render_leaves_transparent);
        self.render_biomes.inherit_from(&global.render_biomes);
        self.use_image_timestamps
            .inherit_from(&global.use_image_timestamps);
    }

    fn bool_field_mut(&mut self, key: &str) -> &mut Field<bool> {
        match key {
            "render_unknown_blocks" => &mut self.render_unknown_blocks,
            "render_leaves_transparent" => &mut self.render_leaves_transparent,
            "render_biomes" => &mut self.render_biomes,
            _ => &mut self.use_image_timestamps,
        }
    }

    pub fn short_name(&self) -> &str {
        &self.name_short
    }

    pub fn long_name(&self) -> &str {
        &self.name_long
    }

    pub fn world(&self) -> String {
        self.world.value()
    }

    pub fn texture_dir(&self) -> PathBuf {
        self.texture_dir.value()
    }

    /// The configured rotations, ascending.
    pub fn rotations(&self) -> &BTreeSet<Rotation> {
        &self.rotations_set
    }

    pub fn rendermode(&self) -> String {
        self.rendermode.value()
    }

    pub fn texture_size(&self) -> u32 {
        self.texture_size.value()
    }

    /// Edge length of a rendered tile in pixels.
    pub fn tile_size(&self) -> u32 {
        self.texture_size() * 32
    }

    pub fn render_unknown_blocks(&self) -> bool {
        self.render_unknown_blocks.value()
    }

    pub fn render_leaves_transparent(&self) -> bool {
        self.render_leaves_transparent.value()
    }

    pub fn render_biomes(&self) -> bool {
        self.render_biomes.value()
    }

    pub fn use_image_timestamps(&self) -> bool {
        self.use_image_timestamps.value()
    }

    /// The resolved options as a section. Options with no value at any
    /// level are left out.
    pub fn to_section(&self) -> ConfigSection {
        let mut section = if self.global {
            ConfigSection::new("global", "map")
        } else {
            let mut section = ConfigSection::new("map", self.name_short.as_str());
            section.set("name", self.name_long.as_str());
            if let Some(world) = self.world.get() {
                section.set("world", world.as_str());
            }
            section
        };

        if let Some(texture_dir) = self.texture_dir.get() {
            section.set("texture_dir", texture_dir.to_string_lossy());
        }
        section.set("rotations", format_rotations(&self.rotations_set));
        section.set("rendermode", self.rendermode());
        section.set("texture_size", self.texture_size().to_string());

        let flags = [
            ("render_unknown_blocks", &self.render_unknown_blocks),
            ("render_leaves_transparent", &self.render_leaves_transparent),
            ("render_biomes", &self.render_biomes),
            ("use_image_timestamps", &self.use_image_timestamps),
        ];
        for (key, field) in flags {
            if let Some(value) = field.get() {
                section.set(key, value.to_string());
            }
        }
        section
    }
}

impl Default for MapSection {
    fn default() -> Self {
        Self::new(false)
    }
}
