//! The configuration file: output options, global templates, worlds and maps.
//!
//! Parsing runs in four passes:
//! 1. root options (`output_dir`, `template_dir`); missing ones are fatal
//! 2. the `global:world` and `global:map` templates
//! 3. every `world:*` and `map:*` section, each against its template
//! 4. cross-references from maps to worlds
//!
//! Every problem short of a fatal one is recorded and parsing goes on, so a
//! single run reports everything wrong with the file.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tilemap_sections::{
    ConfigSection, ConfigSource, SourceError, ValidationList, ValidationMap, ValueKind,
};
use tracing::{debug, info, warn};

use super::field::{resolve_path, Field};
use super::issue::ConfigIssue;
use super::map::{MapSection, BOOL_OPTIONS};
use super::world::WorldSection;

/// Validation identity of file-level findings.
pub const FILE_SECTION: &str = "Configuration file";

/// Validation identity of the global world template.
pub const GLOBAL_WORLD_SECTION: &str = "Global world configuration";

/// Validation identity of the global map template.
pub const GLOBAL_MAP_SECTION: &str = "Global map configuration";

pub fn world_identity(name: &str) -> String {
    format!("World section '{}'", name)
}

pub fn map_identity(name: &str) -> String {
    format!("Map section '{}'", name)
}

/// A parsed and validated configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    world_global: WorldSection,
    map_global: MapSection,

    output_dir: Field<PathBuf>,
    template_dir: Field<PathBuf>,

    worlds: BTreeMap<String, WorldSection>,
    maps: Vec<MapSection>,

    config_dir: PathBuf,
    digest: Option<String>,
}

impl ConfigFile {
    pub fn new() -> Self {
        Self {
            world_global: WorldSection::global(),
            map_global: MapSection::global(),
            output_dir: Field::new(),
            template_dir: Field::new(),
            worlds: BTreeMap::new(),
            maps: Vec::new(),
            config_dir: PathBuf::new(),
            digest: None,
        }
    }

    /// Read, tokenize and parse a configuration file.
    ///
    /// Relative paths in the file are resolved against the file's directory.
    /// An unreadable or syntactically broken file is an `Err`; everything
    /// else is recorded into `validation` and reflected in the returned flag.
    pub fn parse(&mut self, path: &Path, validation: &mut ValidationMap) -> Result<bool, ConfigError> {
        info!(path = %path.display(), "Loading configuration");
        let source = ConfigSource::load(path)?;

        let parent = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let config_dir = fs::canonicalize(&parent)?;

        Ok(self.parse_source(&source, &config_dir, validation))
    }

    /// Parse an already tokenized source.
    ///
    /// Returns true iff no error was recorded.
    pub fn parse_source(
        &mut self,
        source: &ConfigSource,
        config_dir: &Path,
        validation: &mut ValidationMap,
    ) -> bool {
        *self = Self::new();
        self.config_dir = config_dir.to_path_buf();
        self.digest = source.digest().map(str::to_string);

        if !self.parse_root(source.root(), config_dir, validation.section(FILE_SECTION)) {
            warn!("Configuration file lacks mandatory output options");
            return false;
        }

        let mut ok = self.parse_globals(source, config_dir, validation);

        for section in source.sections() {
            match section.type_name() {
                "global" if matches!(section.name(), "world" | "map") => {}
                "world" => ok &= self.parse_world(section, config_dir, validation),
                "map" => ok &= self.parse_map(section, config_dir, validation),
                _ => {
                    let identity = format!("Section '{}'", section.header());
                    validation.section(&identity).push(ConfigIssue::UnknownSection {
                        header: section.header(),
                    });
                }
            }
        }

        ok &= self.cross_validate(validation);

        info!(
            worlds = self.worlds.len(),
            maps = self.maps.len(),
            ok,
            "Configuration parsed"
        );
        ok
    }

    fn parse_root(&mut self, root: &ConfigSection, config_dir: &Path, validation: &mut ValidationList) -> bool {
        let errors_before = validation.error_count();

        for (key, raw) in root.entries() {
            let field = match key.as_str() {
                "output_dir" => &mut self.output_dir,
                "template_dir" => &mut self.template_dir,
                _ => {
                    validation.push(ConfigIssue::unknown_option(key));
                    continue;
                }
            };
            if raw.trim().is_empty() {
                validation.push(ConfigIssue::mismatch(key, raw, "a non-empty path"));
            } else {
                field.set_value(resolve_path(config_dir, raw));
            }
        }

        for (key, field) in [("output_dir", &self.output_dir), ("template_dir", &self.template_dir)] {
            if !field.is_loaded() && !root.has(key) {
                validation.push(ConfigIssue::missing(key));
            }
        }

        validation.error_count() == errors_before
    }

    /// Parse the global templates ahead of the named sections.
    ///
    /// A repeated template is an error; its options are still checked and
    /// reported, then discarded.
    fn parse_globals(&mut self, source: &ConfigSource, config_dir: &Path, validation: &mut ValidationMap) -> bool {
        let mut ok = true;
        let mut seen_world = false;
        let mut seen_map = false;

        for section in source.sections().iter().filter(|s| s.type_name() == "global") {
            let mut list = ValidationList::new();
            let identity = match section.name() {
                "world" => {
                    if seen_world {
                        list.push(duplicate_global(section));
                        WorldSection::global().parse(section, config_dir, None, &mut list);
                    } else {
                        self.world_global.parse(section, config_dir, None, &mut list);
                        seen_world = true;
                    }
                    GLOBAL_WORLD_SECTION
                }
                "map" => {
                    if seen_map {
                        list.push(duplicate_global(section));
                        MapSection::global().parse(section, config_dir, None, &mut list);
                    } else {
                        self.map_global.parse(section, config_dir, None, &mut list);
                        seen_map = true;
                    }
                    GLOBAL_MAP_SECTION
                }
                _ => continue,
            };
            ok &= !list.has_errors();
            validation.record(identity, list);
        }
        ok
    }

    fn parse_world(&mut self, section: &ConfigSection, config_dir: &Path, validation: &mut ValidationMap) -> bool {
        let name = section.name();
        let identity = world_identity(name);
        let list = validation.section(&identity);

        if name.is_empty() {
            list.push(ConfigIssue::EmptyName { kind: "World" });
            return false;
        }
        if self.worlds.contains_key(name) {
            list.push(ConfigIssue::DuplicateName {
                kind: "World",
                name: name.to_string(),
            });
            return false;
        }

        let mut world = WorldSection::named(name);
        let ok = world.parse(section, config_dir, Some(&self.world_global), list);
        if world.has_mandatory_fields() {
            self.worlds.insert(name.to_string(), world);
        } else {
            debug!(world = name, "Dropping world section with missing mandatory options");
        }
        ok
    }

    fn parse_map(&mut self, section: &ConfigSection, config_dir: &Path, validation: &mut ValidationMap) -> bool {
        let name = section.name();
        let identity = map_identity(name);
        let list = validation.section(&identity);

        if name.is_empty() {
            list.push(ConfigIssue::EmptyName { kind: "Map" });
            return false;
        }
        if self.has_map(name) {
            list.push(ConfigIssue::DuplicateName {
                kind: "Map",
                name: name.to_string(),
            });
            return false;
        }

        let mut map = MapSection::named(name);
        let ok = map.parse(section, config_dir, Some(&self.map_global), list);
        if map.has_mandatory_fields() {
            self.maps.push(map);
        } else {
            debug!(map = name, "Dropping map section with missing mandatory options");
        }
        ok
    }

    /// Check map-to-world references and drop maps whose world is missing.
    fn cross_validate(&mut self, validation: &mut ValidationMap) -> bool {
        let mut ok = true;

        for map in &self.maps {
            let world = map.world();
            if !self.worlds.contains_key(&world) {
                validation
                    .section(&map_identity(map.short_name()))
                    .push(ConfigIssue::UnknownWorld {
                        map: map.short_name().to_string(),
                        world,
                    });
                ok = false;
            }
        }

        let worlds = &self.worlds;
        self.maps.retain(|m| worlds.contains_key(&m.world()));

        let file = validation.section(FILE_SECTION);
        if self.worlds.is_empty() {
            file.push(ConfigIssue::NoWorlds);
            ok = false;
        }
        if self.maps.is_empty() {
            file.push(ConfigIssue::NoMaps);
            ok = false;
        }
        ok
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.value()
    }

    pub fn template_dir(&self) -> PathBuf {
        self.template_dir.value()
    }

    /// A path below the output directory.
    pub fn output_path(&self, path: impl AsRef<Path>) -> PathBuf {
        self.output_dir().join(path)
    }

    /// A path below the template directory.
    pub fn template_path(&self, path: impl AsRef<Path>) -> PathBuf {
        self.template_dir().join(path)
    }

    /// Directory relative paths were resolved against.
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// SHA-256 of the file the configuration was parsed from.
    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    pub fn world_global(&self) -> &WorldSection {
        &self.world_global
    }

    pub fn map_global(&self) -> &MapSection {
        &self.map_global
    }

    pub fn has_world(&self, world: &str) -> bool {
        self.worlds.contains_key(world)
    }

    pub fn worlds(&self) -> &BTreeMap<String, WorldSection> {
        &self.worlds
    }

    /// Look up a world; check [`has_world`](Self::has_world) first when
    /// absence is a bug.
    pub fn world(&self, world: &str) -> Option<&WorldSection> {
        self.worlds.get(world)
    }

    pub fn has_map(&self, map: &str) -> bool {
        self.maps.iter().any(|m| m.short_name() == map)
    }

    /// Maps in file order.
    pub fn maps(&self) -> &[MapSection] {
        &self.maps
    }

    /// Look up a map by short name.
    pub fn map(&self, map: &str) -> Option<&MapSection> {
        self.maps.iter().find(|m| m.short_name() == map)
    }

    /// The resolved configuration as a section document.
    pub fn to_source(&self) -> ConfigSource {
        let mut source = ConfigSource::new();
        let root = source.root_mut();
        for (key, field) in [("output_dir", &self.output_dir), ("template_dir", &self.template_dir)] {
            if let Some(path) = field.get() {
                root.set(key, path.to_string_lossy());
            }
        }
        for world in self.worlds.values() {
            source.push_section(world.to_section());
        }
        for map in &self.maps {
            source.push_section(map.to_section());
        }
        source
    }

    /// Write the resolved configuration as TOML.
    ///
    /// Every value is written as resolved after inheritance, so the output
    /// has no global templates. Parsing it again yields the same values.
    pub fn dump(&self, out: &mut impl Write) -> Result<(), ConfigError> {
        let text = self.dump_string()?;
        out.write_all(text.as_bytes())?;
        Ok(())
    }

    pub fn dump_string(&self) -> Result<String, ConfigError> {
        Ok(self.to_source().to_toml_string_with(dump_kind)?)
    }
}

fn duplicate_global(section: &ConfigSection) -> ConfigIssue {
    ConfigIssue::DuplicateName {
        kind: "Global section",
        name: section.name().to_string(),
    }
}

/// TOML types of written options. Names, worlds and paths stay strings even
/// when they look numeric.
fn dump_kind(section: &ConfigSection, key: &str) -> ValueKind {
    match (section.type_name(), key) {
        ("map" | "global", "texture_size") => ValueKind::Integer,
        ("map" | "global", key) if BOOL_OPTIONS.contains(&key) => ValueKind::Boolean,
        _ => ValueKind::String,
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that abort a parse before validation can run.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
