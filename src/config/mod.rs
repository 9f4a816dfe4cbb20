//! Configuration model
//!
//! Turns a section source into typed world and map sections:
//! 1. Built-in defaults per option
//! 2. Global templates (`global:world`, `global:map`)
//! 3. Named sections (`world:<name>`, `map:<name>`)

mod field;
mod file;
mod issue;
mod map;
mod rotation;
mod world;

pub use field::Field;
pub use file::{
    map_identity, world_identity, ConfigError, ConfigFile, FILE_SECTION, GLOBAL_MAP_SECTION,
    GLOBAL_WORLD_SECTION,
};
pub use issue::ConfigIssue;
pub use map::{
    MapSection, BOOL_OPTIONS, DEFAULT_RENDERMODE, DEFAULT_ROTATIONS, DEFAULT_TEXTURE_SIZE, RENDERMODES,
    TEXTURE_SIZE_RANGE,
};
pub use rotation::{format_rotations, parse_rotations, Rotation};
pub use world::WorldSection;
