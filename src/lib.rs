//! Tile-map renderer configuration
//!
//! Parses a sectioned configuration file into validated world and map
//! sections, reports every problem in one pass, and tracks the render state
//! a run derives from it (rotations in use, zoom depths, per-rotation
//! skip/auto/force behaviors).

pub mod config;
pub mod helper;
pub mod logging;

pub use config::{ConfigError, ConfigFile, Field, MapSection, Rotation, WorldSection};
pub use helper::{ConfigHelper, RenderBehavior, RotationSelector};
pub use tilemap_sections::{
    ConfigSection, ConfigSource, Severity, ValidationList, ValidationMap, ValidationMessage,
};
