//! Render state derived from a parsed configuration
//!
//! Holds what a render run decides per world and map: rotations in use,
//! zoom depths and skip/auto/force behaviors. Also builds the viewer payload.

mod behavior;
mod config_helper;
mod template;

pub use behavior::{RenderBehavior, RotationSelector, SelectorError};
pub use config_helper::ConfigHelper;
pub use template::{TemplateConfig, TemplateMap, TemplateWorld};
