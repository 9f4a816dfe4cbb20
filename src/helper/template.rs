//! Viewer configuration payload (`var CONFIG = {...};`).

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateConfig {
    pub output_dir: String,
    pub template_dir: String,
    pub worlds: Vec<TemplateWorld>,
    pub maps: Vec<TemplateMap>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateWorld {
    pub name: String,
    /// Rotation indices rendered for this world, ascending.
    pub rotations: Vec<usize>,
    pub zoom_level: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMap {
    pub name: String,
    pub long_name: String,
    pub world: String,
    pub rotations: Vec<usize>,
    pub rendermode: String,
    pub texture_size: u32,
    pub tile_size: u32,
    pub zoom_level: u32,
}

impl TemplateConfig {
    /// Render as a JavaScript assignment the viewer loads verbatim.
    pub fn to_javascript(&self) -> Result<String, serde_json::Error> {
        let body = serde_json::to_string_pretty(self)?;
        Ok(format!("var CONFIG = {};\n", body))
    }
}
