//! Configuration fixtures for integration tests
//!
//! - `valid.toml`: global templates, two worlds, three maps
//! - `broken.toml`: one problem of every kind, with `broken.expected.json`
//!   listing the findings per section
//! - `no_output.toml`: lacks the mandatory `output_dir`

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tilemap_config::{ConfigFile, ValidationMap};

pub fn configs_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/configs")
}

pub fn config_path(name: &str) -> PathBuf {
    configs_dir().join(name)
}

/// Parse a fixture file, panicking on I/O or syntax errors.
pub fn parse_fixture(name: &str) -> (ConfigFile, ValidationMap, bool) {
    let mut config = ConfigFile::new();
    let mut validation = ValidationMap::new();
    let ok = config
        .parse(&config_path(name), &mut validation)
        .expect("fixture should load");
    (config, validation, ok)
}

/// Findings expected for one section.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct SectionCounts {
    pub errors: usize,
    pub warnings: usize,
}

/// Golden expectations for a broken fixture.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Expectations {
    pub ok: bool,
    pub worlds: Vec<String>,
    pub maps: Vec<String>,
    pub sections: BTreeMap<String, SectionCounts>,
}

impl Expectations {
    pub fn load(name: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(config_path(name))?;
        Ok(serde_json::from_str(&content)?)
    }
}
