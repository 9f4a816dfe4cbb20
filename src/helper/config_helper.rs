//! Derived render state for one run over a parsed configuration.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::behavior::{RenderBehavior, RotationSelector};
use super::template::{TemplateConfig, TemplateMap, TemplateWorld};
use crate::config::{ConfigFile, Rotation};

static NO_ROTATIONS: BTreeSet<Rotation> = BTreeSet::new();

/// State the render pipeline computes on top of a [`ConfigFile`]: rotations
/// used per world, zoom depths, and per-rotation render behaviors of maps.
#[derive(Debug, Clone)]
pub struct ConfigHelper {
    config: ConfigFile,
    world_rotations: BTreeMap<String, BTreeSet<Rotation>>,
    world_zoomlevels: BTreeMap<String, u32>,
    map_zoomlevels: BTreeMap<String, u32>,
    render_behaviors: BTreeMap<String, [RenderBehavior; 4]>,
}

impl ConfigHelper {
    /// Every map starts at [`RenderBehavior::Auto`] for all rotations, and
    /// each world uses the union of its maps' rotations.
    pub fn new(config: ConfigFile) -> Self {
        let mut world_rotations: BTreeMap<String, BTreeSet<Rotation>> = BTreeMap::new();
        let mut render_behaviors = BTreeMap::new();

        for map in config.maps() {
            world_rotations
                .entry(map.world())
                .or_default()
                .extend(map.rotations().iter().copied());
            render_behaviors.insert(map.short_name().to_string(), [RenderBehavior::Auto; 4]);
        }

        Self {
            config,
            world_rotations,
            world_zoomlevels: BTreeMap::new(),
            map_zoomlevels: BTreeMap::new(),
            render_behaviors,
        }
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Rotations rendered for a world. Empty for unknown worlds.
    pub fn used_rotations(&self, world: &str) -> &BTreeSet<Rotation> {
        self.world_rotations.get(world).unwrap_or(&NO_ROTATIONS)
    }

    pub fn set_used_rotations(&mut self, world: &str, rotations: BTreeSet<Rotation>) {
        self.world_rotations.insert(world.to_string(), rotations);
    }

    pub fn world_zoomlevel(&self, world: &str) -> u32 {
        self.world_zoomlevels.get(world).copied().unwrap_or(0)
    }

    pub fn set_world_zoomlevel(&mut self, world: &str, zoomlevel: u32) {
        self.world_zoomlevels.insert(world.to_string(), zoomlevel);
    }

    pub fn map_zoomlevel(&self, map: &str) -> u32 {
        self.map_zoomlevels.get(map).copied().unwrap_or(0)
    }

    pub fn set_map_zoomlevel(&mut self, map: &str, zoomlevel: u32) {
        self.map_zoomlevels.insert(map.to_string(), zoomlevel);
    }

    /// Behavior of one rotation, or of all four when they agree.
    ///
    /// [`RotationSelector::All`] yields `Auto` if the slots differ. Unknown
    /// maps read as `Auto`.
    pub fn render_behavior(&self, map: &str, selector: impl Into<RotationSelector>) -> RenderBehavior {
        let Some(slots) = self.render_behaviors.get(map) else {
            return RenderBehavior::Auto;
        };
        match selector.into() {
            RotationSelector::Single(rotation) => slots[rotation.index()],
            RotationSelector::All => {
                let first = slots[0];
                if slots.iter().all(|b| *b == first) {
                    first
                } else {
                    RenderBehavior::Auto
                }
            }
        }
    }

    pub fn set_render_behavior(
        &mut self,
        map: &str,
        selector: impl Into<RotationSelector>,
        behavior: RenderBehavior,
    ) {
        let selector = selector.into();
        let slots = self
            .render_behaviors
            .entry(map.to_string())
            .or_insert([RenderBehavior::Auto; 4]);
        match selector {
            RotationSelector::All => *slots = [behavior; 4],
            RotationSelector::Single(rotation) => slots[rotation.index()] = behavior,
        }
        debug!(map, rotation = selector.as_index(), %behavior, "set render behavior");
    }

    /// All four slots of a map, indexed by rotation.
    pub fn render_behaviors(&self, map: &str) -> [RenderBehavior; 4] {
        self.render_behaviors
            .get(map)
            .copied()
            .unwrap_or([RenderBehavior::Auto; 4])
    }

    pub fn is_complete_render_skip(&self, map: &str) -> bool {
        self.render_behaviors(map)
            .iter()
            .all(|b| *b == RenderBehavior::Skip)
    }

    pub fn is_complete_render_force(&self, map: &str) -> bool {
        self.render_behaviors(map)
            .iter()
            .all(|b| *b == RenderBehavior::Force)
    }

    /// Take over every non-`Auto` slot of `other`.
    ///
    /// Used to combine helpers of workers that each decided a subset of maps.
    pub fn merge_render_behaviors(&mut self, other: &ConfigHelper) {
        for (map, theirs) in &other.render_behaviors {
            let ours = self
                .render_behaviors
                .entry(map.clone())
                .or_insert([RenderBehavior::Auto; 4]);
            for (slot, behavior) in ours.iter_mut().zip(theirs) {
                if *behavior != RenderBehavior::Auto {
                    *slot = *behavior;
                }
            }
        }
    }

    /// The viewer payload for the current state.
    pub fn template_config(&self) -> TemplateConfig {
        let worlds = self
            .config
            .worlds()
            .keys()
            .map(|name| TemplateWorld {
                name: name.clone(),
                rotations: indices(self.used_rotations(name)),
                zoom_level: self.world_zoomlevel(name),
            })
            .collect();

        let maps = self
            .config
            .maps()
            .iter()
            .map(|map| TemplateMap {
                name: map.short_name().to_string(),
                long_name: map.long_name().to_string(),
                world: map.world(),
                rotations: indices(map.rotations()),
                rendermode: map.rendermode(),
                texture_size: map.texture_size(),
                tile_size: map.tile_size(),
                zoom_level: self.map_zoomlevel(map.short_name()),
            })
            .collect();

        TemplateConfig {
            output_dir: self.config.output_dir().to_string_lossy().into_owned(),
            template_dir: self.config.template_dir().to_string_lossy().into_owned(),
            worlds,
            maps,
        }
    }

    /// `var CONFIG = {...};` for the viewer's `config.js`.
    pub fn generate_template_javascript(&self) -> Result<String, serde_json::Error> {
        self.template_config().to_javascript()
    }
}

fn indices(rotations: &BTreeSet<Rotation>) -> Vec<usize> {
    rotations.iter().map(|r| r.index()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tilemap_sections::{ConfigSource, ValidationMap};

    const CONFIG: &str = r#"
output_dir = "out"
template_dir = "tpl"

["world:main"]
input_dir = "w"

["world:idle"]
input_dir = "i"

["map:day"]
world = "main"
rotations = "top-left"

["map:night"]
name = "Night"
world = "main"
rotations = "bottom-left, top-left"
rendermode = "nightlight"
"#;

    fn helper() -> ConfigHelper {
        let source = ConfigSource::parse(CONFIG).unwrap();
        let mut config = ConfigFile::new();
        let mut validation = ValidationMap::new();
        assert!(config.parse_source(&source, Path::new("/srv"), &mut validation));
        ConfigHelper::new(config)
    }

    #[test]
    fn test_world_rotations_are_union_of_maps() {
        let helper = helper();
        let expected: BTreeSet<_> = [Rotation::TopLeft, Rotation::BottomLeft].into();
        assert_eq!(helper.used_rotations("main"), &expected);
        assert!(helper.used_rotations("idle").is_empty());
        assert!(helper.used_rotations("nowhere").is_empty());
    }

    #[test]
    fn test_set_used_rotations() {
        let mut helper = helper();
        let rotations: BTreeSet<_> = [Rotation::TopLeft, Rotation::BottomLeft].into();
        helper.set_used_rotations("idle", rotations.clone());
        assert_eq!(helper.used_rotations("idle"), &rotations);
        let indices: Vec<usize> = helper.used_rotations("idle").iter().map(|r| r.index()).collect();
        assert_eq!(indices, vec![0, 3]);
    }

    #[test]
    fn test_zoomlevels_default_to_zero() {
        let mut helper = helper();
        assert_eq!(helper.world_zoomlevel("main"), 0);
        assert_eq!(helper.map_zoomlevel("day"), 0);

        helper.set_world_zoomlevel("main", 9);
        helper.set_map_zoomlevel("day", 8);
        assert_eq!(helper.world_zoomlevel("main"), 9);
        assert_eq!(helper.map_zoomlevel("day"), 8);
        assert_eq!(helper.map_zoomlevel("night"), 0);
    }

    #[test]
    fn test_render_behavior_sequence() {
        let mut helper = helper();
        assert_eq!(helper.render_behavior("day", RotationSelector::All), RenderBehavior::Auto);

        helper.set_render_behavior("day", RotationSelector::All, RenderBehavior::Skip);
        assert!(helper.is_complete_render_skip("day"));
        assert_eq!(helper.render_behavior("day", RotationSelector::All), RenderBehavior::Skip);

        helper.set_render_behavior("day", Rotation::BottomRight, RenderBehavior::Auto);
        assert!(!helper.is_complete_render_skip("day"));
        assert_eq!(helper.render_behavior("day", Rotation::BottomRight), RenderBehavior::Auto);
        assert_eq!(helper.render_behavior("day", Rotation::TopLeft), RenderBehavior::Skip);
        assert_eq!(helper.render_behavior("day", RotationSelector::All), RenderBehavior::Auto);
    }

    #[test]
    fn test_render_behavior_by_index() {
        let mut helper = helper();
        let all = RotationSelector::try_from(-1).unwrap();
        helper.set_render_behavior("night", all, RenderBehavior::Force);
        assert!(helper.is_complete_render_force("night"));
        assert_eq!(helper.render_behavior("night", RotationSelector::try_from(3).unwrap()), RenderBehavior::Force);
        assert_eq!(helper.render_behaviors("night"), [RenderBehavior::Force; 4]);
    }

    #[test]
    fn test_unknown_map_reads_auto() {
        let helper = helper();
        assert_eq!(helper.render_behavior("ghost", RotationSelector::All), RenderBehavior::Auto);
        assert!(!helper.is_complete_render_skip("ghost"));
        assert!(!helper.is_complete_render_force("ghost"));
    }

    #[test]
    fn test_merge_render_behaviors() {
        let mut main = helper();
        let mut worker = helper();
        main.set_render_behavior("day", Rotation::TopLeft, RenderBehavior::Skip);
        worker.set_render_behavior("day", Rotation::TopRight, RenderBehavior::Force);
        worker.set_render_behavior("night", RotationSelector::All, RenderBehavior::Skip);

        main.merge_render_behaviors(&worker);

        assert_eq!(
            main.render_behaviors("day"),
            [
                RenderBehavior::Skip,
                RenderBehavior::Force,
                RenderBehavior::Auto,
                RenderBehavior::Auto
            ]
        );
        assert!(main.is_complete_render_skip("night"));
    }

    #[test]
    fn test_template_javascript() {
        let mut helper = helper();
        helper.set_world_zoomlevel("main", 6);
        helper.set_map_zoomlevel("night", 5);

        let template = helper.template_config();
        assert_eq!(template.output_dir, "/srv/out");
        let names: Vec<&str> = template.maps.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["day", "night"]);

        let night = &template.maps[1];
        assert_eq!(night.long_name, "Night");
        assert_eq!(night.rotations, vec![0, 3]);
        assert_eq!(night.rendermode, "nightlight");
        assert_eq!(night.tile_size, 384);
        assert_eq!(night.zoom_level, 5);

        let main = template.worlds.iter().find(|w| w.name == "main").unwrap();
        assert_eq!(main.zoom_level, 6);
        assert_eq!(main.rotations, vec![0, 3]);

        let js = helper.generate_template_javascript().unwrap();
        assert!(js.starts_with("var CONFIG = "));
        assert!(js.contains("\"longName\": \"Night\""));
    }
}
