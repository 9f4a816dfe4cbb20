//! Configuration file integration tests
//!
//! Parses fixture files from disk and files written to temporary
//! directories, checking path resolution, inheritance, validation
//! reporting and the dump round trip.

mod fixtures;

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use fixtures::{config_path, configs_dir, parse_fixture, Expectations, SectionCounts};
use tempfile::TempDir;
use tilemap_config::config::{FILE_SECTION, GLOBAL_MAP_SECTION};
use tilemap_config::{ConfigError, ConfigFile, Rotation, ValidationMap};
use tilemap_sections::SourceError;

fn fixture_dir() -> PathBuf {
    fs::canonicalize(configs_dir()).unwrap()
}

#[test]
fn test_valid_fixture() {
    let (config, validation, ok) = parse_fixture("valid.toml");
    assert!(ok, "{}", validation.to_human());
    assert!(!validation.has_errors());

    let dir = fixture_dir();
    assert_eq!(config.config_dir(), dir.as_path());
    assert_eq!(config.output_dir(), dir.join("output"));
    assert_eq!(config.template_dir(), dir.join("template"));
    assert_eq!(config.template_path("index.html"), dir.join("template/index.html"));

    assert_eq!(
        config.world("overworld").unwrap().input_dir(),
        dir.join("worlds/overworld")
    );
    // Inherited from the global world template.
    assert_eq!(
        config.world("nether").unwrap().input_dir(),
        dir.join("worlds/default")
    );

    let names: Vec<&str> = config.maps().iter().map(|m| m.short_name()).collect();
    assert_eq!(names, vec!["overworld_day", "overworld_night", "nether"]);
}

#[test]
fn test_valid_fixture_map_options() {
    let (config, _, _) = parse_fixture("valid.toml");
    let dir = fixture_dir();

    let day = config.map("overworld_day").unwrap();
    assert_eq!(day.long_name(), "Overworld (day)");
    assert_eq!(day.world(), "overworld");
    assert_eq!(day.texture_dir(), dir.join("textures"));
    assert_eq!(day.rendermode(), "daylight");
    assert_eq!(day.texture_size(), 16);
    assert_eq!(day.tile_size(), 512);
    assert!(day.render_biomes());
    assert!(!day.render_unknown_blocks());
    let expected: BTreeSet<_> = [Rotation::TopLeft, Rotation::BottomRight].into();
    assert_eq!(day.rotations(), &expected);

    let night = config.map("overworld_night").unwrap();
    assert!(!night.use_image_timestamps());
    assert_eq!(night.rotations().len(), 2);

    let nether = config.map("nether").unwrap();
    assert_eq!(nether.long_name(), "nether");
    assert_eq!(nether.texture_size(), 12);
    assert!(!nether.render_biomes());
    assert_eq!(nether.rendermode(), "cave");
    assert_eq!(nether.rotations(), &BTreeSet::from([Rotation::TopLeft]));
}

#[test]
fn test_digest_is_stable() {
    let (first, _, _) = parse_fixture("valid.toml");
    let (second, _, _) = parse_fixture("valid.toml");
    let digest = first.digest().unwrap();
    assert_eq!(digest.len(), 64);
    assert_eq!(first.digest(), second.digest());

    let (other, _, _) = parse_fixture("broken.toml");
    assert_ne!(other.digest(), first.digest());
}

#[test]
fn test_broken_fixture_matches_expectations() {
    let expected = Expectations::load("broken.expected.json").expect("Failed to load expectations");
    let (config, validation, ok) = parse_fixture("broken.toml");

    assert_eq!(ok, expected.ok);

    let worlds: Vec<&String> = config.worlds().keys().collect();
    let expected_worlds: Vec<&String> = expected.worlds.iter().collect();
    assert_eq!(worlds, expected_worlds);

    let maps: Vec<&str> = config.maps().iter().map(|m| m.short_name()).collect();
    assert_eq!(maps, expected.maps);

    for entry in validation.non_empty() {
        let counts = SectionCounts {
            errors: entry.messages.error_count(),
            warnings: entry.messages.warning_count(),
        };
        match expected.sections.get(&entry.section) {
            Some(want) => assert_eq!(&counts, want, "section {}", entry.section),
            None => panic!(
                "unexpected findings for {}:\n{}",
                entry.section,
                validation.to_human()
            ),
        }
    }
    for section in expected.sections.keys() {
        assert!(validation.get(section).is_some(), "no findings for {}", section);
    }
}

#[test]
fn test_broken_fixture_messages() {
    let (_, validation, _) = parse_fixture("broken.toml");

    let global = validation.get(GLOBAL_MAP_SECTION).unwrap();
    assert!(global
        .iter()
        .any(|m| m.is_error() && m.message.contains("sideways")));

    let orphan = validation.get("Map section 'orphan'").unwrap();
    assert!(orphan.messages()[0].message.contains("'lost'"));

    let human = validation.to_human();
    assert!(human.contains("Map section 'flawed':"));
    assert!(!human.contains("World section 'main'"));
}

#[test]
fn test_missing_output_dir_is_fatal() {
    let (config, validation, ok) = parse_fixture("no_output.toml");
    assert!(!ok);
    let file = validation.get(FILE_SECTION).unwrap();
    assert_eq!(file.error_count(), 1);
    assert!(file.messages()[0].message.contains("output_dir"));
    assert!(config.worlds().is_empty());
    assert_eq!(validation.non_empty().count(), 1);
}

#[test]
fn test_missing_file_is_error() {
    let mut config = ConfigFile::new();
    let mut validation = ValidationMap::new();
    let result = config.parse(&config_path("does_not_exist.toml"), &mut validation);
    assert!(matches!(result, Err(ConfigError::Source(SourceError::Io(_)))));
    assert!(validation.is_empty());
}

#[test]
fn test_syntax_error_is_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("render.toml");
    fs::write(&path, "output_dir = \"out\"\n[\"world:main\"\ninput_dir = 1\n").unwrap();

    let mut config = ConfigFile::new();
    let mut validation = ValidationMap::new();
    let result = config.parse(&path, &mut validation);
    assert!(matches!(result, Err(ConfigError::Source(SourceError::Parse(_)))));
}

#[test]
fn test_paths_relative_to_config_file() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("conf");
    fs::create_dir(&nested).unwrap();
    let path = nested.join("render.toml");
    fs::write(
        &path,
        r#"
output_dir = "../public"
template_dir = "/opt/tilemap/template"

["world:main"]
input_dir = "main"

["map:main"]
world = "main"
"#,
    )
    .unwrap();

    let mut config = ConfigFile::new();
    let mut validation = ValidationMap::new();
    let ok = config.parse(&path, &mut validation).unwrap();
    assert!(ok, "{}", validation.to_human());

    let base = fs::canonicalize(&nested).unwrap();
    assert_eq!(config.output_dir(), base.join("../public"));
    assert_eq!(config.template_dir(), PathBuf::from("/opt/tilemap/template"));
    assert_eq!(config.world("main").unwrap().input_dir(), base.join("main"));
}

#[test]
fn test_dump_round_trip_through_file() {
    let (config, _, ok) = parse_fixture("valid.toml");
    assert!(ok);

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("resolved.toml");
    let mut file = fs::File::create(&path).unwrap();
    config.dump(&mut file).unwrap();
    drop(file);

    let mut reparsed = ConfigFile::new();
    let mut validation = ValidationMap::new();
    let ok = reparsed.parse(&path, &mut validation).unwrap();
    assert!(ok, "{}", validation.to_human());

    assert_eq!(reparsed.output_dir(), config.output_dir());
    assert_eq!(reparsed.template_dir(), config.template_dir());
    for (name, world) in config.worlds() {
        assert_eq!(reparsed.world(name).unwrap().input_dir(), world.input_dir());
    }
    for map in config.maps() {
        let other = reparsed.map(map.short_name()).unwrap();
        assert_eq!(other.long_name(), map.long_name());
        assert_eq!(other.world(), map.world());
        assert_eq!(other.texture_dir(), map.texture_dir());
        assert_eq!(other.rotations(), map.rotations());
        assert_eq!(other.rendermode(), map.rendermode());
        assert_eq!(other.texture_size(), map.texture_size());
        assert_eq!(other.render_biomes(), map.render_biomes());
        assert_eq!(other.use_image_timestamps(), map.use_image_timestamps());
    }
}

#[test]
fn test_reparse_resets_state() {
    let (mut config, _, _) = parse_fixture("valid.toml");
    let mut validation = ValidationMap::new();
    let ok = config.parse(&config_path("broken.toml"), &mut validation).unwrap();
    assert!(!ok);
    assert!(!config.has_world("overworld"));
    assert!(!config.has_map("nether"));
}
