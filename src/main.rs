//! Tile-map configuration CLI
//!
//! Entry point for the `tilemap-config` command-line tool.

use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use tilemap_config::logging::{init_logging, LogConfig};
use tilemap_config::{ConfigFile, ConfigHelper, RenderBehavior, RotationSelector, ValidationMap};

#[derive(Parser)]
#[command(name = "tilemap-config")]
#[command(about = "Validate and inspect tile-map renderer configuration", version)]
struct Cli {
    /// Log debug events to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a configuration file and report every problem
    Check {
        /// Path to the configuration file
        config: PathBuf,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Print the resolved configuration
    Dump {
        /// Path to the configuration file
        config: PathBuf,
    },

    /// Print the viewer's `config.js` for a configuration
    Template {
        /// Path to the configuration file
        config: PathBuf,

        /// Zoom level of a map, as MAP=LEVEL (repeatable)
        #[arg(long = "zoom", value_name = "MAP=LEVEL", value_parser = parse_zoom)]
        zoom: Vec<(String, u32)>,

        /// Skip all rotations of a map (repeatable)
        #[arg(long, value_name = "MAP")]
        skip: Vec<String>,

        /// Force a full render of a map (repeatable)
        #[arg(long, value_name = "MAP")]
        force: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env();
    if cli.verbose {
        log_config = log_config.verbose();
    }
    if let Err(e) = init_logging(&log_config) {
        eprintln!("Error initializing logging: {}", e);
    }

    match cli.command {
        Commands::Check { config, json } => {
            run_check(&config, json);
        }
        Commands::Dump { config } => {
            run_dump(&config);
        }
        Commands::Template {
            config,
            zoom,
            skip,
            force,
        } => {
            run_template(&config, zoom, skip, force);
        }
    }
}

fn parse_zoom(s: &str) -> Result<(String, u32), String> {
    let (map, level) = s
        .split_once('=')
        .ok_or_else(|| format!("expected MAP=LEVEL, got '{}'", s))?;
    let level = level
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid zoom level '{}': {}", level, e))?;
    Ok((map.trim().to_string(), level))
}

/// Parse the file, exiting on I/O or syntax errors.
fn load_config(path: &Path) -> (ConfigFile, ValidationMap, bool) {
    let mut config = ConfigFile::new();
    let mut validation = ValidationMap::new();
    match config.parse(path, &mut validation) {
        Ok(ok) => (config, validation, ok),
        Err(e) => {
            eprintln!("Error loading config {}: {}", path.display(), e);
            process::exit(1);
        }
    }
}

fn run_check(path: &Path, json_output: bool) {
    let (config, validation, ok) = load_config(path);

    if json_output {
        let output = serde_json::json!({
            "config": path.display().to_string(),
            "ok": ok,
            "digest": config.digest(),
            "worlds": config.worlds().len(),
            "maps": config.maps().len(),
            "validation": validation,
        });
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        print!("{}", validation.to_human());
        if ok {
            println!("Configuration valid: {}", path.display());
            println!();
            println!("  Output: {}", config.output_dir().display());
            println!("  Template: {}", config.template_dir().display());
            for (name, world) in config.worlds() {
                println!("  World {}: {}", name, world.input_dir().display());
            }
            for map in config.maps() {
                println!(
                    "  Map {} ({}): world {}, {}, texture size {}",
                    map.short_name(),
                    map.long_name(),
                    map.world(),
                    map.rendermode(),
                    map.texture_size()
                );
            }
        } else {
            println!(
                "Configuration invalid: {} ({} errors)",
                path.display(),
                validation.error_count()
            );
        }
    }

    if !ok {
        process::exit(1);
    }
}

fn run_dump(path: &Path) {
    let (config, validation, ok) = load_config(path);

    if !validation.is_empty() {
        eprint!("{}", validation.to_human());
    }

    let mut stdout = io::stdout().lock();
    if let Err(e) = config.dump(&mut stdout) {
        eprintln!("Error writing configuration: {}", e);
        process::exit(1);
    }

    if !ok {
        process::exit(1);
    }
}

fn run_template(path: &Path, zoom: Vec<(String, u32)>, skip: Vec<String>, force: Vec<String>) {
    let (config, validation, ok) = load_config(path);
    if !ok {
        eprint!("{}", validation.to_human());
        eprintln!("Configuration invalid: {}", path.display());
        process::exit(1);
    }

    let mut helper = ConfigHelper::new(config);

    for (map, level) in zoom {
        let world = match helper.config().map(&map) {
            Some(section) => section.world(),
            None => {
                eprintln!("Unknown map: {}", map);
                process::exit(1);
            }
        };
        helper.set_map_zoomlevel(&map, level);
        if level > helper.world_zoomlevel(&world) {
            helper.set_world_zoomlevel(&world, level);
        }
    }

    for (maps, behavior) in [(skip, RenderBehavior::Skip), (force, RenderBehavior::Force)] {
        for map in maps {
            if !helper.config().has_map(&map) {
                eprintln!("Unknown map: {}", map);
                process::exit(1);
            }
            helper.set_render_behavior(&map, RotationSelector::All, behavior);
        }
    }

    match helper.generate_template_javascript() {
        Ok(js) => print!("{}", js),
        Err(e) => {
            eprintln!("Error serializing template: {}", e);
            process::exit(1);
        }
    }

    for map in helper.config().maps() {
        let name = map.short_name();
        let behaviors: Vec<String> = map
            .rotations()
            .iter()
            .map(|r| format!("{}={}", r, helper.render_behavior(name, *r)))
            .collect();
        eprintln!("  {}: {}", name, behaviors.join(" "));
    }
}
