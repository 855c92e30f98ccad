//! OTB CLI - Command-line tool for inspecting OpenTibia data files.
//!
//! This is the main entry point for the `otb` command-line application.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use otb::prelude::*;

/// OTB - item catalog and map inspection tool
#[derive(Parser)]
#[command(name = "otb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show an item catalog summary or a single item type
    Items {
        /// Path to items.otb
        #[arg(short, long, env = "OTB_ITEMS")]
        items: PathBuf,

        /// Server id of an item to show
        #[arg(long)]
        id: Option<u16>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Decode a map and show a summary
    Map {
        /// Path to items.otb
        #[arg(short, long, env = "OTB_ITEMS")]
        items: PathBuf,

        /// Path to the .otbm file
        #[arg(short, long, env = "OTB_MAP")]
        map: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Dump the raw node tree of any OTB container
    Tree {
        /// Input file
        #[arg(short, long)]
        input: PathBuf,

        /// Expected 4-character identifier (any if omitted)
        #[arg(long, value_parser = parse_identifier)]
        identifier: Option<Identifier>,

        /// Maximum depth to print
        #[arg(short, long)]
        depth: Option<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Items { items, id, json } => {
            cmd_items(&items, id, json)?;
        }
        Commands::Map { items, map, json } => {
            cmd_map(&items, &map, json)?;
        }
        Commands::Tree { input, identifier, depth } => {
            cmd_tree(&input, identifier, depth)?;
        }
    }

    Ok(())
}

fn parse_identifier(value: &str) -> std::result::Result<Identifier, String> {
    let bytes: [u8; 4] = value
        .as_bytes()
        .try_into()
        .map_err(|_| format!("identifier must be 4 bytes, got {}", value.len()))?;
    Ok(Identifier::new(bytes))
}

fn spinner(message: String) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

fn load_catalog(path: &Path) -> Result<ItemCatalog> {
    let pb = spinner(format!("Loading catalog: {}", path.display()))?;

    let start = Instant::now();
    let catalog = ItemCatalog::load(path, &mut LogDiagnostics::new())
        .with_context(|| format!("Failed to load item catalog {}", path.display()))?;

    pb.finish_and_clear();
    log::info!("Loaded {} item types in {:?}", catalog.len(), start.elapsed());

    Ok(catalog)
}

#[derive(Serialize)]
struct CatalogSummary {
    version: Option<CatalogVersion>,
    item_count: usize,
}

fn cmd_items(path: &Path, id: Option<u16>, json: bool) -> Result<()> {
    let catalog = load_catalog(path)?;

    if let Some(id) = id {
        let item = catalog
            .get(id)
            .with_context(|| format!("Item {} not found in catalog", id))?;

        if json {
            println!("{}", serde_json::to_string_pretty(item)?);
        } else {
            print_item_type(item);
        }
        return Ok(());
    }

    let summary = CatalogSummary {
        version: catalog.version(),
        item_count: catalog.len(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        match summary.version {
            Some(version) if version.is_generic() => println!("Version: generic (build {})", version.minor),
            Some(version) => println!("Version: {}.{}", version.major, version.minor),
            None => println!("Version: none"),
        }
        println!("Item types: {}", summary.item_count);
    }

    Ok(())
}

fn print_item_type(item: &ItemType) {
    println!("Server id:   {}", item.server_id);
    println!("Client id:   {}", item.client_id);
    println!("Name:        {}", item.name);
    if !item.description.is_empty() {
        println!("Description: {}", item.description);
    }
    println!("Group:       {:?}", item.group);
    println!("Kind:        {:?}", item.kind);
    println!("Weight:      {}", item.weight);
    println!("Flags:       {:?}", item.flags);
    if item.speed != 0 {
        println!("Speed:       {}", item.speed);
    }
    if item.light_level != 0 {
        println!("Light:       level {} color {}", item.light_level, item.light_color);
    }
}

#[derive(Serialize)]
struct MapSummary<'a> {
    header: &'a MapHeader,
    attributes: &'a MapAttributes,
    tile_count: usize,
    item_count: usize,
    house_count: usize,
    towns: Vec<&'a Town>,
    waypoint_count: usize,
}

fn cmd_map(items_path: &Path, map_path: &Path, json: bool) -> Result<()> {
    let catalog = load_catalog(items_path)?;

    let pb = spinner(format!("Loading map: {}", map_path.display()))?;
    let start = Instant::now();
    let map = Map::load(map_path, &catalog, &mut LogDiagnostics::new())
        .with_context(|| format!("Failed to load map {}", map_path.display()))?;
    pb.finish_and_clear();
    log::info!("Decoded map in {:?}", start.elapsed());

    let mut towns: Vec<_> = map.towns().collect();
    towns.sort_by_key(|town| town.id);

    let summary = MapSummary {
        header: map.header(),
        attributes: map.attributes(),
        tile_count: map.tile_count(),
        item_count: map.tiles().map(Tile::item_count).sum(),
        house_count: map.house_count(),
        towns,
        waypoint_count: map.waypoint_count(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let header = summary.header;
    println!("OTBM version {}, {}x{}", header.version, header.width, header.height);
    println!("Items schema: {}.{}", header.items_major, header.items_minor);
    for description in &summary.attributes.descriptions {
        println!("Description: {}", description);
    }
    if let Some(spawn_file) = &summary.attributes.spawn_file {
        println!("Spawn file:  {}", spawn_file);
    }
    if let Some(house_file) = &summary.attributes.house_file {
        println!("House file:  {}", house_file);
    }
    println!("Tiles:     {}", summary.tile_count);
    println!("Items:     {}", summary.item_count);
    println!("Houses:    {}", summary.house_count);
    println!("Waypoints: {}", summary.waypoint_count);
    println!("Towns:     {}", summary.towns.len());
    for town in &summary.towns {
        println!("  {:>4} {} temple {}", town.id, town.name, town.temple);
    }

    Ok(())
}

fn cmd_tree(input: &Path, identifier: Option<Identifier>, depth: Option<usize>) -> Result<()> {
    let start = Instant::now();
    let container = match identifier {
        Some(identifier) => Container::open(input, identifier),
        None => Container::open_any(input),
    }
    .context("Failed to open container")?;

    let tree = container.tree();
    println!(
        "{}: identifier {}, {} nodes, depth {} (parsed in {:?})",
        input.display(),
        container.identifier(),
        tree.len(),
        tree.depth(),
        start.elapsed()
    );

    print_node(container.root(), 0, depth.unwrap_or(usize::MAX));

    Ok(())
}

fn print_node(node: Node<'_>, level: usize, max_depth: usize) {
    println!(
        "{:indent$}type {:>3}  props {:>6}  children {}",
        "",
        node.kind(),
        node.props().len(),
        node.child_count(),
        indent = level * 2
    );

    if level < max_depth {
        for child in node.children() {
            print_node(child, level + 1, max_depth);
        }
    }
}
