use clap::Parser;

use hexworld::coords::AxialCoord;
use hexworld::exploration::ExplorationTracker;
use hexworld::fog::{FogOfWar, Visibility};
use hexworld::generator::{generate, GenerationConfig, WorldBound};
use hexworld::map::WorldMap;
use hexworld::seeds::{parse_seed, WorldSeeds};

#[derive(Parser, Debug)]
#[command(name = "hexworld")]
#[command(about = "Generate and explore procedural hex worlds")]
struct Args {
    /// World width in hexes
    #[arg(short = 'W', long, default_value = "48")]
    width: u32,

    /// World height in hexes
    #[arg(short = 'H', long, default_value = "48")]
    height: u32,

    /// Seed string: numeric strings are used directly, anything else is
    /// hashed (random seed if not specified)
    #[arg(short, long)]
    seed: Option<String>,

    /// Generate an offset-rectangular extent instead of a hex disc
    #[arg(long)]
    rectangular: bool,

    /// Reveal a disc of this radius around the origin and report discoveries
    #[arg(short, long)]
    reveal: Option<i32>,

    /// Render the whole map instead of only revealed tiles
    #[arg(long)]
    no_fog: bool,

    /// Save the generated world to a JSON file
    #[arg(long)]
    save: Option<String>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let master = match &args.seed {
        Some(text) => parse_seed(text),
        None => rand::random(),
    };
    let seeds = WorldSeeds::from_master(master);

    let bound = if args.rectangular {
        WorldBound::Rectangular
    } else {
        WorldBound::Circular
    };
    let config = GenerationConfig {
        width: args.width,
        height: args.height,
        bound,
    };

    println!("Generating world with seed: {}", master);
    println!("Extent: {}x{} ({:?})", args.width, args.height, bound);

    let mut map = match generate(&config, &seeds) {
        Ok(map) => map,
        Err(e) => {
            eprintln!("Generation failed: {}", e);
            std::process::exit(1);
        }
    };

    print_world_stats(&map);

    let mut fog = FogOfWar::new();
    let mut tracker = ExplorationTracker::new();

    if let Some(radius) = args.reveal {
        println!("Revealing radius {} around the origin...", radius);
        let events = fog.reveal_area(AxialCoord::ORIGIN, radius);
        tracker.absorb_reveals(&mut map, &events, 0);

        let stats = tracker.discovery_statistics();
        println!(
            "Discovered {} locations, {} resources, {} features",
            stats.get("location").copied().unwrap_or(0),
            stats.get("resource").copied().unwrap_or(0),
            stats.get("feature").copied().unwrap_or(0),
        );
        println!(
            "Explored: {:.1}%",
            100.0 * tracker.exploration_percentage(&fog, &map)
        );
    }

    print_ascii_map(&map, &fog, args.no_fog);

    if let Some(path) = &args.save {
        match map.save_to_file(path) {
            Ok(()) => println!("Saved world to {}", path),
            Err(e) => {
                eprintln!("Save failed: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn print_world_stats(map: &WorldMap) {
    println!("Generated {} tiles", map.len());

    let mut biome_counts: Vec<(String, usize)> = Vec::new();
    for biome in hexworld::biome::Biome::all() {
        let count = map.tiles().filter(|t| t.biome == *biome).count();
        if count > 0 {
            biome_counts.push((biome.display_name().to_string(), count));
        }
    }
    biome_counts.sort_by(|a, b| b.1.cmp(&a.1));
    for (name, count) in &biome_counts {
        println!(
            "  {}: {} ({:.1}%)",
            name,
            count,
            100.0 * *count as f64 / map.len() as f64
        );
    }

    let deposits: usize = map.tiles().map(|t| t.resources.len()).sum();
    let river_tiles = map
        .tiles()
        .filter(|t| t.has_feature(hexworld::biome::FeatureKind::River))
        .count();
    println!("Resource deposits: {}", deposits);
    println!("River tiles: {}", river_tiles);
}

fn print_ascii_map(map: &WorldMap, fog: &FogOfWar, no_fog: bool) {
    let mut q_lo = i32::MAX;
    let mut q_hi = i32::MIN;
    let mut r_lo = i32::MAX;
    let mut r_hi = i32::MIN;
    for tile in map.tiles() {
        q_lo = q_lo.min(tile.coord.q);
        q_hi = q_hi.max(tile.coord.q);
        r_lo = r_lo.min(tile.coord.r);
        r_hi = r_hi.max(tile.coord.r);
    }
    if q_lo > q_hi {
        return;
    }

    println!();
    for r in r_lo..=r_hi {
        // Half-hex indent keeps odd rows visually staggered.
        let mut line = String::new();
        if r.rem_euclid(2) != 0 {
            line.push(' ');
        }
        for q in q_lo..=q_hi {
            let coord = AxialCoord::new(q, r);
            let glyph = match map.get_tile(coord) {
                Some(tile) => {
                    if no_fog {
                        tile.biome.glyph()
                    } else {
                        match fog.visibility(coord) {
                            Visibility::Unexplored => ' ',
                            Visibility::Partial => ':',
                            Visibility::Full => tile.biome.glyph(),
                        }
                    }
                }
                None => ' ',
            };
            line.push(glyph);
            line.push(' ');
        }
        if !line.trim().is_empty() {
            println!("{}", line);
        }
    }
    println!();
}
