//! History Simulation binary
//!
//! Generates a grid planet, runs its history and reports the largest states.

use std::path::PathBuf;
use std::time::Instant;

use civ_history::core::error::Result;
use civ_history::core::{Random, RandomSource, WorldConfig};
use civ_history::history::{Civilization, HistorySummary, World};
use civ_history::planet::{Planet, PlanetConfig};
use clap::Parser;

/// Simulate the rise and fall of civilizations on a generated planet
#[derive(Parser, Debug)]
#[command(name = "history_sim")]
#[command(about = "Run the civilization history simulation and summarize the result")]
struct Args {
    /// Random seed for deterministic runs
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Year at which the simulation stops
    #[arg(long, default_value_t = 1500.0, allow_negative_numbers = true)]
    end_year: f64,

    /// Planet width in tiles
    #[arg(long, default_value_t = 48)]
    width: u32,

    /// Planet height in tiles
    #[arg(long, default_value_t = 32)]
    height: u32,

    /// TOML file overriding the simulation constants
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the full history as JSON to this file
    #[arg(long)]
    output: Option<PathBuf>,

    /// How many of the largest civs to list
    #[arg(long, default_value_t = 10)]
    top: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("civ_history=info")),
        )
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => WorldConfig::load(path)?,
        None => WorldConfig::default(),
    };

    let planet_config = PlanetConfig {
        width: args.width,
        height: args.height,
        ..PlanetConfig::default()
    };
    let mut terrain_rng = Random::new(args.seed);
    let planet = Planet::grid(&planet_config, &mut terrain_rng)?;
    tracing::info!(tiles = planet.len(), seed = args.seed, "planet generated");

    let mut rng = terrain_rng.reset();
    let mut world: World = World::new(planet, config)?;

    let start = Instant::now();
    let reports = world.generate_history(args.end_year, &mut rng)?;
    let output = HistorySummary::new(&world, &reports, start.elapsed());
    world.verify_political_map()?;

    println!("{}", output.summary());
    println!();
    println!("--- Largest civilizations ---");
    let top = args.top.min(world.civ_count());
    for civ in world.civs(true, 0, top)?.into_iter().take(top) {
        println!(
            "{}: {} tiles, {:.0} km², technology {:.1}, population {:.0}",
            civ.id(),
            civ.tiles().size(),
            civ.area(world.planet()),
            civ.technology(),
            civ.population(world.config()),
        );
    }

    if let Some(path) = &args.output {
        std::fs::write(path, output.to_json()?)?;
        println!("\nFull output written to {}", path.display());
    }

    Ok(())
}
