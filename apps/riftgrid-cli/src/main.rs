use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::Vec2;
use riftgrid_common::{Cell, WorldContext};
use riftgrid_kernel::{World, WorldConfig};
use riftgrid_nav::{slide, steer};
use riftgrid_tools::WorldInspector;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "riftgrid-cli", about = "Drive a headless riftgrid world")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON world config; defaults apply to anything it omits
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the effective config
    Info,
    /// Walk a player through the world and report streaming and flow stats
    Simulate {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "300")]
        ticks: u64,
        /// World seed for wilderness generation
        #[arg(short, long, default_value = "0")]
        seed: u64,
        /// Biome id
        #[arg(short, long, default_value = "rift_wastes")]
        biome: String,
        /// Generate dungeon chunks instead of wilderness
        #[arg(short, long)]
        dungeon: bool,
        /// Number of agents chasing the player
        #[arg(short, long, default_value = "8")]
        agents: usize,
    },
    /// Print occupancy and flow maps around a target position
    Flow {
        #[arg(long, default_value = "0.5", allow_negative_numbers = true)]
        x: f32,
        #[arg(long, default_value = "0.5", allow_negative_numbers = true)]
        z: f32,
        /// Half extent of the printed map, in cells
        #[arg(short, long, default_value = "12")]
        radius: i32,
        #[arg(short, long)]
        dungeon: bool,
    },
}

const TICK: f32 = 1.0 / 30.0;
const PLAYER_SPEED: f32 = 6.0;
const AGENT_SPEED: f32 = 4.5;
const AGENT_RADIUS: f32 = 0.3;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let config = match &cli.config {
        Some(path) => WorldConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => WorldConfig::default(),
    };

    match cli.command {
        Commands::Info => {
            println!("riftgrid-cli v{}", env!("CARGO_PKG_VERSION"));
            let registry = config.biome_registry();
            let biomes: Vec<&str> = registry.ids().map(|id| id.as_str()).collect();
            println!("biomes: {}", biomes.join(", "));
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Simulate {
            ticks,
            seed,
            biome,
            dungeon,
            agents,
        } => simulate(config, ticks, seed, biome, dungeon, agents)?,
        Commands::Flow {
            x,
            z,
            radius,
            dungeon,
        } => {
            let ctx = if dungeon {
                WorldContext::dungeon("void_cathedral")
            } else {
                WorldContext::default()
            };
            let mut world = World::new(config, ctx)?;
            world.update(x, z);
            let reached = world.update_flow_field(x, z).reached();
            let center = Cell::containing(x, z);
            println!("flow target ({x}, {z}), {reached} cells reached\n");
            println!("{}", WorldInspector::render_occupancy(&world, center, radius));
            println!("{}", WorldInspector::render_flow(&world, center, radius));
        }
    }

    Ok(())
}

fn simulate(
    config: WorldConfig,
    ticks: u64,
    seed: u64,
    biome: String,
    dungeon: bool,
    agents: usize,
) -> anyhow::Result<()> {
    let ctx = if dungeon {
        WorldContext::dungeon(biome)
    } else {
        WorldContext::wilderness(biome)
    }
    .with_seed(seed);
    let mut world = World::new(config, ctx)?;

    // Agents start on a ring around the spawn.
    let mut chasers: Vec<Vec2> = (0..agents)
        .map(|i| {
            let angle = i as f32 / agents.max(1) as f32 * std::f32::consts::TAU;
            Vec2::new(angle.cos(), angle.sin()) * 8.0
        })
        .collect();

    let mut player = Vec2::ZERO;
    let mut rebuilds = 0usize;
    let mut created = 0usize;
    for t in 0..ticks {
        // Wander east along a gentle curve.
        let heading = Vec2::new(1.0, (t as f32 * 0.01).sin() * 0.5).normalize();
        player = slide(&world, player, heading * PLAYER_SPEED * TICK, AGENT_RADIUS);

        let report = world.step(TICK, player.x, player.y);
        created += report.delta.created.len();
        if report.rebuild.is_some() {
            rebuilds += 1;
        }

        for agent in &mut chasers {
            let dir = steer(world.flow_vector(agent.x, agent.y), *agent, player);
            *agent = slide(&world, *agent, dir * AGENT_SPEED * TICK, AGENT_RADIUS);
        }

        if t % 100 == 0 {
            println!("{}", WorldInspector::summary(&world));
        }
        world.drain_events();
    }

    println!("{}", WorldInspector::summary(&world));
    println!(
        "player=({:.1}, {:.1}) chunks_created={created} flow_rebuilds={rebuilds}",
        player.x, player.y
    );
    for (i, agent) in chasers.iter().enumerate() {
        println!(
            "  agent {i}: ({:.1}, {:.1}) distance={:.1}",
            agent.x,
            agent.y,
            agent.distance(player)
        );
    }
    Ok(())
}
