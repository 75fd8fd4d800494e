use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use flock_client::SimRunner;
use flock_core::{EdgeBehavior, FlockConfig, Vector2D};
use flock_shared::{FlockSettings, PopulationUpdate};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EdgeMode {
    /// Boids leaving the world re-enter on the opposite side
    Wrap,
    /// Boids are clamped to the world rectangle
    Collide,
}

impl From<EdgeMode> for EdgeBehavior {
    fn from(mode: EdgeMode) -> Self {
        match mode {
            EdgeMode::Wrap => EdgeBehavior::Wrap,
            EdgeMode::Collide => EdgeBehavior::Collide,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless flock simulation driver", long_about = None)]
struct Args {
    /// World width
    #[arg(long, default_value_t = 100.0)]
    width: f32,

    /// World height
    #[arg(long, default_value_t = 100.0)]
    height: f32,

    /// Number of boids to keep alive
    #[arg(short, long, default_value_t = 10)]
    count: usize,

    /// Number of fixed ticks to run
    #[arg(short, long, default_value_t = 600)]
    ticks: u64,

    /// Fixed timestep in seconds
    #[arg(long, default_value_t = 0.02)]
    dt: f32,

    /// Edge behavior
    #[arg(short, long, value_enum, default_value_t = EdgeMode::Wrap)]
    edge: EdgeMode,

    /// Neighbor sight range
    #[arg(long, default_value_t = 10.0)]
    sight_range: f32,

    /// Maximum boid speed
    #[arg(long, default_value_t = 20.0)]
    max_speed: f32,

    /// Enable the alignment rule
    #[arg(long)]
    alignment: bool,

    /// Enable the cohesion rule
    #[arg(long)]
    cohesion: bool,

    /// Enable the separation rule
    #[arg(long)]
    separation: bool,

    /// Alignment strength
    #[arg(long, default_value_t = 1.0)]
    strength_alignment: f32,

    /// Cohesion strength
    #[arg(long, default_value_t = 1.0)]
    strength_cohesion: f32,

    /// Separation strength
    #[arg(long, default_value_t = 1.0)]
    strength_separation: f32,

    /// Emit one JSON frame snapshot per sampled tick on stdout
    #[arg(long)]
    json: bool,

    /// Emit a snapshot every this many ticks
    #[arg(long, default_value_t = 1)]
    sample_rate: u64,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    log::info!("Flock driver starting...");
    log::info!(
        "World: {}x{}, {} boids, edge {:?}",
        args.width,
        args.height,
        args.count,
        args.edge
    );

    let config = FlockConfig {
        world_size: Vector2D::new(args.width, args.height),
        edge: args.edge.into(),
        ..FlockConfig::default()
    };

    let mut runner = SimRunner::new(config).context("Failed to configure simulation")?;

    runner.apply_settings(&FlockSettings {
        enable_alignment: args.alignment,
        enable_cohesion: args.cohesion,
        enable_separation: args.separation,
        strength_alignment: args.strength_alignment,
        strength_cohesion: args.strength_cohesion,
        strength_separation: args.strength_separation,
        max_speed: args.max_speed,
        sight_range: args.sight_range,
    });
    runner.apply_population(PopulationUpdate {
        target_count: args.count,
    });

    let sample_rate = args.sample_rate.max(1);

    for _ in 0..args.ticks {
        runner.step(args.dt);

        if runner.tick_count() % sample_rate == 0 {
            if args.json {
                let frame = runner.snapshot();
                let line =
                    serde_json::to_string(&frame).context("Failed to encode frame snapshot")?;
                println!("{}", line);
            }
            let status = runner.status();
            log::debug!("tick {}: {} boids", status.tick, status.boid_count);
        }
    }

    let status = runner.status();
    log::info!(
        "Finished after {} ticks with {} boids",
        status.tick,
        status.boid_count
    );

    Ok(())
}
