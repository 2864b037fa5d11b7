//! # Dice Arena Main Entry Point
//!
//! Loads a level and configuration, then plays a headless AI-vs-AI match and
//! prints the result.

use clap::Parser;
use dice_arena::{
    config, ArenaResult, Difficulty, GameConfig, GameMode, LevelData, MatchOutcome, MatchRunner,
};
#[cfg(not(feature = "dev-tools"))]
use log::info;
use std::path::PathBuf;
#[cfg(feature = "dev-tools")]
use tracing::info;

/// Command line arguments for the dice arena.
#[derive(Parser, Debug)]
#[command(name = "dice-arena")]
#[command(about = "Headless dice battle simulation with BFS-planning AI opponents")]
#[command(version)]
struct Args {
    /// Level file (character grid); the built-in arena is used if omitted
    #[arg(short, long)]
    level: Option<PathBuf>,

    /// JSON match configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Game mode (battle, race, powerwash)
    #[arg(short, long)]
    mode: Option<GameMode>,

    /// AI difficulty (easy, medium, hard, brutal)
    #[arg(short, long)]
    difficulty: Option<Difficulty>,

    /// Random seed for powerups and AI
    #[arg(short, long)]
    seed: Option<u64>,

    /// Give up after this many frames
    #[arg(long, default_value_t = 60 * 60 * 10)]
    max_ticks: u64,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,

    /// Log level (error, warn, info, debug, trace); falls back to RUST_LOG
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> ArenaResult<()> {
    let args = Args::parse();

    initialize_logging(args.log_level.as_deref());

    info!("Starting Dice Arena v{}", dice_arena::VERSION);

    let mut game_config = match &args.config {
        Some(path) => GameConfig::load_from_file(path)?,
        None => GameConfig::default(),
    };
    if let Some(mode) = args.mode {
        game_config.mode = mode;
    }
    if let Some(difficulty) = args.difficulty {
        game_config.difficulty = difficulty;
    }
    if let Some(seed) = args.seed {
        game_config.seed = seed;
    }
    game_config.validate()?;

    let level = match &args.level {
        Some(path) => {
            info!("Loading level from {}", path.display());
            LevelData::load_from_file(path)?
        }
        None => LevelData::default_level()?,
    };

    info!(
        "Playing {:?} on {}x{} with seed {}",
        game_config.mode, level.grid.width, level.grid.height, game_config.seed
    );
    let mut runner = MatchRunner::ai_match(&level, game_config)?;
    let outcome = runner.run_until_finished(args.max_ticks, 1.0 / config::TARGET_FPS as f32);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }
    Ok(())
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: Option<&str>) {
    #[cfg(feature = "dev-tools")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = match log_level {
            Some(level) => EnvFilter::new(level),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        };
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        let mut builder = match log_level {
            Some(level) => {
                let mut builder = env_logger::Builder::new();
                builder.parse_filters(level);
                builder
            }
            None => env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")),
        };
        builder.format_target(false).init();
    }
}

fn print_outcome(outcome: &MatchOutcome) {
    if outcome.finished {
        match (outcome.winner, outcome.winner_kind) {
            (Some(die), Some(kind)) => {
                println!("Winner: die {} ({:?}, player type {})", die, kind, kind.player_type())
            }
            _ => println!("No winner"),
        }
    } else {
        println!("Match did not finish");
    }
    let stats = &outcome.statistics;
    println!("Ticks: {} ({:.1}s)", outcome.ticks, outcome.elapsed);
    println!(
        "Rolls: {}  Explosions: {}  Hits: {}  Stuns: {}  Deaths: {}",
        stats.rolls, stats.explosions, stats.hits, stats.stuns, stats.deaths
    );
    println!(
        "Powerups spawned: {}  collected: {}",
        stats.powerups_spawned, stats.powerups_collected
    );
}
