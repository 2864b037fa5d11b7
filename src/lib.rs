//! # Dice Arena
//!
//! A grid-based dice battle simulation with a breadth-first-search AI opponent.
//!
//! ## Architecture Overview
//!
//! The crate is the discrete simulation core of the game. Rendering, audio and
//! menus live in a host engine that talks to this crate through a narrow surface:
//!
//! - **Game Engine**: single owner of the tile grid and every die, exposes the
//!   command surface (roll, activate, scripted attack) and evaluates win conditions
//! - **Die Model**: position, face orientation, charged faces and health of one die
//! - **Events**: outbound notifications consumed by presentation collaborators
//! - **AI**: per-die decision engine combining random wandering, a timed scripted
//!   attack loop, and BFS planning over (position × orientation)
//! - **Runner**: a headless tick loop that plays a full match without a renderer
//!
//! Commands never fail loudly. Invalid input is expected steady-state traffic in a
//! frame-driven game, so every command validates and returns `false` when rejected.

pub mod ai;
pub mod game;
pub mod generation;
pub mod input;
pub mod runner;
pub mod utils;

pub use ai::*;
pub use game::*;
pub use generation::*;
pub use input::*;
pub use runner::*;
pub use utils::*;

/// Core error type for setup-time failures.
///
/// Per-tick commands never return this; they are no-ops on invalid input.
#[derive(thiserror::Error, Debug)]
pub enum ArenaError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Level text could not be decoded into a grid
    #[error("Level parse error: {0}")]
    LevelParse(String),

    /// Configuration values are out of range
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),
}

/// Result type used throughout the Dice Arena codebase.
pub type ArenaResult<T> = Result<T, ArenaError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Health every die spawns with
    pub const DEFAULT_MAX_HEALTH: u32 = 3;

    /// Powerups needed to win a race
    pub const DEFAULT_RACE_GOAL: u32 = 5;

    /// Maximum number of expanded states in one BFS plan
    pub const DEFAULT_BFS_CAP: usize = 5000;

    /// Seconds between scripted enemy attacks
    pub const DEFAULT_SCRIPTED_ATTACK_INTERVAL: f32 = 3.0;

    /// Seconds a roll animation takes (18 steps of 5 degrees at 10ms)
    pub const DEFAULT_ROLL_DURATION: f32 = 0.18;

    /// Seconds a hit die stays stunned in score-based modes
    pub const DEFAULT_STUN_DURATION: f32 = 2.0;

    /// Seconds between random powerup spawns
    pub const DEFAULT_POWERUP_SPAWN_INTERVAL: f32 = 10.0;

    /// Random probes per powerup spawn before giving up
    pub const SPAWN_RETRIES: u32 = 10;

    /// Frames per second target for the game loop
    pub const TARGET_FPS: u32 = 60;
}
