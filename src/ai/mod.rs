//! # AI Module
//!
//! Decision making for dice that are not driven by a person.
//!
//! - [`PathPlanner`]: capped BFS over (cell × orientation) toward a goal cell
//! - [`AiController`]: per-die engine choosing one input per tick
//! - [`Difficulty`]: seek and attack probabilities
//!
//! Controllers only read the engine. Their output goes back through the
//! engine's command surface like any human input.

pub mod controller;
pub mod difficulty;
pub mod planner;

pub use controller::*;
pub use difficulty::*;
pub use planner::*;
