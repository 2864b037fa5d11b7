//! # Utilities Module
//!
//! Timers, the timed state machine, grid geometry, and bounded search.

pub mod math;
pub mod pathfinding;
pub mod state_machine;
pub mod timer;

pub use math::*;
pub use self::pathfinding::*;
pub use state_machine::*;
pub use timer::*;
