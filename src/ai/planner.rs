//! # Path Planner
//!
//! Breadth-first search over full die states. A node is an [`Orientation`]
//! (cell plus ordered faces), not just a cell, because whether a powerup cell
//! can be entered depends on the face the die lands on.

use crate::{bounded_bfs, config, DieId, Direction, GameEngine, Orientation, Position, TileValue};
use log::debug;

/// A shortest roll sequence toward a goal cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub directions: Vec<Direction>,
    /// Cell the route ends on
    pub target: Position,
    /// States expanded while searching
    pub expanded: usize,
}

/// Capped BFS planner reading the engine through its query surface only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathPlanner {
    cap: usize,
}

impl PathPlanner {
    pub fn new(cap: usize) -> Self {
        Self { cap: cap.max(1) }
    }

    /// Shortest roll sequence from `die`'s current state to any other state
    /// whose cell satisfies `goal`.
    ///
    /// Returns an empty plan when the die is missing, no goal cell is
    /// reachable, or the expansion cap is hit.
    pub fn plan(&self, engine: &GameEngine, die: DieId, goal: impl Fn(TileValue) -> bool) -> Vec<Direction> {
        self.search(engine, die, goal)
            .map(|route| route.directions)
            .unwrap_or_default()
    }

    /// As [`PathPlanner::plan`], also reporting the target cell.
    pub fn search(
        &self,
        engine: &GameEngine,
        die: DieId,
        goal: impl Fn(TileValue) -> bool,
    ) -> Option<Route> {
        let state = engine.die(die)?;
        if state.is_dead() || !state.is_spawned() {
            return None;
        }
        let start = state.orientation();

        let result = bounded_bfs(
            &start,
            |node: &Orientation| {
                Direction::all()
                    .into_iter()
                    .map(|direction| node.rolled(direction))
                    .filter(|next| {
                        engine.can_enter_square_ignoring(next.position, next.faces.bottom(), Some(die))
                    })
                    .collect::<Vec<_>>()
            },
            |node: &Orientation| *node != start && engine.grid().get(node.position).is_some_and(&goal),
            self.cap,
        );

        let Some(path) = result.path else {
            debug!(
                "Planner for die {} found nothing after {} states (capped: {})",
                die, result.expanded, result.exhausted
            );
            return None;
        };

        let directions: Vec<Direction> = path
            .windows(2)
            .filter_map(|pair| Direction::from_delta(pair[1].position - pair[0].position))
            .collect();
        let target = path.last().map(|node| node.position).unwrap_or(start.position);
        debug!(
            "Planner for die {} found {} moves to {:?} after {} states",
            die,
            directions.len(),
            target,
            result.expanded
        );
        Some(Route {
            directions,
            target,
            expanded: result.expanded,
        })
    }
}

impl Default for PathPlanner {
    fn default() -> Self {
        Self::new(config::DEFAULT_BFS_CAP)
    }
}
