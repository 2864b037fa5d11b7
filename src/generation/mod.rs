//! # Generation Module
//!
//! Level decoding and powerup placement.
//!
//! Levels are plain character grids, one row per line:
//!
//! | char | meaning |
//! |------|---------|
//! | `#` | wall |
//! | `.` | open floor (seeded with powerups in powerwash) |
//! | `1` | player one spawn |
//! | `2` | player two spawn |
//! | `R` | scripted enemy spawn |
//!
//! Spawn cells are open floor once the die has left them.

use crate::{ArenaError, ArenaResult, DieKind, Position, TileValue, WorldGrid};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Built-in arena: two players in opposite corners, one enemy in the middle.
pub const DEFAULT_LEVEL: &str = "\
###########
#1........#
#.##...##.#
#.#.....#.#
#....R....#
#.#.....#.#
#.##...##.#
#........2#
###########";

/// A die to place at match start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub kind: DieKind,
    pub position: Position,
}

/// A decoded level: the tile grid plus spawn list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelData {
    pub grid: WorldGrid,
    /// Spawns in reading order (row by row, left to right)
    pub spawns: Vec<SpawnPoint>,
    /// `.` cells, the only cells eligible for powerwash seeding
    pub open_cells: Vec<Position>,
}

impl LevelData {
    /// Decodes a character grid.
    ///
    /// Trailing blank lines and `\r` line endings are ignored. Ragged rows and
    /// unknown characters are errors.
    ///
    /// # Examples
    ///
    /// ```
    /// use dice_arena::{DieKind, LevelData, Position};
    ///
    /// let level = LevelData::parse("#1.\n.R2").unwrap();
    /// assert_eq!((level.grid.width, level.grid.height), (3, 2));
    /// assert_eq!(level.spawns[1].kind, DieKind::PlayerTwo);
    /// assert_eq!(level.spawns[1].position, Position::new(2, 0));
    /// ```
    pub fn parse(text: &str) -> ArenaResult<Self> {
        let lines: Vec<&str> = text
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .collect();
        let rows_end = lines
            .iter()
            .rposition(|line| !line.is_empty())
            .map(|i| i + 1)
            .ok_or_else(|| ArenaError::LevelParse("level is empty".to_string()))?;

        let mut rows = Vec::with_capacity(rows_end);
        let mut spawns = Vec::new();
        let mut open_cells = Vec::new();

        for (y, line) in lines[..rows_end].iter().enumerate() {
            let mut row = Vec::with_capacity(line.len());
            for (x, ch) in line.chars().enumerate() {
                let position = Position::new(x as i32, y as i32);
                let value = match ch {
                    '#' => TileValue::Wall,
                    '.' => {
                        open_cells.push(position);
                        TileValue::Empty
                    }
                    '1' | '2' | 'R' => {
                        let kind = match ch {
                            '1' => DieKind::PlayerOne,
                            '2' => DieKind::PlayerTwo,
                            _ => DieKind::Enemy,
                        };
                        spawns.push(SpawnPoint { kind, position });
                        TileValue::Empty
                    }
                    other => {
                        return Err(ArenaError::LevelParse(format!(
                            "unknown character '{}' at ({}, {})",
                            other, x, y
                        )))
                    }
                };
                row.push(value);
            }
            rows.push(row);
        }

        let width = rows[0].len();
        if let Some(y) = rows.iter().position(|row| row.len() != width) {
            return Err(ArenaError::LevelParse(format!(
                "row {} has {} cells, expected {}",
                y,
                rows[y].len(),
                width
            )));
        }
        let grid = WorldGrid::from_rows(rows)
            .ok_or_else(|| ArenaError::LevelParse("ragged level rows".to_string()))?;

        Ok(Self {
            grid,
            spawns,
            open_cells,
        })
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> ArenaResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// The built-in arena.
    pub fn default_level() -> ArenaResult<Self> {
        Self::parse(DEFAULT_LEVEL)
    }

    pub fn spawns_of(&self, kind: DieKind) -> impl Iterator<Item = &SpawnPoint> + '_ {
        self.spawns.iter().filter(move |spawn| spawn.kind == kind)
    }
}

impl std::str::FromStr for LevelData {
    type Err = ArenaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Puts a random powerup (1..=6) on each of `cells` that is currently empty.
///
/// Returns how many powerups were placed.
pub fn seed_powerups<R: Rng + ?Sized>(grid: &mut WorldGrid, cells: &[Position], rng: &mut R) -> usize {
    let mut seeded = 0;
    for &cell in cells {
        if grid.get(cell) == Some(TileValue::Empty) {
            grid.set(cell, TileValue::Powerup(rng.gen_range(1..=6u8)));
            seeded += 1;
        }
    }
    seeded
}

/// Creates the seeded random number generator a match runs on.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
