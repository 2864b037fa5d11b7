//! # World Grid
//!
//! Fixed-size tile matrix loaded once per level. Each cell is a wall, an
//! empty floor, or a floor holding a powerup labelled 1..=6.

use crate::Position;
use serde::{Deserialize, Serialize};

/// Contents of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileValue {
    /// Impassable
    Wall,
    /// Free floor
    Empty,
    /// Floor holding a powerup with this face label
    Powerup(u8),
}

impl TileValue {
    /// Decodes the numeric cell encoding: -1 wall, 0 empty, 1..=6 powerup.
    pub fn from_raw(raw: i8) -> Option<Self> {
        match raw {
            -1 => Some(TileValue::Wall),
            0 => Some(TileValue::Empty),
            1..=6 => Some(TileValue::Powerup(raw as u8)),
            _ => None,
        }
    }

    pub fn to_raw(self) -> i8 {
        match self {
            TileValue::Wall => -1,
            TileValue::Empty => 0,
            TileValue::Powerup(label) => label as i8,
        }
    }

    pub fn is_wall(self) -> bool {
        self == TileValue::Wall
    }

    pub fn is_powerup(self) -> bool {
        matches!(self, TileValue::Powerup(_))
    }

    /// The powerup label, if any.
    pub fn powerup(self) -> Option<u8> {
        match self {
            TileValue::Powerup(label) => Some(label),
            _ => None,
        }
    }
}

/// A cell coordinate paired with its contents, used in notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub position: Position,
    pub value: TileValue,
}

impl Tile {
    pub fn new(position: Position, value: TileValue) -> Self {
        Self { position, value }
    }
}

/// The tile matrix, indexed `tiles[y][x]`.
///
/// Occupancy by dice is tracked by the engine, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldGrid {
    pub width: u32,
    pub height: u32,
    tiles: Vec<Vec<TileValue>>,
}

impl WorldGrid {
    /// Creates an all-empty grid.
    ///
    /// # Examples
    ///
    /// ```
    /// use dice_arena::{Position, TileValue, WorldGrid};
    ///
    /// let mut grid = WorldGrid::new(4, 3);
    /// assert_eq!(grid.get(Position::new(3, 2)), Some(TileValue::Empty));
    /// assert_eq!(grid.get(Position::new(4, 0)), None);
    ///
    /// grid.set(Position::new(1, 1), TileValue::Wall);
    /// assert!(!grid.is_valid_square(Position::new(1, 1)));
    /// ```
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tiles: vec![vec![TileValue::Empty; width as usize]; height as usize],
        }
    }

    /// Builds a grid from rows of equal length.
    ///
    /// Returns None if the rows are ragged.
    pub fn from_rows(rows: Vec<Vec<TileValue>>) -> Option<Self> {
        let height = rows.len() as u32;
        let width = rows.first().map(|row| row.len()).unwrap_or(0) as u32;
        if rows.iter().any(|row| row.len() as u32 != width) {
            return None;
        }
        Some(Self {
            width,
            height,
            tiles: rows,
        })
    }

    pub fn in_bounds(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && (position.x as u32) < self.width
            && (position.y as u32) < self.height
    }

    pub fn get(&self, position: Position) -> Option<TileValue> {
        if !self.in_bounds(position) {
            return None;
        }
        Some(self.tiles[position.y as usize][position.x as usize])
    }

    /// Overwrites a cell. Returns false if out of bounds.
    pub fn set(&mut self, position: Position, value: TileValue) -> bool {
        if !self.in_bounds(position) {
            return false;
        }
        self.tiles[position.y as usize][position.x as usize] = value;
        true
    }

    /// In bounds and not a wall.
    pub fn is_valid_square(&self, position: Position) -> bool {
        matches!(self.get(position), Some(value) if !value.is_wall())
    }

    /// Removes a powerup, returning its label.
    pub fn take_powerup(&mut self, position: Position) -> Option<u8> {
        let label = self.get(position)?.powerup()?;
        self.set(position, TileValue::Empty);
        Some(label)
    }

    /// Iterates every cell with its position, row by row.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        self.tiles.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, &value)| Tile::new(Position::new(x as i32, y as i32), value))
        })
    }

    pub fn powerup_count(&self) -> usize {
        self.tiles().filter(|tile| tile.value.is_powerup()).count()
    }

    pub fn has_powerups(&self) -> bool {
        self.tiles().any(|tile| tile.value.is_powerup())
    }

    /// Cells in `positions` that are in bounds and not walls, in input order.
    pub fn valid_squares(&self, positions: impl IntoIterator<Item = Position>) -> Vec<Position> {
        positions
            .into_iter()
            .filter(|&p| self.is_valid_square(p))
            .collect()
    }
}
