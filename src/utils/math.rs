//! # Grid Geometry
//!
//! Target footprints on the tile grid. Callers filter out-of-bounds and wall
//! cells; these helpers only do the arithmetic.

use crate::Position;

/// All positions at Manhattan distance exactly `distance` from `center`.
///
/// Ordered by x offset, then y offset. A distance of 0 yields only `center`.
///
/// # Examples
///
/// ```
/// use dice_arena::{manhattan_ring, Position};
///
/// let ring = manhattan_ring(Position::new(5, 5), 1);
/// assert_eq!(ring.len(), 4);
/// assert!(ring.contains(&Position::new(5, 4)));
/// ```
pub fn manhattan_ring(center: Position, distance: u32) -> Vec<Position> {
    let d = distance as i32;
    let mut ring = Vec::with_capacity((4 * distance).max(1) as usize);
    for dx in -d..=d {
        for dy in -d..=d {
            if dx.abs() + dy.abs() != d {
                continue;
            }
            ring.push(Position::new(center.x + dx, center.y + dy));
        }
    }
    ring
}

/// The eight cells surrounding `center` (3×3 block without the middle).
pub fn neighborhood(center: Position) -> Vec<Position> {
    let mut cells = Vec::with_capacity(8);
    for dy in -1..=1 {
        for dx in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            cells.push(Position::new(center.x + dx, center.y + dy));
        }
    }
    cells
}
