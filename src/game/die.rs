//! # Die Model
//!
//! Pure-data model of one die: where it is, which label faces which way,
//! which faces are charged, and how much health it has left.
//!
//! Rolling rotates the face labels; it never relabels them. Every roll keeps
//! `faces` a permutation of 1..=6.

use crate::{Direction, Position, Timer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The six directions a face can point, used as indices into [`Faces`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceSlot {
    Top = 0,
    Bottom = 1,
    Front = 2,
    Back = 3,
    Left = 4,
    Right = 5,
}

/// Face labels stored as `[top, bottom, front, back, left, right]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Faces([u8; 6]);

impl Faces {
    /// Starting orientation: 3 up, 4 down, 6 front, 1 back, 2 left, 5 right.
    pub const STANDARD: Faces = Faces([3, 4, 6, 1, 2, 5]);

    /// Builds a face array, rejecting anything that is not a permutation of 1..=6.
    pub fn new(labels: [u8; 6]) -> Option<Self> {
        let faces = Faces(labels);
        faces.is_permutation().then_some(faces)
    }

    /// Label on the given slot.
    pub fn get(&self, slot: FaceSlot) -> u8 {
        self.0[slot as usize]
    }

    pub fn top(&self) -> u8 {
        self.get(FaceSlot::Top)
    }

    pub fn bottom(&self) -> u8 {
        self.get(FaceSlot::Bottom)
    }

    /// Labels in slot order.
    pub fn labels(&self) -> [u8; 6] {
        self.0
    }

    /// True if every label 1..=6 appears exactly once.
    pub fn is_permutation(&self) -> bool {
        let mut seen = [false; 7];
        for &label in &self.0 {
            if !(1..=6).contains(&label) || seen[label as usize] {
                return false;
            }
            seen[label as usize] = true;
        }
        true
    }

    /// Applies the face permutation of a roll in `direction`.
    ///
    /// The roll axis pair keeps its labels; the other four cycle through top.
    pub fn roll(&mut self, direction: Direction) {
        use FaceSlot::*;
        match direction {
            Direction::Up => self.cycle_through_top(Front, Bottom, Back),
            Direction::Down => self.cycle_through_top(Back, Bottom, Front),
            Direction::Left => self.cycle_through_top(Right, Bottom, Left),
            Direction::Right => self.cycle_through_top(Left, Bottom, Right),
        }
    }

    /// top <- a <- b <- c <- old top
    fn cycle_through_top(&mut self, a: FaceSlot, b: FaceSlot, c: FaceSlot) {
        let old_top = self.0[FaceSlot::Top as usize];
        self.0[FaceSlot::Top as usize] = self.0[a as usize];
        self.0[a as usize] = self.0[b as usize];
        self.0[b as usize] = self.0[c as usize];
        self.0[c as usize] = old_top;
    }
}

impl Default for Faces {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Full state of a die's placement: cell plus face orientation.
///
/// This is the canonical key the planner deduplicates on. Two orientations are
/// the same search state exactly when position and ordered faces match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Orientation {
    pub position: Position,
    pub faces: Faces,
}

impl Orientation {
    pub fn new(position: Position, faces: Faces) -> Self {
        Self { position, faces }
    }

    /// Returns the orientation after rolling once in `direction`.
    pub fn rolled(mut self, direction: Direction) -> Self {
        self.faces.roll(direction);
        self.position = self.position.step(direction);
        self
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [t, b, fr, bk, l, r] = self.faces.labels();
        write!(
            f,
            "({},{})[{}{}{}{}{}{}]",
            self.position.x, self.position.y, t, b, fr, bk, l, r
        )
    }
}

/// Set of face labels that currently hold a charge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargedFaces(u8);

impl ChargedFaces {
    pub fn contains(&self, label: u8) -> bool {
        (1..=6).contains(&label) && self.0 & (1 << label) != 0
    }

    /// Returns false if the label was already charged or is not a face label.
    pub fn insert(&mut self, label: u8) -> bool {
        if !(1..=6).contains(&label) || self.contains(label) {
            return false;
        }
        self.0 |= 1 << label;
        true
    }

    /// Returns false if the label was not charged.
    pub fn remove(&mut self, label: u8) -> bool {
        if !self.contains(label) {
            return false;
        }
        self.0 &= !(1 << label);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn labels(&self) -> Vec<u8> {
        (1..=6).filter(|&label| self.contains(label)).collect()
    }
}

/// Who controls a die, as written in level files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DieKind {
    PlayerOne,
    PlayerTwo,
    Enemy,
}

impl DieKind {
    /// Numeric player type used by presentation layers.
    pub fn player_type(self) -> u8 {
        match self {
            DieKind::PlayerOne => 1,
            DieKind::PlayerTwo => 2,
            DieKind::Enemy => 3,
        }
    }
}

/// Authoritative state of one die.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DieState {
    pub kind: DieKind,
    orientation: Orientation,
    /// Cell the die left on its last roll, until the roll animation completes
    previous_position: Option<Position>,
    charged: ChargedFaces,
    health: u32,
    dead: bool,
    powerups_collected: u32,
    stun: Option<Timer>,
}

impl DieState {
    /// Creates an unplaced die in the standard orientation.
    pub fn new(kind: DieKind, max_health: u32) -> Self {
        Self {
            kind,
            orientation: Orientation::new(Position::OFF_GRID, Faces::STANDARD),
            previous_position: None,
            charged: ChargedFaces::default(),
            health: max_health,
            dead: false,
            powerups_collected: 0,
            stun: None,
        }
    }

    pub fn position(&self) -> Position {
        self.orientation.position
    }

    pub fn previous_position(&self) -> Option<Position> {
        self.previous_position
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn faces(&self) -> Faces {
        self.orientation.faces
    }

    pub fn top(&self) -> u8 {
        self.orientation.faces.top()
    }

    pub fn bottom(&self) -> u8 {
        self.orientation.faces.bottom()
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn powerups_collected(&self) -> u32 {
        self.powerups_collected
    }

    pub fn charged(&self) -> ChargedFaces {
        self.charged
    }

    pub fn is_spawned(&self) -> bool {
        self.orientation.position != Position::OFF_GRID
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// A roll has been committed but its animation has not completed.
    pub fn is_moving(&self) -> bool {
        self.previous_position.is_some()
    }

    pub fn is_stunned(&self) -> bool {
        self.stun.is_some()
    }

    /// Alive, placed, not in transit and not stunned.
    pub fn can_act(&self) -> bool {
        !self.dead && self.is_spawned() && !self.is_moving() && !self.is_stunned()
    }

    /// True if the die currently sits on `position` or is in transit out of it.
    pub fn occupies_or_leaving(&self, position: Position) -> bool {
        self.position() == position || self.previous_position == Some(position)
    }

    /// Teleports the die without touching its faces.
    pub fn set_position(&mut self, position: Position) {
        self.orientation.position = position;
    }

    /// Rolls one cell in `direction`, remembering the cell it left.
    pub fn roll(&mut self, direction: Direction) {
        self.previous_position = Some(self.orientation.position);
        self.orientation = self.orientation.rolled(direction);
    }

    /// Ends the transit window opened by [`DieState::roll`].
    pub fn finish_roll(&mut self) {
        self.previous_position = None;
    }

    pub fn is_charged(&self, label: u8) -> bool {
        self.charged.contains(label)
    }

    pub fn is_top_charged(&self) -> bool {
        self.charged.contains(self.top())
    }

    pub fn charge(&mut self, label: u8) -> bool {
        self.charged.insert(label)
    }

    pub fn discharge(&mut self, label: u8) -> bool {
        self.charged.remove(label)
    }

    pub fn record_pickup(&mut self) -> u32 {
        self.powerups_collected += 1;
        self.powerups_collected
    }

    /// Removes one health point and returns what is left.
    pub fn take_hit(&mut self) -> u32 {
        self.health = self.health.saturating_sub(1);
        self.health
    }

    /// Marks the die dead. Dead is terminal; the record stays in the table.
    pub fn mark_dead(&mut self) {
        self.dead = true;
        self.previous_position = None;
        self.stun = None;
    }

    pub fn stun(&mut self, duration: f32) {
        self.stun = Some(Timer::new(duration));
    }

    /// Advances the stun clock. Returns true on the tick the stun wears off.
    pub fn update_stun(&mut self, delta_time: f32) -> bool {
        let Some(timer) = self.stun.as_mut() else {
            return false;
        };
        timer.update(delta_time);
        if timer.is_over() {
            self.stun = None;
            return true;
        }
        false
    }
}
