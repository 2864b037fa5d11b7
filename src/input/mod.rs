//! # Input Module
//!
//! Per-tick input codes shared by human and AI controllers.
//!
//! Every controller emits exactly one [`InputCode`] per tick. The integer
//! encoding is the wire format between host input layers and the engine:
//!
//! | code | meaning |
//! |------|---------|
//! | -1 | no input this tick |
//! | 0..=3 | roll up, down, left, right |
//! | 4 | activate charged top face |
//! | 10..=12 | scripted enemy attack |

use crate::{neighborhood, DieId, Direction, GameEngine, Position};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One of the scripted enemy attack patterns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScriptedAttack(u8);

impl ScriptedAttack {
    /// Input code of the first scripted attack.
    pub const FIRST_CODE: i32 = 10;
    /// Number of scripted attack kinds.
    pub const COUNT: u8 = 3;

    pub fn new(index: u8) -> Option<Self> {
        (index < Self::COUNT).then_some(Self(index))
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Cells the attack covers around the attacker.
    ///
    /// All kinds currently share the 3×3 ring; they differ only in the
    /// presentation cue.
    pub fn footprint(self, center: Position) -> Vec<Position> {
        neighborhood(center)
    }
}

/// A single tick's worth of input for one die.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputCode {
    #[default]
    None,
    Roll(Direction),
    Activate,
    ScriptedAttack(ScriptedAttack),
}

impl InputCode {
    /// Decodes an integer input code. Unknown codes decode to `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dice_arena::{Direction, InputCode};
    ///
    /// assert_eq!(InputCode::from_code(2), InputCode::Roll(Direction::Left));
    /// assert_eq!(InputCode::from_code(-1), InputCode::None);
    /// assert_eq!(InputCode::from_code(4).code(), 4);
    /// ```
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => InputCode::Roll(Direction::Up),
            1 => InputCode::Roll(Direction::Down),
            2 => InputCode::Roll(Direction::Left),
            3 => InputCode::Roll(Direction::Right),
            4 => InputCode::Activate,
            c if c >= ScriptedAttack::FIRST_CODE => {
                match u8::try_from(c - ScriptedAttack::FIRST_CODE)
                    .ok()
                    .and_then(ScriptedAttack::new)
                {
                    Some(attack) => InputCode::ScriptedAttack(attack),
                    None => InputCode::None,
                }
            }
            _ => InputCode::None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            InputCode::None => -1,
            InputCode::Roll(Direction::Up) => 0,
            InputCode::Roll(Direction::Down) => 1,
            InputCode::Roll(Direction::Left) => 2,
            InputCode::Roll(Direction::Right) => 3,
            InputCode::Activate => 4,
            InputCode::ScriptedAttack(attack) => ScriptedAttack::FIRST_CODE + attack.index() as i32,
        }
    }

    pub fn is_none(self) -> bool {
        self == InputCode::None
    }
}

/// Anything that drives one die by producing an input each tick.
pub trait InputSource {
    /// The die this source controls.
    fn die(&self) -> DieId;

    /// Produces this tick's input. Sources only read the engine.
    fn next_input(&mut self, engine: &GameEngine, delta_time: f32) -> InputCode;
}

/// Input pushed from outside (keyboard, network, scripted test), consumed one
/// code per tick.
#[derive(Debug, Clone, Default)]
pub struct QueuedInput {
    die: DieId,
    queue: VecDeque<InputCode>,
}

impl QueuedInput {
    pub fn new(die: DieId) -> Self {
        Self {
            die,
            queue: VecDeque::new(),
        }
    }

    pub fn push(&mut self, input: InputCode) {
        if !input.is_none() {
            self.queue.push_back(input);
        }
    }

    pub fn push_code(&mut self, code: i32) {
        self.push(InputCode::from_code(code));
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

impl InputSource for QueuedInput {
    fn die(&self) -> DieId {
        self.die
    }

    /// Held while the die is mid-roll so queued moves are not dropped.
    fn next_input(&mut self, engine: &GameEngine, _delta_time: f32) -> InputCode {
        let busy = engine.die(self.die).map_or(true, |die| die.is_moving());
        if busy {
            return InputCode::None;
        }
        self.queue.pop_front().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_table() {
        let table = [
            (-1, InputCode::None),
            (0, InputCode::Roll(Direction::Up)),
            (1, InputCode::Roll(Direction::Down)),
            (2, InputCode::Roll(Direction::Left)),
            (3, InputCode::Roll(Direction::Right)),
            (4, InputCode::Activate),
            (10, InputCode::ScriptedAttack(ScriptedAttack(0))),
            (12, InputCode::ScriptedAttack(ScriptedAttack(2))),
        ];
        for (code, input) in table {
            assert_eq!(InputCode::from_code(code), input);
            assert_eq!(input.code(), code);
        }
    }

    #[test]
    fn test_unknown_codes_are_no_input() {
        for code in [5, 9, 13, 99, -7, i32::MAX, i32::MIN] {
            assert!(InputCode::from_code(code).is_none(), "code {}", code);
        }
    }

    #[test]
    fn test_scripted_footprint() {
        let attack = ScriptedAttack::new(1).unwrap();
        let cells = attack.footprint(Position::new(4, 4));
        assert_eq!(cells.len(), 8);
        assert!(!cells.contains(&Position::new(4, 4)));
        assert!(ScriptedAttack::new(3).is_none());
    }

    #[test]
    fn test_queued_input_waits_for_roll_to_finish() {
        use crate::{DieKind, GameConfig, GameMode, WorldGrid};

        let mut engine = GameEngine::new(WorldGrid::new(4, 4), GameConfig::for_testing(GameMode::Battle)).unwrap();
        let die = engine.spawn_die(DieKind::PlayerOne, Position::new(1, 1));
        let mut source = QueuedInput::new(die);
        source.push_code(3);
        source.push_code(-1);
        source.push(InputCode::Roll(Direction::Down));
        assert_eq!(source.pending(), 2);

        let first = source.next_input(&engine, 0.016);
        assert_eq!(first, InputCode::Roll(Direction::Right));
        assert!(engine.handle_input(die, first));
        assert_eq!(source.next_input(&engine, 0.016), InputCode::None);
        assert_eq!(source.pending(), 1);

        engine.finish_roll(die);
        assert_eq!(source.next_input(&engine, 0.016), InputCode::Roll(Direction::Down));
        assert_eq!(source.next_input(&engine, 0.016), InputCode::None);
    }
}
