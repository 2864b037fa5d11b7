//! # AI Controller
//!
//! Per-die decision engine. Each tick it reads the engine and emits exactly one
//! [`InputCode`], using one of three styles: uniform random, a timed scripted
//! attack loop, or goal seeking through the [`PathPlanner`].

use crate::{
    ArenaResult, DieId, DieKind, Difficulty, Direction, GameConfig, GameEngine, InputCode,
    InputSource, PathPlanner, Position, ScriptedAttack, StateMachine, TileValue,
};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

const ATTACK_STATE: &str = "attack";
const LOOP_TRANSITION: &str = "loop";

/// How an AI die chooses its input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AiStyle {
    /// Uniform over the four rolls and activate
    Random,
    /// Fires `attack` every `interval` seconds and never moves. The timer runs
    /// on while the die cannot act; an elapsed attack is held and fires on the
    /// first tick the die can act again.
    ScriptedTimer { attack: ScriptedAttack, interval: f32 },
    /// Plans toward powerups and attacks when a hit is available
    GoalSeeking,
}

/// Decision engine for one AI-controlled die.
#[derive(Debug, Clone)]
pub struct AiController {
    die: DieId,
    style: AiStyle,
    difficulty: Difficulty,
    planner: PathPlanner,
    rng: StdRng,
    attack_timer: StateMachine,
    plan: Vec<Direction>,
    cursor: usize,
    expected_position: Option<Position>,
    plan_target: Option<Position>,
}

impl AiController {
    pub fn new(
        die: DieId,
        style: AiStyle,
        difficulty: Difficulty,
        planner: PathPlanner,
        seed: u64,
    ) -> ArenaResult<Self> {
        let mut attack_timer = StateMachine::new();
        if let AiStyle::ScriptedTimer { interval, .. } = style {
            attack_timer.add_state(ATTACK_STATE, interval);
            attack_timer.add_transition(ATTACK_STATE, LOOP_TRANSITION, ATTACK_STATE)?;
            attack_timer.set_state(ATTACK_STATE)?;
        }
        Ok(Self {
            die,
            style,
            difficulty,
            planner,
            rng: StdRng::seed_from_u64(seed),
            attack_timer,
            plan: Vec::new(),
            cursor: 0,
            expected_position: None,
            plan_target: None,
        })
    }

    /// The standard controller for a die of `kind`: enemies run the scripted
    /// attack loop, players seek powerups.
    pub fn for_kind(die: DieId, kind: DieKind, config: &GameConfig) -> ArenaResult<Self> {
        let style = match kind {
            DieKind::Enemy => AiStyle::ScriptedTimer {
                attack: ScriptedAttack::default(),
                interval: config.scripted_attack_interval,
            },
            DieKind::PlayerOne | DieKind::PlayerTwo => AiStyle::GoalSeeking,
        };
        let seed = config.seed.wrapping_add(die as u64 + 1);
        Self::new(
            die,
            style,
            config.difficulty,
            PathPlanner::new(config.bfs_cap),
            seed,
        )
    }

    pub fn die(&self) -> DieId {
        self.die
    }

    pub fn style(&self) -> AiStyle {
        self.style
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Remaining queued directions of the current plan.
    pub fn pending_plan(&self) -> &[Direction] {
        self.plan.get(self.cursor..).unwrap_or(&[])
    }

    /// Decides this tick's input.
    pub fn decide(&mut self, engine: &GameEngine, delta_time: f32) -> InputCode {
        match self.style {
            AiStyle::Random => self.decide_random(engine),
            AiStyle::ScriptedTimer { attack, .. } => self.decide_scripted(engine, attack, delta_time),
            AiStyle::GoalSeeking => self.decide_seeking(engine),
        }
    }

    fn can_act(&self, engine: &GameEngine) -> bool {
        !engine.is_finished() && engine.die(self.die).is_some_and(|die| die.can_act())
    }

    fn random_direction(&mut self) -> Direction {
        Direction::all()[self.rng.gen_range(0..4)]
    }

    fn decide_random(&mut self, engine: &GameEngine) -> InputCode {
        if !self.can_act(engine) {
            return InputCode::None;
        }
        match self.rng.gen_range(0..5) {
            4 => InputCode::Activate,
            i => InputCode::Roll(Direction::all()[i]),
        }
    }

    fn decide_scripted(&mut self, engine: &GameEngine, attack: ScriptedAttack, delta_time: f32) -> InputCode {
        self.attack_timer.update(delta_time);
        if !self.can_act(engine) {
            return InputCode::None;
        }
        if self.attack_timer.transition(LOOP_TRANSITION) {
            InputCode::ScriptedAttack(attack)
        } else {
            InputCode::None
        }
    }

    fn decide_seeking(&mut self, engine: &GameEngine) -> InputCode {
        if !self.can_act(engine) {
            return InputCode::None;
        }
        let Some(position) = engine.die(self.die).map(|die| die.position()) else {
            return InputCode::None;
        };
        let profile = self.difficulty.profile();

        if engine.would_hit(self.die) && self.rng.gen_bool(profile.attack_rate) {
            return InputCode::Activate;
        }

        self.invalidate_stale_plan(engine, position);

        if self.cursor >= self.plan.len() {
            self.clear_plan();
            if engine.grid().has_powerups() && self.rng.gen_bool(profile.seek_rate) {
                if let Some(route) = self.planner.search(engine, self.die, TileValue::is_powerup) {
                    if !route.directions.is_empty() {
                        debug!("AI die {} planned {} moves toward {:?}", self.die, route.directions.len(), route.target);
                        self.plan = route.directions;
                        self.plan_target = Some(route.target);
                        self.expected_position = Some(position);
                    }
                }
            }
            if self.plan.is_empty() {
                return InputCode::Roll(self.random_direction());
            }
        }

        let direction = self.plan[self.cursor];
        self.cursor += 1;
        self.expected_position = Some(position.step(direction));
        InputCode::Roll(direction)
    }

    /// Drops the plan if the die was pushed off it or its target is gone.
    fn invalidate_stale_plan(&mut self, engine: &GameEngine, position: Position) {
        if self.plan.is_empty() {
            return;
        }
        let off_course = self.expected_position != Some(position);
        let target_gone = self
            .plan_target
            .and_then(|target| engine.grid().get(target))
            .map_or(true, |value| !value.is_powerup());
        if off_course || target_gone {
            debug!("AI die {} discarding plan (off course: {})", self.die, off_course);
            self.clear_plan();
        }
    }

    fn clear_plan(&mut self) {
        self.plan.clear();
        self.cursor = 0;
        self.expected_position = None;
        self.plan_target = None;
    }
}

impl InputSource for AiController {
    fn die(&self) -> DieId {
        self.die
    }

    fn next_input(&mut self, engine: &GameEngine, delta_time: f32) -> InputCode {
        self.decide(engine, delta_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GameMode, WorldGrid};

    fn engine_with(grid: WorldGrid) -> GameEngine {
        GameEngine::new(grid, GameConfig::for_testing(GameMode::Battle)).unwrap()
    }

    fn seeking(die: DieId, difficulty: Difficulty) -> AiController {
        AiController::new(die, AiStyle::GoalSeeking, difficulty, PathPlanner::default(), 3).unwrap()
    }

    #[test]
    fn test_scripted_fires_once_per_interval() {
        let mut engine = engine_with(WorldGrid::new(5, 5));
        let enemy = engine.spawn_die(DieKind::Enemy, Position::new(2, 2));
        let style = AiStyle::ScriptedTimer {
            attack: ScriptedAttack::default(),
            interval: 1.0,
        };
        let mut ai = AiController::new(enemy, style, Difficulty::Easy, PathPlanner::default(), 1).unwrap();

        let mut fired = Vec::new();
        for tick in 0..40 {
            if let InputCode::ScriptedAttack(_) = ai.decide(&engine, 0.125) {
                fired.push(tick);
            }
        }
        assert_eq!(fired, vec![7, 15, 23, 31, 39]);
    }

    #[test]
    fn test_random_style_emits_only_rolls_and_activate() {
        let mut engine = engine_with(WorldGrid::new(5, 5));
        let die = engine.spawn_die(DieKind::PlayerOne, Position::new(2, 2));
        let mut ai = AiController::new(die, AiStyle::Random, Difficulty::Easy, PathPlanner::default(), 11).unwrap();

        let mut seen_activate = false;
        let mut seen_roll = false;
        for _ in 0..200 {
            match ai.decide(&engine, 0.016) {
                InputCode::Activate => seen_activate = true,
                InputCode::Roll(_) => seen_roll = true,
                other => panic!("unexpected input {:?}", other),
            }
        }
        assert!(seen_activate && seen_roll);
    }

    #[test]
    fn test_no_input_while_in_transit() {
        let mut engine = engine_with(WorldGrid::new(5, 5));
        let die = engine.spawn_die(DieKind::PlayerOne, Position::new(2, 2));
        assert!(engine.roll(die, Direction::Up));
        let mut ai = seeking(die, Difficulty::Brutal);
        assert_eq!(ai.decide(&engine, 0.016), InputCode::None);
    }

    #[test]
    fn test_brutal_follows_plan_to_powerup() {
        let mut grid = WorldGrid::new(2, 2);
        grid.set(Position::new(1, 0), TileValue::Powerup(4));
        let mut engine = engine_with(grid);
        let die = engine.spawn_die(DieKind::PlayerOne, Position::new(0, 0));
        let mut ai = seeking(die, Difficulty::Brutal);

        let mut moves = Vec::new();
        while engine.grid().has_powerups() && moves.len() < 10 {
            let input = ai.decide(&engine, 0.016);
            if let InputCode::Roll(direction) = input {
                moves.push(direction);
            }
            assert!(engine.handle_input(die, input));
            engine.finish_roll(die);
        }
        assert_eq!(moves, vec![Direction::Down, Direction::Right, Direction::Up]);
        assert_eq!(engine.die(die).unwrap().powerups_collected(), 1);
    }

    fn planned_after_first_move() -> (AiController, GameEngine) {
        let mut grid = WorldGrid::new(2, 2);
        grid.set(Position::new(1, 0), TileValue::Powerup(4));
        let mut engine = engine_with(grid);
        let die = engine.spawn_die(DieKind::PlayerOne, Position::new(0, 0));
        let mut ai = seeking(die, Difficulty::Brutal);

        let first = ai.decide(&engine, 0.016);
        assert_eq!(first, InputCode::Roll(Direction::Down));
        assert!(engine.handle_input(die, first));
        engine.finish_roll(die);
        assert_eq!(ai.pending_plan(), &[Direction::Right, Direction::Up]);
        (ai, engine)
    }

    #[test]
    fn test_plan_kept_while_on_course() {
        let (mut ai, engine) = planned_after_first_move();
        assert_eq!(ai.decide(&engine, 0.016), InputCode::Roll(Direction::Right));
        assert_eq!(ai.pending_plan(), &[Direction::Up]);
    }

    #[test]
    fn test_plan_dropped_when_target_disappears() {
        let (mut ai, _) = planned_after_first_move();
        // Same die position, but the powerup is gone.
        let mut emptied = engine_with(WorldGrid::new(2, 2));
        emptied.spawn_die(DieKind::PlayerOne, Position::new(0, 1));

        let input = ai.decide(&emptied, 0.016);
        assert!(matches!(input, InputCode::Roll(_)));
        assert!(ai.pending_plan().is_empty());
    }

    #[test]
    fn test_plan_dropped_when_off_course() {
        let (mut ai, _) = planned_after_first_move();
        // Die is somewhere the plan did not expect.
        let mut grid = WorldGrid::new(3, 3);
        grid.set(Position::new(1, 0), TileValue::Powerup(4));
        let mut moved = engine_with(grid);
        moved.spawn_die(DieKind::PlayerOne, Position::new(2, 2));

        ai.decide(&moved, 0.016);
        assert_ne!(ai.pending_plan(), &[Direction::Up]);
    }

    #[test]
    fn test_activates_when_hit_available() {
        let mut grid = WorldGrid::new(12, 3);
        grid.set(Position::new(1, 1), TileValue::Powerup(5));
        let mut engine = engine_with(grid);
        let die = engine.spawn_die(DieKind::PlayerOne, Position::new(0, 1));
        for _ in 0..3 {
            assert!(engine.roll(die, Direction::Right));
            engine.finish_roll(die);
        }
        engine.spawn_die(DieKind::PlayerTwo, Position::new(8, 1));

        let mut ai = seeking(die, Difficulty::Brutal);
        assert_eq!(ai.decide(&engine, 0.016), InputCode::Activate);
    }

    #[test]
    fn test_easy_sometimes_skips_attack_and_wanders() {
        let mut grid = WorldGrid::new(12, 3);
        grid.set(Position::new(1, 1), TileValue::Powerup(5));
        // Nine cells from the shooter, so any plan toward it has queued moves left after the first.
        grid.set(Position::new(11, 0), TileValue::Powerup(1));
        let mut engine = engine_with(grid);
        let die = engine.spawn_die(DieKind::PlayerOne, Position::new(0, 1));
        for _ in 0..3 {
            assert!(engine.roll(die, Direction::Right));
            engine.finish_roll(die);
        }
        engine.spawn_die(DieKind::PlayerTwo, Position::new(8, 1));
        assert!(engine.would_hit(die));

        let mut ai = seeking(die, Difficulty::Easy);
        let mut activations = 0;
        let mut planned_rolls = 0;
        let mut wandering_rolls = 0;
        // The engine is never advanced, so each tick is an independent decision.
        for _ in 0..400 {
            match ai.decide(&engine, 0.016) {
                InputCode::Activate => activations += 1,
                InputCode::Roll(_) if ai.pending_plan().is_empty() => wandering_rolls += 1,
                InputCode::Roll(_) => planned_rolls += 1,
                other => panic!("unexpected input {:?}", other),
            }
        }
        assert!(activations > 0);
        assert!(planned_rolls > 0);
        assert!(wandering_rolls > 0);
        assert!(activations < 400);
        assert!(wandering_rolls > planned_rolls);
    }

    #[test]
    fn test_stunned_enemy_holds_attack_until_free() {
        let mut engine = GameEngine::new(WorldGrid::new(5, 5), GameConfig::for_testing(GameMode::Race)).unwrap();
        let stunner = engine.spawn_die(DieKind::Enemy, Position::new(1, 2));
        let enemy = engine.spawn_die(DieKind::Enemy, Position::new(2, 2));
        assert!(engine.enemy_scripted_attack(ScriptedAttack::default(), stunner));
        assert!(engine.die(enemy).unwrap().is_stunned());

        let style = AiStyle::ScriptedTimer {
            attack: ScriptedAttack::default(),
            interval: 1.0,
        };
        let mut ai = AiController::new(enemy, style, Difficulty::Easy, PathPlanner::default(), 1).unwrap();

        let mut released = None;
        let mut fired = Vec::new();
        for tick in 0..48 {
            engine.update(0.125);
            if released.is_none() && !engine.die(enemy).unwrap().is_stunned() {
                released = Some(tick);
            }
            if let InputCode::ScriptedAttack(_) = ai.decide(&engine, 0.125) {
                fired.push(tick);
            }
        }
        let released = released.unwrap();
        assert!(released > 7);
        assert_eq!(fired.first(), Some(&released));
        assert!(fired.windows(2).all(|pair| pair[1] - pair[0] == 8));
    }

    #[test]
    fn test_for_kind_styles() {
        let config = GameConfig::for_testing(GameMode::Battle);
        let enemy = AiController::for_kind(2, DieKind::Enemy, &config).unwrap();
        assert!(matches!(enemy.style(), AiStyle::ScriptedTimer { .. }));
        let player = AiController::for_kind(0, DieKind::PlayerOne, &config).unwrap();
        assert_eq!(player.style(), AiStyle::GoalSeeking);
        assert_eq!(player.difficulty(), Difficulty::Brutal);
    }
}
