//! # Game State Module
//!
//! The simulation core. [`GameEngine`] exclusively owns the tile grid and the
//! die table, validates every command against them, applies combat and economy
//! rules, and evaluates the win condition of the active [`GameMode`].
//!
//! Every command is a silent no-op on invalid input and reports acceptance as a
//! `bool`. Controllers (human or AI) only read the engine through its query
//! methods; all mutation goes through the command surface.

use crate::{
    config, manhattan_ring, ArenaError, ArenaResult, DieId, DieKind, DieState, Difficulty,
    Direction, GameEvent, InputCode, LevelData, Position, ScriptedAttack, SoundEffect, Tile,
    TileValue, WorldGrid,
};
use log::{debug, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Rule set of a match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Last die standing wins; hits cost health
    #[default]
    Battle,
    /// First to a fixed number of powerups wins; hits stun
    Race,
    /// Every open tile starts with a powerup; first to half of them wins.
    /// Pickups score but never charge faces.
    Powerwash,
}

impl GameMode {
    /// Picking up a powerup charges the matching face.
    pub fn charges_on_pickup(self) -> bool {
        self != GameMode::Powerwash
    }

    /// Hits remove health instead of stunning.
    pub fn hits_damage(self) -> bool {
        self == GameMode::Battle
    }

    /// The match is decided by collected powerups.
    pub fn is_score_based(self) -> bool {
        self != GameMode::Battle
    }
}

impl std::str::FromStr for GameMode {
    type Err = ArenaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "battle" => Ok(GameMode::Battle),
            "race" => Ok(GameMode::Race),
            "powerwash" => Ok(GameMode::Powerwash),
            other => Err(ArenaError::InvalidConfig(format!("unknown game mode '{}'", other))),
        }
    }
}

/// Tunable match parameters.
///
/// Missing fields in a JSON config fall back to the defaults in [`crate::config`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Rule set
    pub mode: GameMode,
    /// Health every die starts with
    pub max_health: u32,
    /// Powerups needed to win a race
    pub race_goal: u32,
    /// Seconds a hit die stays stunned in score-based modes
    pub stun_duration: f32,
    /// Seconds a roll animation takes
    pub roll_duration: f32,
    /// Seconds between scripted enemy attacks
    pub scripted_attack_interval: f32,
    /// Seconds between random powerup spawns (Battle and Race)
    pub powerup_spawn_interval: f32,
    /// Random probes per powerup spawn
    pub spawn_retries: u32,
    /// Maximum states the planner expands per plan
    pub bfs_cap: usize,
    /// AI difficulty for goal-seeking dice
    pub difficulty: Difficulty,
    /// Seed for powerup placement and AI randomness
    pub seed: u64,
}

impl GameConfig {
    /// Default configuration for the given mode.
    pub fn new(mode: GameMode) -> Self {
        Self {
            mode,
            max_health: config::DEFAULT_MAX_HEALTH,
            race_goal: config::DEFAULT_RACE_GOAL,
            stun_duration: config::DEFAULT_STUN_DURATION,
            roll_duration: config::DEFAULT_ROLL_DURATION,
            scripted_attack_interval: config::DEFAULT_SCRIPTED_ATTACK_INTERVAL,
            powerup_spawn_interval: config::DEFAULT_POWERUP_SPAWN_INTERVAL,
            spawn_retries: config::SPAWN_RETRIES,
            bfs_cap: config::DEFAULT_BFS_CAP,
            difficulty: Difficulty::Medium,
            seed: 12345,
        }
    }

    /// Deterministic configuration with a fixed seed and top difficulty.
    pub fn for_testing(mode: GameMode) -> Self {
        Self {
            difficulty: Difficulty::Brutal,
            seed: 42,
            ..Self::new(mode)
        }
    }

    /// Parses and validates a JSON config.
    pub fn from_json(json: &str) -> ArenaResult<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> ArenaResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> ArenaResult<String> {
        serde_json::to_string_pretty(self).map_err(ArenaError::from)
    }

    /// Rejects values the simulation cannot run with.
    pub fn validate(&self) -> ArenaResult<()> {
        if self.max_health == 0 {
            return Err(ArenaError::InvalidConfig("max_health must be at least 1".to_string()));
        }
        if self.race_goal == 0 {
            return Err(ArenaError::InvalidConfig("race_goal must be at least 1".to_string()));
        }
        if self.bfs_cap == 0 {
            return Err(ArenaError::InvalidConfig("bfs_cap must be at least 1".to_string()));
        }
        let durations = [
            ("stun_duration", self.stun_duration),
            ("roll_duration", self.roll_duration),
            ("scripted_attack_interval", self.scripted_attack_interval),
            ("powerup_spawn_interval", self.powerup_spawn_interval),
        ];
        for (name, value) in durations {
            if !value.is_finite() || value < 0.0 {
                return Err(ArenaError::InvalidConfig(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if self.powerup_spawn_interval == 0.0 {
            return Err(ArenaError::InvalidConfig(
                "powerup_spawn_interval must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(GameMode::Battle)
    }
}

/// Whether the match is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameCompletionState {
    Playing,
    /// `winner` is None only if every die died in the same exchange
    Finished { winner: Option<DieId> },
}

/// Running totals for a match, fed from the event stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStatistics {
    pub rolls: u32,
    pub explosions: u32,
    pub hits: u32,
    pub stuns: u32,
    pub deaths: u32,
    pub powerups_collected: u32,
    pub powerups_spawned: u32,
}

impl MatchStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates statistics based on a game event.
    pub fn update_from_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::DieMoved { .. } => self.rolls += 1,
            GameEvent::TilesExploded { .. } => self.explosions += 1,
            GameEvent::DieHit { .. } => self.hits += 1,
            GameEvent::DieStunned { .. } => self.stuns += 1,
            GameEvent::DieDied { .. } => self.deaths += 1,
            GameEvent::PowerupRemoved { .. } => self.powerups_collected += 1,
            GameEvent::PowerupSpawned { .. } => self.powerups_spawned += 1,
            _ => {}
        }
    }
}

/// Single owner of the grid and every die.
///
/// Cloning produces an independent snapshot, which is what off-thread planning
/// must read instead of the live engine.
#[derive(Debug, Clone)]
pub struct GameEngine {
    config: GameConfig,
    grid: WorldGrid,
    dice: Vec<DieState>,
    targets: BTreeSet<Position>,
    completion_state: GameCompletionState,
    powerup_goal: u32,
    events: Vec<GameEvent>,
    statistics: MatchStatistics,
}

impl GameEngine {
    /// Creates an engine over a decoded grid with no dice.
    ///
    /// # Examples
    ///
    /// ```
    /// use dice_arena::{DieKind, Direction, GameConfig, GameEngine, GameMode, Position, WorldGrid};
    ///
    /// let mut engine = GameEngine::new(WorldGrid::new(5, 5), GameConfig::new(GameMode::Battle)).unwrap();
    /// let die = engine.spawn_die(DieKind::PlayerOne, Position::new(2, 2));
    ///
    /// assert!(engine.roll(die, Direction::Up));
    /// assert_eq!(engine.die(die).unwrap().position(), Position::new(2, 1));
    ///
    /// // Still in transit until the animation reports back.
    /// assert!(!engine.roll(die, Direction::Up));
    /// engine.finish_roll(die);
    /// assert!(engine.roll(die, Direction::Up));
    /// ```
    pub fn new(grid: WorldGrid, config: GameConfig) -> ArenaResult<Self> {
        config.validate()?;
        let powerup_goal = match config.mode {
            GameMode::Battle => 0,
            GameMode::Race => config.race_goal,
            GameMode::Powerwash => (grid.powerup_count() as u32).div_ceil(2).max(1),
        };
        Ok(Self {
            config,
            grid,
            dice: Vec::new(),
            targets: BTreeSet::new(),
            completion_state: GameCompletionState::Playing,
            powerup_goal,
            events: Vec::new(),
            statistics: MatchStatistics::new(),
        })
    }

    /// Builds a ready-to-play engine from a decoded level.
    ///
    /// In Powerwash mode every open cell is seeded with a random powerup before
    /// the goal is computed. Dice are registered in spawn-list order.
    pub fn from_level<R: Rng>(level: &LevelData, config: GameConfig, rng: &mut R) -> ArenaResult<Self> {
        let mut grid = level.grid.clone();
        if config.mode == GameMode::Powerwash {
            let seeded = crate::seed_powerups(&mut grid, &level.open_cells, rng);
            info!("Seeded {} powerups for powerwash", seeded);
        }

        let mut engine = Self::new(grid, config)?;
        for spawn in &level.spawns {
            let id = engine.register_die(spawn.kind);
            if !engine.place_die(id, spawn.position) {
                return Err(ArenaError::InvalidState(format!(
                    "spawn {:?} at {:?} is blocked",
                    spawn.kind, spawn.position
                )));
            }
        }
        Ok(engine)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn mode(&self) -> GameMode {
        self.config.mode
    }

    pub fn grid(&self) -> &WorldGrid {
        &self.grid
    }

    pub fn dice(&self) -> &[DieState] {
        &self.dice
    }

    pub fn die(&self, die: DieId) -> Option<&DieState> {
        self.dice.get(die)
    }

    /// Placed dice that are still alive.
    pub fn live_dice(&self) -> impl Iterator<Item = (DieId, &DieState)> + '_ {
        self.dice
            .iter()
            .enumerate()
            .filter(|(_, die)| !die.is_dead() && die.is_spawned())
    }

    pub fn completion_state(&self) -> GameCompletionState {
        self.completion_state
    }

    pub fn is_finished(&self) -> bool {
        self.completion_state != GameCompletionState::Playing
    }

    pub fn winner(&self) -> Option<DieId> {
        match self.completion_state {
            GameCompletionState::Finished { winner } => winner,
            GameCompletionState::Playing => None,
        }
    }

    /// Powerups needed to win a score-based mode; 0 in Battle.
    pub fn powerup_goal(&self) -> u32 {
        self.powerup_goal
    }

    pub fn statistics(&self) -> &MatchStatistics {
        &self.statistics
    }

    /// Cells covered by any live die's charged top face.
    pub fn targetable_tiles(&self) -> &BTreeSet<Position> {
        &self.targets
    }

    /// Drains queued notifications for the presentation layer.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Adds an unplaced die to the table and returns its stable id.
    pub fn register_die(&mut self, kind: DieKind) -> DieId {
        let id = self.dice.len();
        self.dice.push(DieState::new(kind, self.config.max_health));
        debug!("Registered die {} as {:?}", id, kind);
        id
    }

    /// Puts a live die directly on a cell, without rolling.
    ///
    /// Fails if the cell is a wall, out of bounds, or already occupied.
    pub fn place_die(&mut self, die: DieId, position: Position) -> bool {
        let Some(state) = self.dice.get(die) else {
            return false;
        };
        if state.is_dead() || !self.is_valid_square(position) || self.is_occupied(position, Some(die)) {
            return false;
        }
        let kind = state.kind;
        self.dice[die].set_position(position);
        self.push_event(GameEvent::DieSpawned {
            die,
            kind,
            position,
        });
        self.update_targets();
        true
    }

    /// Registers and places a die in one step.
    ///
    /// The die is registered even when placement fails, so ids stay aligned
    /// with the caller's spawn list.
    pub fn spawn_die(&mut self, kind: DieKind, position: Position) -> DieId {
        let id = self.register_die(kind);
        if !self.place_die(id, position) {
            warn!("Error moving die {} to square {:?}", id, position);
        }
        id
    }

    /// In bounds and not a wall.
    pub fn is_valid_square(&self, position: Position) -> bool {
        self.grid.is_valid_square(position)
    }

    /// A live die other than `ignoring` sits on `position`.
    pub fn is_occupied(&self, position: Position, ignoring: Option<DieId>) -> bool {
        self.live_dice()
            .any(|(id, die)| Some(id) != ignoring && die.position() == position)
    }

    /// Whether a die landing with `landing_face` down may enter `position`.
    pub fn can_enter_square(&self, position: Position, landing_face: u8) -> bool {
        self.can_enter_square_ignoring(position, landing_face, None)
    }

    /// As [`GameEngine::can_enter_square`], treating `mover` as not occupying its own cell.
    pub fn can_enter_square_ignoring(
        &self,
        position: Position,
        landing_face: u8,
        mover: Option<DieId>,
    ) -> bool {
        if !self.is_valid_square(position) || self.is_occupied(position, mover) {
            return false;
        }
        match self.grid.get(position) {
            Some(TileValue::Powerup(label)) => label == landing_face,
            Some(TileValue::Empty) => true,
            _ => false,
        }
    }

    /// Rolls a die one cell.
    ///
    /// Rejected if the game is over, the die cannot act (dead, unplaced, in
    /// transit, stunned), or the destination is not enterable with the face the
    /// die would land on. On success the die enters its transit window until
    /// [`GameEngine::finish_roll`].
    pub fn roll(&mut self, die: DieId, direction: Direction) -> bool {
        if self.is_finished() {
            return false;
        }
        let Some(state) = self.dice.get(die) else {
            return false;
        };
        if !state.can_act() {
            return false;
        }
        let from = state.position();
        let landing = state.orientation().rolled(direction);
        if !self.can_enter_square_ignoring(landing.position, landing.faces.bottom(), Some(die)) {
            return false;
        }

        self.dice[die].roll(direction);
        debug!("Die {} rolled {:?} to {}", die, direction, landing);
        self.push_event(GameEvent::DieMoved {
            die,
            direction,
            from,
            to: landing.position,
        });
        self.pickup_check(die);
        self.update_targets();
        true
    }

    /// Closes the transit window of a die once its roll animation has played.
    pub fn finish_roll(&mut self, die: DieId) -> bool {
        match self.dice.get_mut(die) {
            Some(state) if state.is_moving() => {
                state.finish_roll();
                self.push_event(GameEvent::RollFinished { die });
                true
            }
            _ => false,
        }
    }

    /// Consumes the powerup under a die if its bottom face matches.
    ///
    /// Scores the pickup, charges the face unless the mode forbids it, and
    /// checks score-based win conditions. Returns false when nothing was picked up.
    pub fn pickup_check(&mut self, die: DieId) -> bool {
        let Some(state) = self.dice.get(die) else {
            return false;
        };
        if state.is_dead() {
            return false;
        }
        let position = state.position();
        let bottom = state.bottom();
        if self.grid.get(position).and_then(TileValue::powerup) != Some(bottom) {
            return false;
        }

        self.grid.take_powerup(position);
        self.push_event(GameEvent::PowerupRemoved {
            position,
            face: bottom,
        });
        self.push_event(GameEvent::Sound(SoundEffect::Pickup));

        let score = self.dice[die].record_pickup();
        self.push_event(GameEvent::ScoreChanged { die, score });

        if self.config.mode.charges_on_pickup() && self.dice[die].charge(bottom) {
            self.push_event(GameEvent::PowerupApplied { die, face: bottom });
        }

        self.check_score_win(die);
        true
    }

    /// Spends the charged top face to attack every cell at Manhattan distance
    /// equal to its label.
    pub fn activate_powerup(&mut self, die: DieId) -> bool {
        if self.is_finished() {
            return false;
        }
        let Some(state) = self.dice.get(die) else {
            return false;
        };
        if !state.can_act() || !state.is_top_charged() {
            return false;
        }
        let face = state.top();
        let center = state.position();

        self.dice[die].discharge(face);
        self.push_event(GameEvent::PowerupUnapplied { die, face });
        self.push_event(GameEvent::Sound(SoundEffect::UsePowerup));
        self.update_targets();

        let tiles = self.attack_tiles(center, face);
        debug!("Die {} activated face {} over {} tiles", die, face, tiles.len());
        self.resolve_attack(die, &tiles);
        self.push_event(GameEvent::TilesExploded { tiles });
        true
    }

    /// Fires a scripted enemy attack over the cells around the attacker.
    ///
    /// Only enemy dice carry scripted attacks: codes 10-12 sent for a player
    /// die are ignored and return false.
    pub fn enemy_scripted_attack(&mut self, attack: ScriptedAttack, die: DieId) -> bool {
        if self.is_finished() {
            return false;
        }
        let Some(state) = self.dice.get(die) else {
            return false;
        };
        if state.kind != DieKind::Enemy || !state.can_act() {
            return false;
        }
        let tiles = self.grid.valid_squares(attack.footprint(state.position()));
        debug!("Die {} scripted attack {} over {} tiles", die, attack.index(), tiles.len());
        self.resolve_attack(die, &tiles);
        self.push_event(GameEvent::TilesExploded { tiles });
        true
    }

    /// Dispatches one tick of input for a die.
    pub fn handle_input(&mut self, die: DieId, input: InputCode) -> bool {
        match input {
            InputCode::None => false,
            InputCode::Roll(direction) => self.roll(die, direction),
            InputCode::Activate => self.activate_powerup(die),
            InputCode::ScriptedAttack(attack) => self.enemy_scripted_attack(attack, die),
        }
    }

    /// Advances per-die clocks (stuns) by one tick.
    pub fn update(&mut self, delta_time: f32) {
        for die in 0..self.dice.len() {
            if self.dice[die].update_stun(delta_time) {
                debug!("Die {} recovered from stun", die);
                self.push_event(GameEvent::DieUnstunned { die });
            }
        }
    }

    /// Drops a random powerup on a random empty, unoccupied cell.
    ///
    /// Gives up after `spawn_retries` probes and returns None.
    pub fn spawn_powerup<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Tile> {
        if self.is_finished() || self.grid.width == 0 || self.grid.height == 0 {
            return None;
        }
        for _ in 0..self.config.spawn_retries {
            let position = Position::new(
                rng.gen_range(0..self.grid.width) as i32,
                rng.gen_range(0..self.grid.height) as i32,
            );
            if self.grid.get(position) != Some(TileValue::Empty) || self.is_occupied(position, None) {
                continue;
            }
            let face = rng.gen_range(1..=6u8);
            self.grid.set(position, TileValue::Powerup(face));
            self.push_event(GameEvent::PowerupSpawned { position, face });
            return Some(Tile::new(position, TileValue::Powerup(face)));
        }
        warn!("No free tile found for powerup after {} tries", self.config.spawn_retries);
        None
    }

    /// Whether `position` is exactly `die`'s charged top value away from it.
    pub fn is_targetable_square(&self, position: Position, die: DieId) -> bool {
        match self.dice.get(die) {
            Some(state) if !state.is_dead() && state.is_spawned() && state.is_top_charged() => {
                state.position().manhattan_distance(position) == state.top() as u32
            }
            _ => false,
        }
    }

    pub fn is_targetable_by_any(&self, position: Position) -> bool {
        (0..self.dice.len()).any(|die| self.is_targetable_square(position, die))
    }

    /// Activating `die` right now would hit at least one other live die.
    pub fn would_hit(&self, die: DieId) -> bool {
        let Some(state) = self.dice.get(die) else {
            return false;
        };
        if state.is_dead() || !state.is_spawned() || !state.is_top_charged() {
            return false;
        }
        let tiles = self.attack_tiles(state.position(), state.top());
        self.live_dice()
            .filter(|(id, _)| *id != die)
            .any(|(_, other)| tiles.iter().any(|&tile| other.occupies_or_leaving(tile)))
    }

    fn attack_tiles(&self, center: Position, face: u8) -> Vec<Position> {
        self.grid.valid_squares(manhattan_ring(center, face as u32))
    }

    /// Hits every live die standing on, or in transit out of, any of `tiles`.
    fn resolve_attack(&mut self, attacker: DieId, tiles: &[Position]) {
        let victims: Vec<DieId> = self
            .live_dice()
            .filter(|(id, _)| *id != attacker)
            .filter(|(_, die)| tiles.iter().any(|&tile| die.occupies_or_leaving(tile)))
            .map(|(id, _)| id)
            .collect();

        for victim in victims {
            if self.is_finished() {
                break;
            }
            self.resolve_hit(victim);
        }
    }

    fn resolve_hit(&mut self, die: DieId) {
        self.push_event(GameEvent::Sound(SoundEffect::Hit));

        if !self.config.mode.hits_damage() {
            self.dice[die].stun(self.config.stun_duration);
            info!("Die {} stunned", die);
            self.push_event(GameEvent::DieStunned { die });
            return;
        }

        let health = self.dice[die].take_hit();
        info!("Die {} hit! Health {}", die, health);
        self.push_event(GameEvent::DieHit { die, health });
        if health == 0 {
            self.kill(die);
            self.check_battle_win();
        }
    }

    fn kill(&mut self, die: DieId) {
        self.dice[die].mark_dead();
        info!("Die {} died", die);
        self.push_event(GameEvent::DieDied { die });
        self.update_targets();
    }

    fn check_battle_win(&mut self) {
        let live: Vec<DieId> = self.live_dice().map(|(id, _)| id).collect();
        match live.as_slice() {
            [winner] => self.finish(Some(*winner)),
            [] => self.finish(None),
            _ => {}
        }
    }

    fn check_score_win(&mut self, die: DieId) {
        if !self.config.mode.is_score_based() || self.is_finished() {
            return;
        }
        if self.dice[die].powerups_collected() < self.powerup_goal {
            return;
        }
        let losers: Vec<DieId> = self
            .live_dice()
            .map(|(id, _)| id)
            .filter(|&id| id != die)
            .collect();
        for loser in losers {
            self.kill(loser);
        }
        self.finish(Some(die));
    }

    fn finish(&mut self, winner: Option<DieId>) {
        self.completion_state = GameCompletionState::Finished { winner };
        let winner_kind = winner.and_then(|id| self.dice.get(id)).map(|die| die.kind);
        info!("Game finished, winner {:?} ({:?})", winner, winner_kind);
        self.push_event(GameEvent::GameFinished {
            winner,
            winner_kind,
        });
    }

    fn update_targets(&mut self) {
        let targets: BTreeSet<Position> = self
            .live_dice()
            .filter(|(_, die)| die.is_top_charged())
            .flat_map(|(_, die)| self.attack_tiles(die.position(), die.top()))
            .collect();
        if targets != self.targets {
            self.targets = targets;
            self.push_event(GameEvent::TargetsUpdated {
                tiles: self.targets.iter().copied().collect(),
            });
        }
    }

    fn push_event(&mut self, event: GameEvent) {
        self.statistics.update_from_event(&event);
        self.events.push(event);
    }
}
