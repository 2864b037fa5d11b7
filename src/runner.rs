//! # Match Runner
//!
//! Headless host loop. Owns the engine and one controller per die, plays the
//! part of the presentation layer (roll animations are simulated with timers
//! that report back through `finish_roll`), and drops powerups on a schedule.

use crate::{
    create_rng, AiController, ArenaError, ArenaResult, DieId, DieKind, GameConfig, GameEngine,
    GameEvent, GameMode, InputCode, InputSource, LevelData, MatchStatistics, QueuedInput, Timer,
};
use log::{debug, info};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Who drives a die.
#[derive(Debug, Clone)]
pub enum Controller {
    Ai(AiController),
    Queued(QueuedInput),
}

impl InputSource for Controller {
    fn die(&self) -> DieId {
        match self {
            Controller::Ai(ai) => ai.die(),
            Controller::Queued(queued) => InputSource::die(queued),
        }
    }

    fn next_input(&mut self, engine: &GameEngine, delta_time: f32) -> InputCode {
        match self {
            Controller::Ai(ai) => ai.decide(engine, delta_time),
            Controller::Queued(queued) => queued.next_input(engine, delta_time),
        }
    }
}

/// Summary of a finished (or abandoned) match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub finished: bool,
    pub winner: Option<DieId>,
    pub winner_kind: Option<DieKind>,
    pub ticks: u64,
    pub elapsed: f32,
    pub statistics: MatchStatistics,
}

/// Tick loop gluing controllers to the engine.
#[derive(Debug, Clone)]
pub struct MatchRunner {
    engine: GameEngine,
    controllers: Vec<Controller>,
    roll_timers: Vec<Option<Timer>>,
    spawn_timer: Timer,
    rng: StdRng,
    ticks: u64,
    elapsed: f32,
}

impl MatchRunner {
    /// Wraps an engine with no controllers attached.
    pub fn new(engine: GameEngine) -> Self {
        let rng = create_rng(engine.config().seed);
        let spawn_timer = Timer::new(engine.config().powerup_spawn_interval);
        let roll_timers = vec![None; engine.dice().len()];
        Self {
            engine,
            controllers: Vec::new(),
            roll_timers,
            spawn_timer,
            rng,
            ticks: 0,
            elapsed: 0.0,
        }
    }

    /// Builds a match on `level` where every die is AI-driven.
    pub fn ai_match(level: &LevelData, config: GameConfig) -> ArenaResult<Self> {
        if level.spawns.is_empty() {
            return Err(ArenaError::InvalidState("level has no spawn points".to_string()));
        }
        let mut rng = create_rng(config.seed);
        let engine = GameEngine::from_level(level, config, &mut rng)?;
        let mut runner = Self::new(engine);
        runner.rng = rng;

        let dice: Vec<(DieId, DieKind)> = runner
            .engine
            .dice()
            .iter()
            .enumerate()
            .map(|(id, die)| (id, die.kind))
            .collect();
        for (id, kind) in dice {
            let ai = AiController::for_kind(id, kind, runner.engine.config())?;
            runner.set_controller(Controller::Ai(ai));
        }
        info!(
            "Match ready: {:?} with {} dice",
            runner.engine.mode(),
            runner.engine.dice().len()
        );
        Ok(runner)
    }

    /// Attaches a controller, replacing any existing one for the same die.
    pub fn set_controller(&mut self, controller: Controller) {
        let die = controller.die();
        self.controllers.retain(|existing| existing.die() != die);
        self.controllers.push(controller);
        self.controllers.sort_by_key(|c| c.die());
    }

    /// Hands `die` to external input.
    pub fn make_human(&mut self, die: DieId) {
        self.set_controller(Controller::Queued(QueuedInput::new(die)));
    }

    /// Queues input for an externally driven die. Returns false if the die is AI-driven.
    pub fn push_input(&mut self, die: DieId, input: InputCode) -> bool {
        for controller in &mut self.controllers {
            if let Controller::Queued(queued) = controller {
                if InputSource::die(queued) == die {
                    queued.push(input);
                    return true;
                }
            }
        }
        false
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_finished(&self) -> bool {
        self.engine.is_finished()
    }

    /// Advances the match by one frame and returns the events it produced.
    pub fn tick(&mut self, delta_time: f32) -> Vec<GameEvent> {
        if self.engine.is_finished() {
            return Vec::new();
        }
        if self.roll_timers.len() < self.engine.dice().len() {
            self.roll_timers.resize(self.engine.dice().len(), None);
        }

        self.engine.update(delta_time);
        self.update_roll_animations(delta_time);
        self.update_powerup_spawns(delta_time);

        for controller in &mut self.controllers {
            let die = controller.die();
            let input = controller.next_input(&self.engine, delta_time);
            if !self.engine.handle_input(die, input) {
                continue;
            }
            if self.engine.die(die).is_some_and(|state| state.is_moving()) {
                let roll_duration = self.engine.config().roll_duration;
                if roll_duration <= 0.0 {
                    self.engine.finish_roll(die);
                } else if let Some(slot) = self.roll_timers.get_mut(die) {
                    *slot = Some(Timer::new(roll_duration));
                }
            }
        }

        self.ticks += 1;
        self.elapsed += delta_time;
        let events = self.engine.take_events();
        self.drop_stale_input(&events);
        events
    }

    /// Queued moves for a die that died or was stunned this tick are discarded.
    fn drop_stale_input(&mut self, events: &[GameEvent]) {
        for event in events {
            if !matches!(event, GameEvent::DieDied { .. } | GameEvent::DieStunned { .. }) {
                continue;
            }
            let Some(die) = event.die() else {
                continue;
            };
            for controller in &mut self.controllers {
                if let Controller::Queued(queued) = controller {
                    if InputSource::die(queued) == die && queued.pending() > 0 {
                        debug!("Dropping {} queued inputs for die {}", queued.pending(), die);
                        queued.clear();
                    }
                }
            }
        }
    }

    /// Ticks until the match ends or `max_ticks` frames have run.
    pub fn run_until_finished(&mut self, max_ticks: u64, delta_time: f32) -> MatchOutcome {
        while !self.engine.is_finished() && self.ticks < max_ticks {
            self.tick(delta_time);
        }
        let outcome = self.outcome();
        if outcome.finished {
            info!(
                "Match over after {} ticks, winner {:?} ({:?})",
                outcome.ticks, outcome.winner, outcome.winner_kind
            );
        } else {
            info!("Match stopped unfinished after {} ticks", outcome.ticks);
        }
        outcome
    }

    pub fn outcome(&self) -> MatchOutcome {
        let winner = self.engine.winner();
        MatchOutcome {
            finished: self.engine.is_finished(),
            winner,
            winner_kind: winner.and_then(|id| self.engine.die(id)).map(|die| die.kind),
            ticks: self.ticks,
            elapsed: self.elapsed,
            statistics: self.engine.statistics().clone(),
        }
    }

    fn update_roll_animations(&mut self, delta_time: f32) {
        for die in 0..self.roll_timers.len() {
            let Some(timer) = self.roll_timers[die].as_mut() else {
                continue;
            };
            timer.update(delta_time);
            if timer.is_over() {
                self.roll_timers[die] = None;
                self.engine.finish_roll(die);
            }
        }
    }

    fn update_powerup_spawns(&mut self, delta_time: f32) {
        if self.engine.mode() == GameMode::Powerwash {
            return;
        }
        self.spawn_timer.update(delta_time);
        if self.spawn_timer.is_over() {
            if let Some(tile) = self.engine.spawn_powerup(&mut self.rng) {
                debug!("Spawned powerup {:?} at {:?}", tile.value, tile.position);
            }
            self.spawn_timer = Timer::new(self.engine.config().powerup_spawn_interval);
        }
    }
}
