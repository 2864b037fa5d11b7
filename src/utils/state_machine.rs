//! # Timed State Machine
//!
//! Named states, each with a fixed duration and a table of labelled
//! transitions. A transition only fires once the current state's timer has
//! run out; otherwise it is silently ignored.

use crate::{ArenaError, ArenaResult, Timer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StateSpec {
    duration: f32,
    transitions: HashMap<String, String>,
}

/// Finite state machine gated by a countdown [`Timer`].
///
/// # Examples
///
/// ```
/// use dice_arena::StateMachine;
///
/// let mut fsm = StateMachine::new();
/// fsm.add_state("attack", 3.0);
/// fsm.add_transition("attack", "loop", "attack").unwrap();
/// fsm.set_state("attack").unwrap();
///
/// assert!(!fsm.transition("loop"));
/// fsm.update(3.0);
/// assert!(fsm.is_ready());
/// assert!(fsm.transition("loop"));
/// assert!(!fsm.is_ready());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateMachine {
    states: HashMap<String, StateSpec>,
    current: Option<String>,
    timer: Timer,
}

impl StateMachine {
    /// Creates an empty machine with no current state.
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
            current: None,
            timer: Timer::new(0.0),
        }
    }

    /// Adds (or replaces) a state with the given duration in seconds.
    pub fn add_state(&mut self, name: &str, duration: f32) {
        self.states.insert(
            name.to_string(),
            StateSpec {
                duration,
                transitions: HashMap::new(),
            },
        );
    }

    /// Adds a labelled edge from `source` to `target`.
    pub fn add_transition(&mut self, source: &str, label: &str, target: &str) -> ArenaResult<()> {
        if !self.states.contains_key(target) {
            return Err(ArenaError::InvalidState(format!(
                "unknown transition target state '{}'",
                target
            )));
        }
        let spec = self.states.get_mut(source).ok_or_else(|| {
            ArenaError::InvalidState(format!("unknown transition source state '{}'", source))
        })?;
        spec.transitions.insert(label.to_string(), target.to_string());
        Ok(())
    }

    /// Enters `name` unconditionally and arms its timer.
    pub fn set_state(&mut self, name: &str) -> ArenaResult<()> {
        let spec = self
            .states
            .get(name)
            .ok_or_else(|| ArenaError::InvalidState(format!("unknown state '{}'", name)))?;
        self.timer = Timer::new(spec.duration);
        self.current = Some(name.to_string());
        Ok(())
    }

    pub fn update(&mut self, delta_time: f32) {
        self.timer.update(delta_time);
    }

    /// True once the current state's duration has elapsed.
    pub fn is_ready(&self) -> bool {
        self.timer.is_over()
    }

    /// Follows `label` from the current state if ready.
    ///
    /// Returns false without any change when the timer is still running,
    /// there is no current state, or the label is unknown.
    pub fn transition(&mut self, label: &str) -> bool {
        if !self.is_ready() {
            return false;
        }
        let Some(target) = self
            .current
            .as_ref()
            .and_then(|current| self.states.get(current))
            .and_then(|spec| spec.transitions.get(label))
            .cloned()
        else {
            return false;
        };
        self.set_state(&target).is_ok()
    }

    pub fn current_state(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}
