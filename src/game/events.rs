//! # Game Events
//!
//! Outbound notifications for presentation collaborators (renderer, audio, UI).
//! The engine queues these as it mutates state; the host drains them once per
//! tick with [`crate::GameEngine::take_events`].

use crate::{DieId, DieKind, Direction, Position};
use serde::{Deserialize, Serialize};

/// Sound effect triggers, keyed by name for the audio layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SoundEffect {
    Pickup,
    UsePowerup,
    Hit,
}

impl SoundEffect {
    pub fn name(self) -> &'static str {
        match self {
            SoundEffect::Pickup => "pickup",
            SoundEffect::UsePowerup => "usePowerup",
            SoundEffect::Hit => "hit",
        }
    }
}

/// Something the presentation layer should react to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    DieSpawned {
        die: DieId,
        kind: DieKind,
        position: Position,
    },
    /// A roll was committed; the renderer rotates the mesh, then reports back
    /// through `finish_roll`
    DieMoved {
        die: DieId,
        direction: Direction,
        from: Position,
        to: Position,
    },
    RollFinished {
        die: DieId,
    },
    /// A face became charged
    PowerupApplied {
        die: DieId,
        face: u8,
    },
    /// A charged face was spent
    PowerupUnapplied {
        die: DieId,
        face: u8,
    },
    PowerupSpawned {
        position: Position,
        face: u8,
    },
    /// A powerup was picked up off the floor
    PowerupRemoved {
        position: Position,
        face: u8,
    },
    /// Cells currently covered by some die's charged top face
    TargetsUpdated {
        tiles: Vec<Position>,
    },
    TilesExploded {
        tiles: Vec<Position>,
    },
    DieHit {
        die: DieId,
        health: u32,
    },
    DieDied {
        die: DieId,
    },
    DieStunned {
        die: DieId,
    },
    DieUnstunned {
        die: DieId,
    },
    ScoreChanged {
        die: DieId,
        score: u32,
    },
    GameFinished {
        winner: Option<DieId>,
        winner_kind: Option<DieKind>,
    },
    Sound(SoundEffect),
}

impl GameEvent {
    /// The die this event is about, if it concerns a single die.
    pub fn die(&self) -> Option<DieId> {
        match self {
            GameEvent::DieSpawned { die, .. }
            | GameEvent::DieMoved { die, .. }
            | GameEvent::RollFinished { die }
            | GameEvent::PowerupApplied { die, .. }
            | GameEvent::PowerupUnapplied { die, .. }
            | GameEvent::DieHit { die, .. }
            | GameEvent::DieDied { die }
            | GameEvent::DieStunned { die }
            | GameEvent::DieUnstunned { die }
            | GameEvent::ScoreChanged { die, .. } => Some(*die),
            _ => None,
        }
    }
}
