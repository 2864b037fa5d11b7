//! Difficulty levels as plain probability tables.

use crate::ArenaError;
use serde::{Deserialize, Serialize};

/// Per-difficulty probabilities consumed by the goal-seeking controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// Chance of planning toward a powerup instead of wandering
    pub seek_rate: f64,
    /// Chance of activating when a hit is available
    pub attack_rate: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    /// Always seeks, always attacks
    Brutal,
}

impl Difficulty {
    pub fn all() -> [Difficulty; 4] {
        [
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Hard,
            Difficulty::Brutal,
        ]
    }

    pub fn profile(self) -> DifficultyProfile {
        let (seek_rate, attack_rate) = match self {
            Difficulty::Easy => (0.25, 0.2),
            Difficulty::Medium => (0.5, 0.5),
            Difficulty::Hard => (0.75, 0.8),
            Difficulty::Brutal => (1.0, 1.0),
        };
        DifficultyProfile {
            seek_rate,
            attack_rate,
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = ArenaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "brutal" => Ok(Difficulty::Brutal),
            other => Err(ArenaError::InvalidConfig(format!("unknown difficulty '{}'", other))),
        }
    }
}
