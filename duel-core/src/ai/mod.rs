//! AI opponents.
//!
//! A [`Difficulty`] picks a [`TierProfile`]: decision cooldown, the distance
//! at which the AI stops approaching, and which optional tactics (defend,
//! feint, jump-attack) it may roll for. [`AiPolicy`] runs the profile against
//! a fighter every tick.

pub mod policy;

pub use policy::{AiPolicy, AiTask, Decision};

use serde::{Deserialize, Serialize};

use crate::constants::{EASY_COOLDOWN_MS, EXPERT_COOLDOWN_MS, MASTER_COOLDOWN_MS, Millis};
use crate::locale::TextKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Expert,
    Master,
}

impl Difficulty {
    pub fn name_key(self) -> TextKey {
        match self {
            Difficulty::Easy => TextKey::Easy,
            Difficulty::Expert => TextKey::Expert,
            Difficulty::Master => TextKey::Master,
        }
    }
}

/// A tactic gated by opponent distance and a random roll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TacticRule {
    /// Only considered while the opponent is closer than this
    pub range: f32,
    pub chance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierProfile {
    pub cooldown_ms: Millis,
    /// Approach while farther than this, otherwise roll to attack
    pub engage_range: f32,
    /// Approach step as a fraction of run speed
    pub approach_speed: f32,
    pub attack_chance: f64,
    /// Back off when the opponent's hit window is open
    pub defend: Option<TacticRule>,
    pub feint: Option<TacticRule>,
    /// Rolled after an approach step
    pub jump_attack: Option<TacticRule>,
}

impl TierProfile {
    pub fn for_tier(tier: Difficulty) -> Self {
        match tier {
            Difficulty::Easy => Self {
                cooldown_ms: EASY_COOLDOWN_MS,
                engage_range: 100.0,
                approach_speed: 0.3,
                attack_chance: 0.3,
                defend: None,
                feint: None,
                jump_attack: None,
            },
            Difficulty::Expert => Self {
                cooldown_ms: EXPERT_COOLDOWN_MS,
                engage_range: 80.0,
                approach_speed: 0.7,
                attack_chance: 0.7,
                defend: Some(TacticRule {
                    range: 120.0,
                    chance: 0.6,
                }),
                feint: None,
                jump_attack: None,
            },
            Difficulty::Master => Self {
                cooldown_ms: MASTER_COOLDOWN_MS,
                engage_range: 60.0,
                approach_speed: 1.0,
                attack_chance: 0.9,
                defend: Some(TacticRule {
                    range: 150.0,
                    chance: 0.9,
                }),
                feint: Some(TacticRule {
                    range: 100.0,
                    chance: 0.2,
                }),
                jump_attack: Some(TacticRule {
                    range: 150.0,
                    chance: 0.3,
                }),
            },
        }
    }
}
