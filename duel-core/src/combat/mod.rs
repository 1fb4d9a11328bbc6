//! Combat Resolution
//!
//! One call per direction per tick: an attacker whose hit window is open
//! either lands on the defender's body or whiffs. Both outcomes close the
//! swing, so every swing resolves exactly once.

pub mod collision;

pub use collision::{strike_reaches, Volume};

use crate::fighter::Fighter;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Result of resolving one attacker against one defender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrikeOutcome {
    /// Attacker's hit window is not open this tick
    NoWindow,
    /// Window open, strike volume missed the body; swing closed
    Miss,
    /// Window open and the strike landed
    Hit { defender_health: i32 },
}

impl StrikeOutcome {
    pub fn landed(&self) -> bool {
        matches!(self, StrikeOutcome::Hit { .. })
    }
}

/// Resolve `attacker`'s current swing against `defender`.
pub fn resolve_strike(attacker: &mut Fighter, defender: &mut Fighter) -> StrikeOutcome {
    if !attacker.is_attack_in_progress() {
        return StrikeOutcome::NoWindow;
    }

    let landed = strike_reaches(&attacker.strike_volume(), &defender.body_volume());
    attacker.finish_attack();

    if !landed {
        debug!(attacker = ?attacker.side(), "swing missed");
        return StrikeOutcome::Miss;
    }

    let damage = attacker.damage();
    let defender_health = defender.take_hit(damage);
    debug!(
        attacker = ?attacker.side(),
        damage,
        defender_health,
        "strike landed"
    );
    StrikeOutcome::Hit { defender_health }
}
