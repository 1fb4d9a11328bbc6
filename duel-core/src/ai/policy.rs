//! Per-side AI decision loop.
//!
//! Each tick the policy first runs any follow-up steps that came due (feint
//! retreats, jump-attack swings, defend expiry), then, if its cooldown has
//! elapsed, picks at most one new decision. Approaching is continuous and
//! does not start the cooldown; every other decision does.

use rand::Rng;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::debug;

use super::{Difficulty, TierProfile};
use crate::constants::{
    Millis, DEFEND_WINDOW_MS, FEINT_DELAY_MS, JUMP_ATTACK_DELAY_MS, RETREAT_SPEED_MULT,
};
use crate::fighter::{Fighter, Side};
use crate::schedule::{TaskHandle, TaskQueue};

/// What the policy chose this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approach,
    Attack,
    Defend,
    Feint,
    JumpAttack,
}

/// Delayed second steps of compound decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiTask {
    Defend,
    Attack,
    EndDefend,
}

#[derive(Debug, Clone)]
pub struct AiPolicy<R = Xoshiro256PlusPlus> {
    side: Side,
    tier: Difficulty,
    profile: TierProfile,
    rng: R,
    last_action: Option<Millis>,
    defending: bool,
    defend_expiry: Option<TaskHandle>,
    tasks: TaskQueue<AiTask>,
}

impl AiPolicy {
    pub fn new(side: Side, tier: Difficulty, seed: u64) -> Self {
        Self::with_rng(side, tier, Xoshiro256PlusPlus::seed_from_u64(seed))
    }
}

impl<R: Rng> AiPolicy<R> {
    pub fn with_rng(side: Side, tier: Difficulty, rng: R) -> Self {
        Self {
            side,
            tier,
            profile: TierProfile::for_tier(tier),
            rng,
            last_action: None,
            defending: false,
            defend_expiry: None,
            tasks: TaskQueue::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn tier(&self) -> Difficulty {
        self.tier
    }

    pub fn profile(&self) -> &TierProfile {
        &self.profile
    }

    pub fn is_defending(&self) -> bool {
        self.defending
    }

    pub fn last_action(&self) -> Option<Millis> {
        self.last_action
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Drop scheduled follow-ups and the defending flag.
    pub fn clear_pending(&mut self) {
        self.tasks.clear();
        self.defending = false;
        self.defend_expiry = None;
    }

    /// Run due follow-ups, then decide. `me` must be the fighter on this
    /// policy's side.
    pub fn update(&mut self, now: Millis, me: &mut Fighter, opponent: &Fighter) -> Option<Decision> {
        for task in self.tasks.take_due(now) {
            self.run_task(task, now, me, opponent);
        }

        if me.is_dead() {
            return None;
        }
        if let Some(last) = self.last_action {
            if now.saturating_sub(last) < self.profile.cooldown_ms {
                return None;
            }
        }

        let profile = self.profile;
        let distance = (me.position().x - opponent.position().x).abs();

        if let Some(rule) = profile.defend {
            if opponent.is_attack_in_progress() && distance < rule.range && self.roll(rule.chance) {
                self.defend(now, me, opponent);
                return Some(self.acted(now, Decision::Defend));
            }
        }

        if let Some(rule) = profile.feint {
            if self.roll(rule.chance) && distance < rule.range {
                self.attack(me, opponent);
                self.tasks.schedule(now, FEINT_DELAY_MS, AiTask::Defend);
                return Some(self.acted(now, Decision::Feint));
            }
        }

        if distance > profile.engage_range {
            self.approach(me, opponent);
            if let Some(rule) = profile.jump_attack {
                if self.roll(rule.chance) && distance < rule.range {
                    me.jump();
                    self.tasks.schedule(now, JUMP_ATTACK_DELAY_MS, AiTask::Attack);
                    return Some(self.acted(now, Decision::JumpAttack));
                }
            }
            return Some(Decision::Approach);
        }

        if self.roll(profile.attack_chance) {
            self.attack(me, opponent);
            return Some(self.acted(now, Decision::Attack));
        }
        None
    }

    fn acted(&mut self, now: Millis, decision: Decision) -> Decision {
        self.last_action = Some(now);
        debug!(side = ?self.side, tier = ?self.tier, ?decision, now, "ai decision");
        decision
    }

    fn roll(&mut self, chance: f64) -> bool {
        self.rng.gen::<f64>() < chance
    }

    fn run_task(&mut self, task: AiTask, now: Millis, me: &mut Fighter, opponent: &Fighter) {
        match task {
            // Follow-ups that move or swing are dropped once the fighter is dead.
            AiTask::Defend | AiTask::Attack if me.is_dead() => {}
            AiTask::Defend => self.defend(now, me, opponent),
            AiTask::Attack => self.attack(me, opponent),
            AiTask::EndDefend => {
                self.defending = false;
                self.defend_expiry = None;
            }
        }
    }

    fn approach(&mut self, me: &mut Fighter, opponent: &Fighter) {
        let target = opponent.position().x;
        me.face_toward(target);
        let dir = if me.position().x < target { 1.0 } else { -1.0 };
        me.nudge(dir * me.run_speed() * self.profile.approach_speed);
    }

    fn attack(&mut self, me: &mut Fighter, opponent: &Fighter) {
        me.face_toward(opponent.position().x);
        me.start_attack();
    }

    /// Step back from the opponent and raise the defending flag. Damage is
    /// not reduced; the step is the only protection.
    fn defend(&mut self, now: Millis, me: &mut Fighter, opponent: &Fighter) {
        let target = opponent.position().x;
        me.face_toward(target);
        let away = if me.position().x < target { -1.0 } else { 1.0 };
        me.nudge(away * me.run_speed() * RETREAT_SPEED_MULT * 2.0);

        self.defending = true;
        if let Some(previous) = self.defend_expiry.take() {
            self.tasks.cancel(previous);
        }
        self.defend_expiry = Some(self.tasks.schedule(now, DEFEND_WINDOW_MS, AiTask::EndDefend));
    }
}
