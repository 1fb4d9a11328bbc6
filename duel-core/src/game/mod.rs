//! Match Controller
//!
//! Owns both fighters, their AI policies and the round/score state, and
//! advances all of it from a single entry point, [`MatchController::tick`].
//!
//! Phase flow (best of three):
//!
//! ```text
//! RoundActive --(KO or clock)--> RoundEnd --(2 s)--> MatchOver   (a side has 2)
//!                                         \--(2 s)--> Countdown 3,2,1,0 --> RoundActive
//! ```
//!
//! Movement, AI and hit resolution only run in `RoundActive`. Animation runs
//! in every phase so hit and death clips finish playing.

pub mod timer;

pub use timer::RoundTimer;

use std::cmp::Ordering;

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ai::AiPolicy;
use crate::combat::{resolve_strike, StrikeOutcome};
use crate::config::MatchConfig;
use crate::constants::*;
use crate::fighter::{health_percent, Control, Fighter, FighterView, Side};
use crate::input::InputAction;
use crate::locale::TextKey;
use crate::schedule::TaskQueue;
use crate::services::{Services, SoundCue};

// ============================================================================
// State types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    RoundActive,
    /// Result on screen, waiting for the match-end evaluation
    RoundEnd,
    /// Between rounds; `next` is the next number to show
    Countdown { next: u8 },
    MatchOver { winner: Side },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    Winner(Side),
    Tie,
}

impl RoundOutcome {
    pub fn text_key(self) -> TextKey {
        match self {
            RoundOutcome::Winner(Side::Player) => TextKey::Player1RoundWin,
            RoundOutcome::Winner(Side::Enemy) => TextKey::Player2RoundWin,
            RoundOutcome::Tie => TextKey::RoundTie,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchTask {
    EvaluateMatchEnd,
    CountdownStep,
}

/// Serializable picture of a match at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub round: u32,
    pub player_score: u32,
    pub enemy_score: u32,
    pub phase: MatchPhase,
    pub clock_ms: Millis,
    pub frame: u64,
    pub timer_secs: u32,
    pub player: FighterView,
    pub enemy: FighterView,
}

impl MatchSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// Controller
// ============================================================================

pub struct MatchController<S: Services> {
    config: MatchConfig,
    player: Fighter,
    enemy: Fighter,
    player_ai: Option<AiPolicy>,
    enemy_ai: Option<AiPolicy>,

    phase: MatchPhase,
    round: u32,
    player_score: u32,
    enemy_score: u32,
    last_outcome: Option<RoundOutcome>,

    timer: RoundTimer,
    tasks: TaskQueue<MatchTask>,
    now: Millis,
    frame: u64,
    started: bool,

    services: S,
}

impl<S: Services> MatchController<S> {
    pub fn new(config: MatchConfig, services: S) -> Self {
        let arena = config.arena;
        let control = |ai: bool| if ai { Control::Ai } else { Control::Human };
        let player_tier = config.mode.player_ai();
        let enemy_tier = config.mode.enemy_ai();

        let player = Fighter::new(
            Side::Player,
            config.player,
            control(player_tier.is_some()),
            Vec2::from(config.player_spawn),
            arena,
        );
        let enemy = Fighter::new(
            Side::Enemy,
            config.enemy,
            control(enemy_tier.is_some()),
            Vec2::from(config.enemy_spawn),
            arena,
        );

        // Distinct streams per side from one configured seed.
        let player_ai =
            player_tier.map(|t| AiPolicy::new(Side::Player, t, config.ai_seed.rotate_left(32)));
        let enemy_ai = enemy_tier.map(|t| AiPolicy::new(Side::Enemy, t, config.ai_seed));

        Self {
            timer: RoundTimer::new(config.round_secs),
            config,
            player,
            enemy,
            player_ai,
            enemy_ai,
            phase: MatchPhase::RoundActive,
            round: 1,
            player_score: 0,
            enemy_score: 0,
            last_outcome: None,
            tasks: TaskQueue::new(),
            now: 0,
            frame: 0,
            started: false,
            services,
        }
    }

    // --- queries ----------------------------------------------------------

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// (player, enemy)
    pub fn scores(&self) -> (u32, u32) {
        (self.player_score, self.enemy_score)
    }

    pub fn last_outcome(&self) -> Option<RoundOutcome> {
        self.last_outcome
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, MatchPhase::MatchOver { .. })
    }

    pub fn winner(&self) -> Option<Side> {
        match self.phase {
            MatchPhase::MatchOver { winner } => Some(winner),
            _ => None,
        }
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn timer(&self) -> &RoundTimer {
        &self.timer
    }

    pub fn fighter(&self, side: Side) -> &Fighter {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    /// Direct access for hosts scripting a scenario.
    pub fn fighter_mut(&mut self, side: Side) -> &mut Fighter {
        match side {
            Side::Player => &mut self.player,
            Side::Enemy => &mut self.enemy,
        }
    }

    pub fn ai(&self, side: Side) -> Option<&AiPolicy> {
        match side {
            Side::Player => self.player_ai.as_ref(),
            Side::Enemy => self.enemy_ai.as_ref(),
        }
    }

    pub fn services(&self) -> &S {
        &self.services
    }

    pub fn services_mut(&mut self) -> &mut S {
        &mut self.services
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            round: self.round,
            player_score: self.player_score,
            enemy_score: self.enemy_score,
            phase: self.phase,
            clock_ms: self.now,
            frame: self.frame,
            timer_secs: self.timer.remaining_secs(),
            player: self.player.view(),
            enemy: self.enemy.view(),
        }
    }

    // --- input ------------------------------------------------------------

    /// Route a key press to the human-driven fighter on `side`.
    pub fn key_down(&mut self, side: Side, action: InputAction) {
        let can_act = self.phase == MatchPhase::RoundActive;
        self.fighter_mut(side).key_down(action, can_act);
    }

    pub fn key_up(&mut self, side: Side, action: InputAction) {
        self.fighter_mut(side).key_up(action);
    }

    // --- lifecycle --------------------------------------------------------

    /// Present the opening state and start the clock. Called by the first
    /// tick if the host has not called it.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.timer.start();

        self.services.round_changed(self.round);
        self.services.score_changed(self.player_score, self.enemy_score);
        self.present_health();
        self.services.timer_changed(self.timer.remaining_secs());
        self.services.play(SoundCue::Music);
        info!(
            player = ?self.config.player,
            enemy = ?self.config.enemy,
            mode = ?self.config.mode,
            "match started"
        );
    }

    /// Advance the match by `dt` milliseconds.
    pub fn tick(&mut self, dt: Millis) {
        if !self.started {
            self.start();
        }
        self.now += dt;
        self.frame += 1;

        let was_active = self.phase == MatchPhase::RoundActive;
        for task in self.tasks.take_due(self.now) {
            match task {
                MatchTask::EvaluateMatchEnd => self.evaluate_match_end(),
                MatchTask::CountdownStep => self.countdown_step(),
            }
        }

        if was_active && self.phase == MatchPhase::RoundActive {
            if self.timer.advance(dt) {
                self.services.timer_changed(self.timer.remaining_secs());
            }
            if self.timer.is_finished() {
                debug!(round = self.round, "round clock expired");
                self.end_round();
            }
        }

        let can_move = self.phase == MatchPhase::RoundActive;
        self.player.update(can_move);
        self.enemy.update(can_move);

        if can_move {
            let now = self.now;
            if let Some(ai) = self.player_ai.as_mut() {
                ai.update(now, &mut self.player, &self.enemy);
            }
            if let Some(ai) = self.enemy_ai.as_mut() {
                ai.update(now, &mut self.enemy, &self.player);
            }
            self.resolve_strikes();
        }

        self.flush();
    }

    fn resolve_strikes(&mut self) {
        // Both directions are checked before either result is acted on, so a
        // simultaneous exchange damages both fighters.
        let on_enemy = resolve_strike(&mut self.player, &mut self.enemy);
        let on_player = resolve_strike(&mut self.enemy, &mut self.player);

        let max = self.config.arena.max_health;
        if let StrikeOutcome::Hit { defender_health } = on_enemy {
            self.services
                .health_changed(Side::Enemy, health_percent(defender_health, max));
        }
        if let StrikeOutcome::Hit { defender_health } = on_player {
            self.services
                .health_changed(Side::Player, health_percent(defender_health, max));
        }

        if self.player.health() <= 0 || self.enemy.health() <= 0 {
            self.end_round();
        }
    }

    fn flush(&mut self) {
        for cue in self.player.drain_cues().into_iter().chain(self.enemy.drain_cues()) {
            self.services.play(cue);
        }
        self.services.draw_fighter(&self.player.view());
        self.services.draw_fighter(&self.enemy.view());
    }

    fn present_health(&mut self) {
        let max = self.config.arena.max_health;
        self.services
            .health_changed(Side::Player, health_percent(self.player.health(), max));
        self.services
            .health_changed(Side::Enemy, health_percent(self.enemy.health(), max));
    }

    // --- round flow -------------------------------------------------------

    /// End the current round: higher health takes it, equal health is a tie.
    /// Returns `None` (and changes nothing) outside an active round.
    pub fn end_round(&mut self) -> Option<RoundOutcome> {
        if self.phase != MatchPhase::RoundActive {
            return None;
        }
        self.phase = MatchPhase::RoundEnd;
        self.timer.stop();

        let outcome = match self.player.health().cmp(&self.enemy.health()) {
            Ordering::Greater => RoundOutcome::Winner(Side::Player),
            Ordering::Less => RoundOutcome::Winner(Side::Enemy),
            Ordering::Equal => RoundOutcome::Tie,
        };
        match outcome {
            RoundOutcome::Winner(Side::Player) => self.player_score += 1,
            RoundOutcome::Winner(Side::Enemy) => self.enemy_score += 1,
            RoundOutcome::Tie => {}
        }
        self.last_outcome = Some(outcome);

        self.services.score_changed(self.player_score, self.enemy_score);
        self.services.round_result(outcome.text_key());
        self.tasks
            .schedule(self.now, ROUND_END_DELAY_MS, MatchTask::EvaluateMatchEnd);

        info!(
            round = self.round,
            ?outcome,
            player_health = self.player.health(),
            enemy_health = self.enemy.health(),
            player_score = self.player_score,
            enemy_score = self.enemy_score,
            "round over"
        );
        Some(outcome)
    }

    fn match_winner(&self) -> Option<Side> {
        if self.player_score >= ROUNDS_TO_WIN {
            Some(Side::Player)
        } else if self.enemy_score >= ROUNDS_TO_WIN {
            Some(Side::Enemy)
        } else {
            None
        }
    }

    fn evaluate_match_end(&mut self) {
        if self.phase != MatchPhase::RoundEnd {
            return;
        }
        match self.match_winner() {
            Some(winner) => {
                self.phase = MatchPhase::MatchOver { winner };
                self.clear_ai();
                let key = match winner {
                    Side::Player => TextKey::PlayerFinalWin,
                    Side::Enemy => TextKey::EnemyFinalWin,
                };
                self.services.final_result(key);
                info!(
                    ?winner,
                    rounds = self.round,
                    player_score = self.player_score,
                    enemy_score = self.enemy_score,
                    "match over"
                );
            }
            None => {
                self.phase = MatchPhase::Countdown {
                    next: COUNTDOWN_FROM,
                };
                self.tasks
                    .schedule(self.now, COUNTDOWN_STEP_MS, MatchTask::CountdownStep);
                debug!(next_round = self.round + 1, "countdown started");
            }
        }
    }

    fn countdown_step(&mut self) {
        let MatchPhase::Countdown { next } = self.phase else {
            return;
        };
        self.services.countdown_shown(next);
        if next == 0 {
            self.services.countdown_hidden();
            self.start_next_round();
        } else {
            self.phase = MatchPhase::Countdown { next: next - 1 };
            self.tasks
                .schedule(self.now, COUNTDOWN_STEP_MS, MatchTask::CountdownStep);
        }
    }

    fn start_next_round(&mut self) {
        self.round += 1;

        self.player.reset_health();
        self.enemy.reset_health();
        self.present_health();
        self.player.reset_position();
        self.enemy.reset_position();
        self.clear_ai();

        self.timer.reset();
        self.timer.start();
        self.services.timer_changed(self.timer.remaining_secs());
        self.services.round_changed(self.round);
        self.phase = MatchPhase::RoundActive;
        info!(round = self.round, "round started");
    }

    fn clear_ai(&mut self) {
        for ai in [self.player_ai.as_mut(), self.enemy_ai.as_mut()]
            .into_iter()
            .flatten()
        {
            ai.clear_pending();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameMode;
    use crate::services::{EventLog, ServiceEvent};

    fn pvp() -> MatchController<EventLog> {
        let config = MatchConfig {
            mode: GameMode::Pvp,
            ..MatchConfig::default()
        };
        let mut ctrl = MatchController::new(config, EventLog::new());
        ctrl.start();
        ctrl
    }

    /// Skip past the round-end delay and the whole countdown.
    fn run_intermission(ctrl: &mut MatchController<EventLog>) {
        ctrl.tick(ROUND_END_DELAY_MS);
        for _ in 0..=COUNTDOWN_FROM {
            ctrl.tick(COUNTDOWN_STEP_MS);
        }
    }

    #[test]
    fn test_start_presents_opening_state() {
        let ctrl = pvp();
        let events = &ctrl.services().events;
        assert_eq!(events[0], ServiceEvent::Round(1));
        assert!(events.contains(&ServiceEvent::Score { player: 0, enemy: 0 }));
        assert!(events.contains(&ServiceEvent::Timer(60)));
        assert!(events.contains(&ServiceEvent::Sound(SoundCue::Music)));
        assert_eq!(ctrl.phase(), MatchPhase::RoundActive);
    }

    #[test]
    fn test_higher_health_wins_round() {
        let mut ctrl = pvp();
        ctrl.fighter_mut(Side::Player).take_hit(60);
        ctrl.fighter_mut(Side::Enemy).take_hit(30);

        assert_eq!(ctrl.end_round(), Some(RoundOutcome::Winner(Side::Enemy)));
        assert_eq!(ctrl.scores(), (0, 1));
        assert!(ctrl
            .services()
            .events
            .contains(&ServiceEvent::RoundResult(TextKey::Player2RoundWin)));
    }

    #[test]
    fn test_equal_health_is_tie() {
        let mut ctrl = pvp();
        ctrl.fighter_mut(Side::Player).take_hit(60);
        ctrl.fighter_mut(Side::Enemy).take_hit(60);
        assert_eq!(ctrl.end_round(), Some(RoundOutcome::Tie));
        assert_eq!(ctrl.scores(), (0, 0));
    }

    #[test]
    fn test_end_round_is_idempotent() {
        let mut ctrl = pvp();
        ctrl.fighter_mut(Side::Enemy).take_hit(20);
        assert!(ctrl.end_round().is_some());
        assert_eq!(ctrl.end_round(), None);
        assert_eq!(ctrl.scores(), (1, 0));
        assert_eq!(
            ctrl.services()
                .count(|e| matches!(e, ServiceEvent::RoundResult(_))),
            1
        );
    }

    #[test]
    fn test_knockout_ends_round_on_tick() {
        let mut ctrl = pvp();
        ctrl.fighter_mut(Side::Enemy).take_hit(100);
        // Health is checked after resolution even without a landed strike.
        ctrl.tick(FRAME_MS);
        assert_eq!(ctrl.phase(), MatchPhase::RoundEnd);
        assert_eq!(ctrl.scores(), (1, 0));
    }

    #[test]
    fn test_countdown_then_next_round() {
        let mut ctrl = pvp();
        ctrl.fighter_mut(Side::Player).take_hit(40);
        ctrl.end_round();

        ctrl.tick(ROUND_END_DELAY_MS - 1);
        assert_eq!(ctrl.phase(), MatchPhase::RoundEnd);
        ctrl.tick(1);
        assert_eq!(ctrl.phase(), MatchPhase::Countdown { next: 3 });

        ctrl.services_mut().drain();
        for expected in [3u8, 2, 1] {
            ctrl.tick(COUNTDOWN_STEP_MS);
            assert!(ctrl
                .services()
                .events
                .contains(&ServiceEvent::Countdown(expected)));
            assert_eq!(ctrl.round(), 1);
        }
        ctrl.tick(COUNTDOWN_STEP_MS);
        assert!(ctrl.services().events.contains(&ServiceEvent::Countdown(0)));
        assert!(ctrl.services().events.contains(&ServiceEvent::CountdownHidden));
        assert_eq!(ctrl.phase(), MatchPhase::RoundActive);
        assert_eq!(ctrl.round(), 2);
        assert_eq!(ctrl.fighter(Side::Player).health(), 100);
        assert_eq!(ctrl.timer().remaining_secs(), 60);
    }

    #[test]
    fn test_movement_frozen_outside_round() {
        let mut ctrl = pvp();
        ctrl.fighter_mut(Side::Enemy).take_hit(20);
        ctrl.end_round();
        let before = ctrl.fighter(Side::Player).position();
        ctrl.key_down(Side::Player, InputAction::MoveRight);
        for _ in 0..20 {
            ctrl.tick(FRAME_MS);
        }
        assert_eq!(ctrl.fighter(Side::Player).position().x, before.x);
    }

    #[test]
    fn test_two_round_wins_end_match() {
        let mut ctrl = pvp();
        ctrl.fighter_mut(Side::Enemy).take_hit(50);
        ctrl.end_round();
        run_intermission(&mut ctrl);
        assert_eq!(ctrl.round(), 2);

        ctrl.fighter_mut(Side::Enemy).take_hit(50);
        ctrl.end_round();
        ctrl.tick(ROUND_END_DELAY_MS);
        assert_eq!(
            ctrl.phase(),
            MatchPhase::MatchOver {
                winner: Side::Player
            }
        );
        assert!(ctrl
            .services()
            .events
            .contains(&ServiceEvent::FinalResult(TextKey::PlayerFinalWin)));

        // Terminal: further ticks and round ends change nothing.
        assert_eq!(ctrl.end_round(), None);
        for _ in 0..10 {
            ctrl.tick(COUNTDOWN_STEP_MS);
        }
        assert!(ctrl.is_over());
        assert_eq!(ctrl.round(), 2);
    }

    #[test]
    fn test_split_rounds_go_to_third() {
        let mut ctrl = pvp();
        ctrl.fighter_mut(Side::Enemy).take_hit(50);
        ctrl.end_round();
        run_intermission(&mut ctrl);

        ctrl.fighter_mut(Side::Player).take_hit(50);
        ctrl.end_round();
        assert_eq!(ctrl.scores(), (1, 1));
        ctrl.tick(ROUND_END_DELAY_MS);
        assert_eq!(ctrl.phase(), MatchPhase::Countdown { next: 3 });
    }

    #[test]
    fn test_clock_expiry_ends_round() {
        let config = MatchConfig {
            mode: GameMode::Pvp,
            round_secs: 1,
            ..MatchConfig::default()
        };
        let mut ctrl = MatchController::new(config, EventLog::new());
        for _ in 0..70 {
            ctrl.tick(FRAME_MS);
        }
        assert_eq!(ctrl.phase(), MatchPhase::RoundEnd);
        assert_eq!(ctrl.last_outcome(), Some(RoundOutcome::Tie));
    }

    #[test]
    fn test_snapshot_json() {
        let mut ctrl = pvp();
        ctrl.tick(FRAME_MS);
        let snap = ctrl.snapshot();
        let restored = MatchSnapshot::from_json(&snap.to_json().unwrap()).unwrap();
        assert_eq!(restored.round, 1);
        assert_eq!(restored.phase, MatchPhase::RoundActive);
        assert_eq!(restored.frame, 1);
        assert!(MatchSnapshot::from_json("{\"round\": 1}").is_err());
    }

    #[test]
    fn test_pve_builds_enemy_ai() {
        let ctrl = MatchController::new(MatchConfig::default(), EventLog::new());
        assert!(ctrl.ai(Side::Enemy).is_some());
        assert!(ctrl.ai(Side::Player).is_none());
        assert_eq!(ctrl.fighter(Side::Enemy).control(), Control::Ai);
    }
}
