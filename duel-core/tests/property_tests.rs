//! Property-based tests using proptest
//!
//! Invariants that must hold for all inputs:
//! - Damage: health drops by exactly the damage, death iff health <= 0
//! - Resets: any action sequence followed by both resets restores spawn state
//! - Bounds: no input sequence moves a fighter outside the arena
//! - Collision: overlap is symmetric and inclusive at the edges
//! - AI: no tier acts twice within its cooldown
//! - Match: scores never pass the win threshold

use bevy::math::Vec2;
use proptest::prelude::*;

use duel_core::ai::{AiPolicy, Decision, Difficulty, TierProfile};
use duel_core::combat::Volume;
use duel_core::config::{ArenaConfig, GameMode, MatchConfig};
use duel_core::fighter::{Control, Fighter, Motion, Side};
use duel_core::game::{MatchController, MatchPhase};
use duel_core::input::InputAction;
use duel_core::roster::CharacterId;
use duel_core::services::NullServices;

fn standing(side: Side, x: f32, control: Control) -> Fighter {
    let arena = ArenaConfig::default();
    Fighter::new(
        side,
        CharacterId::SamuraiMack,
        control,
        Vec2::new(x, arena.standing_y()),
        arena,
    )
}

fn any_action() -> impl Strategy<Value = (InputAction, bool)> {
    (
        prop_oneof![
            Just(InputAction::MoveLeft),
            Just(InputAction::MoveRight),
            Just(InputAction::Jump),
            Just(InputAction::Attack),
        ],
        any::<bool>(),
    )
}

fn any_tier() -> impl Strategy<Value = Difficulty> {
    prop_oneof![
        Just(Difficulty::Easy),
        Just(Difficulty::Expert),
        Just(Difficulty::Master),
    ]
}

// ============================================================
// Fighter Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_take_hit_subtracts_damage(hits in prop::collection::vec(1i32..60, 1..6)) {
        let mut fighter = standing(Side::Player, 300.0, Control::Human);
        for damage in hits {
            let before = fighter.health();
            let after = fighter.take_hit(damage);
            prop_assert_eq!(after, before - damage);
            prop_assert_eq!(fighter.health(), after);
            if after <= 0 {
                // Death waits for a hit reaction already on screen to finish.
                for _ in 0..60 {
                    if fighter.motion() == Motion::Death {
                        break;
                    }
                    fighter.update(false);
                }
                prop_assert_eq!(fighter.motion(), Motion::Death);
                break;
            }
            prop_assert_ne!(fighter.motion(), Motion::Death);
        }
    }

    #[test]
    fn prop_resets_restore_spawn(
        x in 0.0f32..974.0,
        actions in prop::collection::vec((any_action(), 0usize..8), 0..40),
        damage in 0i32..150,
    ) {
        let mut fighter = standing(Side::Enemy, x, Control::Human);
        let spawn = fighter.position();
        for ((action, pressed), ticks) in actions {
            if pressed {
                fighter.key_down(action, true);
            } else {
                fighter.key_up(action);
            }
            for _ in 0..ticks {
                fighter.update(true);
            }
        }
        if damage > 0 {
            fighter.take_hit(damage);
        }

        fighter.reset_health();
        fighter.reset_position();
        prop_assert_eq!(fighter.position(), spawn);
        prop_assert_eq!(fighter.velocity(), Vec2::ZERO);
        prop_assert_eq!(fighter.health(), 100);
        prop_assert!(!fighter.is_dead());
        prop_assert!(!fighter.is_attacking());
        prop_assert!(fighter.can_jump());
        prop_assert_eq!(fighter.motion(), Motion::Idle);
    }

    #[test]
    fn prop_fighter_stays_in_arena(
        x in 0.0f32..974.0,
        actions in prop::collection::vec((any_action(), 1usize..30), 1..30),
        nudges in prop::collection::vec(-40.0f32..40.0, 0..20),
    ) {
        let mut fighter = standing(Side::Player, x, Control::Human);
        let width = ArenaConfig::default().screen_width;
        for ((action, pressed), ticks) in actions {
            if pressed {
                fighter.key_down(action, true);
            } else {
                fighter.key_up(action);
            }
            for _ in 0..ticks {
                fighter.update(true);
                let pos = fighter.position();
                prop_assert!(pos.x >= 0.0 && pos.x + fighter.size().x <= width, "x = {}", pos.x);
            }
        }
        for dx in nudges {
            fighter.nudge(dx);
            let pos = fighter.position();
            prop_assert!(pos.x >= 0.0 && pos.x + fighter.size().x <= width);
        }
    }
}

// ============================================================
// Collision Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_overlap_is_symmetric(
        ax in -500.0f32..500.0, ay in -500.0f32..500.0, aw in 0.0f32..300.0, ah in 0.0f32..300.0,
        bx in -500.0f32..500.0, by in -500.0f32..500.0, bw in 0.0f32..300.0, bh in 0.0f32..300.0,
    ) {
        let a = Volume::new(ax, ay, aw, ah);
        let b = Volume::new(bx, by, bw, bh);
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    #[test]
    fn prop_touching_edges_overlap(x in -500.0f32..500.0, w in 1.0f32..200.0, h in 1.0f32..200.0) {
        let a = Volume::new(x, 0.0, w, h);
        let b = Volume::new(a.right(), 0.0, w, h);
        prop_assert!(a.overlaps(&b));
    }
}

// ============================================================
// AI Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_ai_respects_cooldown(
        seed in any::<u64>(),
        tier in any_tier(),
        enemy_x in 100.0f32..900.0,
        swing_every in 5u64..60,
    ) {
        let mut me = standing(Side::Enemy, enemy_x, Control::Ai);
        let mut opponent = standing(Side::Player, 60.0, Control::Human);
        let mut ai = AiPolicy::new(Side::Enemy, tier, seed);
        let cooldown = TierProfile::for_tier(tier).cooldown_ms;

        let mut last_action: Option<u64> = None;
        for frame in 0..600u64 {
            let now = frame * 16;
            if frame % swing_every == 0 {
                opponent.start_attack();
            }
            opponent.update(false);
            me.update(true);

            if let Some(decision) = ai.update(now, &mut me, &opponent) {
                if decision != Decision::Approach {
                    if let Some(prev) = last_action {
                        prop_assert!(now - prev >= cooldown, "{:?} acted after {} ms", tier, now - prev);
                    }
                    last_action = Some(now);
                }
            }
        }
    }
}

// ============================================================
// Match Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_scores_bounded(rounds in prop::collection::vec((0i32..100, 0i32..100), 1..12)) {
        let config = MatchConfig { mode: GameMode::Pvp, ..MatchConfig::default() };
        let mut ctrl = MatchController::new(config, NullServices);
        ctrl.start();

        for (player_damage, enemy_damage) in rounds {
            if ctrl.is_over() {
                break;
            }
            ctrl.fighter_mut(Side::Player).take_hit(player_damage);
            ctrl.fighter_mut(Side::Enemy).take_hit(enemy_damage);
            let before = ctrl.scores();
            ctrl.end_round();
            let after = ctrl.scores();
            prop_assert!(after.0 + after.1 - (before.0 + before.1) <= 1);

            // Round-end delay plus the full countdown.
            ctrl.tick(2000);
            for _ in 0..4 {
                ctrl.tick(1000);
            }
            let (player, enemy) = ctrl.scores();
            prop_assert!(player <= 2 && enemy <= 2);
            prop_assert_eq!(ctrl.is_over(), player == 2 || enemy == 2);
            if !ctrl.is_over() {
                prop_assert_eq!(ctrl.phase(), MatchPhase::RoundActive);
            }
        }
    }
}
