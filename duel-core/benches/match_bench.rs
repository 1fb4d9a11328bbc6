use bevy::math::Vec2;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use duel_core::ai::{AiPolicy, Difficulty};
use duel_core::combat::resolve_strike;
use duel_core::config::{ArenaConfig, GameMode, MatchConfig};
use duel_core::constants::FRAME_MS;
use duel_core::fighter::{Control, Fighter, Side};
use duel_core::game::MatchController;
use duel_core::roster::CharacterId;
use duel_core::services::{EventLog, NullServices};

fn standing(side: Side, character: CharacterId, x: f32) -> Fighter {
    let arena = ArenaConfig::default();
    let control = match side {
        Side::Player => Control::Human,
        Side::Enemy => Control::Ai,
    };
    Fighter::new(side, character, control, Vec2::new(x, arena.standing_y()), arena)
}

fn bench_match_tick(c: &mut Criterion) {
    c.bench_function("tick_pve_master", |b| {
        let config = MatchConfig {
            mode: GameMode::Pve {
                difficulty: Difficulty::Master,
            },
            ..MatchConfig::default()
        };
        let mut ctrl = MatchController::new(config, NullServices);
        ctrl.start();
        b.iter(|| ctrl.tick(black_box(FRAME_MS)))
    });

    c.bench_function("tick_ai_vs_ai_event_log", |b| {
        let mut ctrl = MatchController::new(MatchConfig::ai_showcase(), EventLog::new());
        b.iter(|| {
            ctrl.tick(black_box(FRAME_MS));
            ctrl.services_mut().drain()
        })
    });

    c.bench_function("full_ai_match", |b| {
        b.iter_batched(
            || MatchController::new(MatchConfig::ai_showcase(), NullServices),
            |mut ctrl| {
                while !ctrl.is_over() && ctrl.now() < 10 * 60 * 1000 {
                    ctrl.tick(FRAME_MS);
                }
                ctrl.scores()
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_ai(c: &mut Criterion) {
    c.bench_function("ai_update_master_in_range", |b| {
        let mut me = standing(Side::Enemy, CharacterId::SamuraiKenji, 280.0);
        let opponent = standing(Side::Player, CharacterId::SamuraiMack, 200.0);
        let mut ai = AiPolicy::new(Side::Enemy, Difficulty::Master, 42);
        let mut now = 0;
        b.iter(|| {
            now += FRAME_MS;
            me.update(true);
            ai.update(black_box(now), &mut me, &opponent)
        })
    });
}

fn bench_strike(c: &mut Criterion) {
    c.bench_function("resolve_strike_no_window", |b| {
        let mut attacker = standing(Side::Player, CharacterId::SamuraiMack, 200.0);
        let mut defender = standing(Side::Enemy, CharacterId::SamuraiKenji, 280.0);
        b.iter(|| resolve_strike(black_box(&mut attacker), black_box(&mut defender)))
    });
}

criterion_group!(benches, bench_match_tick, bench_ai, bench_strike);
criterion_main!(benches);
