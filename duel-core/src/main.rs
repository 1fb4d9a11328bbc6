//! Headless match runner.
//!
//! Plays one match at the configured tick rate, logs what a presenter would
//! show, and prints the final snapshot as JSON.
//!
//! Usage: `duel-headless [match.ron | match.json]`

use anyhow::{Context, Result};
use tracing::{info, warn};

use duel_core::logging::{init_tracing_default, TimingSpan};
use duel_core::{
    EventLog, Localizer, MatchConfig, MatchController, ServiceEvent, Side, TextKey,
};

/// Simulated time limit (ten minutes).
const MAX_SIM_MS: u64 = 10 * 60 * 1000;

fn main() -> Result<()> {
    init_tracing_default();

    let config = match std::env::args().nth(1) {
        Some(path) => MatchConfig::load(&path)
            .with_context(|| format!("loading match config from {}", path))?,
        None => MatchConfig::ai_showcase(),
    };
    let localizer = Localizer::new(config.language);
    let frame_ms = config.frame_ms;
    let player_name = localizer.text(config.player.name_key());
    let enemy_name = localizer.text(config.enemy.name_key());
    info!("{} vs {}", player_name, enemy_name);

    let mut controller = MatchController::new(config, EventLog::new());
    {
        let _timing = TimingSpan::new("headless_match");
        controller.start();
        while !controller.is_over() && controller.now() < MAX_SIM_MS {
            controller.tick(frame_ms);
            for event in controller.services_mut().drain() {
                announce(&localizer, &event);
            }
        }
    }

    match controller.winner() {
        Some(Side::Player) => info!("{}: {}", localizer.text(TextKey::Victory), player_name),
        Some(Side::Enemy) => info!("{}: {}", localizer.text(TextKey::Victory), enemy_name),
        None => warn!(
            "match unfinished after {} ms of simulated time",
            controller.now()
        ),
    }

    let snapshot = controller.snapshot();
    println!(
        "{}",
        serde_json::to_string_pretty(&snapshot).context("serializing final snapshot")?
    );
    Ok(())
}

fn announce(localizer: &Localizer, event: &ServiceEvent) {
    match event {
        ServiceEvent::Round(round) => {
            info!("{}", localizer.format(TextKey::Round, &[&round.to_string()]))
        }
        ServiceEvent::RoundResult(key) | ServiceEvent::FinalResult(key) => {
            info!("{}", localizer.text(*key))
        }
        ServiceEvent::Score { player, enemy } => info!("score {} - {}", player, enemy),
        other => other.log(),
    }
}
