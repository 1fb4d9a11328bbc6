//! Bevy hosting for a match.
//!
//! [`DuelPlugin`] inserts the controller as a shared resource, applies
//! [`DuelKey`] input events and ticks the match once per `Update` with the
//! frame delta. Whatever the controller presents is re-sent as
//! [`DuelEvent`]s for UI systems to read.

use std::sync::{Arc, RwLock};

use bevy::prelude::*;

use crate::config::MatchConfig;
use crate::constants::Millis;
use crate::fighter::Side;
use crate::game::MatchController;
use crate::input::InputAction;
use crate::services::{EventLog, ServiceEvent};

#[derive(Default)]
pub struct DuelPlugin {
    pub config: MatchConfig,
}

impl DuelPlugin {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }
}

impl Plugin for DuelPlugin {
    fn build(&self, app: &mut App) {
        let controller = MatchController::new(self.config.clone(), EventLog::new());

        app.insert_resource(MatchResource(Arc::new(RwLock::new(controller))))
            .add_event::<DuelKey>()
            .add_event::<DuelEvent>()
            .add_systems(Update, (apply_keys_system, match_tick_system).chain());
    }
}

#[derive(Resource, Clone)]
pub struct MatchResource(pub Arc<RwLock<MatchController<EventLog>>>);

/// Key press or release for one side, sent by the host's input layer.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuelKey {
    pub side: Side,
    pub action: InputAction,
    pub pressed: bool,
}

/// Presenter and audio output of the match.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct DuelEvent(pub ServiceEvent);

fn frame_millis(delta_secs: f32) -> Millis {
    (delta_secs * 1000.0).round().max(1.0) as Millis
}

fn apply_keys_system(mut keys: EventReader<DuelKey>, match_res: Res<MatchResource>) {
    let Ok(mut controller) = match_res.0.write() else {
        return;
    };
    for key in keys.read() {
        if key.pressed {
            controller.key_down(key.side, key.action);
        } else {
            controller.key_up(key.side, key.action);
        }
    }
}

fn match_tick_system(
    time: Res<Time>,
    match_res: Res<MatchResource>,
    mut events: EventWriter<DuelEvent>,
) {
    if let Ok(mut controller) = match_res.0.write() {
        controller.tick(frame_millis(time.delta_secs()));
        for event in controller.services_mut().drain() {
            event.log();
            events.send(DuelEvent(event));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameMode;
    use crate::game::MatchPhase;

    fn app(config: MatchConfig) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_plugins(DuelPlugin::new(config));
        app
    }

    fn controller(app: &App) -> Arc<RwLock<MatchController<EventLog>>> {
        app.world().resource::<MatchResource>().0.clone()
    }

    #[test]
    fn test_frame_millis_clamps() {
        assert_eq!(frame_millis(0.0), 1);
        assert_eq!(frame_millis(0.016), 16);
        assert_eq!(frame_millis(0.0334), 33);
    }

    #[test]
    fn test_plugin_ticks_match() {
        let mut app = app(MatchConfig::default());
        app.update();
        app.update();
        app.update();

        let shared = controller(&app);
        let ctrl = shared.read().unwrap();
        assert_eq!(ctrl.frame(), 3);
        assert_eq!(ctrl.phase(), MatchPhase::RoundActive);
    }

    #[test]
    fn test_presenter_output_becomes_events() {
        let mut app = app(MatchConfig::default());
        app.update();
        let events = app.world().resource::<Events<DuelEvent>>();
        assert!(!events.is_empty());
    }

    #[test]
    fn test_key_events_reach_fighter() {
        let config = MatchConfig {
            mode: GameMode::Pvp,
            ..MatchConfig::default()
        };
        let mut app = app(config);
        app.world_mut().send_event(DuelKey {
            side: Side::Player,
            action: InputAction::Attack,
            pressed: true,
        });
        app.update();

        let shared = controller(&app);
        let ctrl = shared.read().unwrap();
        assert!(ctrl.fighter(Side::Player).is_attacking());
    }
}
