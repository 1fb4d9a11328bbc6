//! Duel Core Library
//!
//! Simulation core of a two-fighter, best-of-three arena duel:
//! - Fighter state machines (physics, health, animation priority)
//! - Strike/body collision and hit resolution
//! - Difficulty-tiered AI opponents
//! - Round and match flow with a round clock and between-round countdown
//! - Localization, match configuration and structured logging
//! - Bevy plugin for hosting a match inside an `App`
//!
//! Rendering, audio and UI are reached through the traits in [`services`].

pub mod ai;
pub mod combat;
pub mod config;
pub mod constants;
pub mod fighter;
pub mod game;
pub mod input;
pub mod locale;
pub mod logging;
pub mod plugin;
pub mod roster;
pub mod schedule;
pub mod services;

pub use ai::{AiPolicy, Decision, Difficulty};
pub use config::{ArenaConfig, ConfigError, GameMode, MatchConfig};
pub use fighter::{Facing, Fighter, FighterView, Motion, Side};
pub use game::{MatchController, MatchPhase, MatchSnapshot, RoundOutcome};
pub use input::InputAction;
pub use locale::{Language, Localizer, TextKey};
pub use plugin::DuelPlugin;
pub use services::{EventLog, NullServices, ServiceEvent, Services, SoundCue};
